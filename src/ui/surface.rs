//! The editing surface: a page-like widget that renders the document with
//! its formatting and translates pointer and keyboard input into model
//! edits. The widget never owns content; the document model is the single
//! source of truth.

use std::ops::Range;

use eframe::egui;
use egui::text::{CCursor, LayoutJob};

use crate::core::document::{Alignment, BlockFormat, Paragraph, RunStyle};
use crate::core::editor::EditorState;
use crate::export::layout::TextStyle;

/// Page width on screen: 21 cm at 96 dpi.
const PAGE_WIDTH: f32 = 794.0;
/// Minimum page height: 29.7 cm at 96 dpi.
const PAGE_MIN_HEIGHT: f32 = 1123.0;
/// Page padding: 2.54 cm at 96 dpi.
const PAGE_PADDING: f32 = 96.0;
const LINE_SPACING: f32 = 1.5;

// The page stays paper-white in both themes, so text colors are fixed.
// Bold is approximated with a stronger color; the bundled UI fonts carry no
// bold faces (the PDF export renders true bold from system fonts).
const PAGE_FILL: egui::Color32 = egui::Color32::WHITE;
const PAGE_BORDER: egui::Color32 = egui::Color32::from_gray(200);
const TEXT_COLOR: egui::Color32 = egui::Color32::from_gray(51);
const BOLD_TEXT_COLOR: egui::Color32 = egui::Color32::BLACK;
const SELECTION_FILL: egui::Color32 = egui::Color32::from_rgb(179, 212, 252);
const CARET_COLOR: egui::Color32 = egui::Color32::from_gray(20);

/// Per-paragraph layout computed each frame.
struct ParagraphLayout {
    galley: std::sync::Arc<egui::Galley>,
    anchor: egui::Pos2,
    start: usize,
    char_len: usize,
    alignment: Alignment,
}

/// The rich-text editing surface.
pub struct SurfacePanel;

impl SurfacePanel {
    /// Show the surface and apply any input to the editor state.
    pub fn show(ui: &mut egui::Ui, editor: &mut EditorState) {
        let selection = editor.selection.range();
        let content_width = PAGE_WIDTH - 2.0 * PAGE_PADDING;

        // First pass: galleys and paragraph offsets.
        let mut paragraphs = Vec::new();
        let mut start = 0usize;
        let mut text_height = 0.0f32;
        for paragraph in editor.document.paragraphs() {
            let char_len = paragraph.char_len();
            let local = selection.start.saturating_sub(start).min(char_len)
                ..selection.end.saturating_sub(start).min(char_len);
            let job = paragraph_job(paragraph, local, content_width);
            let galley = ui.fonts(|f| f.layout_job(job));
            text_height += galley.size().y;
            paragraphs.push(ParagraphLayout {
                galley,
                anchor: egui::Pos2::ZERO,
                start,
                char_len,
                alignment: paragraph.alignment,
            });
            start += char_len + 1;
        }

        let page_height = (text_height + 2.0 * PAGE_PADDING).max(PAGE_MIN_HEIGHT);
        let (rect, response) = ui.allocate_exact_size(
            egui::vec2(PAGE_WIDTH, page_height),
            egui::Sense::click_and_drag(),
        );
        let response = response.on_hover_cursor(egui::CursorIcon::Text);

        let painter = ui.painter();
        painter.rect_filled(rect, egui::CornerRadius::same(2), PAGE_FILL);
        painter.rect_stroke(
            rect,
            egui::CornerRadius::same(2),
            egui::Stroke::new(1.0, PAGE_BORDER),
            egui::StrokeKind::Inside,
        );

        // Second pass: anchor positions and painting.
        let content_left = rect.left() + PAGE_PADDING;
        let mut y = rect.top() + PAGE_PADDING;
        for paragraph in &mut paragraphs {
            let anchor_x = match paragraph.alignment {
                Alignment::Left | Alignment::Justify => content_left,
                Alignment::Center => content_left + content_width / 2.0,
                Alignment::Right => content_left + content_width,
            };
            paragraph.anchor = egui::pos2(anchor_x, y);
            painter.galley(paragraph.anchor, paragraph.galley.clone(), TEXT_COLOR);
            y += paragraph.galley.size().y;
        }

        // Pointer: place the caret or extend the selection.
        if let Some(pos) = response.interact_pointer_pos() {
            let offset = offset_at(&paragraphs, pos);
            if response.drag_started() || response.clicked() {
                response.request_focus();
                if ui.input(|i| i.modifiers.shift) {
                    editor.drag_to(offset);
                } else {
                    editor.set_caret(offset);
                }
            } else if response.dragged() {
                editor.drag_to(offset);
            }
        }

        if response.has_focus() {
            ui.memory_mut(|m| {
                m.set_focus_lock_filter(
                    response.id,
                    egui::EventFilter {
                        tab: false,
                        horizontal_arrows: true,
                        vertical_arrows: true,
                        escape: false,
                    },
                );
            });
            Self::handle_events(ui, editor);
            Self::paint_caret(painter, editor, &paragraphs);
        }
    }

    fn handle_events(ui: &egui::Ui, editor: &mut EditorState) {
        let events = ui.input(|i| i.events.clone());
        for event in events {
            match event {
                egui::Event::Text(text) => editor.insert(&text),
                egui::Event::Paste(text) => editor.insert(&text),
                egui::Event::Copy => {
                    let text = editor.selected_text();
                    if !text.is_empty() {
                        ui.ctx().copy_text(text);
                    }
                }
                egui::Event::Cut => {
                    let text = editor.selected_text();
                    if !text.is_empty() {
                        ui.ctx().copy_text(text);
                        editor.delete_selection();
                    }
                }
                egui::Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } => Self::handle_key(editor, key, modifiers),
                _ => {}
            }
        }
    }

    fn handle_key(editor: &mut EditorState, key: egui::Key, modifiers: egui::Modifiers) {
        use egui::Key;
        let shift = modifiers.shift;
        match key {
            Key::Enter => editor.insert_break(),
            Key::Backspace => editor.backspace(),
            Key::Delete => editor.delete_forward(),
            Key::ArrowLeft => editor.move_left(shift),
            Key::ArrowRight => editor.move_right(shift),
            Key::ArrowUp => editor.move_up(shift),
            Key::ArrowDown => editor.move_down(shift),
            Key::Home => editor.move_line_start(shift),
            Key::End => editor.move_line_end(shift),
            Key::A if modifiers.command => editor.select_all(),
            _ => {}
        }
    }

    /// Draw the caret at the selection head. Galleys may lag the model by
    /// one frame right after an edit, so positions are clamped.
    fn paint_caret(painter: &egui::Painter, editor: &EditorState, paragraphs: &[ParagraphLayout]) {
        let loc = editor.document.locate(editor.selection.head);
        let Some(paragraph) = paragraphs.get(loc.paragraph) else {
            return;
        };
        let column = loc.column.min(paragraph.char_len);
        let cursor = paragraph.galley.pos_from_cursor(CCursor::new(column));
        let x = paragraph.anchor.x + cursor.min.x;
        let top = paragraph.anchor.y + cursor.min.y;
        let bottom = paragraph.anchor.y + cursor.max.y;
        painter.vline(
            x,
            egui::Rangef::new(top, bottom),
            egui::Stroke::new(1.5, CARET_COLOR),
        );
    }
}

/// Resolve a pointer position to a document character offset.
fn offset_at(paragraphs: &[ParagraphLayout], pos: egui::Pos2) -> usize {
    if paragraphs.is_empty() {
        return 0;
    }
    let mut chosen = paragraphs.len() - 1;
    for (idx, paragraph) in paragraphs.iter().enumerate() {
        let bottom = paragraph.anchor.y + paragraph.galley.size().y;
        if pos.y < bottom {
            chosen = idx;
            break;
        }
    }
    let paragraph = &paragraphs[chosen];
    let local = pos - paragraph.anchor;
    let ccursor = paragraph.galley.cursor_from_pos(local);
    paragraph.start + ccursor.index.min(paragraph.char_len)
}

/// Byte index of character column `col` in `text`.
fn byte_index(text: &str, col: usize) -> usize {
    text.char_indices().nth(col).map_or(text.len(), |(i, _)| i)
}

fn slice_cols(text: &str, cols: Range<usize>) -> &str {
    &text[byte_index(text, cols.start)..byte_index(text, cols.end)]
}

/// Build the layout job for one paragraph, splitting run sections at the
/// selection boundaries so the highlight is part of the text layout.
fn paragraph_job(paragraph: &Paragraph, selection: Range<usize>, wrap_width: f32) -> LayoutJob {
    let mut job = LayoutJob::default();
    job.wrap.max_width = wrap_width;
    job.halign = match paragraph.alignment {
        Alignment::Left | Alignment::Justify => egui::Align::Min,
        Alignment::Center => egui::Align::Center,
        Alignment::Right => egui::Align::Max,
    };
    job.justify = paragraph.alignment == Alignment::Justify;
    let default_px = TextStyle::resolve(&RunStyle::default(), paragraph.block).size_px();
    job.first_row_min_height = default_px * LINE_SPACING;

    let mut col = 0usize;
    for run in &paragraph.runs {
        let len = run.char_len();
        let sel_start = selection.start.clamp(col, col + len);
        let sel_end = selection.end.clamp(col, col + len);
        let segments = [
            (col..sel_start, false),
            (sel_start..sel_end, true),
            (sel_end..col + len, false),
        ];
        for (range, selected) in segments {
            if range.start < range.end {
                let text = slice_cols(&run.text, range.start - col..range.end - col);
                job.append(text, 0.0, text_format(&run.style, paragraph.block, selected));
            }
        }
        col += len;
    }
    job
}

fn text_format(style: &RunStyle, block: BlockFormat, selected: bool) -> egui::TextFormat {
    let resolved = TextStyle::resolve(style, block);
    let size = resolved.size_px();
    let color = if resolved.bold {
        BOLD_TEXT_COLOR
    } else {
        TEXT_COLOR
    };
    let mut format = egui::TextFormat {
        font_id: egui::FontId::proportional(size),
        color,
        italics: resolved.italic,
        line_height: Some(size * LINE_SPACING),
        ..Default::default()
    };
    if resolved.underline {
        format.underline = egui::Stroke::new(1.0, color);
    }
    if selected {
        format.background = SELECTION_FILL;
    }
    format
}
