//! Editor state: the document, the selection, and the editing operations
//! the surface drives.

use crate::core::document::{Document, Location, Paragraph, RunStyle};
use crate::core::selection::Selection;

/// Editable document state shared by the surface, the toolbar, and exports.
pub struct EditorState {
    pub document: Document,
    pub selection: Selection,
    /// Style staged at a collapsed caret by formatting commands; consumed by
    /// the next insertion and dropped when the caret moves.
    pub pending: Option<RunStyle>,
    default_style: RunStyle,
}

impl EditorState {
    /// Create an empty editor using `default_style` for the first insertion.
    pub fn new(default_style: RunStyle) -> Self {
        Self {
            document: Document::new(),
            selection: Selection::default(),
            pending: None,
            default_style,
        }
    }

    /// Reset to an empty document.
    pub fn clear(&mut self) {
        self.document = Document::new();
        self.selection = Selection::default();
        self.pending = None;
    }

    /// Style for the next insertion: the pending style if staged, otherwise
    /// the style governing the insertion point.
    fn insertion_style(&mut self) -> RunStyle {
        if let Some(style) = self.pending.take() {
            return style;
        }
        if self.document.is_empty() {
            return self.default_style;
        }
        let probe = if self.selection.is_caret() {
            self.selection.head
        } else {
            // Replacing a selection adopts the style of its first character.
            self.selection.start() + 1
        };
        self.document.style_at(probe)
    }

    /// Insert text at the caret, replacing the selection if present.
    /// Embedded line breaks become paragraph breaks.
    pub fn insert(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let style = self.insertion_style();
        self.delete_selection();
        let caret = self.document.insert_text(self.selection.head, text, style);
        self.selection = Selection::caret(caret);
    }

    /// Insert a paragraph break at the caret.
    pub fn insert_break(&mut self) {
        self.pending = None;
        self.delete_selection();
        let caret = self.selection.head;
        self.document.split_paragraph(caret);
        self.selection = Selection::caret(caret + 1);
    }

    /// Delete the selection, or the character before the caret.
    pub fn backspace(&mut self) {
        self.pending = None;
        if self.delete_selection() {
            return;
        }
        let caret = self.selection.head;
        if caret == 0 {
            return;
        }
        self.document.delete_range(caret - 1..caret);
        self.selection = Selection::caret(caret - 1);
    }

    /// Delete the selection, or the character after the caret.
    pub fn delete_forward(&mut self) {
        self.pending = None;
        if self.delete_selection() {
            return;
        }
        let caret = self.selection.head;
        if caret >= self.document.char_len() {
            return;
        }
        self.document.delete_range(caret..caret + 1);
    }

    /// Remove the selected range if any; returns whether anything was
    /// deleted. The caret lands at the former start of the selection.
    pub fn delete_selection(&mut self) -> bool {
        if self.selection.is_caret() {
            return false;
        }
        let start = self.selection.start();
        self.document.delete_range(self.selection.range());
        self.selection = Selection::caret(start);
        true
    }

    pub fn move_left(&mut self, extend: bool) {
        self.pending = None;
        if !extend && !self.selection.is_caret() {
            self.selection = Selection::caret(self.selection.start());
            return;
        }
        let target = self.selection.head.saturating_sub(1);
        self.selection.move_head(target, extend);
    }

    pub fn move_right(&mut self, extend: bool) {
        self.pending = None;
        if !extend && !self.selection.is_caret() {
            self.selection = Selection::caret(self.selection.end());
            return;
        }
        let target = (self.selection.head + 1).min(self.document.char_len());
        self.selection.move_head(target, extend);
    }

    /// Move to the start of the caret's paragraph.
    pub fn move_line_start(&mut self, extend: bool) {
        self.pending = None;
        let loc = self.document.locate(self.selection.head);
        let target = self.document.offset_of(Location {
            paragraph: loc.paragraph,
            column: 0,
        });
        self.selection.move_head(target, extend);
    }

    /// Move to the end of the caret's paragraph.
    pub fn move_line_end(&mut self, extend: bool) {
        self.pending = None;
        let loc = self.document.locate(self.selection.head);
        let column = self.document.paragraphs()[loc.paragraph].char_len();
        let target = self.document.offset_of(Location {
            paragraph: loc.paragraph,
            column,
        });
        self.selection.move_head(target, extend);
    }

    /// Move to the previous paragraph, keeping the column where possible.
    pub fn move_up(&mut self, extend: bool) {
        self.pending = None;
        let loc = self.document.locate(self.selection.head);
        let target = if loc.paragraph == 0 {
            0
        } else {
            let above = loc.paragraph - 1;
            let column = loc
                .column
                .min(self.document.paragraphs()[above].char_len());
            self.document.offset_of(Location {
                paragraph: above,
                column,
            })
        };
        self.selection.move_head(target, extend);
    }

    /// Move to the next paragraph, keeping the column where possible.
    pub fn move_down(&mut self, extend: bool) {
        self.pending = None;
        let loc = self.document.locate(self.selection.head);
        let last = self.document.paragraphs().len() - 1;
        let target = if loc.paragraph == last {
            self.document.char_len()
        } else {
            let below = loc.paragraph + 1;
            let column = loc
                .column
                .min(self.document.paragraphs()[below].char_len());
            self.document.offset_of(Location {
                paragraph: below,
                column,
            })
        };
        self.selection.move_head(target, extend);
    }

    pub fn select_all(&mut self) {
        self.pending = None;
        self.selection = Selection::new(0, self.document.char_len());
    }

    /// Place the caret, clamped into the document.
    pub fn set_caret(&mut self, offset: usize) {
        self.pending = None;
        self.selection = Selection::caret(offset.min(self.document.char_len()));
    }

    /// Extend the selection head while dragging.
    pub fn drag_to(&mut self, offset: usize) {
        self.pending = None;
        self.selection
            .move_head(offset.min(self.document.char_len()), true);
    }

    /// Plain text covered by the selection.
    pub fn selected_text(&self) -> String {
        let range = self.selection.range();
        self.document
            .plain_text()
            .chars()
            .skip(range.start)
            .take(range.end - range.start)
            .collect()
    }

    /// Apply a style mutation to the selection, or stage it at the caret.
    pub fn restyle_selection(&mut self, f: impl Fn(&mut RunStyle)) {
        if self.selection.is_caret() {
            let mut style = self
                .pending
                .unwrap_or_else(|| self.style_at_caret());
            f(&mut style);
            self.pending = Some(style);
        } else {
            self.document.restyle(self.selection.range(), f);
        }
    }

    /// Apply a paragraph mutation to every paragraph the selection touches.
    pub fn for_selected_paragraphs(&mut self, f: impl FnMut(&mut Paragraph)) {
        self.document.for_paragraphs_in(self.selection.range(), f);
    }

    fn style_at_caret(&self) -> RunStyle {
        if self.document.is_empty() {
            self.default_style
        } else {
            self.document.style_at(self.selection.head)
        }
    }
}
