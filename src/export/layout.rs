//! Page layout for the PDF export: word wrap, alignment, and pagination.
//!
//! Geometry is measured in CSS pixels (96 per inch) over an A4 portrait page
//! with 0.75 in margins. Positions are absolute within the page, so the
//! rasterizer can emit spans without further arithmetic.

use crate::core::document::{Alignment, BlockFormat, Document, FontFamilyChoice, Paragraph, RunStyle};
use crate::export::fonts::FontCatalog;

pub const PAGE_WIDTH_IN: f32 = 8.27;
pub const PAGE_HEIGHT_IN: f32 = 11.69;
pub const MARGIN_IN: f32 = 0.75;
pub const PX_PER_IN: f32 = 96.0;
pub const PT_PER_IN: f32 = 72.0;

/// Line box height relative to the largest font on the line.
const LINE_HEIGHT_FACTOR: f32 = 1.5;
/// Baseline offset from the line top, relative to the largest font size
/// (half-leading plus a nominal ascent).
const BASELINE_FACTOR: f32 = 1.05;

/// Fixed page geometry, in CSS pixels.
#[derive(Debug, Clone, Copy)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            width: PAGE_WIDTH_IN * PX_PER_IN,
            height: PAGE_HEIGHT_IN * PX_PER_IN,
            margin: MARGIN_IN * PX_PER_IN,
        }
    }
}

impl PageGeometry {
    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    pub fn content_bottom(&self) -> f32 {
        self.height - self.margin
    }
}

/// Resolved visual style of a span: run formatting with the paragraph's
/// block role folded in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: FontFamilyChoice,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub size_pt: f32,
}

impl TextStyle {
    /// Fold a run style and its paragraph's block format together. Headings
    /// render bold at their own size unless the run carries an explicit
    /// non-default step.
    pub fn resolve(run: &RunStyle, block: BlockFormat) -> Self {
        let (size_pt, bold) = match block.heading_points() {
            Some(points) => {
                let size = if run.size == Default::default() {
                    points
                } else {
                    run.size.points()
                };
                (size, true)
            }
            None => (run.size.points(), run.bold),
        };
        Self {
            font: run.font,
            bold,
            italic: run.italic,
            underline: run.underline,
            size_pt,
        }
    }

    /// Font size in CSS pixels.
    pub fn size_px(&self) -> f32 {
        self.size_pt * PX_PER_IN / PT_PER_IN
    }
}

/// A positioned piece of identically styled text.
#[derive(Debug, Clone)]
pub struct Span {
    pub text: String,
    pub style: TextStyle,
    pub x: f32,
    pub width: f32,
}

/// One laid-out line; the baseline is absolute within the page.
#[derive(Debug, Clone)]
pub struct Line {
    pub baseline: f32,
    pub spans: Vec<Span>,
}

/// One page of laid-out lines.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub lines: Vec<Line>,
}

struct Token {
    text: String,
    style: TextStyle,
    width: f32,
    is_space: bool,
}

/// Split a paragraph's runs into word and space tokens.
fn tokenize(paragraph: &Paragraph, fonts: &FontCatalog) -> Vec<Token> {
    let mut tokens = Vec::new();
    for run in &paragraph.runs {
        let style = TextStyle::resolve(&run.style, paragraph.block);
        let mut current = String::new();
        let mut current_space = false;
        for ch in run.text.chars() {
            let is_space = ch == ' ';
            if !current.is_empty() && is_space != current_space {
                let width = fonts.measure(&current, &style);
                tokens.push(Token {
                    text: std::mem::take(&mut current),
                    style,
                    width,
                    is_space: current_space,
                });
            }
            current_space = is_space;
            current.push(ch);
        }
        if !current.is_empty() {
            let width = fonts.measure(&current, &style);
            tokens.push(Token {
                text: current,
                style,
                width,
                is_space: current_space,
            });
        }
    }
    tokens
}

/// Break a word wider than the content area into character pieces.
fn hard_break(token: &Token, content_w: f32, fonts: &FontCatalog) -> Vec<Token> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut width = 0.0f32;
    for ch in token.text.chars() {
        let advance = fonts.measure(ch.encode_utf8(&mut [0; 4]), &token.style);
        if !current.is_empty() && width + advance > content_w {
            pieces.push(Token {
                text: std::mem::take(&mut current),
                style: token.style,
                width,
                is_space: false,
            });
            width = 0.0;
        }
        current.push(ch);
        width += advance;
    }
    if !current.is_empty() {
        pieces.push(Token {
            text: current,
            style: token.style,
            width,
            is_space: false,
        });
    }
    pieces
}

fn trim_trailing_spaces(line: &mut Vec<Token>) {
    while line.last().is_some_and(|t| t.is_space) {
        line.pop();
    }
}

/// Greedy word wrap of a paragraph's tokens into lines of at most
/// `content_w`. An empty paragraph yields a single empty line.
fn break_paragraph(tokens: Vec<Token>, content_w: f32, fonts: &FontCatalog) -> Vec<Vec<Token>> {
    let mut lines: Vec<Vec<Token>> = Vec::new();
    let mut line: Vec<Token> = Vec::new();
    let mut width = 0.0f32;
    for token in tokens {
        if token.is_space {
            width += token.width;
            line.push(token);
            continue;
        }
        if width + token.width > content_w && line.iter().any(|t| !t.is_space) {
            trim_trailing_spaces(&mut line);
            lines.push(std::mem::take(&mut line));
            width = 0.0;
        }
        if token.width > content_w {
            let pieces = hard_break(&token, content_w, fonts);
            let last = pieces.len().saturating_sub(1);
            for (idx, piece) in pieces.into_iter().enumerate() {
                width += piece.width;
                line.push(piece);
                if idx != last {
                    trim_trailing_spaces(&mut line);
                    lines.push(std::mem::take(&mut line));
                    width = 0.0;
                }
            }
        } else {
            width += token.width;
            line.push(token);
        }
    }
    trim_trailing_spaces(&mut line);
    if !line.is_empty() || lines.is_empty() {
        lines.push(line);
    }
    lines
}

/// Turn a line's tokens into positioned spans honoring alignment. Justified
/// lines spread the slack across word gaps, except a paragraph's last line.
fn position_line(
    tokens: Vec<Token>,
    geometry: &PageGeometry,
    alignment: Alignment,
    is_last_line: bool,
) -> Vec<Span> {
    let content_w = geometry.content_width();
    let natural: f32 = tokens.iter().map(|t| t.width).sum();
    let gaps = tokens.iter().filter(|t| t.is_space).count();
    let justify =
        alignment == Alignment::Justify && !is_last_line && gaps > 0 && natural < content_w;
    let extra = if justify {
        (content_w - natural) / gaps as f32
    } else {
        0.0
    };
    let mut x = match alignment {
        Alignment::Left | Alignment::Justify => geometry.margin,
        Alignment::Center => geometry.margin + (content_w - natural).max(0.0) / 2.0,
        Alignment::Right => geometry.margin + (content_w - natural).max(0.0),
    };
    let mut spans: Vec<Span> = Vec::new();
    for token in tokens {
        let width = token.width + if token.is_space { extra } else { 0.0 };
        if justify {
            // Words carry explicit positions; gaps are pure whitespace.
            if !token.is_space {
                spans.push(Span {
                    text: token.text,
                    style: token.style,
                    x,
                    width,
                });
            }
        } else {
            match spans.last_mut() {
                Some(last) if last.style == token.style => {
                    last.text.push_str(&token.text);
                    last.width += width;
                }
                _ => spans.push(Span {
                    text: token.text,
                    style: token.style,
                    x,
                    width,
                }),
            }
        }
        x += width;
    }
    spans
}

/// Lay the document out into pages. Always yields at least one page; an
/// empty document becomes a single blank page.
pub fn paginate(document: &Document, fonts: &FontCatalog, geometry: PageGeometry) -> Vec<Page> {
    let content_w = geometry.content_width();
    let mut pages: Vec<Page> = Vec::new();
    let mut current = Page::default();
    let mut cursor_y = geometry.margin;

    for paragraph in document.paragraphs() {
        let default_size = TextStyle::resolve(&RunStyle::default(), paragraph.block).size_px();
        let tokens = tokenize(paragraph, fonts);
        let token_lines = break_paragraph(tokens, content_w, fonts);
        let line_count = token_lines.len();
        for (idx, tokens) in token_lines.into_iter().enumerate() {
            let max_size = tokens
                .iter()
                .map(|t| t.style.size_px())
                .fold(default_size, f32::max);
            let line_height = max_size * LINE_HEIGHT_FACTOR;
            if cursor_y + line_height > geometry.content_bottom() && !current.lines.is_empty() {
                pages.push(std::mem::take(&mut current));
                cursor_y = geometry.margin;
            }
            let baseline = cursor_y + max_size * BASELINE_FACTOR;
            let spans = position_line(tokens, &geometry, paragraph.alignment, idx + 1 == line_count);
            current.lines.push(Line { baseline, spans });
            cursor_y += line_height;
        }
    }
    pages.push(current);
    pages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::document::{Paragraph, Run};

    const EPS: f32 = 0.01;

    fn small_geometry() -> PageGeometry {
        PageGeometry {
            width: 200.0,
            height: 200.0,
            margin: 20.0,
        }
    }

    fn catalog() -> FontCatalog {
        FontCatalog::empty()
    }

    fn plain(text: &str) -> Document {
        Document::from_plain_text(text, RunStyle::default())
    }

    #[test]
    fn test_empty_document_is_one_blank_page() {
        let pages = paginate(&Document::new(), &catalog(), PageGeometry::default());
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].lines.len(), 1);
        assert!(pages[0].lines[0].spans.is_empty());
    }

    #[test]
    fn test_spans_respect_margins() {
        let text = "word ".repeat(60);
        let geometry = small_geometry();
        let pages = paginate(&plain(&text), &catalog(), geometry);
        for page in &pages {
            for line in &page.lines {
                assert!(line.baseline > geometry.margin);
                assert!(line.baseline <= geometry.content_bottom() + EPS);
                for span in &line.spans {
                    assert!(span.x >= geometry.margin - EPS);
                    assert!(span.x + span.width <= geometry.width - geometry.margin + EPS);
                }
            }
        }
    }

    #[test]
    fn test_long_content_spills_to_more_pages() {
        let text = vec!["paragraph"; 40].join("\n");
        let pages = paginate(&plain(&text), &catalog(), small_geometry());
        assert!(pages.len() > 1);
        assert!(pages.iter().all(|p| !p.lines.is_empty()));
    }

    #[test]
    fn test_overlong_word_is_hard_broken() {
        let text = "x".repeat(100);
        let geometry = small_geometry();
        let pages = paginate(&plain(&text), &catalog(), geometry);
        let lines: usize = pages.iter().map(|p| p.lines.len()).sum();
        assert!(lines > 1);
        for page in &pages {
            for line in &page.lines {
                for span in &line.spans {
                    assert!(span.x + span.width <= geometry.width - geometry.margin + EPS);
                }
            }
        }
    }

    #[test]
    fn test_center_alignment_centers_line() {
        let mut paragraph = Paragraph::from_text("hi", RunStyle::default());
        paragraph.alignment = Alignment::Center;
        let geometry = small_geometry();
        let pages = paginate(
            &Document::from_paragraphs(vec![paragraph]),
            &catalog(),
            geometry,
        );
        let span = &pages[0].lines[0].spans[0];
        let expected = geometry.margin + (geometry.content_width() - span.width) / 2.0;
        assert!((span.x - expected).abs() < EPS);
    }

    #[test]
    fn test_right_alignment_touches_right_margin() {
        let mut paragraph = Paragraph::from_text("end", RunStyle::default());
        paragraph.alignment = Alignment::Right;
        let geometry = small_geometry();
        let pages = paginate(
            &Document::from_paragraphs(vec![paragraph]),
            &catalog(),
            geometry,
        );
        let span = &pages[0].lines[0].spans[0];
        assert!((span.x + span.width - (geometry.width - geometry.margin)).abs() < EPS);
    }

    #[test]
    fn test_justify_stretches_all_but_last_line() {
        let mut paragraph = Paragraph::from_text("aa bb cc dd ee ff gg hh", RunStyle::default());
        paragraph.alignment = Alignment::Justify;
        let geometry = small_geometry();
        let pages = paginate(
            &Document::from_paragraphs(vec![paragraph]),
            &catalog(),
            geometry,
        );
        let lines = &pages[0].lines;
        assert!(lines.len() > 1);
        let first = &lines[0];
        let last_span = first.spans.last().unwrap();
        assert!(
            (last_span.x + last_span.width - (geometry.width - geometry.margin)).abs() < EPS,
            "justified line should reach the right margin"
        );
        let final_line = lines.last().unwrap();
        let final_span = final_line.spans.last().unwrap();
        assert!(final_span.x + final_span.width < geometry.width - geometry.margin - EPS);
    }

    #[test]
    fn test_heading_resolves_larger_and_bold() {
        let style = TextStyle::resolve(&RunStyle::default(), BlockFormat::Heading1);
        assert_eq!(style.size_pt, 24.0);
        assert!(style.bold);
        let body = TextStyle::resolve(&RunStyle::default(), BlockFormat::Body);
        assert_eq!(body.size_pt, 11.0);
        assert!(!body.bold);
    }

    #[test]
    fn test_mixed_styles_merge_only_matching_spans() {
        let bold = RunStyle {
            bold: true,
            ..RunStyle::default()
        };
        let paragraph = Paragraph {
            runs: vec![
                Run::new("plain ", RunStyle::default()),
                Run::new("bold", bold),
            ],
            ..Paragraph::default()
        };
        let pages = paginate(
            &Document::from_paragraphs(vec![paragraph]),
            &catalog(),
            PageGeometry::default(),
        );
        let spans = &pages[0].lines[0].spans;
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text, "plain ");
        assert_eq!(spans[1].text, "bold");
        assert!(spans[1].style.bold);
        assert!(spans[1].x > spans[0].x);
    }
}
