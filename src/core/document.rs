//! Canonical rich-text document model: paragraphs, runs, and styles.
//!
//! All positions are measured in characters over the plain-text projection of
//! the document, where consecutive paragraphs are separated by a single `\n`.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Font families offered by the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontFamilyChoice {
    #[default]
    TimesNewRoman,
    Arial,
    Calibri,
}

impl FontFamilyChoice {
    /// Family name as used for font lookup and rendering.
    pub fn family_name(self) -> &'static str {
        match self {
            Self::TimesNewRoman => "Times New Roman",
            Self::Arial => "Arial",
            Self::Calibri => "Calibri",
        }
    }

    /// Whether the family falls back to a serif face.
    pub fn is_serif(self) -> bool {
        matches!(self, Self::TimesNewRoman)
    }

    /// All selectable families, in toolbar order.
    pub fn all() -> [Self; 3] {
        [Self::TimesNewRoman, Self::Arial, Self::Calibri]
    }
}

/// Font size on the classic 1-7 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontStep(u8);

impl Default for FontStep {
    fn default() -> Self {
        Self(3)
    }
}

impl FontStep {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 7;

    /// Create a step, clamping to the 1-7 range.
    pub fn new(step: u8) -> Self {
        Self(step.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Point size for this step.
    pub fn points(self) -> f32 {
        match self.0 {
            1 => 8.0,
            2 => 10.0,
            3 => 11.0,
            4 => 14.0,
            5 => 18.0,
            6 => 24.0,
            _ => 36.0,
        }
    }
}

/// Character-level formatting of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub font: FontFamilyChoice,
    pub size: FontStep,
}

/// A contiguous span of identically styled text within a paragraph.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub text: String,
    pub style: RunStyle,
}

impl Run {
    pub fn new(text: impl Into<String>, style: RunStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Paragraph-level alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// Block-level paragraph role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockFormat {
    #[default]
    Body,
    Heading1,
    Heading2,
}

impl BlockFormat {
    /// Point size override applied by headings to runs that still carry the
    /// default step. `None` means the run size applies unchanged.
    pub fn heading_points(self) -> Option<f32> {
        match self {
            Self::Body => None,
            Self::Heading1 => Some(24.0),
            Self::Heading2 => Some(18.0),
        }
    }

    pub fn is_heading(self) -> bool {
        !matches!(self, Self::Body)
    }
}

/// A paragraph: a list of runs plus block-level formatting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    pub runs: Vec<Run>,
    pub alignment: Alignment,
    pub block: BlockFormat,
}

/// Byte index of character column `col` in `text` (end of string if past it).
fn byte_of(text: &str, col: usize) -> usize {
    text.char_indices().nth(col).map_or(text.len(), |(i, _)| i)
}

impl Paragraph {
    /// Create a single-run paragraph.
    pub fn from_text(text: impl Into<String>, style: RunStyle) -> Self {
        let text = text.into();
        let runs = if text.is_empty() {
            Vec::new()
        } else {
            vec![Run::new(text, style)]
        };
        Self {
            runs,
            ..Self::default()
        }
    }

    pub fn char_len(&self) -> usize {
        self.runs.iter().map(Run::char_len).sum()
    }

    /// Ensure a run boundary exists at `col` and return the index of the
    /// first run starting there.
    fn split_runs_at(&mut self, col: usize) -> usize {
        let mut remaining = col;
        for idx in 0..self.runs.len() {
            if remaining == 0 {
                return idx;
            }
            let len = self.runs[idx].char_len();
            if remaining < len {
                let byte = byte_of(&self.runs[idx].text, remaining);
                let tail = self.runs[idx].text.split_off(byte);
                let style = self.runs[idx].style;
                self.runs.insert(idx + 1, Run::new(tail, style));
                return idx + 1;
            }
            remaining -= len;
        }
        self.runs.len()
    }

    /// Insert styled text at character column `col`.
    pub fn insert(&mut self, col: usize, text: &str, style: RunStyle) {
        if text.is_empty() {
            return;
        }
        let idx = self.split_runs_at(col);
        self.runs.insert(idx, Run::new(text, style));
        self.coalesce();
    }

    /// Delete the characters in `cols`.
    pub fn delete(&mut self, cols: Range<usize>) {
        if cols.start >= cols.end {
            return;
        }
        let start = self.split_runs_at(cols.start);
        let end = self.split_runs_at(cols.end);
        self.runs.drain(start..end);
        self.coalesce();
    }

    /// Split at `col`, keeping the head and returning the tail. The tail
    /// inherits alignment and block format; callers adjust as needed.
    pub fn split_off(&mut self, col: usize) -> Paragraph {
        let idx = self.split_runs_at(col);
        Paragraph {
            runs: self.runs.split_off(idx),
            alignment: self.alignment,
            block: self.block,
        }
    }

    /// Append another paragraph's runs, keeping this paragraph's formatting.
    pub fn append(&mut self, mut other: Paragraph) {
        self.runs.append(&mut other.runs);
        self.coalesce();
    }

    /// Style governing the caret at `col`: the style of the character before
    /// it, or of the first run at the paragraph start. `None` when empty.
    pub fn style_at(&self, col: usize) -> Option<RunStyle> {
        if self.runs.is_empty() {
            return None;
        }
        if col == 0 {
            return Some(self.runs[0].style);
        }
        let mut remaining = col;
        for run in &self.runs {
            let len = run.char_len();
            if remaining <= len {
                return Some(run.style);
            }
            remaining -= len;
        }
        self.runs.last().map(|r| r.style)
    }

    /// Apply `f` to the style of every run segment covered by `cols`,
    /// splitting runs at the boundaries first.
    pub fn restyle(&mut self, cols: Range<usize>, f: &mut impl FnMut(&mut RunStyle)) {
        if cols.start >= cols.end {
            return;
        }
        let start = self.split_runs_at(cols.start);
        let end = self.split_runs_at(cols.end);
        for run in &mut self.runs[start..end] {
            f(&mut run.style);
        }
        self.coalesce();
    }

    /// Drop empty runs and merge adjacent runs with identical styles.
    fn coalesce(&mut self) {
        let mut merged: Vec<Run> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            if run.text.is_empty() {
                continue;
            }
            match merged.last_mut() {
                Some(last) if last.style == run.style => last.text.push_str(&run.text),
                _ => merged.push(run),
            }
        }
        self.runs = merged;
    }
}

/// A resolved position: paragraph index and character column within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub paragraph: usize,
    pub column: usize,
}

/// The canonical document: a non-empty list of paragraphs.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    paragraphs: Vec<Paragraph>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            paragraphs: vec![Paragraph::default()],
        }
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from explicit paragraphs. An empty list yields the
    /// default single empty paragraph.
    pub fn from_paragraphs(paragraphs: Vec<Paragraph>) -> Self {
        if paragraphs.is_empty() {
            Self::default()
        } else {
            Self { paragraphs }
        }
    }

    /// Build a document from plain text; line breaks become paragraphs.
    pub fn from_plain_text(text: &str, style: RunStyle) -> Self {
        let paragraphs = text
            .split('\n')
            .map(|line| Paragraph::from_text(line, style))
            .collect();
        Self::from_paragraphs(paragraphs)
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    /// True when the document holds no text at all.
    pub fn is_empty(&self) -> bool {
        self.paragraphs.len() == 1 && self.paragraphs[0].runs.is_empty()
    }

    /// Total character length, counting one separator per paragraph break.
    pub fn char_len(&self) -> usize {
        let text: usize = self.paragraphs.iter().map(Paragraph::char_len).sum();
        text + self.paragraphs.len().saturating_sub(1)
    }

    /// Plain-text projection: run text concatenated, paragraphs joined with
    /// `\n`, all formatting discarded.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for (idx, para) in self.paragraphs.iter().enumerate() {
            if idx > 0 {
                out.push('\n');
            }
            for run in &para.runs {
                out.push_str(&run.text);
            }
        }
        out
    }

    /// Resolve a character offset to a paragraph and column, clamping past
    /// the end of the document.
    pub fn locate(&self, offset: usize) -> Location {
        let mut remaining = offset;
        for (idx, para) in self.paragraphs.iter().enumerate() {
            let len = para.char_len();
            if remaining <= len {
                return Location {
                    paragraph: idx,
                    column: remaining,
                };
            }
            remaining -= len + 1;
        }
        Location {
            paragraph: self.paragraphs.len() - 1,
            column: self.paragraphs.last().map_or(0, Paragraph::char_len),
        }
    }

    /// Character offset of a resolved position.
    pub fn offset_of(&self, loc: Location) -> usize {
        let mut offset = 0;
        for para in &self.paragraphs[..loc.paragraph] {
            offset += para.char_len() + 1;
        }
        offset + loc.column
    }

    /// Insert text at `offset`; embedded line breaks become paragraph
    /// breaks. Returns the caret offset after the insertion.
    pub fn insert_text(&mut self, offset: usize, text: &str, style: RunStyle) -> usize {
        if text.is_empty() {
            return offset;
        }
        let mut caret = offset.min(self.char_len());
        let mut first = true;
        for line in text.split('\n') {
            if !first {
                self.split_paragraph(caret);
                caret += 1;
            }
            first = false;
            if !line.is_empty() {
                let loc = self.locate(caret);
                self.paragraphs[loc.paragraph].insert(loc.column, line, style);
                caret += line.chars().count();
            }
        }
        caret
    }

    /// Split the paragraph at `offset` in two. A split at the end of a
    /// heading starts the next paragraph as body text; splits elsewhere keep
    /// the block format on both halves.
    pub fn split_paragraph(&mut self, offset: usize) {
        let loc = self.locate(offset);
        let para = &mut self.paragraphs[loc.paragraph];
        let at_end = loc.column == para.char_len();
        let mut tail = para.split_off(loc.column);
        if at_end && tail.block.is_heading() {
            tail.block = BlockFormat::Body;
        }
        self.paragraphs.insert(loc.paragraph + 1, tail);
    }

    /// Delete the characters in `range`, merging paragraphs across removed
    /// separators. The merged paragraph keeps the first paragraph's
    /// formatting.
    pub fn delete_range(&mut self, range: Range<usize>) {
        if range.start >= range.end {
            return;
        }
        let start = self.locate(range.start);
        let end = self.locate(range.end);
        if start.paragraph == end.paragraph {
            self.paragraphs[start.paragraph].delete(start.column..end.column);
            return;
        }
        let tail = self.paragraphs[end.paragraph].split_off(end.column);
        let start_len = self.paragraphs[start.paragraph].char_len();
        self.paragraphs[start.paragraph].delete(start.column..start_len);
        self.paragraphs.drain(start.paragraph + 1..=end.paragraph);
        self.paragraphs[start.paragraph].append(tail);
    }

    /// Style governing the caret at `offset`. Empty paragraphs inherit from
    /// the end of the previous paragraph.
    pub fn style_at(&self, offset: usize) -> RunStyle {
        let loc = self.locate(offset);
        if let Some(style) = self.paragraphs[loc.paragraph].style_at(loc.column) {
            return style;
        }
        self.paragraphs[..loc.paragraph]
            .iter()
            .rev()
            .find_map(|p| p.style_at(p.char_len()))
            .unwrap_or_default()
    }

    /// Apply `f` to the style of every run segment covered by `range`.
    pub fn restyle(&mut self, range: Range<usize>, mut f: impl FnMut(&mut RunStyle)) {
        if range.start >= range.end {
            return;
        }
        let start = self.locate(range.start);
        let end = self.locate(range.end);
        for idx in start.paragraph..=end.paragraph {
            let para = &mut self.paragraphs[idx];
            let from = if idx == start.paragraph { start.column } else { 0 };
            let to = if idx == end.paragraph {
                end.column
            } else {
                para.char_len()
            };
            para.restyle(from..to, &mut f);
        }
    }

    /// Apply `f` to every paragraph touched by `range`. An empty range still
    /// touches the paragraph holding the caret.
    pub fn for_paragraphs_in(&mut self, range: Range<usize>, mut f: impl FnMut(&mut Paragraph)) {
        let start = self.locate(range.start);
        let end = self.locate(range.end.max(range.start));
        for idx in start.paragraph..=end.paragraph {
            f(&mut self.paragraphs[idx]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bold() -> RunStyle {
        RunStyle {
            bold: true,
            ..RunStyle::default()
        }
    }

    #[test]
    fn test_plain_text_joins_paragraphs_with_newline() {
        let doc = Document::from_plain_text("first\nsecond", RunStyle::default());
        assert_eq!(doc.plain_text(), "first\nsecond");
        assert_eq!(doc.char_len(), 12);
        assert_eq!(doc.paragraphs().len(), 2);
    }

    #[test]
    fn test_empty_document_has_one_paragraph() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.char_len(), 0);
        assert_eq!(doc.plain_text(), "");
    }

    #[test]
    fn test_insert_with_different_style_splits_run() {
        let mut doc = Document::from_plain_text("hello world", RunStyle::default());
        doc.insert_text(5, "!", bold());
        let runs = &doc.paragraphs()[0].runs;
        assert_eq!(runs.len(), 3);
        assert_eq!(runs[1].text, "!");
        assert!(runs[1].style.bold);
        assert_eq!(doc.plain_text(), "hello! world");
    }

    #[test]
    fn test_insert_with_same_style_coalesces() {
        let mut doc = Document::from_plain_text("ab", RunStyle::default());
        doc.insert_text(1, "x", RunStyle::default());
        assert_eq!(doc.paragraphs()[0].runs.len(), 1);
        assert_eq!(doc.plain_text(), "axb");
    }

    #[test]
    fn test_insert_multiline_creates_paragraphs() {
        let mut doc = Document::from_plain_text("startend", RunStyle::default());
        let caret = doc.insert_text(5, "one\ntwo", RunStyle::default());
        assert_eq!(doc.plain_text(), "startone\ntwoend");
        assert_eq!(caret, 12);
        assert_eq!(doc.paragraphs().len(), 2);
    }

    #[test]
    fn test_delete_across_paragraphs_merges() {
        let mut doc = Document::from_plain_text("abc\ndef\nghi", RunStyle::default());
        doc.delete_range(2..9);
        assert_eq!(doc.plain_text(), "abhi");
        assert_eq!(doc.paragraphs().len(), 1);
    }

    #[test]
    fn test_delete_separator_only_merges_paragraphs() {
        let mut doc = Document::from_plain_text("ab\ncd", RunStyle::default());
        doc.delete_range(2..3);
        assert_eq!(doc.plain_text(), "abcd");
        assert_eq!(doc.paragraphs().len(), 1);
    }

    #[test]
    fn test_split_at_end_of_heading_starts_body() {
        let mut doc = Document::from_plain_text("Title", RunStyle::default());
        doc.for_paragraphs_in(0..0, |p| p.block = BlockFormat::Heading1);
        doc.split_paragraph(5);
        assert_eq!(doc.paragraphs()[0].block, BlockFormat::Heading1);
        assert_eq!(doc.paragraphs()[1].block, BlockFormat::Body);
    }

    #[test]
    fn test_split_inside_heading_keeps_block() {
        let mut doc = Document::from_plain_text("Title", RunStyle::default());
        doc.for_paragraphs_in(0..0, |p| p.block = BlockFormat::Heading2);
        doc.split_paragraph(2);
        assert_eq!(doc.paragraphs()[0].block, BlockFormat::Heading2);
        assert_eq!(doc.paragraphs()[1].block, BlockFormat::Heading2);
    }

    #[test]
    fn test_restyle_partial_run_flips_only_segment() {
        let mut doc = Document::from_plain_text("abcdef", RunStyle::default());
        doc.restyle(2..4, |s| s.bold = !s.bold);
        let runs = &doc.paragraphs()[0].runs;
        assert_eq!(runs.len(), 3);
        assert!(!runs[0].style.bold);
        assert!(runs[1].style.bold);
        assert_eq!(runs[1].text, "cd");
        assert!(!runs[2].style.bold);
    }

    #[test]
    fn test_restyle_twice_restores_and_coalesces() {
        let mut doc = Document::from_plain_text("abcdef", RunStyle::default());
        doc.restyle(2..4, |s| s.bold = !s.bold);
        doc.restyle(2..4, |s| s.bold = !s.bold);
        assert_eq!(doc.paragraphs()[0].runs.len(), 1);
        assert!(!doc.paragraphs()[0].runs[0].style.bold);
    }

    #[test]
    fn test_style_at_uses_preceding_character() {
        let mut doc = Document::from_plain_text("ab", RunStyle::default());
        doc.restyle(0..1, |s| s.bold = true);
        assert!(doc.style_at(1).bold);
        assert!(!doc.style_at(2).bold);
        assert!(doc.style_at(0).bold);
    }

    #[test]
    fn test_style_at_empty_paragraph_inherits_previous() {
        let mut doc = Document::from_plain_text("ab", bold());
        doc.split_paragraph(2);
        assert!(doc.style_at(3).bold);
    }

    #[test]
    fn test_multibyte_insert_and_delete() {
        let mut doc = Document::from_plain_text("héllo", RunStyle::default());
        doc.insert_text(2, "€", bold());
        assert_eq!(doc.plain_text(), "hé€llo");
        doc.delete_range(2..3);
        assert_eq!(doc.plain_text(), "héllo");
    }

    #[test]
    fn test_locate_and_offset_round_trip() {
        let doc = Document::from_plain_text("ab\ncde\nf", RunStyle::default());
        for offset in 0..=doc.char_len() {
            assert_eq!(doc.offset_of(doc.locate(offset)), offset);
        }
        assert_eq!(doc.locate(3).paragraph, 1);
        assert_eq!(doc.locate(3).column, 0);
    }

    #[test]
    fn test_font_step_clamps_and_maps() {
        assert_eq!(FontStep::new(0).get(), 1);
        assert_eq!(FontStep::new(9).get(), 7);
        assert_eq!(FontStep::default().points(), 11.0);
        assert_eq!(FontStep::new(7).points(), 36.0);
    }
}
