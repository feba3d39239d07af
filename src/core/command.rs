//! Formatting commands and their dispatch against the editor state.

use crate::core::document::{Alignment, BlockFormat, FontFamilyChoice, FontStep};
use crate::core::editor::EditorState;

/// Heading level reachable from the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingLevel {
    One,
    Two,
}

impl HeadingLevel {
    pub fn block(self) -> BlockFormat {
        match self {
            Self::One => BlockFormat::Heading1,
            Self::Two => BlockFormat::Heading2,
        }
    }
}

/// A discrete formatting action from the toolbar or a keyboard shortcut.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Bold,
    Italic,
    Underline,
    Justify(Alignment),
    Heading(HeadingLevel),
    FontName(FontFamilyChoice),
    FontSize(FontStep),
}

/// Apply a command to the current selection or caret.
///
/// Character toggles flip the flag on every covered run segment, so applying
/// the same command twice over an unchanged selection restores the previous
/// formatting. At a collapsed caret they stage a pending style for the next
/// insertion instead. Alignment toggles between the commanded value and the
/// default; headings are set-only. Dispatch never fails: an unsupported
/// position simply degrades to a pending-style or single-paragraph effect.
pub fn dispatch(state: &mut EditorState, command: Command) {
    match command {
        Command::Bold => state.restyle_selection(|s| s.bold = !s.bold),
        Command::Italic => state.restyle_selection(|s| s.italic = !s.italic),
        Command::Underline => state.restyle_selection(|s| s.underline = !s.underline),
        Command::Justify(alignment) => state.for_selected_paragraphs(|p| {
            p.alignment = if p.alignment == alignment {
                Alignment::default()
            } else {
                alignment
            };
        }),
        Command::Heading(level) => {
            let block = level.block();
            state.for_selected_paragraphs(move |p| p.block = block);
        }
        Command::FontName(font) => state.restyle_selection(move |s| s.font = font),
        Command::FontSize(size) => state.restyle_selection(move |s| s.size = size),
    }
}
