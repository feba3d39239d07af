//! DOCX serialization of the plain-text projection via `docx-rs`.

use std::io::Cursor;

use docx_rs::{Docx, Paragraph, Run};

use crate::core::document::Document;
use crate::export::ExportError;

/// Build the DOCX byte stream: one paragraph holding one unstyled run whose
/// text is the plain-text projection verbatim. An empty document produces a
/// paragraph with zero runs. Line breaks stay literal characters of the
/// single run; they are not promoted to paragraph boundaries.
pub fn build_docx(document: &Document) -> Result<Vec<u8>, ExportError> {
    let text = document.plain_text();
    let mut paragraph = Paragraph::new();
    if !text.is_empty() {
        paragraph = paragraph.add_run(Run::new().add_text(text));
    }

    let mut buffer = Cursor::new(Vec::new());
    Docx::new()
        .add_paragraph(paragraph)
        .build()
        .pack(&mut buffer)
        .map_err(|e| ExportError::DocxBuild(e.to_string()))?;
    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::document::RunStyle;

    /// Collect the text of every run per paragraph from packed DOCX bytes.
    fn paragraph_texts(bytes: &[u8]) -> Vec<Vec<String>> {
        let docx = docx_rs::read_docx(bytes).unwrap();
        let mut paragraphs = Vec::new();
        for child in &docx.document.children {
            if let docx_rs::DocumentChild::Paragraph(p) = child {
                let mut runs = Vec::new();
                for pc in &p.children {
                    if let docx_rs::ParagraphChild::Run(r) = pc {
                        for rc in &r.children {
                            if let docx_rs::RunChild::Text(t) = rc {
                                runs.push(t.text.clone());
                            }
                        }
                    }
                }
                paragraphs.push(runs);
            }
        }
        paragraphs
    }

    #[test]
    fn test_single_paragraph_single_run_verbatim() {
        let doc = Document::from_plain_text("Name: Jane Doe", RunStyle::default());
        let bytes = build_docx(&doc).unwrap();
        let paragraphs = paragraph_texts(&bytes);
        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0], vec!["Name: Jane Doe".to_string()]);
    }

    #[test]
    fn test_formatting_is_discarded() {
        let mut doc = Document::from_plain_text("Name: Jane Doe", RunStyle::default());
        doc.restyle(0..14, |s| s.bold = true);
        let bytes = build_docx(&doc).unwrap();
        // The projection flattens styling into a single unstyled run.
        let paragraphs = paragraph_texts(&bytes);
        assert_eq!(paragraphs[0].len(), 1);
        assert_eq!(paragraphs[0][0], "Name: Jane Doe");
    }

    #[test]
    fn test_line_breaks_stay_inside_the_single_paragraph() {
        let doc = Document::from_plain_text("one\ntwo", RunStyle::default());
        let bytes = build_docx(&doc).unwrap();
        let paragraphs = paragraph_texts(&bytes);
        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0], vec!["one\ntwo".to_string()]);
    }

    #[test]
    fn test_empty_document_packs_zero_run_paragraph() {
        let bytes = build_docx(&Document::new()).unwrap();
        let paragraphs = paragraph_texts(&bytes);
        assert_eq!(paragraphs.len(), 1);
        assert!(paragraphs[0].is_empty());
        // Still a valid ZIP container.
        assert_eq!(&bytes[..2], b"PK");
    }
}
