//! PDF assembly: one rasterized JPEG per A4 page via `pdf-writer`.

use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref};

use crate::core::document::Document;
use crate::export::fonts::FontCatalog;
use crate::export::layout::{paginate, PageGeometry, PT_PER_IN, PX_PER_IN};
use crate::export::raster::{render_page, RASTER_SCALE};
use crate::export::ExportError;

const IMAGE_NAME: Name<'static> = Name(b"Pg");

/// Build the PDF byte stream for the document's visual projection.
///
/// The document is laid out onto A4 pages, each page rasterized to a JPEG at
/// the supersampling scale, and the images embedded one per page. Output is
/// image-based; the pages carry no selectable text.
pub fn build_pdf(document: &Document, fonts: &FontCatalog) -> Result<Vec<u8>, ExportError> {
    let geometry = PageGeometry::default();
    let pages = paginate(document, fonts, geometry);

    let mut rendered = Vec::with_capacity(pages.len());
    for (index, page) in pages.iter().enumerate() {
        rendered.push(render_page(index, page, &geometry, fonts, RASTER_SCALE)?);
    }

    // Page dimensions in PDF points.
    let page_w = geometry.width / PX_PER_IN * PT_PER_IN;
    let page_h = geometry.height / PX_PER_IN * PT_PER_IN;

    let mut pdf = Pdf::new();
    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let page_ids: Vec<Ref> = (0..rendered.len())
        .map(|i| Ref::new(3 + 3 * i as i32))
        .collect();

    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id)
        .kids(page_ids.iter().copied())
        .count(rendered.len() as i32);

    for (index, page) in rendered.iter().enumerate() {
        let page_id = page_ids[index];
        let image_id = Ref::new(4 + 3 * index as i32);
        let content_id = Ref::new(5 + 3 * index as i32);

        let mut page_writer = pdf.page(page_id);
        page_writer.media_box(Rect::new(0.0, 0.0, page_w, page_h));
        page_writer.parent(page_tree_id);
        page_writer.contents(content_id);
        page_writer
            .resources()
            .x_objects()
            .pair(IMAGE_NAME, image_id);
        page_writer.finish();

        let mut image = pdf.image_xobject(image_id, &page.jpeg);
        image.filter(Filter::DctDecode);
        image.width(page.width_px as i32);
        image.height(page.height_px as i32);
        image.color_space().device_rgb();
        image.bits_per_component(8);
        image.finish();

        // Stretch the unit image square over the full page.
        let mut content = Content::new();
        content.save_state();
        content.transform([page_w, 0.0, 0.0, page_h, 0.0, 0.0]);
        content.x_object(IMAGE_NAME);
        content.restore_state();
        pdf.stream(content_id, &content.finish());
    }

    Ok(pdf.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::document::RunStyle;

    fn pdf_text(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }

    #[test]
    fn test_empty_document_is_a_single_blank_page() {
        let bytes = build_pdf(&Document::new(), &FontCatalog::empty()).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        let text = pdf_text(&bytes);
        assert!(text.contains("/Count 1"));
        assert!(text.contains("/DCTDecode"));
    }

    #[test]
    fn test_long_document_spans_multiple_pages() {
        let content = vec!["paragraph of body text"; 120].join("\n");
        let doc = Document::from_plain_text(&content, RunStyle::default());
        let bytes = build_pdf(&doc, &FontCatalog::empty()).unwrap();
        let text = pdf_text(&bytes);
        let count = text
            .split("/Count ")
            .nth(1)
            .and_then(|rest| rest.split(|c: char| !c.is_ascii_digit()).next())
            .and_then(|digits| digits.parse::<usize>().ok())
            .unwrap();
        assert!(count > 1, "expected more than one page, got {count}");
    }

    #[test]
    fn test_media_box_is_a4_points() {
        let bytes = build_pdf(&Document::new(), &FontCatalog::empty()).unwrap();
        let text = pdf_text(&bytes);
        assert!(text.contains("/MediaBox [0 0 595."));
    }
}
