//! Page rasterization for the PDF export.
//!
//! Each laid-out page is rendered to an SVG document (white background,
//! absolutely positioned text spans), rasterized with `resvg` at the
//! supersampling scale, and encoded as a JPEG page image.

use std::fmt::Write as _;

use image::codecs::jpeg::JpegEncoder;

use crate::export::fonts::FontCatalog;
use crate::export::layout::{Page, PageGeometry};
use crate::export::ExportError;

/// Supersampling factor applied when rasterizing pages.
pub const RASTER_SCALE: f32 = 2.0;
/// JPEG quality for page images.
pub const JPEG_QUALITY: u8 = 98;

const TEXT_COLOR: &str = "#000000";

/// A rasterized page ready for PDF embedding.
pub struct RenderedPage {
    pub jpeg: Vec<u8>,
    pub width_px: u32,
    pub height_px: u32,
}

/// Escape a string for use in SVG text content or attribute values.
fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render one page to an SVG document in page-pixel coordinates.
pub fn page_to_svg(page: &Page, geometry: &PageGeometry) -> String {
    let mut svg = String::new();
    let _ = write!(
        svg,
        concat!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" ",
            "width=\"{w:.2}\" height=\"{h:.2}\" ",
            "viewBox=\"0 0 {w:.2} {h:.2}\" xml:space=\"preserve\">",
        ),
        w = geometry.width,
        h = geometry.height,
    );
    let _ = write!(
        svg,
        "<rect x=\"0\" y=\"0\" width=\"{:.2}\" height=\"{:.2}\" fill=\"#ffffff\"/>",
        geometry.width, geometry.height,
    );
    for line in &page.lines {
        for span in &line.spans {
            let family = if span.style.font.is_serif() {
                format!("'{}', serif", span.style.font.family_name())
            } else {
                format!("'{}', sans-serif", span.style.font.family_name())
            };
            let _ = write!(
                svg,
                "<text x=\"{:.2}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"{:.2}\" fill=\"{}\"",
                span.x,
                line.baseline,
                escape_xml(&family),
                span.style.size_px(),
                TEXT_COLOR,
            );
            if span.style.bold {
                svg.push_str(" font-weight=\"bold\"");
            }
            if span.style.italic {
                svg.push_str(" font-style=\"italic\"");
            }
            if span.style.underline {
                svg.push_str(" text-decoration=\"underline\"");
            }
            let _ = write!(svg, ">{}</text>", escape_xml(&span.text));
        }
    }
    svg.push_str("</svg>");
    svg
}

/// Rasterize one page and encode it as a JPEG image.
///
/// Missing fonts degrade to the rasterizer's fallback faces (or blank text)
/// rather than failing; only pixmap allocation, SVG parsing, and JPEG
/// encoding are treated as errors.
pub fn render_page(
    page_index: usize,
    page: &Page,
    geometry: &PageGeometry,
    fonts: &FontCatalog,
    scale: f32,
) -> Result<RenderedPage, ExportError> {
    let svg = page_to_svg(page, geometry);
    let render_error = |reason: String| ExportError::PageRender {
        page: page_index + 1,
        reason,
    };

    let options = resvg::usvg::Options {
        fontdb: fonts.database(),
        ..Default::default()
    };
    let tree =
        resvg::usvg::Tree::from_str(&svg, &options).map_err(|e| render_error(e.to_string()))?;

    let width = (geometry.width * scale).ceil() as u32;
    let height = (geometry.height * scale).ceil() as u32;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| render_error(format!("could not allocate a {width}x{height} pixmap")))?;
    pixmap.fill(resvg::tiny_skia::Color::WHITE);

    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );

    // Opaque white background, so dropping the alpha channel is lossless.
    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    for pixel in pixmap.data().chunks_exact(4) {
        rgb.extend_from_slice(&pixel[..3]);
    }

    let mut jpeg = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY);
    encoder.encode(&rgb, width, height, image::ExtendedColorType::Rgb8)?;

    Ok(RenderedPage {
        jpeg,
        width_px: width,
        height_px: height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::document::{Document, RunStyle};
    use crate::export::layout::{paginate, PageGeometry};

    fn tiny_geometry() -> PageGeometry {
        PageGeometry {
            width: 100.0,
            height: 120.0,
            margin: 10.0,
        }
    }

    #[test]
    fn test_escape_xml_handles_markup_characters() {
        assert_eq!(
            escape_xml(r#"<a & "b">"#),
            "&lt;a &amp; &quot;b&quot;&gt;"
        );
    }

    #[test]
    fn test_svg_contains_escaped_text_and_styles() {
        let mut doc = Document::from_plain_text("a<b", RunStyle::default());
        doc.restyle(0..3, |s| {
            s.bold = true;
            s.italic = true;
            s.underline = true;
        });
        let geometry = tiny_geometry();
        let pages = paginate(&doc, &FontCatalog::empty(), geometry);
        let svg = page_to_svg(&pages[0], &geometry);
        assert!(svg.contains("a&lt;b"));
        assert!(svg.contains("font-weight=\"bold\""));
        assert!(svg.contains("font-style=\"italic\""));
        assert!(svg.contains("text-decoration=\"underline\""));
        assert!(svg.contains("'Times New Roman', serif"));
    }

    #[test]
    fn test_blank_page_svg_is_just_background() {
        let geometry = tiny_geometry();
        let pages = paginate(&Document::new(), &FontCatalog::empty(), geometry);
        let svg = page_to_svg(&pages[0], &geometry);
        assert!(!svg.contains("<text"));
        assert!(svg.contains("fill=\"#ffffff\""));
    }

    #[test]
    fn test_render_page_produces_scaled_jpeg() {
        let geometry = tiny_geometry();
        let fonts = FontCatalog::empty();
        let doc = Document::from_plain_text("hello", RunStyle::default());
        let pages = paginate(&doc, &fonts, geometry);
        let rendered = render_page(0, &pages[0], &geometry, &fonts, 2.0).unwrap();
        assert_eq!(rendered.width_px, 200);
        assert_eq!(rendered.height_px, 240);
        // JPEG SOI marker.
        assert_eq!(&rendered.jpeg[..2], &[0xFF, 0xD8]);
    }
}
