//! Font lookup and text measurement for the export layout.
//!
//! Faces come from the fonts installed on the system via `fontdb`; advances
//! are read with `ttf-parser`. When no face matches, measurement falls back
//! to a fixed half-em advance per character so layout stays deterministic.

use std::sync::Arc;

use resvg::usvg::fontdb;

use crate::export::layout::TextStyle;

/// Advance per character, in em, when no font face is available.
const FALLBACK_ADVANCE_EM: f32 = 0.5;

/// Font database shared by the layout measurement and the rasterizer.
#[derive(Clone)]
pub struct FontCatalog {
    db: Arc<fontdb::Database>,
}

impl FontCatalog {
    /// Catalog backed by the fonts installed on the system.
    pub fn system() -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded system fonts");
        Self { db: Arc::new(db) }
    }

    /// Catalog with no faces; every measurement uses the fallback advance.
    pub fn empty() -> Self {
        Self {
            db: Arc::new(fontdb::Database::new()),
        }
    }

    /// Shared database handle for the rasterizer.
    pub fn database(&self) -> Arc<fontdb::Database> {
        self.db.clone()
    }

    fn face_id(&self, style: &TextStyle) -> Option<fontdb::ID> {
        let fallback = if style.font.is_serif() {
            fontdb::Family::Serif
        } else {
            fontdb::Family::SansSerif
        };
        let families = [fontdb::Family::Name(style.font.family_name()), fallback];
        let query = fontdb::Query {
            families: &families,
            weight: if style.bold {
                fontdb::Weight::BOLD
            } else {
                fontdb::Weight::NORMAL
            },
            stretch: fontdb::Stretch::Normal,
            style: if style.italic {
                fontdb::Style::Italic
            } else {
                fontdb::Style::Normal
            },
        };
        self.db.query(&query)
    }

    /// Width of `text` in pixels at the style's pixel size.
    pub fn measure(&self, text: &str, style: &TextStyle) -> f32 {
        let px = style.size_px();
        let measured = self.face_id(style).and_then(|id| {
            self.db
                .with_face_data(id, |data, index| {
                    let face = ttf_parser::Face::parse(data, index).ok()?;
                    let upem = f32::from(face.units_per_em());
                    if upem <= 0.0 {
                        return None;
                    }
                    let mut units = 0.0f32;
                    for ch in text.chars() {
                        let advance = face
                            .glyph_index(ch)
                            .and_then(|gid| face.glyph_hor_advance(gid))
                            .map_or(upem * FALLBACK_ADVANCE_EM, f32::from);
                        units += advance;
                    }
                    Some(units * px / upem)
                })
                .flatten()
        });
        measured.unwrap_or_else(|| px * FALLBACK_ADVANCE_EM * text.chars().count() as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::document::RunStyle;
    use crate::export::layout::TextStyle;

    fn body() -> TextStyle {
        TextStyle::resolve(&RunStyle::default(), crate::core::document::BlockFormat::Body)
    }

    #[test]
    fn test_empty_catalog_uses_fallback_advance() {
        let catalog = FontCatalog::empty();
        let style = body();
        let expected = style.size_px() * FALLBACK_ADVANCE_EM * 4.0;
        assert!((catalog.measure("abcd", &style) - expected).abs() < 1e-3);
    }

    #[test]
    fn test_measure_empty_text_is_zero() {
        let catalog = FontCatalog::empty();
        assert_eq!(catalog.measure("", &body()), 0.0);
    }

    #[test]
    fn test_measure_scales_with_size() {
        let catalog = FontCatalog::empty();
        let small = body();
        let mut large = body();
        large.size_pt = small.size_pt * 2.0;
        let text = "measure";
        assert!(catalog.measure(text, &large) > catalog.measure(text, &small));
    }
}
