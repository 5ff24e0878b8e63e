// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Glyph rasterization for the PNG renderer.
//!
//! Fonts are discovered once through `fontdb` and kept in memory. Text is
//! drawn by converting `ttf-parser` glyph outlines into `tiny-skia` paths, so
//! no shaping engine is involved: glyphs are laid out by their horizontal
//! advances, which is sufficient for titles and single initials.

use std::{path::Path, sync::Arc};

use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Transform};
use tracing::{debug, warn};

use super::style::Rgb;
use crate::error::{self, Error};

/// Families tried, in order, when resolving the sans-serif face.
const SANS_SERIF_FALLBACKS: &[&str] = &[
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "Helvetica",
    "Arial"
];

/// Raw font bytes plus the face index inside the collection.
#[derive(Debug, Clone)]
struct Typeface {
    data:  Arc<Vec<u8>>,
    index: u32
}

/// Regular and bold faces used by the raster renderer.
///
/// Either face may be missing; drawing then becomes a no-op for text while
/// the rest of the image is still produced.
#[derive(Debug, Clone, Default)]
pub struct FontSet {
    regular: Option<Typeface>,
    bold:    Option<Typeface>
}

impl FontSet {
    /// Loads faces from the system font directories.
    pub fn system() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        let fonts = Self::from_database(&db);
        if fonts.is_empty() {
            warn!("No sans-serif system font found; PNG text will be omitted");
        }
        fonts
    }

    /// Loads faces from a specific font file, typically configured for
    /// containers without system fonts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigIo`] when the file cannot be read.
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let mut db = Database::new();
        db.load_font_file(path)
            .map_err(|source| error::config_io_error(path, source))?;
        Ok(Self::from_database(&db))
    }

    /// A font set without faces; all text drawing is skipped.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns `true` when no face could be resolved.
    pub fn is_empty(&self) -> bool {
        self.regular.is_none() && self.bold.is_none()
    }

    fn from_database(db: &Database) -> Self {
        let regular = resolve_face(db, Weight::NORMAL);
        let bold = resolve_face(db, Weight::BOLD);
        Self {
            bold: bold.or_else(|| regular.clone()),
            regular
        }
    }

    /// Draws `text` horizontally centred on `center_x` with its baseline at
    /// `baseline`.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn draw_centered(
        &self,
        pixmap: &mut Pixmap,
        text: &str,
        bold: bool,
        size: f32,
        center_x: f32,
        baseline: f32,
        color: Rgb
    ) {
        let typeface = if bold {
            self.bold.as_ref()
        } else {
            self.regular.as_ref()
        };
        let Some(typeface) = typeface else {
            return;
        };
        let Ok(face) = ttf_parser::Face::parse(&typeface.data, typeface.index) else {
            warn!("Configured font could not be parsed; skipping text '{}'", text);
            return;
        };

        let scale = size / f32::from(face.units_per_em());
        let glyphs: Vec<ttf_parser::GlyphId> = text
            .chars()
            .map(|c| face.glyph_index(c).unwrap_or(ttf_parser::GlyphId(0)))
            .collect();
        let advance = |glyph: ttf_parser::GlyphId| {
            f32::from(face.glyph_hor_advance(glyph).unwrap_or(0)) * scale
        };
        let width: f32 = glyphs.iter().copied().map(advance).sum();

        let mut paint = Paint::default();
        paint.set_color_rgba8(color.r, color.g, color.b, 255);
        paint.anti_alias = true;

        let mut pen_x = center_x - width / 2.0;
        for glyph in glyphs {
            let mut sink = OutlineSink {
                builder: PathBuilder::new()
            };
            if face.outline_glyph(glyph, &mut sink).is_some() {
                if let Some(path) = sink.builder.finish() {
                    let transform = Transform::from_row(scale, 0.0, 0.0, -scale, pen_x, baseline);
                    pixmap.fill_path(&path, &paint, FillRule::Winding, transform, None);
                }
            }
            pen_x += advance(glyph);
        }
    }
}

fn resolve_face(db: &Database, weight: Weight) -> Option<Typeface> {
    let mut families = vec![Family::SansSerif];
    families.extend(SANS_SERIF_FALLBACKS.iter().copied().map(Family::Name));

    let query = Query {
        families: &families,
        weight,
        stretch: Stretch::Normal,
        style: Style::Normal
    };

    let id = db
        .query(&query)
        .or_else(|| db.faces().next().map(|face| face.id))?;

    let typeface = db.with_face_data(id, |data, index| Typeface {
        data: Arc::new(data.to_vec()),
        index
    })?;
    debug!("Resolved font face {:?} for weight {}", id, weight.0);
    Some(typeface)
}

struct OutlineSink {
    builder: PathBuilder
}

impl ttf_parser::OutlineBuilder for OutlineSink {
    fn move_to(&mut self, x: f32, y: f32) {
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}
