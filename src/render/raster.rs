// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! PNG rendering of the contributor mosaic.
//!
//! Avatars are fetched on the async runtime, then decoding and drawing move to
//! a blocking worker. The produced image always has the canvas size computed
//! by [`compute_layout`], regardless of how many avatars could be loaded.

use std::sync::Arc;

use tiny_skia::{
    Color, FillRule, GradientStop, LinearGradient, Paint, PathBuilder, Pixmap, PixmapPaint,
    Point, Rect, Shader, SpreadMode, Stroke, Transform
};
use tracing::{debug, info};

use super::{
    avatar::{AvatarLoader, AvatarSlot, decode_avatars, fetch_avatars},
    style::{RenderStyle, Rgb},
    text::FontSet
};
use crate::{
    contributor::Contributor,
    error::Error,
    layout::{DEFAULT_AVATAR_DIAMETER, LayoutGeometry, compute_layout}
};

/// Vertical offset of the avatar shadow.
const SHADOW_OFFSET: f32 = 2.0;
/// Shadow rings as `(extra radius, alpha)`, drawn outermost first.
const SHADOW_LAYERS: [(f32, u8); 3] = [(4.0, 6), (2.5, 10), (1.0, 14)];
/// Width of the border drawn around every avatar.
const BORDER_WIDTH: f32 = 2.0;

/// Produces PNG mosaics from contributor lists.
#[derive(Clone)]
pub struct RasterRenderer {
    loader: Arc<dyn AvatarLoader>,
    fonts:  FontSet
}

impl RasterRenderer {
    /// Creates a renderer fetching avatars through `loader` and drawing text
    /// with `fonts`.
    pub fn new(loader: Arc<dyn AvatarLoader>, fonts: FontSet) -> Self {
        Self {
            loader,
            fonts
        }
    }

    /// Renders `contributors` under `title` and returns the encoded PNG.
    ///
    /// Avatar failures degrade to placeholders and never fail the render.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RenderFailure`] when the surface cannot be allocated,
    /// the PNG cannot be encoded, or the drawing worker is cancelled.
    pub async fn render(
        &self,
        contributors: &[Contributor],
        title: &str,
        style: &RenderStyle
    ) -> Result<Vec<u8>, Error> {
        let count = contributors.len();
        let layout = compute_layout(count, DEFAULT_AVATAR_DIAMETER);
        let fetched = fetch_avatars(self.loader.as_ref(), contributors).await;

        let contributors = contributors.to_vec();
        let title = title.to_owned();
        let style = *style;
        let fonts = self.fonts.clone();

        let png = tokio::task::spawn_blocking(move || {
            let slots = decode_avatars(&contributors, fetched, layout.avatar_diameter);
            paint(&layout, &contributors, &slots, &title, &style, &fonts)
        })
        .await
        .map_err(|e| Error::render(format!("raster worker did not complete: {e}")))??;

        info!(
            "Rendered {}x{} PNG for {} contributors",
            layout.canvas_width, layout.canvas_height, count
        );
        Ok(png)
    }
}

/// Draws the mosaic onto a fresh surface and encodes it as PNG.
///
/// `slots` is matched to `contributors` by index.
///
/// # Errors
///
/// Returns [`Error::RenderFailure`] when the surface cannot be allocated or
/// encoded.
pub fn paint(
    layout: &LayoutGeometry,
    contributors: &[Contributor],
    slots: &[AvatarSlot],
    title: &str,
    style: &RenderStyle,
    fonts: &FontSet
) -> Result<Vec<u8>, Error> {
    let width = layout.canvas_width;
    let height = layout.canvas_height;
    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| Error::render(format!("cannot allocate {width}x{height} surface")))?;

    paint_background(&mut pixmap, style)?;

    fonts.draw_centered(
        &mut pixmap,
        title,
        true,
        style.title_size,
        layout.center_x(),
        (layout.outer_padding + style.title_offset) as f32,
        style.title_color
    );

    let diameter = layout.avatar_diameter as f32;
    let radius = layout.radius();
    for (index, (contributor, slot)) in contributors.iter().zip(slots).enumerate() {
        let (x, y) = layout.cell_origin(index);
        let (left, top) = (x as f32, y as f32);
        let (cx, cy) = (left + radius, top + radius);

        match slot {
            AvatarSlot::Image(avatar) => {
                for (spread, alpha) in SHADOW_LAYERS {
                    fill_circle(
                        &mut pixmap,
                        cx,
                        cy + SHADOW_OFFSET,
                        radius + spread,
                        Color::from_rgba8(0, 0, 0, alpha)
                    );
                }
                pixmap.draw_pixmap(
                    x as i32,
                    y as i32,
                    avatar.as_ref(),
                    &PixmapPaint::default(),
                    Transform::identity(),
                    None
                );
                stroke_circle(&mut pixmap, cx, cy, radius, style.border_color);
            }
            AvatarSlot::Placeholder => {
                fill_circle(&mut pixmap, cx, cy, radius, color(style.placeholder_fill));
                stroke_circle(&mut pixmap, cx, cy, radius, style.border_color);
                fonts.draw_centered(
                    &mut pixmap,
                    &contributor.initial(),
                    false,
                    diameter / 3.0,
                    cx,
                    top + diameter / 2.0 + diameter / 8.0,
                    style.placeholder_text
                );
            }
        }
    }

    debug!("Encoding {}x{} surface", width, height);
    pixmap
        .encode_png()
        .map_err(|e| Error::render(format!("PNG encoding failed: {e}")))
}

fn paint_background(pixmap: &mut Pixmap, style: &RenderStyle) -> Result<(), Error> {
    let width = pixmap.width() as f32;
    let height = pixmap.height() as f32;

    let shader: Shader = LinearGradient::new(
        Point::from_xy(0.0, 0.0),
        Point::from_xy(0.0, height),
        vec![
            GradientStop::new(0.0, color(style.background_top)),
            GradientStop::new(1.0, color(style.background_bottom)),
        ],
        SpreadMode::Pad,
        Transform::identity()
    )
    .ok_or_else(|| Error::render("background gradient is degenerate"))?;

    let rect = Rect::from_xywh(0.0, 0.0, width, height)
        .ok_or_else(|| Error::render("background rectangle is empty"))?;
    let paint = Paint {
        shader,
        ..Paint::default()
    };
    pixmap.fill_rect(rect, &paint, Transform::identity(), None);
    Ok(())
}

fn fill_circle(pixmap: &mut Pixmap, cx: f32, cy: f32, radius: f32, fill: Color) {
    let Some(circle) = PathBuilder::from_circle(cx, cy, radius) else {
        return;
    };
    let mut paint = Paint::default();
    paint.set_color(fill);
    paint.anti_alias = true;
    pixmap.fill_path(&circle, &paint, FillRule::Winding, Transform::identity(), None);
}

fn stroke_circle(pixmap: &mut Pixmap, cx: f32, cy: f32, radius: f32, border: Rgb) {
    let Some(circle) = PathBuilder::from_circle(cx, cy, radius) else {
        return;
    };
    let mut paint = Paint::default();
    paint.set_color(color(border));
    paint.anti_alias = true;
    let stroke = Stroke {
        width: BORDER_WIDTH,
        ..Stroke::default()
    };
    pixmap.stroke_path(&circle, &paint, &stroke, Transform::identity(), None);
}

fn color(rgb: Rgb) -> Color {
    Color::from_rgba8(rgb.r, rgb.g, rgb.b, 255)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{StubAvatars, contributor, contributors};

    fn decode(png: &[u8]) -> image::RgbaImage {
        image::load_from_memory(png)
            .expect("renderer must emit a valid PNG")
            .to_rgba8()
    }

    #[tokio::test]
    async fn unreachable_avatars_keep_canvas_dimensions() {
        let loader = StubAvatars::unreachable();
        let renderer = RasterRenderer::new(loader.clone(), FontSet::empty());
        let contributors = contributors(13);

        let png = renderer
            .render(&contributors, "Contributors to acme/widgets", &RenderStyle::badge())
            .await
            .expect("render should succeed");

        let expected = compute_layout(13, DEFAULT_AVATAR_DIAMETER);
        let image = decode(&png);
        assert_eq!(image.dimensions(), (expected.canvas_width, expected.canvas_height));
        assert_eq!(loader.requests(), 13);
    }

    #[tokio::test]
    async fn empty_list_renders_header_only_image() {
        let renderer = RasterRenderer::new(StubAvatars::unreachable(), FontSet::empty());

        let png = renderer
            .render(&[], "Contributors to acme/empty", &RenderStyle::showcase())
            .await
            .expect("render should succeed");

        assert_eq!(decode(&png).dimensions(), (120, 120));
    }

    #[tokio::test]
    async fn loaded_avatar_is_drawn_and_failed_one_is_placeholder() {
        let loaded = contributor("octocat");
        let missing = contributor("ghost");
        let loader = StubAvatars::serving(&[loaded.avatar_url.as_str()]);
        let renderer = RasterRenderer::new(loader, FontSet::empty());
        let style = RenderStyle::badge();

        let png = renderer
            .render(&[loaded, missing], "Contributors to acme/widgets", &style)
            .await
            .expect("render should succeed");
        let image = decode(&png);

        let layout = compute_layout(2, DEFAULT_AVATAR_DIAMETER);
        let center = |index: usize| {
            let (x, y) = layout.cell_origin(index);
            (x + 30, y + 30)
        };

        let (x, y) = center(0);
        let avatar = image.get_pixel(x, y).0;
        assert!(avatar[0].abs_diff(200) <= 2 && avatar[1].abs_diff(40) <= 2, "{avatar:?}");

        let (x, y) = center(1);
        let fill = style.placeholder_fill;
        assert_eq!(image.get_pixel(x, y).0, [fill.r, fill.g, fill.b, 255]);
    }

    #[test]
    fn border_is_centred_on_the_avatar_edge() {
        let layout = compute_layout(1, DEFAULT_AVATAR_DIAMETER);
        let style = RenderStyle::badge();
        let png = paint(
            &layout,
            &[contributor("octocat")],
            &[AvatarSlot::Placeholder],
            "",
            &style,
            &FontSet::empty()
        )
        .expect("paint");
        let image = decode(&png);

        let (x, y) = layout.cell_origin(0);
        let border = style.border_color;
        let outer_half = image.get_pixel(x + 30, y - 1).0;
        assert!(
            outer_half[0].abs_diff(border.r) <= 2 && outer_half[2].abs_diff(border.b) <= 2,
            "{outer_half:?}"
        );
        let outside = image.get_pixel(x + 30, y - 3).0;
        assert!(outside[0].abs_diff(border.r) > 8, "{outside:?}");
    }

    #[test]
    fn paint_draws_gradient_background() {
        let layout = compute_layout(0, DEFAULT_AVATAR_DIAMETER);
        let style = RenderStyle::showcase();
        let png = paint(&layout, &[], &[], "", &style, &FontSet::empty()).expect("paint");
        let image = decode(&png);

        let top = image.get_pixel(0, 0).0;
        let bottom = image.get_pixel(0, layout.canvas_height - 1).0;
        assert!(top[0] >= bottom[0]);
        assert!(bottom[0] >= 0xf8);
        assert!(image.pixels().all(|pixel| pixel.0[3] == 255));
    }
}
