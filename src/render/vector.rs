// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! SVG rendering of the contributor mosaic.
//!
//! Avatars are referenced by URL instead of being embedded, so the renderer
//! performs no I/O. Each avatar is wrapped in a link to the contributor's
//! profile with a hover tooltip.

use std::{borrow::Cow, fmt::Write};

use super::style::{FONT_STACK, RenderStyle};
use crate::{
    contributor::Contributor,
    layout::{DEFAULT_AVATAR_DIAMETER, compute_layout}
};

/// Renders `contributors` under `title` as a standalone SVG document.
///
/// Positions come from the same layout as the raster renderer so both outputs
/// line up. All dynamic text and attribute values are XML-escaped.
///
/// # Examples
///
/// ```
/// use contributor_mosaic::render::{RenderStyle, render_vector};
///
/// let svg = render_vector(&[], "Contributors to acme/widgets", &RenderStyle::badge());
/// assert!(svg.starts_with("<svg width=\"120\" height=\"120\""));
/// assert!(svg.contains("Contributors to acme/widgets"));
/// ```
pub fn render_vector(contributors: &[Contributor], title: &str, style: &RenderStyle) -> String {
    let layout = compute_layout(contributors.len(), DEFAULT_AVATAR_DIAMETER);
    let width = layout.canvas_width;
    let height = layout.canvas_height;
    let radius = layout.radius();
    let border = style.border_color.css();

    let mut buffer = String::with_capacity(1024 + contributors.len() * 640);

    if style.responsive {
        let _ = write!(
            buffer,
            "<svg width=\"100%\" height=\"100%\" viewBox=\"0 0 {width} {height}\" xmlns=\"http://www.w3.org/2000/svg\" preserveAspectRatio=\"xMidYMid meet\" style=\"max-width: 100%; height: auto; display: block;\">",
        );
    } else {
        let _ = write!(
            buffer,
            "<svg width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\" xmlns=\"http://www.w3.org/2000/svg\">",
        );
    }

    let _ = writeln!(
        buffer,
        "<defs>\n  <linearGradient id=\"bg\" x1=\"0%\" y1=\"0%\" x2=\"0%\" y2=\"100%\">\n    <stop offset=\"0%\" style=\"stop-color:{};stop-opacity:1\"/>\n    <stop offset=\"100%\" style=\"stop-color:{};stop-opacity:1\"/>\n  </linearGradient>\n  <filter id=\"shadow\" x=\"-50%\" y=\"-50%\" width=\"200%\" height=\"200%\">\n    <feDropShadow dx=\"0\" dy=\"2\" stdDeviation=\"4\" flood-color=\"rgba(0,0,0,0.1)\"/>\n  </filter>\n</defs>",
        style.background_top.css(),
        style.background_bottom.css(),
    );
    let _ = writeln!(buffer, "<rect width=\"{width}\" height=\"{height}\" fill=\"url(#bg)\"/>");
    let _ = writeln!(
        buffer,
        "<text x=\"{}\" y=\"{}\" font-family=\"{FONT_STACK}\" font-size=\"{}\" font-weight=\"bold\" text-anchor=\"middle\" fill=\"{}\">{}</text>",
        layout.center_x(),
        layout.outer_padding + style.title_offset,
        style.title_size,
        style.title_color.css(),
        escape_xml(title),
    );

    for (index, contributor) in contributors.iter().enumerate() {
        let (x, y) = layout.cell_origin(index);
        let cx = x as f32 + radius;
        let cy = y as f32 + radius;
        let size = layout.avatar_diameter;
        let avatar = escape_xml(&contributor.avatar_url);
        let profile = escape_xml(&contributor.profile_url);
        let tooltip_text = contributor.tooltip();
        let tooltip = escape_xml(&tooltip_text);

        let _ = writeln!(
            buffer,
            "<defs><clipPath id=\"clip{index}\"><circle cx=\"{cx}\" cy=\"{cy}\" r=\"{radius}\"/></clipPath></defs>",
        );
        let _ = writeln!(
            buffer,
            "<g filter=\"url(#shadow)\"><image x=\"{x}\" y=\"{y}\" width=\"{size}\" height=\"{size}\" href=\"{avatar}\" clip-path=\"url(#clip{index})\"/><circle cx=\"{cx}\" cy=\"{cy}\" r=\"{radius}\" fill=\"none\" stroke=\"{border}\" stroke-width=\"2\"/></g>",
        );
        let _ = writeln!(
            buffer,
            "<a href=\"{profile}\" target=\"_blank\"><circle cx=\"{cx}\" cy=\"{cy}\" r=\"{radius}\" fill=\"transparent\" cursor=\"pointer\"/><title>{tooltip}</title></a>",
        );
    }

    buffer.push_str("</svg>\n");
    buffer
}

fn escape_xml(value: &str) -> Cow<'_, str> {
    if !value
        .chars()
        .any(|character| matches!(character, '&' | '<' | '>' | '"' | '\''))
    {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 16);
    for character in value.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other)
        }
    }
    Cow::Owned(escaped)
}
