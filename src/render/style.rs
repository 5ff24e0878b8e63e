// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Fixed visual presets shared by the raster and vector renderers.
//!
//! Two presets exist: the showcase look returned by the JSON endpoint and the
//! compact badge look served by the direct image endpoint. Presets are not
//! user-selectable.

/// Font stack referenced by the vector renderer.
pub(crate) const FONT_STACK: &str =
    "-apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif";

/// Hex colour used by both renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8
}

impl Rgb {
    /// Parses a `#rrggbb` literal at compile time.
    pub const fn hex(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xff) as u8,
            g: ((value >> 8) & 0xff) as u8,
            b: (value & 0xff) as u8
        }
    }

    /// CSS representation used in SVG attributes.
    pub fn css(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Visual preset consumed by both renderers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStyle {
    /// Gradient colour at the top edge.
    pub background_top:    Rgb,
    /// Gradient colour at the bottom edge.
    pub background_bottom: Rgb,
    /// Title fill colour.
    pub title_color:       Rgb,
    /// Title font size in pixels.
    pub title_size:        f32,
    /// Title baseline, measured from the top of the outer padding.
    pub title_offset:      u32,
    /// Avatar border stroke colour.
    pub border_color:      Rgb,
    /// Placeholder circle fill.
    pub placeholder_fill:  Rgb,
    /// Placeholder initial colour.
    pub placeholder_text:  Rgb,
    /// Whether the SVG root scales to its container.
    pub responsive:        bool
}

impl RenderStyle {
    /// Look used for the combined JSON response.
    pub const fn showcase() -> Self {
        Self {
            background_top:    Rgb::hex(0xffffff),
            background_bottom: Rgb::hex(0xf8fafc),
            title_color:       Rgb::hex(0x1f2937),
            title_size:        24.0,
            title_offset:      30,
            border_color:      Rgb::hex(0xe5e7eb),
            placeholder_fill:  Rgb::hex(0xf3f4f6),
            placeholder_text:  Rgb::hex(0x9ca3af),
            responsive:        true
        }
    }

    /// Look used for the direct image endpoint and CLI artifacts.
    pub const fn badge() -> Self {
        Self {
            background_top:    Rgb::hex(0xf8fafc),
            background_bottom: Rgb::hex(0xf1f5f9),
            title_color:       Rgb::hex(0x1e293b),
            title_size:        18.0,
            title_offset:      25,
            border_color:      Rgb::hex(0xe2e8f0),
            placeholder_fill:  Rgb::hex(0xf1f5f9),
            placeholder_text:  Rgb::hex(0x94a3b8),
            responsive:        false
        }
    }
}
