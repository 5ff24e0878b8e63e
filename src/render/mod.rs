// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Raster and vector renderers for the contributor mosaic.

mod avatar;
mod raster;
mod style;
mod text;
mod vector;

use base64::{Engine as _, engine::general_purpose::STANDARD};

pub use self::{
    avatar::{
        AvatarError, AvatarLoader, AvatarSlot, HttpAvatarLoader, USER_AGENT, decode_avatar,
        decode_avatars, fetch_avatars
    },
    raster::{RasterRenderer, paint},
    style::{RenderStyle, Rgb},
    text::FontSet,
    vector::render_vector
};

/// Output encoding requested by a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    /// Raster output, the default.
    #[default]
    Png,
    /// Vector output.
    Svg
}

impl ImageFormat {
    /// Interprets a `format` query value.
    ///
    /// Only `svg` (case-insensitive) selects vector output; anything else,
    /// including an absent value, falls back to PNG.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some(value) if value.trim().eq_ignore_ascii_case("svg") => Self::Svg,
            _ => Self::Png
        }
    }

    /// File extension used for artifacts of this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg"
        }
    }
}

/// Encoded image ready to be served or written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedImage {
    /// PNG bytes.
    Png(Vec<u8>),
    /// SVG document.
    Svg(String)
}

impl RenderedImage {
    /// MIME type of the payload.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Png(_) => "image/png",
            Self::Svg(_) => "image/svg+xml"
        }
    }

    /// Raw payload bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Png(bytes) => bytes,
            Self::Svg(document) => document.into_bytes()
        }
    }
}

/// Wraps PNG bytes into a `data:` URL for inline display.
pub fn png_data_url(bytes: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_defaults_to_png() {
        assert_eq!(ImageFormat::parse(None), ImageFormat::Png);
        assert_eq!(ImageFormat::parse(Some("png")), ImageFormat::Png);
        assert_eq!(ImageFormat::parse(Some("gif")), ImageFormat::Png);
        assert_eq!(ImageFormat::parse(Some("SVG")), ImageFormat::Svg);
        assert_eq!(ImageFormat::parse(Some("svg")).extension(), "svg");
    }

    #[test]
    fn rendered_image_reports_content_type() {
        assert_eq!(RenderedImage::Png(vec![1]).content_type(), "image/png");
        let svg = RenderedImage::Svg("<svg/>".to_string());
        assert_eq!(svg.content_type(), "image/svg+xml");
        assert_eq!(svg.into_bytes(), b"<svg/>".to_vec());
    }

    #[test]
    fn png_data_url_uses_standard_base64() {
        assert_eq!(png_data_url(&[0x89, b'P', b'N', b'G']), "data:image/png;base64,iVBORw==");
    }
}
