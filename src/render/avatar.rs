// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Avatar acquisition for the raster renderer.
///
/// Every avatar is fetched as an independent task and decoded in parallel.
/// Any failure, whether transport, status or decode, is converted into an
/// [`AvatarSlot::Placeholder`] for that contributor only and never reaches
/// the caller.
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use image::imageops::FilterType;
use rayon::prelude::*;
use tiny_skia::{FillRule, IntSize, Mask, PathBuilder, Pixmap, Transform};
use tracing::{debug, warn};

use crate::{contributor::Contributor, error::Error};

/// User agent sent with avatar and API requests.
pub const USER_AGENT: &str = "Contributors-Image-Generator";

/// Failure to obtain a usable avatar for a single contributor.
#[derive(Debug, masterror::Error,)]
pub enum AvatarError
{
    /// The request could not be sent or timed out.
    #[error("avatar request failed: {message}")]
    Request
    {
        /// Transport error description.
        message: String,
    },
    /// The avatar host answered with a non-success status.
    #[error("avatar request returned status {status}")]
    Status
    {
        /// HTTP status code.
        status: u16,
    },
    /// The payload is not a decodable image.
    #[error("avatar could not be decoded: {message}")]
    Decode
    {
        /// Decoder error description.
        message: String,
    },
}

/// Capability to download avatar image bytes.
#[async_trait]
pub trait AvatarLoader: Send + Sync
{
    /// Downloads the raw image bytes behind `url`.
    async fn load(&self, url: &str,) -> Result<Vec<u8,>, AvatarError,>;
}

/// [`AvatarLoader`] backed by a `reqwest` client with a bounded timeout.
#[derive(Debug, Clone,)]
pub struct HttpAvatarLoader
{
    client: reqwest::Client,
}

impl HttpAvatarLoader
{
    /// Builds a loader whose requests are aborted after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RenderFailure`] when the HTTP client cannot be built.
    pub fn new(timeout: Duration,) -> Result<Self, Error,>
    {
        let client = reqwest::Client::builder()
            .timeout(timeout,)
            .user_agent(USER_AGENT,)
            .build()
            .map_err(|e| Error::render(format!("failed to build avatar client: {e}"),),)?;

        Ok(Self {
            client,
        },)
    }
}

#[async_trait]
impl AvatarLoader for HttpAvatarLoader
{
    async fn load(&self, url: &str,) -> Result<Vec<u8,>, AvatarError,>
    {
        if url.trim().is_empty() {
            return Err(AvatarError::Request {
                message: "avatar URL is empty".to_string(),
            },);
        }

        let response = self.client.get(url,).send().await.map_err(|e| AvatarError::Request {
            message: e.to_string(),
        },)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AvatarError::Status {
                status: status.as_u16(),
            },);
        }

        let bytes = response.bytes().await.map_err(|e| AvatarError::Request {
            message: e.to_string(),
        },)?;

        Ok(bytes.to_vec(),)
    }
}

/// Outcome of acquiring one contributor's avatar.
#[derive(Debug,)]
pub enum AvatarSlot
{
    /// Decoded avatar, resized to the diameter and clipped to a circle.
    Image(Pixmap,),
    /// Fallback drawn as a flat circle with the login initial.
    Placeholder,
}

/// Fetches all avatars concurrently, preserving contributor order.
pub async fn fetch_avatars(
    loader: &dyn AvatarLoader,
    contributors: &[Contributor],
) -> Vec<Result<Vec<u8,>, AvatarError,>,>
{
    join_all(contributors.iter().map(|contributor| loader.load(&contributor.avatar_url,),),).await
}

/// Decodes fetched avatars in parallel, substituting placeholders for every
/// failure.
pub fn decode_avatars(
    contributors: &[Contributor],
    fetched: Vec<Result<Vec<u8,>, AvatarError,>,>,
    diameter: u32,
) -> Vec<AvatarSlot,>
{
    fetched
        .into_par_iter()
        .zip(contributors.par_iter(),)
        .map(|(bytes, contributor,)| match bytes.and_then(|bytes| decode_avatar(&bytes, diameter,),) {
            Ok(pixmap,) => AvatarSlot::Image(pixmap,),
            Err(error,) => {
                warn!("Failed to load avatar for {}: {}", contributor.login, error);
                AvatarSlot::Placeholder
            }
        },)
        .collect()
}

/// Decodes image bytes into a `diameter`-sized pixmap clipped to a circle.
///
/// # Errors
///
/// Returns [`AvatarError::Decode`] when the bytes are not a supported image.
pub fn decode_avatar(bytes: &[u8], diameter: u32,) -> Result<Pixmap, AvatarError,>
{
    let decode_error = |message: String| AvatarError::Decode {
        message,
    };

    let image = image::load_from_memory(bytes,).map_err(|e| decode_error(e.to_string(),),)?;
    let mut rgba =
        image.resize_exact(diameter, diameter, FilterType::Triangle,).to_rgba8().into_raw();

    // tiny-skia stores premultiplied RGBA.
    for pixel in rgba.chunks_exact_mut(4,) {
        let alpha = u16::from(pixel[3],);
        for channel in &mut pixel[..3] {
            *channel = ((u16::from(*channel,) * alpha + 127) / 255) as u8;
        }
    }

    let size = IntSize::from_wh(diameter, diameter,)
        .ok_or_else(|| decode_error(format!("invalid avatar size {diameter}"),),)?;
    let mut pixmap = Pixmap::from_vec(rgba, size,)
        .ok_or_else(|| decode_error("avatar buffer has unexpected length".to_string(),),)?;

    let radius = diameter as f32 / 2.0;
    let circle = PathBuilder::from_circle(radius, radius, radius,)
        .ok_or_else(|| decode_error("avatar clip circle is degenerate".to_string(),),)?;
    let mut mask = Mask::new(diameter, diameter,)
        .ok_or_else(|| decode_error("avatar mask could not be allocated".to_string(),),)?;
    mask.fill_path(&circle, FillRule::Winding, true, Transform::identity(),);
    pixmap.apply_mask(&mask,);

    debug!("Decoded avatar into {}x{} pixmap", diameter, diameter);
    Ok(pixmap,)
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::testing::{contributor, png_bytes};

    #[test]
    fn decode_avatar_resizes_and_clips()
    {
        let pixmap = decode_avatar(&png_bytes(120, 90,), 60,).expect("decode should succeed",);
        assert_eq!((pixmap.width(), pixmap.height()), (60, 60));

        let corner = pixmap.pixel(0, 0,).expect("corner pixel",);
        assert_eq!(corner.alpha(), 0);
        let center = pixmap.pixel(30, 30,).expect("center pixel",);
        assert_eq!(center.alpha(), 255);
    }

    #[test]
    fn decode_avatar_rejects_garbage()
    {
        let error = decode_avatar(b"not an image", 60,).expect_err("garbage must fail",);
        assert!(matches!(error, AvatarError::Decode { .. }));
    }

    #[test]
    fn decode_avatars_isolates_failures()
    {
        let contributors = vec![contributor("ok",), contributor("broken",), contributor("404",)];
        let fetched = vec![
            Ok(png_bytes(10, 10,),),
            Ok(b"garbage".to_vec(),),
            Err(AvatarError::Status {
                status: 404,
            },),
        ];

        let slots = decode_avatars(&contributors, fetched, 60,);

        assert_eq!(slots.len(), 3);
        assert!(matches!(slots[0], AvatarSlot::Image(_)));
        assert!(matches!(slots[1], AvatarSlot::Placeholder));
        assert!(matches!(slots[2], AvatarSlot::Placeholder));
    }

    #[tokio::test]
    async fn http_loader_rejects_empty_url()
    {
        let loader = HttpAvatarLoader::new(Duration::from_secs(1,),).expect("client",);
        let error = loader.load("",).await.expect_err("empty URL must fail",);
        assert!(matches!(error, AvatarError::Request { .. }));
    }
}
