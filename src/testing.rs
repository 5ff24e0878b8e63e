// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! In-memory stand-ins for the network-facing capabilities used by unit
//! tests.

use std::{
    collections::HashMap,
    io::Cursor,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use image::{ImageFormat, Rgba, RgbaImage};

use crate::{
    contributor::Contributor,
    error::Error,
    render::{AvatarError, AvatarLoader},
    repo_url::RepositoryRef,
    source::ContributorSource,
};

pub(crate) fn contributor(login: &str,) -> Contributor
{
    Contributor {
        login:         login.to_string(),
        avatar_url:    format!("https://avatars.example.com/{login}"),
        contributions: 1,
        profile_url:   format!("https://github.com/{login}"),
    }
}

pub(crate) fn contributors(count: usize,) -> Vec<Contributor,>
{
    (0..count)
        .map(|i| Contributor {
            contributions: 100 - i as u64,
            ..contributor(&format!("user{i}"),)
        },)
        .collect()
}

pub(crate) fn png_bytes(width: u32, height: u32,) -> Vec<u8,>
{
    let image = RgbaImage::from_pixel(width, height, Rgba([200, 40, 40, 255,],),);
    let mut buffer = Cursor::new(Vec::new(),);
    image.write_to(&mut buffer, ImageFormat::Png,).expect("encode png",);
    buffer.into_inner()
}

/// Source returning a fixed outcome and counting invocations.
pub(crate) struct StubSource
{
    outcome: Box<dyn Fn() -> Result<Vec<Contributor,>, Error,> + Send + Sync,>,
    calls:   AtomicUsize,
}

impl StubSource
{
    pub(crate) fn with_contributors(contributors: Vec<Contributor,>,) -> Arc<Self,>
    {
        Arc::new(Self {
            outcome: Box::new(move || Ok(contributors.clone(),),),
            calls:   AtomicUsize::new(0,),
        },)
    }

    pub(crate) fn failing(make: fn() -> Error,) -> Arc<Self,>
    {
        Arc::new(Self {
            outcome: Box::new(move || Err(make(),),), calls: AtomicUsize::new(0,),
        },)
    }

    pub(crate) fn calls(&self,) -> usize
    {
        self.calls.load(Ordering::SeqCst,)
    }
}

#[async_trait]
impl ContributorSource for StubSource
{
    async fn fetch_contributors(
        &self,
        _repository: &RepositoryRef,
    ) -> Result<Vec<Contributor,>, Error,>
    {
        self.calls.fetch_add(1, Ordering::SeqCst,);
        (self.outcome)()
    }
}

/// Avatar loader serving canned bytes per URL; unknown URLs fail.
#[derive(Default,)]
pub(crate) struct StubAvatars
{
    responses: HashMap<String, Vec<u8,>,>,
    requests:  AtomicUsize,
}

impl StubAvatars
{
    pub(crate) fn serving(urls: &[&str],) -> Arc<Self,>
    {
        let responses = urls.iter().map(|url| (url.to_string(), png_bytes(16, 16,),),).collect();
        Arc::new(Self {
            responses,
            requests: AtomicUsize::new(0,),
        },)
    }

    pub(crate) fn unreachable() -> Arc<Self,>
    {
        Arc::new(Self::default(),)
    }

    pub(crate) fn requests(&self,) -> usize
    {
        self.requests.load(Ordering::SeqCst,)
    }
}

#[async_trait]
impl AvatarLoader for StubAvatars
{
    async fn load(&self, url: &str,) -> Result<Vec<u8,>, AvatarError,>
    {
        self.requests.fetch_add(1, Ordering::SeqCst,);
        self.responses.get(url,).cloned().ok_or_else(|| AvatarError::Request {
            message: format!("connection refused: {url}"),
        },)
    }
}
