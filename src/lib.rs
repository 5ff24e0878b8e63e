// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Contributor mosaics for GitHub repositories.
//!
//! The library fetches the top contributors of a repository, lays their
//! avatars out on a fixed grid and renders the result as PNG or SVG. It also
//! composes README embed snippets and exposes the HTTP surface used by the
//! `contributor-mosaic` binary. Both renderers share a single layout
//! calculator so their outputs are positionally identical.

mod api;
mod artifact;
mod config;
mod contributor;
mod embed;
mod error;
mod layout;
pub mod render;
mod repo_url;
mod source;
#[cfg(test)]
mod testing;

pub use api::{
    AppState, ContributorsResponse, ImageQuery, ShowcaseImages, build_router, build_showcase,
    render_image
};
pub use artifact::{ArtifactLocation, artifact_path, write_artifact};
pub use config::{
    ConfigOverrides, DEFAULT_AVATAR_TIMEOUT_SECS, DEFAULT_BIND, DEFAULT_REQUEST_TIMEOUT_SECS,
    ServiceConfig
};
pub use contributor::{Contributor, MAX_CONTRIBUTORS, RawContributor, normalize_contributors};
pub use embed::{LOCAL_BASE_URL, compose_embed, resolve_base_url};
pub use error::{Error, MISSING_URL_MESSAGE, artifact_io_error, config_io_error};
pub use layout::{
    CELL_MARGIN, CellPosition, DEFAULT_AVATAR_DIAMETER, HEADER_HEIGHT, LayoutGeometry,
    MAX_COLUMNS, OUTER_PADDING, compute_layout
};
pub use render::{
    FontSet, HttpAvatarLoader, ImageFormat, RasterRenderer, RenderStyle, RenderedImage,
    render_vector
};
pub use repo_url::{RepositoryRef, parse_github_url};
pub use source::{
    ContributorSource, DEFAULT_FETCH_TIMEOUT, GitHubSource, error_for_status, with_timeout
};
