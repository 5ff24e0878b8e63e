// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! HTTP surface of the service.
//!
//! * `GET /api/contributors/image` streams a single PNG or SVG in the badge
//!   style and reports failures through status codes with plain-text bodies.
//! * `POST /api/contributors` always answers `200 OK` with a JSON envelope
//!   carrying both renderings and embed snippets, or a client-safe error.
//! * `GET /health` answers `ok`.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post}
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::{
    contributor::Contributor,
    embed::{compose_embed, resolve_base_url},
    error::{Error, MISSING_URL_MESSAGE},
    render::{
        AvatarLoader, FontSet, ImageFormat, RasterRenderer, RenderStyle, RenderedImage,
        png_data_url, render_vector
    },
    repo_url::{RepositoryRef, parse_github_url},
    source::ContributorSource
};

const MISSING_PARAMS: &str = "Missing owner or repo parameter";
const REPOSITORY_NOT_FOUND: &str = "Repository not found";
const RATE_LIMITED: &str = "GitHub API rate limit exceeded";
const GENERATION_FAILED: &str = "Failed to generate image";
const GENERIC_FAILURE: &str =
    "Failed to fetch contributors. Please check the repository URL and try again.";
const CACHE_CONTROL: &str = "public, max-age=3600";

/// Shared, immutable handler state.
#[derive(Clone)]
pub struct AppState {
    source:   Arc<dyn ContributorSource>,
    raster:   RasterRenderer,
    base_url: Arc<str>
}

impl AppState {
    /// Builds the state from its capabilities.
    ///
    /// `deploy_url` is resolved once into the base URL used by embed
    /// snippets.
    pub fn new(
        source: Arc<dyn ContributorSource>,
        loader: Arc<dyn AvatarLoader>,
        fonts: FontSet,
        deploy_url: Option<&str>
    ) -> Self {
        Self {
            source,
            raster: RasterRenderer::new(loader, fonts),
            base_url: resolve_base_url(deploy_url).into()
        }
    }

    /// Base URL used in embed snippets.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Query parameters of the direct image endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ImageQuery {
    pub owner:  Option<String>,
    pub repo:   Option<String>,
    pub format: Option<String>
}

/// Both renderings of the mosaic as returned by the JSON endpoint.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ShowcaseImages {
    /// PNG as a base64 `data:` URL.
    pub png: String,
    /// SVG document.
    pub svg: String
}

/// Envelope returned by `POST /api/contributors`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContributorsResponse {
    pub success:      bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contributors: Option<Vec<Contributor>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images:       Option<ShowcaseImages>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed_code:   Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error:        Option<String>
}

impl ContributorsResponse {
    fn failure(message: &str) -> Self {
        Self {
            success:      false,
            contributors: None,
            images:       None,
            embed_code:   None,
            error:        Some(message.to_owned())
        }
    }
}

/// Builds the application router with request tracing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/contributors", post(contributors_handler))
        .route("/api/contributors/image", get(image_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

/// `GET /api/contributors/image?owner=..&repo=..&format=..`
pub async fn image_handler(
    State(state): State<AppState>,
    Query(query): Query<ImageQuery>
) -> Response {
    let repository = match (query.owner.as_deref(), query.repo.as_deref()) {
        (Some(owner), Some(repo)) => match RepositoryRef::new(owner, repo) {
            Ok(repository) => repository,
            Err(error) => {
                warn!("Rejected image request: {}", error);
                return (StatusCode::BAD_REQUEST, MISSING_PARAMS).into_response();
            }
        },
        _ => return (StatusCode::BAD_REQUEST, MISSING_PARAMS).into_response()
    };

    let format = ImageFormat::parse(query.format.as_deref());
    match render_image(&state, &repository, format).await {
        Ok(image) => {
            let content_type = image.content_type();
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, content_type),
                    (header::CACHE_CONTROL, CACHE_CONTROL),
                    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
                ],
                image.into_bytes()
            )
                .into_response()
        }
        Err(error) => image_error_response(&repository, &error)
    }
}

/// Fetches contributors and renders them in the badge style.
///
/// An empty contributor list produces a header-only image.
///
/// # Errors
///
/// Propagates source errors and [`Error::RenderFailure`].
pub async fn render_image(
    state: &AppState,
    repository: &RepositoryRef,
    format: ImageFormat
) -> Result<RenderedImage, Error> {
    let contributors = state.source.fetch_contributors(repository).await?;
    let title = repository.title();
    let style = RenderStyle::badge();

    let image = match format {
        ImageFormat::Png => {
            RenderedImage::Png(state.raster.render(&contributors, &title, &style).await?)
        }
        ImageFormat::Svg => RenderedImage::Svg(render_vector(&contributors, &title, &style))
    };

    info!(
        "Served {} image for {} with {} contributors",
        format.extension(),
        repository,
        contributors.len()
    );
    Ok(image)
}

fn image_error_response(repository: &RepositoryRef, error: &Error) -> Response {
    let (status, message) = match error {
        Error::InvalidInput {
            ..
        } => (StatusCode::BAD_REQUEST, MISSING_PARAMS),
        Error::NotFound {
            ..
        } => (StatusCode::NOT_FOUND, REPOSITORY_NOT_FOUND),
        Error::RateLimited {
            ..
        } => (StatusCode::TOO_MANY_REQUESTS, RATE_LIMITED),
        other => {
            error!("Failed to generate image for {}: {}", repository, other);
            (StatusCode::INTERNAL_SERVER_ERROR, GENERATION_FAILED)
        }
    };
    (status, message).into_response()
}

/// `POST /api/contributors` with body `{"repoUrl": "..."}`.
///
/// The body is taken raw so malformed JSON still yields the JSON envelope
/// instead of an extractor rejection.
pub async fn contributors_handler(
    State(state): State<AppState>,
    body: Bytes
) -> Json<ContributorsResponse> {
    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(error) => {
            warn!("Rejected contributors request with unreadable body: {}", error);
            return Json(ContributorsResponse::failure(GENERIC_FAILURE));
        }
    };

    let Some(repo_url) = payload
        .get("repoUrl")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|url| !url.is_empty())
    else {
        return Json(ContributorsResponse::failure(MISSING_URL_MESSAGE));
    };

    match build_showcase(&state, repo_url).await {
        Ok(response) => Json(response),
        Err(error) => {
            match &error {
                Error::RenderFailure {
                    ..
                } => error!("Showcase rendering for {} failed: {}", repo_url, error),
                _ => warn!("Showcase request for {} failed: {}", repo_url, error)
            }
            Json(ContributorsResponse::failure(error.client_message()))
        }
    }
}

/// Resolves `repo_url` and produces both renderings plus embed snippets in
/// the showcase style.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for unparseable URLs,
/// [`Error::NoContributors`] for empty results, and propagates source and
/// render errors.
pub async fn build_showcase(
    state: &AppState,
    repo_url: &str
) -> Result<ContributorsResponse, Error> {
    let repository = parse_github_url(repo_url)?;
    let contributors = state.source.fetch_contributors(&repository).await?;
    if contributors.is_empty() {
        return Err(Error::NoContributors {
            repository: repository.to_string()
        });
    }

    let title = repository.title();
    let style = RenderStyle::showcase();
    let png = state.raster.render(&contributors, &title, &style).await?;
    let svg = render_vector(&contributors, &title, &style);
    let embed_code = compose_embed(&repository, repo_url, state.base_url());

    info!(
        "Built showcase for {} with {} contributors",
        repository,
        contributors.len()
    );

    Ok(ContributorsResponse {
        success:      true,
        contributors: Some(contributors),
        images:       Some(ShowcaseImages {
            png: png_data_url(&png),
            svg
        }),
        embed_code:   Some(embed_code),
        error:        None
    })
}
