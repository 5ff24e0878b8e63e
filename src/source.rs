// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Contributor source backed by the GitHub REST API.
///
/// Fetches the contributor list of a repository, bounds it to
/// [`MAX_CONTRIBUTORS`] entries and maps transport failures onto the domain
/// error kinds. No retries are performed; callers decide whether to retry.
use std::{future::Future, time::Duration};

use async_trait::async_trait;
use octocrab::{Octocrab, service::middleware::retry::RetryConfig};
use tracing::{debug, info, warn};

use crate::{
    contributor::{Contributor, MAX_CONTRIBUTORS, RawContributor, normalize_contributors},
    error::Error,
    repo_url::RepositoryRef,
};

/// Default bound applied to a single contributor fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10,);

/// Capability to list the contributors of a repository.
#[async_trait]
pub trait ContributorSource: Send + Sync
{
    /// Returns at most [`MAX_CONTRIBUTORS`] contributors in source order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`], [`Error::RateLimited`],
    /// [`Error::Timeout`] or [`Error::UpstreamUnavailable`].
    async fn fetch_contributors(
        &self,
        repository: &RepositoryRef,
    ) -> Result<Vec<Contributor,>, Error,>;
}

/// [`ContributorSource`] implementation using an [`Octocrab`] client.
#[derive(Clone,)]
pub struct GitHubSource
{
    octocrab: Octocrab,
    timeout:  Duration,
}

impl GitHubSource
{
    /// Builds a source, attaching `token` as a personal access token when
    /// present. A missing token only lowers the upstream rate limit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UpstreamUnavailable`] when the client cannot be
    /// initialized.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::time::Duration;
    ///
    /// use contributor_mosaic::{ContributorSource, GitHubSource, RepositoryRef};
    ///
    /// # async fn example() -> Result<(), contributor_mosaic::Error> {
    /// let source = GitHubSource::new(None, Duration::from_secs(10,),)?;
    /// let repository = RepositoryRef::new("rust-lang", "rust",)?;
    /// for contributor in source.fetch_contributors(&repository,).await? {
    ///     println!("{contributor}");
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(token: Option<&str,>, timeout: Duration,) -> Result<Self, Error,>
    {
        Ok(Self::with_client(build_client(token, None,)?, timeout,),)
    }

    /// Wraps an already configured client.
    pub fn with_client(octocrab: Octocrab, timeout: Duration,) -> Self
    {
        Self {
            octocrab,
            timeout,
        }
    }

    async fn request(&self, repository: &RepositoryRef,) -> Result<Vec<RawContributor,>, Error,>
    {
        let route = format!(
            "/repos/{}/{}/contributors?per_page={MAX_CONTRIBUTORS}",
            repository.owner, repository.repo
        );

        let response =
            self.octocrab._get(route,).await.map_err(|e| map_octocrab_error(repository, e,),)?;

        // Empty repositories answer with 204 and no body.
        if response.status().as_u16() == 204 {
            return Ok(Vec::new(),);
        }

        let response = octocrab::map_github_error(response,)
            .await
            .map_err(|e| map_octocrab_error(repository, e,),)?;
        let body = self
            .octocrab
            .body_to_string(response,)
            .await
            .map_err(|e| map_octocrab_error(repository, e,),)?;

        if body.trim().is_empty() {
            return Ok(Vec::new(),);
        }

        serde_json::from_str(&body,).map_err(|e| {
            Error::upstream(format!("unexpected contributors payload for {repository}: {e}"),)
        },)
    }
}

#[async_trait]
impl ContributorSource for GitHubSource
{
    async fn fetch_contributors(
        &self,
        repository: &RepositoryRef,
    ) -> Result<Vec<Contributor,>, Error,>
    {
        debug!("Fetching contributors for {}", repository);

        let raw = with_timeout(self.timeout, self.request(repository,),).await?;
        let contributors = normalize_contributors(raw,);

        info!("Fetched {} contributors for {}", contributors.len(), repository);

        Ok(contributors,)
    }
}

/// Builds the GitHub client used by [`GitHubSource::new`].
///
/// The client never retries on its own, so one fetch issues exactly one
/// upstream request.
fn build_client(token: Option<&str,>, base_uri: Option<&str,>,) -> Result<Octocrab, Error,>
{
    let init_error = |e: octocrab::Error| {
        Error::upstream(format!("failed to initialize GitHub client: {e}"),)
    };

    let mut builder = Octocrab::builder().add_retry_config(RetryConfig::None,);
    if let Some(token,) = token.map(str::trim,).filter(|token| !token.is_empty(),) {
        debug!("Using configured GitHub token for contributor requests");
        builder = builder.personal_token(token.to_owned(),);
    }
    if let Some(base_uri,) = base_uri {
        builder = builder.base_uri(base_uri,).map_err(init_error,)?;
    }

    builder.build().map_err(init_error,)
}

/// Runs `operation` under a bounded timeout, surfacing expiry as
/// [`Error::Timeout`].
pub async fn with_timeout<T, Fut,>(timeout: Duration, operation: Fut,) -> Result<T, Error,>
where
    Fut: Future<Output = Result<T, Error,>,>,
{
    match tokio::time::timeout(timeout, operation,).await {
        Ok(result,) => result,
        Err(_,) => {
            warn!("Contributor fetch exceeded {}ms", timeout.as_millis());
            Err(Error::Timeout {
                seconds: timeout.as_secs(),
            },)
        }
    }
}

fn map_octocrab_error(repository: &RepositoryRef, error: octocrab::Error,) -> Error
{
    match error {
        octocrab::Error::GitHub {
            source, ..
        } => error_for_status(repository, source.status_code.as_u16(), &source.message,),
        other => {
            warn!("GitHub request for {} failed: {}", repository, other);
            Error::upstream(format!("GitHub request failed: {other}"),)
        }
    }
}

/// Maps an upstream HTTP status onto the domain error taxonomy.
pub fn error_for_status(repository: &RepositoryRef, status: u16, message: &str,) -> Error
{
    warn!("GitHub responded {} for {}: {}", status, repository, message);

    match status {
        404 => Error::NotFound {
            repository: repository.to_string(),
        },
        403 | 429 => Error::RateLimited {
            message: message.to_string(),
        },
        _ => Error::upstream(format!("GitHub responded with status {status}: {message}"),),
    }
}
