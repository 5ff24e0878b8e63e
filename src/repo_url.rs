// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Repository reference parsing for GitHub URLs and query parameters.
///
/// Owner and repository names are restricted to the characters GitHub accepts
/// so they can be interpolated into API routes and embed URLs without further
/// encoding.
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Owner/repository pair identifying a GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
pub struct RepositoryRef
{
    pub owner: String,
    pub repo:  String,
}

impl RepositoryRef
{
    /// Builds a reference after validating both names.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] when either name is empty, is `.` or
    /// `..`, or contains characters outside `[A-Za-z0-9_.-]`.
    pub fn new(owner: &str, repo: &str,) -> Result<Self, Error,>
    {
        Ok(Self {
            owner: validate_name("owner", owner,)?, repo: validate_name("repo", repo,)?,
        },)
    }

    /// Title drawn in the header band of both renderers.
    pub fn title(&self,) -> String
    {
        format!("Contributors to {self}")
    }
}

impl std::fmt::Display for RepositoryRef
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_,>,) -> std::fmt::Result
    {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

fn validate_name(field: &str, value: &str,) -> Result<String, Error,>
{
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_input(format!("{field} must be provided"),),);
    }

    if trimmed == "." || trimmed == ".." {
        return Err(Error::invalid_input(format!("{field} '{trimmed}' is not a valid name"),),);
    }

    if !trimmed.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'),) {
        return Err(Error::invalid_input(format!(
            "{field} '{trimmed}' contains unsupported characters"
        ),),);
    }

    Ok(trimmed.to_string(),)
}

const GITHUB_URL_PATTERN: &str = r"github\.com/([^/]+)/([^/]+?)(?:\.git)?(?:/.*)?$";

/// Extracts the owner and repository from a GitHub URL.
///
/// Accepts `https://github.com/owner/repo`, trailing paths such as
/// `/tree/main`, a `.git` suffix, and scheme-less `github.com/owner/repo`.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] when the URL does not reference a GitHub
/// repository or the extracted names are invalid.
///
/// # Example
///
/// ```
/// use contributor_mosaic::parse_github_url;
///
/// let repository = parse_github_url("https://github.com/acme/widgets.git",)?;
/// assert_eq!(repository.to_string(), "acme/widgets");
/// # Ok::<(), contributor_mosaic::Error>(())
/// ```
pub fn parse_github_url(url: &str,) -> Result<RepositoryRef, Error,>
{
    let pattern = Regex::new(GITHUB_URL_PATTERN,)
        .map_err(|e| Error::invalid_input(format!("invalid regex: {e}"),),)?;
    let captures = pattern
        .captures(url.trim(),)
        .ok_or_else(|| Error::invalid_input(format!("'{url}' is not a GitHub repository URL"),),)?;

    let owner = captures.get(1,).map(|m| m.as_str(),).unwrap_or_default();
    let repo = captures.get(2,).map(|m| m.as_str(),).unwrap_or_default();

    RepositoryRef::new(owner, repo,)
}
