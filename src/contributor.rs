// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Contributor records consumed by the renderers.
///
/// Raw GitHub API entries are normalized into [`Contributor`] values, bounded
/// to [`MAX_CONTRIBUTORS`] and kept in the order the source returned them.
use serde::{Deserialize, Serialize};

/// Upper bound on the contributors rendered into a single image.
pub const MAX_CONTRIBUTORS: usize = 30;

/// GitHub API contributor entry before normalization.
#[derive(Debug, Clone, Deserialize,)]
pub struct RawContributor
{
    #[serde(default)]
    pub login:         Option<String,>,
    #[serde(default)]
    pub avatar_url:    Option<String,>,
    #[serde(default)]
    pub contributions: u64,
    #[serde(default)]
    pub html_url:      Option<String,>,
}

/// A repository contributor ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
pub struct Contributor
{
    /// Account login, never empty.
    pub login:         String,
    /// Profile image location; may be unreachable at render time.
    pub avatar_url:    String,
    /// Number of contributions reported by the source.
    pub contributions: u64,
    /// Public profile page.
    #[serde(rename = "html_url")]
    pub profile_url:   String,
}

impl Contributor
{
    /// Uppercased first character of the login, drawn on placeholder avatars.
    pub fn initial(&self,) -> String
    {
        self.login.chars().next().map(|c| c.to_uppercase().collect(),).unwrap_or_default()
    }

    /// Tooltip text attached to the vector renderer's link overlay.
    pub fn tooltip(&self,) -> String
    {
        format!("{} - {} contributions", self.login, self.contributions)
    }
}

impl std::fmt::Display for Contributor
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_,>,) -> std::fmt::Result
    {
        write!(f, "{} ({} contributions)", self.login, self.contributions)
    }
}

/// Normalizes raw API entries into the rendering working set.
///
/// Entries without a login are dropped, the remainder is truncated to
/// [`MAX_CONTRIBUTORS`], and the source order is preserved. The list is never
/// re-sorted locally.
pub fn normalize_contributors(raw: Vec<RawContributor,>,) -> Vec<Contributor,>
{
    raw.into_iter()
        .filter_map(|entry| {
            let login = entry.login.filter(|login| !login.trim().is_empty(),)?;
            Some(Contributor {
                avatar_url: entry.avatar_url.unwrap_or_default(),
                profile_url: entry
                    .html_url
                    .unwrap_or_else(|| format!("https://github.com/{login}"),),
                contributions: entry.contributions,
                login,
            },)
        },)
        .take(MAX_CONTRIBUTORS,)
        .collect()
}
