// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Embed snippets pointing README readers at the hosted image endpoint.
///
/// The snippets are plain text; nothing is fetched or validated here.
use crate::repo_url::RepositoryRef;

/// Base URL used when no deployment host is configured.
pub const LOCAL_BASE_URL: &str = "http://localhost:3000";

/// Resolves the public base URL of the service.
///
/// A value that already carries a scheme is kept. Otherwise `http://` is
/// prefixed for hosts mentioning `localhost` and `https://` for everything
/// else. Trailing slashes are removed.
///
/// # Examples
///
/// ```
/// use contributor_mosaic::resolve_base_url;
///
/// assert_eq!(resolve_base_url(Some("mosaic.example.com/",),), "https://mosaic.example.com");
/// assert_eq!(resolve_base_url(Some("localhost:8080",),), "http://localhost:8080");
/// assert_eq!(resolve_base_url(None,), "http://localhost:3000");
/// ```
pub fn resolve_base_url(deploy: Option<&str,>,) -> String
{
    let Some(host,) = deploy.map(str::trim,).filter(|host| !host.is_empty(),) else {
        return LOCAL_BASE_URL.to_owned();
    };

    let host = host.trim_end_matches('/',);
    if host.contains("://",) {
        host.to_owned()
    } else if host.contains("localhost",) {
        format!("http://{host}")
    } else {
        format!("https://{host}")
    }
}

/// Composes the markdown, HTML and SVG-markdown embed snippets for
/// `repository`.
///
/// `source_repo_url` is the repository page the badge links to and
/// `deploy_base_url` the already resolved service origin.
pub fn compose_embed(
    repository: &RepositoryRef,
    source_repo_url: &str,
    deploy_base_url: &str,
) -> String
{
    let source = source_repo_url.trim().trim_end_matches('/',);
    let base = deploy_base_url.trim().trim_end_matches('/',);
    let image = format!(
        "{base}/api/contributors/image?owner={}&repo={}",
        repository.owner, repository.repo
    );
    let graph = format!("{source}/graphs/contributors");

    format!(
        "<!-- Contributors -->\n[![Contributors]({image})]({graph})\n\n<!-- Or as HTML -->\n<a href=\"{graph}\">\n  <img src=\"{image}\" alt=\"Contributors\" />\n</a>\n\n<!-- SVG Version -->\n[![Contributors]({image}&format=svg)]({graph})"
    )
}
