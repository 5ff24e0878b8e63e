#![allow(non_shorthand_field_patterns)]
#![doc = "Error handling primitives shared across the mosaic crate."]
// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! The derive emitted by [`masterror::Error`] expands pattern matches that
//! trigger the `non_shorthand_field_patterns` lint. The lint is disabled for
//! the module to keep the generated implementations warning-free.
//!
//! Per-avatar failures never reach this enum. The raster renderer replaces
//! them with placeholders, see [`AvatarError`](crate::render::AvatarError).

use std::path::{Path, PathBuf};

/// Unified error type returned by the contributor source, the renderers, the
/// configuration loader and the CLI.
#[derive(Debug, masterror::Error)]
pub enum Error {
    /// Malformed repository URL, owner/repo name or missing parameter.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// Human readable description of the rejected input.
        message: String
    },
    /// The upstream source reported that the repository does not exist or is
    /// not visible to the configured credential.
    #[error("repository {repository} was not found")]
    NotFound {
        /// Repository in `owner/repo` form.
        repository: String
    },
    /// The upstream source refused the request because of rate limiting.
    #[error("upstream rate limit exceeded: {message}")]
    RateLimited {
        /// Message reported by the upstream API.
        message: String
    },
    /// The contributor fetch did not complete within the configured bound.
    #[error("contributor fetch timed out after {seconds}s")]
    Timeout {
        /// Timeout that elapsed, in seconds.
        seconds: u64
    },
    /// Any other transport or upstream failure.
    #[error("upstream unavailable: {message}")]
    UpstreamUnavailable {
        /// Human readable description of the transport failure.
        message: String
    },
    /// The caller requires at least one contributor but none were returned.
    #[error("no contributors found for {repository}")]
    NoContributors {
        /// Repository in `owner/repo` form.
        repository: String
    },
    /// Unexpected failure while building a drawing surface or markup.
    #[error("render failure: {message}")]
    RenderFailure {
        /// Human readable description of the failure.
        message: String
    },
    /// Wraps I/O errors that occur while reading the service configuration.
    #[error("failed to read configuration from {path:?}: {source}")]
    ConfigIo {
        /// Location of the configuration file.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// Wraps YAML decoding errors of the service configuration.
    #[error("failed to parse configuration: {source}")]
    ConfigParse {
        /// Source decoding error from serde_yaml.
        source: serde_yaml::Error
    },
    /// Wraps JSON serialization errors.
    #[error("failed to serialize output: {source}")]
    Serialize {
        /// Underlying serialization error.
        source: serde_json::Error
    },
    /// The HTTP listener could not be bound or stopped unexpectedly.
    #[error("server failure on {address}: {source}")]
    Server {
        /// Configured bind address.
        address: String,
        /// Underlying I/O error.
        source:  std::io::Error
    },
    /// Wraps I/O errors that occur while writing rendered artifacts.
    #[error("failed to write artifact at {path:?}: {source}")]
    ArtifactIo {
        /// Location of the artifact being produced.
        path:   PathBuf,
        /// Underlying I/O error reported by the operating system.
        source: std::io::Error
    }
}

/// User-facing message for requests that omit the repository URL.
pub const MISSING_URL_MESSAGE: &str = "Repository URL is required";

impl Error {
    /// Constructs an input validation error.
    ///
    /// # Parameters
    ///
    /// * `message` - Human-readable description of the rejected input.
    pub fn invalid_input<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::InvalidInput {
            message: message.into()
        }
    }

    /// Constructs an upstream transport error.
    pub fn upstream<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::UpstreamUnavailable {
            message: message.into()
        }
    }

    /// Constructs a render failure.
    pub fn render<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::RenderFailure {
            message: message.into()
        }
    }

    /// Message reported to clients of the JSON endpoint.
    ///
    /// The wording distinguishes invalid URLs, missing repositories, rate
    /// limiting, timeouts and empty results. Every other failure collapses
    /// into a generic fetch failure so internal details never leak.
    pub fn client_message(&self) -> &'static str {
        match self {
            Self::InvalidInput {
                ..
            } => "Invalid GitHub repository URL",
            Self::NotFound {
                ..
            } => "Repository not found or is private",
            Self::RateLimited {
                ..
            } => "GitHub API rate limit exceeded. Please try again later.",
            Self::Timeout {
                ..
            } => "Request timeout. Please try again.",
            Self::NoContributors {
                ..
            } => "No contributors found for this repository",
            _ => "Failed to fetch contributors. Please check the repository URL and try again."
        }
    }

    /// Formats the error for diagnostics without the variant name.
    pub fn to_display_string(&self) -> String {
        format!("{self}")
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(source: serde_yaml::Error) -> Self {
        Self::ConfigParse {
            source
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::Serialize {
            source
        }
    }
}

/// Creates an [`Error::ConfigIo`] variant capturing the failing path and
/// source.
///
/// # Parameters
///
/// * `path` - Location of the configuration file that triggered the error.
/// * `source` - I/O error reported by the operating system.
pub fn config_io_error(path: &Path, source: std::io::Error) -> Error {
    Error::ConfigIo {
        path: path.to_path_buf(),
        source
    }
}

/// Creates an [`Error::ArtifactIo`] variant capturing the failing path and
/// source.
pub fn artifact_io_error(path: &Path, source: std::io::Error) -> Error {
    Error::ArtifactIo {
        path: path.to_path_buf(),
        source
    }
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn invalid_input_constructor_populates_message() {
        let error = Error::invalid_input("owner is empty");
        match error {
            Error::InvalidInput {
                ref message
            } => {
                assert_eq!(message, "owner is empty");
            }
            other => panic!("expected invalid input error, got {other:?}")
        }
    }

    #[test]
    fn to_display_string_matches_display() {
        let error = Error::upstream("connection reset");
        assert_eq!(error.to_string(), error.to_display_string());
        assert_eq!(error.to_string(), "upstream unavailable: connection reset");
    }

    #[test]
    fn client_messages_distinguish_failure_kinds() {
        assert_eq!(
            Error::invalid_input("x").client_message(),
            "Invalid GitHub repository URL"
        );
        assert_eq!(
            Error::NotFound {
                repository: "acme/widgets".to_owned()
            }
            .client_message(),
            "Repository not found or is private"
        );
        assert_eq!(
            Error::RateLimited {
                message: "API rate limit exceeded".to_owned()
            }
            .client_message(),
            "GitHub API rate limit exceeded. Please try again later."
        );
        assert_eq!(
            Error::Timeout {
                seconds: 10
            }
            .client_message(),
            "Request timeout. Please try again."
        );
        assert!(
            Error::NoContributors {
                repository: "acme/widgets".to_owned()
            }
            .client_message()
            .starts_with("No contributors found")
        );
    }

    #[test]
    fn internal_failures_use_generic_client_message() {
        let generic =
            "Failed to fetch contributors. Please check the repository URL and try again.";
        assert_eq!(Error::upstream("boom").client_message(), generic);
        assert_eq!(Error::render("surface").client_message(), generic);
    }

    #[test]
    fn config_io_error_helper_wraps_path_and_source() {
        let path = std::path::Path::new("/tmp/mosaic.yaml");
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error = super::config_io_error(path, io_error);

        match error {
            Error::ConfigIo {
                path: ref stored_path,
                ref source
            } => {
                assert_eq!(stored_path, path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected config io error, got {other:?}")
        }
    }

    #[test]
    fn serde_yaml_conversion_maps_to_config_parse_variant() {
        let error = serde_yaml::from_str::<usize>("not-a-number").unwrap_err();
        let mapped: Error = error.into();
        assert!(matches!(mapped, Error::ConfigParse { .. }));
    }

    #[test]
    fn artifact_io_error_helper_wraps_path_and_source() {
        let path = std::path::Path::new("/tmp/acme-widgets.png");
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error = super::artifact_io_error(path, io_error);
        assert!(matches!(error, Error::ArtifactIo { .. }));
    }
}
