// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Service configuration loaded from an optional YAML document.
//!
//! Every key is optional. Values supplied on the command line or through the
//! environment take precedence over the file, and a missing file simply
//! yields the defaults.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{self, Error};

/// Address the HTTP server binds to when nothing else is configured.
pub const DEFAULT_BIND: &str = "0.0.0.0:3000";
/// Default bound, in seconds, for the contributor fetch.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
/// Default bound, in seconds, for each avatar download.
pub const DEFAULT_AVATAR_TIMEOUT_SECS: u64 = 10;

/// Runtime configuration of the service and the CLI.
///
/// # Examples
///
/// ```
/// use contributor_mosaic::ServiceConfig;
///
/// let yaml = r#"
/// bind: 127.0.0.1:8080
/// deploy_url: mosaic.example.com
/// "#;
/// let config = ServiceConfig::parse(yaml,).expect("valid configuration",);
/// assert_eq!(config.bind, "127.0.0.1:8080");
/// assert_eq!(config.request_timeout_secs, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize,)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig
{
    /// Socket address of the HTTP server.
    pub bind: String,

    /// Personal access token attached to GitHub requests.
    pub github_token: Option<String,>,

    /// Public host used when composing embed snippets.
    pub deploy_url: Option<String,>,

    /// Bound for the contributor fetch, in seconds.
    pub request_timeout_secs: u64,

    /// Bound for each avatar download, in seconds.
    pub avatar_timeout_secs: u64,

    /// Font file used for PNG text instead of the system fonts.
    pub font_path: Option<PathBuf,>,
}

impl Default for ServiceConfig
{
    fn default() -> Self
    {
        Self {
            bind:                 DEFAULT_BIND.to_owned(),
            github_token:         None,
            deploy_url:           None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            avatar_timeout_secs:  DEFAULT_AVATAR_TIMEOUT_SECS,
            font_path:            None,
        }
    }
}

/// Values taken from CLI flags or environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq,)]
pub struct ConfigOverrides
{
    pub bind:         Option<String,>,
    pub github_token: Option<String,>,
    pub deploy_url:   Option<String,>,
    pub font_path:    Option<PathBuf,>,
}

impl ServiceConfig
{
    /// Reads and validates the configuration stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigIo`] when the file cannot be read,
    /// [`Error::ConfigParse`] when it is not valid YAML for this schema, and
    /// [`Error::InvalidInput`] when a timeout is zero.
    pub fn load(path: &Path,) -> Result<Self, Error,>
    {
        let contents =
            fs::read_to_string(path,).map_err(|source| error::config_io_error(path, source,),)?;
        debug!("Loaded configuration from {}", path.display());
        Self::parse(&contents,)
    }

    /// Parses and validates a YAML document.
    ///
    /// An empty document yields the defaults.
    ///
    /// # Errors
    ///
    /// See [`ServiceConfig::load`].
    pub fn parse(contents: &str,) -> Result<Self, Error,>
    {
        let config: Self = if contents.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(contents,)?
        };
        config.validate()?;
        Ok(config,)
    }

    /// Loads the optional file and applies `overrides` on top of it.
    ///
    /// # Errors
    ///
    /// See [`ServiceConfig::load`].
    pub fn resolve(path: Option<&Path,>, overrides: ConfigOverrides,) -> Result<Self, Error,>
    {
        let base = match path {
            Some(path,) => Self::load(path,)?,
            None => Self::default(),
        };
        Ok(base.with_overrides(overrides,),)
    }

    /// Replaces file values with every non-blank override.
    pub fn with_overrides(mut self, overrides: ConfigOverrides,) -> Self
    {
        if let Some(bind,) = non_blank(overrides.bind,) {
            self.bind = bind;
        }
        if let Some(token,) = non_blank(overrides.github_token,) {
            self.github_token = Some(token,);
        }
        if let Some(deploy_url,) = non_blank(overrides.deploy_url,) {
            self.deploy_url = Some(deploy_url,);
        }
        if let Some(font_path,) = overrides.font_path {
            self.font_path = Some(font_path,);
        }
        self
    }

    /// Bound applied to the contributor fetch.
    pub fn request_timeout(&self,) -> Duration
    {
        Duration::from_secs(self.request_timeout_secs,)
    }

    /// Bound applied to each avatar download.
    pub fn avatar_timeout(&self,) -> Duration
    {
        Duration::from_secs(self.avatar_timeout_secs,)
    }

    fn validate(&self,) -> Result<(), Error,>
    {
        if self.bind.trim().is_empty() {
            return Err(Error::invalid_input("bind address must not be empty",),);
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::invalid_input("request_timeout_secs must be positive",),);
        }
        if self.avatar_timeout_secs == 0 {
            return Err(Error::invalid_input("avatar_timeout_secs must be positive",),);
        }
        Ok((),)
    }
}

fn non_blank(value: Option<String,>,) -> Option<String,>
{
    value.map(|value| value.trim().to_owned(),).filter(|value| !value.is_empty(),)
}
