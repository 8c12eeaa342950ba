//! Client configuration file.
//!
//! All default values live exclusively in `config.default.toml`.
//! This module embeds that file at compile-time and lets callers layer
//! their own TOML on top of it.

use std::{fmt, fs, path::Path, str::FromStr, sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    auth::{AuthStrategy, BasicAuth, OAuth1, OAuth2},
    client::OsmHttpClient,
    errors::{BuildError, ConfigError},
};

/// Embedded copy of the default configuration (single source of truth for defaults)
pub const DEFAULT_CONFIG: &str = include_str!("config.default.toml");

/// Everything needed to build the clients of an [`crate::OsmApi`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// API base address, such as `https://www.openstreetmap.org/api/`.
    pub base_url: Url,
    /// Timeout for every request, in milliseconds. `0` disables it.
    pub request_timeout_ms: u64,
    /// Appended to the default user agent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent_extra: Option<String>,
    /// Ids per multi-fetch request.
    pub multi_fetch_chunk_size: usize,
    /// Overpass interpreters, tried in order.
    pub overpass_urls: Vec<Url>,
    /// Credentials for authenticated clients.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthConfig>,
}

/// Credentials, selected by `kind`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AuthConfig {
    /// Username and password.
    Basic {
        /// Account name.
        username: String,
        /// Account password.
        password: String,
    },
    /// OAuth 1.0a consumer and access token.
    #[serde(rename = "oauth1")]
    OAuth1 {
        /// Consumer key.
        consumer_key: String,
        /// Consumer secret.
        consumer_secret: String,
        /// Access token.
        token: String,
        /// Access token secret.
        token_secret: String,
    },
    /// OAuth 2.0 bearer token.
    #[serde(rename = "oauth2")]
    OAuth2 {
        /// Access token.
        token: String,
    },
}

impl AuthConfig {
    /// The strategy these credentials describe.
    pub fn strategy(&self) -> Arc<dyn AuthStrategy> {
        match self {
            AuthConfig::Basic { username, password } => {
                Arc::new(BasicAuth::new(username.as_str(), password.as_str()))
            }
            AuthConfig::OAuth1 {
                consumer_key,
                consumer_secret,
                token,
                token_secret,
            } => Arc::new(OAuth1::new(
                consumer_key.as_str(),
                consumer_secret.as_str(),
                token.as_str(),
                token_secret.as_str(),
            )),
            AuthConfig::OAuth2 { token } => Arc::new(OAuth2::new(token.as_str())),
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthConfig::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .finish_non_exhaustive(),
            AuthConfig::OAuth1 { consumer_key, .. } => f
                .debug_struct("OAuth1")
                .field("consumer_key", consumer_key)
                .finish_non_exhaustive(),
            AuthConfig::OAuth2 { .. } => f.debug_struct("OAuth2").finish_non_exhaustive(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig::from_str(DEFAULT_CONFIG).expect("Embedded config.default.toml must be valid")
    }
}

impl ClientConfig {
    /// Read and parse a configuration file, overlaying it on top of the embedded defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Self::from_str_with_defaults(&raw)
    }

    /// Parse a raw TOML string, overlaying it on top of the embedded defaults.
    pub fn from_str_with_defaults(raw: &str) -> Result<Self, ConfigError> {
        let defaults: toml::Value = DEFAULT_CONFIG.parse()?;
        let user: toml::Value = raw.parse()?;

        let merged = merge(defaults, user, "")?;
        Ok(merged.try_into::<Self>()?)
    }

    /// Defaults pointed at the development sandbox.
    pub fn sandbox() -> Self {
        Self {
            base_url: Url::parse(crate::SANDBOX_URL).expect("SANDBOX_URL is a valid URL"),
            ..Self::default()
        }
    }

    /// `request_timeout_ms` as a duration, `None` when disabled.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_ms > 0).then(|| Duration::from_millis(self.request_timeout_ms))
    }

    /// Build the shared transport this configuration describes.
    pub fn http_client(&self) -> Result<OsmHttpClient, BuildError> {
        let mut builder = OsmHttpClient::builder();
        if let Some(timeout) = self.request_timeout() {
            builder.request_timeout(timeout);
        }
        if let Some(extra) = &self.user_agent_extra {
            builder.user_agent_extra(extra.as_str());
        }
        builder.build()
    }
}

impl FromStr for ClientConfig {
    type Err = toml::de::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        toml::from_str(s)
    }
}

/// Deep-merge `overlay` into `base`. Tables merge key by key, anything else is replaced.
fn merge(base: toml::Value, overlay: toml::Value, path: &str) -> Result<toml::Value, ConfigError> {
    match (base, overlay) {
        (toml::Value::Table(mut base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                let key_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                let merged = match base.remove(&key) {
                    Some(existing) => merge(existing, value, &key_path)?,
                    None => value,
                };
                base.insert(key, merged);
            }
            Ok(toml::Value::Table(base))
        }
        (toml::Value::Table(_), _) | (_, toml::Value::Table(_)) => Err(ConfigError::Merge(
            format!("`{path}` must keep the type of its default (table vs. value)"),
        )),
        (_, overlay) => Ok(overlay),
    }
}
