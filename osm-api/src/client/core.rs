use std::time::Duration;

use crate::errors::BuildError;

const DEFAULT_USER_AGENT: &str = concat!("osm-api-rs", "/", env!("CARGO_PKG_VERSION"),);

/// Configures an [`OsmHttpClient`] before construction.
///
/// Most code obtains this via [`OsmHttpClient::builder()`], which simply returns
/// `OsmHttpClientBuilder::default()`.
///
/// # Defaults
/// - HTTP request timeout: reqwest default (no global timeout) unless set via
///   [`Self::request_timeout`]
/// - User-agent: `osm-api-rs/<crate-version>` plus any [`Self::user_agent_extra`]
///
/// # Example
/// ```no_run
/// use std::time::Duration;
/// # use osm_api::OsmHttpClient;
/// let client = OsmHttpClient::builder()
///     .request_timeout(Duration::from_secs(10))
///     .user_agent_extra("myeditor/1.2.3")
///     .build()?;
/// # Ok::<_, osm_api::BuildError>(())
/// ```
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct OsmHttpClientBuilder {
    http_request_timeout: Option<Duration>,

    /// Optional user-agent segment appended to the default UA. The OSM usage
    /// policy asks editors to identify themselves.
    user_agent_extra: Option<String>,
}

impl OsmHttpClientBuilder {
    /// Set a timeout applied to every request sent through the client.
    pub fn request_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.http_request_timeout = Some(timeout);

        self
    }

    /// Append an extra user-agent segment after the default `osm-api-rs/<version>`.
    /// Example: `.user_agent_extra("myeditor/1.2.3")`
    pub fn user_agent_extra<S: Into<String>>(&mut self, extra: S) -> &mut Self {
        self.user_agent_extra = Some(extra.into());
        self
    }

    /// Build [`OsmHttpClient`]
    pub fn build(&self) -> Result<OsmHttpClient, BuildError> {
        // Compose user agent with optional extra part.
        let user_agent = match &self.user_agent_extra {
            Some(extra) if !extra.trim().is_empty() => {
                &format!("{DEFAULT_USER_AGENT} {}", extra.trim())
            }
            _ => DEFAULT_USER_AGENT,
        };

        let mut http_builder = reqwest::Client::builder().user_agent(user_agent);

        if let Some(timeout) = self.http_request_timeout {
            http_builder = http_builder.timeout(timeout);
        }

        Ok(OsmHttpClient {
            http: http_builder.build()?,
        })
    }
}

/// Transport shared by every OSM and Overpass client.
///
/// `OsmHttpClient` wraps one long-lived [`reqwest::Client`], so clones share a
/// single connection pool and it is safe to use from many tasks at once. It
/// holds no per-call state: credentials, deadlines and cancellation travel
/// with each [`OsmHttpClient::send`].
///
/// ### Construction
/// Use [`OsmHttpClient::builder()`] to tweak the timeout or user-agent, or pick
/// defaults via [`OsmHttpClient::new()`]. An existing `reqwest::Client` can be
/// adopted with [`OsmHttpClient::from_reqwest`].
///
/// ```no_run
/// # use osm_api::OsmHttpClient;
/// let client = OsmHttpClient::new()?;
/// # Ok::<_, osm_api::BuildError>(())
/// ```
#[derive(Clone, Debug)]
pub struct OsmHttpClient {
    pub(crate) http: reqwest::Client,
}

impl OsmHttpClient {
    /// Creates a client with default settings.
    pub fn new() -> Result<OsmHttpClient, BuildError> {
        Self::builder().build()
    }

    /// Returns a builder to edit settings before creating [`OsmHttpClient`].
    pub fn builder() -> OsmHttpClientBuilder {
        OsmHttpClientBuilder::default()
    }

    /// Wrap an already configured reqwest client.
    pub fn from_reqwest(http: reqwest::Client) -> Self {
        Self { http }
    }

    // === Getters ===

    /// Returns a reference to the internal reqwest client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }
}
