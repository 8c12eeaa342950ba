//! Read-only queries against Overpass API interpreters.
//!
//! [`OverpassQuery`] renders the Overpass QL text for "every element of one
//! type with these tags inside a box, plus its parents". [`OverpassClient`]
//! sends any QL text to an ordered list of interpreters and moves on to the
//! next one when an interpreter is unreachable or overloaded.
//!
//! ```no_run
//! # use osm_api::{Bounds, ElementType, OsmHttpClient, OverpassClient, OverpassQuery};
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let overpass = OverpassClient::with_default_endpoint(OsmHttpClient::new()?)?;
//! let query = OverpassQuery::new(ElementType::Node, Bounds::new(11.9, 57.69, 11.92, 57.71), 25)
//!     .tag("name")
//!     .tag_value("amenity", "bench");
//! let json = overpass.run(&query).await?;
//! # Ok(()) }
//! ```

use osm_common::{Bounds, ElementType};
use reqwest::{Method, StatusCode};
use url::Url;

use crate::{
    client::{OsmHttpClient, RequestBody, RequestOptions},
    errors::{BuildError, Error, Result},
    validate,
};

/// The main public interpreter.
pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// Builder for a bounded tag query.
///
/// Each value owns its filters, so queries can be built concurrently.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct OverpassQuery {
    element_type: ElementType,
    bounds: Bounds,
    timeout: u32,
    filters: Vec<(String, Option<String>)>,
}

impl OverpassQuery {
    /// Elements of `element_type` inside `bounds`, with a server-side timeout in seconds.
    pub fn new(element_type: ElementType, bounds: Bounds, timeout: u32) -> Self {
        Self {
            element_type,
            bounds,
            timeout,
            filters: Vec::new(),
        }
    }

    /// Require tag `key` to be present.
    pub fn tag(mut self, key: impl Into<String>) -> Self {
        self.filters.push((key.into(), None));
        self
    }

    /// Require tag `key` to equal `value`.
    pub fn tag_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((key.into(), Some(value.into())));
        self
    }

    /// Render the QL text.
    ///
    /// ```
    /// # use osm_api::{Bounds, ElementType, OverpassQuery};
    /// let query = OverpassQuery::new(ElementType::Node, Bounds::new(11.9, 57.69, 11.92, 57.71), 2)
    ///     .tag_value("amenity", "bench");
    /// assert_eq!(
    ///     query.build()?,
    ///     "[out:json][timeout:2];(node[amenity=bench](57.69,11.9,57.71,11.92);<;);out meta;"
    /// );
    /// # Ok::<_, osm_api::Error>(())
    /// ```
    pub fn build(&self) -> Result<String> {
        validate::bounds(&self.bounds)?;
        let area = self
            .bounds
            .to_overpass()
            .ok_or_else(|| Error::invalid("no bound may be missing"))?;

        let mut filters = String::new();
        for (key, value) in &self.filters {
            if key.is_empty() {
                return Err(Error::invalid("Overpass tag filter needs a key"));
            }
            filters.push('[');
            filters.push_str(&ql_string(key));
            if let Some(value) = value {
                filters.push('=');
                filters.push_str(&ql_string(value));
            }
            filters.push(']');
        }

        Ok(format!(
            "[out:json][timeout:{}];({}{filters}{area};<;);out meta;",
            self.timeout, self.element_type
        ))
    }
}

/// Bare identifiers stay as they are, anything else is quoted.
fn ql_string(raw: &str) -> String {
    if raw
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
    {
        raw.to_string()
    } else {
        format!("\"{}\"", raw.replace('\\', "\\\\").replace('"', "\\\""))
    }
}

/// Client for one or more Overpass interpreters.
///
/// Interpreters are tried in order. A transport failure, a `429 Too Many
/// Requests` or any 5xx moves on to the next one; other rejections are
/// returned at once. When every interpreter fails, the last error is returned.
#[derive(Debug, Clone)]
pub struct OverpassClient {
    client: OsmHttpClient,
    endpoints: Vec<Url>,
    options: RequestOptions,
}

impl OverpassClient {
    /// Client for `endpoints`, tried in the given order.
    pub fn new(client: OsmHttpClient, endpoints: Vec<Url>) -> std::result::Result<Self, BuildError> {
        if endpoints.is_empty() {
            return Err(BuildError::NoEndpoints);
        }
        Ok(Self {
            client,
            endpoints,
            options: RequestOptions::default(),
        })
    }

    /// Client for [`DEFAULT_OVERPASS_URL`].
    pub fn with_default_endpoint(client: OsmHttpClient) -> std::result::Result<Self, BuildError> {
        Self::new(client, vec![Url::parse(DEFAULT_OVERPASS_URL)?])
    }

    /// Apply `options` to every request.
    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    /// Interpreters, in the order they are tried.
    pub fn endpoints(&self) -> &[Url] {
        &self.endpoints
    }

    /// Run QL text and return the body as served.
    pub async fn query(&self, data: &str) -> Result<String> {
        let mut last_error = None;

        for endpoint in &self.endpoints {
            let mut url = endpoint.clone();
            url.query_pairs_mut().append_pair("data", data);

            match self
                .client
                .send(Method::GET, url, RequestBody::Empty, None, &self.options)
                .await
            {
                Ok(response) => return response.into_text(),
                Err(error) if should_fail_over(&error) => {
                    tracing::warn!(%endpoint, %error, "Overpass interpreter unavailable, trying next");
                    last_error = Some(error);
                }
                Err(error) => return Err(error),
            }
        }

        Err(last_error.unwrap_or_else(|| Error::invalid("no Overpass interpreter configured")))
    }

    /// Run QL text and decode the JSON answer.
    pub async fn query_json(&self, data: &str) -> Result<serde_json::Value> {
        let body = self.query(data).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Build and run `query`.
    pub async fn run(&self, query: &OverpassQuery) -> Result<serde_json::Value> {
        self.query_json(&query.build()?).await
    }
}

fn should_fail_over(error: &Error) -> bool {
    match error {
        Error::Transport(_) => true,
        Error::Api(api) => {
            api.status == StatusCode::TOO_MANY_REQUESTS || api.status.is_server_error()
        }
        _ => false,
    }
}
