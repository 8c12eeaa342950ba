//! Pluggable request authentication.
//!
//! A client holds an optional [`AuthStrategy`]. At send time the transport
//! asks it for the `Authorization` header of that exact request; the strategy
//! keeps nothing but the credentials it was built with.

use std::fmt::Debug;

use reqwest::{Method, header::HeaderValue};
use url::Url;

use crate::errors::{Error, Result};

mod basic;
mod oauth1;
mod oauth2;

pub use basic::BasicAuth;
pub use oauth1::OAuth1;
pub use oauth2::OAuth2;

/// Produces the `Authorization` header for a request.
///
/// Implement this to plug in a scheme the crate does not ship.
///
/// ```
/// use osm_api::{AuthStrategy, Method, Result};
/// use reqwest::header::HeaderValue;
/// use url::Url;
///
/// #[derive(Debug)]
/// struct StaticHeader(&'static str);
///
/// impl AuthStrategy for StaticHeader {
///     fn authorization(&self, _method: &Method, _url: &Url) -> Result<HeaderValue> {
///         Ok(HeaderValue::from_static(self.0))
///     }
/// }
/// ```
pub trait AuthStrategy: Send + Sync + Debug {
    /// Header value for a `method` request to `url`.
    fn authorization(&self, method: &Method, url: &Url) -> Result<HeaderValue>;
}

/// Build a sensitive header value, rejecting credentials that cannot be sent in a header.
pub(crate) fn sensitive_header(value: &str) -> Result<HeaderValue> {
    let mut header = HeaderValue::from_str(value)
        .map_err(|err| Error::invalid(format!("credentials are not a valid header value: {err}")))?;
    header.set_sensitive(true);
    Ok(header)
}
