//! The single request path every client call goes through.

use std::time::Duration;

use bytes::Bytes;
use reqwest::{
    Method, StatusCode,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap},
    multipart::Form,
};
use tokio_util::sync::CancellationToken;
use url::Url;

use super::core::OsmHttpClient;
use crate::{
    auth::AuthStrategy,
    errors::{Error, Result, TransportError},
    util::check_http_status,
};

/// Per-call limits.
///
/// A `timeout` bounds the whole exchange, body included. A `cancellation`
/// token aborts the call with [`TransportError::Cancelled`] as soon as it fires.
///
/// ```
/// use std::time::Duration;
/// use osm_api::RequestOptions;
/// use tokio_util::sync::CancellationToken;
///
/// let token = CancellationToken::new();
/// let options = RequestOptions::new()
///     .timeout(Duration::from_secs(5))
///     .cancellation(token.clone());
/// assert_eq!(options.timeout, Some(Duration::from_secs(5)));
/// ```
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct RequestOptions {
    /// Deadline for the whole request.
    pub timeout: Option<Duration>,
    /// Token that cancels the request when fired.
    pub cancellation: Option<CancellationToken>,
}

impl RequestOptions {
    /// No deadline, no cancellation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-call deadline.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the cancellation token.
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }
}

/// Body of an outgoing request.
#[derive(Debug, Default)]
pub enum RequestBody {
    /// No body. Writes still send `Content-Length: 0`.
    #[default]
    Empty,
    /// An XML document.
    Xml(String),
    /// Plain text, such as a preference value.
    Text(String),
    /// A multipart form, such as a trace upload.
    Multipart(Form),
}

/// A fully read response.
#[derive(Debug, Clone)]
pub struct OsmResponse {
    /// Final URL of the request.
    pub url: Url,
    /// Status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body.
    pub body: Bytes,
}

impl OsmResponse {
    /// The body as UTF-8 text.
    pub fn text(&self) -> Result<&str> {
        Ok(std::str::from_utf8(&self.body)?)
    }

    /// Consume the response, keeping the body as owned UTF-8 text.
    pub fn into_text(self) -> Result<String> {
        String::from_utf8(self.body.to_vec()).map_err(|err| Error::from(err.utf8_error()))
    }

    /// Value of header `name`, if present and printable.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

impl OsmHttpClient {
    /// Send one request and read its response.
    ///
    /// - `auth`, when present, sets the `Authorization` header for this exact
    ///   method and URL.
    /// - `options` applies a deadline and/or cancellation to this call only.
    /// - A non-2xx status becomes [`Error::Api`] carrying the body text; a
    ///   failure to get any response becomes [`Error::Transport`].
    ///
    /// Every call emits one `tracing` event with the method, URL and outcome.
    ///
    /// # Example
    /// ```no_run
    /// # use osm_api::{OsmHttpClient, RequestBody, RequestOptions, Method, Result};
    /// # async fn run() -> Result<()> {
    /// let client = OsmHttpClient::new().expect("client");
    /// let url = url::Url::parse("https://www.openstreetmap.org/api/versions").expect("url");
    /// let response = client
    ///     .send(Method::GET, url, RequestBody::Empty, None, &RequestOptions::new())
    ///     .await?;
    /// println!("{}", response.text()?);
    /// # Ok(()) }
    /// ```
    pub async fn send(
        &self,
        method: Method,
        url: Url,
        body: RequestBody,
        auth: Option<&dyn AuthStrategy>,
        options: &RequestOptions,
    ) -> Result<OsmResponse> {
        let mut request = self.http.request(method.clone(), url.clone());

        if let Some(auth) = auth {
            request = request.header(AUTHORIZATION, auth.authorization(&method, &url)?);
        }
        if let Some(timeout) = options.timeout {
            request = request.timeout(timeout);
        }

        request = match body {
            RequestBody::Empty if method == Method::GET || method == Method::HEAD => request,
            RequestBody::Empty => request.body(""),
            RequestBody::Xml(xml) => request
                .header(CONTENT_TYPE, "text/xml; charset=utf-8")
                .body(xml),
            RequestBody::Text(text) => request
                .header(CONTENT_TYPE, "text/plain; charset=utf-8")
                .body(text),
            RequestBody::Multipart(form) => request.multipart(form),
        };

        let exchange = async {
            let response = request.send().await?;
            let url = response.url().clone();
            let status = response.status();
            let headers = response.headers().clone();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>(OsmResponse {
                url,
                status,
                headers,
                body,
            })
        };

        let outcome = match &options.cancellation {
            Some(token) => tokio::select! {
                biased;
                () = token.cancelled() => {
                    tracing::warn!(%method, %url, "request cancelled");
                    return Err(Error::from(TransportError::Cancelled));
                }
                outcome = exchange => outcome,
            },
            None => exchange.await,
        };

        let response = match outcome {
            Ok(response) => response,
            Err(error) => {
                tracing::error!(%method, %url, %error, "request failed");
                return Err(error.into());
            }
        };

        let status = response.status.as_u16();
        if response.status.is_success() {
            tracing::info!(%method, %url, status, "request succeeded");
        } else {
            tracing::warn!(
                %method,
                %url,
                status,
                reason = %String::from_utf8_lossy(&response.body).trim(),
                "request rejected"
            );
        }

        check_http_status(response)
    }
}
