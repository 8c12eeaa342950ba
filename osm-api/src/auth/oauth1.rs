use std::{
    fmt,
    time::{SystemTime, UNIX_EPOCH},
};

use base64::{Engine, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rand::{Rng, distr::Alphanumeric};
use reqwest::{Method, header::HeaderValue};
use sha1::Sha1;
use url::Url;

use super::{AuthStrategy, sensitive_header};
use crate::errors::{Error, Result};

type HmacSha1 = Hmac<Sha1>;

/// Characters left as-is by RFC 5849 §3.6: ALPHA, DIGIT, `-`, `.`, `_`, `~`.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

const NONCE_LENGTH: usize = 32;

fn encode(value: &str) -> String {
    utf8_percent_encode(value, UNRESERVED).to_string()
}

/// OAuth 1.0a request signing with HMAC-SHA1.
///
/// Each request is signed over its method, its URL without query, and the
/// query parameters together with the protocol parameters. Multipart and XML
/// bodies are not part of the signature.
#[derive(Clone)]
pub struct OAuth1 {
    consumer_key: String,
    consumer_secret: String,
    token: String,
    token_secret: String,
}

impl OAuth1 {
    /// Credentials of a registered consumer and an access token issued to it.
    pub fn new(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        token: impl Into<String>,
        token_secret: impl Into<String>,
    ) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            token: token.into(),
            token_secret: token_secret.into(),
        }
    }

    /// The full `OAuth ...` header value for a fixed nonce and timestamp.
    pub fn header_value(&self, method: &Method, url: &Url, nonce: &str, timestamp: u64) -> Result<String> {
        let timestamp = timestamp.to_string();
        let signature = self.signature(method, url, nonce, &timestamp)?;

        let fields = [
            ("oauth_consumer_key", self.consumer_key.as_str()),
            ("oauth_nonce", nonce),
            ("oauth_signature", signature.as_str()),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", timestamp.as_str()),
            ("oauth_token", self.token.as_str()),
            ("oauth_version", "1.0"),
        ];
        let fields: Vec<String> = fields
            .iter()
            .map(|(key, value)| format!("{key}=\"{}\"", encode(value)))
            .collect();

        Ok(format!("OAuth {}", fields.join(", ")))
    }

    fn signature(&self, method: &Method, url: &Url, nonce: &str, timestamp: &str) -> Result<String> {
        let mut params: Vec<(String, String)> = url
            .query_pairs()
            .map(|(key, value)| (encode(&key), encode(&value)))
            .collect();
        params.extend(
            [
                ("oauth_consumer_key", self.consumer_key.as_str()),
                ("oauth_nonce", nonce),
                ("oauth_signature_method", "HMAC-SHA1"),
                ("oauth_timestamp", timestamp),
                ("oauth_token", self.token.as_str()),
                ("oauth_version", "1.0"),
            ]
            .iter()
            .map(|(key, value)| (encode(key), encode(value))),
        );
        params.sort();

        let normalized: Vec<String> = params
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        let base = format!(
            "{}&{}&{}",
            method.as_str().to_ascii_uppercase(),
            encode(&base_string_uri(url)?),
            encode(&normalized.join("&"))
        );

        let key = format!("{}&{}", encode(&self.consumer_secret), encode(&self.token_secret));
        let mut mac = HmacSha1::new_from_slice(key.as_bytes())
            .map_err(|err| Error::invalid(format!("unusable OAuth secret: {err}")))?;
        mac.update(base.as_bytes());

        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }
}

/// `scheme://host[:port]/path`, omitting the default port of the scheme.
fn base_string_uri(url: &Url) -> Result<String> {
    let host = url
        .host_str()
        .ok_or_else(|| Error::invalid(format!("cannot sign a URL without host: {url}")))?;
    let port = url.port().map(|port| format!(":{port}")).unwrap_or_default();
    Ok(format!(
        "{}://{}{port}{}",
        url.scheme(),
        host.to_ascii_lowercase(),
        url.path()
    ))
}

impl fmt::Debug for OAuth1 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth1")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"***")
            .field("token", &self.token)
            .field("token_secret", &"***")
            .finish()
    }
}

impl AuthStrategy for OAuth1 {
    fn authorization(&self, method: &Method, url: &Url) -> Result<HeaderValue> {
        let nonce: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(NONCE_LENGTH)
            .map(char::from)
            .collect();
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();

        sensitive_header(&self.header_value(method, url, &nonce, timestamp)?)
    }
}
