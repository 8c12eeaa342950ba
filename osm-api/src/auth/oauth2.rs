use std::fmt;

use reqwest::{Method, header::HeaderValue};
use url::Url;

use super::{AuthStrategy, sensitive_header};
use crate::errors::Result;

/// OAuth 2 bearer token.
#[derive(Clone)]
pub struct OAuth2 {
    token: String,
}

impl OAuth2 {
    /// Authenticate with an access token obtained out of band.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl fmt::Debug for OAuth2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth2").field("token", &"***").finish()
    }
}

impl AuthStrategy for OAuth2 {
    fn authorization(&self, _method: &Method, _url: &Url) -> Result<HeaderValue> {
        sensitive_header(&format!("Bearer {}", self.token))
    }
}
