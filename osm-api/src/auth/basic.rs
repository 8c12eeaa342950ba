use std::fmt;

use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::{Method, header::HeaderValue};
use url::Url;

use super::{AuthStrategy, sensitive_header};
use crate::errors::Result;

/// HTTP Basic authentication.
///
/// The OSM API is retiring Basic auth in favour of OAuth 2; prefer
/// [`super::OAuth2`] where possible.
#[derive(Clone)]
pub struct BasicAuth {
    username: String,
    password: String,
}

impl BasicAuth {
    /// Credentials for `username`.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

impl AuthStrategy for BasicAuth {
    fn authorization(&self, _method: &Method, _url: &Url) -> Result<HeaderValue> {
        let credentials = STANDARD.encode(format!("{}:{}", self.username, self.password));
        sensitive_header(&format!("Basic {credentials}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_username_and_password() {
        let url = Url::parse("https://api.example/api/0.6/user/details").unwrap();
        let header = BasicAuth::new("user", "pass")
            .authorization(&Method::GET, &url)
            .unwrap();
        assert_eq!(header.to_str().unwrap(), "Basic dXNlcjpwYXNz");
        assert!(header.is_sensitive());
    }

    #[test]
    fn debug_hides_the_password() {
        let shown = format!("{:?}", BasicAuth::new("user", "hunter2"));
        assert!(shown.contains("user"));
        assert!(!shown.contains("hunter2"));
    }
}
