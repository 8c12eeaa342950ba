//! High-level façade for the `osm-api` crate.
//!
//! ## Mental model
//! - `OsmApi` - your entrypoint/handle to the SDK. Owns an `OsmHttpClient` and a base URL.
//! - `NonAuthClient` - anonymous reads (and anonymous notes).
//! - `AuthClient` - every read plus the writes, on behalf of one user.
//! - `OverpassClient` - read-only queries against Overpass interpreters.
//!
//! All handles share the façade's connection pool.
//!
//! ## Quick starts
//! ### 1) Anonymous read
//! ```no_run
//! use osm_api::OsmApi;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let api = OsmApi::new()?;
//! let node = api.non_auth_client().get_node(1).await?;
//! # Ok(()) }
//! ```
//!
//! ### 2) Edit in a changeset
//! ```no_run
//! use std::sync::Arc;
//! use osm_api::{Node, OAuth2, OsmApi, Tags};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let api = OsmApi::sandbox()?;
//! let client = api.auth_client(Arc::new(OAuth2::new("access-token")));
//!
//! let tags = Tags::from([("comment", "Add a bench"), ("created_by", "myeditor/1.0")]);
//! let changeset = client.create_changeset(tags).await?;
//! let bench = Node {
//!     latitude: Some(51.5),
//!     longitude: Some(-0.1),
//!     tags: Tags::from([("amenity", "bench")]),
//!     ..Node::default()
//! };
//! let id = client.create_element(changeset, bench).await?;
//! client.close_changeset(changeset).await?;
//! # Ok(()) }
//! ```
//!
//! ### 3) From a configuration file
//! ```no_run
//! use osm_api::{ClientConfig, OsmApi};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::from_file("osm.toml")?;
//! let api = OsmApi::from_config(&config)?;
//! let client = api.auth_client_from_config(&config)?;
//! let me = client.get_user_details().await?;
//! # Ok(()) }
//! ```

use std::sync::Arc;

use url::Url;

use crate::{
    AuthClient, AuthStrategy, BuildError, ClientConfig, NonAuthClient, OsmHttpClient,
    OverpassClient, api::DEFAULT_CHUNK_SIZE, overpass::DEFAULT_OVERPASS_URL,
};

/// The main OpenStreetMap API.
pub const PRODUCTION_URL: &str = "https://www.openstreetmap.org/api/";

/// The development sandbox. Edits there never reach the real map.
pub const SANDBOX_URL: &str = "https://master.apis.dev.openstreetmap.org/api/";

/// High-level façade. Owns an `OsmHttpClient` and constructs the clients.
#[derive(Clone, Debug)]
pub struct OsmApi {
    client: OsmHttpClient,
    base_url: Url,
    chunk_size: usize,
    overpass_urls: Vec<Url>,
}

impl OsmApi {
    /// Construct with defaults against [`PRODUCTION_URL`].
    pub fn new() -> Result<Self, BuildError> {
        Self::with_base_url(OsmHttpClient::new()?, PRODUCTION_URL)
    }

    /// Construct with defaults against [`SANDBOX_URL`].
    pub fn sandbox() -> Result<Self, BuildError> {
        Self::with_base_url(OsmHttpClient::new()?, SANDBOX_URL)
    }

    /// Construct from an already-configured transport and a base URL.
    pub fn with_base_url(client: OsmHttpClient, base_url: &str) -> Result<Self, BuildError> {
        Ok(Self::with_client(client, Url::parse(base_url)?))
    }

    /// Construct from an already-configured transport.
    pub fn with_client(client: OsmHttpClient, base_url: Url) -> Self {
        Self {
            client,
            base_url,
            chunk_size: DEFAULT_CHUNK_SIZE,
            overpass_urls: Vec::new(),
        }
    }

    /// Build the transport and settings described by `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, BuildError> {
        if config.multi_fetch_chunk_size == 0 {
            return Err(BuildError::ZeroChunkSize);
        }
        Ok(Self {
            client: config.http_client()?,
            base_url: config.base_url.clone(),
            chunk_size: config.multi_fetch_chunk_size,
            overpass_urls: config.overpass_urls.clone(),
        })
    }

    /// Ids per multi-fetch request for every client built from here on.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Result<Self, BuildError> {
        if chunk_size == 0 {
            return Err(BuildError::ZeroChunkSize);
        }
        self.chunk_size = chunk_size;
        Ok(self)
    }

    /// Anonymous client.
    pub fn non_auth_client(&self) -> NonAuthClient {
        NonAuthClient {
            chunk_size: self.chunk_size,
            ..NonAuthClient::new(self.client.clone(), self.base_url.clone())
        }
    }

    /// Client whose requests all carry `auth`.
    pub fn auth_client(&self, auth: Arc<dyn AuthStrategy>) -> AuthClient {
        AuthClient::from_reader(self.non_auth_client(), auth)
    }

    /// Client authenticated with the `[auth]` table of `config`.
    pub fn auth_client_from_config(&self, config: &ClientConfig) -> Result<AuthClient, BuildError> {
        let auth = config.auth.as_ref().ok_or(BuildError::MissingCredentials)?;
        Ok(self.auth_client(auth.strategy()))
    }

    /// Overpass client over the configured interpreters, or [`DEFAULT_OVERPASS_URL`].
    pub fn overpass_client(&self) -> Result<OverpassClient, BuildError> {
        if self.overpass_urls.is_empty() {
            OverpassClient::with_default_endpoint(self.client.clone())
        } else {
            OverpassClient::new(self.client.clone(), self.overpass_urls.clone())
        }
    }

    /// Base URL of the API.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Access the underlying transport (advanced use).
    #[inline]
    pub fn client(&self) -> &OsmHttpClient {
        &self.client
    }
}
