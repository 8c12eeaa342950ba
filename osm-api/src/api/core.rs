use std::{ops::Deref, sync::Arc};

use osm_common::{DataIntegrityError, Osm, from_xml, to_xml};
use reqwest::Method;
use serde::Serialize;
use url::Url;

use crate::{
    auth::AuthStrategy,
    client::{OsmHttpClient, OsmResponse, RequestBody, RequestOptions},
    errors::{BuildError, Error, Result},
};

/// Ids per request when fetching many elements at once.
///
/// The API enforces a maximum URL length, and 400 ids stay well below it.
pub const DEFAULT_CHUNK_SIZE: usize = 400;

/// Read access to an OSM API v0.6 server.
///
/// Every read endpoint is one method. Without credentials the requests are
/// anonymous; a client handed out by [`AuthClient`] signs them as well.
///
/// The client is cheap to clone. Per-call limits are set on a clone:
///
/// ```no_run
/// # use std::time::Duration;
/// # use osm_api::{OsmApi, RequestOptions};
/// # async fn run(api: OsmApi) -> osm_api::Result<()> {
/// let reader = api
///     .non_auth_client()
///     .with_options(RequestOptions::new().timeout(Duration::from_secs(3)));
/// let versions = reader.get_versions().await?;
/// # Ok(()) }
/// ```
#[derive(Debug, Clone)]
pub struct NonAuthClient {
    pub(crate) client: OsmHttpClient,
    pub(crate) base_url: Url,
    pub(crate) auth: Option<Arc<dyn AuthStrategy>>,
    pub(crate) options: RequestOptions,
    pub(crate) chunk_size: usize,
}

impl NonAuthClient {
    /// Anonymous client for the API under `base_url`, such as
    /// `https://www.openstreetmap.org/api/`.
    ///
    /// A missing trailing slash is added so relative endpoint paths resolve
    /// below the base rather than replacing its last segment.
    pub fn new(client: OsmHttpClient, mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Self {
            client,
            base_url,
            auth: None,
            options: RequestOptions::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Apply `options` to every call made through this client.
    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    /// Ids per multi-fetch request.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> std::result::Result<Self, BuildError> {
        if chunk_size == 0 {
            return Err(BuildError::ZeroChunkSize);
        }
        self.chunk_size = chunk_size;
        Ok(self)
    }

    // === Getters ===

    /// Base URL every endpoint path is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Ids per multi-fetch request.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Shared transport.
    pub fn client(&self) -> &OsmHttpClient {
        &self.client
    }

    /// Whether requests carry credentials.
    pub fn is_authenticated(&self) -> bool {
        self.auth.is_some()
    }

    // === Request plumbing ===

    pub(crate) fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// `path` plus one more segment, percent-encoded as a whole.
    pub(crate) fn url_with_segment(&self, path: &str, segment: &str) -> Result<Url> {
        let mut url = self.url(path)?;
        url.path_segments_mut()
            .map_err(|()| Error::invalid("base URL cannot carry path segments"))?
            .push(segment);
        Ok(url)
    }

    pub(crate) async fn send(
        &self,
        method: Method,
        url: Url,
        body: RequestBody,
    ) -> Result<OsmResponse> {
        self.client
            .send(method, url, body, self.auth.as_deref(), &self.options)
            .await
    }

    pub(crate) async fn get(&self, url: Url) -> Result<OsmResponse> {
        self.send(Method::GET, url, RequestBody::Empty).await
    }

    /// `GET` and decode an `<osm>` document.
    pub(crate) async fn get_osm(&self, url: Url) -> Result<Osm> {
        let response = self.get(url).await?;
        Ok(from_xml(response.text()?)?)
    }

    /// Send `body` and decode the `<osm>` document that comes back.
    pub(crate) async fn send_osm(&self, method: Method, url: Url, body: RequestBody) -> Result<Osm> {
        let response = self.send(method, url, body).await?;
        Ok(from_xml(response.text()?)?)
    }
}

/// Serialize a request document.
pub(crate) fn xml_body<T: Serialize>(document: &T) -> Result<RequestBody> {
    Ok(RequestBody::Xml(to_xml(document)?))
}

/// `Ok(None)` when the server answered 404 or 410.
pub(crate) fn found<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_not_found() => Ok(None),
        Err(err) => Err(err),
    }
}

/// The single entity a response is expected to hold.
pub(crate) fn first<T>(items: Vec<T>, what: &'static str) -> Result<T> {
    items
        .into_iter()
        .next()
        .ok_or(Error::DataIntegrity(DataIntegrityError::Empty(what)))
}

/// Read and write access to an OSM API v0.6 server on behalf of one user.
///
/// Every request, reads included, carries the credentials of the
/// [`AuthStrategy`] given at construction. All read endpoints of
/// [`NonAuthClient`] are available through `Deref`.
///
/// Changesets move from absent to open ([`AuthClient::create_changeset`]),
/// take any number of element writes while open, and end closed
/// ([`AuthClient::close_changeset`]). Whether a changeset is still open is
/// left to the server.
#[derive(Debug, Clone)]
pub struct AuthClient {
    reader: NonAuthClient,
    auth: Arc<dyn AuthStrategy>,
}

impl AuthClient {
    /// Client for the API under `base_url`, authenticating with `auth`.
    pub fn new(client: OsmHttpClient, base_url: Url, auth: Arc<dyn AuthStrategy>) -> Self {
        Self::from_reader(NonAuthClient::new(client, base_url), auth)
    }

    /// Upgrade `reader` so its requests carry `auth`.
    pub fn from_reader(mut reader: NonAuthClient, auth: Arc<dyn AuthStrategy>) -> Self {
        reader.auth = Some(Arc::clone(&auth));
        Self { reader, auth }
    }

    /// Apply `options` to every call made through this client.
    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.reader.options = options;
        self
    }

    /// Ids per multi-fetch request.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> std::result::Result<Self, BuildError> {
        self.reader = self.reader.with_chunk_size(chunk_size)?;
        Ok(self)
    }

    /// The strategy signing every request.
    pub fn strategy(&self) -> &Arc<dyn AuthStrategy> {
        &self.auth
    }

    /// The authenticated read side.
    pub fn reader(&self) -> &NonAuthClient {
        &self.reader
    }
}

impl Deref for AuthClient {
    type Target = NonAuthClient;

    fn deref(&self) -> &Self::Target {
        &self.reader
    }
}

#[cfg(test)]
mod tests {
    use httpmock::{Method::GET, MockServer};

    use super::*;
    use crate::{BasicAuth, StatusCode};

    fn reader(server: &MockServer) -> NonAuthClient {
        let base = Url::parse(&server.url("/api")).unwrap();
        NonAuthClient::new(OsmHttpClient::new().unwrap(), base)
    }

    #[test]
    fn base_url_gets_a_trailing_slash() {
        let client = NonAuthClient::new(
            OsmHttpClient::new().unwrap(),
            Url::parse("https://api.example/api").unwrap(),
        );
        assert_eq!(
            client.url("0.6/capabilities").unwrap().as_str(),
            "https://api.example/api/0.6/capabilities"
        );
        assert_eq!(client.chunk_size(), DEFAULT_CHUNK_SIZE);
        assert!(!client.is_authenticated());
    }

    #[test]
    fn extra_segments_are_encoded() {
        let client = NonAuthClient::new(
            OsmHttpClient::new().unwrap(),
            Url::parse("https://api.example/api/").unwrap(),
        );
        let url = client
            .url_with_segment("0.6/user/preferences", "editor/theme color")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example/api/0.6/user/preferences/editor%2Ftheme%20color"
        );
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        let client = NonAuthClient::new(
            OsmHttpClient::new().unwrap(),
            Url::parse("https://api.example/api/").unwrap(),
        );
        assert!(matches!(
            client.clone().with_chunk_size(0),
            Err(BuildError::ZeroChunkSize)
        ));
        assert_eq!(client.with_chunk_size(2).unwrap().chunk_size(), 2);
    }

    #[tokio::test]
    async fn missing_resources_become_none() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/0.6/node/1");
                then.status(410).body("gone");
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/0.6/node/2");
                then.status(500).body("boom");
            })
            .await;

        let client = reader(&server);
        let gone = found(client.get(client.url("0.6/node/1").unwrap()).await).unwrap();
        assert!(gone.is_none());

        let err = found(client.get(client.url("0.6/node/2").unwrap()).await).unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[tokio::test]
    async fn auth_client_signs_reads() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/versions")
                    .header("authorization", "Basic dXNlcjpwYXNz");
                then.status(200)
                    .body(r#"<osm><api><version>0.6</version></api></osm>"#);
            })
            .await;

        let base = Url::parse(&server.url("/api/")).unwrap();
        let client = AuthClient::new(
            OsmHttpClient::new().unwrap(),
            base,
            Arc::new(BasicAuth::new("user", "pass")),
        );
        assert!(client.is_authenticated());

        let versions = client.get_versions().await.unwrap();
        mock.assert_async().await;
        assert_eq!(versions, vec!["0.6".to_string()]);
    }
}
