mod elements;
mod notes_and_traces;
mod overpass;
mod utils;

use httpmock::MockServer;
use osm_api::{ClientConfig, OsmApi};

/// A mock API server and a façade configured to talk to it.
struct MockOsm {
    server: MockServer,
    config: ClientConfig,
    api: OsmApi,
}

impl MockOsm {
    async fn start() -> Self {
        Self::start_with("").await
    }

    /// Extra TOML is layered over the defaults, after `base_url`.
    async fn start_with(extra_toml: &str) -> Self {
        utils::init_tracing();

        let server = MockServer::start_async().await;
        let config = ClientConfig::from_str_with_defaults(&format!(
            "base_url = \"{}\"\nrequest_timeout_ms = 5000\nuser_agent_extra = \"e2e/0.1\"\n{extra_toml}",
            server.url("/api/")
        ))
        .unwrap();
        let api = OsmApi::from_config(&config).unwrap();

        Self {
            server,
            config,
            api,
        }
    }

    /// Same server, with OAuth 2 credentials.
    async fn start_authenticated() -> Self {
        Self::start_with("[auth]\nkind = \"oauth2\"\ntoken = \"e2e-token\"\n").await
    }

    fn auth_client(&self) -> osm_api::AuthClient {
        self.api.auth_client_from_config(&self.config).unwrap()
    }
}
