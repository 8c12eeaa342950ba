use osm_common::{Api, Bounds, Osm, Policy};

use super::core::NonAuthClient;
use crate::{Result, validate};

/// What `capabilities` reports: server limits and the imagery policy.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Capabilities {
    /// Limits and service status.
    pub api: Api,
    /// Usage policy, when the server publishes one.
    pub policy: Option<Policy>,
}

impl NonAuthClient {
    /// Protocol versions the server speaks, such as `["0.6"]`.
    pub async fn get_versions(&self) -> Result<Vec<String>> {
        let osm = self.get_osm(self.url("versions")?).await?;
        Ok(osm.api.map(|api| api.version_names()).unwrap_or_default())
    }

    /// Limits and policy of the server.
    pub async fn get_capabilities(&self) -> Result<Capabilities> {
        let osm = self.get_osm(self.url("0.6/capabilities")?).await?;
        Ok(Capabilities {
            api: osm.api.unwrap_or_default(),
            policy: osm.policy,
        })
    }

    /// Every element inside `bounds`, plus the nodes of ways and the
    /// relations that reach into it.
    ///
    /// The server refuses areas that are too large; that refusal comes back
    /// as an [`crate::Error::Api`].
    ///
    /// # Example
    /// ```no_run
    /// # use osm_api::{Bounds, OsmApi};
    /// # async fn run(api: OsmApi) -> osm_api::Result<()> {
    /// let map = api
    ///     .non_auth_client()
    ///     .get_map(&Bounds::new(13.38, 52.51, 13.39, 52.52))
    ///     .await?;
    /// println!("{} nodes", map.nodes.len());
    /// # Ok(()) }
    /// ```
    pub async fn get_map(&self, bounds: &Bounds) -> Result<Osm> {
        validate::bounds(bounds)?;

        let mut url = self.url("0.6/map")?;
        if let Some(bbox) = bounds.to_bbox() {
            url.query_pairs_mut().append_pair("bbox", &bbox);
        }
        self.get_osm(url).await
    }
}
