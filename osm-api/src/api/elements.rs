use std::collections::BTreeMap;

use futures_util::future::try_join_all;
use osm_common::{
    CompleteGraph, CompleteOsmGeo, CompleteRelation, CompleteWay, ElementStream, ElementType,
    Node, Osm, OsmGeo, OsmGeoKey, Relation, StreamElement, Way,
};
use reqwest::Method;

use super::core::{AuthClient, NonAuthClient, first, found, xml_body};
use crate::{Error, Result, util::parse_number, validate};

//
// NonAuthClient (reads)
//

impl NonAuthClient {
    /// Current version of node `id`, or `None` if it does not exist or was deleted.
    pub async fn get_node(&self, id: i64) -> Result<Option<Node>> {
        let osm = self.get_element_osm(&format!("0.6/node/{id}")).await?;
        osm.map(|osm| first(osm.nodes, "node")).transpose()
    }

    /// Current version of way `id`, or `None` if it does not exist or was deleted.
    pub async fn get_way(&self, id: i64) -> Result<Option<Way>> {
        let osm = self.get_element_osm(&format!("0.6/way/{id}")).await?;
        osm.map(|osm| first(osm.ways, "way")).transpose()
    }

    /// Current version of relation `id`, or `None` if it does not exist or was deleted.
    pub async fn get_relation(&self, id: i64) -> Result<Option<Relation>> {
        let osm = self.get_element_osm(&format!("0.6/relation/{id}")).await?;
        osm.map(|osm| first(osm.relations, "relation")).transpose()
    }

    /// Element `id` of kind `element_type` in complete form: a node as is,
    /// a way with its nodes, a relation with its members.
    pub async fn get_element(
        &self,
        element_type: ElementType,
        id: i64,
    ) -> Result<Option<CompleteOsmGeo>> {
        match element_type {
            ElementType::Node => Ok(self.get_node(id).await?.map(CompleteOsmGeo::Node)),
            ElementType::Way => Ok(self.get_complete_way(id).await?.map(CompleteOsmGeo::Way)),
            ElementType::Relation => Ok(self
                .get_complete_relation(id)
                .await?
                .map(CompleteOsmGeo::Relation)),
        }
    }

    /// Way `id` with every node it references.
    ///
    /// A node missing from the server's answer is a
    /// [`osm_common::DataIntegrityError`], never a gap in the way.
    pub async fn get_complete_way(&self, id: i64) -> Result<Option<CompleteWay>> {
        let Some(osm) = self.get_element_osm(&format!("0.6/way/{id}/full")).await? else {
            return Ok(None);
        };
        Ok(Some(CompleteGraph::new(osm).complete_way(id)?))
    }

    /// Relation `id` with its members. Member ways come with their nodes;
    /// member relations stay in their normalized form.
    pub async fn get_complete_relation(&self, id: i64) -> Result<Option<CompleteRelation>> {
        let Some(osm) = self
            .get_element_osm(&format!("0.6/relation/{id}/full"))
            .await?
        else {
            return Ok(None);
        };
        Ok(Some(CompleteGraph::new(osm).complete_relation(id)?))
    }

    /// Every version of node `id`, oldest first.
    pub async fn get_node_history(&self, id: i64) -> Result<ElementStream<Node>> {
        self.get_stream(&format!("0.6/node/{id}/history")).await
    }

    /// Every version of way `id`, oldest first.
    pub async fn get_way_history(&self, id: i64) -> Result<ElementStream<Way>> {
        self.get_stream(&format!("0.6/way/{id}/history")).await
    }

    /// Every version of relation `id`, oldest first.
    pub async fn get_relation_history(&self, id: i64) -> Result<ElementStream<Relation>> {
        self.get_stream(&format!("0.6/relation/{id}/history")).await
    }

    /// Node `id` as it was at `version`.
    pub async fn get_node_version(&self, id: i64, version: i32) -> Result<Option<Node>> {
        let osm = self
            .get_element_osm(&format!("0.6/node/{id}/{version}"))
            .await?;
        osm.map(|osm| first(osm.nodes, "node")).transpose()
    }

    /// Way `id` as it was at `version`.
    pub async fn get_way_version(&self, id: i64, version: i32) -> Result<Option<Way>> {
        let osm = self
            .get_element_osm(&format!("0.6/way/{id}/{version}"))
            .await?;
        osm.map(|osm| first(osm.ways, "way")).transpose()
    }

    /// Relation `id` as it was at `version`.
    pub async fn get_relation_version(&self, id: i64, version: i32) -> Result<Option<Relation>> {
        let osm = self
            .get_element_osm(&format!("0.6/relation/{id}/{version}"))
            .await?;
        osm.map(|osm| first(osm.relations, "relation")).transpose()
    }

    /// Current versions of the nodes `ids`.
    ///
    /// The ids are split into chunks of [`NonAuthClient::chunk_size`], one
    /// request each, all in flight at once. The first failing chunk fails the
    /// whole call. Results come back in no particular order.
    ///
    /// # Example
    /// ```no_run
    /// # async fn run(api: osm_api::OsmApi) -> osm_api::Result<()> {
    /// let nodes = api.non_auth_client().get_nodes(&[1, 2, 3]).await?;
    /// # Ok(()) }
    /// ```
    pub async fn get_nodes(&self, ids: &[i64]) -> Result<Vec<Node>> {
        self.multi_fetch(ElementType::Node, &plain_ids(ids)).await
    }

    /// Current versions of the ways `ids`. Chunked like [`NonAuthClient::get_nodes`].
    pub async fn get_ways(&self, ids: &[i64]) -> Result<Vec<Way>> {
        self.multi_fetch(ElementType::Way, &plain_ids(ids)).await
    }

    /// Current versions of the relations `ids`. Chunked like [`NonAuthClient::get_nodes`].
    pub async fn get_relations(&self, ids: &[i64]) -> Result<Vec<Relation>> {
        self.multi_fetch(ElementType::Relation, &plain_ids(ids)).await
    }

    /// Nodes by id, each at the given version or the current one.
    pub async fn get_nodes_with_versions(&self, ids: &[(i64, Option<i32>)]) -> Result<Vec<Node>> {
        self.multi_fetch(ElementType::Node, &versioned_ids(ids)).await
    }

    /// Ways by id, each at the given version or the current one.
    pub async fn get_ways_with_versions(&self, ids: &[(i64, Option<i32>)]) -> Result<Vec<Way>> {
        self.multi_fetch(ElementType::Way, &versioned_ids(ids)).await
    }

    /// Relations by id, each at the given version or the current one.
    pub async fn get_relations_with_versions(
        &self,
        ids: &[(i64, Option<i32>)],
    ) -> Result<Vec<Relation>> {
        self.multi_fetch(ElementType::Relation, &versioned_ids(ids))
            .await
    }

    /// Elements of any kind. Keys are grouped by kind and each group is
    /// fetched as in [`NonAuthClient::get_nodes`].
    pub async fn get_elements(&self, keys: &[OsmGeoKey]) -> Result<Vec<OsmGeo>> {
        let mut groups: BTreeMap<ElementType, Vec<i64>> = BTreeMap::new();
        for key in keys {
            groups.entry(key.element_type).or_default().push(key.id);
        }

        let fetches = groups.into_iter().map(|(element_type, ids)| async move {
            self.multi_fetch::<OsmGeo>(element_type, &plain_ids(&ids))
                .await
        });
        let groups = try_join_all(fetches).await?;
        Ok(groups.into_iter().flatten().collect())
    }

    /// Relations that have node `id` as a member.
    pub async fn get_node_relations(&self, id: i64) -> Result<ElementStream<Relation>> {
        self.get_stream(&format!("0.6/node/{id}/relations")).await
    }

    /// Relations that have way `id` as a member.
    pub async fn get_way_relations(&self, id: i64) -> Result<ElementStream<Relation>> {
        self.get_stream(&format!("0.6/way/{id}/relations")).await
    }

    /// Relations that have relation `id` as a member.
    pub async fn get_relation_relations(&self, id: i64) -> Result<ElementStream<Relation>> {
        self.get_stream(&format!("0.6/relation/{id}/relations"))
            .await
    }

    /// Ways that use node `id`.
    pub async fn get_node_ways(&self, id: i64) -> Result<ElementStream<Way>> {
        self.get_stream(&format!("0.6/node/{id}/ways")).await
    }

    async fn get_element_osm(&self, path: &str) -> Result<Option<Osm>> {
        found(self.get_osm(self.url(path)?).await)
    }

    pub(crate) async fn get_stream<T: StreamElement>(&self, path: &str) -> Result<ElementStream<T>> {
        let response = self.get(self.url(path)?).await?;
        Ok(ElementStream::new(response.into_text()?))
    }

    async fn multi_fetch<T: StreamElement>(
        &self,
        element_type: ElementType,
        ids: &[String],
    ) -> Result<Vec<T>> {
        let plural = element_type.plural();
        let path = format!("0.6/{plural}");

        let requests = ids.chunks(self.chunk_size).map(|chunk| {
            let path = path.as_str();
            async move {
                let mut url = self.url(path)?;
                url.query_pairs_mut().append_pair(plural, &chunk.join(","));
                let response = self.get(url).await?;
                ElementStream::<T>::new(response.into_text()?)
                    .collect::<std::result::Result<Vec<T>, _>>()
                    .map_err(Error::from)
            }
        });

        let chunks = try_join_all(requests).await?;
        Ok(chunks.into_iter().flatten().collect())
    }
}

fn plain_ids(ids: &[i64]) -> Vec<String> {
    ids.iter().map(ToString::to_string).collect()
}

fn versioned_ids(ids: &[(i64, Option<i32>)]) -> Vec<String> {
    ids.iter()
        .map(|(id, version)| match version {
            Some(version) => format!("{id}v{version}"),
            None => id.to_string(),
        })
        .collect()
}

//
// AuthClient (writes)
//

impl AuthClient {
    /// Create `element` in the open changeset `changeset_id`. Returns the new id.
    ///
    /// The changeset id is stamped into the element before it is sent.
    ///
    /// # Example
    /// ```no_run
    /// # use osm_api::{AuthClient, Node, Tags};
    /// # async fn run(client: AuthClient, changeset: i64) -> osm_api::Result<()> {
    /// let bench = Node {
    ///     latitude: Some(51.5),
    ///     longitude: Some(-0.12),
    ///     tags: Tags::from([("amenity", "bench")]),
    ///     ..Node::default()
    /// };
    /// let id = client.create_element(changeset, bench).await?;
    /// # Ok(()) }
    /// ```
    pub async fn create_element(&self, changeset_id: i64, element: impl Into<OsmGeo>) -> Result<i64> {
        let mut element = element.into();
        element.set_changeset_id(changeset_id);

        let url = self.url(&format!("0.6/{}/create", element.element_type()))?;
        let body = xml_body(&Osm::with_element(element))?;
        let response = self.send(Method::PUT, url, body).await?;
        parse_number(response.text()?)
    }

    /// Replace the element with `element`, which must carry its id and its
    /// current version. Returns the new version.
    ///
    /// A stale version is rejected by the server with `409 Conflict`.
    pub async fn update_element(&self, changeset_id: i64, element: impl Into<OsmGeo>) -> Result<i32> {
        let mut element = element.into();
        let id = validate::has_id(&element)?;
        validate::has_version(&element)?;
        element.set_changeset_id(changeset_id);

        let url = self.url(&format!("0.6/{}/{id}", element.element_type()))?;
        let body = xml_body(&Osm::with_element(element))?;
        let response = self.send(Method::PUT, url, body).await?;
        parse_number(response.text()?)
    }

    /// Update an element given in complete form. Only its normalized form
    /// is sent; members are not written.
    pub async fn update_complete_element(
        &self,
        changeset_id: i64,
        element: &CompleteOsmGeo,
    ) -> Result<i32> {
        self.update_element(changeset_id, element.to_simple()).await
    }

    /// Delete the element, which must carry its id and its current version.
    /// Returns the version the deletion created.
    pub async fn delete_element(&self, changeset_id: i64, element: impl Into<OsmGeo>) -> Result<i32> {
        let mut element = element.into();
        let id = validate::has_id(&element)?;
        validate::has_version(&element)?;
        element.set_changeset_id(changeset_id);

        let url = self.url(&format!("0.6/{}/{id}", element.element_type()))?;
        let body = xml_body(&Osm::with_element(element))?;
        let response = self.send(Method::DELETE, url, body).await?;
        parse_number(response.text()?)
    }
}
