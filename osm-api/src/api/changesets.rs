use osm_common::{Changeset, DiffResult, ElementStream, Osm, OsmChange, Tags, from_xml};
use reqwest::{Method, multipart::Form};

use super::core::{AuthClient, NonAuthClient, first, xml_body};
use crate::{
    Result,
    client::RequestBody,
    query::ChangesetQuery,
    util::parse_number,
    validate,
};

/// Tags every changeset must carry when it is created or updated.
pub const REQUIRED_CHANGESET_TAGS: [&str; 2] = ["comment", "created_by"];

impl NonAuthClient {
    /// Changeset `id`, with its discussion when `include_discussion` is set.
    pub async fn get_changeset(&self, id: i64, include_discussion: bool) -> Result<Changeset> {
        let mut url = self.url(&format!("0.6/changeset/{id}"))?;
        if include_discussion {
            url.query_pairs_mut().append_pair("include_discussion", "true");
        }
        let osm = self.get_osm(url).await?;
        first(osm.changesets, "changeset")
    }

    /// Changesets matching `query`, newest first as the server orders them.
    ///
    /// Contradicting filters fail with [`crate::Error::InvalidArgument`]
    /// before anything is sent.
    ///
    /// # Example
    /// ```no_run
    /// # use osm_api::{ChangesetQuery, OsmApi};
    /// # async fn run(api: OsmApi) -> osm_api::Result<()> {
    /// let mine = api
    ///     .non_auth_client()
    ///     .query_changesets(&ChangesetQuery::new().user_name("alice").open_only())
    ///     .await?;
    /// # Ok(()) }
    /// ```
    pub async fn query_changesets(&self, query: &ChangesetQuery) -> Result<ElementStream<Changeset>> {
        validate::changeset_query(query)?;

        let mut url = self.url("0.6/changesets")?;
        query.append_to(&mut url);
        let response = self.get(url).await?;
        Ok(ElementStream::new(response.into_text()?))
    }

    /// Every element change made in changeset `id`.
    pub async fn get_changeset_download(&self, id: i64) -> Result<OsmChange> {
        let response = self
            .get(self.url(&format!("0.6/changeset/{id}/download"))?)
            .await?;
        Ok(from_xml(response.text()?)?)
    }
}

impl AuthClient {
    /// Open a changeset tagged with `tags` and return its id.
    ///
    /// `tags` must hold non-empty `comment` and `created_by` values.
    pub async fn create_changeset(&self, tags: Tags) -> Result<i64> {
        validate::required_tags(&tags, &REQUIRED_CHANGESET_TAGS)?;

        let url = self.url("0.6/changeset/create")?;
        let body = xml_body(&Osm::with_changeset(Changeset::with_tags(tags)))?;
        let response = self.send(Method::PUT, url, body).await?;
        parse_number(response.text()?)
    }

    /// Replace the tags of the open changeset `id`.
    pub async fn update_changeset(&self, id: i64, tags: Tags) -> Result<Changeset> {
        validate::required_tags(&tags, &REQUIRED_CHANGESET_TAGS)?;

        let url = self.url(&format!("0.6/changeset/{id}"))?;
        let body = xml_body(&Osm::with_changeset(Changeset::with_tags(tags)))?;
        let osm = self.send_osm(Method::PUT, url, body).await?;
        first(osm.changesets, "changeset")
    }

    /// Apply `change` to changeset `id` in one atomic upload.
    ///
    /// Every element is stamped with `id` before sending. The returned
    /// [`DiffResult`] maps placeholder ids to the ids the server assigned.
    pub async fn upload_changeset(&self, id: i64, mut change: OsmChange) -> Result<DiffResult> {
        change.set_changeset_id(id);

        let url = self.url(&format!("0.6/changeset/{id}/upload"))?;
        let response = self.send(Method::POST, url, xml_body(&change)?).await?;
        Ok(from_xml(response.text()?)?)
    }

    /// Close changeset `id`. Further uploads to it are rejected by the server.
    pub async fn close_changeset(&self, id: i64) -> Result<()> {
        let url = self.url(&format!("0.6/changeset/{id}/close"))?;
        self.send(Method::PUT, url, RequestBody::Empty).await?;
        Ok(())
    }

    /// Post `text` to the discussion of the closed changeset `id`.
    pub async fn add_changeset_comment(&self, id: i64, text: &str) -> Result<Changeset> {
        validate::comment_text(text)?;

        let url = self.url(&format!("0.6/changeset/{id}/comment"))?;
        let form = Form::new().text("text", text.to_string());
        let osm = self
            .send_osm(Method::POST, url, RequestBody::Multipart(form))
            .await?;
        first(osm.changesets, "changeset")
    }

    /// Get notified about new comments on changeset `id`.
    pub async fn changeset_subscribe(&self, id: i64) -> Result<Changeset> {
        let url = self.url(&format!("0.6/changeset/{id}/subscribe"))?;
        let osm = self.send_osm(Method::POST, url, RequestBody::Empty).await?;
        first(osm.changesets, "changeset")
    }

    /// Stop notifications about changeset `id`.
    pub async fn changeset_unsubscribe(&self, id: i64) -> Result<Changeset> {
        let url = self.url(&format!("0.6/changeset/{id}/unsubscribe"))?;
        let osm = self.send_osm(Method::POST, url, RequestBody::Empty).await?;
        first(osm.changesets, "changeset")
    }
}
