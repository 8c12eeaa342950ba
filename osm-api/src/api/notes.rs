use bytes::Bytes;
use osm_common::{Bounds, Note, format::format_coordinate};
use reqwest::Method;
use url::Url;

use super::core::{NonAuthClient, first};
use crate::{Result, client::RequestBody, query::NotesQuery, validate};

/// Notes returned by [`NonAuthClient::get_notes`] when no other limit is given.
pub const DEFAULT_NOTES_LIMIT: u32 = 100;

/// Days a closed note stays listed when no other value is given.
pub const DEFAULT_CLOSED_DAYS: i32 = 7;

impl NonAuthClient {
    /// Note `id` with its comments.
    pub async fn get_note(&self, id: i64) -> Result<Note> {
        let osm = self.get_osm(self.url(&format!("0.6/notes/{id}"))?).await?;
        first(osm.notes, "note")
    }

    /// Up to `limit` notes inside `bounds`.
    ///
    /// `closed_days` is how long a closed note keeps being listed: `0` for
    /// open notes only, `-1` for every note.
    pub async fn get_notes(&self, bounds: &Bounds, limit: u32, closed_days: i32) -> Result<Vec<Note>> {
        let [min_lon, min_lat, max_lon, max_lat] = validate::bounds(bounds)?;
        validate::notes_limit(limit)?;

        let mut url = self.url("0.6/notes")?;
        url.query_pairs_mut()
            .append_pair("bbox", &bbox(min_lon, min_lat, max_lon, max_lat))
            .append_pair("limit", &limit.to_string())
            .append_pair("closed", &closed_days.to_string());
        Ok(self.get_osm(url).await?.notes)
    }

    /// RSS feed of the notes inside `bounds`, as served.
    pub async fn get_notes_rss_feed(&self, bounds: &Bounds) -> Result<Bytes> {
        let [min_lon, min_lat, max_lon, max_lat] = validate::bounds(bounds)?;

        let mut url = self.url("0.6/notes/feed")?;
        url.query_pairs_mut()
            .append_pair("bbox", &bbox(min_lon, min_lat, max_lon, max_lat));
        Ok(self.get(url).await?.body)
    }

    /// Full-text note search.
    pub async fn query_notes(&self, query: &NotesQuery) -> Result<Vec<Note>> {
        validate::notes_query(query)?;

        let mut url = self.url("0.6/notes/search")?;
        query.append_to(&mut url);
        Ok(self.get_osm(url).await?.notes)
    }

    /// Open a note at the given point.
    ///
    /// Anonymous unless this client carries credentials, in which case the
    /// note is attributed to that user.
    pub async fn create_note(&self, latitude: f64, longitude: f64, text: &str) -> Result<Note> {
        validate::coordinate(latitude, longitude)?;
        validate::comment_text(text)?;

        let mut url = self.url("0.6/notes")?;
        url.query_pairs_mut()
            .append_pair("lat", &format_coordinate(latitude))
            .append_pair("lon", &format_coordinate(longitude))
            .append_pair("text", text);
        self.note_action(url).await
    }

    /// Add a comment to note `id`.
    pub async fn comment_note(&self, id: i64, text: &str) -> Result<Note> {
        validate::comment_text(text)?;

        let mut url = self.url(&format!("0.6/notes/{id}/comment"))?;
        url.query_pairs_mut().append_pair("text", text);
        self.note_action(url).await
    }

    /// Close note `id`, optionally explaining why.
    pub async fn close_note(&self, id: i64, text: Option<&str>) -> Result<Note> {
        let url = self.note_url(id, "close", text)?;
        self.note_action(url).await
    }

    /// Reopen closed note `id`, optionally explaining why.
    pub async fn reopen_note(&self, id: i64, text: Option<&str>) -> Result<Note> {
        let url = self.note_url(id, "reopen", text)?;
        self.note_action(url).await
    }

    fn note_url(&self, id: i64, action: &str, text: Option<&str>) -> Result<Url> {
        let mut url = self.url(&format!("0.6/notes/{id}/{action}"))?;
        if let Some(text) = text.filter(|text| !text.trim().is_empty()) {
            url.query_pairs_mut().append_pair("text", text);
        }
        Ok(url)
    }

    async fn note_action(&self, url: Url) -> Result<Note> {
        let osm = self.send_osm(Method::POST, url, RequestBody::Empty).await?;
        first(osm.notes, "note")
    }
}

fn bbox(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> String {
    [min_lon, min_lat, max_lon, max_lat]
        .map(format_coordinate)
        .join(",")
}
