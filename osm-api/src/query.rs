//! Filters for the changeset and note search endpoints.

use chrono::{DateTime, Utc};
use osm_common::{Bounds, format::format_note_date};
use url::Url;

/// Filters for `GET /api/0.6/changesets`.
///
/// Build with the chained setters; conflicting combinations are rejected by
/// [`crate::validate::changeset_query`] before the request is sent.
///
/// ```
/// # use osm_api::ChangesetQuery;
/// let query = ChangesetQuery::new().user_name("alice").closed_only();
/// assert_eq!(query.user_name.as_deref(), Some("alice"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use]
pub struct ChangesetQuery {
    /// Changesets whose bounding box intersects this one.
    pub bounds: Option<Bounds>,
    /// Changesets of the user with this id.
    pub user_id: Option<i64>,
    /// Changesets of the user with this display name.
    pub user_name: Option<String>,
    /// Changesets closed after this time.
    pub min_closed_date: Option<DateTime<Utc>>,
    /// Together with `min_closed_date`: changesets opened before this time.
    pub max_opened_date: Option<DateTime<Utc>>,
    /// Only open changesets.
    pub open_only: bool,
    /// Only closed changesets.
    pub closed_only: bool,
    /// Only these changesets.
    pub ids: Vec<i64>,
}

impl ChangesetQuery {
    /// An unfiltered query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to a bounding box.
    pub fn bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Restrict to a user by id.
    pub fn user_id(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Restrict to a user by display name.
    pub fn user_name(mut self, user_name: impl Into<String>) -> Self {
        self.user_name = Some(user_name.into());
        self
    }

    /// Closed after `date`.
    pub fn closed_after(mut self, date: DateTime<Utc>) -> Self {
        self.min_closed_date = Some(date);
        self
    }

    /// Opened before `date`. Requires [`Self::closed_after`].
    pub fn opened_before(mut self, date: DateTime<Utc>) -> Self {
        self.max_opened_date = Some(date);
        self
    }

    /// Open changesets only.
    pub fn open_only(mut self) -> Self {
        self.open_only = true;
        self
    }

    /// Closed changesets only.
    pub fn closed_only(mut self) -> Self {
        self.closed_only = true;
        self
    }

    /// Restrict to these ids.
    pub fn ids(mut self, ids: impl IntoIterator<Item = i64>) -> Self {
        self.ids = ids.into_iter().collect();
        self
    }

    pub(crate) fn append_to(&self, url: &mut Url) {
        let mut pairs = url.query_pairs_mut();
        if let Some(bbox) = self.bounds.as_ref().and_then(Bounds::to_bbox) {
            pairs.append_pair("bbox", &bbox);
        }
        if let Some(user_id) = self.user_id {
            pairs.append_pair("user", &user_id.to_string());
        }
        if let Some(user_name) = &self.user_name {
            pairs.append_pair("display_name", user_name);
        }
        if let Some(min_closed) = &self.min_closed_date {
            let mut time = format_note_date(min_closed);
            if let Some(max_opened) = &self.max_opened_date {
                time.push(',');
                time.push_str(&format_note_date(max_opened));
            }
            pairs.append_pair("time", &time);
        }
        if self.open_only {
            pairs.append_pair("open", "true");
        }
        if self.closed_only {
            pairs.append_pair("closed", "true");
        }
        if !self.ids.is_empty() {
            pairs.append_pair("changesets", &join_ids(&self.ids));
        }
    }
}

/// Filters for `GET /api/0.6/notes/search`.
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use]
pub struct NotesQuery {
    /// Free-text search. Required.
    pub text: String,
    /// Notes opened by the user with this id.
    pub user_id: Option<i64>,
    /// Notes opened by the user with this display name.
    pub user_name: Option<String>,
    /// Maximum number of notes, 1 to 10 000. The server default is 100.
    pub limit: Option<u32>,
    /// Days a closed note stays listed: 0 for open notes only, -1 for all.
    /// The server default is 7.
    pub closed_days: Option<i32>,
    /// Start of the date range.
    pub from: Option<DateTime<Utc>>,
    /// End of the date range.
    pub to: Option<DateTime<Utc>>,
}

impl NotesQuery {
    /// Search for `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Restrict to a user by id.
    pub fn user_id(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Restrict to a user by display name.
    pub fn user_name(mut self, user_name: impl Into<String>) -> Self {
        self.user_name = Some(user_name.into());
        self
    }

    /// Cap the number of results.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// How long closed notes stay in the results.
    pub fn closed_days(mut self, days: i32) -> Self {
        self.closed_days = Some(days);
        self
    }

    /// Notes created at or after `date`.
    pub fn from(mut self, date: DateTime<Utc>) -> Self {
        self.from = Some(date);
        self
    }

    /// Notes created at or before `date`.
    pub fn to(mut self, date: DateTime<Utc>) -> Self {
        self.to = Some(date);
        self
    }

    pub(crate) fn append_to(&self, url: &mut Url) {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("q", &self.text);
        if let Some(limit) = self.limit {
            pairs.append_pair("limit", &limit.to_string());
        }
        if let Some(closed) = self.closed_days {
            pairs.append_pair("closed", &closed.to_string());
        }
        if let Some(user_name) = &self.user_name {
            pairs.append_pair("display_name", user_name);
        }
        if let Some(user_id) = self.user_id {
            pairs.append_pair("user", &user_id.to_string());
        }
        if let Some(from) = &self.from {
            pairs.append_pair("from", &format_note_date(from));
        }
        if let Some(to) = &self.to {
            pairs.append_pair("to", &format_note_date(to));
        }
    }
}

pub(crate) fn join_ids<T: ToString>(ids: &[T]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
