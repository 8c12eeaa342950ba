//! GPS traces.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::format::{coordinate, opt_keyword};

/// Who may see a trace and how its points are exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Only the owner sees it; points appear anonymously in public listings.
    Private,
    /// Listed publicly; points appear anonymously.
    Public,
    /// Not listed; points appear anonymously with timestamps.
    Trackable,
    /// Listed publicly with the owner's name and timestamps.
    Identifiable,
}

impl Visibility {
    /// Wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Visibility::Private => "private",
            Visibility::Public => "public",
            Visibility::Trackable => "trackable",
            Visibility::Identifiable => "identifiable",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a visibility name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown trace visibility `{0}`")]
pub struct UnknownVisibility(pub String);

impl FromStr for Visibility {
    type Err = UnknownVisibility;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" => Ok(Visibility::Private),
            "public" => Ok(Visibility::Public),
            "trackable" => Ok(Visibility::Trackable),
            "identifiable" => Ok(Visibility::Identifiable),
            other => Err(UnknownVisibility(other.to_string())),
        }
    }
}

/// Metadata of an uploaded trace.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename = "gpx_file")]
pub struct GpxFile {
    /// Trace id, assigned on upload.
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// File name.
    #[serde(rename = "@name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Owner id.
    #[serde(rename = "@uid", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    /// Owner display name.
    #[serde(rename = "@user", default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    /// Visibility.
    #[serde(
        rename = "@visibility",
        default,
        skip_serializing_if = "Option::is_none",
        with = "opt_keyword"
    )]
    pub visibility: Option<Visibility>,
    /// `true` until the server has imported the points.
    #[serde(rename = "@pending", default, skip_serializing_if = "Option::is_none")]
    pub pending: Option<bool>,
    /// Upload time.
    #[serde(rename = "@timestamp", default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Latitude of the first point.
    #[serde(
        rename = "@lat",
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "coordinate::serialize"
    )]
    pub latitude: Option<f64>,
    /// Longitude of the first point.
    #[serde(
        rename = "@lon",
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "coordinate::serialize"
    )]
    pub longitude: Option<f64>,
    /// Free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Free-text tags.
    #[serde(rename = "tag", default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Raw content of a downloaded trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedStream {
    /// Body bytes.
    pub data: bytes::Bytes,
    /// File name from `Content-Disposition`, if the server sent one.
    pub file_name: Option<String>,
    /// `Content-Type` of the body.
    pub content_type: Option<String>,
}

impl TypedStream {
    /// Extract the file name from a `Content-Disposition` header value.
    ///
    /// ```
    /// # use osm_common::TypedStream;
    /// assert_eq!(
    ///     TypedStream::file_name_from_disposition(r#"attachment; filename="1234.gpx""#).as_deref(),
    ///     Some("1234.gpx")
    /// );
    /// assert_eq!(TypedStream::file_name_from_disposition("inline"), None);
    /// ```
    pub fn file_name_from_disposition(disposition: &str) -> Option<String> {
        disposition
            .split(';')
            .map(str::trim)
            .find_map(|part| part.strip_prefix("filename="))
            .map(|name| name.trim_matches('"').to_string())
            .filter(|name| !name.is_empty())
    }
}
