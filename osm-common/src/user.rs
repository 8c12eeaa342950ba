//! Users, OAuth permissions and preferences.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Longest accepted preference key or value, in characters.
pub const MAX_PREFERENCE_LENGTH: usize = 255;

/// Public profile of a user, plus private details when requested by the user themself.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename = "user")]
pub struct User {
    /// User id.
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Display name.
    #[serde(rename = "@display_name", default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Sign-up time.
    #[serde(rename = "@account_created", default, skip_serializing_if = "Option::is_none")]
    pub account_created: Option<DateTime<Utc>>,
    /// Profile text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Contributor terms acceptance.
    #[serde(
        rename = "contributor-terms",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub contributor_terms: Option<ContributorTerms>,
    /// Avatar.
    #[serde(rename = "img", default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
    /// Number of changesets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changesets: Option<Count>,
    /// Number of traces.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traces: Option<Count>,
    /// Blocks received.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocks: Option<Blocks>,
    /// Home location (own details only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home: Option<Home>,
    /// Preferred languages (own details only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<Languages>,
    /// Message counters (own details only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<Messages>,
}

/// `<contributor-terms agreed=".." pd=".."/>`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContributorTerms {
    /// Terms accepted.
    #[serde(rename = "@agreed", default, skip_serializing_if = "Option::is_none")]
    pub agreed: Option<bool>,
    /// Edits declared public domain.
    #[serde(rename = "@pd", default, skip_serializing_if = "Option::is_none")]
    pub public_domain: Option<bool>,
}

/// `<img href=".."/>`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Image {
    /// Image address.
    #[serde(rename = "@href", default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

/// An element carrying a `count` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Count {
    /// The count.
    #[serde(rename = "@count", default)]
    pub count: u64,
}

/// `<blocks><received count active/></blocks>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Blocks {
    /// Blocks received.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received: Option<BlockCount>,
}

/// Counters of received blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlockCount {
    /// Total.
    #[serde(rename = "@count", default)]
    pub count: u64,
    /// Currently active.
    #[serde(rename = "@active", default)]
    pub active: u64,
}

/// Home location.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Home {
    /// Latitude.
    #[serde(rename = "@lat", default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    /// Longitude.
    #[serde(rename = "@lon", default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// Map zoom.
    #[serde(rename = "@zoom", default, skip_serializing_if = "Option::is_none")]
    pub zoom: Option<u8>,
}

/// `<languages><lang>..</lang></languages>`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Languages {
    /// Language codes, preferred first.
    #[serde(rename = "lang", default)]
    pub languages: Vec<String>,
}

/// Message counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Messages {
    /// Inbox.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received: Option<MessageCount>,
    /// Outbox.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent: Option<Count>,
}

/// Inbox counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MessageCount {
    /// Total.
    #[serde(rename = "@count", default)]
    pub count: u64,
    /// Unread.
    #[serde(rename = "@unread", default)]
    pub unread: u64,
}

/// OAuth scopes granted to the current credentials.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename = "permissions")]
pub struct Permissions {
    /// Granted permissions.
    #[serde(rename = "permission", default)]
    pub permissions: Vec<Permission>,
}

impl Permissions {
    /// Whether `name` (e.g. `allow_write_api`) is granted.
    pub fn contains(&self, name: &str) -> bool {
        self.permissions.iter().any(|p| p.name == name)
    }
}

/// `<permission name=".."/>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    /// Scope name.
    #[serde(rename = "@name")]
    pub name: String,
}

/// A user preference. Key and value are limited to [`MAX_PREFERENCE_LENGTH`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "preference")]
pub struct Preference {
    /// Key.
    #[serde(rename = "@k")]
    pub key: String,
    /// Value.
    #[serde(rename = "@v")]
    pub value: String,
}

impl Preference {
    /// Preference `key` = `value`.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// `<preferences>` block.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename = "preferences")]
pub struct Preferences {
    /// All preferences.
    #[serde(rename = "preference", default)]
    pub preferences: Vec<Preference>,
}

impl Preferences {
    /// Value of `key`, if set.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.preferences
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }
}

impl From<Vec<Preference>> for Preferences {
    fn from(preferences: Vec<Preference>) -> Self {
        Self { preferences }
    }
}
