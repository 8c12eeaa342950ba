//! Map notes.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::format::{coordinate, note_date, opt_keyword};

/// Lifecycle state of a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteStatus {
    /// Awaiting resolution.
    Open,
    /// Resolved.
    Closed,
    /// Hidden by a moderator.
    Hidden,
}

/// What a note comment did to the note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteAction {
    /// The note was created.
    Opened,
    /// A plain comment.
    Commented,
    /// The note was closed.
    Closed,
    /// The note was reopened.
    Reopened,
    /// The note was hidden.
    Hidden,
}

/// Returned when a note keyword is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown note keyword `{0}`")]
pub struct UnknownNoteKeyword(pub String);

macro_rules! keyword_enum {
    ($ty:ident { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            /// Wire name.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = UnknownNoteKeyword;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok($ty::$variant),)+
                    other => Err(UnknownNoteKeyword(other.to_string())),
                }
            }
        }
    };
}

keyword_enum!(NoteStatus {
    Open => "open",
    Closed => "closed",
    Hidden => "hidden",
});

keyword_enum!(NoteAction {
    Opened => "opened",
    Commented => "commented",
    Closed => "closed",
    Reopened => "reopened",
    Hidden => "hidden",
});

/// A georeferenced comment thread.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename = "note")]
pub struct Note {
    /// Latitude in degrees.
    #[serde(
        rename = "@lat",
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "coordinate::serialize"
    )]
    pub latitude: Option<f64>,
    /// Longitude in degrees.
    #[serde(
        rename = "@lon",
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "coordinate::serialize"
    )]
    pub longitude: Option<f64>,
    /// Note id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// API address of the note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Address for posting comments, present while open.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_url: Option<String>,
    /// Address for closing, present while open.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_url: Option<String>,
    /// Address for reopening, present while closed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reopen_url: Option<String>,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "note_date")]
    pub date_created: Option<DateTime<Utc>>,
    /// Close time.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "note_date")]
    pub date_closed: Option<DateTime<Utc>>,
    /// Current status.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "opt_keyword")]
    pub status: Option<NoteStatus>,
    /// Comments, oldest first.
    #[serde(default, skip_serializing_if = "Vec::is_empty", with = "comment_list")]
    pub comments: Vec<NoteComment>,
}

/// One entry of a note's history.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename = "comment")]
pub struct NoteComment {
    /// Posting time.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "note_date")]
    pub date: Option<DateTime<Utc>>,
    /// Author id, `None` for anonymous comments.
    #[serde(rename = "uid", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    /// Author display name, `None` for anonymous comments.
    #[serde(rename = "user", default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    /// Author profile address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_url: Option<String>,
    /// What the comment did.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "opt_keyword")]
    pub action: Option<NoteAction>,
    /// Plain text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Rendered HTML.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

/// `<comments><comment/>..</comments>` wrapper.
mod comment_list {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::NoteComment;

    #[derive(Serialize, Deserialize)]
    struct Comments {
        #[serde(rename = "comment", default)]
        comment: Vec<NoteComment>,
    }

    pub(super) fn serialize<S: Serializer>(
        comments: &[NoteComment],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        Comments {
            comment: comments.to_vec(),
        }
        .serialize(serializer)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<NoteComment>, D::Error> {
        Ok(Comments::deserialize(deserializer)?.comment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Osm, from_xml};

    const NOTE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<osm version="0.6" generator="OpenStreetMap server">
  <note lon="0.1000000" lat="51.0000000">
    <id>16659</id>
    <url>https://master.apis.dev.openstreetmap.org/api/0.6/notes/16659</url>
    <comment_url>https://master.apis.dev.openstreetmap.org/api/0.6/notes/16659/comment</comment_url>
    <close_url>https://master.apis.dev.openstreetmap.org/api/0.6/notes/16659/close</close_url>
    <date_created>2019-06-15 08:26:04 UTC</date_created>
    <status>open</status>
    <comments>
      <comment>
        <date>2019-06-15 08:26:04 UTC</date>
        <uid>1234</uid>
        <user>userName</user>
        <action>opened</action>
        <text>ThisIsANote</text>
        <html>&lt;p&gt;ThisIsANote&lt;/p&gt;</html>
      </comment>
      <comment>
        <date>2019-06-15 08:30:00 UTC</date>
        <action>commented</action>
        <text>anonymous reply</text>
      </comment>
    </comments>
  </note>
</osm>"#;

    #[test]
    fn note_document() {
        let osm: Osm = from_xml(NOTE).unwrap();
        let note = &osm.notes[0];
        assert_eq!(note.id, Some(16659));
        assert_eq!(note.latitude, Some(51.0));
        assert_eq!(note.status, Some(NoteStatus::Open));
        assert_eq!(
            note.date_created.map(|d| crate::format::format_note_date(&d)).as_deref(),
            Some("2019-06-15 08:26:04 UTC")
        );
        assert_eq!(note.date_closed, None);
        assert_eq!(note.comments.len(), 2);
        assert_eq!(note.comments[0].action, Some(NoteAction::Opened));
        assert_eq!(note.comments[0].html.as_deref(), Some("<p>ThisIsANote</p>"));
        assert_eq!(note.comments[1].user_id, None);
    }

    #[test]
    fn keywords() {
        assert_eq!("reopened".parse::<NoteAction>(), Ok(NoteAction::Reopened));
        assert_eq!(NoteStatus::Hidden.to_string(), "hidden");
        assert!("archived".parse::<NoteStatus>().is_err());
    }
}
