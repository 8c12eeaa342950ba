//! Changesets, uploads (`osmChange`) and their results (`diffResult`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{API_VERSION, ElementType, GENERATOR, OsmGeo, Tags, format::coordinate};

/// A group of edits made by one user.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename = "changeset")]
pub struct Changeset {
    /// Changeset id.
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Display name of the owner.
    #[serde(rename = "@user", default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    /// Id of the owner.
    #[serde(rename = "@uid", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    /// Creation time.
    #[serde(rename = "@created_at", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Close time, `None` while open.
    #[serde(rename = "@closed_at", default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
    /// Whether uploads are still accepted.
    #[serde(rename = "@open", default, skip_serializing_if = "Option::is_none")]
    pub open: Option<bool>,
    /// Western edge of the edited area.
    #[serde(
        rename = "@min_lon",
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "coordinate::serialize"
    )]
    pub min_longitude: Option<f64>,
    /// Southern edge of the edited area.
    #[serde(
        rename = "@min_lat",
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "coordinate::serialize"
    )]
    pub min_latitude: Option<f64>,
    /// Eastern edge of the edited area.
    #[serde(
        rename = "@max_lon",
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "coordinate::serialize"
    )]
    pub max_longitude: Option<f64>,
    /// Northern edge of the edited area.
    #[serde(
        rename = "@max_lat",
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "coordinate::serialize"
    )]
    pub max_latitude: Option<f64>,
    /// Number of discussion comments.
    #[serde(rename = "@comments_count", default, skip_serializing_if = "Option::is_none")]
    pub comments_count: Option<u32>,
    /// Number of element changes.
    #[serde(rename = "@changes_count", default, skip_serializing_if = "Option::is_none")]
    pub changes_count: Option<u32>,
    /// Tags; `comment` and `created_by` are expected on every changeset.
    #[serde(rename = "tag", default, skip_serializing_if = "Tags::is_empty")]
    pub tags: Tags,
    /// Discussion, only present when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discussion: Option<Discussion>,
}

impl Changeset {
    /// A changeset carrying only `tags`, as sent to `changeset/create`.
    pub fn with_tags(tags: Tags) -> Self {
        Self {
            tags,
            ..Default::default()
        }
    }
}

/// Comments attached to a changeset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Discussion {
    /// Comments in posting order.
    #[serde(rename = "comment", default)]
    pub comments: Vec<ChangesetComment>,
}

/// One comment of a changeset discussion.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChangesetComment {
    /// Comment id.
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Posting time.
    #[serde(rename = "@date", default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    /// Author id.
    #[serde(rename = "@uid", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    /// Author display name.
    #[serde(rename = "@user", default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    /// Comment text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// A batch of element changes, uploaded to or downloaded from a changeset.
///
/// On the wire this is an `<osmChange>` document holding any number of
/// `<create>`, `<modify>` and `<delete>` blocks; blocks of the same kind are
/// merged on read.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "OsmChangeXml", into = "OsmChangeXml")]
pub struct OsmChange {
    /// Elements to create, usually with negative placeholder ids.
    pub create: Vec<OsmGeo>,
    /// Elements to modify.
    pub modify: Vec<OsmGeo>,
    /// Elements to delete.
    pub delete: Vec<OsmGeo>,
}

impl OsmChange {
    /// Empty change set.
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` if no element is touched.
    pub fn is_empty(&self) -> bool {
        self.create.is_empty() && self.modify.is_empty() && self.delete.is_empty()
    }

    /// Every element in upload order, mutably.
    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut OsmGeo> {
        self.create
            .iter_mut()
            .chain(self.modify.iter_mut())
            .chain(self.delete.iter_mut())
    }

    /// Stamp `changeset_id` into every element.
    pub fn set_changeset_id(&mut self, changeset_id: i64) {
        for element in self.elements_mut() {
            element.set_changeset_id(changeset_id);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename = "osmChange")]
struct OsmChangeXml {
    #[serde(rename = "@version", default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(rename = "@generator", default, skip_serializing_if = "Option::is_none")]
    generator: Option<String>,
    #[serde(rename = "$value", default)]
    actions: Vec<ChangeAction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum ChangeAction {
    #[serde(rename = "create")]
    Create(ChangeBlock),
    #[serde(rename = "modify")]
    Modify(ChangeBlock),
    #[serde(rename = "delete")]
    Delete(ChangeBlock),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
struct ChangeBlock {
    #[serde(rename = "$value", default)]
    elements: Vec<OsmGeo>,
}

impl From<OsmChangeXml> for OsmChange {
    fn from(xml: OsmChangeXml) -> Self {
        let mut change = OsmChange::new();
        for action in xml.actions {
            match action {
                ChangeAction::Create(block) => change.create.extend(block.elements),
                ChangeAction::Modify(block) => change.modify.extend(block.elements),
                ChangeAction::Delete(block) => change.delete.extend(block.elements),
            }
        }
        change
    }
}

impl From<OsmChange> for OsmChangeXml {
    fn from(change: OsmChange) -> Self {
        let mut actions = Vec::with_capacity(3);
        if !change.create.is_empty() {
            actions.push(ChangeAction::Create(ChangeBlock {
                elements: change.create,
            }));
        }
        if !change.modify.is_empty() {
            actions.push(ChangeAction::Modify(ChangeBlock {
                elements: change.modify,
            }));
        }
        if !change.delete.is_empty() {
            actions.push(ChangeAction::Delete(ChangeBlock {
                elements: change.delete,
            }));
        }
        OsmChangeXml {
            version: Some(API_VERSION.to_string()),
            generator: Some(GENERATOR.to_string()),
            actions,
        }
    }
}

/// The server's answer to a changeset upload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename = "diffResult")]
pub struct DiffResult {
    /// API version.
    #[serde(rename = "@version", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Server software.
    #[serde(rename = "@generator", default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,
    /// One entry per uploaded element, in upload order.
    #[serde(rename = "$value", default)]
    pub results: Vec<DiffEntry>,
}

/// Outcome for one uploaded element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiffEntry {
    /// A node result.
    #[serde(rename = "node")]
    Node(DiffIds),
    /// A way result.
    #[serde(rename = "way")]
    Way(DiffIds),
    /// A relation result.
    #[serde(rename = "relation")]
    Relation(DiffIds),
}

impl DiffEntry {
    /// Kind of the uploaded element.
    pub fn element_type(&self) -> ElementType {
        match self {
            DiffEntry::Node(_) => ElementType::Node,
            DiffEntry::Way(_) => ElementType::Way,
            DiffEntry::Relation(_) => ElementType::Relation,
        }
    }

    /// Id mapping of the uploaded element.
    pub fn ids(&self) -> &DiffIds {
        match self {
            DiffEntry::Node(ids) | DiffEntry::Way(ids) | DiffEntry::Relation(ids) => ids,
        }
    }
}

/// Placeholder id to server id mapping. Deletions carry neither `new_id` nor `new_version`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffIds {
    /// Id as sent.
    #[serde(rename = "@old_id")]
    pub old_id: i64,
    /// Id assigned by the server.
    #[serde(rename = "@new_id", default, skip_serializing_if = "Option::is_none")]
    pub new_id: Option<i64>,
    /// Version after the upload.
    #[serde(rename = "@new_version", default, skip_serializing_if = "Option::is_none")]
    pub new_version: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Node, from_xml, to_xml};

    #[test]
    fn repeated_blocks_are_merged() {
        let xml = r#"<osmChange version="0.6" generator="test">
            <create><node id="-1" lat="1" lon="2" version="0"/></create>
            <modify><way id="5" version="2"><nd ref="1"/></way></modify>
            <create><node id="-2" lat="3" lon="4" version="0"/></create>
            <delete><relation id="9" version="4"/></delete>
        </osmChange>"#;
        let change: OsmChange = from_xml(xml).unwrap();
        assert_eq!(change.create.len(), 2);
        assert_eq!(change.create[1].id(), Some(-2));
        assert_eq!(change.modify[0].element_type(), ElementType::Way);
        assert_eq!(change.delete[0].version(), Some(4));
    }

    #[test]
    fn upload_body_skips_empty_blocks_and_stamps_changeset() {
        let mut change = OsmChange::new();
        change.create.push(OsmGeo::Node(Node {
            id: Some(-1),
            latitude: Some(51.5),
            longitude: Some(-0.25),
            ..Default::default()
        }));
        change.set_changeset_id(12);
        let xml = to_xml(&change).unwrap();
        assert!(xml.contains("<osmChange"));
        assert!(xml.contains("<create><node"));
        assert!(xml.contains(r#"changeset="12""#));
        assert!(!xml.contains("<modify"));
        assert!(!xml.contains("<delete"));
    }

    #[test]
    fn diff_result_entries() {
        let xml = r#"<diffResult version="0.6" generator="OpenStreetMap server">
            <node old_id="-1" new_id="4321" new_version="1"/>
            <way old_id="17" new_id="17" new_version="3"/>
            <relation old_id="8"/>
        </diffResult>"#;
        let diff: DiffResult = from_xml(xml).unwrap();
        assert_eq!(diff.results.len(), 3);
        assert_eq!(diff.results[0].ids().new_id, Some(4321));
        assert_eq!(diff.results[1].element_type(), ElementType::Way);
        assert_eq!(diff.results[2].ids().new_version, None);
    }

    #[test]
    fn changeset_with_discussion() {
        let xml = r#"<osm><changeset id="10" user="fred" uid="123" created_at="2008-11-08T18:07:39Z"
                open="false" closed_at="2008-11-08T19:07:39Z" min_lon="7.0191821" min_lat="49.2785426"
                max_lon="7.0197485" max_lat="49.2793101" comments_count="1" changes_count="10">
            <tag k="created_by" v="JOSM 1.61"/>
            <tag k="comment" v="Just adding some streetnames"/>
            <discussion>
                <comment id="1" date="2015-01-01T18:56:48Z" uid="1841" user="metaodi">
                    <text>Did you verify those street names?</text>
                </comment>
            </discussion>
        </changeset></osm>"#;
        let osm: crate::Osm = from_xml(xml).unwrap();
        let changeset = &osm.changesets[0];
        assert_eq!(changeset.id, Some(10));
        assert_eq!(changeset.open, Some(false));
        assert_eq!(changeset.tags.get("comment"), Some("Just adding some streetnames"));
        let discussion = changeset.discussion.as_ref().unwrap();
        assert_eq!(discussion.comments[0].user_name.as_deref(), Some("metaodi"));
        assert_eq!(
            discussion.comments[0].text.as_deref().map(str::trim),
            Some("Did you verify those street names?")
        );
    }
}
