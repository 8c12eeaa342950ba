//! Nodes, ways and relations.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    Tags,
    format::{coordinate, keyword},
};

/// The three kinds of map element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    /// A point.
    Node,
    /// An ordered list of nodes.
    Way,
    /// An ordered list of typed members.
    Relation,
}

impl ElementType {
    /// Wire name, used for path segments and XML element names.
    pub const fn as_str(self) -> &'static str {
        match self {
            ElementType::Node => "node",
            ElementType::Way => "way",
            ElementType::Relation => "relation",
        }
    }

    /// Plural wire name, used by the multi-fetch endpoints (`nodes?nodes=..`).
    pub const fn plural(self) -> &'static str {
        match self {
            ElementType::Node => "nodes",
            ElementType::Way => "ways",
            ElementType::Relation => "relations",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing an unknown element type name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown element type `{0}`")]
pub struct UnknownElementType(pub String);

impl FromStr for ElementType {
    type Err = UnknownElementType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "node" => Ok(ElementType::Node),
            "way" => Ok(ElementType::Way),
            "relation" => Ok(ElementType::Relation),
            other => Err(UnknownElementType(other.to_string())),
        }
    }
}

/// Identifies one element regardless of its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OsmGeoKey {
    /// Kind of element.
    pub element_type: ElementType,
    /// Element id.
    pub id: i64,
}

impl OsmGeoKey {
    /// Key for `element_type` `id`.
    pub const fn new(element_type: ElementType, id: i64) -> Self {
        Self { element_type, id }
    }

    /// Key of a node.
    pub const fn node(id: i64) -> Self {
        Self::new(ElementType::Node, id)
    }

    /// Key of a way.
    pub const fn way(id: i64) -> Self {
        Self::new(ElementType::Way, id)
    }

    /// Key of a relation.
    pub const fn relation(id: i64) -> Self {
        Self::new(ElementType::Relation, id)
    }
}

impl fmt::Display for OsmGeoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.element_type, self.id)
    }
}

/// A point on the map.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename = "node")]
pub struct Node {
    /// Server-assigned id; `None` (or negative placeholder) before creation.
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Version, required for update and delete.
    #[serde(rename = "@version", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i32>,
    /// Changeset the element was last written in.
    #[serde(rename = "@changeset", default, skip_serializing_if = "Option::is_none")]
    pub changeset_id: Option<i64>,
    /// Time of the last edit.
    #[serde(rename = "@timestamp", default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Display name of the last editor.
    #[serde(rename = "@user", default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    /// Id of the last editor.
    #[serde(rename = "@uid", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    /// `false` for deleted elements in history responses.
    #[serde(rename = "@visible", default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
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
    /// Tags.
    #[serde(rename = "tag", default, skip_serializing_if = "Tags::is_empty")]
    pub tags: Tags,
}

/// An ordered list of node references.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename = "way")]
pub struct Way {
    /// Server-assigned id.
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Version, required for update and delete.
    #[serde(rename = "@version", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i32>,
    /// Changeset the element was last written in.
    #[serde(rename = "@changeset", default, skip_serializing_if = "Option::is_none")]
    pub changeset_id: Option<i64>,
    /// Time of the last edit.
    #[serde(rename = "@timestamp", default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Display name of the last editor.
    #[serde(rename = "@user", default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    /// Id of the last editor.
    #[serde(rename = "@uid", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    /// `false` for deleted elements in history responses.
    #[serde(rename = "@visible", default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    /// Node ids, in order.
    #[serde(
        rename = "nd",
        default,
        skip_serializing_if = "Vec::is_empty",
        with = "node_refs"
    )]
    pub nodes: Vec<i64>,
    /// Tags.
    #[serde(rename = "tag", default, skip_serializing_if = "Tags::is_empty")]
    pub tags: Tags,
}

/// One member of a relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationMember {
    /// Kind of the referenced element.
    #[serde(rename = "@type", with = "keyword")]
    pub member_type: ElementType,
    /// Id of the referenced element.
    #[serde(rename = "@ref")]
    pub reference: i64,
    /// Role, possibly empty.
    #[serde(rename = "@role", default)]
    pub role: String,
}

impl RelationMember {
    /// Member of `member_type` `reference` with `role`.
    pub fn new(member_type: ElementType, reference: i64, role: impl Into<String>) -> Self {
        Self {
            member_type,
            reference,
            role: role.into(),
        }
    }

    /// Key of the referenced element.
    pub fn key(&self) -> OsmGeoKey {
        OsmGeoKey::new(self.member_type, self.reference)
    }
}

/// An ordered list of typed members.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename = "relation")]
pub struct Relation {
    /// Server-assigned id.
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Version, required for update and delete.
    #[serde(rename = "@version", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i32>,
    /// Changeset the element was last written in.
    #[serde(rename = "@changeset", default, skip_serializing_if = "Option::is_none")]
    pub changeset_id: Option<i64>,
    /// Time of the last edit.
    #[serde(rename = "@timestamp", default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Display name of the last editor.
    #[serde(rename = "@user", default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    /// Id of the last editor.
    #[serde(rename = "@uid", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    /// `false` for deleted elements in history responses.
    #[serde(rename = "@visible", default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    /// Members, in order.
    #[serde(rename = "member", default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<RelationMember>,
    /// Tags.
    #[serde(rename = "tag", default, skip_serializing_if = "Tags::is_empty")]
    pub tags: Tags,
}

/// Any one of [`Node`], [`Way`] or [`Relation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OsmGeo {
    /// A node.
    #[serde(rename = "node")]
    Node(Node),
    /// A way.
    #[serde(rename = "way")]
    Way(Way),
    /// A relation.
    #[serde(rename = "relation")]
    Relation(Relation),
}

impl OsmGeo {
    /// Kind of this element.
    pub fn element_type(&self) -> ElementType {
        match self {
            OsmGeo::Node(_) => ElementType::Node,
            OsmGeo::Way(_) => ElementType::Way,
            OsmGeo::Relation(_) => ElementType::Relation,
        }
    }

    /// Element id, if assigned.
    pub fn id(&self) -> Option<i64> {
        match self {
            OsmGeo::Node(node) => node.id,
            OsmGeo::Way(way) => way.id,
            OsmGeo::Relation(relation) => relation.id,
        }
    }

    /// Element version, if known.
    pub fn version(&self) -> Option<i32> {
        match self {
            OsmGeo::Node(node) => node.version,
            OsmGeo::Way(way) => way.version,
            OsmGeo::Relation(relation) => relation.version,
        }
    }

    /// Changeset id carried by the element.
    pub fn changeset_id(&self) -> Option<i64> {
        match self {
            OsmGeo::Node(node) => node.changeset_id,
            OsmGeo::Way(way) => way.changeset_id,
            OsmGeo::Relation(relation) => relation.changeset_id,
        }
    }

    /// Tags of the element.
    pub fn tags(&self) -> &Tags {
        match self {
            OsmGeo::Node(node) => &node.tags,
            OsmGeo::Way(way) => &way.tags,
            OsmGeo::Relation(relation) => &relation.tags,
        }
    }

    /// Stamp the changeset the element is about to be written in.
    pub fn set_changeset_id(&mut self, changeset_id: i64) {
        match self {
            OsmGeo::Node(node) => node.changeset_id = Some(changeset_id),
            OsmGeo::Way(way) => way.changeset_id = Some(changeset_id),
            OsmGeo::Relation(relation) => relation.changeset_id = Some(changeset_id),
        }
    }

    /// Key of the element, if it has an id.
    pub fn key(&self) -> Option<OsmGeoKey> {
        self.id().map(|id| OsmGeoKey::new(self.element_type(), id))
    }
}

impl From<Node> for OsmGeo {
    fn from(node: Node) -> Self {
        OsmGeo::Node(node)
    }
}

impl From<Way> for OsmGeo {
    fn from(way: Way) -> Self {
        OsmGeo::Way(way)
    }
}

impl From<Relation> for OsmGeo {
    fn from(relation: Relation) -> Self {
        OsmGeo::Relation(relation)
    }
}

/// `<nd ref=".."/>` children of a way.
mod node_refs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct NodeRef {
        #[serde(rename = "@ref")]
        reference: i64,
    }

    pub(super) fn serialize<S: Serializer>(nodes: &[i64], serializer: S) -> Result<S::Ok, S::Error> {
        let refs: Vec<NodeRef> = nodes
            .iter()
            .map(|reference| NodeRef {
                reference: *reference,
            })
            .collect();
        refs.serialize(serializer)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<i64>, D::Error> {
        let refs = Vec::<NodeRef>::deserialize(deserializer)?;
        Ok(refs.into_iter().map(|r| r.reference).collect())
    }
}
