//! Ways and relations with their members resolved.
//!
//! The `/full` endpoints return the primary element together with everything
//! it references in one flat document. [`CompleteGraph`] indexes that document
//! and rebuilds the element with each reference replaced by the referenced
//! element itself.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::{
    DataIntegrityError, ElementType, Node, Osm, OsmGeo, OsmGeoKey, Relation, RelationMember, Tags,
    Way,
};

/// A way whose node references are resolved to nodes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompleteWay {
    /// Way id.
    pub id: Option<i64>,
    /// Way version.
    pub version: Option<i32>,
    /// Changeset of the last edit.
    pub changeset_id: Option<i64>,
    /// Time of the last edit.
    pub timestamp: Option<DateTime<Utc>>,
    /// Display name of the last editor.
    pub user_name: Option<String>,
    /// Id of the last editor.
    pub user_id: Option<i64>,
    /// Visibility.
    pub visible: Option<bool>,
    /// Tags.
    pub tags: Tags,
    /// Nodes, in way order.
    pub nodes: Vec<Node>,
}

impl CompleteWay {
    /// The normalized way, referencing its nodes by id.
    pub fn to_simple(&self) -> Way {
        Way {
            id: self.id,
            version: self.version,
            changeset_id: self.changeset_id,
            timestamp: self.timestamp,
            user_name: self.user_name.clone(),
            user_id: self.user_id,
            visible: self.visible,
            nodes: self.nodes.iter().filter_map(|node| node.id).collect(),
            tags: self.tags.clone(),
        }
    }
}

/// A resolved relation member.
#[derive(Debug, Clone, PartialEq)]
pub enum CompleteMember {
    /// A member node.
    Node(Node),
    /// A member way with its nodes.
    Way(CompleteWay),
    /// A member relation. Its own members are not part of a `/full` response
    /// and stay as references.
    Relation(Relation),
}

impl CompleteMember {
    /// Kind of the member.
    pub fn element_type(&self) -> ElementType {
        match self {
            CompleteMember::Node(_) => ElementType::Node,
            CompleteMember::Way(_) => ElementType::Way,
            CompleteMember::Relation(_) => ElementType::Relation,
        }
    }
}

/// A relation member together with its role.
#[derive(Debug, Clone, PartialEq)]
pub struct CompleteRelationMember {
    /// Role, possibly empty.
    pub role: String,
    /// Referenced id.
    pub reference: i64,
    /// The resolved element.
    pub member: CompleteMember,
}

/// A relation whose members are resolved.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompleteRelation {
    /// Relation id.
    pub id: Option<i64>,
    /// Relation version.
    pub version: Option<i32>,
    /// Changeset of the last edit.
    pub changeset_id: Option<i64>,
    /// Time of the last edit.
    pub timestamp: Option<DateTime<Utc>>,
    /// Display name of the last editor.
    pub user_name: Option<String>,
    /// Id of the last editor.
    pub user_id: Option<i64>,
    /// Visibility.
    pub visible: Option<bool>,
    /// Tags.
    pub tags: Tags,
    /// Members, in relation order.
    pub members: Vec<CompleteRelationMember>,
}

impl CompleteRelation {
    /// The normalized relation, referencing its members by type and id.
    pub fn to_simple(&self) -> Relation {
        Relation {
            id: self.id,
            version: self.version,
            changeset_id: self.changeset_id,
            timestamp: self.timestamp,
            user_name: self.user_name.clone(),
            user_id: self.user_id,
            visible: self.visible,
            members: self
                .members
                .iter()
                .map(|m| RelationMember::new(m.member.element_type(), m.reference, m.role.clone()))
                .collect(),
            tags: self.tags.clone(),
        }
    }
}

/// Any element in its complete form.
#[derive(Debug, Clone, PartialEq)]
pub enum CompleteOsmGeo {
    /// A node, which has nothing to resolve.
    Node(Node),
    /// A complete way.
    Way(CompleteWay),
    /// A complete relation.
    Relation(CompleteRelation),
}

impl CompleteOsmGeo {
    /// Kind of element.
    pub fn element_type(&self) -> ElementType {
        match self {
            CompleteOsmGeo::Node(_) => ElementType::Node,
            CompleteOsmGeo::Way(_) => ElementType::Way,
            CompleteOsmGeo::Relation(_) => ElementType::Relation,
        }
    }

    /// Element id.
    pub fn id(&self) -> Option<i64> {
        match self {
            CompleteOsmGeo::Node(node) => node.id,
            CompleteOsmGeo::Way(way) => way.id,
            CompleteOsmGeo::Relation(relation) => relation.id,
        }
    }

    /// The normalized element, ready to be sent back in a write.
    pub fn to_simple(&self) -> OsmGeo {
        match self {
            CompleteOsmGeo::Node(node) => OsmGeo::Node(node.clone()),
            CompleteOsmGeo::Way(way) => OsmGeo::Way(way.to_simple()),
            CompleteOsmGeo::Relation(relation) => OsmGeo::Relation(relation.to_simple()),
        }
    }
}

/// Id index over one `/full` document.
#[derive(Debug, Clone, Default)]
pub struct CompleteGraph {
    nodes: HashMap<i64, Node>,
    ways: HashMap<i64, Way>,
    relations: HashMap<i64, Relation>,
}

impl CompleteGraph {
    /// Index every element of `osm` by id. Elements without an id are ignored.
    pub fn new(osm: Osm) -> Self {
        let mut graph = Self::default();
        for node in osm.nodes {
            if let Some(id) = node.id {
                graph.nodes.insert(id, node);
            }
        }
        for way in osm.ways {
            if let Some(id) = way.id {
                graph.ways.insert(id, way);
            }
        }
        for relation in osm.relations {
            if let Some(id) = relation.id {
                graph.relations.insert(id, relation);
            }
        }
        graph
    }

    /// Build the complete form of the element `key`.
    pub fn complete(&self, key: OsmGeoKey) -> Result<CompleteOsmGeo, DataIntegrityError> {
        match key.element_type {
            ElementType::Node => self
                .nodes
                .get(&key.id)
                .cloned()
                .map(CompleteOsmGeo::Node)
                .ok_or(DataIntegrityError::MissingElement(key)),
            ElementType::Way => self.complete_way(key.id).map(CompleteOsmGeo::Way),
            ElementType::Relation => self.complete_relation(key.id).map(CompleteOsmGeo::Relation),
        }
    }

    /// Build way `id` with its nodes.
    pub fn complete_way(&self, id: i64) -> Result<CompleteWay, DataIntegrityError> {
        let way = self
            .ways
            .get(&id)
            .ok_or(DataIntegrityError::MissingElement(OsmGeoKey::way(id)))?;
        self.resolve_way(way, id)
    }

    /// Build relation `id` with its members.
    pub fn complete_relation(&self, id: i64) -> Result<CompleteRelation, DataIntegrityError> {
        let relation = self
            .relations
            .get(&id)
            .ok_or(DataIntegrityError::MissingElement(OsmGeoKey::relation(id)))?;
        let parent = OsmGeoKey::relation(id);

        let members = relation
            .members
            .iter()
            .map(|member| {
                let missing = || DataIntegrityError::MissingMember {
                    parent,
                    member: member.key(),
                };
                let resolved = match member.member_type {
                    ElementType::Node => self
                        .nodes
                        .get(&member.reference)
                        .cloned()
                        .map(CompleteMember::Node)
                        .ok_or_else(missing)?,
                    ElementType::Way => {
                        let way = self.ways.get(&member.reference).ok_or_else(missing)?;
                        CompleteMember::Way(self.resolve_way(way, member.reference)?)
                    }
                    ElementType::Relation => self
                        .relations
                        .get(&member.reference)
                        .cloned()
                        .map(CompleteMember::Relation)
                        .ok_or_else(missing)?,
                };
                Ok::<_, DataIntegrityError>(CompleteRelationMember {
                    role: member.role.clone(),
                    reference: member.reference,
                    member: resolved,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CompleteRelation {
            id: relation.id,
            version: relation.version,
            changeset_id: relation.changeset_id,
            timestamp: relation.timestamp,
            user_name: relation.user_name.clone(),
            user_id: relation.user_id,
            visible: relation.visible,
            tags: relation.tags.clone(),
            members,
        })
    }

    fn resolve_way(&self, way: &Way, id: i64) -> Result<CompleteWay, DataIntegrityError> {
        let nodes = way
            .nodes
            .iter()
            .map(|node_id| {
                self.nodes
                    .get(node_id)
                    .cloned()
                    .ok_or(DataIntegrityError::MissingMember {
                        parent: OsmGeoKey::way(id),
                        member: OsmGeoKey::node(*node_id),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CompleteWay {
            id: way.id,
            version: way.version,
            changeset_id: way.changeset_id,
            timestamp: way.timestamp,
            user_name: way.user_name.clone(),
            user_id: way.user_id,
            visible: way.visible,
            tags: way.tags.clone(),
            nodes,
        })
    }
}
