use serde::{Deserialize, Serialize};

use crate::{
    API_VERSION, Api, Bounds, Changeset, GENERATOR, GpxFile, Node, Note, OsmGeo, Permissions,
    Policy, Preferences, Relation, User, Way,
};

/// The `<osm>` root document.
///
/// Every response of the API except uploads and trace data is one of these,
/// and every element or changeset request body is wrapped in one.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename = "osm")]
pub struct Osm {
    /// API version.
    #[serde(rename = "@version", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Producing software.
    #[serde(rename = "@generator", default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,
    /// Copyright notice.
    #[serde(rename = "@copyright", default, skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
    /// Attribution address.
    #[serde(rename = "@attribution", default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<String>,
    /// License address.
    #[serde(rename = "@license", default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    /// Capabilities or versions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api: Option<Api>,
    /// Usage policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<Policy>,
    /// Area covered by a `map` response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
    /// Nodes.
    #[serde(rename = "node", default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<Node>,
    /// Ways.
    #[serde(rename = "way", default, skip_serializing_if = "Vec::is_empty")]
    pub ways: Vec<Way>,
    /// Relations.
    #[serde(rename = "relation", default, skip_serializing_if = "Vec::is_empty")]
    pub relations: Vec<Relation>,
    /// Changesets.
    #[serde(rename = "changeset", default, skip_serializing_if = "Vec::is_empty")]
    pub changesets: Vec<Changeset>,
    /// Users.
    #[serde(rename = "user", default, skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<User>,
    /// Notes.
    #[serde(rename = "note", default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<Note>,
    /// Trace metadata.
    #[serde(rename = "gpx_file", default, skip_serializing_if = "Vec::is_empty")]
    pub gpx_files: Vec<GpxFile>,
    /// OAuth permissions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Permissions>,
    /// User preferences.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<Preferences>,
}

impl Osm {
    /// Empty request document stamped with this library as generator.
    pub fn new() -> Self {
        Self {
            version: Some(API_VERSION.to_string()),
            generator: Some(GENERATOR.to_string()),
            ..Default::default()
        }
    }

    /// Request document holding a single element.
    pub fn with_element(element: OsmGeo) -> Self {
        let mut osm = Self::new();
        osm.push_element(element);
        osm
    }

    /// Request document holding a single changeset.
    pub fn with_changeset(changeset: Changeset) -> Self {
        Self {
            changesets: vec![changeset],
            ..Self::new()
        }
    }

    /// Request document holding a preference block.
    pub fn with_preferences(preferences: Preferences) -> Self {
        Self {
            preferences: Some(preferences),
            ..Self::new()
        }
    }

    /// Add an element to the matching list.
    pub fn push_element(&mut self, element: OsmGeo) {
        match element {
            OsmGeo::Node(node) => self.nodes.push(node),
            OsmGeo::Way(way) => self.ways.push(way),
            OsmGeo::Relation(relation) => self.relations.push(relation),
        }
    }

    /// Nodes, then ways, then relations.
    pub fn into_elements(self) -> Vec<OsmGeo> {
        self.nodes
            .into_iter()
            .map(OsmGeo::Node)
            .chain(self.ways.into_iter().map(OsmGeo::Way))
            .chain(self.relations.into_iter().map(OsmGeo::Relation))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ElementType, RelationMember, Tags, from_xml, to_xml};

    const MAP: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<osm version="0.6" generator="CGImap 0.8.3" copyright="OpenStreetMap and contributors"
     attribution="http://www.openstreetmap.org/copyright" license="http://opendatacommons.org/licenses/odbl/1-0/">
 <bounds minlat="38.9070200" minlon="-77.0371900" maxlat="38.9077300" maxlon="-77.0360000"/>
 <node id="1" visible="true" version="2" changeset="10" timestamp="2012-03-13T19:47:20Z" user="alice" uid="42" lat="38.9071000" lon="-77.0365000">
  <tag k="amenity" v="cafe"/>
 </node>
 <node id="2" visible="true" version="1" changeset="10" timestamp="2012-03-13T19:47:20Z" user="alice" uid="42" lat="38.9072000" lon="-77.0366000"/>
 <way id="3" visible="true" version="1" changeset="11" timestamp="2012-03-14T10:00:00Z" user="bob" uid="43">
  <nd ref="1"/>
  <nd ref="2"/>
  <tag k="highway" v="footway"/>
 </way>
 <node id="4" version="1" lat="38.9073" lon="-77.0367"/>
 <relation id="5" visible="true" version="1" changeset="12" timestamp="2012-03-15T10:00:00Z" user="bob" uid="43">
  <member type="way" ref="3" role="outer"/>
  <member type="node" ref="4" role=""/>
  <tag k="type" v="multipolygon"/>
 </relation>
</osm>"#;

    #[test]
    fn map_document() {
        let osm: Osm = from_xml(MAP).unwrap();
        assert_eq!(osm.bounds.unwrap().min_latitude, Some(38.90702));
        assert_eq!(osm.nodes.len(), 3);
        assert_eq!(osm.nodes[0].tags.get("amenity"), Some("cafe"));
        assert_eq!(osm.nodes[0].visible, Some(true));
        assert_eq!(osm.ways[0].nodes, vec![1, 2]);
        assert_eq!(osm.relations[0].members[0].member_type, ElementType::Way);
        assert_eq!(osm.relations[0].members[1].role, "");
        assert_eq!(osm.into_elements().len(), 5);
    }

    #[test]
    fn element_request_body_survives_a_round_trip() {
        let relation = Relation {
            id: Some(5),
            version: Some(2),
            changeset_id: Some(99),
            members: vec![
                RelationMember::new(ElementType::Way, 3, "outer"),
                RelationMember::new(ElementType::Node, 4, ""),
            ],
            tags: Tags::from([("type", "multipolygon"), ("name", "Äpfel & <Birnen>")]),
            ..Default::default()
        };
        let node = Node {
            id: Some(-1),
            changeset_id: Some(99),
            latitude: Some(-33.868_820_1),
            longitude: Some(151.209_295_5),
            ..Default::default()
        };
        let mut envelope = Osm::with_element(OsmGeo::Relation(relation.clone()));
        envelope.push_element(OsmGeo::Node(node.clone()));

        let xml = to_xml(&envelope).unwrap();
        assert!(xml.contains(r#"lat="-33.8688201""#));
        assert!(xml.contains(r#"role="""#));

        let decoded: Osm = from_xml(&xml).unwrap();
        assert_eq!(decoded.relations, vec![relation]);
        assert_eq!(decoded.nodes, vec![node]);
        assert_eq!(decoded.generator.as_deref(), Some(GENERATOR));
    }
}
