//! Whole-document encoding and decoding.

use serde::{Serialize, de::DeserializeOwned};

use crate::errors::{DataIntegrityError, EncodeError};

const DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Serialize a request document ([`crate::Osm`], [`crate::OsmChange`]) to XML text.
///
/// The root element name comes from the type's serde name.
///
/// ```
/// # use osm_common::{Osm, Node, OsmGeo, to_xml};
/// let body = to_xml(&Osm::with_element(OsmGeo::Node(Node {
///     latitude: Some(1.5),
///     longitude: Some(-0.000_001),
///     ..Default::default()
/// })))?;
/// assert!(body.contains(r#"<node lat="1.5" lon="-0.000001""#));
/// # Ok::<_, osm_common::EncodeError>(())
/// ```
pub fn to_xml<T: Serialize>(document: &T) -> Result<String, EncodeError> {
    let mut out = String::from(DECLARATION);
    out.push_str(&quick_xml::se::to_string(document)?);
    Ok(out)
}

/// Parse a complete response document.
pub fn from_xml<T: DeserializeOwned>(xml: &str) -> Result<T, DataIntegrityError> {
    Ok(quick_xml::de::from_str(xml)?)
}
