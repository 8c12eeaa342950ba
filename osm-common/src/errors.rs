//! Errors raised while encoding or decoding OSM documents.

use thiserror::Error;

use crate::element::OsmGeoKey;

/// A response arrived but could not be turned into the requested value.
#[derive(Debug, Error)]
pub enum DataIntegrityError {
    /// The document does not match the expected XML shape.
    #[error("malformed XML document: {0}")]
    Xml(#[from] quick_xml::DeError),

    /// The document is not well-formed XML.
    #[error("unreadable XML stream: {0}")]
    Reader(#[from] quick_xml::Error),

    /// The body is not the expected JSON document.
    #[error("malformed JSON document: {0}")]
    Json(#[from] serde_json::Error),

    /// The body is not valid UTF-8.
    #[error("response body is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// The primary element of a "full" document is not present in it.
    #[error("document does not contain {0}")]
    MissingElement(OsmGeoKey),

    /// A member referenced by an element of a "full" document is not present in it.
    #[error("{parent} references {member}, which is missing from the document")]
    MissingMember {
        /// The way or relation holding the reference.
        parent: OsmGeoKey,
        /// The referenced element.
        member: OsmGeoKey,
    },

    /// The document was valid but did not contain the expected entity.
    #[error("response did not contain a {0}")]
    Empty(&'static str),

    /// A plain-text response body was expected to be an integer.
    #[error("expected a number in the response body, got `{raw}`")]
    InvalidNumber {
        /// The body text, trimmed.
        raw: String,
        /// Parse failure.
        #[source]
        source: std::num::ParseIntError,
    },
}

/// A request body could not be serialized.
#[derive(Debug, Error)]
#[error("failed to encode XML request body: {0}")]
pub struct EncodeError(#[from] pub quick_xml::SeError);
