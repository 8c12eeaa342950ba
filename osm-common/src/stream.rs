//! Lazy element iteration over a response body.
//!
//! History, multi-fetch and back-reference responses can be large; an
//! [`ElementStream`] only decodes the next matching element when asked.

use std::{fmt, io::Cursor, marker::PhantomData};

use quick_xml::{Reader, events::Event, name::QName};
use serde::de::DeserializeOwned;

use crate::{Changeset, DataIntegrityError, Node, Note, OsmGeo, Relation, User, Way};

/// Elements that can be pulled one by one out of an `<osm>` document.
pub trait StreamElement: Sized {
    /// Whether an XML element named `name` is decoded into `Self`.
    fn accepts(name: &[u8]) -> bool;

    /// Decode one XML fragment whose root is named `name`.
    fn decode(name: &[u8], fragment: &str) -> Result<Self, DataIntegrityError>;
}

macro_rules! stream_element {
    ($ty:ty, $tag:literal) => {
        impl StreamElement for $ty {
            fn accepts(name: &[u8]) -> bool {
                name == $tag
            }

            fn decode(_name: &[u8], fragment: &str) -> Result<Self, DataIntegrityError> {
                decode_fragment(fragment)
            }
        }
    };
}

stream_element!(Node, b"node");
stream_element!(Way, b"way");
stream_element!(Relation, b"relation");
stream_element!(Changeset, b"changeset");
stream_element!(User, b"user");
stream_element!(Note, b"note");

impl StreamElement for OsmGeo {
    fn accepts(name: &[u8]) -> bool {
        Node::accepts(name) || Way::accepts(name) || Relation::accepts(name)
    }

    fn decode(name: &[u8], fragment: &str) -> Result<Self, DataIntegrityError> {
        match name {
            b"node" => Node::decode(name, fragment).map(OsmGeo::Node),
            b"way" => Way::decode(name, fragment).map(OsmGeo::Way),
            _ => Relation::decode(name, fragment).map(OsmGeo::Relation),
        }
    }
}

fn decode_fragment<T: DeserializeOwned>(fragment: &str) -> Result<T, DataIntegrityError> {
    Ok(quick_xml::de::from_str(fragment)?)
}

/// Finite, non-restartable iterator over the `T` elements of a document.
///
/// Elements of other kinds are skipped. The first malformed element ends the
/// stream after yielding its error.
///
/// ```
/// # use osm_common::{ElementStream, Way};
/// let xml = r#"<osm><node id="1" lat="0" lon="0"/><way id="2" version="1"/><way id="2" version="2"/></osm>"#;
/// let versions: Vec<_> = ElementStream::<Way>::new(xml.to_string())
///     .map(|way| way.map(|w| w.version))
///     .collect::<Result<_, _>>()?;
/// assert_eq!(versions, vec![Some(1), Some(2)]);
/// # Ok::<_, osm_common::DataIntegrityError>(())
/// ```
pub struct ElementStream<T> {
    reader: Reader<Cursor<Vec<u8>>>,
    buf: Vec<u8>,
    done: bool,
    _marker: PhantomData<fn() -> T>,
}

impl<T> fmt::Debug for ElementStream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementStream")
            .field("position", &self.reader.buffer_position())
            .field("done", &self.done)
            .finish()
    }
}

impl<T: StreamElement> ElementStream<T> {
    /// Stream over the body `xml`.
    pub fn new(xml: String) -> Self {
        Self {
            reader: Reader::from_reader(Cursor::new(xml.into_bytes())),
            buf: Vec::new(),
            done: false,
            _marker: PhantomData,
        }
    }

    /// Advance to the next accepted element, returning its name and byte span.
    fn next_fragment(&mut self) -> Result<Option<(Vec<u8>, usize, usize)>, DataIntegrityError> {
        loop {
            self.buf.clear();
            let start = position(&self.reader);
            let (name, is_start) = match self.reader.read_event_into(&mut self.buf)? {
                Event::Start(element) => (element.name().as_ref().to_vec(), true),
                Event::Empty(element) => (element.name().as_ref().to_vec(), false),
                Event::Eof => return Ok(None),
                _ => continue,
            };

            if T::accepts(&name) {
                if is_start {
                    self.buf.clear();
                    self.reader.read_to_end_into(QName(&name), &mut self.buf)?;
                }
                return Ok(Some((name, start, position(&self.reader))));
            }
            // Descend into the root, skip everything else.
            if is_start && name.as_slice() != b"osm" {
                self.buf.clear();
                self.reader.read_to_end_into(QName(&name), &mut self.buf)?;
            }
        }
    }
}

fn position(reader: &Reader<Cursor<Vec<u8>>>) -> usize {
    usize::try_from(reader.buffer_position()).unwrap_or(usize::MAX)
}

impl<T: StreamElement> Iterator for ElementStream<T> {
    type Item = Result<T, DataIntegrityError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let decoded = match self.next_fragment() {
            Ok(Some((name, start, end))) => {
                let source = self.reader.get_ref().get_ref();
                // The reader may already have consumed the opening `<`.
                let start = source
                    .get(..=start)
                    .and_then(|head| head.iter().rposition(|b| *b == b'<'))
                    .unwrap_or(start);
                source
                    .get(start..end)
                    .ok_or(DataIntegrityError::Empty("element"))
                    .and_then(|bytes| Ok(std::str::from_utf8(bytes)?))
                    .and_then(|fragment| T::decode(&name, fragment))
            }
            Ok(None) => {
                self.done = true;
                return None;
            }
            Err(err) => Err(err),
        };
        if decoded.is_err() {
            self.done = true;
        }
        Some(decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HISTORY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<osm version="0.6" generator="OpenStreetMap server">
  <bounds minlat="0" minlon="0" maxlat="1" maxlon="1"/>
  <node id="7" version="1" lat="1.0" lon="2.0"><tag k="name" v="a"/></node>
  <way id="9" version="1"><nd ref="7"/></way>
  <node id="7" version="2" lat="1.5" lon="2.5"/>
  <node id="7" version="3" visible="false"/>
</osm>"#;

    #[test]
    fn yields_only_the_requested_kind() {
        let nodes: Vec<Node> = ElementStream::new(HISTORY.to_string())
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0].tags.get("name"), Some("a"));
        assert_eq!(nodes[1].latitude, Some(1.5));
        assert_eq!(nodes[2].visible, Some(false));
    }

    #[test]
    fn mixed_elements_keep_document_order() {
        let elements: Vec<OsmGeo> = ElementStream::new(HISTORY.to_string())
            .collect::<Result<_, _>>()
            .unwrap();
        let kinds: Vec<_> = elements.iter().map(OsmGeo::element_type).collect();
        assert_eq!(
            kinds,
            vec![
                crate::ElementType::Node,
                crate::ElementType::Way,
                crate::ElementType::Node,
                crate::ElementType::Node
            ]
        );
    }

    #[test]
    fn empty_document_yields_nothing() {
        let mut stream = ElementStream::<Relation>::new(HISTORY.to_string());
        assert!(stream.next().is_none());
        assert!(stream.next().is_none());
    }

    #[test]
    fn malformed_element_ends_the_stream() {
        let xml = r#"<osm><node id="1" lat="0" lon="0"/><node id="oops"/><node id="3"/></osm>"#;
        let mut stream = ElementStream::<Node>::new(xml.to_string());
        assert!(stream.next().unwrap().is_ok());
        assert!(stream.next().unwrap().is_err());
        assert!(stream.next().is_none());
    }
}
