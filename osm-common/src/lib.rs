//! Entity model and XML wire codec for the OpenStreetMap API v0.6.
//!
//! This crate has no network code. It describes what the API sends and
//! accepts ([`Osm`] documents, [`OsmChange`] uploads, [`DiffResult`]s),
//! encodes request bodies with [`to_xml`], decodes responses with
//! [`from_xml`] or lazily with [`ElementStream`], and rebuilds `/full`
//! responses into complete elements with [`CompleteGraph`].

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(any(), deny(clippy::unwrap_used))]

mod api;
mod bounds;
mod changeset;
mod complete;
mod element;
pub mod errors;
pub mod format;
mod gpx;
mod note;
mod osm;
mod stream;
mod tags;
mod user;
mod xml;

/// Protocol version spoken by this crate.
pub const API_VERSION: &str = "0.6";

/// `generator` attribute written into request documents.
pub const GENERATOR: &str = concat!("osm-api-rs/", env!("CARGO_PKG_VERSION"));

pub use api::{
    Api, ApiVersion, Blacklist, ChangesetLimits, Imagery, Maximum, Policy, QueryLimits,
    ServiceStatus, Timeout, Tracepoints,
};
pub use bounds::Bounds;
pub use changeset::{Changeset, ChangesetComment, DiffEntry, DiffIds, DiffResult, Discussion, OsmChange};
pub use complete::{
    CompleteGraph, CompleteMember, CompleteOsmGeo, CompleteRelation, CompleteRelationMember,
    CompleteWay,
};
pub use element::{
    ElementType, Node, OsmGeo, OsmGeoKey, Relation, RelationMember, UnknownElementType, Way,
};
pub use errors::{DataIntegrityError, EncodeError};
pub use gpx::{GpxFile, TypedStream, UnknownVisibility, Visibility};
pub use note::{Note, NoteAction, NoteComment, NoteStatus, UnknownNoteKeyword};
pub use osm::Osm;
pub use stream::{ElementStream, StreamElement};
pub use tags::{Tag, Tags};
pub use user::{
    BlockCount, Blocks, ContributorTerms, Count, Home, Image, Languages, MAX_PREFERENCE_LENGTH,
    MessageCount, Messages, Permission, Permissions, Preference, Preferences, User,
};
pub use xml::{from_xml, to_xml};
