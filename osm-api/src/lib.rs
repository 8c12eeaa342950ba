#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(any(), deny(clippy::unwrap_used))]

mod api;
pub mod auth;
mod client;
pub mod config;
pub mod errors;
mod osm_api;
pub mod overpass;
pub mod query;
mod util;
pub mod validate;

pub mod prelude;

// --- PUBLIC API EXPORTS ---
// Transport
pub use client::{
    OsmHttpClient, OsmHttpClientBuilder, OsmResponse, RequestBody, RequestOptions,
};
// Clients
pub use api::{AuthClient, Capabilities, NonAuthClient};
pub use osm_api::OsmApi;
pub use overpass::{OverpassClient, OverpassQuery};
// Authentication
pub use auth::{AuthStrategy, BasicAuth, OAuth1, OAuth2};
// Configuration
pub use config::{AuthConfig, ClientConfig};
// Queries
pub use query::{ChangesetQuery, NotesQuery};

// Error types
pub use errors::{ApiError, BuildError, ConfigError, Error, Result, TransportError};

// Export common constants
pub use api::{
    DEFAULT_CHUNK_SIZE, DEFAULT_CLOSED_DAYS, DEFAULT_NOTES_LIMIT, MAX_PREFERENCES,
    REQUIRED_CHANGESET_TAGS,
};
pub use osm_api::{PRODUCTION_URL, SANDBOX_URL};
pub use overpass::DEFAULT_OVERPASS_URL;
pub use validate::MAX_NOTES_LIMIT;

// Re-exports
pub use osm_common;
pub use osm_common::{
    Api, Bounds, Changeset, ChangesetComment, CompleteOsmGeo, CompleteRelation,
    CompleteRelationMember, CompleteWay, DataIntegrityError, DiffEntry, DiffResult, ElementStream,
    ElementType, GpxFile, MAX_PREFERENCE_LENGTH, Node, Note, NoteAction, NoteComment, NoteStatus,
    Osm, OsmChange, OsmGeo, OsmGeoKey, Permissions, Policy, Preference, Preferences, Relation,
    RelationMember, Tag, Tags, TypedStream, User, Visibility, Way,
};
pub use reqwest::{Method, StatusCode};
