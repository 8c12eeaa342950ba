//! One method per OSM API v0.6 endpoint, split by resource.
//!
//! [`NonAuthClient`] carries the reads; [`AuthClient`] adds the writes and
//! dereferences to an authenticated [`NonAuthClient`].

pub mod core;
mod changesets;
mod elements;
mod misc;
mod notes;
mod traces;
mod users;

pub use self::changesets::REQUIRED_CHANGESET_TAGS;
pub use self::core::{AuthClient, DEFAULT_CHUNK_SIZE, NonAuthClient};
pub use self::misc::Capabilities;
pub use self::notes::{DEFAULT_CLOSED_DAYS, DEFAULT_NOTES_LIMIT};
pub use self::users::MAX_PREFERENCES;
