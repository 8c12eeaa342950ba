//! Common imports for quick starts.

// Common
pub use crate::{BuildError, Error, Result};

// Transport
pub use crate::{OsmHttpClient, OsmHttpClientBuilder, RequestOptions};

// Entry point and clients
// Façade owning the transport and the base URL.
pub use crate::OsmApi;
// Anonymous reads.
pub use crate::NonAuthClient;
// Reads and writes on behalf of one user.
pub use crate::AuthClient;
// Overpass interpreters.
pub use crate::{OverpassClient, OverpassQuery};

// Helpers
// Credentials
pub use crate::{AuthStrategy, BasicAuth, OAuth1, OAuth2};
// Configuration file
pub use crate::ClientConfig;
// Query filters
pub use crate::{ChangesetQuery, NotesQuery};
// Entity model
pub use crate::{Bounds, Changeset, ElementType, Node, OsmChange, OsmGeo, Relation, Tags, Way};
