pub mod core;
pub mod http;

pub use self::core::{OsmHttpClient, OsmHttpClientBuilder};
pub use self::http::{OsmResponse, RequestBody, RequestOptions};
