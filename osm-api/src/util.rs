use std::str::FromStr;

use osm_common::DataIntegrityError;

use crate::client::http::OsmResponse;
use crate::errors::{ApiError, Error, Result};

/// Convert non-2xx responses into a structured error that includes the server body.
///
/// If the status is successful (2xx), the original response is returned.
/// Otherwise the body is read as (lossy) text into an [`ApiError`].
pub(crate) fn check_http_status(response: OsmResponse) -> Result<OsmResponse> {
    if response.status.is_success() {
        return Ok(response);
    }

    let status = response.status;
    Err(Error::from(ApiError {
        request_uri: response.url,
        status,
        reason_phrase: status
            .canonical_reason()
            .unwrap_or("Unknown Error")
            .to_string(),
        body: String::from_utf8_lossy(&response.body).into_owned(),
    }))
}

/// Parse a plain-text numeric body, such as the id returned by a create call.
pub(crate) fn parse_number<T>(body: &str) -> Result<T>
where
    T: FromStr<Err = std::num::ParseIntError>,
{
    let raw = body.trim();
    raw.parse().map_err(|source| {
        Error::from(DataIntegrityError::InvalidNumber {
            raw: raw.to_string(),
            source,
        })
    })
}
