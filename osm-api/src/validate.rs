//! Pre-flight checks.
//!
//! Everything here is pure and runs before a request is built, so a call that
//! the server would certainly reject fails with [`Error::InvalidArgument`]
//! without touching the network.

use osm_common::{Bounds, GpxFile, MAX_PREFERENCE_LENGTH, OsmGeo, Tags, Visibility};

use crate::{
    errors::{Error, Result},
    query::{ChangesetQuery, NotesQuery},
};

/// Largest `limit` accepted by the notes endpoints.
pub const MAX_NOTES_LIMIT: u32 = 10_000;

/// All four coordinates present, longitudes within ±180, latitudes within ±90,
/// and `min_latitude < max_latitude`. Returns `[min_lon, min_lat, max_lon, max_lat]`.
///
/// ```
/// # use osm_common::Bounds;
/// # use osm_api::validate;
/// assert!(validate::bounds(&Bounds::new(-0.5, 51.2, 0.3, 51.7)).is_ok());
/// assert!(validate::bounds(&Bounds::new(0.0, 95.0, 1.0, 96.0)).is_err());
/// assert!(validate::bounds(&Bounds::default()).is_err());
/// ```
pub fn bounds(bounds: &Bounds) -> Result<[f64; 4]> {
    let [min_lon, min_lat, max_lon, max_lat] = bounds
        .coordinates()
        .ok_or_else(|| Error::invalid("no bound may be missing"))?;

    let longitudes_ok = [min_lon, max_lon]
        .iter()
        .all(|lon| (-180.0..=180.0).contains(lon));
    let latitudes_ok = [min_lat, max_lat]
        .iter()
        .all(|lat| (-90.0..=90.0).contains(lat));

    if !longitudes_ok || !latitudes_ok || min_lat >= max_lat {
        return Err(Error::invalid(format!(
            "bounds {min_lon},{min_lat},{max_lon},{max_lat} are not valid"
        )));
    }
    Ok([min_lon, min_lat, max_lon, max_lat])
}

/// A single point within ±90 latitude and ±180 longitude.
pub fn coordinate(latitude: f64, longitude: f64) -> Result<()> {
    if (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude) {
        Ok(())
    } else {
        Err(Error::invalid(format!(
            "coordinate {latitude},{longitude} is out of range"
        )))
    }
}

/// Every key in `keys` is present in `tags` with a non-empty value.
pub fn required_tags(tags: &Tags, keys: &[&str]) -> Result<()> {
    for key in keys {
        if tags.get(key).is_none_or(str::is_empty) {
            return Err(Error::invalid(format!(
                "tags are missing the required key: {key}"
            )));
        }
    }
    Ok(())
}

/// The element carries a version.
pub fn has_version(element: &OsmGeo) -> Result<i32> {
    element.version().ok_or_else(|| {
        Error::invalid(format!("{} must have a version", element.element_type()))
    })
}

/// The element carries an id.
pub fn has_id(element: &OsmGeo) -> Result<i64> {
    element
        .id()
        .ok_or_else(|| Error::invalid(format!("{} must have an id", element.element_type())))
}

/// Trace metadata needed for an upload. Returns the file name, description and visibility.
pub fn trace_metadata(file: &GpxFile) -> Result<(&str, &str, Visibility)> {
    let name = file
        .name
        .as_deref()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| Error::invalid("trace must have a file name"))?;
    let description = file
        .description
        .as_deref()
        .filter(|description| !description.is_empty())
        .ok_or_else(|| Error::invalid("trace must have a description"))?;
    let visibility = file
        .visibility
        .ok_or_else(|| Error::invalid("trace must have a visibility"))?;
    Ok((name, description, visibility))
}

/// Non-empty key; key and value at most [`MAX_PREFERENCE_LENGTH`] characters.
pub fn preference(key: &str, value: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::invalid("preference key must not be empty"));
    }
    if key.chars().count() > MAX_PREFERENCE_LENGTH {
        return Err(Error::invalid(format!(
            "preference key is longer than {MAX_PREFERENCE_LENGTH} characters"
        )));
    }
    if value.chars().count() > MAX_PREFERENCE_LENGTH {
        return Err(Error::invalid(format!(
            "value of preference {key} is longer than {MAX_PREFERENCE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Text of a note or a comment is not blank.
pub fn comment_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(Error::invalid("comment text must not be empty"));
    }
    Ok(())
}

/// `limit` between 1 and [`MAX_NOTES_LIMIT`].
pub fn notes_limit(limit: u32) -> Result<()> {
    if (1..=MAX_NOTES_LIMIT).contains(&limit) {
        Ok(())
    } else {
        Err(Error::invalid(format!(
            "notes limit must be between 1 and {MAX_NOTES_LIMIT}, got {limit}"
        )))
    }
}

/// Mutually exclusive changeset filters.
pub fn changeset_query(query: &ChangesetQuery) -> Result<()> {
    if query.user_id.is_some() && query.user_name.is_some() {
        return Err(Error::invalid(
            "query can only specify a user id or a user name, not both",
        ));
    }
    if query.open_only && query.closed_only {
        return Err(Error::invalid(
            "query can only ask for open or closed changesets, not both",
        ));
    }
    if query.max_opened_date.is_some() && query.min_closed_date.is_none() {
        return Err(Error::invalid(
            "query must specify a minimum closed date if a maximum opened date is specified",
        ));
    }
    if let Some(bbox) = &query.bounds {
        bounds(bbox)?;
    }
    Ok(())
}

/// Mutually exclusive note search filters and a non-empty search text.
pub fn notes_query(query: &NotesQuery) -> Result<()> {
    if query.user_id.is_some() && query.user_name.is_some() {
        return Err(Error::invalid(
            "query can only specify a user id or a user name, not both",
        ));
    }
    if let (Some(from), Some(to)) = (query.from, query.to) {
        if from > to {
            return Err(Error::invalid(
                "query start date must not be after its end date",
            ));
        }
    }
    if query.text.trim().is_empty() {
        return Err(Error::invalid("query search text is required"));
    }
    if let Some(limit) = query.limit {
        notes_limit(limit)?;
    }
    Ok(())
}
