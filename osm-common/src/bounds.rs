use serde::{Deserialize, Serialize};

use crate::format::{coordinate, format_coordinate};

/// A geographic bounding box in degrees.
///
/// Every coordinate is optional so the type can carry a partially filled
/// `<bounds>` element; request builders reject incomplete boxes before sending.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename = "bounds")]
pub struct Bounds {
    /// Western edge.
    #[serde(
        rename = "@minlon",
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "coordinate::serialize"
    )]
    pub min_longitude: Option<f64>,
    /// Southern edge.
    #[serde(
        rename = "@minlat",
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "coordinate::serialize"
    )]
    pub min_latitude: Option<f64>,
    /// Eastern edge.
    #[serde(
        rename = "@maxlon",
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "coordinate::serialize"
    )]
    pub max_longitude: Option<f64>,
    /// Northern edge.
    #[serde(
        rename = "@maxlat",
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "coordinate::serialize"
    )]
    pub max_latitude: Option<f64>,
}

impl Bounds {
    /// Create a fully specified box.
    pub fn new(min_longitude: f64, min_latitude: f64, max_longitude: f64, max_latitude: f64) -> Self {
        Self {
            min_longitude: Some(min_longitude),
            min_latitude: Some(min_latitude),
            max_longitude: Some(max_longitude),
            max_latitude: Some(max_latitude),
        }
    }

    /// All four coordinates as `[min_lon, min_lat, max_lon, max_lat]`, if every one is set.
    pub fn coordinates(&self) -> Option<[f64; 4]> {
        Some([
            self.min_longitude?,
            self.min_latitude?,
            self.max_longitude?,
            self.max_latitude?,
        ])
    }

    /// The `bbox` query value: `min_lon,min_lat,max_lon,max_lat`.
    ///
    /// ```
    /// # use osm_common::Bounds;
    /// let bounds = Bounds::new(-77.0371, 38.9, -77.03, 38.91);
    /// assert_eq!(bounds.to_bbox().as_deref(), Some("-77.0371,38.9,-77.03,38.91"));
    /// assert_eq!(Bounds::default().to_bbox(), None);
    /// ```
    pub fn to_bbox(&self) -> Option<String> {
        let coordinates = self.coordinates()?;
        Some(
            coordinates
                .iter()
                .map(|c| format_coordinate(*c))
                .collect::<Vec<_>>()
                .join(","),
        )
    }

    /// The Overpass QL form: `(south,west,north,east)`.
    pub fn to_overpass(&self) -> Option<String> {
        let [min_lon, min_lat, max_lon, max_lat] = self.coordinates()?;
        Some(format!(
            "({},{},{},{})",
            format_coordinate(min_lat),
            format_coordinate(min_lon),
            format_coordinate(max_lat),
            format_coordinate(max_lon)
        ))
    }
}
