//! Locale-invariant wire formatting for numbers and dates.
//!
//! Everything that ends up in a URL or a request body goes through these
//! helpers: `.` as decimal separator, no grouping, no exponent, bounded precision.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Maximum number of fractional digits written for a coordinate.
pub const COORDINATE_PRECISION: usize = 8;

/// `strftime` pattern of the dates used by the notes API (and the changeset `time` filter).
pub const NOTE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Render a coordinate in fixed-point notation with at most
/// [`COORDINATE_PRECISION`] fractional digits and no trailing zeros.
///
/// ```
/// use osm_common::format::format_coordinate;
/// assert_eq!(format_coordinate(-77.0365), "-77.0365");
/// assert_eq!(format_coordinate(1e-9), "0");
/// assert_eq!(format_coordinate(12.0), "12");
/// ```
pub fn format_coordinate(value: f64) -> String {
    let mut rendered = format!("{value:.COORDINATE_PRECISION$}");
    if rendered.contains('.') {
        let len = rendered.trim_end_matches('0').trim_end_matches('.').len();
        rendered.truncate(len);
    }
    if rendered == "-0" {
        rendered = "0".to_string();
    }
    rendered
}

/// Format a timestamp the way the notes API expects it: `yyyy-MM-dd HH:mm:ss UTC`.
pub fn format_note_date(date: &DateTime<Utc>) -> String {
    date.format(NOTE_DATE_FORMAT).to_string()
}

/// Parse a notes API timestamp (`2019-06-15 08:26:04 UTC`).
pub fn parse_note_date(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(raw.trim(), NOTE_DATE_FORMAT).map(|naive| naive.and_utc())
}

/// `serialize_with` helper for optional coordinate attributes.
pub(crate) mod coordinate {
    use serde::Serializer;

    pub(crate) fn serialize<S: Serializer>(
        value: &Option<f64>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => serializer.serialize_str(&super::format_coordinate(*value)),
            None => serializer.serialize_none(),
        }
    }
}

/// `with` helper for optional note dates.
pub(crate) mod note_date {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub(crate) fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => serializer.serialize_str(&super::format_note_date(date)),
            None => serializer.serialize_none(),
        }
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => super::parse_note_date(raw)
                .map(Some)
                .map_err(|err| D::Error::custom(format!("invalid note date `{raw}`: {err}"))),
        }
    }
}

/// `with` helper for keyword values (`Display` out, `FromStr` in).
pub(crate) mod keyword {
    use std::{fmt::Display, str::FromStr};

    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub(crate) fn serialize<T: Display, S: Serializer>(
        value: &T,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub(crate) fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.trim().parse().map_err(D::Error::custom)
    }
}

/// Optional variant of [`keyword`].
pub(crate) mod opt_keyword {
    use std::{fmt::Display, str::FromStr};

    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub(crate) fn serialize<T: Display, S: Serializer>(
        value: &Option<T>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => serializer.collect_str(value),
            None => serializer.serialize_none(),
        }
    }

    pub(crate) fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse().map(Some).map_err(D::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn coordinates_are_fixed_point() {
        assert_eq!(format_coordinate(0.0), "0");
        assert_eq!(format_coordinate(-0.0), "0");
        assert_eq!(format_coordinate(180.0), "180");
        assert_eq!(format_coordinate(-38.97), "-38.97");
        assert_eq!(format_coordinate(0.000_000_12), "0.00000012");
        assert_eq!(format_coordinate(1.123_456_789_9), "1.12345679");
        assert!(!format_coordinate(1.5e-7).contains('e'));
        assert!(!format_coordinate(1234.5).contains(','));
    }

    #[test]
    fn note_dates_use_the_notes_wire_format() {
        let date = Utc.with_ymd_and_hms(2019, 6, 15, 8, 26, 4).unwrap();
        assert_eq!(format_note_date(&date), "2019-06-15 08:26:04 UTC");
        assert_eq!(parse_note_date("2019-06-15 08:26:04 UTC").unwrap(), date);
        assert!(parse_note_date("2019-06-15T08:26:04Z").is_err());
    }
}
