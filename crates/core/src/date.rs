//! Calendar dates as they travel over the wire.
//!
//! The API is inconsistent about dates: some fields come back as `YYYY-MM-DD`,
//! others as full RFC 3339 timestamps, and unset fields as `""` or `null`.
//! Everything is normalised to [`NaiveDate`] and written back as `YYYY-MM-DD`.

use chrono::{DateTime, NaiveDate};

const WIRE_FORMAT: &str = "%Y-%m-%d";

/// Parse a wire date. Blank input is treated as absent.
pub fn parse_wire_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, WIRE_FORMAT) {
        return Some(date);
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }

    // `2024-03-01T00:00:00` without an offset, or anything else with a
    // leading calendar date.
    raw.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, WIRE_FORMAT).ok())
}

/// Format a date the way the API expects it in form fields.
pub fn format_wire_date(date: NaiveDate) -> String {
    date.format(WIRE_FORMAT).to_string()
}

/// `#[serde(with = "fleetdesk_core::date::optional")]` for `Option<NaiveDate>`.
pub mod optional {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&super::format_wire_date(*date)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => super::parse_wire_date(&s)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {s}"))),
        }
    }
}

/// `#[serde(with = "fleetdesk_core::date::required")]` for `NaiveDate`.
pub mod required {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_wire_date(*value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_wire_date(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {raw}")))
    }
}
