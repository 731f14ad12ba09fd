use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::primitives::{datetime_to_epoch_millis, epoch_millis_to_datetime, parse_date_text};

/// A single cell of a data row.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    #[default]
    Null,
    Number(f64),
    Date(DateTime<Utc>),
    Text(String),
}

impl FieldValue {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Numeric coercion used by continuous scales.
    ///
    /// Numbers pass through, numeric text is parsed, dates become epoch
    /// milliseconds. Anything else (including non-finite numbers) is `None`.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            Self::Null => return None,
            Self::Number(value) => *value,
            Self::Date(date) => datetime_to_epoch_millis(*date),
            Self::Text(text) => text.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }

    /// Date coercion used by temporal scales.
    ///
    /// Order: date passthrough, epoch-millisecond numbers, ISO-8601 text.
    #[must_use]
    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Null => None,
            Self::Date(date) => Some(*date),
            Self::Number(value) => epoch_millis_to_datetime(*value),
            Self::Text(text) => parse_date_text(text),
        }
    }

    /// Stringified key used by ordinal scales and legends. `Null` has no key.
    #[must_use]
    pub fn as_key(&self) -> Option<String> {
        match self {
            Self::Null => None,
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Number(value) => write!(f, "{value}"),
            Self::Date(date) => write!(f, "{}", date.to_rfc3339()),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Date(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
