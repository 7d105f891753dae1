//! Loader Data Types
//!
//! Wire shapes of the listing endpoint. Everything is lenient on input:
//! missing fields default, a non-array `rows` becomes an empty list.

use crate::error::{DirectoryError, Result};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// `{ ok: bool, rows: [...] }` as returned by the endpoint, either as a
/// response body or as the argument of the callback.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingEnvelope {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub rows: serde_json::Value,
}

impl ListingEnvelope {
    pub fn from_body(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|e| DirectoryError::InvalidEnvelope(e.to_string()))
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| DirectoryError::InvalidEnvelope(e.to_string()))
    }

    /// Anything but an explicit `ok: true` is a failure.
    pub fn ensure_ok(self) -> Result<Self> {
        if self.ok {
            Ok(self)
        } else {
            Err(DirectoryError::InvalidEnvelope("ok flag is not true".to_string()))
        }
    }

    /// Rows that deserialize; anything else is skipped.
    pub fn rows(&self) -> Vec<RawRow> {
        let Some(items) = self.rows.as_array() else {
            if !self.rows.is_null() {
                tracing::warn!("Listing rows is not an array, treating as empty");
            }
            return Vec::new();
        };

        items
            .iter()
            .enumerate()
            .filter_map(|(idx, item)| match RawRow::deserialize(item) {
                Ok(row) => Some(row),
                Err(e) => {
                    tracing::warn!("Skipping listing row {}: {}", idx, e);
                    None
                }
            })
            .collect()
    }
}

/// A row as the spreadsheet delivers it, before category canonicalization.
///
/// Cells are coerced to text: `null` becomes `""`, numbers and booleans
/// their display form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRow {
    #[serde(default, deserialize_with = "cell_text")]
    pub name: String,
    #[serde(default, deserialize_with = "cell_text")]
    pub message: String,
    #[serde(default, deserialize_with = "cell_text")]
    pub category: String,
    #[serde(default, deserialize_with = "cell_text")]
    pub url: String,
    /// Empty when the sheet leaves it blank.
    #[serde(default, rename = "styleClass", deserialize_with = "cell_text")]
    pub style_class: String,
}

fn cell_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(String::new()),
        serde_json::Value::String(text) => Ok(text),
        serde_json::Value::Number(number) => Ok(number.to_string()),
        serde_json::Value::Bool(flag) => Ok(flag.to_string()),
        other => Err(de::Error::custom(format!("expected a cell value, got {}", other))),
    }
}
