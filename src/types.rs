//! Core record types consumed by the catalog builder.

use crate::classification::UNKNOWN_LABEL;
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

/// Rendered in place of a missing or unparseable sub-item date.
pub const UNKNOWN_DATE: &str = "0000-00-00";

/// Catalog entity: one classified record with its attached sub-items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub subitems: Vec<SubItem>,
}

impl Record {
    pub fn new(id: impl Into<String>, name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            code: code.into(),
            subitems: Vec::new(),
        }
    }

    pub fn with_subitems(mut self, subitems: Vec<SubItem>) -> Self {
        self.subitems = subitems;
        self
    }

    /// Name shown in index entries; a blank name renders as [`UNKNOWN_LABEL`].
    pub fn display_name(&self) -> &str {
        let name = self.name.trim();
        if name.is_empty() {
            UNKNOWN_LABEL
        } else {
            name
        }
    }
}

/// A document attached to a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubItem {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    /// `None` when the feed carries no usable date.
    #[serde(
        default,
        alias = "publish_date",
        deserialize_with = "deserialize_date"
    )]
    pub date: Option<NaiveDate>,
}

impl SubItem {
    pub fn new(url: impl Into<String>, title: impl Into<String>, date: Option<NaiveDate>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            date,
        }
    }

    /// Date as `YYYY-MM-DD`, or [`UNKNOWN_DATE`].
    pub fn date_label(&self) -> String {
        match self.date {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => UNKNOWN_DATE.to_string(),
        }
    }
}

/// Parse an ISO-8601 date or date-time; anything else is treated as unknown.
pub fn parse_feed_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    raw.get(..10)
        .and_then(|head| NaiveDate::parse_from_str(head, "%Y-%m-%d").ok())
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_feed_date))
}
