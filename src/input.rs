//! Input boundary: record feed and classification dictionary.

use crate::classification::ClassificationDictionary;
use crate::error::ApiError;
use crate::types::Record;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Load the record feed: a JSON array of records, or `{"data": [...]}`.
pub fn load_records(path: &Path) -> Result<Vec<Arc<Record>>, ApiError> {
    let text = read_input("record feed", path)?;
    let records = parse_records(&text)
        .map_err(|e| ApiError::InvalidInput(format!("{}: {}", path.display(), e)))?;
    info!(path = %path.display(), records = records.len(), "Loaded record feed");
    Ok(records)
}

/// Parse a feed document, dropping records without an id and keeping the
/// last record for a repeated id (at the position of the first).
pub fn parse_records(text: &str) -> Result<Vec<Arc<Record>>, ApiError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| ApiError::InvalidInput(format!("feed is not valid JSON: {}", e)))?;
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(ApiError::InvalidInput(
                    "feed object must carry a \"data\" array".to_string(),
                ))
            }
        },
        _ => {
            return Err(ApiError::InvalidInput(
                "feed must be an array of records or {\"data\": [...]}".to_string(),
            ))
        }
    };

    let mut records: Vec<Record> = Vec::with_capacity(items.len());
    let mut positions: HashMap<String, usize> = HashMap::new();
    for (index, item) in items.into_iter().enumerate() {
        let mut record: Record = serde_json::from_value(item)
            .map_err(|e| ApiError::InvalidInput(format!("record #{}: {}", index, e)))?;
        record.id = record.id.trim().to_string();
        if record.id.is_empty() {
            warn!(index, name = %record.name, "Skipping record without an id");
            continue;
        }
        match positions.get(&record.id) {
            Some(&position) => {
                warn!(id = %record.id, "Duplicate record id; the later record replaces the earlier one");
                records[position] = record;
            }
            None => {
                positions.insert(record.id.clone(), records.len());
                records.push(record);
            }
        }
    }

    Ok(records.into_iter().map(Arc::new).collect())
}

/// Dictionary file format, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictionaryFormat {
    Json,
    Toml,
}

impl DictionaryFormat {
    pub fn from_path(path: &Path) -> Result<Self, ApiError> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => Ok(DictionaryFormat::Json),
            Some("toml") => Ok(DictionaryFormat::Toml),
            _ => Err(ApiError::InvalidInput(format!(
                "{}: dictionary must be a .json or .toml file",
                path.display()
            ))),
        }
    }
}

pub fn load_dictionary(path: &Path) -> Result<ClassificationDictionary, ApiError> {
    let format = DictionaryFormat::from_path(path)?;
    let text = read_input("classification dictionary", path)?;
    let dictionary = parse_dictionary(&text, format)
        .map_err(|e| ApiError::InvalidInput(format!("{}: {}", path.display(), e)))?;
    info!(path = %path.display(), entries = dictionary.len(), "Loaded classification dictionary");
    Ok(dictionary)
}

/// Parse a `{coarse, mid, fine}` dictionary. Keys are trimmed and upper-cased
/// so they match normalized codes.
pub fn parse_dictionary(
    text: &str,
    format: DictionaryFormat,
) -> Result<ClassificationDictionary, ApiError> {
    let raw: ClassificationDictionary = match format {
        DictionaryFormat::Json => serde_json::from_str(text)
            .map_err(|e| ApiError::InvalidInput(format!("invalid dictionary JSON: {}", e)))?,
        DictionaryFormat::Toml => toml::from_str(text)
            .map_err(|e| ApiError::InvalidInput(format!("invalid dictionary TOML: {}", e)))?,
    };

    let canonical = |table: HashMap<String, String>| -> HashMap<String, String> {
        table
            .into_iter()
            .map(|(code, label)| (code.trim().to_ascii_uppercase(), label.trim().to_string()))
            .filter(|(code, label)| !code.is_empty() && !label.is_empty())
            .collect()
    };
    let dictionary = ClassificationDictionary {
        coarse: canonical(raw.coarse),
        mid: canonical(raw.mid),
        fine: canonical(raw.fine),
    };
    debug!(
        coarse = dictionary.coarse.len(),
        mid = dictionary.mid.len(),
        fine = dictionary.fine.len(),
        "Parsed dictionary tiers"
    );
    Ok(dictionary)
}

fn read_input(what: &'static str, path: &Path) -> Result<String, ApiError> {
    if !path.is_file() {
        return Err(ApiError::MissingInput {
            what,
            path: path.to_path_buf(),
        });
    }
    fs::read_to_string(path).map_err(|e| ApiError::StorageError(e.into()))
}
