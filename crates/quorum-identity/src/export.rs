//! Label export files
//!
//! An export file is a JSON array of `{address, name}` objects. Import is
//! strict: one bad entry rejects the file and reports its index.

use crate::errors::{IdentityError, IdentityResult};
use crate::record::LabelEntry;
use crate::storage::file_stem;
use chrono::NaiveDate;
use quorum_core::Address;
use serde_json::Value;

/// File name for an export: `<org>_<YYYY-MM-DD>.json`. The organization
/// part is reduced to a single path component.
pub fn export_file_name(org_label: &str, date: NaiveDate) -> String {
    format!("{}_{}.json", file_stem(org_label.trim()), date.format("%Y-%m-%d"))
}

/// Serialize entries for an export file. Exporting nothing is refused.
pub fn export_json(entries: &[LabelEntry]) -> IdentityResult<String> {
    if entries.is_empty() {
        return Err(IdentityError::EmptySelection);
    }
    serde_json::to_string_pretty(entries)
        .map_err(|e| IdentityError::storage(format!("Failed to encode labels: {e}")))
}

/// Parse the contents of an import file.
pub fn parse_label_entries(content: &str) -> IdentityResult<Vec<LabelEntry>> {
    let value: Value = serde_json::from_str(content)
        .map_err(|e| IdentityError::invalid_file(format!("not valid JSON ({e})")))?;
    let items = value
        .as_array()
        .ok_or_else(|| IdentityError::invalid_file("expected a JSON array"))?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| parse_entry(index, item))
        .collect()
}

fn parse_entry(index: usize, item: &Value) -> IdentityResult<LabelEntry> {
    let object = item
        .as_object()
        .ok_or_else(|| IdentityError::invalid_entry(index, "expected an object"))?;
    let address = object
        .get("address")
        .and_then(Value::as_str)
        .ok_or_else(|| IdentityError::invalid_entry(index, "missing \"address\""))?;
    let name = object
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| IdentityError::invalid_entry(index, "missing \"name\""))?;
    let address = Address::parse(address.trim())
        .map_err(|e| IdentityError::invalid_entry(index, e.to_string()))?;
    Ok(LabelEntry::new(address, name))
}
