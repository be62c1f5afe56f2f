//! Pre-save validation of builder documents.
//!
//! The error/warning split is fixed policy: errors block persistence,
//! warnings never do. Validation operates on raw JSON because the document
//! comes straight from the editor and may be structurally malformed.

use serde_json::Value;
use tracing::debug;

use crate::registry::ENTITY_TYPE_KEY;

pub const MAX_TITLE_LENGTH: usize = 100;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Validate a builder document before persistence. Total, never panics;
/// `is_valid` holds exactly when `errors` is empty.
pub fn validate_layout_data(data: Option<&Value>, model_id: Option<&str>) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if model_id.map_or(true, str::is_empty) {
        errors.push("Model ID is required".to_string());
    }

    let Some(data) = data else {
        errors.push("Layout data is missing".to_string());
        return finish(errors, warnings);
    };

    match data.pointer("/root/props/title").and_then(Value::as_str) {
        Some(title) if title.chars().count() > MAX_TITLE_LENGTH => {
            errors.push(format!(
                "Layout title must be {} characters or fewer",
                MAX_TITLE_LENGTH
            ));
        }
        Some(title) if !title.is_empty() => {}
        _ => warnings.push("Layout title is empty and will default to 'New Layout'".to_string()),
    }

    match data.get("content") {
        Some(Value::Array(entries)) => {
            for (index, entry) in entries.iter().enumerate() {
                validate_entry(index, entry, &mut errors, &mut warnings);
            }
        }
        _ => warnings.push("Layout has no content list".to_string()),
    }

    // circular structures cannot occur in a parsed Value, but a failure here
    // must surface as an error entry rather than a panic
    if let Err(err) = round_trip_check(data) {
        errors.push(format!("Layout data is not serializable: {}", err));
    }

    finish(errors, warnings)
}

fn round_trip_check(data: &Value) -> Result<(), serde_json::Error> {
    let encoded = serde_json::to_string(data)?;
    serde_json::from_str::<Value>(&encoded)?;
    Ok(())
}

fn validate_entry(index: usize, entry: &Value, errors: &mut Vec<String>, warnings: &mut Vec<String>) {
    let Some(component_type) = entry.get("type").and_then(Value::as_str) else {
        errors.push(format!("Component at index {} is missing a type", index));
        return;
    };

    let Some(props) = entry.get("props").and_then(Value::as_object) else {
        warnings.push(format!(
            "Component '{}' at index {} has no props",
            component_type, index
        ));
        return;
    };

    match component_type {
        "DataGrid" => {
            if !props.contains_key(ENTITY_TYPE_KEY) {
                warnings.push(format!(
                    "DataGrid at index {} has no entityType configured",
                    index
                ));
            }
        }
        "TorqueForm" => {
            if !props.contains_key(ENTITY_TYPE_KEY) {
                warnings.push(format!(
                    "TorqueForm at index {} has no entityType configured",
                    index
                ));
            }
            let fields = props.get("fields").and_then(Value::as_array);
            if fields.map_or(true, |f| f.is_empty()) {
                warnings.push(format!("TorqueForm at index {} has no fields", index));
            }
        }
        "Text" => {
            if !props.contains_key("content") && !props.contains_key("text") {
                warnings.push(format!("Text component at index {} has no content", index));
            }
        }
        _ => {}
    }
}

fn finish(errors: Vec<String>, warnings: Vec<String>) -> ValidationResult {
    debug!(
        "Validated layout data: {} errors, {} warnings",
        errors.len(),
        warnings.len()
    );
    ValidationResult {
        is_valid: errors.is_empty(),
        errors,
        warnings,
    }
}
