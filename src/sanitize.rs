//! Pre-save cleanup of builder documents.
//!
//! Sanitization runs immediately before a save, so it fails open: if the
//! cleanup itself faults, the original document is returned untouched rather
//! than risking the user's in-progress layout.

use serde_json::{Map, Value};
use tracing::warn;

use crate::registry::{BUILDER_INTERNAL_KEYS, LEGACY_BLOB_KEYS};

const DEFAULT_TITLE: &str = "New Layout";

/// Produce a cleaned copy of a builder document: null content entries are
/// dropped, builder-internal and legacy blob keys are removed from every
/// entry's props, and the root title is forced non-empty.
pub fn sanitize_layout_data(data: &Value) -> Value {
    match try_sanitize(data) {
        Ok(clean) => clean,
        Err(err) => {
            warn!("Sanitization failed, keeping layout data unchanged: {}", err);
            data.clone()
        }
    }
}

fn try_sanitize(data: &Value) -> Result<Value, serde_json::Error> {
    // deep copy through a serialize/parse round trip
    let mut clean: Value = serde_json::from_str(&serde_json::to_string(data)?)?;

    if let Some(entries) = clean.get_mut("content").and_then(Value::as_array_mut) {
        entries.retain(|entry| !entry.is_null());
        for entry in entries.iter_mut() {
            if let Some(props) = entry.get_mut("props").and_then(Value::as_object_mut) {
                for key in BUILDER_INTERNAL_KEYS.iter().chain(LEGACY_BLOB_KEYS.iter()) {
                    props.shift_remove(*key);
                }
            }
        }
    }

    ensure_title(&mut clean);
    Ok(clean)
}

fn ensure_title(data: &mut Value) {
    let Some(document) = data.as_object_mut() else {
        return;
    };
    let root = document
        .entry("root")
        .or_insert_with(|| Value::Object(Map::new()));
    let Some(root) = root.as_object_mut() else {
        return;
    };
    let props = root
        .entry("props")
        .or_insert_with(|| Value::Object(Map::new()));
    let Some(props) = props.as_object_mut() else {
        return;
    };
    let missing = props
        .get("title")
        .and_then(Value::as_str)
        .map_or(true, str::is_empty);
    if missing {
        props.insert(
            "title".to_string(),
            Value::String(DEFAULT_TITLE.to_string()),
        );
    }
}
