use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::builder::BuilderDocument;
use crate::registry::{PUCK_DATA_KEY, VISUAL_EDITOR_FLAG_KEY};

/// Marker written into `metadata.createdWith` for components produced by the
/// visual editor. Components carrying it are already in clean builder shape.
pub const CREATED_WITH_VISUAL_EDITOR: &str = "VisualEditor";

/// Grid placement of a component in the persisted representation.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ComponentPosition {
    pub row: u32,
    pub column: u32,
    pub width: u32,
    pub height: u32,
}

/// Provenance tag on a persisted component.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ComponentMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_with: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub migrated_from: Option<String>,
}

/// One item placed on a layout, as persisted by the storage layer.
///
/// `properties` and `styling` are open maps whose semantics depend on
/// `component_type`. Key order is preserved across round trips.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LayoutComponent {
    pub component_type: String,
    #[serde(default)]
    pub position: ComponentPosition,
    #[serde(default)]
    pub properties: IndexMap<String, Value>,
    #[serde(default)]
    pub styling: IndexMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ComponentMetadata>,
}

impl LayoutComponent {
    pub fn is_visual_editor_native(&self) -> bool {
        self.metadata
            .as_ref()
            .and_then(|m| m.created_with.as_deref())
            == Some(CREATED_WITH_VISUAL_EDITOR)
    }

    /// True when the component carries the legacy embedded builder blob pair.
    pub fn has_embedded_builder_blob(&self) -> bool {
        self.properties.get(VISUAL_EDITOR_FLAG_KEY) == Some(&Value::Bool(true))
            && self.properties.contains_key(PUCK_DATA_KEY)
    }
}

/// A persisted layout document. Component order is display order and is
/// preserved by every routine in this crate.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub model_id: String,
    #[serde(default)]
    pub components: Vec<LayoutComponent>,
    #[serde(default)]
    pub layout_type: String,
    #[serde(default)]
    pub target_entities: Vec<String>,
    #[serde(default)]
    pub responsive: ResponsiveConfig,
    /// Previously cached builder document. When present it is authoritative
    /// and inbound migration returns it verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub builder_data: Option<BuilderDocument>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ResponsiveConfig {
    #[serde(default)]
    pub breakpoints: Vec<Breakpoint>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Breakpoint {
    pub name: String,
    pub min_width: u32,
    pub columns: u32,
}

impl Default for ResponsiveConfig {
    fn default() -> Self {
        Self {
            breakpoints: vec![
                Breakpoint {
                    name: "mobile".to_string(),
                    min_width: 0,
                    columns: 1,
                },
                Breakpoint {
                    name: "tablet".to_string(),
                    min_width: 768,
                    columns: 2,
                },
                Breakpoint {
                    name: "desktop".to_string(),
                    min_width: 1024,
                    columns: 3,
                },
            ],
        }
    }
}

/// An entity known to the model, used to resolve a component's `entityType`
/// name to a stable id. Supplied read-only by the entity directory.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EntityRef {
    pub id: String,
    pub name: String,
    pub display_name: String,
}

/// The partial layout document produced by outbound conversion and handed to
/// the persistence layer. `id`/`model_id` are omitted from the wire form
/// when absent.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct LayoutUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    pub name: String,
    pub components: Vec<LayoutComponent>,
    pub layout_type: String,
    pub target_entities: Vec<String>,
    pub responsive: ResponsiveConfig,
}
