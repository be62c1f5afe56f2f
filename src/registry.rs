//! Component type registry
//!
//! The fixed enumeration of recognized component kinds together with their
//! default property templates. Inbound migration and outbound conversion
//! both read from this module so the two directions cannot diverge.

use indexmap::IndexMap;
use serde_json::{json, Value};

use crate::layout::ComponentPosition;

/// Builder-internal prop keys that must never reach persisted `properties`.
pub const BUILDER_INTERNAL_KEYS: [&str; 3] = ["id", "editableProps", "droppableProps"];

/// Legacy embedded-blob keys from the first visual-editor integration.
pub const PUCK_DATA_KEY: &str = "_puckData";
pub const VISUAL_EDITOR_FLAG_KEY: &str = "_visualEditor";
pub const LEGACY_BLOB_KEYS: [&str; 2] = [PUCK_DATA_KEY, VISUAL_EDITOR_FLAG_KEY];

/// Prop key naming the entity a component is bound to.
pub const ENTITY_TYPE_KEY: &str = "entityType";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    DataGrid,
    TorqueForm,
    TorqueButton,
    Text,
    Container,
}

pub const KNOWN_KINDS: [ComponentKind; 5] = [
    ComponentKind::DataGrid,
    ComponentKind::TorqueForm,
    ComponentKind::TorqueButton,
    ComponentKind::Text,
    ComponentKind::Container,
];

impl ComponentKind {
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "DataGrid" => Some(Self::DataGrid),
            "TorqueForm" => Some(Self::TorqueForm),
            "TorqueButton" => Some(Self::TorqueButton),
            "Text" => Some(Self::Text),
            "Container" => Some(Self::Container),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::DataGrid => "DataGrid",
            Self::TorqueForm => "TorqueForm",
            Self::TorqueButton => "TorqueButton",
            Self::Text => "Text",
            Self::Container => "Container",
        }
    }

    /// Height of the synthesized export position, in grid rows.
    pub fn export_height(self) -> u32 {
        match self {
            Self::DataGrid => 6,
            Self::TorqueForm => 8,
            _ => 2,
        }
    }

    /// Default property template applied when migrating a legacy component.
    /// Existing property values always win over these defaults.
    ///
    /// The specific values are UI convenience defaults carried as
    /// configuration data; nothing outside this module depends on their
    /// exact content.
    pub fn default_props(self, position: &ComponentPosition) -> IndexMap<String, Value> {
        let template = match self {
            Self::DataGrid => json!({
                "entityType": "customer",
                "columns": [
                    {"field": "id", "header": "ID", "sortable": true},
                    {"field": "name", "header": "Name", "sortable": true},
                ],
                "showPagination": true,
                "pageSize": 10,
                "showFilters": true,
                "showSearch": true,
                "height": format!("{}px", position.height * 50),
            }),
            Self::TorqueForm => json!({
                "entityType": "customer",
                "formTitle": "New Form",
                "fields": [
                    {"name": "name", "label": "Name", "type": "text", "required": true},
                ],
                "submitButtonText": "Submit",
                "cancelButtonText": "Cancel",
                "layout": "vertical",
                "spacing": "medium",
            }),
            Self::TorqueButton => json!({
                "label": "Button",
                "variant": "primary",
                "size": "medium",
                "color": "primary",
                "disabled": false,
                "fullWidth": false,
                "action": "submit",
            }),
            Self::Text => json!({
                "content": "Text content",
                "variant": "body1",
                "alignment": "left",
                "weight": "normal",
            }),
            Self::Container => json!({
                "padding": "16px",
                "backgroundColor": "transparent",
                "borderRadius": "4px",
                "minHeight": "100px",
            }),
        };
        object_to_map(template)
    }
}

/// Export height for a raw component tag; unknown tags get the generic
/// height.
pub fn export_height_for_tag(tag: &str) -> u32 {
    ComponentKind::parse(tag).map_or(2, ComponentKind::export_height)
}

/// Placeholder props for component tags the registry does not know. The
/// original properties are deliberately discarded so no component type is
/// ever silently dropped.
pub fn unknown_placeholder_props(tag: &str) -> IndexMap<String, Value> {
    object_to_map(json!({
        "content": format!("Legacy {} component - please reconfigure", tag),
        "variant": "body1",
        "alignment": "left",
        "weight": "normal",
        "color": "#e65100",
    }))
}

fn object_to_map(value: Value) -> IndexMap<String, Value> {
    match value {
        Value::Object(map) => map.into_iter().collect(),
        _ => IndexMap::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip_through_parse() {
        for kind in KNOWN_KINDS {
            assert_eq!(ComponentKind::parse(kind.tag()), Some(kind));
        }
        assert_eq!(ComponentKind::parse("LegacyChart"), None);
    }

    #[test]
    fn export_heights_match_export_contract() {
        assert_eq!(export_height_for_tag("DataGrid"), 6);
        assert_eq!(export_height_for_tag("TorqueForm"), 8);
        assert_eq!(export_height_for_tag("Text"), 2);
        assert_eq!(export_height_for_tag("Container"), 2);
        assert_eq!(export_height_for_tag("SomethingElse"), 2);
    }

    #[test]
    fn data_grid_height_scales_with_position() {
        let position = ComponentPosition {
            row: 0,
            column: 0,
            width: 12,
            height: 4,
        };
        let props = ComponentKind::DataGrid.default_props(&position);
        assert_eq!(props["height"], "200px");
        assert_eq!(props["entityType"], "customer");
        assert_eq!(props["pageSize"], 10);
        assert_eq!(props["columns"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn form_defaults_include_a_required_name_field() {
        let props = ComponentKind::TorqueForm.default_props(&ComponentPosition::default());
        let fields = props["fields"].as_array().unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0]["name"], "name");
        assert_eq!(fields[0]["required"], true);
        assert_eq!(props["submitButtonText"], "Submit");
    }

    #[test]
    fn unknown_placeholder_names_the_original_tag() {
        let props = unknown_placeholder_props("LegacyChart");
        assert_eq!(
            props["content"],
            "Legacy LegacyChart component - please reconfigure"
        );
    }
}
