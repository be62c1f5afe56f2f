//! Outbound conversion from the builder-native document back to the
//! persisted layout representation.
//!
//! Positions are not preserved from the persisted original: the builder's
//! layout engine owns positioning, so the legacy grid fields are synthesized
//! as a single-column stack and treated as a derived export.

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::builder::BuilderDocument;
use crate::diagnostics::Diagnostic;
use crate::layout::{
    ComponentMetadata, ComponentPosition, EntityRef, Layout, LayoutComponent, LayoutUpdate,
    CREATED_WITH_VISUAL_EDITOR,
};
use crate::registry::{export_height_for_tag, BUILDER_INTERNAL_KEYS, ENTITY_TYPE_KEY};

/// Version stamp written into component metadata on every conversion.
pub const METADATA_VERSION: &str = "1.0";

#[derive(Debug, Clone, Default)]
pub struct ConversionReport {
    pub diagnostics: Vec<Diagnostic>,
}

/// Convert an edited builder document into a partial persisted layout.
/// Total over any well-typed input: malformed props simply propagate as
/// empty or defaulted fields.
///
/// `target_entities` is recomputed from scratch on every call by resolving
/// each distinct `entityType` prop against `entities` by exact name;
/// unresolved names are dropped with a warning since the caller may be
/// exporting before entities are fully loaded.
pub fn convert_builder_document(
    document: &BuilderDocument,
    layout_id: Option<&str>,
    model_id: Option<&str>,
    existing: Option<&Layout>,
    entities: &[EntityRef],
) -> (LayoutUpdate, ConversionReport) {
    let mut diagnostics = Vec::new();
    let mut entity_names: Vec<String> = Vec::new();
    let mut components = Vec::with_capacity(document.content.len());

    for (index, entry) in document.content.iter().enumerate() {
        if let Some(name) = entry
            .props
            .get(ENTITY_TYPE_KEY)
            .and_then(serde_json::Value::as_str)
        {
            if !entity_names.iter().any(|n| n == name) {
                entity_names.push(name.to_string());
            }
        }

        let mut properties = entry.props.clone();
        for key in BUILDER_INTERNAL_KEYS {
            properties.shift_remove(key);
        }

        components.push(LayoutComponent {
            component_type: entry.component_type.clone(),
            position: ComponentPosition {
                row: index as u32,
                column: 0,
                width: 12,
                height: export_height_for_tag(&entry.component_type),
            },
            properties,
            styling: IndexMap::new(),
            metadata: Some(ComponentMetadata {
                created_with: Some(CREATED_WITH_VISUAL_EDITOR.to_string()),
                version: Some(METADATA_VERSION.to_string()),
                migrated_from: None,
            }),
        });
    }

    let mut target_entities = Vec::new();
    for name in &entity_names {
        match entities.iter().find(|e| &e.name == name) {
            Some(entity) => {
                if !target_entities.contains(&entity.id) {
                    target_entities.push(entity.id.clone());
                }
            }
            None => {
                warn!("Entity '{}' referenced by layout was not found", name);
                diagnostics.push(Diagnostic::warning(format!(
                    "Entity '{}' was not found and was dropped from targetEntities",
                    name
                )));
            }
        }
    }

    let name = if !document.root.props.title.is_empty() {
        document.root.props.title.clone()
    } else if let Some(existing_name) = existing
        .map(|l| l.name.as_str())
        .filter(|n| !n.is_empty())
    {
        existing_name.to_string()
    } else {
        "New Layout".to_string()
    };

    let layout_type = existing
        .map(|l| l.layout_type.clone())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "Dashboard".to_string());
    let responsive = existing.map(|l| l.responsive.clone()).unwrap_or_default();

    let update = LayoutUpdate {
        id: layout_id.map(str::to_string),
        model_id: model_id.map(str::to_string),
        name,
        components,
        layout_type,
        target_entities,
        responsive,
    };
    debug!(
        "Converted builder document: {} components, {} target entities",
        update.components.len(),
        update.target_entities.len()
    );
    (update, ConversionReport { diagnostics })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::BuilderComponent;
    use serde_json::json;

    fn entry(component_type: &str, props: serde_json::Value) -> BuilderComponent {
        serde_json::from_value(json!({"type": component_type, "props": props})).unwrap()
    }

    fn entities() -> Vec<EntityRef> {
        vec![
            EntityRef {
                id: "ent-1".to_string(),
                name: "customer".to_string(),
                display_name: "Customer".to_string(),
            },
            EntityRef {
                id: "ent-2".to_string(),
                name: "order".to_string(),
                display_name: "Order".to_string(),
            },
        ]
    }

    #[test]
    fn builder_internal_keys_are_stripped_from_properties() {
        let document = BuilderDocument {
            content: vec![entry(
                "DataGrid",
                json!({
                    "entityType": "customer",
                    "id": "migrated-0",
                    "editableProps": {"x": 1},
                    "droppableProps": {},
                    "pageSize": 10,
                }),
            )],
            ..Default::default()
        };

        let (update, _) = convert_builder_document(&document, None, None, None, &entities());
        let properties = &update.components[0].properties;
        assert!(!properties.contains_key("id"));
        assert!(!properties.contains_key("editableProps"));
        assert!(!properties.contains_key("droppableProps"));
        assert_eq!(properties["entityType"], "customer");
        assert_eq!(properties["pageSize"], 10);
    }

    #[test]
    fn positions_are_synthesized_as_a_single_column_stack() {
        let document = BuilderDocument {
            content: vec![
                entry("DataGrid", json!({})),
                entry("TorqueForm", json!({})),
                entry("Text", json!({})),
            ],
            ..Default::default()
        };

        let (update, _) = convert_builder_document(&document, None, None, None, &[]);
        let positions: Vec<_> = update.components.iter().map(|c| &c.position).collect();
        assert_eq!(positions[0].row, 0);
        assert_eq!(positions[0].height, 6);
        assert_eq!(positions[1].row, 1);
        assert_eq!(positions[1].height, 8);
        assert_eq!(positions[2].row, 2);
        assert_eq!(positions[2].height, 2);
        assert!(positions.iter().all(|p| p.column == 0 && p.width == 12));
    }

    #[test]
    fn components_are_tagged_as_visual_editor_output() {
        let document = BuilderDocument {
            content: vec![entry("Text", json!({"content": "hi"}))],
            ..Default::default()
        };
        let (update, _) = convert_builder_document(&document, None, None, None, &[]);
        let metadata = update.components[0].metadata.as_ref().unwrap();
        assert_eq!(metadata.created_with.as_deref(), Some("VisualEditor"));
        assert_eq!(metadata.version.as_deref(), Some("1.0"));
        assert!(update.components[0].is_visual_editor_native());
    }

    #[test]
    fn target_entities_resolve_in_first_seen_order_and_dedupe() {
        let document = BuilderDocument {
            content: vec![
                entry("DataGrid", json!({"entityType": "order"})),
                entry("TorqueForm", json!({"entityType": "customer"})),
                entry("DataGrid", json!({"entityType": "order"})),
            ],
            ..Default::default()
        };

        let (update, report) = convert_builder_document(&document, None, None, None, &entities());
        assert_eq!(update.target_entities, vec!["ent-2", "ent-1"]);
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn unresolved_entities_are_dropped_with_a_warning() {
        let document = BuilderDocument {
            content: vec![entry("DataGrid", json!({"entityType": "invoice"}))],
            ..Default::default()
        };

        let (update, report) = convert_builder_document(&document, None, None, None, &entities());
        assert!(update.target_entities.is_empty());
        assert_eq!(report.diagnostics.len(), 1);
        assert!(report.diagnostics[0].message.contains("invoice"));
    }

    #[test]
    fn name_falls_back_to_existing_then_default() {
        let document = BuilderDocument::default();

        let (update, _) = convert_builder_document(&document, None, None, None, &[]);
        assert_eq!(update.name, "New Layout");
        assert_eq!(update.layout_type, "Dashboard");

        let existing = Layout {
            name: "Customer Dashboard".to_string(),
            layout_type: "Detail".to_string(),
            ..Default::default()
        };
        let (update, _) = convert_builder_document(&document, None, None, Some(&existing), &[]);
        assert_eq!(update.name, "Customer Dashboard");
        assert_eq!(update.layout_type, "Detail");

        let titled = BuilderDocument::titled("Edited Title");
        let (update, _) = convert_builder_document(&titled, None, None, Some(&existing), &[]);
        assert_eq!(update.name, "Edited Title");
    }

    #[test]
    fn identifiers_are_carried_through() {
        let document = BuilderDocument::default();
        let (update, _) =
            convert_builder_document(&document, Some("layout-9"), Some("model-3"), None, &[]);
        assert_eq!(update.id.as_deref(), Some("layout-9"));
        assert_eq!(update.model_id.as_deref(), Some("model-3"));
    }
}
