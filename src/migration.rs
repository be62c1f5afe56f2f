//! Inbound migration from the persisted layout representation to the
//! builder-native document tree.
//!
//! The precedence between migration strategies is an explicit ordered rule
//! table evaluated once per call, first match wins:
//!
//! ```text
//! cached builderData > native-tagged components > embedded blobs > legacy transform
//! ```
//!
//! `needs_migration` keys off the same predicates so the classification and
//! the migration itself cannot drift apart.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::builder::{BuilderComponent, BuilderDocument, BuilderRoot, RootProps};
use crate::diagnostics::Diagnostic;
use crate::layout::{Layout, LayoutComponent};
use crate::registry::{self, ComponentKind, ENTITY_TYPE_KEY, PUCK_DATA_KEY};

/// Which rule of the migration chain produced the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationSource {
    CachedBuilderData,
    NativeComponents,
    EmbeddedBlobs,
    LegacyTransform,
}

#[derive(Debug, Clone)]
pub struct MigrationReport {
    pub source: MigrationSource,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Error)]
enum BlobFault {
    #[error("embedded builder data is not a JSON string")]
    NotAString,
    #[error("embedded builder data failed to parse: {0}")]
    Parse(#[from] serde_json::Error),
}

struct MigrationRule {
    name: &'static str,
    source: MigrationSource,
    applies: fn(&Layout) -> bool,
    run: fn(&Layout, &mut Vec<Diagnostic>) -> BuilderDocument,
}

const MIGRATION_RULES: [MigrationRule; 3] = [
    MigrationRule {
        name: "cached-builder-data",
        source: MigrationSource::CachedBuilderData,
        applies: has_builder_data,
        run: run_cached,
    },
    MigrationRule {
        name: "native-components",
        source: MigrationSource::NativeComponents,
        applies: has_native_components,
        run: run_native,
    },
    MigrationRule {
        name: "embedded-blobs",
        source: MigrationSource::EmbeddedBlobs,
        applies: has_embedded_blobs,
        run: run_embedded_blobs,
    },
];

/// Convert a persisted layout into a builder document. Total: unparseable
/// embedded blobs are skipped with a warning diagnostic, unknown component
/// types degrade to labeled Text placeholders, and nothing is propagated as
/// an error.
pub fn migrate_layout(layout: &Layout) -> (BuilderDocument, MigrationReport) {
    let mut diagnostics = Vec::new();

    for rule in &MIGRATION_RULES {
        if (rule.applies)(layout) {
            debug!("Migrating layout '{}' via rule '{}'", layout.name, rule.name);
            let document = (rule.run)(layout, &mut diagnostics);
            return (
                document,
                MigrationReport {
                    source: rule.source,
                    diagnostics,
                },
            );
        }
    }

    debug!(
        "Migrating layout '{}' via legacy component transform",
        layout.name
    );
    let document = run_legacy_transform(layout, &mut diagnostics);
    (
        document,
        MigrationReport {
            source: MigrationSource::LegacyTransform,
            diagnostics,
        },
    )
}

/// True when the layout still holds data only the legacy transform can
/// convert. Used by callers to decide whether to surface a migration notice.
pub fn needs_migration(layout: &Layout) -> bool {
    if has_builder_data(layout) || has_native_components(layout) || has_embedded_blobs(layout) {
        return false;
    }
    !layout.components.is_empty()
}

/// Advisory, per-component messages about defaults the legacy transform will
/// apply. Purely informational; never blocks migration.
pub fn migration_warnings(layout: &Layout) -> Vec<String> {
    let mut warnings = Vec::new();
    for (index, component) in layout.components.iter().enumerate() {
        match ComponentKind::parse(&component.component_type) {
            Some(ComponentKind::DataGrid) => {
                if !component.properties.contains_key(ENTITY_TYPE_KEY) {
                    warnings.push(format!(
                        "DataGrid component {} has no entityType and will default to 'customer'",
                        index
                    ));
                }
            }
            Some(ComponentKind::TorqueForm) => {
                let fields = component.properties.get("fields").and_then(Value::as_array);
                if fields.map_or(true, |f| f.is_empty()) {
                    warnings.push(format!(
                        "TorqueForm component {} has no fields and will get a default name field",
                        index
                    ));
                }
            }
            Some(ComponentKind::TorqueButton) => {
                if !component.properties.contains_key("text") {
                    warnings.push(format!(
                        "TorqueButton component {} has no text and will default to 'Button'",
                        index
                    ));
                }
            }
            Some(_) => {}
            None => warnings.push(format!(
                "Component {} has unknown type '{}' and will be converted to Text",
                index, component.component_type
            )),
        }
    }
    warnings
}

fn has_builder_data(layout: &Layout) -> bool {
    layout.builder_data.is_some()
}

fn has_native_components(layout: &Layout) -> bool {
    layout
        .components
        .iter()
        .any(LayoutComponent::is_visual_editor_native)
}

fn has_embedded_blobs(layout: &Layout) -> bool {
    layout
        .components
        .iter()
        .any(LayoutComponent::has_embedded_builder_blob)
}

fn run_cached(layout: &Layout, _diagnostics: &mut Vec<Diagnostic>) -> BuilderDocument {
    // the predicate guarantees Some; the clone is the verbatim cache hit
    layout.builder_data.clone().unwrap_or_default()
}

fn run_native(layout: &Layout, _diagnostics: &mut Vec<Diagnostic>) -> BuilderDocument {
    let content = layout
        .components
        .iter()
        .filter(|c| c.is_visual_editor_native())
        .enumerate()
        .map(|(index, component)| {
            let mut props = component.properties.clone();
            props.insert(
                "id".to_string(),
                Value::String(format!("component-{}", index)),
            );
            BuilderComponent {
                component_type: component.component_type.clone(),
                props,
            }
        })
        .collect();
    wrap(content, &layout.name, "Layout")
}

fn run_embedded_blobs(layout: &Layout, diagnostics: &mut Vec<Diagnostic>) -> BuilderDocument {
    let mut content = Vec::new();
    for (index, component) in layout.components.iter().enumerate() {
        if !component.has_embedded_builder_blob() {
            continue;
        }
        match decode_embedded_blob(component) {
            Ok(entry) => content.push(entry),
            Err(fault) => {
                warn!(
                    "Skipping component {} with unreadable builder blob: {}",
                    index, fault
                );
                diagnostics.push(Diagnostic::warning_at(
                    index,
                    format!("Skipped component {}: {}", index, fault),
                ));
            }
        }
    }
    wrap(content, &layout.name, "Layout")
}

fn decode_embedded_blob(component: &LayoutComponent) -> Result<BuilderComponent, BlobFault> {
    let raw = component
        .properties
        .get(PUCK_DATA_KEY)
        .and_then(Value::as_str)
        .ok_or(BlobFault::NotAString)?;
    Ok(serde_json::from_str(raw)?)
}

fn run_legacy_transform(layout: &Layout, diagnostics: &mut Vec<Diagnostic>) -> BuilderDocument {
    let content = layout
        .components
        .iter()
        .enumerate()
        .map(|(index, component)| transform_legacy_component(index, component, diagnostics))
        .collect();
    wrap(content, &layout.name, "Migrated Layout")
}

fn transform_legacy_component(
    index: usize,
    component: &LayoutComponent,
    diagnostics: &mut Vec<Diagnostic>,
) -> BuilderComponent {
    let (component_type, mut props) = match ComponentKind::parse(&component.component_type) {
        Some(kind) => {
            let mut props = kind.default_props(&component.position);
            // existing values win over synthesized defaults
            for (key, value) in &component.properties {
                props.insert(key.clone(), value.clone());
            }
            if kind == ComponentKind::Text && !component.properties.contains_key("content") {
                if let Some(text) = component.properties.get("text") {
                    props.insert("content".to_string(), text.clone());
                }
            }
            (kind.tag().to_string(), props)
        }
        None => {
            warn!(
                "Component {} has unknown type '{}', degrading to Text placeholder",
                index, component.component_type
            );
            diagnostics.push(Diagnostic::warning_at(
                index,
                format!(
                    "Unknown component type '{}' was converted to a Text placeholder",
                    component.component_type
                ),
            ));
            (
                ComponentKind::Text.tag().to_string(),
                registry::unknown_placeholder_props(&component.component_type),
            )
        }
    };

    props.insert(
        "id".to_string(),
        Value::String(format!("migrated-{}", index)),
    );
    BuilderComponent {
        component_type,
        props,
    }
}

fn wrap(content: Vec<BuilderComponent>, name: &str, fallback_title: &str) -> BuilderDocument {
    let title = if name.is_empty() { fallback_title } else { name };
    BuilderDocument {
        content,
        root: BuilderRoot {
            props: RootProps {
                title: title.to_string(),
            },
        },
    }
}
