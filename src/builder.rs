use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One visible component in the builder's working tree.
///
/// `props` always carries a synthetic `id` string assigned by this crate,
/// never supplied by the user's semantic data.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct BuilderComponent {
    #[serde(rename = "type", default)]
    pub component_type: String,
    #[serde(default)]
    pub props: IndexMap<String, Value>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct RootProps {
    #[serde(default)]
    pub title: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct BuilderRoot {
    #[serde(default)]
    pub props: RootProps,
}

/// The visual editor's working document: an ordered component list plus
/// document-level metadata. Deserialization is lenient so editor output with
/// missing pieces still decodes into an empty-but-usable document.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct BuilderDocument {
    #[serde(default)]
    pub content: Vec<BuilderComponent>,
    #[serde(default)]
    pub root: BuilderRoot,
}

impl BuilderDocument {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            content: Vec::new(),
            root: BuilderRoot {
                props: RootProps {
                    title: title.into(),
                },
            },
        }
    }
}
