//! Structured diagnostics returned alongside primary results, replacing the
//! console logging of earlier versions so callers and tests can assert on
//! warnings without capturing log output.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// Index into the component/content sequence the diagnostic refers to,
    /// when it concerns a single item.
    pub component_index: Option<usize>,
}

impl Diagnostic {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            component_index: None,
        }
    }

    pub fn warning_at(component_index: usize, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            component_index: Some(component_index),
        }
    }
}
