pub mod builder;
pub mod conversion;
pub mod diagnostics;
pub mod layout;
pub mod migration;
pub mod registry;
pub mod sanitize;
pub mod validation;
