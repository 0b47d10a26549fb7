#![forbid(unsafe_code)]

//! Widget-kind plugins for Tessera.
//!
//! A plugin describes one kind of widget: its palette metadata, a
//! declarative [`schema::ConfigurationSchema`] a configuration panel
//! renders from, and a [`builtin::WidgetBehavior`] strategy supplying
//! default configuration, default span, and validation. The
//! [`registry::PluginRegistry`] is the process catalog of kinds: built-ins
//! are registered at construction and third parties add or remove kinds at
//! runtime through the same API.

pub mod builtin;
pub mod registry;
pub mod schema;
pub mod validate;

pub use builtin::{BuiltinKind, WidgetBehavior};
pub use tessera_core::widget::WidgetCategory;
pub use registry::{
    ComponentPlugin, PluginRegistry, RegistryError, RegistryEvent, RegistryWatcher,
};
pub use schema::{
    ConditionOperator, ConfigurationField, ConfigurationSchema, FieldConstraints, FieldType,
    SchemaSection, SelectOption, VisibilityCondition,
};
pub use validate::validate_against_schema;
