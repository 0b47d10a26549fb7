#![forbid(unsafe_code)]

//! The widget-kind plugin registry.
//!
//! One registry instance is constructed at application start and handed to
//! every consumer; there is no hidden global, so tests build isolated
//! registries with [`PluginRegistry::empty`]. Built-in kinds are registered
//! by [`PluginRegistry::with_builtins`]; third parties add and remove kinds
//! at runtime through the same [`register`](PluginRegistry::register) /
//! [`unregister`](PluginRegistry::unregister) API.
//!
//! # Invariants
//!
//! 1. Plugin ids are unique; registering a duplicate is a caller-visible
//!    error and leaves the registry unchanged.
//! 2. Every successful mutation bumps the revision counter and broadcasts a
//!    [`RegistryEvent`] to all live watchers, in mutation order.
//! 3. `validate_configuration` is total: an unknown plugin id produces a
//!    single registry-level error diagnostic, never a panic or `Err`.

use crate::builtin::{BuiltinKind, WidgetBehavior};
use crate::schema::ConfigurationSchema;
use ahash::AHashMap;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::sync::mpsc;
use tessera_core::catalog::EntityCatalog;
use tessera_core::diagnostic::Diagnostic;
use tessera_core::geometry::GridSpan;
use tessera_core::widget::WidgetCategory;

/// One registered widget kind.
#[derive(Clone)]
pub struct ComponentPlugin {
    /// Unique id within the registry.
    pub id: String,
    /// Kind name stamped onto widget instances.
    pub kind: String,
    /// Palette label.
    pub label: String,
    /// Palette description.
    pub description: String,
    /// Palette icon name.
    pub icon: String,
    /// Palette category.
    pub category: WidgetCategory,
    /// Declarative configuration schema.
    pub schema: ConfigurationSchema,
    behavior: Arc<dyn WidgetBehavior>,
}

impl ComponentPlugin {
    /// Create a plugin with empty description and icon.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        kind: impl Into<String>,
        label: impl Into<String>,
        category: WidgetCategory,
        schema: ConfigurationSchema,
        behavior: Arc<dyn WidgetBehavior>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            label: label.into(),
            description: String::new(),
            icon: String::new(),
            category,
            schema,
            behavior,
        }
    }

    /// Set the palette description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the palette icon.
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// Configuration a freshly placed widget of this kind starts with.
    #[must_use]
    pub fn default_configuration(&self) -> Value {
        self.behavior.default_configuration()
    }

    /// Grid rectangle a freshly placed widget of this kind occupies.
    #[must_use]
    pub fn default_span(&self) -> GridSpan {
        self.behavior.default_span()
    }

    /// Validate a configuration for this kind.
    #[must_use]
    pub fn validate(&self, config: &Value, catalog: &EntityCatalog) -> Vec<Diagnostic> {
        self.behavior.validate(config, catalog)
    }
}

impl fmt::Debug for ComponentPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentPlugin")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("label", &self.label)
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

/// Errors from plugin registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A required plugin field was empty.
    MissingField { field: &'static str },
    /// The id is already registered.
    DuplicateId { id: String },
    /// The configuration schema has no sections.
    EmptySchema { id: String },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField { field } => {
                write!(f, "plugin is missing required field `{field}`")
            }
            Self::DuplicateId { id } => {
                write!(f, "plugin id `{id}` is already registered")
            }
            Self::EmptySchema { id } => {
                write!(f, "plugin `{id}` has a configuration schema with no sections")
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// Snapshot broadcast to watchers after every registry mutation.
#[derive(Debug, Clone)]
pub struct RegistryEvent {
    /// Monotone mutation counter.
    pub revision: u64,
    /// The full plugin list after the mutation, in registration order.
    pub plugins: Vec<ComponentPlugin>,
}

impl RegistryEvent {
    /// Ids of the plugins in this snapshot, in registration order.
    #[must_use]
    pub fn plugin_ids(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.id.as_str()).collect()
    }

    /// Whether the snapshot contains a plugin with this id.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.plugins.iter().any(|p| p.id == id)
    }
}

/// Subscription handle for registry change notifications.
///
/// Dropping the watcher unsubscribes it; the registry prunes the dead
/// channel on its next broadcast.
#[derive(Debug)]
pub struct RegistryWatcher {
    receiver: mpsc::Receiver<RegistryEvent>,
}

impl RegistryWatcher {
    /// Next pending event, if any.
    pub fn poll(&self) -> Option<RegistryEvent> {
        self.receiver.try_recv().ok()
    }

    /// All pending events, oldest first.
    pub fn drain(&self) -> Vec<RegistryEvent> {
        self.receiver.try_iter().collect()
    }

    /// The most recent pending event, discarding older ones.
    pub fn latest(&self) -> Option<RegistryEvent> {
        self.drain().pop()
    }
}

/// Catalog of widget kinds, keyed by plugin id.
pub struct PluginRegistry {
    plugins: Vec<ComponentPlugin>,
    index: AHashMap<String, usize>,
    watchers: Vec<mpsc::Sender<RegistryEvent>>,
    revision: u64,
}

impl PluginRegistry {
    /// A registry with no plugins, for isolated consumers and tests.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            plugins: Vec::new(),
            index: AHashMap::new(),
            watchers: Vec::new(),
            revision: 0,
        }
    }

    /// The standard registry: every [`BuiltinKind`] registered.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        for kind in BuiltinKind::ALL {
            let plugin = ComponentPlugin::new(
                kind.kind_name(),
                kind.kind_name(),
                kind.label(),
                kind.category(),
                kind.schema(),
                Arc::new(kind),
            )
            .with_description(kind.description())
            .with_icon(kind.icon());
            // Built-in ids are distinct string literals; registration of a
            // fresh registry cannot fail.
            let _ = registry.register(plugin);
        }
        registry
    }

    /// Register a plugin.
    ///
    /// Fails when `id`, `kind`, or `label` is empty, the schema has no
    /// sections, or the id is already taken. On success all watchers are
    /// notified synchronously.
    pub fn register(&mut self, plugin: ComponentPlugin) -> Result<(), RegistryError> {
        if plugin.id.is_empty() {
            return Err(RegistryError::MissingField { field: "id" });
        }
        if plugin.kind.is_empty() {
            return Err(RegistryError::MissingField { field: "kind" });
        }
        if plugin.label.is_empty() {
            return Err(RegistryError::MissingField { field: "label" });
        }
        if plugin.schema.sections.is_empty() {
            return Err(RegistryError::EmptySchema {
                id: plugin.id.clone(),
            });
        }
        if self.index.contains_key(&plugin.id) {
            return Err(RegistryError::DuplicateId {
                id: plugin.id.clone(),
            });
        }
        tracing::debug!(plugin_id = %plugin.id, kind = %plugin.kind, "registering plugin");
        self.index.insert(plugin.id.clone(), self.plugins.len());
        self.plugins.push(plugin);
        self.notify();
        Ok(())
    }

    /// Remove a plugin by id.
    ///
    /// Returns `false` (and stays silent) when the id is unknown; notifies
    /// watchers on success.
    pub fn unregister(&mut self, id: &str) -> bool {
        let Some(position) = self.index.remove(id) else {
            return false;
        };
        tracing::debug!(plugin_id = %id, "unregistering plugin");
        self.plugins.remove(position);
        self.reindex();
        self.notify();
        true
    }

    /// Look up a plugin by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ComponentPlugin> {
        self.index.get(id).map(|&i| &self.plugins[i])
    }

    /// Look up the first plugin registered for a kind name.
    ///
    /// Widget instances carry the kind, not the plugin id; the two match
    /// for built-ins but third-party plugins may register a namespaced id.
    #[must_use]
    pub fn get_by_kind(&self, kind: &str) -> Option<&ComponentPlugin> {
        self.plugins.iter().find(|p| p.kind == kind)
    }

    /// All plugins, in registration order.
    #[must_use]
    pub fn plugins(&self) -> &[ComponentPlugin] {
        &self.plugins
    }

    /// Plugins in the given palette category, in registration order.
    #[must_use]
    pub fn by_category(&self, category: WidgetCategory) -> Vec<&ComponentPlugin> {
        self.plugins
            .iter()
            .filter(|p| p.category == category)
            .collect()
    }

    /// Case-insensitive substring search over label, description, and kind
    /// name.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&ComponentPlugin> {
        let needle = query.to_lowercase();
        self.plugins
            .iter()
            .filter(|p| {
                p.label.to_lowercase().contains(&needle)
                    || p.description.to_lowercase().contains(&needle)
                    || p.kind.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Subscribe to change notifications.
    ///
    /// The watcher receives one [`RegistryEvent`] per subsequent mutation.
    /// Dropping it unsubscribes.
    pub fn subscribe(&mut self) -> RegistryWatcher {
        let (sender, receiver) = mpsc::channel();
        self.watchers.push(sender);
        RegistryWatcher { receiver }
    }

    /// Validate a configuration against the plugin with the given id.
    ///
    /// Unknown ids yield exactly one registry-level error diagnostic.
    #[must_use]
    pub fn validate_configuration(
        &self,
        id: &str,
        config: &Value,
        catalog: &EntityCatalog,
    ) -> Vec<Diagnostic> {
        match self.get(id) {
            Some(plugin) => plugin.validate(config, catalog),
            None => vec![Diagnostic::error(
                "plugin",
                format!("unknown plugin id `{id}`"),
            )],
        }
    }

    /// Monotone mutation counter.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of registered plugins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Whether no plugins are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Whether a plugin with this id exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (position, plugin) in self.plugins.iter().enumerate() {
            self.index.insert(plugin.id.clone(), position);
        }
    }

    fn notify(&mut self) {
        self.revision += 1;
        let event = RegistryEvent {
            revision: self.revision,
            plugins: self.plugins.clone(),
        };
        let before = self.watchers.len();
        self.watchers.retain(|w| w.send(event.clone()).is_ok());
        let dropped = before - self.watchers.len();
        if dropped > 0 {
            tracing::trace!(dropped, "pruned dead registry watchers");
        }
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("plugins", &self.plugins.len())
            .field("watchers", &self.watchers.len())
            .field("revision", &self.revision)
            .finish()
    }
}
