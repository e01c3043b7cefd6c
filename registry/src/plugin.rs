//! Startup aggregation of per-module registrations.

use crate::container::Container;
use crate::global;
use std::fmt;
use tracing::{debug, warn};

/// A module that knows how to register its own services.
///
/// Plugins are installed into a [`PluginIntegrator`] and run once at
/// startup. A plugin that needs services from another module should resolve
/// them inside its factories, not while registering, so that plugins can run
/// in any order.
pub trait ServicePlugin {
  /// Identifies the plugin for duplicate detection. Defaults to its type name.
  fn identifier(&self) -> String {
    std::any::type_name::<Self>().to_owned()
  }

  fn register_all_services(&self, into: &Container);
}

/// Collects plugins and runs their registrations in installation order.
///
/// An integrator is itself a plugin, so integrators can be nested.
pub struct PluginIntegrator {
  identifier: String,
  plugins: Vec<Box<dyn ServicePlugin + Send + Sync>>,
}

impl PluginIntegrator {
  pub fn new(identifier: impl Into<String>) -> Self {
    Self {
      identifier: identifier.into(),
      plugins: Vec::new(),
    }
  }

  /// Adds a plugin. A plugin whose identifier is already installed is
  /// skipped with a warning.
  pub fn install(mut self, plugin: impl ServicePlugin + Send + Sync + 'static) -> Self {
    let id = plugin.identifier();
    if self.plugins.iter().any(|installed| installed.identifier() == id) {
      warn!(
        integrator = %self.identifier,
        plugin = %id,
        "plugin was already installed, skipping it"
      );
      return self;
    }
    self.plugins.push(Box::new(plugin));
    self
  }

  pub fn len(&self) -> usize {
    self.plugins.len()
  }

  pub fn is_empty(&self) -> bool {
    self.plugins.is_empty()
  }

  /// Runs every plugin against the shared root container.
  pub fn register_all_services_globally(&self) {
    self.register_all_services(&global::shared());
  }
}

impl ServicePlugin for PluginIntegrator {
  fn identifier(&self) -> String {
    self.identifier.clone()
  }

  fn register_all_services(&self, into: &Container) {
    for plugin in &self.plugins {
      debug!(integrator = %self.identifier, plugin = %plugin.identifier(), "registering plugin services");
      plugin.register_all_services(into);
    }
  }
}

impl fmt::Debug for PluginIntegrator {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let plugins: Vec<String> = self.plugins.iter().map(|p| p.identifier()).collect();
    f.debug_struct("PluginIntegrator")
      .field("identifier", &self.identifier)
      .field("plugins", &plugins)
      .finish()
  }
}
