//! The process-wide domain registry and access functions.

use crate::container::Container;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// The name of a container in the process-wide registry.
///
/// Feature modules usually declare their domain once as a constant:
///
/// ```
/// use service_registry::Domain;
///
/// const PAYMENT: Domain = Domain::from_static("payment");
/// assert_eq!(PAYMENT.as_str(), "payment");
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Domain(Cow<'static, str>);

impl Domain {
  /// The root domain every other domain falls back to.
  pub const SHARED: Domain = Domain::from_static("___SHARED___");

  pub const fn from_static(name: &'static str) -> Self {
    Self(Cow::Borrowed(name))
  }

  pub fn new(name: impl Into<String>) -> Self {
    Self(Cow::Owned(name.into()))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn is_shared(&self) -> bool {
    *self == Self::SHARED
  }
}

impl From<&'static str> for Domain {
  fn from(name: &'static str) -> Self {
    Self::from_static(name)
  }
}

impl From<String> for Domain {
  fn from(name: String) -> Self {
    Self::new(name)
  }
}

impl fmt::Debug for Domain {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Domain({})", self.0)
  }
}

impl fmt::Display for Domain {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

// Containers are created on first access per domain and live until process
// exit; only `reset` ever removes them.
static CONTAINERS: Lazy<DashMap<Domain, Arc<Container>>> = Lazy::new(DashMap::new);

/// Provides the shared root container.
///
/// # Examples
///
/// ```
/// use service_registry::shared;
///
/// shared().add_instance(String::from("Hello from the root!"));
/// assert_eq!(*shared().resolve::<String>(), "Hello from the root!");
/// ```
pub fn shared() -> Arc<Container> {
  if let Some(root) = CONTAINERS.get(&Domain::SHARED) {
    return root.value().clone();
  }
  CONTAINERS
    .entry(Domain::SHARED)
    .or_insert_with(|| {
      debug!("creating shared root container");
      Arc::new(Container::new())
    })
    .value()
    .clone()
}

/// Provides the container of `domain`, creating it on first access.
///
/// Every domain other than [`Domain::SHARED`] is parented on the shared root,
/// so it can resolve everything registered there while keeping its own
/// registrations private. Concurrent first accesses agree on one container.
pub fn container(domain: &Domain) -> Arc<Container> {
  if domain.is_shared() {
    return shared();
  }
  if let Some(existing) = CONTAINERS.get(domain) {
    return existing.value().clone();
  }

  // Resolved up front: the map must not be re-entered while the entry below
  // holds its shard lock.
  let root = shared();
  CONTAINERS
    .entry(domain.clone())
    .or_insert_with(|| {
      debug!(%domain, "creating domain container");
      Arc::new(Container::with_parent(&root))
    })
    .value()
    .clone()
}

/// Removes every container from the process-wide registry.
///
/// This exists for tests that need a clean registry; production code never
/// tears the registry down. Containers still referenced elsewhere stay alive,
/// but the next access to their domain creates a fresh one.
pub fn reset() {
  let domains: Vec<Domain> = CONTAINERS.iter().map(|entry| entry.key().clone()).collect();
  let removed: Vec<_> = domains
    .iter()
    .filter_map(|domain| CONTAINERS.remove(domain))
    .collect();
  debug!(count = removed.len(), "reset container registry");
  // Dropped outside of the map's locks, cached instances may use the registry.
  drop(removed);
}
