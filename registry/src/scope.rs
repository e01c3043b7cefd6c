//! Instance scoping: what a registration does with the values its factory
//! produces.

use crate::container::Container;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tracing::debug;

/// The caching policy of a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scope {
  /// Every resolution runs the factory and returns a fresh instance.
  #[default]
  Transient,
  /// One instance is handed out for as long as something outside the
  /// container still holds it. The container only keeps a weak reference,
  /// so once every `Arc` is dropped the next resolution builds a new one.
  Shared,
  /// The first instance is kept by the container and returned by every later
  /// resolution, until the registration itself is replaced or dropped.
  Cached,
}

pub(crate) type Factory<T> = Box<dyn Fn(&Container) -> Option<Arc<T>> + Send + Sync>;

enum Slot<T: ?Sized> {
  Vacant,
  Weak(Weak<T>),
  Strong(Arc<T>),
}

/// A factory together with its scope and single-slot instance cache.
///
/// The slot has its own lock, separate from the owning container's table
/// lock. The factory runs while that lock is held, so concurrent cache misses
/// on one entry build exactly one instance, and entries never block each other.
pub(crate) struct ScopedEntry<T: ?Sized> {
  scope: Scope,
  factory: Factory<T>,
  slot: Mutex<Slot<T>>,
}

impl<T: ?Sized + Send + Sync + 'static> ScopedEntry<T> {
  pub(crate) fn new(scope: Scope, factory: Factory<T>) -> Self {
    Self {
      scope,
      factory,
      slot: Mutex::new(Slot::Vacant),
    }
  }

  /// A `Cached` entry whose slot is already filled.
  pub(crate) fn with_instance(instance: Arc<T>) -> Self {
    Self {
      scope: Scope::Cached,
      factory: Box::new(|_: &Container| -> Option<Arc<T>> { None }),
      slot: Mutex::new(Slot::Strong(instance)),
    }
  }

  pub(crate) fn scope(&self) -> Scope {
    self.scope
  }

  /// Produces an instance according to the entry's scope, running the
  /// factory against `resolver` when nothing usable is cached.
  pub(crate) fn make_service(&self, resolver: &Container) -> Option<Arc<T>> {
    match self.scope {
      Scope::Transient => (self.factory)(resolver),
      Scope::Shared => {
        let mut slot = self.slot.lock();
        if let Slot::Weak(weak) = &*slot {
          if let Some(live) = weak.upgrade() {
            return Some(live);
          }
          debug!(
            service = std::any::type_name::<T>(),
            "shared instance was released, rebuilding"
          );
        }
        let instance = (self.factory)(resolver)?;
        *slot = Slot::Weak(Arc::downgrade(&instance));
        Some(instance)
      }
      Scope::Cached => {
        let mut slot = self.slot.lock();
        if let Slot::Strong(instance) = &*slot {
          return Some(Arc::clone(instance));
        }
        let instance = (self.factory)(resolver)?;
        *slot = Slot::Strong(Arc::clone(&instance));
        Some(instance)
      }
    }
  }
}
