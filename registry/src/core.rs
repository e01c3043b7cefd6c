//! Core, non-public data structures for the service registry.

use std::any::{type_name, Any, TypeId};
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

thread_local! {
  // The (entry, service) pairs currently being resolved on this thread.
  // Re-entering one of them means the factory graph loops back on itself.
  static RESOLVING: RefCell<HashSet<(usize, InjectionKey)>> = RefCell::new(HashSet::new());
}

/// An RAII guard that turns a circular dependency into a panic.
///
/// Without it, a `Shared` or `Cached` entry that (transitively) resolves
/// itself would block forever on its own slot lock. The frame is keyed by the
/// registration entry that owns that lock, so a loop is caught whichever
/// containers it passes through, while a child container whose factory
/// resolves the same identity from its parent's entry is not a cycle.
pub(crate) struct ResolutionGuard {
  frame: (usize, InjectionKey),
}

impl ResolutionGuard {
  pub(crate) fn new(entry: usize, key: &InjectionKey) -> Self {
    let frame = (entry, key.clone());
    let entered = RESOLVING.with(|stack| stack.borrow_mut().insert(frame.clone()));
    if !entered {
      panic!(
        "Circular dependency detected while resolving service: {}",
        key
      );
    }
    Self { frame }
  }
}

impl Drop for ResolutionGuard {
  fn drop(&mut self) {
    RESOLVING.with(|stack| {
      stack.borrow_mut().remove(&self.frame);
    });
  }
}

/// The identity a service is registered and resolved under: its type plus an
/// optional disambiguating name.
///
/// `type_name` is carried for diagnostics only and takes no part in equality.
#[derive(Clone)]
pub(crate) struct InjectionKey {
  pub(crate) type_id: TypeId,
  pub(crate) type_name: &'static str,
  pub(crate) name: Option<String>,
}

impl InjectionKey {
  pub(crate) fn new<T: ?Sized + Any>(name: Option<&str>) -> Self {
    Self {
      type_id: TypeId::of::<T>(),
      type_name: type_name::<T>(),
      name: name.map(str::to_owned),
    }
  }
}

impl PartialEq for InjectionKey {
  fn eq(&self, other: &Self) -> bool {
    self.type_id == other.type_id && self.name == other.name
  }
}

impl Eq for InjectionKey {}

impl Hash for InjectionKey {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.type_id.hash(state);
    self.name.hash(state);
  }
}

impl fmt::Display for InjectionKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.name {
      Some(name) => write!(f, "{} (name: '{}')", self.type_name, name),
      None => f.write_str(self.type_name),
    }
  }
}

impl fmt::Debug for InjectionKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.name {
      Some(name) => write!(f, "Key({}, Name({}))", self.type_name, name),
      None => write!(f, "Key({})", self.type_name),
    }
  }
}
