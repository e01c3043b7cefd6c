//! The `Container` struct: registration storage and hierarchical resolution.

use crate::core::{InjectionKey, ResolutionGuard};
use crate::error::{ResolveError, Result};
use crate::registration::Registration;
use crate::scope::{Factory, Scope, ScopedEntry};
use parking_lot::ReentrantMutex;
use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::{trace, warn};

// Every value in a table is an `Arc<ScopedEntry<T>>` for the `T` named by its key.
type ErasedEntry = Arc<dyn Any + Send + Sync>;

/// A thread-safe service container.
///
/// A container maps service identities (a type, optionally paired with a
/// name) to factories. Containers form a tree: a container created with
/// [`Container::with_parent`] resolves anything its ancestors can, while its
/// own registrations shadow theirs. Parents are never modified through a
/// child, and a child does not keep its parent alive.
///
/// The table is guarded by a re-entrant lock that is only held for
/// bookkeeping. Factories run outside of it, so they are free to resolve
/// from, or register into, any container, including the one they were
/// invoked through.
pub struct Container {
  table: ReentrantMutex<RefCell<HashMap<InjectionKey, ErasedEntry>>>,
  parent: Option<Weak<Container>>,
}

impl Default for Container {
  fn default() -> Self {
    Self::new()
  }
}

impl Container {
  /// Creates a new, empty root `Container`.
  pub fn new() -> Self {
    Self {
      table: ReentrantMutex::new(RefCell::new(HashMap::new())),
      parent: None,
    }
  }

  /// Creates a new, empty `Container` that falls back to `parent` for
  /// anything it cannot resolve itself.
  ///
  /// Only a weak reference to `parent` is kept.
  pub fn with_parent(parent: &Arc<Container>) -> Self {
    Self {
      table: ReentrantMutex::new(RefCell::new(HashMap::new())),
      parent: Some(Arc::downgrade(parent)),
    }
  }

  /// The parent container, if there is one and it is still alive.
  pub fn parent(&self) -> Option<Arc<Container>> {
    self.parent.as_ref().and_then(Weak::upgrade)
  }

  /// The number of registrations held by this container, not counting its
  /// ancestors.
  pub fn len(&self) -> usize {
    let table = self.table.lock();
    let len = table.borrow().len();
    len
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Whether this container itself holds a registration for the identity.
  pub fn contains<T: ?Sized + Any>(&self, name: Option<&str>) -> bool {
    self.own_entry(&InjectionKey::new::<T>(name)).is_some()
  }

  /// Whether the identity is registered on this container or any ancestor.
  ///
  /// No factory is invoked, so a `true` here does not guarantee that a
  /// resolution will produce a value.
  pub fn can_resolve<T: ?Sized + Send + Sync + 'static>(&self, name: Option<&str>) -> bool {
    self.locate::<T>(&InjectionKey::new::<T>(name)).is_some()
  }

  // --- PRIVATE HELPERS ---

  pub(crate) fn register_internal<T: ?Sized + Send + Sync + 'static>(
    &self,
    name: Option<&str>,
    entry: ScopedEntry<T>,
  ) -> Registration<'_, T> {
    let key = InjectionKey::new::<T>(name);
    trace!(service = %key, scope = ?entry.scope(), "registering service");

    let replaced = {
      let table = self.table.lock();
      let previous = table.borrow_mut().insert(key, Arc::new(entry));
      previous
    };
    // The replaced entry may own a cached instance whose `Drop` resolves
    // from this container, so it must go after the table is released.
    drop(replaced);

    Registration::new(self, name)
  }

  fn own_entry(&self, key: &InjectionKey) -> Option<ErasedEntry> {
    let table = self.table.lock();
    let found = table.borrow().get(key).cloned();
    found
  }

  /// Walks from this container up to the root; the closest registration wins.
  fn locate<T: ?Sized + Send + Sync + 'static>(
    &self,
    key: &InjectionKey,
  ) -> Option<Arc<ScopedEntry<T>>> {
    let mut found = self.own_entry(key);
    if found.is_none() {
      let mut cursor = self.ancestor();
      while let Some(container) = cursor {
        found = container.own_entry(key);
        if found.is_some() {
          break;
        }
        cursor = container.ancestor();
      }
    }

    match found?.downcast::<ScopedEntry<T>>() {
      Ok(entry) => Some(entry),
      Err(_) => {
        warn!(service = %key, "registration does not match its key, ignoring it");
        None
      }
    }
  }

  fn ancestor(&self) -> Option<Arc<Container>> {
    let parent = self.parent.as_ref()?;
    let upgraded = parent.upgrade();
    if upgraded.is_none() {
      warn!("parent container was dropped, lookup stops at its child");
    }
    upgraded
  }

  pub(crate) fn try_resolve_internal<T: ?Sized + Send + Sync + 'static>(
    &self,
    name: Option<&str>,
  ) -> Result<Arc<T>> {
    let key = InjectionKey::new::<T>(name);

    let entry = self.locate::<T>(&key).ok_or_else(|| {
      trace!(service = %key, "no registration found");
      ResolveError::not_registered(&key)
    })?;

    // Panics if this entry is already being resolved on this thread, no
    // matter which container the loop went through.
    let _guard = ResolutionGuard::new(Arc::as_ptr(&entry) as usize, &key);

    // Factories see the container the resolution started from, not the one
    // that holds the registration.
    entry
      .make_service(self)
      .ok_or_else(|| ResolveError::produces_no_value(&key))
  }

  // --- PUBLIC API ---

  // --- General Registration ---

  /// Registers `factory` for `T` under the given scope.
  ///
  /// A factory returning `None` signals that the service cannot be produced
  /// right now. Registering an identity that is already present on this
  /// container replaces the previous registration, together with whatever
  /// instance it had cached.
  pub fn register<T: ?Sized + Send + Sync + 'static>(
    &self,
    scope: Scope,
    factory: impl Fn(&Container) -> Option<Arc<T>> + Send + Sync + 'static,
  ) -> Registration<'_, T> {
    self.register_internal(None, ScopedEntry::new(scope, Box::new(factory)))
  }
  pub fn register_with_name<T: ?Sized + Send + Sync + 'static>(
    &self,
    name: &str,
    scope: Scope,
    factory: impl Fn(&Container) -> Option<Arc<T>> + Send + Sync + 'static,
  ) -> Registration<'_, T> {
    self.register_internal(Some(name), ScopedEntry::new(scope, Box::new(factory)))
  }

  // --- Instance Registration ---
  pub fn add_instance<T: Any + Send + Sync>(&self, instance: T) -> Registration<'_, T> {
    self.register_internal(None, ScopedEntry::with_instance(Arc::new(instance)))
  }
  pub fn add_instance_with_name<T: Any + Send + Sync>(
    &self,
    name: &str,
    instance: T,
  ) -> Registration<'_, T> {
    self.register_internal(Some(name), ScopedEntry::with_instance(Arc::new(instance)))
  }

  // --- Transient Registration ---
  pub fn add_transient<T: Any + Send + Sync>(
    &self,
    factory: impl Fn(&Container) -> T + Send + Sync + 'static,
  ) -> Registration<'_, T> {
    self.register_internal(None, ScopedEntry::new(Scope::Transient, wrap(factory)))
  }
  pub fn add_transient_with_name<T: Any + Send + Sync>(
    &self,
    name: &str,
    factory: impl Fn(&Container) -> T + Send + Sync + 'static,
  ) -> Registration<'_, T> {
    self.register_internal(Some(name), ScopedEntry::new(Scope::Transient, wrap(factory)))
  }

  // --- Shared Registration ---
  pub fn add_shared<T: Any + Send + Sync>(
    &self,
    factory: impl Fn(&Container) -> T + Send + Sync + 'static,
  ) -> Registration<'_, T> {
    self.register_internal(None, ScopedEntry::new(Scope::Shared, wrap(factory)))
  }
  pub fn add_shared_with_name<T: Any + Send + Sync>(
    &self,
    name: &str,
    factory: impl Fn(&Container) -> T + Send + Sync + 'static,
  ) -> Registration<'_, T> {
    self.register_internal(Some(name), ScopedEntry::new(Scope::Shared, wrap(factory)))
  }

  // --- Cached Registration ---
  pub fn add_cached<T: Any + Send + Sync>(
    &self,
    factory: impl Fn(&Container) -> T + Send + Sync + 'static,
  ) -> Registration<'_, T> {
    self.register_internal(None, ScopedEntry::new(Scope::Cached, wrap(factory)))
  }
  pub fn add_cached_with_name<T: Any + Send + Sync>(
    &self,
    name: &str,
    factory: impl Fn(&Container) -> T + Send + Sync + 'static,
  ) -> Registration<'_, T> {
    self.register_internal(Some(name), ScopedEntry::new(Scope::Cached, wrap(factory)))
  }

  // --- Trait Registration ---
  pub fn add_trait<I: ?Sized + Send + Sync + 'static>(
    &self,
    scope: Scope,
    factory: impl Fn(&Container) -> Arc<I> + Send + Sync + 'static,
  ) -> Registration<'_, I> {
    self.register(scope, move |resolver| Some(factory(resolver)))
  }
  pub fn add_trait_with_name<I: ?Sized + Send + Sync + 'static>(
    &self,
    name: &str,
    scope: Scope,
    factory: impl Fn(&Container) -> Arc<I> + Send + Sync + 'static,
  ) -> Registration<'_, I> {
    self.register_with_name(name, scope, move |resolver| Some(factory(resolver)))
  }

  // --- Resolution ---

  /// Resolves a service, returning `None` if it is not registered anywhere on
  /// the lookup chain or its factory produced no value.
  ///
  /// # Panics
  ///
  /// Panics if the resolution re-enters itself (a circular dependency).
  pub fn get<T: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<T>> {
    self.try_resolve_internal(None).ok()
  }
  pub fn get_with_name<T: ?Sized + Send + Sync + 'static>(&self, name: &str) -> Option<Arc<T>> {
    self.try_resolve_internal(Some(name)).ok()
  }

  /// Resolves a service, reporting why it could not be produced.
  pub fn try_resolve<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<T>> {
    self.try_resolve_internal(None)
  }
  pub fn try_resolve_with_name<T: ?Sized + Send + Sync + 'static>(
    &self,
    name: &str,
  ) -> Result<Arc<T>> {
    self.try_resolve_internal(Some(name))
  }

  /// Resolves a required service.
  ///
  /// # Panics
  ///
  /// A missing service is a wiring bug, not a runtime condition: this panics
  /// if the service is not registered or its factory produced no value.
  #[track_caller]
  pub fn resolve<T: ?Sized + Send + Sync + 'static>(&self) -> Arc<T> {
    match self.try_resolve_internal(None) {
      Ok(service) => service,
      Err(err) => panic!("Failed to resolve required service: {}", err),
    }
  }
  #[track_caller]
  pub fn resolve_with_name<T: ?Sized + Send + Sync + 'static>(&self, name: &str) -> Arc<T> {
    match self.try_resolve_internal(Some(name)) {
      Ok(service) => service,
      Err(err) => panic!("Failed to resolve required service: {}", err),
    }
  }
}

impl fmt::Debug for Container {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Container")
      .field("registrations", &self.len())
      .field("has_parent", &self.parent.is_some())
      .finish()
  }
}

fn wrap<T: Any + Send + Sync>(
  factory: impl Fn(&Container) -> T + Send + Sync + 'static,
) -> Factory<T> {
  Box::new(move |resolver: &Container| Some(Arc::new(factory(resolver))))
}
