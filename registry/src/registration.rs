//! The handle returned by registrations, used to expose a service under
//! additional identities.

use crate::container::Container;
use crate::scope::Scope;
use std::marker::PhantomData;
use std::sync::Arc;

/// A registration of `S` on a specific container.
///
/// The handle lets one provider satisfy several service identities without
/// running its factory more than once per resolution:
///
/// ```
/// use service_registry::{Container, Scope};
/// use std::sync::Arc;
///
/// trait Reader: Send + Sync { fn read(&self) -> u8; }
/// trait Writer: Send + Sync { fn write(&self, v: u8); }
///
/// struct Store;
/// impl Reader for Store { fn read(&self) -> u8 { 7 } }
/// impl Writer for Store { fn write(&self, _: u8) {} }
///
/// let container = Container::new();
/// container
///   .add_cached(|_| Store)
///   .implements::<dyn Reader>(|store| store as Arc<dyn Reader>)
///   .implements::<dyn Writer>(|store| store as Arc<dyn Writer>);
///
/// assert_eq!(container.resolve::<dyn Reader>().read(), 7);
/// container.resolve::<dyn Writer>().write(1);
/// ```
pub struct Registration<'c, S: ?Sized> {
  container: &'c Container,
  name: Option<String>,
  _service: PhantomData<fn() -> Arc<S>>,
}

impl<'c, S: ?Sized + Send + Sync + 'static> Registration<'c, S> {
  pub(crate) fn new(container: &'c Container, name: Option<&str>) -> Self {
    Self {
      container,
      name: name.map(str::to_owned),
      _service: PhantomData,
    }
  }

  /// The name the primary service was registered under.
  pub fn name(&self) -> Option<&str> {
    self.name.as_deref()
  }

  /// The container holding the registration, for chaining further ones.
  pub fn and(self) -> &'c Container {
    self.container
  }

  // --- PRIVATE HELPERS ---

  fn alias_internal<A: ?Sized + Send + Sync + 'static>(
    self,
    alias_name: Option<&str>,
    project: impl Fn(Arc<S>) -> Option<Arc<A>> + Send + Sync + 'static,
  ) -> Self {
    let primary = self.name.clone();
    // The alias never caches anything itself: it resolves the primary
    // identity each time, so it shares whatever the primary's scope keeps.
    let factory = move |resolver: &Container| {
      let service = resolver.try_resolve_internal::<S>(primary.as_deref()).ok()?;
      project(service)
    };
    match alias_name {
      Some(name) => self.container.register_with_name(name, Scope::Transient, factory),
      None => self.container.register(Scope::Transient, factory),
    };
    self
  }

  // --- PUBLIC API ---

  /// Also registers the service as `A`, viewed through `project`.
  ///
  /// Typically `project` is an unsized coercion such as
  /// `|s| s as Arc<dyn Trait>`.
  pub fn implements<A: ?Sized + Send + Sync + 'static>(
    self,
    project: impl Fn(Arc<S>) -> Arc<A> + Send + Sync + 'static,
  ) -> Self {
    self.alias_internal(None, move |service| Some(project(service)))
  }
  pub fn implements_with_name<A: ?Sized + Send + Sync + 'static>(
    self,
    alias_name: &str,
    project: impl Fn(Arc<S>) -> Arc<A> + Send + Sync + 'static,
  ) -> Self {
    self.alias_internal(Some(alias_name), move |service| Some(project(service)))
  }

  /// Also registers the service as `A`, for views that can fail.
  ///
  /// When `project` returns `None` the alias produces no value: `get` yields
  /// `None` and `resolve` panics.
  pub fn try_implements<A: ?Sized + Send + Sync + 'static>(
    self,
    project: impl Fn(Arc<S>) -> Option<Arc<A>> + Send + Sync + 'static,
  ) -> Self {
    self.alias_internal(None, project)
  }
  pub fn try_implements_with_name<A: ?Sized + Send + Sync + 'static>(
    self,
    alias_name: &str,
    project: impl Fn(Arc<S>) -> Option<Arc<A>> + Send + Sync + 'static,
  ) -> Self {
    self.alias_internal(Some(alias_name), project)
  }
}
