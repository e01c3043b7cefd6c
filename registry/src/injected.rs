//! Service handles for struct fields.

use crate::container::Container;
use crate::global::{self, Domain};
use once_cell::sync::OnceCell;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// A required service, resolved as soon as the handle is built.
///
/// # Panics
///
/// Every constructor panics like [`Container::resolve`] if the service
/// cannot be resolved.
///
/// # Examples
///
/// ```
/// use service_registry::{Container, Injected};
///
/// let container = Container::new();
/// container.add_instance_with_name("motd", String::from("hello"));
///
/// let motd = Injected::<String>::with_name(&container, "motd");
/// assert_eq!(motd.as_str(), "hello");
/// ```
pub struct Injected<T: ?Sized> {
  name: Option<String>,
  service: Arc<T>,
}

impl<T: ?Sized + Send + Sync + 'static> Injected<T> {
  #[track_caller]
  pub fn new(resolver: &Container) -> Self {
    Self {
      name: None,
      service: resolver.resolve(),
    }
  }

  #[track_caller]
  pub fn with_name(resolver: &Container, name: impl Into<String>) -> Self {
    let name = name.into();
    Self {
      service: resolver.resolve_with_name(&name),
      name: Some(name),
    }
  }

  #[track_caller]
  pub fn in_domain(domain: &Domain) -> Self {
    Self::new(&global::container(domain))
  }

  #[track_caller]
  pub fn in_domain_with_name(domain: &Domain, name: impl Into<String>) -> Self {
    Self::with_name(&global::container(domain), name)
  }

  pub fn into_inner(self) -> Arc<T> {
    self.service
  }
}

impl<T: ?Sized + Send + Sync + 'static> Default for Injected<T> {
  #[track_caller]
  fn default() -> Self {
    Self::new(&global::shared())
  }
}

impl<T: ?Sized> Deref for Injected<T> {
  type Target = Arc<T>;

  fn deref(&self) -> &Arc<T> {
    &self.service
  }
}

impl<T: ?Sized> fmt::Debug for Injected<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Injected")
      .field("service", &std::any::type_name::<T>())
      .field("name", &self.name)
      .finish()
  }
}

/// A required service that is resolved on first access and then kept.
///
/// # Examples
///
/// ```
/// use service_registry::{Container, LazyInjected};
/// use std::sync::Arc;
///
/// let container = Arc::new(Container::new());
/// container.add_transient(|_| 42_u32);
///
/// let mut answer = LazyInjected::<u32>::new(container);
/// assert!(answer.is_empty());
/// assert_eq!(**answer.get(), 42);
///
/// answer.reset();
/// assert!(answer.is_empty());
/// ```
pub struct LazyInjected<T: ?Sized> {
  resolver: Arc<Container>,
  name: Option<String>,
  service: OnceCell<Arc<T>>,
}

impl<T: ?Sized + Send + Sync + 'static> LazyInjected<T> {
  pub fn new(resolver: Arc<Container>) -> Self {
    Self {
      resolver,
      name: None,
      service: OnceCell::new(),
    }
  }

  pub fn with_name(resolver: Arc<Container>, name: impl Into<String>) -> Self {
    Self {
      resolver,
      name: Some(name.into()),
      service: OnceCell::new(),
    }
  }

  /// Resolves against the container of `domain` in the process-wide registry.
  pub fn in_domain(domain: &Domain) -> Self {
    Self::new(global::container(domain))
  }

  pub fn in_domain_with_name(domain: &Domain, name: impl Into<String>) -> Self {
    Self::with_name(global::container(domain), name)
  }

  /// Returns the service, resolving it if this is the first access since
  /// creation or the last [`reset`](Self::reset).
  ///
  /// # Panics
  ///
  /// Panics like [`Container::resolve`] if the service cannot be resolved.
  #[track_caller]
  pub fn get(&self) -> &Arc<T> {
    self.service.get_or_init(|| match &self.name {
      Some(name) => self.resolver.resolve_with_name(name),
      None => self.resolver.resolve(),
    })
  }

  /// Whether nothing is cached, so the next `get` will resolve.
  pub fn is_empty(&self) -> bool {
    self.service.get().is_none()
  }

  /// Drops the cached service.
  pub fn reset(&mut self) {
    self.service.take();
  }
}

impl<T: ?Sized + Send + Sync + 'static> Default for LazyInjected<T> {
  /// Resolves against the shared root container.
  fn default() -> Self {
    Self::new(global::shared())
  }
}

impl<T: ?Sized> fmt::Debug for LazyInjected<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("LazyInjected")
      .field("service", &std::any::type_name::<T>())
      .field("name", &self.name)
      .field("resolved", &self.service.get().is_some())
      .finish()
  }
}

/// An optional service that is looked up on first access and then kept,
/// whether or not it was found.
pub struct OptionalInjected<T: ?Sized> {
  resolver: Arc<Container>,
  name: Option<String>,
  service: OnceCell<Option<Arc<T>>>,
}

impl<T: ?Sized + Send + Sync + 'static> OptionalInjected<T> {
  pub fn new(resolver: Arc<Container>) -> Self {
    Self {
      resolver,
      name: None,
      service: OnceCell::new(),
    }
  }

  pub fn with_name(resolver: Arc<Container>, name: impl Into<String>) -> Self {
    Self {
      resolver,
      name: Some(name.into()),
      service: OnceCell::new(),
    }
  }

  pub fn in_domain(domain: &Domain) -> Self {
    Self::new(global::container(domain))
  }

  pub fn in_domain_with_name(domain: &Domain, name: impl Into<String>) -> Self {
    Self::with_name(global::container(domain), name)
  }

  /// Returns the service if it could be resolved. The lookup happens once;
  /// a miss is remembered until [`reset`](Self::reset).
  pub fn get(&self) -> Option<&Arc<T>> {
    self
      .service
      .get_or_init(|| match &self.name {
        Some(name) => self.resolver.get_with_name(name),
        None => self.resolver.get(),
      })
      .as_ref()
  }

  /// Whether no lookup has been made since creation or the last reset.
  ///
  /// A remembered miss counts as a lookup: after `get` returned `None` this
  /// is `false` until [`reset`](Self::reset).
  pub fn is_empty(&self) -> bool {
    self.service.get().is_none()
  }

  pub fn reset(&mut self) {
    self.service.take();
  }
}

impl<T: ?Sized + Send + Sync + 'static> Default for OptionalInjected<T> {
  fn default() -> Self {
    Self::new(global::shared())
  }
}

impl<T: ?Sized> fmt::Debug for OptionalInjected<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("OptionalInjected")
      .field("service", &std::any::type_name::<T>())
      .field("name", &self.name)
      .field("looked_up", &self.service.get().is_some())
      .finish()
  }
}
