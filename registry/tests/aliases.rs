use service_registry::{Container, Scope};
use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// --- Test Fixtures ---

trait MockService: Send + Sync {
  fn do_something(&self) -> &'static str;
}

trait MockService2: Send + Sync {
  fn do_something2(&self) -> &'static str;
}

struct MockProvider;
impl MockService for MockProvider {
  fn do_something(&self) -> &'static str {
    "one"
  }
}
impl MockService2 for MockProvider {
  fn do_something2(&self) -> &'static str {
    "two"
  }
}

trait BiggerMockService: Send + Sync {
  fn inner(&self) -> &'static str;
}

struct BiggerProvider {
  mock_service: Arc<dyn MockService>,
}
impl BiggerMockService for BiggerProvider {
  fn inner(&self) -> &'static str {
    self.mock_service.do_something()
  }
}

fn data_ptr<T: ?Sized>(arc: &Arc<T>) -> *const u8 {
  Arc::as_ptr(arc) as *const u8
}

// --- Tests ---

#[test]
fn test_provider_resolves_through_every_alias() {
  let container = Container::new();
  container
    .add_transient(|_| MockProvider)
    .implements::<dyn MockService>(|p| p as Arc<dyn MockService>)
    .implements::<dyn MockService2>(|p| p as Arc<dyn MockService2>);

  assert!(container.get::<MockProvider>().is_some());
  assert_eq!(container.resolve::<dyn MockService>().do_something(), "one");
  assert_eq!(container.resolve::<dyn MockService2>().do_something2(), "two");
}

#[test]
fn test_cached_aliases_share_one_instance() {
  static BUILDS: AtomicUsize = AtomicUsize::new(0);

  let container = Container::new();
  container
    .add_cached(|_| {
      BUILDS.fetch_add(1, Ordering::SeqCst);
      MockProvider
    })
    .implements::<dyn MockService>(|p| p as Arc<dyn MockService>)
    .implements::<dyn MockService2>(|p| p as Arc<dyn MockService2>);

  let a = container.resolve::<dyn MockService>();
  let b = container.resolve::<dyn MockService2>();
  let provider = container.resolve::<MockProvider>();

  assert_eq!(data_ptr(&a), data_ptr(&b));
  assert_eq!(data_ptr(&a), data_ptr(&provider));
  assert_eq!(BUILDS.load(Ordering::SeqCst), 1);
}

#[test]
fn test_transient_aliases_build_separately() {
  // Each alias resolution goes back to the transient primary.
  let container = Container::new();
  container
    .add_transient(|_| vec![1_u8, 2, 3])
    .implements_with_name::<[u8]>("bytes", |v| Arc::from(v.as_slice()));

  let a = container.resolve_with_name::<[u8]>("bytes");
  let b = container.resolve_with_name::<[u8]>("bytes");
  assert_eq!(&*a, &[1, 2, 3]);
  assert_ne!(data_ptr(&a), data_ptr(&b));
}

#[test]
fn test_named_primary_and_named_alias() {
  let container = Container::new();
  let registration = container
    .add_cached_with_name("primary", |_| MockProvider)
    .implements_with_name::<dyn MockService>("alias", |p| p as Arc<dyn MockService>);
  assert_eq!(registration.name(), Some("primary"));

  assert!(container.get::<MockProvider>().is_none());
  assert!(container.get::<dyn MockService>().is_none());
  assert_eq!(
    container.resolve_with_name::<dyn MockService>("alias").do_something(),
    "one"
  );
}

#[test]
fn test_dependent_services_chain_registrations() {
  let container = Container::new();
  container
    .add_transient(|_| MockProvider)
    .implements::<dyn MockService>(|p| p as Arc<dyn MockService>)
    .implements::<dyn MockService2>(|p| p as Arc<dyn MockService2>)
    .and()
    .add_transient(|c| BiggerProvider {
      mock_service: c.resolve(),
    })
    .implements::<dyn BiggerMockService>(|p| p as Arc<dyn BiggerMockService>);

  let bigger = container.get::<dyn BiggerMockService>();

  assert_eq!(bigger.map(|b| b.inner()), Some("one"));
}

#[test]
fn test_failed_projection_produces_no_value() {
  // The primary is a `u32` behind `dyn Any`, so only the `u32` view succeeds.
  let container = Container::new();
  container
    .add_trait::<dyn Any + Send + Sync>(Scope::Cached, |_| Arc::new(17_u32))
    .try_implements::<String>(|any| any.downcast::<String>().ok())
    .try_implements::<u32>(|any| any.downcast::<u32>().ok());

  assert_eq!(container.get::<u32>().as_deref(), Some(&17));
  assert!(container.get::<String>().is_none());
  assert!(container.can_resolve::<String>(None));
}

#[test]
#[should_panic(expected = "cannot be resolved")]
fn test_failed_projection_panics_on_mandatory_resolve() {
  let container = Container::new();
  container
    .add_trait::<dyn Any + Send + Sync>(Scope::Transient, |_| Arc::new(17_u32))
    .try_implements_with_name::<String>("text", |any| any.downcast::<String>().ok());

  container.resolve_with_name::<String>("text");
}

#[test]
fn test_alias_follows_primary_replacement() {
  // Aliases re-resolve the primary identity, so replacing the primary is
  // visible through them.
  struct OtherProvider;
  impl MockService for OtherProvider {
    fn do_something(&self) -> &'static str {
      "other"
    }
  }

  let container = Container::new();
  container
    .add_trait::<dyn MockService>(Scope::Cached, |_| Arc::new(MockProvider))
    .implements_with_name::<dyn MockService>("default", |p| p);
  assert_eq!(
    container.resolve_with_name::<dyn MockService>("default").do_something(),
    "one"
  );

  container.add_trait::<dyn MockService>(Scope::Cached, |_| Arc::new(OtherProvider));
  assert_eq!(
    container.resolve_with_name::<dyn MockService>("default").do_something(),
    "other"
  );
}

#[test]
fn test_alias_on_parent_resolves_primary_through_child() {
  let parent = Arc::new(Container::new());
  parent
    .add_trait::<dyn MockService>(Scope::Transient, |_| Arc::new(MockProvider))
    .implements_with_name::<dyn MockService>("via_alias", |p| p);

  struct ChildProvider;
  impl MockService for ChildProvider {
    fn do_something(&self) -> &'static str {
      "child"
    }
  }
  let child = Container::with_parent(&parent);
  child.add_trait::<dyn MockService>(Scope::Transient, |_| Arc::new(ChildProvider));

  // The alias factory runs against the resolving container.
  assert_eq!(
    child.resolve_with_name::<dyn MockService>("via_alias").do_something(),
    "child"
  );
  assert_eq!(
    parent.resolve_with_name::<dyn MockService>("via_alias").do_something(),
    "one"
  );
}
