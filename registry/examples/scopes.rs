use service_registry::{shared, Scope};
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};

// A simple service that gets a unique ID upon creation.
struct RequestTracker {
  id: usize,
}

// A global, thread-safe counter to generate unique IDs.
static ID_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn tracker(label: &str) -> Option<Arc<RequestTracker>> {
  println!("Creating {} RequestTracker...", label);
  Some(Arc::new(RequestTracker {
    id: ID_COUNTER.fetch_add(1, Ordering::SeqCst),
  }))
}

fn main() {
  let root = shared();
  // Built on every resolution.
  root.register_with_name("transient", Scope::Transient, |_| tracker("TRANSIENT"));
  // Reused while someone holds it.
  root.register_with_name("shared", Scope::Shared, |_| tracker("SHARED"));
  // Built once, kept by the container.
  root.register_with_name("cached", Scope::Cached, |_| tracker("CACHED"));

  println!("--- Transient ---");
  let t1 = root.resolve_with_name::<RequestTracker>("transient");
  let t2 = root.resolve_with_name::<RequestTracker>("transient");
  println!("Transient IDs: {} and {}\n", t1.id, t2.id);
  assert!(!Arc::ptr_eq(&t1, &t2));

  println!("--- Shared ---");
  let s1 = root.resolve_with_name::<RequestTracker>("shared");
  let s2 = root.resolve_with_name::<RequestTracker>("shared");
  assert!(Arc::ptr_eq(&s1, &s2));
  let first_id = s1.id;
  drop((s1, s2));
  let s3 = root.resolve_with_name::<RequestTracker>("shared");
  println!("Shared ID {} was released and rebuilt as {}\n", first_id, s3.id);
  assert_ne!(first_id, s3.id);

  println!("--- Cached ---");
  let c1 = root.resolve_with_name::<RequestTracker>("cached");
  let first_id = c1.id;
  drop(c1);
  let c2 = root.resolve_with_name::<RequestTracker>("cached");
  println!("Cached ID stays {} after every handle was dropped", c2.id);
  assert_eq!(first_id, c2.id);
}
