// Every test here goes through the process-wide registry, so they run
// serially and start from a reset registry.

use serial_test::serial;
use service_registry::{container, reset, resolve, shared, Domain, Scope};
use std::sync::{Arc, Barrier};
use std::thread;

const PAYMENT: Domain = Domain::from_static("payment");
const ORDER: Domain = Domain::from_static("order");

trait PaymentService: Send + Sync {
  fn pay(&self) -> &'static str;
}

struct PaymentProvider;
impl PaymentService for PaymentProvider {
  fn pay(&self) -> &'static str {
    "paid"
  }
}

#[test]
#[serial]
fn test_same_domain_yields_same_container() {
  reset();

  let a = container(&PAYMENT);
  let b = container(&Domain::new("payment"));

  assert!(Arc::ptr_eq(&a, &b));
  assert!(Arc::ptr_eq(&container(&Domain::SHARED), &shared()));
  assert!(!Arc::ptr_eq(&a, &container(&ORDER)));
}

#[test]
#[serial]
fn test_domains_inherit_from_shared_root() {
  reset();

  shared()
    .add_cached(|_| PaymentProvider)
    .implements::<dyn PaymentService>(|p| p as Arc<dyn PaymentService>);
  container(&PAYMENT).add_instance_with_name("currency", String::from("EUR"));

  let payment = container(&PAYMENT);
  assert!(Arc::ptr_eq(&payment.parent().unwrap(), &shared()));
  assert_eq!(payment.resolve::<dyn PaymentService>().pay(), "paid");
  assert_eq!(*resolve!(in PAYMENT, String, "currency"), "EUR");
  assert_eq!(resolve!(in PAYMENT, trait PaymentService).pay(), "paid");

  // Domain registrations stay private to the domain.
  assert!(shared().get_with_name::<String>("currency").is_none());
  assert!(container(&ORDER).get_with_name::<String>("currency").is_none());
}

#[test]
#[serial]
fn test_domain_registration_shadows_shared_root() {
  reset();

  shared().add_instance_with_name("region", String::from("global"));
  container(&ORDER).add_instance_with_name("region", String::from("eu-west"));

  assert_eq!(*resolve!(String, "region"), "global");
  assert_eq!(*resolve!(in ORDER, String, "region"), "eu-west");
  assert_eq!(*resolve!(in PAYMENT, String, "region"), "global");
}

#[test]
#[serial]
fn test_concurrent_first_access_creates_one_container() {
  reset();
  const THREADS: usize = 12;
  let barrier = Barrier::new(THREADS);
  let domain = Domain::new("contended");

  let containers: Vec<_> = thread::scope(|s| {
    let handles: Vec<_> = (0..THREADS)
      .map(|_| {
        s.spawn(|| {
          barrier.wait();
          container(&domain)
        })
      })
      .collect();
    handles.into_iter().map(|h| h.join().unwrap()).collect()
  });

  assert!(containers.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
  assert!(Arc::ptr_eq(&containers[0].parent().unwrap(), &shared()));
}

#[test]
#[serial]
fn test_concurrent_first_access_creates_one_root() {
  reset();
  const THREADS: usize = 12;
  let barrier = Barrier::new(THREADS);

  let roots: Vec<_> = thread::scope(|s| {
    let handles: Vec<_> = (0..THREADS)
      .map(|_| {
        s.spawn(|| {
          barrier.wait();
          shared()
        })
      })
      .collect();
    handles.into_iter().map(|h| h.join().unwrap()).collect()
  });

  assert!(roots.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
  assert!(Arc::ptr_eq(&roots[0], &shared()));
}

#[test]
#[serial]
fn test_reset_discards_registrations() {
  reset();
  shared().add_trait::<dyn PaymentService>(Scope::Cached, |_| Arc::new(PaymentProvider));
  container(&PAYMENT).add_instance(1_u8);
  let old_root = shared();

  reset();

  assert!(!Arc::ptr_eq(&old_root, &shared()));
  assert!(shared().get::<dyn PaymentService>().is_none());
  assert!(container(&PAYMENT).get::<u8>().is_none());
  assert!(shared().is_empty());
}

#[test]
#[serial]
fn test_domain_display_and_conversions() {
  assert_eq!(PAYMENT.to_string(), "payment");
  assert_eq!(format!("{:?}", PAYMENT), "Domain(payment)");
  assert_eq!(Domain::from("payment"), PAYMENT);
  assert_eq!(Domain::from(String::from("order")), ORDER);
  assert!(Domain::SHARED.is_shared());
  assert!(!PAYMENT.is_shared());
}
