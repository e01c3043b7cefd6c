use service_registry::{container, resolve, Container, Domain, PluginIntegrator, ServicePlugin};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const PAYMENT: Domain = Domain::from_static("payment");

// --- Payment module ---

trait PaymentService: Send + Sync {
  fn pay(&self, amount: u32) -> String;
}

struct PaymentProvider {
  gateway: Arc<String>,
}
impl PaymentService for PaymentProvider {
  fn pay(&self, amount: u32) -> String {
    format!("paid {} through {}", amount, self.gateway)
  }
}

struct PaymentPlugin;
impl ServicePlugin for PaymentPlugin {
  fn register_all_services(&self, into: &Container) {
    // Public services go to the container the integrator hands out.
    into
      .add_cached(|_| PaymentProvider {
        gateway: resolve!(in PAYMENT, String, "gateway"),
      })
      .implements::<dyn PaymentService>(|p| p as Arc<dyn PaymentService>);

    // Internal details stay in the payment domain.
    container(&PAYMENT).add_instance_with_name("gateway", String::from("acme-pay"));
  }
}

// --- Order module ---

trait OrderService: Send + Sync {
  fn place(&self) -> String;
}

struct OrderProvider {
  payment: Arc<dyn PaymentService>,
}
impl OrderService for OrderProvider {
  fn place(&self) -> String {
    format!("order placed, {}", self.payment.pay(42))
  }
}

struct OrderPlugin;
impl ServicePlugin for OrderPlugin {
  fn register_all_services(&self, into: &Container) {
    into
      .add_transient(|c| OrderProvider {
        payment: c.resolve(),
      })
      .implements::<dyn OrderService>(|p| p as Arc<dyn OrderService>);
  }
}

fn main() {
  // RUST_LOG=service_registry=debug shows the registry's own diagnostics.
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  // Order is installed first even though it needs payment: dependencies are
  // only resolved when a service is built.
  PluginIntegrator::new("app")
    .install(OrderPlugin)
    .install(PaymentPlugin)
    // Installing twice only logs a warning.
    .install(PaymentPlugin)
    .register_all_services_globally();

  let orders = resolve!(trait OrderService);
  println!("{}", orders.place());

  // The gateway name is private to the payment domain.
  assert!(service_registry::shared()
    .get_with_name::<String>("gateway")
    .is_none());
}
