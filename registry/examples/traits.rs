use service_registry::{resolve, shared};
use std::sync::Arc;

// 1. Define the abstractions (the traits)
trait Logger: Send + Sync {
  fn log(&self, message: &str);
}

trait Auditor: Send + Sync {
  fn audit(&self, event: &str);
}

// 2. One concrete implementation serving both
struct ConsoleLogger;
impl Logger for ConsoleLogger {
  fn log(&self, message: &str) {
    println!("[CONSOLE LOG]: {}", message);
  }
}
impl Auditor for ConsoleLogger {
  fn audit(&self, event: &str) {
    println!("[CONSOLE AUDIT]: {}", event);
  }
}

// 3. A service that depends on the abstractions
struct ReportService {
  logger: Arc<dyn Logger>,
  auditor: Arc<dyn Auditor>,
}

impl ReportService {
  fn generate_report(&self) {
    self.logger.log("Starting report generation.");
    self.auditor.audit("report generated");
    self.logger.log("Finished report generation.");
  }
}

fn main() {
  // --- Registration ---

  // One cached ConsoleLogger, exposed as both `dyn Logger` and `dyn Auditor`.
  shared()
    .add_cached(|_| ConsoleLogger)
    .implements::<dyn Logger>(|logger| logger as Arc<dyn Logger>)
    .implements::<dyn Auditor>(|logger| logger as Arc<dyn Auditor>);

  // The ReportService factory resolves its own dependencies.
  shared().add_cached(|c| ReportService {
    logger: c.resolve(),
    auditor: c.resolve(),
  });

  // --- Resolution and Usage ---
  println!("Resolving the high-level service...");
  let report_service = resolve!(ReportService);

  println!("Using the service...");
  report_service.generate_report();

  let logger = resolve!(trait Logger);
  let auditor = resolve!(trait Auditor);
  assert_eq!(
    Arc::as_ptr(&logger) as *const u8,
    Arc::as_ptr(&auditor) as *const u8,
    "both traits should be served by the same cached instance"
  );
}
