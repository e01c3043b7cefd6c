use service_registry::{resolve, shared};
use std::panic;

struct UnregisteredService;

fn main() {
  // --- Using the panicking `resolve!` macro ---
  println!("Attempting to resolve a service that was never registered...");

  let result = panic::catch_unwind(|| {
    // This line will panic!
    let _service = resolve!(UnregisteredService);
  });

  assert!(result.is_err(), "resolve! should have panicked.");
  println!("Successfully caught the expected panic from resolve!.");

  // --- Using the non-panicking `get()` method ---
  println!("\nNow, attempting to resolve using the fallible `get()` method...");

  match shared().get::<UnregisteredService>() {
    Some(_) => panic!("Should not have found the service!"),
    None => println!("Correctly received `None` for the missing service."),
  }

  // --- Asking why with `try_resolve()` ---
  if let Err(err) = shared().try_resolve::<UnregisteredService>() {
    println!("try_resolve() explains: {}", err);
  }
}
