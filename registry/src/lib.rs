//! # Service Registry
//!
//! A hierarchical, thread-safe service registry for Rust.
//!
//! Services are registered against an identity (a type, usually a trait
//! object, optionally paired with a name) together with a factory. The
//! factory runs lazily, on resolution, and receives the container it was
//! resolved through so it can resolve its own dependencies.
//!
//! ## Core Concepts
//!
//! - **Container**: a registration table plus an optional parent. Lookups
//!   walk from a container up to the root; the closest registration wins.
//! - **Scope**: `Transient` builds on every resolution, `Shared` reuses an
//!   instance while anything outside the container still holds it, `Cached`
//!   keeps the first instance for the lifetime of the registration.
//! - **Domains**: a process-wide registry of named containers, all parented on
//!   the shared root, accessible via `shared()` and `container()`.
//! - **Resolution**: `resolve` (and the `resolve!` macro) panic on a missing
//!   service, since that is a wiring bug; `get` returns an `Option` and
//!   `try_resolve` a `Result`.
//!
//! ## Quick Start
//!
//! ```
//! use service_registry::{resolve, shared, Scope};
//! use std::sync::Arc;
//!
//! trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//!
//! struct EnglishGreeter {
//!     message: Arc<String>,
//! }
//!
//! impl Greeter for EnglishGreeter {
//!     fn greet(&self) -> String {
//!         self.message.to_string()
//!     }
//! }
//!
//! // Register a simple value under a name.
//! shared().add_instance_with_name("greeting_message", String::from("Hello, World!"));
//!
//! // Register a provider and expose it as a trait. Its factory resolves its
//! // own dependency when the greeter is first needed.
//! shared()
//!     .add_cached(|c| EnglishGreeter {
//!         message: c.resolve_with_name::<String>("greeting_message"),
//!     })
//!     .implements::<dyn Greeter>(|greeter| greeter as Arc<dyn Greeter>);
//!
//! // Elsewhere, resolve the service by its trait.
//! let greeter = resolve!(trait Greeter);
//! assert_eq!(greeter.greet(), "Hello, World!");
//! ```

mod container;
mod core;
mod error;
mod global;
mod injected;
mod macros;
mod plugin;
mod registration;
mod scope;

pub use container::Container;
pub use error::{ResolveError, Result};
pub use global::{container, reset, shared, Domain};
pub use injected::{Injected, LazyInjected, OptionalInjected};
pub use plugin::{PluginIntegrator, ServicePlugin};
pub use registration::Registration;
pub use scope::Scope;
