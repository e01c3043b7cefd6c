//! Public macros for ergonomic service resolution.

/// Resolves a required service from the process-wide registry.
///
/// Without a domain the shared root container is used; `in DOMAIN,` resolves
/// from that domain's container instead, which also sees everything
/// registered on the shared root.
///
/// # Panics
///
/// Panics if the service cannot be resolved. For a non-panicking version,
/// use `shared().get::<T>()` directly.
///
/// # Examples
///
/// ```
/// use service_registry::{resolve, shared, Domain, Scope};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync { fn greet(&self) -> String; }
/// struct EnglishGreeter;
/// impl Greeter for EnglishGreeter { fn greet(&self) -> String { "Hello!".to_string() } }
///
/// shared().add_cached(|_| String::from("hello"));
/// shared().add_trait::<dyn Greeter>(Scope::Cached, |_| Arc::new(EnglishGreeter));
///
/// assert_eq!(*resolve!(String), "hello");
/// assert_eq!(resolve!(trait Greeter).greet(), "Hello!");
///
/// const SETTINGS: Domain = Domain::from_static("settings");
/// service_registry::container(&SETTINGS).add_instance_with_name("theme", String::from("dark"));
/// assert_eq!(*resolve!(in SETTINGS, String, "theme"), "dark");
/// // Domains fall back to the shared root.
/// assert_eq!(*resolve!(in SETTINGS, String), "hello");
/// ```
#[macro_export]
macro_rules! resolve {
    // resolve!(in DOMAIN, trait MyTrait)
    (in $domain:expr, trait $trait_ident:ident) => {
        $crate::container(&$domain).resolve::<dyn $trait_ident>()
    };

    // resolve!(in DOMAIN, trait MyTrait, "name")
    (in $domain:expr, trait $trait_ident:ident, $name:expr) => {
        $crate::container(&$domain).resolve_with_name::<dyn $trait_ident>($name)
    };

    // resolve!(in DOMAIN, MyService)
    (in $domain:expr, $type:ty) => {
        $crate::container(&$domain).resolve::<$type>()
    };

    // resolve!(in DOMAIN, MyService, "name")
    (in $domain:expr, $type:ty, $name:expr) => {
        $crate::container(&$domain).resolve_with_name::<$type>($name)
    };

    // resolve!(trait MyTrait)
    // `dyn` is added here, so the trait is captured as an `ident`.
    (trait $trait_ident:ident) => {
        $crate::shared().resolve::<dyn $trait_ident>()
    };

    // resolve!(trait MyTrait, "name")
    (trait $trait_ident:ident, $name:expr) => {
        $crate::shared().resolve_with_name::<dyn $trait_ident>($name)
    };

    // resolve!(MyService)
    ($type:ty) => {
        $crate::shared().resolve::<$type>()
    };

    // resolve!(MyService, "name")
    ($type:ty, $name:expr) => {
        $crate::shared().resolve_with_name::<$type>($name)
    };
}
