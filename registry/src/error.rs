use crate::core::InjectionKey;
use thiserror::Error;

/// Why a service could not be resolved.
///
/// The mandatory resolution path (`Container::resolve`, `resolve!`) panics
/// with this error's message; the optional path (`Container::get`) turns it
/// into `None`. `Container::try_resolve` hands it back as a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
  /// No container on the lookup chain has a registration for the identity.
  #[error("{service}{} isn't registered", named(.name))]
  NotRegistered {
    service: &'static str,
    name: Option<String>,
  },

  /// A registration was found, but its factory (or the alias projection in
  /// front of it) produced no value.
  #[error("{service}{} cannot be resolved: its factory produced no value", named(.name))]
  ProducesNoValue {
    service: &'static str,
    name: Option<String>,
  },
}

impl ResolveError {
  pub(crate) fn not_registered(key: &InjectionKey) -> Self {
    Self::NotRegistered {
      service: key.type_name,
      name: key.name.clone(),
    }
  }

  pub(crate) fn produces_no_value(key: &InjectionKey) -> Self {
    Self::ProducesNoValue {
      service: key.type_name,
      name: key.name.clone(),
    }
  }

  /// The type name of the service that failed to resolve.
  pub fn service(&self) -> &'static str {
    match self {
      Self::NotRegistered { service, .. } | Self::ProducesNoValue { service, .. } => *service,
    }
  }
}

fn named(name: &Option<String>) -> String {
  match name {
    Some(name) => format!(" with name '{}'", name),
    None => String::new(),
  }
}

/// A specialized `Result` type for resolution.
pub type Result<T, E = ResolveError> = std::result::Result<T, E>;
