//! The process-wide registry and access functions.

use crate::registry::Registry;
use once_cell::sync::Lazy;

// Created on first access, lives for the rest of the process.
static GLOBAL_REGISTRY: Lazy<Registry> = Lazy::new(Registry::default);

/// Provides a reference to the global registry.
///
/// Libraries and tests that want isolation should build their own
/// [`Registry`] instead; `global().reset()` exists for tests that cannot.
///
/// # Examples
///
/// ```
/// use fibre_inject::{global, Provider};
///
/// global().register("greeting", Provider::instance(String::from("Hello from global!")));
/// assert_eq!(*global().get::<String>("greeting").unwrap(), "Hello from global!");
/// ```
pub fn global() -> &'static Registry {
  &GLOBAL_REGISTRY
}
