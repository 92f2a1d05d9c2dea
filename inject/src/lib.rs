//! # Fibre Inject
//!
//! Name-based dependency injection: providers are registered under a name,
//! and wrapped functions receive a provider for every declared parameter the
//! caller did not pass explicitly.
//!
//! ## Core Concepts
//!
//! - **Registry**: holds default providers plus per-profile overrides. A
//!   process-wide instance is available through `global()`, but any number of
//!   independent registries can be built.
//! - **Provider**: an instance, a lazily built singleton, or a factory run on
//!   every resolution.
//! - **Profile**: a named bucket of overrides layered over the defaults while
//!   that profile is active.
//! - **Injection**: `inject(&registry, function)` wraps a [`Function`]; calling
//!   it fills missing parameters from the merged providers, then binds and runs
//!   the body. Explicit arguments always win.
//!
//! ## Quick Start
//!
//! ```
//! use fibre_inject::{function, inject, provide, signature, Args, Registry};
//!
//! let registry = Registry::new();
//! provide!(registry, db = String::from("sqlite"));
//!
//! {
//!   let _test = registry.activate("test");
//!   provide!(registry, db = String::from("mock"));
//! }
//!
//! let describe = inject(
//!   &registry,
//!   function(signature!(describe(db)), |args| Ok(format!("using {}", args.get::<String>("db")?))),
//! );
//!
//! assert_eq!(describe.call(Args::new()).unwrap(), "using sqlite");
//! assert_eq!(describe.call_in(Some("test"), Args::new()).unwrap(), "using mock");
//! assert_eq!(describe.call(Args::new().kwarg("db", String::from("pg"))).unwrap(), "using pg");
//! ```

mod error;
mod global;
mod injector;
mod macros;
pub mod mock;
mod provider;
mod registry;
pub mod signature;
mod value;

pub use error::{Error, Result};
pub use global::global;
pub use injector::{function, inject, Args, Function, Injectable, Injected};
pub use mock::{Mock, MockInjector, MockSet};
pub use provider::{Named, Provider};
pub use registry::{is_valid_profile_name, ProfileGuard, Registry, RegistryConfig, Scope};
pub use signature::{BoundArgs, Inspect, Param, Signature};
pub use value::Value;
