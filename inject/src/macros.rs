//! Public macros for registering providers and declaring signatures.

/// Registers instance providers, using each binding's identifier as its name.
///
/// Registration goes through [`Registry::register`](crate::Registry::register),
/// so the active profile is honoured.
///
/// # Examples
///
/// ```
/// use fibre_inject::{provide, Registry};
///
/// let registry = Registry::new();
/// provide!(registry, db = String::from("sqlite"), retries = 3u32);
///
/// assert_eq!(*registry.get::<String>("db").unwrap(), "sqlite");
/// assert_eq!(*registry.get::<u32>("retries").unwrap(), 3);
/// ```
#[macro_export]
macro_rules! provide {
  ($registry:expr, $($name:ident = $value:expr),+ $(,)?) => {{
    let registry: &$crate::Registry = &$registry;
    $(
      registry.register(stringify!($name), $crate::Provider::instance($value));
    )+
  }};
}

/// Builds a [`Signature`](crate::Signature) from a function-like declaration.
///
/// Parameters may carry a default with `name = expr`.
///
/// # Examples
///
/// ```
/// use fibre_inject::signature;
///
/// let sig = signature!(connect(db, retries = 3u32));
/// assert_eq!(sig.function(), "connect");
/// assert_eq!(sig.names().collect::<Vec<_>>(), ["db", "retries"]);
/// assert!(sig.params()[1].default().is_some());
/// ```
#[macro_export]
macro_rules! signature {
  (@param $sig:expr, $param:ident = $default:expr) => {
    $sig.param_with_default(stringify!($param), $default)
  };
  (@param $sig:expr, $param:ident) => {
    $sig.param(stringify!($param))
  };
  ($function:ident ( $($param:ident $(= $default:expr)?),* $(,)? )) => {{
    let sig = $crate::Signature::new(stringify!($function));
    $(
      let sig = $crate::signature!(@param sig, $param $(= $default)?);
    )*
    sig
  }};
}
