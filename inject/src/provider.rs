//! Provider variants stored in the registry.

use crate::value::Value;
use once_cell::sync::OnceCell;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

type FactoryFn = Arc<dyn Fn() -> Value + Send + Sync>;

/// How a registered name produces its value.
///
/// The variant is chosen when the provider is built, so resolution never has
/// to probe a value to find out whether it is callable.
#[derive(Clone)]
pub enum Provider {
  /// An eagerly built value, handed out as is.
  Instance(Value),
  /// A factory run on first resolution. Every clone of the provider shares the
  /// same cell, so the factory runs at most once.
  Singleton {
    cell: Arc<OnceCell<Value>>,
    factory: FactoryFn,
  },
  /// A factory run on every resolution.
  Factory(FactoryFn),
}

impl Provider {
  pub fn instance<T: Any + Send + Sync>(value: T) -> Self {
    Provider::Instance(Value::new(value))
  }

  pub fn instance_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
    Provider::Instance(Value::from_arc(value))
  }

  pub fn singleton<T: Any + Send + Sync>(factory: impl Fn() -> T + Send + Sync + 'static) -> Self {
    Provider::Singleton {
      cell: Arc::new(OnceCell::new()),
      factory: Arc::new(move || Value::new(factory())),
    }
  }

  pub fn factory<T: Any + Send + Sync>(factory: impl Fn() -> T + Send + Sync + 'static) -> Self {
    Provider::Factory(Arc::new(move || Value::new(factory())))
  }

  /// Produces the value this provider stands for.
  pub fn resolve(&self) -> Value {
    match self {
      Provider::Instance(value) => value.clone(),
      Provider::Singleton { cell, factory } => cell.get_or_init(|| factory()).clone(),
      Provider::Factory(factory) => factory(),
    }
  }

  pub fn kind(&self) -> &'static str {
    match self {
      Provider::Instance(_) => "instance",
      Provider::Singleton { .. } => "singleton",
      Provider::Factory(_) => "factory",
    }
  }
}

impl fmt::Debug for Provider {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Provider::Instance(value) => f.debug_tuple("Instance").field(value).finish(),
      Provider::Singleton { cell, .. } => f
        .debug_struct("Singleton")
        .field("initialized", &cell.get().is_some())
        .finish(),
      Provider::Factory(_) => f.write_str("Factory"),
    }
  }
}

impl From<Value> for Provider {
  fn from(value: Value) -> Self {
    Provider::Instance(value)
  }
}

/// Something that carries its own registration name.
pub trait Named {
  fn provider_name(&self) -> &str;
}
