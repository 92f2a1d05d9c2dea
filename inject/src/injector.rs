//! Wrapping functions so missing arguments are filled from the registry.

use crate::error::Result;
use crate::registry::Registry;
use crate::signature::{bind, create_args_dict, remove_invalid_kwargs, BoundArgs, Inspect, Signature};
use crate::value::Value;
use std::any::Any;
use std::collections::HashMap;
use std::marker::PhantomData;

/// Arguments supplied explicitly by a caller.
#[derive(Debug, Clone, Default)]
pub struct Args {
  positional: Vec<Value>,
  keywords: HashMap<String, Value>,
}

impl Args {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn arg<T: Any + Send + Sync>(self, value: T) -> Self {
    self.arg_value(Value::new(value))
  }

  pub fn arg_value(mut self, value: Value) -> Self {
    self.positional.push(value);
    self
  }

  pub fn kwarg<T: Any + Send + Sync>(self, name: impl Into<String>, value: T) -> Self {
    self.kwarg_value(name, Value::new(value))
  }

  pub fn kwarg_value(mut self, name: impl Into<String>, value: Value) -> Self {
    self.keywords.insert(name.into(), value);
    self
  }

  pub fn positional(&self) -> &[Value] {
    &self.positional
  }

  pub fn keywords(&self) -> &HashMap<String, Value> {
    &self.keywords
  }
}

/// A function the injector can wrap: a declared signature plus a body that
/// runs on bound arguments.
pub trait Injectable: Inspect {
  type Output;

  fn invoke(&self, args: &BoundArgs) -> Result<Self::Output>;
}

impl<T: Injectable + ?Sized> Injectable for &T {
  type Output = T::Output;

  fn invoke(&self, args: &BoundArgs) -> Result<Self::Output> {
    (**self).invoke(args)
  }
}

/// A closure paired with its declared [`Signature`].
pub struct Function<F, O> {
  signature: Signature,
  body: F,
  _output: PhantomData<fn() -> O>,
}

impl<F, O> Function<F, O>
where
  F: Fn(&BoundArgs) -> Result<O>,
{
  pub fn new(signature: Signature, body: F) -> Self {
    Self {
      signature,
      body,
      _output: PhantomData,
    }
  }
}

impl<F: Clone, O> Clone for Function<F, O> {
  fn clone(&self) -> Self {
    Self {
      signature: self.signature.clone(),
      body: self.body.clone(),
      _output: PhantomData,
    }
  }
}

impl<F, O> Inspect for Function<F, O> {
  fn signature(&self) -> &Signature {
    &self.signature
  }
}

impl<F, O> Injectable for Function<F, O>
where
  F: Fn(&BoundArgs) -> Result<O>,
{
  type Output = O;

  fn invoke(&self, args: &BoundArgs) -> Result<O> {
    (self.body)(args)
  }
}

/// Shorthand for [`Function::new`].
pub fn function<F, O>(signature: Signature, body: F) -> Function<F, O>
where
  F: Fn(&BoundArgs) -> Result<O>,
{
  Function::new(signature, body)
}

/// Wraps `function` so that each call fills its missing parameters from `registry`.
pub fn inject<F: Injectable>(registry: &Registry, function: F) -> Injected<'_, F> {
  Injected { registry, function }
}

/// A function bound to the registry it draws providers from.
pub struct Injected<'r, F> {
  registry: &'r Registry,
  function: F,
}

impl<F: Clone> Clone for Injected<'_, F> {
  fn clone(&self) -> Self {
    Self {
      registry: self.registry,
      function: self.function.clone(),
    }
  }
}

impl<'r, F: Injectable> Injected<'r, F> {
  pub fn function(&self) -> &F {
    &self.function
  }

  pub fn registry(&self) -> &'r Registry {
    self.registry
  }

  /// Calls the function, resolving providers against the registry's active profile.
  pub fn call(&self, args: Args) -> Result<F::Output> {
    let profile = self.registry.current_profile();
    self.call_in(profile.as_deref(), args)
  }

  /// Calls the function, resolving providers against `profile` regardless of
  /// which profile the registry has active. An invalid profile name resolves
  /// against the defaults only, as if no profile were given.
  ///
  /// Explicit arguments always win: a provider only fills a parameter the
  /// caller left out. A parameter with neither an argument, a provider nor a
  /// default fails binding with [`crate::Error::MissingArgument`].
  pub fn call_in(&self, profile: Option<&str>, args: Args) -> Result<F::Output> {
    let Args {
      positional,
      mut keywords,
    } = args;
    let providers = self.registry.merged_providers(profile);
    let supplied = create_args_dict(&self.function, &positional);
    let signature = self.function.signature();

    for name in signature.names() {
      if supplied.contains_key(name) || keywords.contains_key(name) {
        continue;
      }
      if let Some(provider) = providers.get(name) {
        tracing::trace!(
          function = signature.function(),
          param = name,
          profile = ?profile,
          "injecting provider"
        );
        keywords.insert(name.to_owned(), provider.resolve());
      }
    }

    remove_invalid_kwargs(&self.function, &positional, &mut keywords);
    let bound = bind(signature, positional, keywords)?;
    self.function.invoke(&bound)
  }
}
