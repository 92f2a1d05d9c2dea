//! Declared function signatures and the argument inspection helpers built on them.
//!
//! Rust cannot list a closure's parameter names at runtime, so injectable
//! functions carry a [`Signature`] describing them. Everything that needs to
//! know "which parameters does this function take" goes through [`Inspect`].

use crate::error::{Error, Result};
use crate::value::Value;
use std::any::{type_name, Any};
use std::collections::HashMap;
use std::sync::Arc;

/// A single declared parameter.
#[derive(Debug, Clone)]
pub struct Param {
  name: String,
  default: Option<Value>,
}

impl Param {
  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn default(&self) -> Option<&Value> {
    self.default.as_ref()
  }
}

/// The declared shape of an injectable function.
#[derive(Debug, Clone)]
pub struct Signature {
  function: String,
  params: Vec<Param>,
  extra_positional: bool,
  extra_keywords: bool,
}

impl Signature {
  pub fn new(function: impl Into<String>) -> Self {
    Self {
      function: function.into(),
      params: Vec::new(),
      extra_positional: false,
      extra_keywords: false,
    }
  }

  /// Declares a required parameter.
  pub fn param(mut self, name: impl Into<String>) -> Self {
    self.params.push(Param {
      name: name.into(),
      default: None,
    });
    self
  }

  /// Declares a parameter that falls back to `default` when neither the
  /// caller nor a provider supplies it.
  pub fn param_with_default<T: Any + Send + Sync>(mut self, name: impl Into<String>, default: T) -> Self {
    self.params.push(Param {
      name: name.into(),
      default: Some(Value::new(default)),
    });
    self
  }

  /// Accepts positional values beyond the declared parameters.
  pub fn extra_positional(mut self) -> Self {
    self.extra_positional = true;
    self
  }

  /// Accepts keyword arguments that match no declared parameter.
  pub fn extra_keywords(mut self) -> Self {
    self.extra_keywords = true;
    self
  }

  pub fn function(&self) -> &str {
    &self.function
  }

  pub fn params(&self) -> &[Param] {
    &self.params
  }

  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.params.iter().map(|p| p.name.as_str())
  }

  pub fn has_param(&self, name: &str) -> bool {
    self.params.iter().any(|p| p.name == name)
  }

  pub fn accepts_extra_positional(&self) -> bool {
    self.extra_positional
  }

  pub fn accepts_extra_keywords(&self) -> bool {
    self.extra_keywords
  }
}

/// Anything whose parameters can be inspected.
pub trait Inspect {
  fn signature(&self) -> &Signature;
}

impl Inspect for Signature {
  fn signature(&self) -> &Signature {
    self
  }
}

impl<T: Inspect + ?Sized> Inspect for &T {
  fn signature(&self) -> &Signature {
    (**self).signature()
  }
}

/// Ordered parameter names plus whether arbitrary keywords are accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgSpec {
  pub names: Vec<String>,
  pub accepts_extra_keywords: bool,
}

pub fn spec(callable: &impl Inspect) -> ArgSpec {
  let signature = callable.signature();
  ArgSpec {
    names: signature.names().map(str::to_owned).collect(),
    accepts_extra_keywords: signature.accepts_extra_keywords(),
  }
}

/// Maps declared parameter names to the positional values that fill them.
///
/// Positional values past the last declared parameter are left out of the
/// map; they still reach the call itself.
pub fn create_args_dict(callable: &impl Inspect, positional: &[Value]) -> HashMap<String, Value> {
  callable
    .signature()
    .names()
    .zip(positional.iter())
    .map(|(name, value)| (name.to_owned(), value.clone()))
    .collect()
}

/// Drops keyword arguments that would make the call fail.
///
/// A keyword naming a parameter already filled positionally is removed. Unless
/// the callable accepts extra keywords, so is any keyword that names no
/// declared parameter.
pub fn remove_invalid_kwargs(
  callable: &impl Inspect,
  positional: &[Value],
  kwargs: &mut HashMap<String, Value>,
) {
  if kwargs.is_empty() {
    return;
  }
  let signature = callable.signature();
  for name in signature.names().take(positional.len()) {
    kwargs.remove(name);
  }
  if !signature.accepts_extra_keywords() {
    kwargs.retain(|name, _| signature.has_param(name));
  }
}

/// Arguments after binding, keyed by parameter name.
#[derive(Debug, Clone)]
pub struct BoundArgs {
  function: String,
  values: HashMap<String, Value>,
  extra_positional: Vec<Value>,
  extra_keywords: HashMap<String, Value>,
}

impl BoundArgs {
  pub fn function(&self) -> &str {
    &self.function
  }

  pub fn value(&self, name: &str) -> Result<&Value> {
    self.values.get(name).ok_or_else(|| Error::UnknownParameter {
      param: name.to_owned(),
    })
  }

  /// Reads a parameter as `T`, failing with [`Error::TypeMismatch`] if the
  /// bound value has a different type.
  pub fn get<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>> {
    let value = self.value(name)?;
    value.downcast::<T>().ok_or_else(|| Error::TypeMismatch {
      param: name.to_owned(),
      expected: type_name::<T>(),
      found: value.type_name(),
    })
  }

  pub fn contains(&self, name: &str) -> bool {
    self.values.contains_key(name)
  }

  pub fn extra_positional(&self) -> &[Value] {
    &self.extra_positional
  }

  pub fn extra_keywords(&self) -> &HashMap<String, Value> {
    &self.extra_keywords
  }
}

/// Binds call arguments to a signature the way a call would.
///
/// Positional values fill parameters in order, keywords fill the rest by
/// name, and declared defaults fill whatever is left.
pub fn bind(
  signature: &Signature,
  positional: Vec<Value>,
  mut keywords: HashMap<String, Value>,
) -> Result<BoundArgs> {
  let declared = signature.params().len();
  if positional.len() > declared && !signature.accepts_extra_positional() {
    return Err(Error::TooManyPositional {
      function: signature.function().to_owned(),
      expected: declared,
      given: positional.len(),
    });
  }

  let mut positional = positional.into_iter();
  let mut values = HashMap::with_capacity(declared);

  for param in signature.params() {
    let from_keyword = keywords.remove(param.name());
    let value = match positional.next() {
      Some(value) => {
        if from_keyword.is_some() {
          return Err(Error::DuplicateArgument {
            function: signature.function().to_owned(),
            param: param.name().to_owned(),
          });
        }
        value
      }
      None => match from_keyword.or_else(|| param.default().cloned()) {
        Some(value) => value,
        None => {
          return Err(Error::MissingArgument {
            function: signature.function().to_owned(),
            param: param.name().to_owned(),
          })
        }
      },
    };
    values.insert(param.name().to_owned(), value);
  }

  if !signature.accepts_extra_keywords() {
    if let Some(name) = keywords.keys().min() {
      return Err(Error::UnexpectedKeyword {
        function: signature.function().to_owned(),
        param: name.clone(),
      });
    }
  }

  Ok(BoundArgs {
    function: signature.function().to_owned(),
    values,
    extra_positional: positional.collect(),
    extra_keywords: keywords,
  })
}
