//! Stand-in providers for tests.
//!
//! A [`Mock`] is a bag of named members: attributes holding a value and
//! methods that answer calls with a canned value, a closure or a raised
//! error. [`MockInjector`] registers a set of mocks into a [`Registry`] so
//! injected functions receive them in place of the real providers.

use crate::error::{Error, Result};
use crate::provider::{Named, Provider};
use crate::registry::{is_valid_profile_name, Registry, Scope};
use crate::value::Value;
use parking_lot::Mutex;
use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type Handler = Arc<dyn Fn(&[Value]) -> Result<Value> + Send + Sync>;

enum Member {
  Attribute(Value),
  Method(Handler),
}

pub struct Mock {
  name: String,
  members: HashMap<String, Member>,
  calls: Mutex<HashMap<String, Vec<Vec<Value>>>>,
}

impl Mock {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      members: HashMap::new(),
      calls: Mutex::new(HashMap::new()),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn attribute<T: Any + Send + Sync>(mut self, name: impl Into<String>, value: T) -> Self {
    self.members.insert(name.into(), Member::Attribute(Value::new(value)));
    self
  }

  /// Adds a method that returns `value` whatever it is called with.
  pub fn method<T: Any + Send + Sync>(self, name: impl Into<String>, value: T) -> Self {
    let value = Value::new(value);
    self.handler(name, move |_| Ok(value.clone()))
  }

  /// Adds a method that fails every call with [`Error::Raised`].
  pub fn raises(self, name: impl Into<String>, message: impl Into<String>) -> Self {
    let name = name.into();
    let origin = format!("{}.{}", self.name, name);
    let message = message.into();
    self.handler(name, move |_| Err(Error::raised(origin.clone(), message.clone())))
  }

  pub fn handler<F>(mut self, name: impl Into<String>, handler: F) -> Self
  where
    F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
  {
    self.members.insert(name.into(), Member::Method(Arc::new(handler)));
    self
  }

  pub fn has(&self, member: &str) -> bool {
    self.members.contains_key(member)
  }

  pub fn has_method(&self, member: &str) -> bool {
    matches!(self.members.get(member), Some(Member::Method(_)))
  }

  /// Dictionary-style lookup: the attribute's value, or `None` when there is no
  /// attribute by that name. Methods are not values here and also yield
  /// `None`; use [`Mock::has_method`] to tell them apart from absent members
  /// and [`Mock::call`] to invoke them.
  pub fn get(&self, attribute: &str) -> Option<Value> {
    match self.members.get(attribute)? {
      Member::Attribute(value) => Some(value.clone()),
      Member::Method(_) => None,
    }
  }

  /// Attribute-style lookup, typed.
  pub fn attr<T: Any + Send + Sync>(&self, attribute: &str) -> Result<Arc<T>> {
    match self.members.get(attribute) {
      Some(Member::Attribute(value)) => value.downcast::<T>().ok_or_else(|| Error::TypeMismatch {
        param: format!("{}.{}", self.name, attribute),
        expected: type_name::<T>(),
        found: value.type_name(),
      }),
      Some(Member::Method(_)) => Err(Error::TypeMismatch {
        param: format!("{}.{}", self.name, attribute),
        expected: type_name::<T>(),
        found: "method",
      }),
      None => Err(self.missing(attribute)),
    }
  }

  /// Calls a mocked method. Every call is recorded, including failed ones.
  pub fn call(&self, method: &str, args: Vec<Value>) -> Result<Value> {
    let handler = match self.members.get(method) {
      Some(Member::Method(handler)) => handler.clone(),
      Some(Member::Attribute(_)) => {
        return Err(Error::NotCallable {
          mock: self.name.clone(),
          member: method.to_owned(),
        })
      }
      None => return Err(self.missing(method)),
    };
    let result = handler(args.as_slice());
    self.calls.lock().entry(method.to_owned()).or_default().push(args);
    result
  }

  pub fn call_as<T: Any + Send + Sync>(&self, method: &str, args: Vec<Value>) -> Result<Arc<T>> {
    let value = self.call(method, args)?;
    value.downcast::<T>().ok_or_else(|| Error::TypeMismatch {
      param: format!("{}.{}()", self.name, method),
      expected: type_name::<T>(),
      found: value.type_name(),
    })
  }

  pub fn calls(&self, method: &str) -> Vec<Vec<Value>> {
    self.calls.lock().get(method).cloned().unwrap_or_default()
  }

  pub fn call_count(&self, method: &str) -> usize {
    self.calls.lock().get(method).map_or(0, Vec::len)
  }

  fn missing(&self, member: &str) -> Error {
    Error::MissingMember {
      mock: self.name.clone(),
      member: member.to_owned(),
    }
  }
}

impl Named for Mock {
  fn provider_name(&self) -> &str {
    &self.name
  }
}

impl fmt::Debug for Mock {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut members: Vec<&str> = self.members.keys().map(String::as_str).collect();
    members.sort_unstable();
    f.debug_struct("Mock")
      .field("name", &self.name)
      .field("members", &members)
      .finish()
  }
}

/// Installs mocks into a registry, by default into its defaults or into a
/// dedicated profile with [`MockInjector::in_profile`].
pub struct MockInjector<'r> {
  registry: &'r Registry,
  profile: Option<String>,
  mocks: Vec<Arc<Mock>>,
}

impl<'r> MockInjector<'r> {
  pub fn new(registry: &'r Registry) -> Self {
    Self {
      registry,
      profile: None,
      mocks: Vec::new(),
    }
  }

  /// Targets the bucket of `profile`. An invalid name falls back to the defaults.
  pub fn in_profile(mut self, profile: &str) -> Self {
    self.profile = Some(profile.to_owned()).filter(|p| is_valid_profile_name(p));
    self
  }

  pub fn with(mut self, mock: Mock) -> Self {
    self.mocks.push(Arc::new(mock));
    self
  }

  /// Registers every mock under its own name and hands back the set for later
  /// assertions.
  pub fn install(self) -> MockSet {
    let scope = match &self.profile {
      Some(profile) => Scope::Profile(profile.clone()),
      None => Scope::Default,
    };
    let mut mocks = HashMap::with_capacity(self.mocks.len());
    for mock in self.mocks {
      tracing::trace!(mock = mock.name(), scope = ?scope, "installing mock");
      self
        .registry
        .register_in(scope.clone(), mock.name(), Provider::instance_arc(mock.clone()));
      mocks.insert(mock.name().to_owned(), mock);
    }
    MockSet {
      profile: self.profile,
      mocks,
    }
  }
}

/// The mocks installed by a [`MockInjector`].
#[derive(Debug)]
pub struct MockSet {
  profile: Option<String>,
  mocks: HashMap<String, Arc<Mock>>,
}

impl MockSet {
  pub fn profile(&self) -> Option<&str> {
    self.profile.as_deref()
  }

  pub fn get(&self, name: &str) -> Option<&Arc<Mock>> {
    self.mocks.get(name)
  }

  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.mocks.keys().map(String::as_str)
  }
}
