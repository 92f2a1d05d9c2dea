//! The provider registry: default providers, profile overrides and the active profile.

use crate::error::Result;
use crate::injector::{inject, Args, Injectable};
use crate::provider::{Named, Provider};
use crate::value::Value;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// Where a registration is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
  Default,
  Profile(String),
}

/// Registry behaviour that applications may want to tune.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RegistryConfig {
  /// When a provider is registered under an active profile and no default of
  /// that name exists yet, also store it as the default.
  pub promote_to_defaults: bool,
  /// Profile active right after construction. Invalid names are ignored.
  pub initial_profile: Option<String>,
}

/// Holds every registered provider.
///
/// Registration is additive; names are unique per scope and the last write
/// wins. A name may exist both as a default and inside any number of profile
/// buckets, in which case the bucket of the active profile takes precedence.
pub struct Registry {
  config: RegistryConfig,
  defaults: DashMap<String, Provider>,
  profiles: DashMap<String, HashMap<String, Provider>>,
  current_profile: RwLock<Option<String>>,
}

impl Default for Registry {
  fn default() -> Self {
    Self::with_config(RegistryConfig::default())
  }
}

/// Returns `true` for non-empty names made of ASCII alphanumerics, `_`, `-` or `.`.
pub fn is_valid_profile_name(name: &str) -> bool {
  !name.is_empty()
    && name
      .chars()
      .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

fn valid_profile(profile: Option<&str>) -> Option<&str> {
  profile.filter(|p| is_valid_profile_name(p))
}

impl Registry {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_config(config: RegistryConfig) -> Self {
    let initial = config
      .initial_profile
      .clone()
      .filter(|name| is_valid_profile_name(name));
    Self {
      config,
      defaults: DashMap::new(),
      profiles: DashMap::new(),
      current_profile: RwLock::new(initial),
    }
  }

  pub fn config(&self) -> &RegistryConfig {
    &self.config
  }

  // --- Registration ---

  /// Registers `provider` under `name`, honouring the active profile.
  ///
  /// Without an active profile the provider becomes the default for `name`.
  /// With one, it goes into that profile's bucket, and into the defaults as
  /// well only if [`RegistryConfig::promote_to_defaults`] is set and no
  /// default exists yet.
  pub fn register(&self, name: impl Into<String>, provider: impl Into<Provider>) {
    let name = name.into();
    let provider = provider.into();
    match self.current_profile() {
      None => self.register_in(Scope::Default, name, provider),
      Some(profile) => {
        if self.config.promote_to_defaults && !self.defaults.contains_key(&name) {
          self.register_in(Scope::Default, name.clone(), provider.clone());
        }
        self.register_in(Scope::Profile(profile), name, provider);
      }
    }
  }

  /// Registers `provider` into an explicit scope, ignoring the active profile.
  ///
  /// A [`Scope::Profile`] whose name is rejected by [`is_valid_profile_name`]
  /// means "no profile", so the provider is written to the defaults.
  pub fn register_in(&self, scope: Scope, name: impl Into<String>, provider: impl Into<Provider>) {
    let name = name.into();
    let provider = provider.into();
    match scope {
      Scope::Profile(profile) if is_valid_profile_name(&profile) => {
        tracing::trace!(name = %name, profile = %profile, kind = provider.kind(), "registering profile provider");
        self.profiles.entry(profile).or_default().insert(name, provider);
      }
      Scope::Profile(profile) => {
        tracing::debug!(name = %name, profile = %profile, "invalid profile name, registering as default");
        self.defaults.insert(name, provider);
      }
      Scope::Default => {
        tracing::trace!(name = %name, kind = provider.kind(), "registering default provider");
        self.defaults.insert(name, provider);
      }
    }
  }

  /// Registers a value under the name it reports through [`Named`].
  pub fn register_named<T: Named + Any + Send + Sync>(&self, value: T) {
    self.register_named_arc(Arc::new(value));
  }

  pub fn register_named_arc<T: Named + Any + Send + Sync>(&self, value: Arc<T>) {
    let name = value.provider_name().to_owned();
    self.register(name, Provider::instance_arc(value));
  }

  pub fn register_all<N, P, I>(&self, providers: I)
  where
    N: Into<String>,
    P: Into<Provider>,
    I: IntoIterator<Item = (N, P)>,
  {
    for (name, provider) in providers {
      self.register(name, provider);
    }
  }

  // --- Profiles ---

  /// Sets the active profile and returns the previous one.
  ///
  /// `None` or a name rejected by [`is_valid_profile_name`] clears the active
  /// profile instead of failing.
  pub fn set_profile(&self, name: Option<&str>) -> Option<String> {
    let next = match name {
      Some(n) if is_valid_profile_name(n) => Some(n.to_owned()),
      Some(n) => {
        tracing::debug!(profile = %n, "invalid profile name, clearing active profile");
        return std::mem::take(&mut *self.current_profile.write());
      }
      None => None,
    };
    tracing::debug!(profile = ?next, "active profile changed");
    std::mem::replace(&mut *self.current_profile.write(), next)
  }

  pub fn current_profile(&self) -> Option<String> {
    self.current_profile.read().clone()
  }

  /// Activates `name` until the returned guard is dropped, then restores
  /// whatever profile was active before.
  pub fn activate(&self, name: &str) -> ProfileGuard<'_> {
    let previous = self.set_profile(Some(name));
    ProfileGuard {
      registry: self,
      previous,
    }
  }

  /// Names of every profile that has at least one registration, taken as a
  /// snapshot when called.
  pub fn profiles(&self) -> impl Iterator<Item = String> {
    let names: Vec<String> = self.profiles.iter().map(|e| e.key().clone()).collect();
    names.into_iter()
  }

  // --- Reads ---

  /// A copy of the default providers. Mutating it does not touch the registry.
  pub fn providers(&self) -> HashMap<String, Provider> {
    self
      .defaults
      .iter()
      .map(|e| (e.key().clone(), e.value().clone()))
      .collect()
  }

  /// A snapshot of every profile bucket.
  pub fn profile_providers(&self) -> HashMap<String, HashMap<String, Provider>> {
    self
      .profiles
      .iter()
      .map(|e| (e.key().clone(), e.value().clone()))
      .collect()
  }

  /// The defaults overlaid with the bucket of `profile`, if it has one.
  ///
  /// An invalid profile name is treated as `None`.
  pub fn merged_providers(&self, profile: Option<&str>) -> HashMap<String, Provider> {
    let mut merged = self.providers();
    if let Some(bucket) = valid_profile(profile).and_then(|p| self.profiles.get(p)) {
      merged.extend(bucket.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    merged
  }

  /// Resolves `name` against the active profile.
  pub fn resolve(&self, name: &str) -> Option<Value> {
    self.resolve_in(self.current_profile().as_deref(), name)
  }

  /// Resolves `name` against an explicitly given profile. An invalid profile
  /// name is treated as `None`.
  pub fn resolve_in(&self, profile: Option<&str>, name: &str) -> Option<Value> {
    let provider = valid_profile(profile)
      .and_then(|p| self.profiles.get(p))
      .and_then(|bucket| bucket.get(name).cloned())
      .or_else(|| self.defaults.get(name).map(|p| p.value().clone()))?;
    Some(provider.resolve())
  }

  pub fn get<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
    self.resolve(name)?.downcast::<T>()
  }

  // --- Calls ---

  /// Injects and calls `function` in one step.
  pub fn invoke<F: Injectable>(&self, function: F, args: Args) -> Result<F::Output> {
    inject(self, function).call(args)
  }

  /// Drops every provider and clears the active profile.
  pub fn reset(&self) {
    self.defaults.clear();
    self.profiles.clear();
    *self.current_profile.write() = None;
    tracing::debug!("registry reset");
  }
}

/// Restores the previously active profile when dropped.
#[must_use = "the profile is restored as soon as the guard is dropped"]
pub struct ProfileGuard<'a> {
  registry: &'a Registry,
  previous: Option<String>,
}

impl Drop for ProfileGuard<'_> {
  fn drop(&mut self) {
    *self.registry.current_profile.write() = self.previous.take();
  }
}
