use fibre_inject::{Provider, Registry, RegistryConfig, Scope};
use pretty_assertions::assert_eq;

fn text(registry: &Registry, name: &str) -> Option<String> {
  registry.get::<String>(name).map(|v| (*v).clone())
}

#[test]
fn test_profile_override_takes_precedence() {
  // Arrange
  let registry = Registry::new();
  registry.register("name", Provider::instance("A".to_string()));
  registry.set_profile(Some("p"));
  registry.register("name", Provider::instance("B".to_string()));

  // Act & Assert
  assert_eq!(text(&registry, "name").as_deref(), Some("B"));

  registry.set_profile(None);
  assert_eq!(text(&registry, "name").as_deref(), Some("A"));

  registry.set_profile(Some("other"));
  assert_eq!(text(&registry, "name").as_deref(), Some("A"));
}

#[test]
fn test_profile_registration_is_not_promoted_by_default() {
  let registry = Registry::new();
  registry.set_profile(Some("test"));
  registry.register("only_in_test", Provider::instance(1i32));

  assert!(registry.resolve("only_in_test").is_some());
  assert!(registry.providers().is_empty());

  registry.set_profile(None);
  assert!(registry.resolve("only_in_test").is_none());
}

#[test]
fn test_promotion_when_configured() {
  let registry = Registry::with_config(RegistryConfig {
    promote_to_defaults: true,
    ..Default::default()
  });
  registry.set_profile(Some("test"));
  registry.register("db", Provider::instance("first".to_string()));
  registry.register("db", Provider::instance("second".to_string()));

  // Only the first registration is promoted; the default already exists after it.
  let promoted = registry.providers()["db"].resolve().downcast::<String>().unwrap();
  assert_eq!(promoted.as_str(), "first");
  assert_eq!(text(&registry, "db").as_deref(), Some("second"));
}

#[test]
fn test_invalid_profile_name_clears_profile() {
  let registry = Registry::new();
  registry.set_profile(Some("dev"));

  let previous = registry.set_profile(Some("not valid!"));

  assert_eq!(previous.as_deref(), Some("dev"));
  assert_eq!(registry.current_profile(), None);

  registry.set_profile(Some("dev"));
  registry.set_profile(Some(""));
  assert_eq!(registry.current_profile(), None);
}

#[test]
fn test_activate_restores_previous_profile() {
  let registry = Registry::new();
  registry.set_profile(Some("outer"));

  {
    let _guard = registry.activate("inner");
    assert_eq!(registry.current_profile().as_deref(), Some("inner"));
  }

  assert_eq!(registry.current_profile().as_deref(), Some("outer"));
}

#[test]
fn test_profiles_lists_buckets() {
  let registry = Registry::new();
  registry.register_in(Scope::Profile("a".into()), "x", Provider::instance(1i32));
  registry.register_in(Scope::Profile("b".into()), "x", Provider::instance(2i32));
  registry.register_in(Scope::Default, "x", Provider::instance(0i32));

  let mut names: Vec<String> = registry.profiles().collect();
  names.sort();

  assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
  assert_eq!(registry.profile_providers()["b"].len(), 1);
}

#[test]
fn test_register_in_ignores_active_profile() {
  let registry = Registry::new();
  let _guard = registry.activate("dev");
  registry.register_in(Scope::Default, "x", Provider::instance(1i32));

  assert_eq!(registry.providers().len(), 1);
  assert!(registry.profile_providers().is_empty());
}

#[test]
fn test_merged_providers_falls_back_without_bucket() {
  let registry = Registry::new();
  registry.register("x", Provider::instance(1i32));

  let merged = registry.merged_providers(Some("missing"));

  assert_eq!(merged.len(), 1);
  assert_eq!(*registry.resolve_in(Some("missing"), "x").unwrap().downcast::<i32>().unwrap(), 1);
}

#[test]
fn test_initial_profile_from_config() {
  let registry = Registry::with_config(RegistryConfig {
    initial_profile: Some("staging".to_string()),
    ..Default::default()
  });
  assert_eq!(registry.current_profile().as_deref(), Some("staging"));

  let rejected = Registry::with_config(RegistryConfig {
    initial_profile: Some("bad name".to_string()),
    ..Default::default()
  });
  assert_eq!(rejected.current_profile(), None);
}

#[test]
fn test_invalid_profile_name_means_no_profile_on_every_path() {
  use fibre_inject::{function, inject, signature, Args};

  // Arrange
  let registry = Registry::new();
  registry.register("db", Provider::instance("sqlite"));
  registry.register_in(Scope::Profile("not valid!".into()), "cache", Provider::instance("redis"));
  registry.register_in(Scope::Profile("test".into()), "db", Provider::instance("mock"));
  let f = inject(
    &registry,
    function(signature!(f(db)), |args| Ok(*args.get::<&str>("db")?)),
  );

  // Act & Assert
  // Registration under an invalid name lands in the defaults.
  assert_eq!(registry.profiles().collect::<Vec<_>>(), vec!["test".to_string()]);
  assert!(registry.providers().contains_key("cache"));

  // Explicitly threaded and ambient profile agree.
  let threaded = f.call_in(Some("not valid!"), Args::new()).unwrap();
  registry.set_profile(Some("not valid!"));
  let ambient = f.call(Args::new()).unwrap();
  assert_eq!(threaded, "sqlite");
  assert_eq!(threaded, ambient);

  assert_eq!(registry.merged_providers(Some("")).len(), 2);
  let resolved = registry.resolve_in(Some("bad name"), "db").unwrap();
  assert_eq!(*resolved.downcast::<&str>().unwrap(), "sqlite");
}
