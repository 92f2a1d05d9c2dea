use fibre_inject::{function, inject, signature, Args, Error, Mock, MockInjector, Named, Provider, Registry, Value};
use std::sync::Arc;

fn users_db() -> Mock {
  Mock::new("db")
    .attribute("url", "sqlite://memory")
    .method("count", 3usize)
    .raises("drop_table", "permission denied")
    .handler("find", |args| {
      let id = args
        .first()
        .and_then(|v| v.downcast_ref::<u32>())
        .copied()
        .unwrap_or_default();
      Ok(Value::new(format!("user-{id}")))
    })
}

#[test]
fn test_attribute_and_dictionary_lookup() {
  let db = users_db();

  assert_eq!(*db.attr::<&str>("url").unwrap(), "sqlite://memory");
  assert!(db.get("url").is_some());
  // Dictionary-style lookup never fails, it just comes back empty.
  assert!(db.get("nope").is_none());
  assert!(db.get("count").is_none());
  // A method is not a value, but it is not absent either.
  assert!(db.has_method("count"));
  assert!(db.has("count"));
  assert!(!db.has_method("url"));
  assert!(!db.has_method("nope"));
  assert_eq!(
    db.attr::<&str>("nope").unwrap_err(),
    Error::MissingMember {
      mock: "db".into(),
      member: "nope".into()
    }
  );
}

#[test]
fn test_canned_method_ignores_arguments() {
  let db = users_db();

  assert_eq!(*db.call_as::<usize>("count", vec![]).unwrap(), 3);
  assert_eq!(*db.call_as::<usize>("count", vec![Value::new("where")]).unwrap(), 3);
  assert_eq!(db.call_count("count"), 2);
}

#[test]
fn test_raising_method_reports_origin() {
  let db = users_db();

  let err = db.call("drop_table", vec![]).unwrap_err();

  assert_eq!(err, Error::raised("db.drop_table", "permission denied"));
  assert_eq!(err.to_string(), "db.drop_table raised: permission denied");
  assert_eq!(db.call_count("drop_table"), 1);
}

#[test]
fn test_handler_sees_arguments_and_calls_are_recorded() {
  let db = users_db();

  let user = db.call_as::<String>("find", vec![Value::new(42u32)]).unwrap();

  assert_eq!(user.as_str(), "user-42");
  let calls = db.calls("find");
  assert_eq!(calls.len(), 1);
  assert_eq!(calls[0][0].downcast_ref::<u32>(), Some(&42));
}

#[test]
fn test_calling_an_attribute_is_an_error() {
  let db = users_db();

  assert!(matches!(db.call("url", vec![]), Err(Error::NotCallable { .. })));
  assert!(matches!(db.call("missing", vec![]), Err(Error::MissingMember { .. })));
}

#[test]
fn test_mock_injector_replaces_real_provider_in_profile() {
  // Arrange
  struct RealDb;
  let registry = Registry::new();
  registry.register("db", Provider::instance(RealDb));

  let mocks = MockInjector::new(&registry)
    .in_profile("test")
    .with(users_db())
    .install();

  let count = inject(
    &registry,
    function(signature!(count_users(db)), |args| {
      let db = args.get::<Mock>("db")?;
      db.call_as::<usize>("count", vec![]).map(|n| *n)
    }),
  );

  // Act & Assert
  assert_eq!(mocks.profile(), Some("test"));
  assert_eq!(count.call_in(Some("test"), Args::new()).unwrap(), 3);
  assert_eq!(mocks.get("db").unwrap().call_count("count"), 1);

  // Outside the mock profile the real provider is still there.
  assert!(matches!(
    count.call(Args::new()),
    Err(Error::TypeMismatch { ref param, .. }) if param == "db"
  ));
}

#[test]
fn test_mock_injector_into_defaults_and_error_propagation() {
  let registry = Registry::new();
  let mocks = MockInjector::new(&registry).with(users_db()).install();

  let drop = inject(
    &registry,
    function(signature!(drop_users(db)), |args| {
      args.get::<Mock>("db")?.call("drop_table", vec![]).map(|_| ())
    }),
  );

  assert_eq!(mocks.profile(), None);
  assert_eq!(
    drop.call(Args::new()).unwrap_err(),
    Error::raised("db.drop_table", "permission denied")
  );
  assert_eq!(mocks.names().collect::<Vec<_>>(), vec!["db"]);
}

#[test]
fn test_mock_registers_under_its_own_name() {
  let registry = Registry::new();
  let mock = Mock::new("cache").attribute("ttl", 60u64);
  assert_eq!(mock.provider_name(), "cache");

  registry.register_named(mock);

  let cache: Arc<Mock> = registry.get::<Mock>("cache").unwrap();
  assert_eq!(*cache.attr::<u64>("ttl").unwrap(), 60);
}
