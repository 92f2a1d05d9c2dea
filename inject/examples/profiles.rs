use fibre_inject::{function, inject, provide, signature, Args, Provider, Registry};
use tracing_subscriber::EnvFilter;

struct Database {
  url: String,
}

fn main() {
  // RUST_LOG=fibre_inject=trace shows every registration and injected parameter.
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let registry = Registry::new();

  // --- Registration ---
  // Defaults first, then overrides for the "test" profile.
  registry.register(
    "db",
    Provider::singleton(|| Database {
      url: "postgres://prod".to_string(),
    }),
  );
  provide!(registry, region = "eu-west-1");
  {
    let _test = registry.activate("test");
    registry.register(
      "db",
      Provider::instance(Database {
        url: "sqlite://memory".to_string(),
      }),
    );
  }

  // --- Injection ---
  let describe = inject(
    &registry,
    function(signature!(describe(db, region)), |args| {
      let db = args.get::<Database>("db")?;
      let region = args.get::<&str>("region")?;
      Ok(format!("{} in {}", db.url, region))
    }),
  );

  let prod = describe.call(Args::new()).expect("default providers resolve");
  let test = describe
    .call_in(Some("test"), Args::new())
    .expect("test profile resolves");
  let pinned = describe
    .call(Args::new().kwarg("region", "us-east-1"))
    .expect("explicit argument wins");

  println!("{}", prod);
  println!("{}", test);
  println!("{}", pinned);

  assert_eq!(prod, "postgres://prod in eu-west-1");
  assert_eq!(test, "sqlite://memory in eu-west-1");
  assert_eq!(pinned, "postgres://prod in us-east-1");
}
