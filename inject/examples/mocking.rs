use fibre_inject::{function, inject, signature, Args, Error, Mock, MockInjector, Registry};

fn main() {
  let registry = Registry::new();

  // Install a stand-in mailer into the "test" profile only.
  let mocks = MockInjector::new(&registry)
    .in_profile("test")
    .with(
      Mock::new("mailer")
        .method("send", true)
        .raises("bounce", "mailbox full"),
    )
    .install();

  let notify = inject(
    &registry,
    function(signature!(notify(mailer)), |args| {
      let mailer = args.get::<Mock>("mailer")?;
      mailer.call_as::<bool>("send", vec![]).map(|sent| *sent)
    }),
  );

  let _test = registry.activate("test");
  let sent = notify.call(Args::new()).expect("mock mailer is injected");
  println!("sent: {}", sent);

  let mailer = mocks.get("mailer").expect("mailer was installed");
  println!("send called {} time(s)", mailer.call_count("send"));

  match mailer.call("bounce", vec![]) {
    Err(Error::Raised { origin, message }) => println!("{} failed: {}", origin, message),
    other => println!("unexpected: {:?}", other.map(|v| v.type_name())),
  }
}
