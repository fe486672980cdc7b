// storefront/src/telemetry.rs

use std::env;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

/// Installs the global fmt subscriber. `RUST_LOG` overrides the default `info`
/// filter; `LOG_FORMAT=json` switches to one JSON object per line.
pub fn init() {
  let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let builder = tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_target(true)
    .with_span_events(FmtSpan::CLOSE); // Log when spans close, showing duration

  if json_requested(env::var("LOG_FORMAT").ok().as_deref()) {
    builder.json().init();
  } else {
    builder.init();
  }
}

fn json_requested(format: Option<&str>) -> bool {
  format.is_some_and(|f| f.trim().eq_ignore_ascii_case("json"))
}
