//! Logging setup for the `codeknowl` binary: a stderr `fmt` subscriber with
//! RFC3339 timestamps, filtered by `CODEKNOWL_LOG`.

use std::io::{self, IsTerminal};

use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding an `EnvFilter` directive string.
pub const LOG_ENV_VAR: &str = "CODEKNOWL_LOG";

/// RFC3339 UTC timer implemented via `chrono`.
/// Example output: `2026-10-17T10:20:30Z`
#[derive(Clone, Debug, Default)]
struct ChronoRfc3339Utc;

impl FormatTime for ChronoRfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        let s = now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        w.write_str(&s)
    }
}

/// Default filter for a `-v` count: warnings only, then info, then debug
/// for the CodeKnowl crates.
pub fn default_directives(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "warn,codeknowl_client=info,codeknowl_ext=info",
        _ => "warn,codeknowl_client=debug,codeknowl_ext=debug",
    }
}

/// Install the global subscriber. Events go to stderr so stdout stays
/// reserved for the output channel. `CODEKNOWL_LOG` overrides `default`.
///
/// A second call is a no-op.
pub fn init(default: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(default));

    let layer = fmt::layer()
        .with_writer(io::stderr)
        .with_timer(ChronoRfc3339Utc)
        .with_level(true)
        .with_target(true)
        .with_ansi(io::stderr().is_terminal())
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init();
}
