use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter directive (e.g. `debug`)
pub const LOG_ENV: &str = "SBOM_LOG";

/// Default filter: warnings only, or this crate at debug when verbose.
///
/// Dependencies stay at `warn` even when verbose so transport internals
/// never reach the log.
pub fn default_directive(verbose: bool) -> String {
    if verbose {
        format!("{}=debug,warn", env!("CARGO_CRATE_NAME"))
    } else {
        "warn".to_string()
    }
}

/// Installs the global stderr subscriber.
///
/// `SBOM_LOG` overrides the default filter. Returns `false` when a subscriber
/// was already installed.
pub fn init_tracing(verbose: bool) -> bool {
    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
