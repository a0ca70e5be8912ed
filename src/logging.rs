//! Logging setup.
//!
//! Uses tracing with `RUST_LOG`-style filtering. Output goes to stderr so it
//! never mixes with command output on stdout.

use std::io::IsTerminal;
use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize logging for the CLI.
///
/// `RUST_LOG` wins if set; otherwise the filter comes from the verbosity and
/// quiet flags.
pub fn init_logging(verbosity: u8, quiet: bool) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter(verbosity, quiet)))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbosity > 1)
        .with_level(true)
        .without_time()
        .with_ansi(std::io::stderr().is_terminal());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;
    Ok(())
}

fn default_filter(verbosity: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbosity {
        0 => "taskboard=warn",
        1 => "taskboard=info",
        2 => "taskboard=debug",
        _ => "taskboard=trace",
    }
}

/// Initialize logging for tests with the test writer.
pub fn init_test_logging() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("taskboard=debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_overrides_verbosity() {
        assert_eq!(default_filter(3, true), "error");
    }

    #[test]
    fn verbosity_levels() {
        assert_eq!(default_filter(0, false), "taskboard=warn");
        assert_eq!(default_filter(1, false), "taskboard=info");
        assert_eq!(default_filter(2, false), "taskboard=debug");
        assert_eq!(default_filter(9, false), "taskboard=trace");
    }
}
