//! Logging setup
//!
//! Events go to stderr so command output on stdout stays pipeable.
//! `RUST_LOG` always wins over the level chosen here.

use tracing_subscriber::{fmt, EnvFilter};

/// Level used when neither flags, config nor `RUST_LOG` say otherwise
pub const DEFAULT_LEVEL: &str = "warn";

/// Pick the filter directive from the command-line flags and configuration
pub fn level_for(verbose: bool, quiet: bool, configured: Option<&str>) -> String {
    if verbose {
        "debug".to_string()
    } else if quiet {
        "error".to_string()
    } else {
        configured
            .map(str::trim)
            .filter(|level| !level.is_empty())
            .unwrap_or(DEFAULT_LEVEL)
            .to_string()
    }
}

/// Install the global subscriber. Calling it twice is harmless.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        assert_eq!(level_for(true, false, Some("info")), "debug");
        assert_eq!(level_for(false, true, Some("info")), "error");
        assert_eq!(level_for(false, false, Some("info")), "info");
    }

    #[test]
    fn test_default_level() {
        assert_eq!(level_for(false, false, None), "warn");
        assert_eq!(level_for(false, false, Some("  ")), "warn");
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init("not a valid [filter");
        init("debug");
    }
}
