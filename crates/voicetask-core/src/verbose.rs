//! Logging setup for voicetask binaries.
//!
//! Use `init_tracing(verbose)` once at startup; `set_verbose`/`is_verbose`
//! let other code ask whether extra diagnostics were requested.

use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::EnvFilter;

static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Enable or disable verbose logging
pub fn set_verbose(enabled: bool) {
    VERBOSE.store(enabled, Ordering::SeqCst);
}

/// Check if verbose logging is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

/// Default filter directive for the given verbosity.
fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "warn,voicetask=debug,voicetask_core=debug"
    } else {
        "warn"
    }
}

/// Install the global tracing subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence over the verbosity flag. Calling this more
/// than once leaves the first subscriber in place.
pub fn init_tracing(verbose: bool) {
    set_verbose(verbose);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_directive_enables_debug_for_our_crates() {
        assert!(default_directive(true).contains("voicetask_core=debug"));
        assert_eq!(default_directive(false), "warn");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_tracing(false);
        init_tracing(true);
        assert!(is_verbose());
    }
}
