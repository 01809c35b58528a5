//! Logging setup for the `cleopattes` binary

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter, or the debug filter when `verbose`
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "cleopattes=debug"
    } else {
        "cleopattes=info"
    }
}

/// Install a compact stderr subscriber
///
/// `RUST_LOG` takes precedence over the default filter.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(false), "cleopattes=info");
        assert_eq!(default_filter(true), "cleopattes=debug");
    }
}
