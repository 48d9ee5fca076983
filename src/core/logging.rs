//! TV-005: Diagnostic routing.
//!
//! All diagnostics go through `tracing`. With `--verbose` they land on stderr
//! (filtered by `RUST_LOG`, default `debug`); otherwise the filter is `off` and
//! the writer is a sink. Stdout is reserved for command results.

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// Build the subscriber for the given verbosity.
pub fn subscriber(verbose: bool) -> impl tracing::Subscriber + Send + Sync {
    let (filter, writer) = if verbose {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        (filter, BoxMakeWriter::new(std::io::stderr))
    } else {
        (EnvFilter::new("off"), BoxMakeWriter::new(std::io::sink))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(false)
        .finish()
}

/// Install the process-wide subscriber. Returns false if one was already set.
pub fn init(verbose: bool) -> bool {
    tracing::subscriber::set_global_default(subscriber(verbose)).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tv005_quiet_subscriber_disables_warn() {
        let sub = subscriber(false);
        tracing::subscriber::with_default(sub, || {
            assert!(!tracing::enabled!(tracing::Level::WARN));
            assert!(!tracing::enabled!(tracing::Level::ERROR));
        });
    }

    #[test]
    fn test_tv005_verbose_subscriber_enables_warn() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let sub = subscriber(true);
        tracing::subscriber::with_default(sub, || {
            assert!(tracing::enabled!(tracing::Level::WARN));
        });
    }
}
