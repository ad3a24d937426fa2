use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    util::TryInitError,
    EnvFilter,
};

/// Install the global tracing subscriber
///
/// Honours `RUST_LOG` and falls back to `info`. Fails if a global subscriber
/// is already set.
pub fn init_tracing() -> Result<(), TryInitError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer()
            .with_span_events(FmtSpan::CLOSE)
            .with_target(false)
            .with_timer(fmt::time::uptime())
            .with_writer(std::io::stderr))
        .with(env_filter)
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails() {
        let _ = init_tracing();
        assert!(init_tracing().is_err());
    }
}
