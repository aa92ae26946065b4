//! Telemetry helpers for applications embedding `heatline`.
//!
//! The engine only emits `tracing` events; installing a subscriber is left to
//! the host unless it opts into the `telemetry` feature.

/// Initializes a compact `tracing` subscriber filtered by `RUST_LOG`.
///
/// Returns `false` when the `telemetry` feature is disabled or when the host
/// application already installed a global subscriber.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("heatline=info"));

        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
