//! Opt-in tracing setup.
//!
//! The library only emits `tracing` events; it never installs a subscriber
//! on its own. Hosts that do not already carry one can call
//! [`init_default_tracing`] behind the `telemetry` feature.

/// Installs a compact stderr subscriber filtered by `RUST_LOG`, falling
/// back to `info` with debug-level events from this crate.
///
/// Returns `false` when the feature is off or a global subscriber is
/// already registered, so calling it from library consumers is harmless.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info,plotkit=debug"));
        return tracing_subscriber::fmt()
            .compact()
            .with_target(false)
            .with_env_filter(filter)
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
