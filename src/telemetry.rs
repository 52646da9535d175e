//! Tracing setup for hosts embedding the bridge.
//!
//! The bridge emits `tracing` events at its decision points (deferred calls,
//! dropped payloads, ignored readiness signals) but never installs a
//! subscriber on its own. Hosts either wire their own subscriber or enable
//! the `telemetry` feature and call [`init_default_tracing`].

/// Directive applied when `RUST_LOG` is unset: bridge events at `info`,
/// everything else silent.
#[cfg(feature = "telemetry")]
pub const DEFAULT_DIRECTIVE: &str = "molbridge=info";

/// Installs a compact `tracing-subscriber` scoped to the bridge's events.
///
/// `RUST_LOG` overrides the default directive. Returns `true` when the
/// subscriber was installed; `false` when the feature is disabled or the
/// host already set a global subscriber.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_DIRECTIVE));

        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
