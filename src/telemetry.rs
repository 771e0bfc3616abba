//! Opt-in tracing setup for hosts embedding `plotcore`.
//!
//! The library only emits `tracing` events. Hosts that already run a
//! subscriber need nothing from here.

/// Filter used when `RUST_LOG` is unset: warnings from dependencies, model
/// mutations and dispatch decisions from this crate.
pub const DEFAULT_FILTER: &str = "warn,plotcore=info";

/// Installs a compact fmt subscriber filtered by `RUST_LOG` or `DEFAULT_FILTER`.
///
/// Returns `false` without the `telemetry` feature or when a global
/// subscriber is already set.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing_with_filter(DEFAULT_FILTER)
}

/// Like `init_default_tracing`, with `fallback` used when `RUST_LOG` is unset or invalid.
#[must_use]
pub fn init_tracing_with_filter(fallback: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback;
        false
    }
}

#[cfg(test)]
mod tests {
    use super::init_tracing_with_filter;

    #[cfg(not(feature = "telemetry"))]
    #[test]
    fn nothing_is_installed_without_the_feature() {
        assert!(!init_tracing_with_filter("trace"));
    }

    #[cfg(feature = "telemetry")]
    #[test]
    fn second_installation_is_refused() {
        let _ = init_tracing_with_filter("off");
        assert!(!init_tracing_with_filter("off"));
    }
}
