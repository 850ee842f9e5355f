//! Log output for map rendering.
//!
//! The crate emits `tracing` events while it loads event and finder chart
//! documents (`info` per load, `warn` per skipped record), composes frames
//! (`debug`) and rasterizes (`warn` on skipped base layers or failed
//! renders). Nothing is printed until a subscriber exists: hosts with their
//! own subscriber need nothing from here.

/// Filter used when `RUST_LOG` is unset: this crate at `info`, the rest at `warn`.
pub const DEFAULT_FILTER: &str = "warn,skymap_rs=info";

/// Installs a compact stderr subscriber honouring `RUST_LOG`, falling back to
/// [`DEFAULT_FILTER`].
///
/// Returns `false` without the `telemetry` feature, or when a global
/// subscriber is already installed.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok()
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
