// Tracing setup. The filter starts at a bootstrap level and is swapped for the
// configured one once the config file has been read.
use std::sync::OnceLock;
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

/// Level used until the configuration is loaded.
pub const BOOTSTRAP_LOG_LEVEL: &str = "info";

static LOG_RELOAD_HANDLE: OnceLock<reload::Handle<EnvFilter, tracing_subscriber::Registry>> =
    OnceLock::new();

/// Installs the global subscriber. RUST_LOG, when set, wins over
/// [`BOOTSTRAP_LOG_LEVEL`] and over any later [`apply_logging_level`].
pub fn init_tracing() {
    let base_filter = if std::env::var_os("RUST_LOG").is_some() {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| filter_for(BOOTSTRAP_LOG_LEVEL))
    } else {
        filter_for(BOOTSTRAP_LOG_LEVEL)
    };

    let (reload_layer, handle) = reload::Layer::new(base_filter);
    let _ = LOG_RELOAD_HANDLE.set(handle);

    let _ = tracing_subscriber::registry()
        .with(reload_layer)
        .with(fmt::layer())
        .try_init();
}

/// Switches to the configured logging level, unless RUST_LOG is set.
pub fn apply_logging_level(level: &str) {
    if std::env::var_os("RUST_LOG").is_some() {
        return;
    }
    if let Some(handle) = LOG_RELOAD_HANDLE.get() {
        let filter = filter_for(level);
        if let Err(err) = handle.modify(|f| *f = filter) {
            tracing::warn!(%err, level, "failed to apply logging level");
        }
    }
}

/// Filter for `level`, falling back to the bootstrap level when it does not parse.
fn filter_for(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|err| {
        eprintln!("Warning: invalid logging level '{level}': {err}");
        EnvFilter::new(BOOTSTRAP_LOG_LEVEL)
    })
}
