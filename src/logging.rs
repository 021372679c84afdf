//! tracing setup shared by the hub and the simulator.
//!
//! RUST_LOG always wins. without it we start at info so config loading is
//! visible, then switch to the level named in the config file.

use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter, Registry};

pub const DEFAULT_LEVEL: &str = "info";

/// lets main apply the configured level once the config is known
pub struct LogHandle {
    handle: reload::Handle<EnvFilter, Registry>,
    from_env: bool,
}

pub fn init() -> LogHandle {
    let (filter, from_env) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, true),
        Err(_) => (EnvFilter::new(DEFAULT_LEVEL), false),
    };
    let (filter, handle) = reload::Layer::new(filter);

    // a second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .try_init();

    LogHandle { handle, from_env }
}

impl LogHandle {
    /// switch to `level` unless RUST_LOG was set
    pub fn apply_level(&self, level: &str) {
        if self.from_env {
            return;
        }
        match EnvFilter::try_new(level) {
            Ok(filter) => {
                if let Err(e) = self.handle.reload(filter) {
                    tracing::warn!("[LOGGING] Could not apply level {}: {}", level, e);
                }
            }
            Err(e) => tracing::warn!("[LOGGING] Invalid level {:?}: {}", level, e),
        }
    }
}
