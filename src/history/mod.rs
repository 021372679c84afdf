//! ==============================================================================
//! history/ - time ordered readings per sensor
//! ==============================================================================
//!
//! purpose:
//!     the source of truth for sensor history. two interchangeable backends:
//!     - memory.rs: bounded fifo per sensor, lost on restart
//!     - postgres.rs: append-only table, survives restarts and outages
//!
//! contract (both backends):
//!     - append never blocks forever; failures surface as StorageUnavailable
//!     - window(id, n) returns at most n readings, oldest first
//!     - unknown or silent sensors give an empty window, not an error
//!
//! ==============================================================================

mod memory;
mod postgres;

pub use memory::MemoryHistory;
pub use postgres::{ConnectionState, PostgresHistory};

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{HistoryBackend, HubConfig};
use crate::domain::Reading;
use crate::error::Result;

#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Stores one reading for its sensor.
    async fn append(&self, reading: &Reading) -> Result<()>;

    /// Up to `limit` most recent readings for `sensor_id`, oldest first.
    async fn window(&self, sensor_id: &str, limit: usize) -> Result<Vec<Reading>>;

    /// Short backend name for health reports.
    fn backend(&self) -> &'static str;

    /// Whether the backend currently holds a live connection.
    async fn is_connected(&self) -> bool;
}

/// pick the backend named in the config
pub fn build_history(config: &HubConfig) -> Arc<dyn HistoryStore> {
    match config.history.backend {
        HistoryBackend::Memory => Arc::new(MemoryHistory::new(config.history.window)),
        HistoryBackend::Postgres => Arc::new(
            PostgresHistory::new(
                config.database.url.clone(),
                config.database.max_connections,
                Duration::from_secs(config.database.connect_timeout_seconds),
            )
            .with_sensors(&config.sensors)
            .with_retry_cooldown(Duration::from_secs(config.database.retry_cooldown_seconds)),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_configured_backend() {
        let mut config = HubConfig::default();
        assert_eq!(build_history(&config).backend(), "memory");

        config.history.backend = HistoryBackend::Postgres;
        assert_eq!(build_history(&config).backend(), "postgres");
    }
}
