//! ==============================================================================
//! service.rs - ingest and snapshot operations
//! ==============================================================================
//!
//! purpose:
//!     the hub's api, independent of http framing.
//!
//! update ordering (best effort, not a transaction):
//!     1. parse the body               -> InvalidPayload, nothing touched
//!     2. resolve the sensor id        -> UnknownSensor, nothing touched
//!     3. registry.set                 (immediately visible to snapshots)
//!     4. history.append               (failure is logged, step 3 stays)
//!
//! snapshot:
//!     per sensor, read the history window WITHOUT holding the registry lock,
//!     then enrich the cached state with it. a failing backend falls back to
//!     whatever the cache last held. sensors are read concurrently, so a slow
//!     backend costs one timeout per snapshot, not one per sensor.
//!
//! ==============================================================================

use chrono::Utc;
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::{SensorIdentity, SensorState, UpdatePayload};
use crate::error::{HubError, Result};
use crate::history::HistoryStore;
use crate::registry::SensorRegistry;

/// body of GET /health
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub backend: &'static str,
    pub storage_connected: bool,
    pub sensors: usize,
}

#[derive(Clone)]
pub struct IngestService {
    registry: Arc<SensorRegistry>,
    history: Arc<dyn HistoryStore>,
    window: usize,
    show_sensor_data: bool,
}

impl IngestService {
    pub fn new(
        sensors: &[SensorIdentity],
        history: Arc<dyn HistoryStore>,
        window: usize,
    ) -> Self {
        Self {
            registry: Arc::new(SensorRegistry::new(sensors)),
            history,
            window,
            show_sensor_data: false,
        }
    }

    /// log every accepted reading at info level
    pub fn with_sensor_logging(mut self, enabled: bool) -> Self {
        self.show_sensor_data = enabled;
        self
    }

    pub fn registry(&self) -> &SensorRegistry {
        &self.registry
    }

    /// accept one raw update body
    pub async fn update(&self, body: &[u8]) -> Result<()> {
        let payload = UpdatePayload::parse(body)?;

        if !self.registry.contains(&payload.id) {
            debug!("[INGEST] Rejected reading for unknown sensor {}", payload.id);
            return Err(HubError::UnknownSensor(payload.id));
        }

        let reading = payload.into_reading(Utc::now());
        self.registry.set(&reading).await?;

        if self.show_sensor_data {
            info!(
                "[INGEST] {} @ {} | AQI: {} | PM2.5: {:.1} | Temp: {:.1}°C | Humidity: {:.0}%",
                reading.sensor_id, reading.time, reading.aqi, reading.pm25, reading.temp, reading.hum
            );
        }

        if let Err(e) = self.history.append(&reading).await {
            warn!(
                "[INGEST] History append failed for {}, cache still updated: {}",
                reading.sensor_id, e
            );
        }

        Ok(())
    }

    /// every registered sensor, in registration order, with its history window
    pub async fn snapshot_all(&self) -> Vec<SensorState> {
        let registry = &self.registry;

        // join_all keeps input order, so registration order survives
        let states = join_all(registry.ids().iter().map(|id| async move {
            match self.history.window(id, self.window).await {
                Ok(window) => registry.enrich(id, &window).await,
                Err(e) => {
                    warn!("[SNAPSHOT] History unavailable for {}, serving cache: {}", id, e);
                    registry.get(id).await
                }
            }
        }))
        .await;

        // ids() only yields registered sensors
        states.into_iter().filter_map(|state| state.ok()).collect()
    }

    pub async fn health(&self) -> Health {
        Health {
            status: "ok",
            backend: self.history.backend(),
            storage_connected: self.history.is_connected().await,
            sensors: self.registry.ids().len(),
        }
    }
}
