//! ==============================================================================
//! registry.rs - current state cache for the fixed set of sensors
//! ==============================================================================
//!
//! purpose:
//!     keeps the latest values of every registered sensor so snapshot queries
//!     never wait on the history backend.
//!
//! locking:
//!     one tokio mutex per sensor. writers to different sensors never contend,
//!     writers to the same sensor serialize. callers only ever get copies.
//!
//! ==============================================================================

use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::domain::{HistoryEntry, Reading, SensorIdentity, SensorState};
use crate::error::{HubError, Result};

pub struct SensorRegistry {
    /// registration order, used for snapshots
    order: Vec<String>,
    states: HashMap<String, Mutex<SensorState>>,
}

impl SensorRegistry {
    /// seed one default state per identity. later duplicates of an id are ignored.
    pub fn new(identities: &[SensorIdentity]) -> Self {
        let mut order = Vec::with_capacity(identities.len());
        let mut states = HashMap::with_capacity(identities.len());

        for identity in identities {
            if states.contains_key(&identity.id) {
                continue;
            }
            order.push(identity.id.clone());
            states.insert(identity.id.clone(), Mutex::new(SensorState::seeded(identity)));
        }

        Self { order, states }
    }

    pub fn ids(&self) -> &[String] {
        &self.order
    }

    pub fn contains(&self, sensor_id: &str) -> bool {
        self.states.contains_key(sensor_id)
    }

    fn slot(&self, sensor_id: &str) -> Result<&Mutex<SensorState>> {
        self.states
            .get(sensor_id)
            .ok_or_else(|| HubError::UnknownSensor(sensor_id.to_string()))
    }

    /// overwrite the current measurement fields from `reading`
    pub async fn set(&self, reading: &Reading) -> Result<()> {
        let slot = self.slot(&reading.sensor_id)?;
        slot.lock().await.apply(reading);
        Ok(())
    }

    /// copy of the current state
    pub async fn get(&self, sensor_id: &str) -> Result<SensorState> {
        let slot = self.slot(sensor_id)?;
        let state = slot.lock().await.clone();
        Ok(state)
    }

    /// reconcile the cache with a history window and return the result
    ///
    /// a non-empty window replaces the embedded history and the current
    /// fields take the newest entry. an empty window changes nothing.
    pub async fn enrich(&self, sensor_id: &str, window: &[Reading]) -> Result<SensorState> {
        let slot = self.slot(sensor_id)?;
        let mut state = slot.lock().await;

        if let Some(latest) = window.last() {
            state.apply(latest);
            state.history = window.iter().map(HistoryEntry::from).collect();
        }

        Ok(state.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{default_sensors, NEVER};
    use chrono::Utc;
    use std::sync::Arc;

    fn reading(sensor: &str, aqi: u32, time: &str) -> Reading {
        Reading {
            sensor_id: sensor.to_string(),
            recorded_at: Utc::now(),
            time: time.to_string(),
            aqi,
            pm25: aqi as f64 / 2.0,
            temp: 21.5,
            hum: 44.0,
        }
    }

    #[tokio::test]
    async fn keeps_registration_order() {
        let registry = SensorRegistry::new(&default_sensors());
        assert_eq!(registry.ids(), ["sensor_1", "sensor_2", "sensor_3"]);
        assert!(registry.contains("sensor_2"));
        assert!(!registry.contains("sensor_9"));
    }

    #[tokio::test]
    async fn set_overwrites_measurements_only() {
        let registry = SensorRegistry::new(&default_sensors());
        registry.set(&reading("sensor_1", 45, "10:00:00")).await.unwrap();

        let state = registry.get("sensor_1").await.unwrap();
        assert_eq!(state.aqi, 45);
        assert_eq!(state.pm25, 22.5);
        assert_eq!(state.last_update, "10:00:00");
        assert_eq!(state.name, "Centar Osijek");
        // cache writes never touch the embedded history
        assert!(state.history.is_empty());
    }

    #[tokio::test]
    async fn unknown_sensor_is_rejected() {
        let registry = SensorRegistry::new(&default_sensors());
        let err = registry.set(&reading("sensor_9", 1, "x")).await.unwrap_err();
        assert_eq!(err, HubError::UnknownSensor("sensor_9".to_string()));
        assert!(registry.get("sensor_9").await.is_err());
    }

    #[tokio::test]
    async fn enrich_takes_newest_entry_and_history() {
        let registry = SensorRegistry::new(&default_sensors());
        let window = vec![reading("sensor_3", 30, "09:00:00"), reading("sensor_3", 31, "09:00:03")];

        let state = registry.enrich("sensor_3", &window).await.unwrap();
        assert_eq!(state.aqi, 31);
        assert_eq!(state.last_update, "09:00:03");
        assert_eq!(state.history.len(), 2);
        assert_eq!(state.history[0].time, "09:00:00");

        assert_eq!(registry.get("sensor_3").await.unwrap(), state);
    }

    #[tokio::test]
    async fn empty_window_leaves_state_alone() {
        let registry = SensorRegistry::new(&default_sensors());
        let state = registry.enrich("sensor_1", &[]).await.unwrap();
        assert_eq!(state.last_update, NEVER);
        assert_eq!(state.aqi, 0);
    }

    #[tokio::test]
    async fn duplicate_identities_are_collapsed() {
        let mut sensors = default_sensors();
        sensors.push(sensors[0].clone());
        let registry = SensorRegistry::new(&sensors);
        assert_eq!(registry.ids().len(), 3);
    }

    #[tokio::test]
    async fn concurrent_writes_to_one_sensor_never_mix_fields() {
        let registry = Arc::new(SensorRegistry::new(&default_sensors()));
        let mut tasks = Vec::new();
        for n in 0..64u32 {
            let registry = registry.clone();
            tasks.push(tokio::spawn(async move {
                let r = Reading {
                    sensor_id: "sensor_1".to_string(),
                    recorded_at: Utc::now(),
                    time: format!("t{n}"),
                    aqi: n,
                    pm25: n as f64,
                    temp: n as f64,
                    hum: n as f64,
                };
                registry.set(&r).await.unwrap();
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        let state = registry.get("sensor_1").await.unwrap();
        let n = state.aqi as f64;
        assert_eq!(state.pm25, n);
        assert_eq!(state.temp, n);
        assert_eq!(state.hum, n);
        assert_eq!(state.last_update, format!("t{}", state.aqi));
    }
}
