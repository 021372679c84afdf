//! ==============================================================================
//! domain.rs - sensor identities, readings and the state served to dashboards
//! ==============================================================================
//!
//! purpose:
//!     the shared vocabulary of the hub. everything that crosses a module
//!     boundary (registry, history store, http layer, simulator) is defined here.
//!
//! relationships:
//!     - used by: registry.rs (SensorState), history/ (Reading), service.rs
//!     - wire shapes: UpdatePayload (POST /api/update), SensorState (GET /api/data)
//!
//! ==============================================================================

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::error::HubError;

/// last_update value reported before a sensor has sent anything
pub const NEVER: &str = "Never";

/// fixed identity of a registered sensor
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SensorIdentity {
    /// stable id (e.g., "sensor_1")
    pub id: String,
    /// human readable location name
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

impl SensorIdentity {
    pub fn new(id: &str, name: &str, lat: f64, lng: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            lat,
            lng,
        }
    }
}

/// the three osijek stations the dashboard ships with
pub fn default_sensors() -> Vec<SensorIdentity> {
    vec![
        SensorIdentity::new("sensor_1", "Centar Osijek", 45.5550, 18.6761),
        SensorIdentity::new("sensor_2", "Retfala", 45.5644, 18.6468),
        SensorIdentity::new("sensor_3", "FERIT Campus", 45.5607, 18.7183),
    ]
}

/// one accepted measurement. never mutated after it is recorded.
#[derive(Clone, Debug, PartialEq)]
pub struct Reading {
    pub sensor_id: String,
    /// when the hub accepted the reading (ordering key for durable history)
    pub recorded_at: DateTime<Utc>,
    /// producer supplied label, plotted on the x axis by the dashboard
    pub time: String,
    /// air quality index
    pub aqi: u32,
    /// fine particulate matter in µg/m³
    pub pm25: f64,
    /// temperature in celsius
    pub temp: f64,
    /// relative humidity (0-100%), not range checked
    pub hum: f64,
}

/// one element of the `history` array in GET /api/data
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub time: String,
    pub aqi: u32,
    pub pm25: f64,
    pub temp: f64,
    pub hum: f64,
}

impl From<&Reading> for HistoryEntry {
    fn from(r: &Reading) -> Self {
        Self {
            time: r.time.clone(),
            aqi: r.aqi,
            pm25: r.pm25,
            temp: r.temp,
            hum: r.hum,
        }
    }
}

/// latest known values of one sensor, as served to dashboards
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SensorState {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub aqi: u32,
    pub pm25: f64,
    pub temp: f64,
    pub hum: f64,
    pub last_update: String,
    pub history: Vec<HistoryEntry>,
}

impl SensorState {
    /// pre-seeded state: zeros and a "Never" timestamp
    pub fn seeded(identity: &SensorIdentity) -> Self {
        Self {
            id: identity.id.clone(),
            name: identity.name.clone(),
            lat: identity.lat,
            lng: identity.lng,
            aqi: 0,
            pm25: 0.0,
            temp: 0.0,
            hum: 0.0,
            last_update: NEVER.to_string(),
            history: Vec::new(),
        }
    }

    /// overwrite the measurement fields; identity stays as registered
    pub fn apply(&mut self, reading: &Reading) {
        self.aqi = reading.aqi;
        self.pm25 = reading.pm25;
        self.temp = reading.temp;
        self.hum = reading.hum;
        self.last_update = reading.time.clone();
    }

    pub fn has_reported(&self) -> bool {
        self.last_update != NEVER
    }
}

/// body of POST /api/update
///
/// name/lat/lng are accepted so producers can send the full sensor record,
/// but only `id` is used for routing and identity is never overwritten.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpdatePayload {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    pub aqi: u32,
    pub pm25: f64,
    pub temp: f64,
    pub hum: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<String>,
}

impl UpdatePayload {
    /// parse a raw request body
    ///
    /// anything serde rejects (not json, missing id, wrong types) becomes
    /// InvalidPayload carrying serde's description.
    pub fn parse(body: &[u8]) -> Result<Self, HubError> {
        serde_json::from_slice(body).map_err(|e| HubError::InvalidPayload(e.to_string()))
    }

    /// turn the payload into a reading received at `now`
    ///
    /// a missing last_update label falls back to the hub's local wall clock.
    pub fn into_reading(self, now: DateTime<Utc>) -> Reading {
        let time = self
            .last_update
            .unwrap_or_else(|| now.with_timezone(&Local).format("%H:%M:%S").to_string());

        Reading {
            sensor_id: self.id,
            recorded_at: now,
            time,
            aqi: self.aqi,
            pm25: self.pm25,
            temp: self.temp,
            hum: self.hum,
        }
    }
}
