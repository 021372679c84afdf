//! synthetic readings for demos and load testing.
//!
//! each sensor wobbles around a fixed base value; pm2.5 tracks aqi at half
//! its value. the `simulator` binary posts these to a running hub.

use chrono::Local;
use rand::Rng;

use crate::domain::{SensorIdentity, UpdatePayload};

/// centre values a sensor fluctuates around
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BaseValues {
    pub aqi: i64,
    pub temp: f64,
    pub hum: i64,
}

impl BaseValues {
    pub fn for_sensor(sensor_id: &str) -> Self {
        match sensor_id {
            "sensor_1" => Self { aqi: 45, temp: 22.0, hum: 45 },
            "sensor_2" => Self { aqi: 85, temp: 24.0, hum: 40 },
            "sensor_3" => Self { aqi: 30, temp: 20.0, hum: 55 },
            _ => Self { aqi: 50, temp: 21.0, hum: 50 },
        }
    }
}

pub struct SyntheticSource<R> {
    rng: R,
}

impl SyntheticSource<rand::rngs::ThreadRng> {
    pub fn new() -> Self {
        Self { rng: rand::thread_rng() }
    }
}

impl Default for SyntheticSource<rand::rngs::ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> SyntheticSource<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// next reading for `sensor`, stamped with the local wall clock
    pub fn next_payload(&mut self, sensor: &SensorIdentity) -> UpdatePayload {
        let base = BaseValues::for_sensor(&sensor.id);

        let aqi = (base.aqi + self.rng.gen_range(-5..=5)).max(0) as u32;
        let temp = base.temp + round1(self.rng.gen_range(-0.5..=0.5));
        let hum = (base.hum + self.rng.gen_range(-2..=2)).clamp(0, 100) as f64;
        let pm25 = round1(aqi as f64 * 0.5);

        UpdatePayload {
            id: sensor.id.clone(),
            name: Some(sensor.name.clone()),
            lat: Some(sensor.lat),
            lng: Some(sensor.lng),
            aqi,
            pm25,
            temp,
            hum,
            last_update: Some(Local::now().format("%H:%M:%S").to_string()),
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
