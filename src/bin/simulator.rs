//! ==============================================================================
//! simulator.rs - synthetic sensor node
//! ==============================================================================
//!
//! purpose:
//!     stands in for real hardware: every few seconds it fabricates one reading
//!     per configured sensor and POSTs it to the hub's /api/update.
//!
//! relationships:
//!     - reads: config/hub.toml ([simulator] and [[sensors]])
//!     - uses: air_quality_hub::simulator (payload generation)
//!     - talks to: the hub binary over http, nothing else
//!
//! ==============================================================================

use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{info, warn};

use air_quality_hub::domain::UpdatePayload;
use air_quality_hub::simulator::SyntheticSource;
use air_quality_hub::{logging, HubConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let log = logging::init();

    let config = HubConfig::load_or_default();
    log.apply_level(&config.logging.level);

    let endpoint = format!("{}/api/update", config.simulator.hub_url.trim_end_matches('/'));
    let interval = Duration::from_secs(config.simulator.interval_seconds.max(1));

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .context("failed to build http client")?;

    info!("[SIM] Starting simulation (Ctrl-C to stop)");
    info!("[SIM] Sending data to {}", endpoint);

    let mut source = SyntheticSource::new();
    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                info!("[SIM] Stopped");
                return Ok(());
            }
        }

        for sensor in &config.sensors {
            let payload = source.next_payload(sensor);
            match send(&client, &endpoint, &payload).await {
                Ok(()) => info!(
                    "[SIM] [{}] Sent data for {}: AQI {}, Temp {:.1}°C",
                    payload.last_update.as_deref().unwrap_or("-"),
                    sensor.name,
                    payload.aqi,
                    payload.temp
                ),
                Err(e) => warn!(
                    "[SIM] Failed to send data for {}: {:#}. Is the hub running?",
                    sensor.name, e
                ),
            }
        }
    }
}

async fn send(client: &reqwest::Client, endpoint: &str, payload: &UpdatePayload) -> Result<()> {
    let response = client
        .post(endpoint)
        .json(payload)
        .send()
        .await
        .context("request failed")?;

    let status = response.status();
    if !status.is_success() {
        anyhow::bail!("hub answered {}", status);
    }
    Ok(())
}
