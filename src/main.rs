//! ==============================================================================
//! main.rs - air quality hub entry point
//! ==============================================================================
//!
//! purpose:
//!     the long running service that sensors push readings to and dashboards
//!     poll for the latest values plus a short history.
//!
//! responsibilities:
//!     - load hub.toml (or defaults) and set up logging
//!     - pick the history backend (in-memory fifo or postgres)
//!     - seed the fixed sensor registry
//!     - serve the http api until ctrl-c
//!
//! architecture:
//!
//!     ┌─────────────────────────────────────────────────────────────┐
//!     │                     hub (this binary)                       │
//!     │  ┌─────────────┐        ┌───────────────────────────────┐   │
//!     │  │ web server  │ ─────> │ IngestService                 │   │
//!     │  │ (port 8000) │        │  ├─ SensorRegistry (cache)    │   │
//!     │  └─────────────┘        │  └─ HistoryStore  (history)   │   │
//!     │                         └───────────────┬───────────────┘   │
//!     └─────────────────────────────────────────┼───────────────────┘
//!                                               │ optional
//!                                        ┌──────┴──────┐
//!                                        │  postgres   │
//!                                        └─────────────┘
//!
//! ==============================================================================

use anyhow::Result;
use tracing::info;

use air_quality_hub::{build_history, logging, server, HubConfig, IngestService};

#[tokio::main]
async fn main() -> Result<()> {
    let log = logging::init();

    info!("===========================================================");
    info!("  Air Quality Hub");
    info!("===========================================================");

    // step 1: load configuration
    let config = HubConfig::load_or_default();
    log.apply_level(&config.logging.level);
    config.print_summary();

    // step 2: history backend. postgres connects lazily on first use,
    // so an unreachable database never blocks startup.
    let history = build_history(&config);
    info!("[STARTUP] ✓ History backend: {}", history.backend());

    // step 3: service with the fixed registry
    let service = IngestService::new(&config.sensors, history, config.history.window)
        .with_sensor_logging(config.logging.show_sensor_data);
    info!("[STARTUP] ✓ Registered {} sensors", service.registry().ids().len());

    // step 4: serve
    server::serve(&config.server, service).await
}
