//! ==============================================================================
//! air-quality-hub - ingest and replay of environmental sensor readings
//! ==============================================================================
//!
//! layout:
//!     - domain.rs:   identities, readings, wire payloads
//!     - error.rs:    HubError and its http mapping
//!     - config.rs:   hub.toml schema and loader
//!     - logging.rs:  tracing subscriber setup
//!     - history/:    HistoryStore trait, memory and postgres backends
//!     - registry.rs: per-sensor current state cache
//!     - service.rs:  update / snapshot operations
//!     - server.rs:   axum router
//!     - simulator.rs: synthetic producer payloads
//!
//! data flow:
//!
//! ```text
//!     producer --POST /api/update--> IngestService::update
//!                                      ├─> SensorRegistry::set
//!                                      └─> HistoryStore::append
//!
//!     dashboard --GET /api/data----> IngestService::snapshot_all
//!                                      ├─> HistoryStore::window
//!                                      └─> SensorRegistry::enrich
//! ```
//!
//! ==============================================================================

pub mod config;
pub mod domain;
pub mod error;
pub mod history;
pub mod logging;
pub mod registry;
pub mod server;
pub mod service;
pub mod simulator;

pub use config::HubConfig;
pub use domain::{HistoryEntry, Reading, SensorIdentity, SensorState, UpdatePayload};
pub use error::{HubError, Result};
pub use history::{build_history, HistoryStore, MemoryHistory, PostgresHistory};
pub use registry::SensorRegistry;
pub use service::IngestService;
