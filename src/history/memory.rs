use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use tokio::sync::RwLock;

use super::HistoryStore;
use crate::domain::Reading;
use crate::error::Result;

/// bounded in-process history: one fifo per sensor, capped at `capacity`
pub struct MemoryHistory {
    capacity: usize,
    buffers: RwLock<HashMap<String, VecDeque<Reading>>>,
}

impl MemoryHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            buffers: RwLock::new(HashMap::new()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[async_trait]
impl HistoryStore for MemoryHistory {
    async fn append(&self, reading: &Reading) -> Result<()> {
        let mut buffers = self.buffers.write().await;
        let buffer = buffers
            .entry(reading.sensor_id.clone())
            .or_insert_with(|| VecDeque::with_capacity(self.capacity + 1));

        buffer.push_back(reading.clone());
        while buffer.len() > self.capacity {
            buffer.pop_front();
        }
        Ok(())
    }

    async fn window(&self, sensor_id: &str, limit: usize) -> Result<Vec<Reading>> {
        let buffers = self.buffers.read().await;
        let Some(buffer) = buffers.get(sensor_id) else {
            return Ok(Vec::new());
        };

        let skip = buffer.len().saturating_sub(limit);
        Ok(buffer.iter().skip(skip).cloned().collect())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn is_connected(&self) -> bool {
        true
    }
}
