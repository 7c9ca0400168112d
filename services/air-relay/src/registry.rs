use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::types::Reading;

/// Outcome of storing a reading.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitAck {
    pub device_id: String,
    /// True when an earlier reading for the same device was overwritten.
    pub replaced: bool,
}

/// Latest reading per device, kept in memory only.
///
/// Each device holds exactly one entry: the last reading accepted for it.
/// Nothing expires; the table lives as long as the owning [`crate::AppState`].
#[derive(Debug, Default)]
pub struct Registry {
    readings: RwLock<HashMap<String, Reading>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `reading` under its device id, replacing whatever was there.
    pub async fn submit(&self, reading: Reading) -> SubmitAck {
        let device_id = reading.device_id.clone();
        let replaced = {
            let mut readings = self.readings.write().await;
            readings.insert(device_id.clone(), reading).is_some()
        };
        SubmitAck {
            device_id,
            replaced,
        }
    }

    /// Snapshot of every device's latest reading.
    pub async fn latest(&self) -> HashMap<String, Reading> {
        self.readings.read().await.clone()
    }

    pub async fn get(&self, device_id: &str) -> Option<Reading> {
        self.readings.read().await.get(device_id).cloned()
    }

    /// Known device ids, sorted.
    pub async fn devices(&self) -> Vec<String> {
        let mut devices: Vec<String> = self.readings.read().await.keys().cloned().collect();
        devices.sort();
        devices
    }

    pub async fn len(&self) -> usize {
        self.readings.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.readings.read().await.is_empty()
    }
}
