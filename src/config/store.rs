//! Ordered, user-edited list of pin configurations.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::config::pin::{ConfigId, PinConfiguration};
use crate::error::GpioControlError;

/// Shared handle over the configuration list.
///
/// Every mutation bumps a revision published on a watch channel; anything
/// derived from an older revision is stale.
#[derive(Debug, Clone)]
pub struct ConfigurationStore {
    configurations: Arc<RwLock<Vec<PinConfiguration>>>,
    revision: Arc<watch::Sender<u64>>,
}

impl Default for ConfigurationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigurationStore {
    pub fn new() -> Self {
        Self::with_configurations(vec![])
    }

    pub fn with_configurations(configurations: Vec<PinConfiguration>) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            configurations: Arc::new(RwLock::new(configurations)),
            revision: Arc::new(revision),
        }
    }

    /// Replaces the whole list.
    pub fn load(&self, configurations: Vec<PinConfiguration>) {
        debug!("Loading {} GPIO configurations", configurations.len());
        *self.configurations.write() = configurations;
        self.changed();
    }

    /// Appends a row with default values and returns its id.
    pub fn add(&self) -> ConfigId {
        self.push(PinConfiguration::default())
    }

    pub fn push(&self, configuration: PinConfiguration) -> ConfigId {
        let id = configuration.id;
        self.configurations.write().push(configuration);
        self.changed();
        id
    }

    /// Removes the row with the given id. Returns `false` if it was not there.
    pub fn remove(&self, id: ConfigId) -> bool {
        let removed = {
            let mut configurations = self.configurations.write();
            let before = configurations.len();
            configurations.retain(|c| c.id != id);
            configurations.len() != before
        };
        if removed {
            self.changed();
        } else {
            debug!("Configuration {id} already removed");
        }
        removed
    }

    /// Edits one row in place.
    pub fn update<F>(&self, id: ConfigId, f: F) -> Result<(), GpioControlError>
    where
        F: FnOnce(&mut PinConfiguration),
    {
        {
            let mut configurations = self.configurations.write();
            let configuration = configurations
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or(GpioControlError::UnknownConfig)?;
            f(configuration);
            // the closure must not be able to re-key the row
            configuration.id = id;
        }
        self.changed();
        Ok(())
    }

    pub fn snapshot(&self) -> Vec<PinConfiguration> {
        self.configurations.read().clone()
    }

    pub fn get(&self, index: usize) -> Option<PinConfiguration> {
        self.configurations.read().get(index).cloned()
    }

    pub fn position(&self, id: ConfigId) -> Option<usize> {
        self.configurations.read().iter().position(|c| c.id == id)
    }

    pub fn len(&self) -> usize {
        self.configurations.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.configurations.read().is_empty()
    }

    /// Pin numbers used by more than one row, in first-seen order.
    pub fn duplicate_pins(&self) -> Vec<u32> {
        let configurations = self.configurations.read();
        let mut counts: HashMap<u32, usize> = HashMap::new();
        for c in configurations.iter() {
            *counts.entry(c.pin).or_insert(0) += 1;
        }
        let mut duplicates = vec![];
        for c in configurations.iter() {
            if counts[&c.pin] > 1 && !duplicates.contains(&c.pin) {
                duplicates.push(c.pin);
            }
        }
        duplicates
    }

    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn changed(&self) {
        let duplicates = self.duplicate_pins();
        if !duplicates.is_empty() {
            warn!("Pins configured more than once: {duplicates:?}");
        }
        self.revision.send_modify(|revision| *revision += 1);
    }
}
