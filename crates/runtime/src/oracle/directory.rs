//! In-memory creature and character stat sources.

use std::collections::HashMap;
use std::sync::RwLock;

use combat_core::{CharacterOracle, CharacterSheet, CreatureId, CreatureOracle, CreatureRecord};

/// Creature templates keyed by id, shared between the host and the worker.
///
/// The host registers records as tokens land on the board; the engine reads
/// them through [`CreatureOracle`] during initiative rolls and movement
/// quotes. A poisoned lock degrades to "record not found", which the engine
/// already treats as a rejectable condition.
pub struct CreatureDirectory {
    records: RwLock<HashMap<CreatureId, CreatureRecord>>,
}

impl CreatureDirectory {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Registers or replaces a creature record.
    pub fn insert(&self, id: impl Into<CreatureId>, record: CreatureRecord) {
        if let Ok(mut records) = self.records.write() {
            records.insert(id.into(), record);
        }
    }

    /// Removes a record, returning it when present.
    pub fn remove(&self, id: &CreatureId) -> Option<CreatureRecord> {
        self.records.write().ok()?.remove(id)
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CreatureDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl CreatureOracle for CreatureDirectory {
    fn creature(&self, id: &CreatureId) -> Option<CreatureRecord> {
        self.records.read().ok()?.get(id).cloned()
    }
}

/// The local player's character sheet, absent until one is loaded.
pub struct CharacterProfile {
    sheet: RwLock<Option<CharacterSheet>>,
}

impl CharacterProfile {
    pub fn new() -> Self {
        Self {
            sheet: RwLock::new(None),
        }
    }

    /// Installs or replaces the loaded sheet.
    pub fn set(&self, sheet: CharacterSheet) {
        if let Ok(mut slot) = self.sheet.write() {
            *slot = Some(sheet);
        }
    }

    /// Drops the loaded sheet; character tokens lose their fallback stats.
    pub fn clear(&self) {
        if let Ok(mut slot) = self.sheet.write() {
            *slot = None;
        }
    }
}

impl Default for CharacterProfile {
    fn default() -> Self {
        Self::new()
    }
}

impl CharacterOracle for CharacterProfile {
    fn sheet(&self) -> Option<CharacterSheet> {
        self.sheet.read().ok()?.clone()
    }
}
