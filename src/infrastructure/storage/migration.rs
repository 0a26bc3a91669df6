use serde::Serialize;

use crate::constants::{LEGACY_KEYS, MIGRATED_KEY};
use super::StorageFacade;

#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct MigrationReport {
    pub already_migrated: bool,
    pub copied: Vec<String>,
    pub skipped: Vec<String>,
}

/// Moves values stored under pre-namespace keys to their `gallery:` keys.
///
/// A namespaced key that already holds data wins over its legacy twin. The legacy
/// key is dropped either way. Runs once per store, guarded by a marker key.
pub fn migrate_legacy_keys(storage: &StorageFacade) -> MigrationReport {
    if storage.contains(MIGRATED_KEY) {
        return MigrationReport {
            already_migrated: true,
            ..MigrationReport::default()
        };
    }

    let mut report = MigrationReport::default();

    for (legacy, namespaced) in LEGACY_KEYS {
        let Some(raw) = storage.get_raw(legacy) else {
            continue;
        };

        if storage.contains(namespaced) {
            report.skipped.push(legacy.to_string());
            storage.remove(legacy);
            continue;
        }

        if storage.set_raw(namespaced, &raw) {
            storage.remove(legacy);
            report.copied.push(legacy.to_string());
        } else {
            // Leave the legacy key in place so the next start can retry.
            tracing::warn!("Could not migrate legacy key {} to {}", legacy, namespaced);
            return report;
        }
    }

    storage.set(MIGRATED_KEY, &true);

    if !report.copied.is_empty() {
        tracing::info!("Migrated legacy storage keys: {:?}", report.copied);
    }

    report
}
