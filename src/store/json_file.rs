use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::domain::email::{FlagMap, FlagUpdate};
use crate::store::repo::FlagRepository;

/// Flag table persisted as a single pretty-printed JSON file, by default
/// ~/.config/maildash/flags.json.
pub struct JsonFileFlagStore {
    path: PathBuf,
}

impl JsonFileFlagStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl FlagRepository for JsonFileFlagStore {
    fn load(&self) -> FlagMap {
        if !self.path.exists() {
            return FlagMap::new();
        }
        let raw = match fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("could not read {}: {e}; using empty flag table", self.path.display());
                return FlagMap::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(table) => table,
            Err(e) => {
                log::warn!(
                    "malformed flag table at {}: {e}; using empty flag table",
                    self.path.display()
                );
                FlagMap::new()
            }
        }
    }

    fn save(&self, id: &str, update: &FlagUpdate) -> Result<()> {
        let mut table = self.load();
        table.entry(id.to_string()).or_default().merge(update);

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let s = serde_json::to_string_pretty(&table)?;
        fs::write(&self.path, s)
            .with_context(|| format!("writing flag table to {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> JsonFileFlagStore {
        JsonFileFlagStore::new(dir.path().join("flags.json"))
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store_in(&dir).load().is_empty());
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "{not json!").unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save("m-1", &FlagUpdate::read(true)).unwrap();

        let table = store.load();
        assert_eq!(table.get("m-1").unwrap().is_read, Some(true));
        assert_eq!(table.get("m-1").unwrap().is_favorite, None);
    }

    #[test]
    fn save_merges_without_clobbering_other_field() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save("m-1", &FlagUpdate::favorite(true)).unwrap();
        store.save("m-1", &FlagUpdate::read(true)).unwrap();

        let entry = *store.load().get("m-1").unwrap();
        assert_eq!(entry.is_favorite, Some(true));
        assert_eq!(entry.is_read, Some(true));
    }

    #[test]
    fn save_keeps_other_ids_intact() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save("m-1", &FlagUpdate::read(true)).unwrap();
        store.save("m-2", &FlagUpdate::favorite(true)).unwrap();

        let table = store.load();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("m-1").unwrap().is_read, Some(true));
    }
}
