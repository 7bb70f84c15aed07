use anyhow::Result;
use std::sync::Mutex;

use crate::domain::email::{FlagMap, FlagUpdate};
use crate::store::repo::FlagRepository;

/// In-memory flag table. Lets the fetcher and the mutation coordinator be
/// exercised without touching the filesystem.
#[derive(Default)]
pub struct MemoryFlagStore {
    table: Mutex<FlagMap>,
}

impl MemoryFlagStore {
    pub fn with_table(table: FlagMap) -> Self {
        Self {
            table: Mutex::new(table),
        }
    }
}

impl FlagRepository for MemoryFlagStore {
    fn load(&self) -> FlagMap {
        self.table.lock().unwrap().clone()
    }

    fn save(&self, id: &str, update: &FlagUpdate) -> Result<()> {
        let mut table = self.table.lock().unwrap();
        table.entry(id.to_string()).or_default().merge(update);
        Ok(())
    }
}
