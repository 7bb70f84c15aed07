use anyhow::Result;

use crate::domain::email::{FlagMap, FlagUpdate};

/// Key-value side table for read/favorite overrides, keyed by email id.
/// Entries are never evicted; the table is bounded only by its medium.
pub trait FlagRepository: Send + Sync {
    /// The full override table. Missing or malformed persisted data
    /// degrades to an empty table, never an error.
    fn load(&self) -> FlagMap;

    /// Shallow-merge `update` into the entry for `id` and persist the
    /// whole table. Fields absent from `update` are preserved.
    fn save(&self, id: &str, update: &FlagUpdate) -> Result<()>;
}
