use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Result;

use crate::domain::email::{Email, FlagUpdate};
use crate::store::repo::FlagRepository;

/// Outcome of one optimistic flag update. The caller decides what to do
/// with a rollback (toast, refetch, ...) — nothing is baked in here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Applied,
    RolledBack(String),
}

/// Remote side of a flag change. There is no real server behind the
/// viewer; [`StubRemoteService`] simulates one.
pub trait RemoteFlagService: Send + Sync {
    fn update_flags(&self, id: &str, update: &FlagUpdate) -> Result<()>;
}

/// Pretends to commit the change upstream, with a short artificial delay.
pub struct StubRemoteService;

impl RemoteFlagService for StubRemoteService {
    fn update_flags(&self, id: &str, update: &FlagUpdate) -> Result<()> {
        log::debug!("remote flag update for {id}: {update:?}");
        thread::sleep(Duration::from_millis(120));
        Ok(())
    }
}

/// Applies flag changes optimistically: in-memory first, then the local
/// flag store, then the remote. A remote failure rolls back the
/// in-memory record only — the flag-store write stays. Local truth wins.
pub struct MutationCoordinator {
    flags: Arc<dyn FlagRepository>,
    remote: Arc<dyn RemoteFlagService>,
}

impl MutationCoordinator {
    pub fn new(flags: Arc<dyn FlagRepository>, remote: Arc<dyn RemoteFlagService>) -> Self {
        Self { flags, remote }
    }

    pub fn update_flags(
        &self,
        emails: &mut [Email],
        id: &str,
        update: FlagUpdate,
    ) -> Result<UpdateOutcome> {
        // Snapshot before touching anything; a missing id means there is
        // nothing to patch in memory, but the store and remote still run.
        let snapshot = emails.iter().find(|e| e.id == id).cloned();

        if let Some(email) = emails.iter_mut().find(|e| e.id == id) {
            update.apply_to(email);
        }

        self.flags.save(id, &update)?;

        match self.remote.update_flags(id, &update) {
            Ok(()) => Ok(UpdateOutcome::Applied),
            Err(e) => {
                if let Some(snap) = snapshot {
                    if let Some(email) = emails.iter_mut().find(|x| x.id == id) {
                        *email = snap;
                    }
                }
                log::warn!("remote flag update for {id} failed, rolled back in-memory state: {e}");
                Ok(UpdateOutcome::RolledBack(e.to_string()))
            }
        }
    }

    /// One independent call per id; a failure rolls back that id only and
    /// does not stop the rest of the batch.
    pub fn update_many(
        &self,
        emails: &mut [Email],
        ids: &[String],
        update: FlagUpdate,
    ) -> Result<Vec<(String, UpdateOutcome)>> {
        let mut outcomes = Vec::with_capacity(ids.len());
        for id in ids {
            let outcome = self.update_flags(emails, id, update)?;
            outcomes.push((id.clone(), outcome));
        }
        Ok(outcomes)
    }
}
