use std::time::{Duration, Instant};

use crate::domain::query::{EmailQueryParams, ParamChange};

pub const DEFAULT_QUIET: Duration = Duration::from_millis(300);

/// Coalesces parameter edits before they become the committed query.
///
/// Text-filter edits (search/sender/subject) arrive per keystroke, so
/// they only commit after a quiet period; each new edit cancels and
/// reschedules the deadline. Structural edits (page, sort, date range,
/// favorites, limit) flush everything pending and commit at once.
///
/// Single-threaded by design: the owner calls [`poll`](Self::poll) from
/// its event loop with the current instant, no timers or watchers.
pub struct ParamsCommitQueue {
    committed: EmailQueryParams,
    pending: Option<EmailQueryParams>,
    deadline: Option<Instant>,
    quiet: Duration,
}

impl ParamsCommitQueue {
    pub fn new(initial: EmailQueryParams, quiet: Duration) -> Self {
        Self {
            committed: initial,
            pending: None,
            deadline: None,
            quiet,
        }
    }

    /// The last committed parameter set — what the query engine should run.
    pub fn params(&self) -> &EmailQueryParams {
        &self.committed
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Record one edit at time `now`. Returns true when the edit (and any
    /// pending edits) committed immediately.
    pub fn submit(&mut self, change: ParamChange, now: Instant) -> bool {
        let debounced = change.is_text_filter();
        let mut next = self.pending.take().unwrap_or_else(|| self.committed.clone());
        next.apply_change(change);

        if debounced {
            self.pending = Some(next);
            self.deadline = Some(now + self.quiet);
            false
        } else {
            self.committed = next;
            self.deadline = None;
            true
        }
    }

    /// Commit pending edits whose quiet period has elapsed. Returns true
    /// when the committed set changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                if let Some(p) = self.pending.take() {
                    self.committed = p;
                }
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Commit whatever is pending right away (e.g. on explicit submit).
    pub fn flush(&mut self) -> bool {
        self.deadline = None;
        match self.pending.take() {
            Some(p) => {
                self.committed = p;
                true
            }
            None => false,
        }
    }
}
