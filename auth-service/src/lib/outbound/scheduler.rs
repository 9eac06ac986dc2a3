use std::collections::HashMap;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use chrono::DateTime;
use chrono::Utc;
use tokio::task::JoinHandle;

use crate::domain::session::ports::SweepJob;
use crate::domain::session::ports::SweepScheduler;
use crate::domain::user::models::UserId;

struct ScheduledSweep {
    ticket: u64,
    handle: JoinHandle<()>,
}

type SweepTable = Arc<Mutex<HashMap<UserId, ScheduledSweep>>>;

/// Sweep scheduler backed by one tokio task per user.
///
/// Scheduling for a user aborts that user's pending task. Must be used from
/// within a tokio runtime.
#[derive(Default)]
pub struct TokioSweepScheduler {
    jobs: SweepTable,
    next_ticket: AtomicU64,
}

impl TokioSweepScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sweeps waiting to run.
    pub fn pending(&self) -> usize {
        lock(&self.jobs).len()
    }
}

fn lock(jobs: &SweepTable) -> MutexGuard<'_, HashMap<UserId, ScheduledSweep>> {
    // Entries stay consistent even if a holder panicked.
    jobs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl SweepScheduler for TokioSweepScheduler {
    fn schedule(&self, user_id: UserId, run_at: DateTime<Utc>, job: SweepJob) {
        let delay = (run_at - Utc::now()).to_std().unwrap_or_default();
        let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
        let jobs = Arc::clone(&self.jobs);

        // Hold the table while spawning so the task cannot finish and clean
        // up before its own entry exists.
        let mut table = lock(&self.jobs);

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            job.await;

            let mut table = lock(&jobs);
            if table.get(&user_id).map(|s| s.ticket) == Some(ticket) {
                table.remove(&user_id);
            }
        });

        if let Some(previous) = table.insert(user_id, ScheduledSweep { ticket, handle }) {
            previous.handle.abort();
            tracing::debug!(user_id = %user_id, "Replaced pending OTP sweep");
        }
    }

    fn cancel(&self, user_id: &UserId) {
        if let Some(previous) = lock(&self.jobs).remove(user_id) {
            previous.handle.abort();
            tracing::debug!(user_id = %user_id, "Cancelled pending OTP sweep");
        }
    }
}
