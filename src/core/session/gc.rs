use crate::core::session::manager::SessionManager;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Handle to the background GC loop of a [`SessionManager`].
///
/// Dropping the handle cancels the loop; [`GcHandle::shutdown`] also waits
/// for it to finish.
pub struct GcHandle {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl GcHandle {
    /// Spawn the loop with the manager's own interval
    pub fn spawn(manager: Arc<SessionManager>) -> Self {
        let period = manager.gc_interval();
        Self::spawn_with_interval(manager, period)
    }

    /// Spawn the loop with an explicit period. The first sweep runs immediately.
    pub fn spawn_with_interval(manager: Arc<SessionManager>, period: Duration) -> Self {
        let token = CancellationToken::new();
        let period = period.max(Duration::from_millis(1));
        let task = tokio::spawn(run_gc_loop(manager, period, token.clone()));

        info!("Session GC loop started (every {:?})", period);
        Self {
            token,
            task: Some(task),
        }
    }

    /// Signal the loop to stop without waiting
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Whether the background task has exited
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Stop the loop and wait for the in-flight sweep, if any, to complete
    pub async fn shutdown(mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("Session GC task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for GcHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

async fn run_gc_loop(manager: Arc<SessionManager>, period: Duration, token: CancellationToken) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = ticker.tick() => {
                match manager.gc().await {
                    Ok(0) => {}
                    Ok(removed) => debug!(removed = removed, "session GC sweep"),
                    Err(e) => warn!(error = %e, "session GC sweep failed"),
                }
            }
        }
    }

    info!("Session GC loop stopped");
}
