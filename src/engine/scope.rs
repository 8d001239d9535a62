//! Cancellable task scope owned by one screen's view model

use std::future::Future;

use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::debug;

/// Lifetime of one consumer context
///
/// Every pipeline stage and the staleness sweep run as tasks spawned here.
/// Closing the scope cancels them all; work that finishes late is dropped.
/// Clones share the same lifetime.
#[derive(Debug, Clone, Default)]
pub struct ViewModelScope {
    token: CancellationToken,
    tasks: TaskTracker,
}

impl ViewModelScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a task that is cancelled when the scope closes
    ///
    /// Spawning on a closed scope is a no-op.
    pub fn spawn<F>(&self, name: &'static str, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.is_closed() {
            debug!("Scope closed, not spawning {}", name);
            return;
        }

        let token = self.token.clone();
        self.tasks.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => debug!("Task {} cancelled", name),
                _ = task => debug!("Task {} finished", name),
            }
        });
    }

    /// Cancel every task in the scope. Idempotent.
    pub fn close(&self) {
        if !self.token.is_cancelled() {
            debug!("Closing scope with {} tasks", self.tasks.len());
            self.token.cancel();
        }
        self.tasks.close();
    }

    pub fn is_closed(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once the scope has been closed
    pub async fn closed(&self) {
        self.token.cancelled().await
    }

    /// Close the scope and wait until every task has been torn down
    pub async fn shutdown(&self) {
        self.close();
        self.tasks.wait().await;
    }
}
