//! Re-open a live query after it fails

use std::time::Duration;

use futures::stream::{self, BoxStream};
use futures::StreamExt;
use tracing::{debug, warn};

use crate::errors::QueryError;

/// A live query: every item is the full current answer, or a terminal failure
pub type LiveQuery<V> = BoxStream<'static, Result<V, QueryError>>;

/// Exponential delay between re-open attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    pub initial: Duration,
    pub max: Duration,
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self { initial, max }
    }

    /// Delay before re-open attempt `attempt` (1-based), doubling up to `max`
    pub fn delay(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(16);
        self.initial.saturating_mul(1 << shift).min(self.max)
    }
}

struct Resubscribe<V> {
    inner: Option<LiveQuery<V>>,
    failures: u32,
}

/// Wrap a query opener so failures re-open the query after a backoff delay
///
/// Successful items are forwarded unwrapped; a failure is logged, the failed
/// subscription is dropped, and a new one is opened once the delay elapses.
/// The stream only ends when the underlying query completes normally.
pub fn resubscribing<V, F>(label: String, open: F, backoff: Backoff) -> BoxStream<'static, V>
where
    V: Send + 'static,
    F: Fn() -> LiveQuery<V> + Send + 'static,
{
    let state = Resubscribe {
        inner: None,
        failures: 0,
    };

    stream::unfold((state, open), move |(mut state, open)| {
        let label = label.clone();
        async move {
            loop {
                if state.inner.is_none() {
                    if state.failures > 0 {
                        let delay = backoff.delay(state.failures);
                        debug!(
                            "Re-opening {} in {:?} (attempt {})",
                            label, delay, state.failures
                        );
                        tokio::time::sleep(delay).await;
                    }
                    state.inner = Some(open());
                }
                let Some(inner) = state.inner.as_mut() else {
                    return None;
                };

                match inner.next().await {
                    Some(Ok(value)) => {
                        state.failures = 0;
                        return Some((value, (state, open)));
                    }
                    Some(Err(e)) => {
                        state.failures = state.failures.saturating_add(1);
                        warn!(
                            "Live query {} failed ({} in a row): {}",
                            label, state.failures, e
                        );
                        state.inner = None;
                    }
                    None => return None,
                }
            }
        }
    })
    .boxed()
}
