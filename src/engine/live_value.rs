//! Shared live value: one upstream pipeline, many readers

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::{FutureExt, Stream, StreamExt};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::ViewModelScope;
use crate::config::SharingPolicy;

/// Ordered result list shared between all readers of a live value
pub type LiveResult<T> = Arc<Vec<T>>;

/// Latest output of an upstream pipeline, replayed to every subscriber
///
/// The upstream is started at most once: on construction with
/// [`SharingPolicy::Eager`], or on the first [`subscribe`](Self::subscribe)
/// with [`SharingPolicy::Lazy`]. It then keeps running, even with no
/// subscribers, until the owning scope closes. Before the first upstream
/// emission readers see the initial value.
pub struct LiveValue<V> {
    shared: Arc<Shared<V>>,
}

struct Shared<V> {
    tx: Arc<watch::Sender<V>>,
    emitted: Arc<AtomicBool>,
    /// Cancelled once the upstream has run out
    finished: CancellationToken,
    pending: Mutex<Option<BoxFuture<'static, ()>>>,
    scope: ViewModelScope,
    name: &'static str,
}

impl<V> Clone for LiveValue<V> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<V> std::fmt::Debug for LiveValue<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveValue")
            .field("name", &self.shared.name)
            .field("started", &self.is_started())
            .field("subscribers", &self.shared.tx.receiver_count())
            .finish()
    }
}

impl<V> LiveValue<V> {
    pub fn is_started(&self) -> bool {
        self.shared.pending.lock().is_none()
    }

    pub fn subscriber_count(&self) -> usize {
        self.shared.tx.receiver_count()
    }
}

impl<V> LiveValue<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Wrap `upstream`; its items become the value seen by subscribers
    pub fn new<S>(
        name: &'static str,
        scope: &ViewModelScope,
        initial: V,
        upstream: S,
        sharing: SharingPolicy,
    ) -> Self
    where
        S: Stream<Item = V> + Send + 'static,
    {
        let (tx, _) = watch::channel(initial);
        let tx = Arc::new(tx);

        let emitted = Arc::new(AtomicBool::new(false));

        let publisher = Arc::clone(&tx);
        let first = Arc::clone(&emitted);
        let finished = CancellationToken::new();
        let upstream_done = finished.clone();
        let pipeline = async move {
            futures::pin_mut!(upstream);
            while let Some(value) = upstream.next().await {
                // the cell keeps the value even when nobody is subscribed
                publisher.send_modify(|current| {
                    *current = value;
                    first.store(true, Ordering::Release);
                });
            }
            debug!("{}: upstream completed", name);
            upstream_done.cancel();
        }
        .boxed();

        let live = Self {
            shared: Arc::new(Shared {
                tx,
                emitted,
                finished,
                pending: Mutex::new(Some(pipeline)),
                scope: scope.clone(),
                name,
            }),
        };

        if sharing == SharingPolicy::Eager {
            live.start();
        }
        live
    }

    /// Current value, without starting the upstream
    pub fn get(&self) -> V {
        self.shared.tx.borrow().clone()
    }

    /// Attach a reader; starts the upstream on first use
    ///
    /// The receiver already holds the latest value.
    pub fn subscribe(&self) -> watch::Receiver<V> {
        let rx = self.shared.tx.subscribe();
        self.start();
        rx
    }

    /// Wait for the first upstream emission, then return the current value
    ///
    /// Starts the upstream like [`subscribe`](Self::subscribe). Returns at once
    /// when the upstream has already emitted, and returns the current value
    /// without waiting once the scope is closed or the upstream has ended.
    pub async fn settled(&self) -> V {
        let mut rx = self.subscribe();
        if !self.shared.emitted.load(Ordering::Acquire) {
            tokio::select! {
                _ = rx.changed() => {}
                _ = self.shared.scope.closed() => {
                    debug!("{}: scope closed before first value", self.shared.name);
                }
                _ = self.shared.finished.cancelled() => {
                    debug!("{}: upstream ended without a value", self.shared.name);
                }
            }
        }
        let value = rx.borrow_and_update();
        V::clone(&value)
    }

    fn start(&self) {
        let pipeline = self.shared.pending.lock().take();
        if let Some(pipeline) = pipeline {
            debug!("{}: starting upstream", self.shared.name);
            self.shared.scope.spawn(self.shared.name, pipeline);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::wait_until;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::mpsc;
    use tokio_stream::wrappers::UnboundedReceiverStream;

    fn counted_upstream(
        opens: &Arc<AtomicUsize>,
    ) -> (mpsc::UnboundedSender<u32>, impl Stream<Item = u32> + Send + 'static) {
        let (tx, rx) = mpsc::unbounded_channel();
        let opens = opens.clone();
        let upstream = futures::stream::once(async move {
            opens.fetch_add(1, Ordering::SeqCst);
            UnboundedReceiverStream::new(rx)
        })
        .flatten();
        (tx, upstream)
    }

    #[tokio::test]
    async fn test_lazy_value_waits_for_first_subscriber() {
        let scope = ViewModelScope::new();
        let opens = Arc::new(AtomicUsize::new(0));
        let (tx, upstream) = counted_upstream(&opens);
        let live = LiveValue::new("numbers", &scope, 0u32, upstream, SharingPolicy::Lazy);

        tx.send(7).unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(!live.is_started());
        assert_eq!(live.get(), 0);
        assert_eq!(opens.load(Ordering::SeqCst), 0);

        let mut rx = live.subscribe();
        let value = wait_until(&mut rx, |v| *v == 7).await;
        assert_eq!(value, 7);
        assert_eq!(opens.load(Ordering::SeqCst), 1);
        scope.shutdown().await;
    }

    #[tokio::test]
    async fn test_late_subscriber_gets_latest_value_without_restart() {
        let scope = ViewModelScope::new();
        let opens = Arc::new(AtomicUsize::new(0));
        let (tx, upstream) = counted_upstream(&opens);
        let live = LiveValue::new("numbers", &scope, 0u32, upstream, SharingPolicy::Lazy);

        let mut first = live.subscribe();
        tx.send(1).unwrap();
        tx.send(2).unwrap();
        wait_until(&mut first, |v| *v == 2).await;

        drop(first);
        assert_eq!(live.subscriber_count(), 0);

        // upstream keeps running across the zero-subscriber gap
        tx.send(3).unwrap();
        wait_until(&mut live.subscribe(), |v| *v == 3).await;

        let late = live.subscribe();
        assert_eq!(*late.borrow(), 3);
        assert_eq!(opens.load(Ordering::SeqCst), 1);
        scope.shutdown().await;
    }

    #[tokio::test]
    async fn test_eager_value_starts_immediately() {
        let scope = ViewModelScope::new();
        let opens = Arc::new(AtomicUsize::new(0));
        let (tx, upstream) = counted_upstream(&opens);
        let live = LiveValue::new("numbers", &scope, 0u32, upstream, SharingPolicy::Eager);
        assert!(live.is_started());

        tx.send(5).unwrap();
        for _ in 0..100 {
            if live.get() == 5 {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        assert_eq!(live.get(), 5);
        scope.shutdown().await;
    }

    #[tokio::test]
    async fn test_settled_after_emission_returns_at_once() {
        let scope = ViewModelScope::new();
        let opens = Arc::new(AtomicUsize::new(0));
        let (tx, upstream) = counted_upstream(&opens);
        let live = LiveValue::new("numbers", &scope, 0u32, upstream, SharingPolicy::Eager);

        tx.send(4).unwrap();
        wait_until(&mut live.subscribe(), |v| *v == 4).await;
        assert_eq!(live.settled().await, 4);
        scope.shutdown().await;
    }

    #[tokio::test]
    async fn test_settled_waits_for_first_emission() {
        let scope = ViewModelScope::new();
        let opens = Arc::new(AtomicUsize::new(0));
        let (tx, upstream) = counted_upstream(&opens);
        let live = LiveValue::new("numbers", &scope, 0u32, upstream, SharingPolicy::Lazy);

        let waiter = tokio::spawn({
            let live = live.clone();
            async move { live.settled().await }
        });
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        tx.send(9).unwrap();
        assert_eq!(waiter.await.unwrap(), 9);
        scope.shutdown().await;
    }

    #[tokio::test]
    async fn test_settled_on_closed_scope_returns_initial_value() {
        let scope = ViewModelScope::new();
        let opens = Arc::new(AtomicUsize::new(0));
        let (_tx, upstream) = counted_upstream(&opens);
        let live = LiveValue::new("numbers", &scope, 0u32, upstream, SharingPolicy::Lazy);
        scope.close();

        let value = tokio::time::timeout(std::time::Duration::from_secs(1), live.settled())
            .await
            .expect("settled must not wait on a closed scope");
        assert_eq!(value, 0);
        assert_eq!(opens.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_settled_when_scope_closes_while_waiting() {
        let scope = ViewModelScope::new();
        let live: LiveValue<u32> = LiveValue::new(
            "never",
            &scope,
            3,
            futures::stream::pending(),
            SharingPolicy::Lazy,
        );
        let waiter = tokio::spawn({
            let live = live.clone();
            async move { live.settled().await }
        });
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        scope.close();
        assert_eq!(waiter.await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_settled_when_upstream_ends_empty() {
        let scope = ViewModelScope::new();
        let live: LiveValue<u32> = LiveValue::new(
            "empty",
            &scope,
            5,
            futures::stream::empty(),
            SharingPolicy::Lazy,
        );
        let value = tokio::time::timeout(std::time::Duration::from_secs(1), live.settled())
            .await
            .expect("settled must not wait on a finished upstream");
        assert_eq!(value, 5);
        scope.shutdown().await;
    }

    #[tokio::test]
    async fn test_debug_reports_state() {
        let scope = ViewModelScope::new();
        let live: LiveValue<u32> = LiveValue::new(
            "numbers",
            &scope,
            0,
            futures::stream::pending(),
            SharingPolicy::Lazy,
        );
        let text = format!("{:?}", live);
        assert!(text.contains("numbers"));
        assert!(text.contains("started: false"));
    }

    #[tokio::test]
    async fn test_initial_value_is_never_absent() {
        let scope = ViewModelScope::new();
        let live: LiveValue<LiveResult<String>> = LiveValue::new(
            "names",
            &scope,
            Arc::new(Vec::new()),
            futures::stream::pending(),
            SharingPolicy::Lazy,
        );
        let rx = live.subscribe();
        assert!(rx.borrow().is_empty());
        scope.shutdown().await;
    }

    #[tokio::test]
    async fn test_closed_scope_stops_updates() {
        let scope = ViewModelScope::new();
        let opens = Arc::new(AtomicUsize::new(0));
        let (tx, upstream) = counted_upstream(&opens);
        let live = LiveValue::new("numbers", &scope, 0u32, upstream, SharingPolicy::Eager);

        tx.send(1).unwrap();
        let mut rx = live.subscribe();
        wait_until(&mut rx, |v| *v == 1).await;

        scope.shutdown().await;
        let _ = tx.send(2);
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert_eq!(live.get(), 1);
    }
}
