//! Query switcher: follow only the most recent selection

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::{Stream, StreamExt};
use pin_project_lite::pin_project;
use tracing::debug;

pin_project! {
    /// Maps each outer item to an inner stream and forwards only the newest one
    ///
    /// When the outer stream yields, the held inner stream is dropped before the
    /// replacement is opened, so at most one inner subscription exists at a time
    /// and nothing buffered by the old one can be forwarded. The stream ends once
    /// the outer stream has ended and the last inner stream is exhausted.
    #[must_use = "streams do nothing unless polled"]
    pub struct SwitchLatest<S, F, U> {
        #[pin]
        outer: S,
        open: F,
        inner: Option<U>,
        generation: u64,
        outer_done: bool,
    }
}

impl<S, F, U> SwitchLatest<S, F, U> {
    pub(crate) fn new(outer: S, open: F) -> Self {
        Self {
            outer,
            open,
            inner: None,
            generation: 0,
            outer_done: false,
        }
    }

    /// Number of inner subscriptions opened so far
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl<S, F, U> Stream for SwitchLatest<S, F, U>
where
    S: Stream,
    F: FnMut(S::Item) -> U,
    U: Stream + Unpin,
{
    type Item = U::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<U::Item>> {
        let mut this = self.project();

        // drain the outer stream so we always switch to the latest selection
        while !*this.outer_done {
            match this.outer.as_mut().poll_next(cx) {
                Poll::Ready(Some(selection)) => {
                    // release the old subscription before opening the next one
                    this.inner.take();
                    *this.generation += 1;
                    debug!("Switching to subscription {}", this.generation);
                    *this.inner = Some((this.open)(selection));
                }
                Poll::Ready(None) => *this.outer_done = true,
                Poll::Pending => break,
            }
        }

        let Some(inner) = this.inner.as_mut() else {
            return if *this.outer_done {
                Poll::Ready(None)
            } else {
                Poll::Pending
            };
        };

        match inner.poll_next_unpin(cx) {
            Poll::Ready(Some(item)) => Poll::Ready(Some(item)),
            Poll::Ready(None) => {
                this.inner.take();
                if *this.outer_done {
                    Poll::Ready(None)
                } else {
                    // outer was polled above and registered the waker
                    Poll::Pending
                }
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
