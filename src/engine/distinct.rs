//! Change filter: drop consecutive duplicates

use std::pin::Pin;
use std::task::{ready, Context, Poll};

use futures::Stream;
use pin_project_lite::pin_project;

pin_project! {
    /// Stream adapter that forwards the first item and every item that differs
    /// from the one forwarded just before it
    #[must_use = "streams do nothing unless polled"]
    pub struct DistinctUntilChanged<S, T> {
        #[pin]
        stream: S,
        last: Option<T>,
    }
}

impl<S, T> DistinctUntilChanged<S, T> {
    pub(crate) fn new(stream: S) -> Self {
        Self { stream, last: None }
    }
}

impl<S, T> Stream for DistinctUntilChanged<S, T>
where
    S: Stream<Item = T>,
    T: Clone + PartialEq,
{
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        let mut this = self.project();
        loop {
            match ready!(this.stream.as_mut().poll_next(cx)) {
                Some(item) => {
                    if this.last.as_ref() == Some(&item) {
                        continue;
                    }
                    *this.last = Some(item.clone());
                    return Poll::Ready(Some(item));
                }
                None => return Poll::Ready(None),
            }
        }
    }
}
