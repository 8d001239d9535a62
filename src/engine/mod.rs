//! Reactive building blocks for live library queries
//!
//! Stages are plain streams so each one can be tested on its own:
//! decode preferences, drop repeated snapshots, select a query, switch to its
//! live results, and publish them through a shared live value.

mod distinct;
mod live_value;
mod pipeline;
mod resubscribe;
mod scope;
mod switch;

pub use distinct::DistinctUntilChanged;
pub use live_value::{LiveResult, LiveValue};
pub use pipeline::{launch, PipelineOptions, QuerySource};
pub use resubscribe::{resubscribing, Backoff, LiveQuery};
pub use scope::ViewModelScope;
pub use switch::SwitchLatest;

use futures::Stream;

/// Pipeline combinators on top of `futures::Stream`
pub trait PipelineExt: Stream + Sized {
    /// Forward an item only when it differs from the previous one
    fn distinct_until_changed(self) -> DistinctUntilChanged<Self, Self::Item>
    where
        Self::Item: Clone + PartialEq,
    {
        DistinctUntilChanged::new(self)
    }

    /// Map each item to a stream, following only the most recent one
    fn switch_latest<F, U>(self, open: F) -> SwitchLatest<Self, F, U>
    where
        F: FnMut(Self::Item) -> U,
        U: Stream + Unpin,
    {
        SwitchLatest::new(self, open)
    }
}

impl<S: Stream> PipelineExt for S {}
