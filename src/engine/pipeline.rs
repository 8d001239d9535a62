//! Preference-driven query pipeline shared by every library screen

use std::fmt::Debug;
use std::sync::Arc;

use futures::stream::BoxStream;
use futures::StreamExt;
use tracing::debug;

use super::{resubscribing, Backoff, LiveQuery, LiveValue, PipelineExt, ViewModelScope};
use crate::config::SharingPolicy;
use crate::models::Preferences;

/// One screen's mapping from raw preferences to a live data query
///
/// `decode` and `select` must be pure: the same preferences always produce the
/// same snapshot, and the same snapshot always produces the same query.
pub trait QuerySource: Send + Sync + 'static {
    /// Typed view/sort/direction; compared to skip redundant re-selection
    type Snapshot: Clone + PartialEq + Debug + Send + Sync + 'static;
    /// Descriptor handed to the data layer
    type Query: Clone + Debug + Send + Sync + 'static;
    /// One full answer of the query
    type Output: Default + Send + Sync + 'static;

    fn decode(&self, prefs: &Preferences) -> Self::Snapshot;

    fn select(&self, snapshot: &Self::Snapshot) -> Self::Query;

    fn open(&self, query: &Self::Query) -> LiveQuery<Self::Output>;
}

/// How a pipeline is started and recovers from query failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    pub backoff: Backoff,
    pub sharing: SharingPolicy,
}

/// Build the decode -> distinct -> select -> switch -> publish pipeline
///
/// Each distinct snapshot selects a query; the previous subscription is
/// dropped before the new one opens, and failed queries are re-opened with
/// backoff until the selection changes.
pub fn launch<Src: QuerySource>(
    name: &'static str,
    scope: &ViewModelScope,
    preferences: BoxStream<'static, Preferences>,
    source: Src,
    options: PipelineOptions,
) -> LiveValue<Arc<Src::Output>> {
    let source = Arc::new(source);
    let decoder = Arc::clone(&source);

    let upstream = preferences
        .map(move |prefs| decoder.decode(&prefs))
        .distinct_until_changed()
        .map(move |snapshot| {
            let query = source.select(&snapshot);
            debug!("{}: {:?} selected {:?}", name, snapshot, query);
            (Arc::clone(&source), query)
        })
        .switch_latest(move |(source, query): (Arc<Src>, Src::Query)| {
            let label = format!("{name}:{query:?}");
            resubscribing(label, move || source.open(&query), options.backoff)
        })
        .map(Arc::new);

    LiveValue::new(
        name,
        scope,
        Arc::new(Src::Output::default()),
        upstream,
        options.sharing,
    )
}
