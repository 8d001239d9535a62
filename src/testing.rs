//! Shared helpers for unit tests

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::watch;

use crate::errors::RefreshError;
use crate::models::ArtistPage;
use crate::plugins::ArtistMetadataClient;

const WAIT_LIMIT: Duration = Duration::from_secs(5);

/// Wait until the receiver holds a value matching `pred`
pub async fn wait_until<V, P>(rx: &mut watch::Receiver<V>, pred: P) -> V
where
    V: Clone,
    P: FnMut(&V) -> bool,
{
    let value = tokio::time::timeout(WAIT_LIMIT, rx.wait_for(pred))
        .await
        .expect("timed out waiting for value")
        .expect("sender dropped");
    V::clone(&value)
}

/// Metadata client that records requests and answers from a script
///
/// Unscripted ids get a page with a thumbnail.
#[derive(Debug)]
pub struct FakeMetadataClient {
    calls: watch::Sender<Vec<String>>,
    pages: Mutex<HashMap<String, ArtistPage>>,
    failing: Mutex<Vec<String>>,
}

impl Default for FakeMetadataClient {
    fn default() -> Self {
        let (calls, _) = watch::channel(Vec::new());
        Self {
            calls,
            pages: Mutex::new(HashMap::new()),
            failing: Mutex::new(Vec::new()),
        }
    }
}

impl FakeMetadataClient {
    pub fn respond(&self, page: ArtistPage) {
        self.pages.lock().insert(page.id.clone(), page);
    }

    pub fn fail(&self, id: &str) {
        self.failing.lock().push(id.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub async fn wait_for_calls(&self, count: usize) -> Vec<String> {
        let mut rx = self.calls.subscribe();
        wait_until(&mut rx, |calls| calls.len() >= count).await
    }
}

#[async_trait]
impl ArtistMetadataClient for FakeMetadataClient {
    async fn artist(&self, id: &str) -> Result<ArtistPage, RefreshError> {
        self.calls.send_modify(|calls| calls.push(id.to_string()));

        if self.failing.lock().iter().any(|f| f == id) {
            return Err(RefreshError::Status {
                id: id.to_string(),
                status: 503,
            });
        }

        let page = self.pages.lock().get(id).cloned();
        Ok(page.unwrap_or_else(|| ArtistPage {
            id: id.to_string(),
            name: String::new(),
            thumbnail_url: Some(format!("https://img.example/{id}")),
            description: None,
        }))
    }
}
