// src/services/fetch_state.rs
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::debug;
use tokio::sync::{watch, RwLock};

/// Point-in-time copy of a fetched list and its loading/error flags.
#[derive(Debug)]
pub struct Snapshot<T> {
    pub items: Arc<Vec<T>>,
    pub loading: bool,
    pub error: Option<String>,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
            loading: self.loading,
            error: self.error.clone(),
            fetched_at: self.fetched_at,
        }
    }
}

struct Inner<T> {
    items: Arc<Vec<T>>,
    loading: bool,
    error: Option<String>,
    fetched_at: Option<DateTime<Utc>>,
    latest: u64,
}

/// List state written only by the most recently started fetch.
///
/// Every fetch calls [`FetchState::begin`] for a token and hands it back to
/// [`FetchState::finish`]. A finish whose token is no longer the latest is
/// dropped, so a slow stale response cannot overwrite a newer one.
/// Accepted lists are also published on a `watch` channel, in the same order.
pub struct FetchState<T> {
    name: &'static str,
    inner: RwLock<Inner<T>>,
    published: watch::Sender<Arc<Vec<T>>>,
}

impl<T> FetchState<T> {
    /// Starts empty and loading, like a view that has just been mounted.
    pub fn new(name: &'static str) -> Self {
        let (published, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            name,
            published,
            inner: RwLock::new(Inner {
                items: Arc::new(Vec::new()),
                loading: true,
                error: None,
                fetched_at: None,
                latest: 0,
            }),
        }
    }

    pub async fn begin(&self) -> u64 {
        let mut inner = self.inner.write().await;
        inner.latest += 1;
        inner.loading = true;
        inner.error = None;
        inner.latest
    }

    /// Replaces the whole list (or empties it and records the error).
    /// Returns the new list, or `None` when `token` is stale.
    pub async fn finish(&self, token: u64, outcome: Result<Vec<T>, String>) -> Option<Arc<Vec<T>>> {
        let mut inner = self.inner.write().await;
        if token != inner.latest {
            debug!(
                "{}: discarding stale result (token {}, latest {})",
                self.name, token, inner.latest
            );
            return None;
        }

        match outcome {
            Ok(items) => {
                inner.items = Arc::new(items);
                inner.error = None;
            }
            Err(message) => {
                inner.items = Arc::new(Vec::new());
                inner.error = Some(message);
            }
        }
        inner.loading = false;
        inner.fetched_at = Some(Utc::now());
        // still under the write guard, so the channel sees lists in token order
        self.published.send_replace(Arc::clone(&inner.items));
        Some(Arc::clone(&inner.items))
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<T>>> {
        self.published.subscribe()
    }

    /// Last list accepted by [`FetchState::finish`].
    pub fn current(&self) -> Arc<Vec<T>> {
        Arc::clone(&self.published.borrow())
    }

    pub async fn snapshot(&self) -> Snapshot<T> {
        let inner = self.inner.read().await;
        Snapshot {
            items: Arc::clone(&inner.items),
            loading: inner.loading,
            error: inner.error.clone(),
            fetched_at: inner.fetched_at,
        }
    }
}
