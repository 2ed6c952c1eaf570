use std::sync::Arc;

use shared::{
    error::FetchError,
    protocol::{Page, PageRequest},
};
use tokio::sync::{broadcast, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::source::RemoteListSource;

/// Accumulated state of one paginated list.
///
/// `items` only ever grows, in arrival order. Pages that overlap on the
/// server side show up twice; nothing is deduplicated.
#[derive(Debug, Clone, PartialEq)]
pub struct ListState<T> {
    pub items: Vec<T>,
    pub loading: bool,
    pub next_cursor: Option<String>,
    pub exhausted: bool,
    pub error: Option<FetchError>,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            next_cursor: None,
            exhausted: false,
            error: None,
        }
    }
}

impl<T> ListState<T> {
    pub fn can_load_more(&self) -> bool {
        !self.loading && !self.exhausted && self.next_cursor.is_some()
    }

    fn apply_page(&mut self, page: Page<T>) -> usize {
        let added = page.items.len();
        self.exhausted = page.is_last();
        self.items.extend(page.items);
        self.next_cursor = page.next_cursor;
        added
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Guard rejected the call; no request was issued.
    Skipped,
    Loaded { added: usize, exhausted: bool },
    Failed(FetchError),
    /// The controller was disposed while the request was in flight.
    Abandoned,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent {
    Loading,
    PageLoaded { added: usize, exhausted: bool },
    Failed(FetchError),
}

pub struct ListController<S: RemoteListSource> {
    label: String,
    source: S,
    state: Mutex<ListState<S::Item>>,
    cancel: CancellationToken,
    events: broadcast::Sender<ListEvent>,
}

impl<S: RemoteListSource + 'static> ListController<S> {
    pub fn new(label: impl Into<String>, source: S) -> Arc<Self> {
        let (events, _) = broadcast::channel(64);
        Arc::new(Self {
            label: label.into(),
            source,
            state: Mutex::new(ListState::default()),
            cancel: CancellationToken::new(),
            events,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Fetches the endpoint's first page. Only an in-flight fetch or a
    /// disposed controller turns this into a no-op.
    pub async fn load_initial(&self) -> LoadOutcome {
        {
            let mut state = self.state.lock().await;
            if self.cancel.is_cancelled() || state.loading {
                return LoadOutcome::Skipped;
            }
            state.loading = true;
            state.error = None;
        }
        self.run_cycle(PageRequest::Initial).await
    }

    pub async fn load_more(&self) -> LoadOutcome {
        let cursor = {
            let mut state = self.state.lock().await;
            if self.cancel.is_cancelled() || !state.can_load_more() {
                return LoadOutcome::Skipped;
            }
            let Some(cursor) = state.next_cursor.clone() else {
                return LoadOutcome::Skipped;
            };
            state.loading = true;
            state.error = None;
            cursor
        };
        self.run_cycle(PageRequest::Cursor(cursor)).await
    }

    /// Caller must already have set `loading` under the state lock.
    async fn run_cycle(&self, request: PageRequest) -> LoadOutcome {
        let _ = self.events.send(ListEvent::Loading);
        debug!(list = %self.label, request = %request.redacted(), "list: fetching page");

        let result = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            result = self.source.fetch_page(request) => Some(result),
        };

        let mut state = self.state.lock().await;
        state.loading = false;

        let Some(result) = result.filter(|_| !self.cancel.is_cancelled()) else {
            debug!(list = %self.label, "list: dropping page for disposed list");
            return LoadOutcome::Abandoned;
        };

        match result {
            Ok(page) => {
                let added = state.apply_page(page);
                let exhausted = state.exhausted;
                info!(
                    list = %self.label,
                    added,
                    total = state.items.len(),
                    exhausted,
                    "list: page loaded"
                );
                let _ = self.events.send(ListEvent::PageLoaded { added, exhausted });
                LoadOutcome::Loaded { added, exhausted }
            }
            Err(err) => {
                warn!(list = %self.label, error = %err, "list: page fetch failed");
                state.error = Some(err.clone());
                let _ = self.events.send(ListEvent::Failed(err.clone()));
                LoadOutcome::Failed(err)
            }
        }
    }

    /// Stops the list for good: an in-flight fetch is abandoned and every
    /// later load call is a no-op.
    pub fn dispose(&self) {
        if !self.cancel.is_cancelled() {
            debug!(list = %self.label, "list: disposed");
        }
        self.cancel.cancel();
    }

    pub fn is_disposed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub async fn has_next_cursor(&self) -> bool {
        self.state.lock().await.next_cursor.is_some()
    }

    pub async fn snapshot(&self) -> ListState<S::Item> {
        self.state.lock().await.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ListEvent> {
        self.events.subscribe()
    }
}

impl<S: RemoteListSource> Drop for ListController<S> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
