use super::*;
use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Notify;

type Script = VecDeque<Result<Page<&'static str>, FetchError>>;

#[derive(Clone)]
struct ScriptedSource {
    responses: Arc<Mutex<Script>>,
    requests: Arc<Mutex<Vec<PageRequest>>>,
    started: Arc<Notify>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedSource {
    fn new(responses: Vec<Result<Page<&'static str>, FetchError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into())),
            requests: Arc::new(Mutex::new(Vec::new())),
            started: Arc::new(Notify::new()),
            gate: None,
        }
    }

    fn gated(responses: Vec<Result<Page<&'static str>, FetchError>>) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let mut source = Self::new(responses);
        source.gate = Some(gate.clone());
        (source, gate)
    }

    async fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl RemoteListSource for ScriptedSource {
    type Item = &'static str;

    async fn fetch_page(&self, request: PageRequest) -> Result<Page<&'static str>, FetchError> {
        self.requests.lock().await.push(request);
        self.started.notify_one();
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::network("script exhausted")))
    }
}

fn page(items: &[&'static str], next: Option<&str>) -> Result<Page<&'static str>, FetchError> {
    Ok(Page::new(items.to_vec(), next.map(str::to_string)))
}

#[tokio::test]
async fn initial_page_populates_items_and_cursor() {
    let source = ScriptedSource::new(vec![page(&["a", "b"], Some("c1"))]);
    let controller = ListController::new("games", source.clone());

    let outcome = controller.load_initial().await;
    assert_eq!(
        outcome,
        LoadOutcome::Loaded {
            added: 2,
            exhausted: false
        }
    );

    let state = controller.snapshot().await;
    assert_eq!(state.items, vec!["a", "b"]);
    assert_eq!(state.next_cursor.as_deref(), Some("c1"));
    assert!(!state.exhausted);
    assert!(!state.loading);
    assert_eq!(source.requests().await, vec![PageRequest::Initial]);
}

#[tokio::test]
async fn load_more_appends_and_marks_exhausted_on_last_page() {
    let source = ScriptedSource::new(vec![
        page(&["a", "b"], Some("c1")),
        page(&["c"], None),
    ]);
    let controller = ListController::new("games", source.clone());

    controller.load_initial().await;
    let outcome = controller.load_more().await;
    assert_eq!(
        outcome,
        LoadOutcome::Loaded {
            added: 1,
            exhausted: true
        }
    );

    let state = controller.snapshot().await;
    assert_eq!(state.items, vec!["a", "b", "c"]);
    assert!(state.exhausted);
    assert!(state.next_cursor.is_none());
    assert_eq!(
        source.requests().await,
        vec![PageRequest::Initial, PageRequest::Cursor("c1".into())]
    );
}

#[tokio::test]
async fn exhausted_list_issues_no_further_requests() {
    let source = ScriptedSource::new(vec![page(&["only"], None)]);
    let controller = ListController::new("stores", source.clone());

    controller.load_initial().await;
    for _ in 0..3 {
        assert_eq!(controller.load_more().await, LoadOutcome::Skipped);
    }

    assert_eq!(source.requests().await.len(), 1);
}

#[tokio::test]
async fn load_more_before_any_fetch_is_a_noop() {
    let source = ScriptedSource::new(Vec::new());
    let controller = ListController::new("creators", source.clone());

    assert_eq!(controller.load_more().await, LoadOutcome::Skipped);

    let state = controller.snapshot().await;
    assert!(state.items.is_empty());
    assert!(!state.exhausted);
    assert!(source.requests().await.is_empty());
}

#[tokio::test]
async fn initial_failure_leaves_list_empty_and_records_error() {
    let source = ScriptedSource::new(vec![Err(FetchError::network("connection refused"))]);
    let controller = ListController::new("games", source);

    let outcome = controller.load_initial().await;
    assert_eq!(
        outcome,
        LoadOutcome::Failed(FetchError::network("connection refused"))
    );

    let state = controller.snapshot().await;
    assert!(state.items.is_empty());
    assert!(!state.loading);
    assert_eq!(state.error, Some(FetchError::network("connection refused")));
}

#[tokio::test]
async fn failed_page_keeps_items_and_next_success_clears_error() {
    let source = ScriptedSource::new(vec![
        page(&["a"], Some("c1")),
        Err(FetchError::decode("missing field `results`")),
        page(&["b"], Some("c2")),
    ]);
    let controller = ListController::new("games", source.clone());

    controller.load_initial().await;
    assert!(matches!(controller.load_more().await, LoadOutcome::Failed(_)));

    let state = controller.snapshot().await;
    assert_eq!(state.items, vec!["a"]);
    assert_eq!(state.next_cursor.as_deref(), Some("c1"));
    assert!(state.error.is_some());

    controller.load_more().await;
    let state = controller.snapshot().await;
    assert_eq!(state.items, vec!["a", "b"]);
    assert!(state.error.is_none());
    assert_eq!(
        source.requests().await,
        vec![
            PageRequest::Initial,
            PageRequest::Cursor("c1".into()),
            PageRequest::Cursor("c1".into()),
        ]
    );
}

#[tokio::test]
async fn overlapping_pages_are_appended_without_dedup() {
    let source = ScriptedSource::new(vec![
        page(&["a", "b"], Some("c1")),
        page(&["b", "c"], None),
    ]);
    let controller = ListController::new("games", source);

    controller.load_initial().await;
    controller.load_more().await;

    assert_eq!(controller.snapshot().await.items, vec!["a", "b", "b", "c"]);
}

#[tokio::test]
async fn concurrent_loads_while_pending_issue_a_single_request() {
    let (source, gate) = ScriptedSource::gated(vec![page(&["a", "b"], Some("c1"))]);
    let controller = ListController::new("games", source.clone());

    let first = tokio::spawn({
        let controller = controller.clone();
        async move { controller.load_initial().await }
    });
    source.started.notified().await;

    assert!(controller.snapshot().await.loading);
    assert_eq!(controller.load_initial().await, LoadOutcome::Skipped);
    assert_eq!(controller.load_more().await, LoadOutcome::Skipped);

    gate.notify_one();
    let outcome = first.await.expect("join");
    assert_eq!(
        outcome,
        LoadOutcome::Loaded {
            added: 2,
            exhausted: false
        }
    );
    assert_eq!(source.requests().await.len(), 1);
    assert_eq!(controller.snapshot().await.items, vec!["a", "b"]);
}

#[tokio::test]
async fn dispose_abandons_in_flight_fetch() {
    let (source, _gate) = ScriptedSource::gated(vec![page(&["late"], Some("c1"))]);
    let controller = ListController::new("games", source.clone());

    let pending = tokio::spawn({
        let controller = controller.clone();
        async move { controller.load_initial().await }
    });
    source.started.notified().await;

    controller.dispose();
    assert_eq!(pending.await.expect("join"), LoadOutcome::Abandoned);

    let state = controller.snapshot().await;
    assert!(state.items.is_empty());
    assert!(!state.loading);
    assert!(state.next_cursor.is_none());
    assert_eq!(controller.load_initial().await, LoadOutcome::Skipped);
    assert_eq!(source.requests().await.len(), 1);
}

#[tokio::test]
async fn events_follow_the_fetch_cycle() {
    let source = ScriptedSource::new(vec![
        page(&["a"], None),
    ]);
    let controller = ListController::new("games", source);
    let mut events = controller.subscribe();

    controller.load_initial().await;

    assert_eq!(events.recv().await.expect("event"), ListEvent::Loading);
    assert_eq!(
        events.recv().await.expect("event"),
        ListEvent::PageLoaded {
            added: 1,
            exhausted: true
        }
    );
}
