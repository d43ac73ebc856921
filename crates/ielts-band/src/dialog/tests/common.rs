use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use axum::response::Response;
use serde_json::Value;

use crate::dialog::{
    dialog_router, ConversationId, DialogService, DialogServiceError, InMemorySessionStore,
    OutboundMessage, Reply, Session, SessionStore, SignalKind, StoreError, Transition,
};
use crate::scoring::{BandScore, ScoreReport};

pub(super) fn band(value: f64) -> BandScore {
    BandScore::new(value).expect("valid band")
}

/// Feeds every reply in order, failing on any controller defect.
pub(super) fn drive(session: &mut Session, replies: &[&str]) -> Vec<Transition> {
    replies
        .iter()
        .map(|reply| session.handle_reply(reply).expect("session stays consistent"))
        .collect()
}

pub(super) fn completed_report(transitions: &[Transition]) -> ScoreReport {
    match transitions.last() {
        Some(Transition::Completed { report, .. }) => report.clone(),
        other => panic!("workflow did not complete: {other:?}"),
    }
}

pub(super) fn messages(transition: &Transition) -> &[OutboundMessage] {
    match transition {
        Transition::Rejected { messages, .. }
        | Transition::Advanced { messages }
        | Transition::Completed { messages, .. } => messages,
    }
}

/// Valid replies that walk each workflow from the menu to its result.
pub(super) const FULL_RUNS: [&[&str]; 5] = [
    &["Listening", "30"],
    &["Reading", "Academic", "30"],
    &[
        "Writing", "6.5", "7.0", "6.0", "6.5", "7.0", "7.0", "6.5", "7.0",
    ],
    &["Speaking", "6.0", "6.5", "7.0", "6.5"],
    &[
        "Overall",
        "Academic",
        "Raw Score",
        "30",
        "Band Score",
        "6.5",
        "6.5",
        "6.5",
    ],
];

pub(super) struct UnavailableStore;

impl SessionStore for UnavailableStore {
    fn load(&self, _id: &ConversationId) -> Result<Option<Session>, StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }

    fn update<T, F>(&self, _id: &ConversationId, _apply: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Option<Session>) -> T,
    {
        Err(StoreError::Unavailable("offline".to_string()))
    }
}

/// Fires a cancel from another thread while the first update is in flight.
pub(super) struct CancelDuringUpdateStore {
    pub(super) inner: InMemorySessionStore,
    armed: AtomicBool,
    cancel: Mutex<Option<JoinHandle<Result<Reply, DialogServiceError>>>>,
}

impl CancelDuringUpdateStore {
    pub(super) fn new(inner: InMemorySessionStore) -> Self {
        Self {
            inner,
            armed: AtomicBool::new(false),
            cancel: Mutex::new(None),
        }
    }

    pub(super) fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }

    pub(super) fn join_cancel(&self) -> Reply {
        self.cancel
            .lock()
            .unwrap()
            .take()
            .expect("cancel was fired")
            .join()
            .expect("cancel thread finished")
            .expect("cancel succeeds")
    }
}

impl SessionStore for CancelDuringUpdateStore {
    fn load(&self, id: &ConversationId) -> Result<Option<Session>, StoreError> {
        self.inner.load(id)
    }

    fn update<T, F>(&self, id: &ConversationId, apply: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Option<Session>) -> T,
    {
        self.inner.update(id, |slot| {
            if self.armed.swap(false, Ordering::SeqCst) {
                let store = Arc::new(self.inner.clone());
                let id = id.clone();
                let handle = thread::spawn(move || {
                    DialogService::new(store).signal(&id, SignalKind::Cancel)
                });
                *self.cancel.lock().unwrap() = Some(handle);
                // Give the cancel every chance to run before the reply finishes.
                thread::sleep(Duration::from_millis(20));
            }
            apply(slot)
        })
    }
}

pub(super) fn conversation(id: &str) -> ConversationId {
    ConversationId::new(id)
}

pub(super) fn build_service() -> (DialogService<InMemorySessionStore>, Arc<InMemorySessionStore>) {
    let store = Arc::new(InMemorySessionStore::default());
    let service = DialogService::new(store.clone());
    (service, store)
}

pub(super) fn router_with_service(service: DialogService<InMemorySessionStore>) -> axum::Router {
    dialog_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("valid json")
}
