use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use super::domain::{
    ConversationId, DialogState, ExpectedInput, InputErrorKind, OutboundMessage, SignalKind,
    Workflow,
};
use super::prompts;
use super::session::{CollectedValues, Session, SessionError, Transition};
use super::store::{SessionStore, StoreError};
use crate::scoring::ScoreReport;

/// Everything a transport needs to render after one inbound event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub messages: Vec<OutboundMessage>,
    pub state: Option<DialogState>,
    pub expecting: Option<ExpectedInput>,
    pub session_ended: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected: Option<InputErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ScoreReport>,
}

impl Reply {
    fn awaiting(messages: Vec<OutboundMessage>, state: DialogState) -> Self {
        Self {
            messages,
            state: Some(state),
            expecting: Some(state.expected_input()),
            session_ended: false,
            rejected: None,
            result: None,
        }
    }

    fn ended(messages: Vec<OutboundMessage>, result: Option<ScoreReport>) -> Self {
        Self {
            messages,
            state: None,
            expecting: None,
            session_ended: true,
            rejected: None,
            result,
        }
    }
}

/// Read-only view of an active session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub conversation_id: ConversationId,
    pub state: DialogState,
    pub workflow: Option<Workflow>,
    pub expecting: ExpectedInput,
    pub values: CollectedValues,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum DialogServiceError {
    #[error("no calculation in progress for this conversation")]
    NoActiveSession,
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Dialog controller: owns sessions through the store and drives them.
pub struct DialogService<S> {
    store: Arc<S>,
}

impl<S> DialogService<S>
where
    S: SessionStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Opens a fresh session at the menu, replacing any existing one.
    pub fn start(&self, conversation: &ConversationId) -> Result<Reply, DialogServiceError> {
        let session = Session::new();
        let reply = Reply::awaiting(session.opening_messages(), session.state());
        self.replace(conversation, Some(session))?;

        info!(%conversation, "calculator session started");
        Ok(reply)
    }

    /// Feeds one user reply to the conversation's session.
    ///
    /// Validation and the state change happen inside a single store update,
    /// so a concurrent signal lands either before or after this reply.
    pub fn reply(
        &self,
        conversation: &ConversationId,
        text: &str,
    ) -> Result<Reply, DialogServiceError> {
        self.store.update(conversation, |slot| -> Result<Reply, DialogServiceError> {
            let session = slot.as_mut().ok_or(DialogServiceError::NoActiveSession)?;
            let from = session.state();

            let transition = match session.handle_reply(text) {
                Ok(transition) => transition,
                Err(err) => {
                    error!(%conversation, state = ?from, error = %err, "discarding inconsistent session");
                    *slot = None;
                    return Err(err.into());
                }
            };
            let state = session.state();

            match transition {
                Transition::Rejected { error, messages } => {
                    if from == DialogState::Menu {
                        debug!(%conversation, "unrecognized menu choice");
                    } else {
                        warn!(%conversation, state = ?from, %error, "reply rejected");
                    }
                    let mut reply = Reply::awaiting(messages, state);
                    reply.rejected = Some(error.kind());
                    Ok(reply)
                }
                Transition::Advanced { messages } => {
                    debug!(%conversation, from = ?from, to = ?state, "reply accepted");
                    Ok(Reply::awaiting(messages, state))
                }
                Transition::Completed { report, messages } => {
                    *slot = None;
                    info!(
                        %conversation,
                        workflow = ?from.workflow(),
                        band = %report.headline_band(),
                        "calculation completed"
                    );
                    Ok(Reply::ended(messages, Some(report)))
                }
            }
        })?
    }

    /// Restart, cancel or clear. Every kind discards the current session;
    /// restart installs the fresh one in the same store update.
    pub fn signal(
        &self,
        conversation: &ConversationId,
        kind: SignalKind,
    ) -> Result<Reply, DialogServiceError> {
        let (fresh, reply) = match kind {
            SignalKind::Restart => {
                let session = Session::new();
                let reply = Reply::awaiting(session.opening_messages(), session.state());
                (Some(session), reply)
            }
            SignalKind::Cancel => (None, Reply::ended(vec![prompts::cancelled()], None)),
            SignalKind::Clear => (None, Reply::ended(vec![prompts::cleared()], None)),
        };

        let discarded = self.replace(conversation, fresh)?;
        info!(
            %conversation,
            ?kind,
            discarded_state = ?discarded.as_ref().map(Session::state),
            "session reset"
        );
        Ok(reply)
    }

    fn replace(
        &self,
        conversation: &ConversationId,
        next: Option<Session>,
    ) -> Result<Option<Session>, StoreError> {
        self.store
            .update(conversation, |slot| std::mem::replace(slot, next))
    }

    pub fn help(&self) -> OutboundMessage {
        prompts::help()
    }

    pub fn snapshot(
        &self,
        conversation: &ConversationId,
    ) -> Result<SessionSnapshot, DialogServiceError> {
        let session = self
            .store
            .load(conversation)?
            .ok_or(DialogServiceError::NoActiveSession)?;
        let state = session.state();

        Ok(SessionSnapshot {
            conversation_id: conversation.clone(),
            state,
            workflow: state.workflow(),
            expecting: state.expected_input(),
            values: session.values().clone(),
            started_at: session.started_at(),
            updated_at: session.updated_at(),
        })
    }
}
