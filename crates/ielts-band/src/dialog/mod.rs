//! Turn-by-turn calculator dialog.
//!
//! A [`Session`] is a finite-state machine with one state per pending input.
//! [`DialogService`] keeps one session per conversation in a
//! [`SessionStore`] and turns inbound events into [`Reply`] values; it never
//! performs transport I/O itself.

mod domain;
pub mod prompts;
pub mod router;
mod service;
mod session;
mod store;

#[cfg(test)]
mod tests;

pub use domain::{
    parse_band_score, parse_input_kind, parse_module, parse_raw_score, ConversationId,
    DialogState, ExpectedInput, InputError, InputErrorKind, InputKind, OutboundMessage,
    SignalKind, Workflow,
};
pub use router::dialog_router;
pub use service::{DialogService, DialogServiceError, Reply, SessionSnapshot};
pub use session::{
    CollectedValues, ListeningValues, OverallValues, ReadingValues, Session, SessionError,
    SpeakingValues, Transition, WritingValues,
};
pub use store::{InMemorySessionStore, SessionStore, StoreError};
