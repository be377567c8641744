//! Frontdesk assistant core.
//!
//! Wires the pipeline together: intent resolution ([`resolver`]), role
//! authorization (from `frontdesk-policy`), candidate search ([`search`]),
//! confirmation tokens (from `frontdesk-pending`), guarded execution
//! ([`executor`]), field sanitization, and response composition
//! ([`responder`]), all sequenced by the [`orchestrator::Assistant`].

pub mod executor;
pub mod orchestrator;
pub mod resolver;
pub mod responder;
pub mod search;
pub mod store;

pub use executor::{ActionExecutor, ActionOutcome};
pub use orchestrator::{Assistant, ChatReply, ConfirmationOption, ProcessError};
pub use resolver::{IntentResolver, Resolution};
pub use responder::Responder;
pub use search::CandidateSearch;
pub use store::{AppointmentSnapshot, AppointmentStatus, Candidate, RecordStore, SearchWindow};
