//! docket-core
//!
//! Assigns a hearing to exactly one available candidate from a ranked pool,
//! via an asynchronous accept/decline protocol with a bounded reply window
//! and automatic escalation on refusal or timeout.
//!
//! Modules:
//! - **domain**: categories, candidate records, offers, lifecycle states, errors
//! - **ports**: seams to the external collaborators (availability ledger,
//!   notification channel, clock)
//! - **router**: correlates inbound replies with outstanding offers
//! - **engine**: the sequential-offer state machine
//! - **impls**: in-memory collaborators for tests and the demo CLI

pub mod domain;
pub mod engine;
pub mod impls;
pub mod ports;
pub mod router;

pub use domain::{
    AssignmentId, AssignmentOutcome, AssignmentState, Availability, CandidateRecord, Category,
    ContactId, DocketError, OfferId, ReplyToken,
};
pub use engine::{AssignmentEngine, AssignmentHandle, DEFAULT_REPLY_WINDOW, EngineConfig};
pub use ports::{AvailabilityLedger, Clock, NotificationChannel, SystemClock};
pub use router::{Routed, SessionRouter};
