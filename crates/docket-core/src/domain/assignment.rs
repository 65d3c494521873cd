//! Assignment request lifecycle: states, outcomes, per-offer resolutions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AssignmentId, Category, ContactId};

/// One assignment attempt. Lives in process memory only, owned exclusively
/// by the engine flow driving it.
#[derive(Debug, Clone)]
pub struct AssignmentRequest {
    pub id: AssignmentId,
    pub category: Category,
    pub requester: ContactId,
    pub created_at: DateTime<Utc>,
}

impl AssignmentRequest {
    pub fn new(category: Category, requester: ContactId) -> Self {
        Self {
            id: AssignmentId::generate(),
            category,
            requester,
            created_at: Utc::now(),
        }
    }
}

/// State of one assignment flow.
///
/// Transitions:
/// - SelectingCategory -> AwaitingCandidateList -> OfferingToCandidate
/// - OfferingToCandidate -> AwaitingReply -> Assigned
/// - OfferingToCandidate -> AwaitingReply -> OfferingToCandidate (decline / timeout, next candidate)
/// - OfferingToCandidate -> Exhausted (no Free candidate left)
/// - any -> Cancelled
///
/// Published through a `watch` channel on the handle so callers can observe
/// progress without polling the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentState {
    SelectingCategory,
    AwaitingCandidateList,
    OfferingToCandidate,
    AwaitingReply,
    Assigned,
    Exhausted,
    Cancelled,
}

impl AssignmentState {
    /// Terminal states admit no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            AssignmentState::Assigned | AssignmentState::Exhausted | AssignmentState::Cancelled
        )
    }
}

/// Final outcome of one assignment flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentOutcome {
    /// Exactly one candidate accepted and the ledger row was claimed.
    Assigned { candidate: ContactId },
    /// Every Free candidate in the snapshot declined, timed out, or was lost.
    Exhausted,
    /// Requester cancelled, or a collaborator failure aborted the flow.
    Cancelled,
}

/// How one offer ended. Telemetry discriminator: a timeout behaves like a
/// decline but must stay distinguishable in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferResolution {
    Accepted,
    Declined,
    TimedOut,
    /// Accept arrived but the conditional claim found the row no longer Free
    /// (another writer got there first).
    Lost,
}
