//! Offer: one outstanding proposal to one candidate for one assignment.

use tokio::time::Instant;

use super::{Category, ContactId, OfferId};

/// One proposal to exactly one candidate.
///
/// Created when a candidate is selected; destroyed on reply, deadline expiry,
/// or cancellation. At most one offer is outstanding per candidate identity
/// (the session router refuses a second subscription for the same identity).
#[derive(Debug, Clone)]
pub struct Offer {
    pub id: OfferId,
    pub candidate: ContactId,
    /// Position in the fetched partition snapshot; addresses ledger updates.
    pub row_index: usize,
    pub requester: ContactId,
    pub category: Category,
    pub deadline: Instant,
}

impl Offer {
    pub fn new(
        candidate: ContactId,
        row_index: usize,
        requester: ContactId,
        category: Category,
        deadline: Instant,
    ) -> Self {
        Self {
            id: OfferId::generate(),
            candidate,
            row_index,
            requester,
            category,
            deadline,
        }
    }
}
