use thiserror::Error;

/// Requester-facing failures of an assignment flow.
///
/// The Display strings double as the notification texts sent to the
/// requester, so they stay human-readable and carry the cause verbatim.
#[derive(Debug, Error)]
pub enum DocketError {
    /// The category label matched nothing in the enumeration. Recoverable:
    /// the requester can retry with a listed option.
    #[error("invalid category, choose a listed option")]
    InvalidCategory(String),

    /// Partition fetch or row update failed. Fatal to the current task.
    #[error("error accessing partition '{partition}': {cause}")]
    LedgerUnavailable { partition: String, cause: String },

    /// Notification send failed. Fatal to the current offer attempt; the
    /// task aborts rather than silently skipping to the next candidate.
    #[error("could not deliver notification to '{recipient}': {cause}")]
    DeliveryFailed { recipient: String, cause: String },
}
