//! NotificationChannel port - the external messaging transport.
//!
//! Outbound only: inbound messages reach the core through
//! [`SessionRouter::route`](crate::router::SessionRouter::route), fed by
//! whatever transport callback the integration wires up.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::ContactId;

#[derive(Debug, Error)]
#[error("delivery to '{recipient}' failed: {cause}")]
pub struct DeliveryError {
    pub recipient: ContactId,
    pub cause: String,
}

/// Sends a message to a contact. Failures are not retried by the core; they
/// abort the current offer attempt and are reported to the requester.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    async fn send(&self, to: &ContactId, text: &str) -> Result<(), DeliveryError>;
}
