//! In-memory notification channel for tests and the demo CLI.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ContactId;
use crate::ports::channel::{DeliveryError, NotificationChannel};

/// Records every outbound message; sends to armed contacts fail, to exercise
/// the fail-fast delivery path.
#[derive(Default)]
pub struct InMemoryChannel {
    sent: Mutex<Vec<(ContactId, String)>>,
    failing: Mutex<HashSet<ContactId>>,
}

impl InMemoryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every send after this call to `contact` fails with a simulated outage.
    pub fn fail_sends_to(&self, contact: ContactId) {
        self.failing.lock().expect("channel lock poisoned").insert(contact);
    }

    /// All messages sent so far, in order.
    pub fn sent(&self) -> Vec<(ContactId, String)> {
        self.sent.lock().expect("channel lock poisoned").clone()
    }

    /// Messages sent to one contact, in order.
    pub fn sent_to(&self, contact: &ContactId) -> Vec<String> {
        self.sent
            .lock()
            .expect("channel lock poisoned")
            .iter()
            .filter(|(to, _)| to == contact)
            .map(|(_, text)| text.clone())
            .collect()
    }
}

#[async_trait]
impl NotificationChannel for InMemoryChannel {
    async fn send(&self, to: &ContactId, text: &str) -> Result<(), DeliveryError> {
        if self.failing.lock().expect("channel lock poisoned").contains(to) {
            return Err(DeliveryError {
                recipient: to.clone(),
                cause: "simulated outage".to_string(),
            });
        }
        self.sent
            .lock()
            .expect("channel lock poisoned")
            .push((to.clone(), text.to_string()));
        Ok(())
    }
}
