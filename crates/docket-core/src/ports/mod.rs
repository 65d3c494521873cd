//! Ports - interfaces to the external collaborators.
//!
//! The ledger and the notification transport are outside this system's
//! scope; these traits are the seams the engine depends on. Dev-grade
//! implementations live in [`crate::impls`].

pub mod channel;
pub mod clock;
pub mod ledger;

pub use self::channel::{DeliveryError, NotificationChannel};
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::ledger::{AvailabilityLedger, LedgerError};
