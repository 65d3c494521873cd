//! Impls - dev/test implementations of the ports.
//!
//! Production integrations (the real sheet client, the real messenger) live
//! in their own crates; here are the in-memory stand-ins the tests and the
//! demo CLI wire up.

pub mod memory_channel;
pub mod memory_ledger;

pub use self::memory_channel::InMemoryChannel;
pub use self::memory_ledger::InMemorySheetLedger;
