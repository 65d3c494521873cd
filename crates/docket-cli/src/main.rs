//! Demo binary: wires the in-memory collaborators to the assignment engine
//! and runs one scripted hearing assignment end to end.
//!
//! Optionally takes a JSON roster file as the first argument; otherwise a
//! built-in sample roster is used. Replies that would normally arrive over
//! the messaging transport are injected through the session router on a
//! timer.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::time::{Duration, sleep};

use docket_core::domain::{Availability, CandidateRecord, Category, ContactId};
use docket_core::impls::InMemorySheetLedger;
use docket_core::ports::channel::{DeliveryError, NotificationChannel};
use docket_core::{AssignmentEngine, AvailabilityLedger, SessionRouter, SystemClock};

#[derive(Debug, Deserialize)]
struct RosterEntry {
    name: String,
    contact: String,
    #[serde(default)]
    busy: bool,
}

#[derive(Debug, Default, Deserialize)]
struct RosterFile {
    #[serde(default)]
    civel: Vec<RosterEntry>,
    #[serde(default)]
    criminal: Vec<RosterEntry>,
    #[serde(default)]
    juri: Vec<RosterEntry>,
}

/// Prints every outbound notification; stands in for the real transport.
struct StdoutChannel;

#[async_trait]
impl NotificationChannel for StdoutChannel {
    async fn send(&self, to: &ContactId, text: &str) -> Result<(), DeliveryError> {
        println!("  -> {to}: {text}");
        Ok(())
    }
}

fn record(entry: &RosterEntry) -> CandidateRecord {
    CandidateRecord {
        identity: ContactId::new(entry.contact.clone()),
        name: entry.name.clone(),
        availability: if entry.busy {
            Availability::Busy
        } else {
            Availability::Free
        },
        last_assigned: None,
    }
}

fn sample_roster() -> RosterFile {
    let entry = |name: &str, contact: &str, busy: bool| RosterEntry {
        name: name.to_string(),
        contact: contact.to_string(),
        busy,
    };
    RosterFile {
        civel: vec![entry("Ana Prado", "adv-ana", false)],
        criminal: vec![
            entry("Bruno Leme", "adv-bruno", true),
            entry("Carla Souto", "adv-carla", false),
            entry("Diego Ramos", "adv-diego", false),
        ],
        juri: vec![entry("Elisa Horta", "adv-elisa", false)],
    }
}

fn seed(ledger: &InMemorySheetLedger, roster: &RosterFile) {
    for (category, entries) in [
        (Category::Civel, &roster.civel),
        (Category::Criminal, &roster.criminal),
        (Category::Juri, &roster.juri),
    ] {
        let records: Vec<_> = entries.iter().map(record).collect();
        ledger.seed_partition(category, &records);
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let roster = match std::env::args().nth(1) {
        Some(path) => {
            let raw = std::fs::read_to_string(&path).expect("cannot read roster file");
            serde_json::from_str(&raw).expect("cannot parse roster file")
        }
        None => sample_roster(),
    };

    let ledger = Arc::new(InMemorySheetLedger::new());
    seed(&ledger, &roster);

    let router = Arc::new(SessionRouter::new());
    let ledger_port: Arc<dyn AvailabilityLedger> = ledger.clone();
    let engine = Arc::new(AssignmentEngine::new(
        ledger_port,
        Arc::new(StdoutChannel),
        Arc::clone(&router),
        Arc::new(SystemClock),
    ));

    println!("requesting a candidate for a 'Criminal' hearing");
    let handle = engine
        .begin("Criminal", ContactId::new("court-clerk"))
        .await
        .expect("assignment could not start");
    tracing::info!(id = %handle.id(), "assignment flow started");

    // Scripted replies: Carla declines, Diego accepts.
    let replies = tokio::spawn({
        let router = Arc::clone(&router);
        async move {
            sleep(Duration::from_millis(300)).await;
            println!("  <- adv-carla: não");
            router.route(&ContactId::new("adv-carla"), "não");
            sleep(Duration::from_millis(300)).await;
            println!("  <- adv-diego: sim");
            router.route(&ContactId::new("adv-diego"), "sim");
        }
    });

    let outcome = handle.outcome().await;
    let _ = replies.await;
    println!("outcome: {outcome:?}");

    let partition = ledger
        .fetch_partition(Category::Criminal)
        .await
        .expect("partition vanished");
    println!("final partition state:");
    for rec in partition {
        println!(
            "  {} ({}) - {:?}, last assigned {:?}",
            rec.name, rec.identity, rec.availability, rec.last_assigned
        );
    }
}
