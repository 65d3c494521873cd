//! Offer state machine: drives one assignment from category selection to a
//! terminal state.
//!
//! One flow per assignment request, strictly sequential within the flow: at
//! most one candidate holds an offer at a time, and the bounded reply wait is
//! the only suspension point. The wait races three triggers (reply, deadline,
//! cancellation) with `tokio::select!`; first to fire wins, the losers are
//! no-ops.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{Instrument, debug, info, warn};

use crate::domain::{
    AssignmentId, AssignmentOutcome, AssignmentRequest, AssignmentState, CandidateRecord, Category,
    ContactId, DocketError, Offer, OfferResolution, ReplyToken,
};
use crate::ports::{AvailabilityLedger, Clock, NotificationChannel};
use crate::router::{OfferSubscription, SessionRouter};

/// Fixed reply window: a candidate has this long to answer an offer.
pub const DEFAULT_REPLY_WINDOW: Duration = Duration::from_secs(600);

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub reply_window: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reply_window: DEFAULT_REPLY_WINDOW,
        }
    }
}

/// Notification texts. Centralized so tests and transports share the exact
/// strings.
pub mod messages {
    use crate::domain::Category;

    pub const NO_CANDIDATE_AVAILABLE: &str = "no candidate currently available";
    pub const CANDIDATE_ACCEPTED: &str = "a candidate accepted";
    pub const OFFER_CONFIRMED: &str = "confirmed";
    pub const OFFER_DECLINED_ACK: &str = "understood, passed to next";
    pub const OFFER_EXPIRED: &str = "window expired, offer declined";
    pub const REQUEST_CANCELLED: &str = "the request was cancelled";
    pub const INVALID_CATEGORY: &str = "invalid category, choose a listed option";

    pub fn searching(category: Category) -> String {
        format!("category '{category}' noted, searching for an available candidate")
    }

    pub fn offer_prompt(name: &str, category: Category) -> String {
        format!(
            "{name}, you are offered the appointment for a hearing of category \
             '{category}'. Reply 'sim' to accept or 'não' to decline."
        )
    }
}

/// Handle to one running assignment flow.
#[derive(Debug)]
pub struct AssignmentHandle {
    id: AssignmentId,
    state: watch::Receiver<AssignmentState>,
    cancel: watch::Sender<bool>,
    join: JoinHandle<AssignmentOutcome>,
}

impl AssignmentHandle {
    pub fn id(&self) -> AssignmentId {
        self.id
    }

    /// Last published state of the flow.
    pub fn state(&self) -> AssignmentState {
        *self.state.borrow()
    }

    /// Requester-initiated cancellation. Cooperative: takes effect at the
    /// flow's next suspension point. An offer already sent cannot be
    /// recalled, but the candidate is told the request was cancelled and any
    /// later reply routes as unmatched.
    pub fn cancel(&self) {
        let _ = self.cancel.send(true);
    }

    /// Wait for the flow to finish.
    pub async fn outcome(self) -> AssignmentOutcome {
        self.join.await.unwrap_or(AssignmentOutcome::Cancelled)
    }
}

/// The assignment engine: wires the ledger, the notification channel, and
/// the session router into the sequential-offer protocol.
pub struct AssignmentEngine {
    ledger: Arc<dyn AvailabilityLedger>,
    channel: Arc<dyn NotificationChannel>,
    router: Arc<SessionRouter>,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
}

/// How one bounded wait ended.
enum WaitVerdict {
    Reply(ReplyToken),
    Expired,
    Cancelled,
}

impl AssignmentEngine {
    pub fn new(
        ledger: Arc<dyn AvailabilityLedger>,
        channel: Arc<dyn NotificationChannel>,
        router: Arc<SessionRouter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::with_config(ledger, channel, router, clock, EngineConfig::default())
    }

    pub fn with_config(
        ledger: Arc<dyn AvailabilityLedger>,
        channel: Arc<dyn NotificationChannel>,
        router: Arc<SessionRouter>,
        clock: Arc<dyn Clock>,
        config: EngineConfig,
    ) -> Self {
        Self {
            ledger,
            channel,
            router,
            clock,
            config,
        }
    }

    /// Validate the category, fetch the partition snapshot, and spawn the
    /// drive loop.
    ///
    /// Fails fast with `InvalidCategory` on an unknown label and with
    /// `LedgerUnavailable` when the partition cannot be fetched; both are
    /// also reported to the requester.
    pub async fn begin(
        self: &Arc<Self>,
        category_label: &str,
        requester: ContactId,
    ) -> Result<AssignmentHandle, DocketError> {
        let Some(category) = Category::parse_label(category_label) else {
            self.notify(&requester, messages::INVALID_CATEGORY).await;
            return Err(DocketError::InvalidCategory(category_label.to_string()));
        };

        let request = AssignmentRequest::new(category, requester.clone());
        let span = tracing::info_span!("assignment", id = %request.id, %category);
        let (state_tx, state_rx) = watch::channel(AssignmentState::SelectingCategory);
        let _ = state_tx.send(AssignmentState::AwaitingCandidateList);

        let snapshot = match self.ledger.fetch_partition(category).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                let err = DocketError::LedgerUnavailable {
                    partition: category.partition_name().to_string(),
                    cause: e.to_string(),
                };
                self.notify(&requester, &err.to_string()).await;
                let _ = state_tx.send(AssignmentState::Cancelled);
                return Err(err);
            }
        };

        self.notify(&requester, &messages::searching(category)).await;

        let (cancel_tx, cancel_rx) = watch::channel(false);
        let id = request.id;
        let engine = Arc::clone(self);
        let join = tokio::spawn(
            async move { engine.drive(request, snapshot, state_tx, cancel_rx).await }
                .instrument(span),
        );

        Ok(AssignmentHandle {
            id,
            state: state_rx,
            cancel: cancel_tx,
            join,
        })
    }

    /// Iterate the fetched snapshot in stored order and run one offer at a
    /// time until a terminal state. Never re-fetches, never re-ranks;
    /// `last_assigned` is not a selection criterion.
    async fn drive(
        &self,
        request: AssignmentRequest,
        snapshot: Vec<CandidateRecord>,
        state_tx: watch::Sender<AssignmentState>,
        mut cancel_rx: watch::Receiver<bool>,
    ) -> AssignmentOutcome {
        let category = request.category;

        for (row_index, record) in snapshot.iter().enumerate() {
            if *cancel_rx.borrow() {
                let _ = state_tx.send(AssignmentState::Cancelled);
                info!(row_index, "cancelled before next offer");
                return AssignmentOutcome::Cancelled;
            }

            if !record.is_free() {
                debug!(row_index, candidate = %record.identity, "skipping busy candidate");
                continue;
            }

            let Some(mut sub) = self.router.subscribe(record.identity.clone(), request.id) else {
                info!(
                    row_index,
                    candidate = %record.identity,
                    "candidate already holds an outstanding offer, skipping"
                );
                continue;
            };

            let _ = state_tx.send(AssignmentState::OfferingToCandidate);
            let offer = Offer::new(
                record.identity.clone(),
                row_index,
                request.requester.clone(),
                category,
                Instant::now() + self.config.reply_window,
            );

            let prompt = messages::offer_prompt(&record.name, category);
            if let Err(e) = self.channel.send(&offer.candidate, &prompt).await {
                let err = DocketError::DeliveryFailed {
                    recipient: offer.candidate.to_string(),
                    cause: e.to_string(),
                };
                warn!(offer = %offer.id, error = %err, "offer delivery failed, aborting");
                self.notify(&request.requester, &err.to_string()).await;
                let _ = state_tx.send(AssignmentState::Cancelled);
                return AssignmentOutcome::Cancelled;
            }

            let _ = state_tx.send(AssignmentState::AwaitingReply);
            info!(offer = %offer.id, candidate = %offer.candidate, row_index, "offer sent");

            match Self::wait_for_reply(&offer, &mut sub, &mut cancel_rx).await {
                WaitVerdict::Cancelled => {
                    // The sent offer cannot be recalled; tell the candidate
                    // instead of leaving them dangling.
                    self.notify(&offer.candidate, messages::REQUEST_CANCELLED).await;
                    drop(sub);
                    info!(offer = %offer.id, "cancelled while awaiting reply");
                    let _ = state_tx.send(AssignmentState::Cancelled);
                    return AssignmentOutcome::Cancelled;
                }
                WaitVerdict::Reply(ReplyToken::Accept) => {
                    match self.ledger.claim(category, row_index, self.clock.today()).await {
                        Ok(true) => {
                            drop(sub);
                            info!(
                                offer = %offer.id,
                                candidate = %offer.candidate,
                                resolution = ?OfferResolution::Accepted,
                                "offer accepted"
                            );
                            self.notify(&request.requester, messages::CANDIDATE_ACCEPTED).await;
                            self.notify(&offer.candidate, messages::OFFER_CONFIRMED).await;
                            let _ = state_tx.send(AssignmentState::Assigned);
                            return AssignmentOutcome::Assigned {
                                candidate: offer.candidate,
                            };
                        }
                        Ok(false) => {
                            // Row flipped Busy underneath us; the accept
                            // loses and the flow moves on.
                            drop(sub);
                            info!(
                                offer = %offer.id,
                                candidate = %offer.candidate,
                                resolution = ?OfferResolution::Lost,
                                "claim lost to a concurrent writer"
                            );
                            continue;
                        }
                        Err(e) => {
                            return self
                                .ledger_failure(&request, &state_tx, e.to_string())
                                .await;
                        }
                    }
                }
                WaitVerdict::Reply(ReplyToken::Decline) => {
                    if let Err(e) = self.ledger.release(category, row_index).await {
                        return self.ledger_failure(&request, &state_tx, e.to_string()).await;
                    }
                    self.notify(&offer.candidate, messages::OFFER_DECLINED_ACK).await;
                    drop(sub);
                    info!(
                        offer = %offer.id,
                        candidate = %offer.candidate,
                        resolution = ?OfferResolution::Declined,
                        "offer declined, escalating"
                    );
                }
                WaitVerdict::Expired => {
                    self.notify(&offer.candidate, messages::OFFER_EXPIRED).await;
                    if let Err(e) = self.ledger.release(category, row_index).await {
                        return self.ledger_failure(&request, &state_tx, e.to_string()).await;
                    }
                    drop(sub);
                    info!(
                        offer = %offer.id,
                        candidate = %offer.candidate,
                        resolution = ?OfferResolution::TimedOut,
                        "reply window expired, escalating"
                    );
                }
            }
        }

        info!("candidate list exhausted");
        self.notify(&request.requester, messages::NO_CANDIDATE_AVAILABLE).await;
        let _ = state_tx.send(AssignmentState::Exhausted);
        AssignmentOutcome::Exhausted
    }

    /// Bounded wait for one offer: cancellation beats a pending reply, a
    /// reply beats the deadline. Unrecognized text is ignored and the wait
    /// continues until the deadline.
    async fn wait_for_reply(
        offer: &Offer,
        sub: &mut OfferSubscription,
        cancel_rx: &mut watch::Receiver<bool>,
    ) -> WaitVerdict {
        let sleep = tokio::time::sleep_until(offer.deadline);
        tokio::pin!(sleep);
        let mut cancel_open = true;

        loop {
            tokio::select! {
                biased;
                res = cancel_rx.changed(), if cancel_open => match res {
                    Ok(()) if *cancel_rx.borrow() => return WaitVerdict::Cancelled,
                    Ok(()) => {}
                    // Handle dropped without cancelling: the flow runs to
                    // its own terminal state.
                    Err(_) => cancel_open = false,
                },
                text = sub.recv() => {
                    if let Some(text) = text {
                        match ReplyToken::parse(&text) {
                            Some(token) => return WaitVerdict::Reply(token),
                            None => {
                                debug!(offer = %offer.id, "unrecognized reply ignored");
                            }
                        }
                    }
                }
                _ = &mut sleep => return WaitVerdict::Expired,
            }
        }
    }

    async fn ledger_failure(
        &self,
        request: &AssignmentRequest,
        state_tx: &watch::Sender<AssignmentState>,
        cause: String,
    ) -> AssignmentOutcome {
        let err = DocketError::LedgerUnavailable {
            partition: request.category.partition_name().to_string(),
            cause,
        };
        warn!(error = %err, "ledger update failed, aborting");
        self.notify(&request.requester, &err.to_string()).await;
        let _ = state_tx.send(AssignmentState::Cancelled);
        AssignmentOutcome::Cancelled
    }

    /// Best-effort notification. Offer prompts are fail-fast; everything
    /// else (acks, terminal notices) must not take the flow down with the
    /// transport.
    async fn notify(&self, to: &ContactId, text: &str) {
        if let Err(e) = self.channel.send(to, text).await {
            warn!(recipient = %to, error = %e, "notification dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Availability;
    use crate::impls::{InMemoryChannel, InMemorySheetLedger};
    use crate::ports::FixedClock;
    use crate::router::Routed;
    use chrono::NaiveDate;

    const TODAY: &str = "2026-08-29";

    struct Harness {
        engine: Arc<AssignmentEngine>,
        ledger: Arc<InMemorySheetLedger>,
        channel: Arc<InMemoryChannel>,
        router: Arc<SessionRouter>,
    }

    fn harness() -> Harness {
        let ledger = Arc::new(InMemorySheetLedger::new());
        let channel = Arc::new(InMemoryChannel::new());
        let router = Arc::new(SessionRouter::new());
        let clock = Arc::new(FixedClock(today()));
        let ledger_port: Arc<dyn AvailabilityLedger> = ledger.clone();
        let channel_port: Arc<dyn NotificationChannel> = channel.clone();
        let engine = Arc::new(AssignmentEngine::new(
            ledger_port,
            channel_port,
            Arc::clone(&router),
            clock,
        ));
        Harness {
            engine,
            ledger,
            channel,
            router,
        }
    }

    fn today() -> NaiveDate {
        TODAY.parse().unwrap()
    }

    fn requester() -> ContactId {
        ContactId::new("requester-1")
    }

    fn contact(s: &str) -> ContactId {
        ContactId::new(s)
    }

    fn rec(name: &str, id: &str, availability: Availability) -> CandidateRecord {
        CandidateRecord {
            identity: ContactId::new(id),
            name: name.to_string(),
            availability,
            last_assigned: None,
        }
    }

    /// Let spawned flows run up to their next suspension point.
    async fn settle() {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    #[tokio::test]
    async fn unknown_label_is_rejected_and_requester_reprompted() {
        let h = harness();
        let err = h.engine.begin("trabalhista", requester()).await.unwrap_err();

        assert!(matches!(err, DocketError::InvalidCategory(label) if label == "trabalhista"));
        assert_eq!(
            h.channel.sent_to(&requester()),
            [messages::INVALID_CATEGORY.to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn every_listed_label_begins_a_task_case_insensitively() {
        for label in ["cível", "CRIMINAL", "Tribunal do Júri"] {
            let h = harness();
            for cat in Category::ALL {
                h.ledger.seed_partition(cat, &[]);
            }
            let handle = h.engine.begin(label, requester()).await.unwrap();
            assert_eq!(handle.outcome().await, AssignmentOutcome::Exhausted);
        }
    }

    #[tokio::test]
    async fn missing_partition_cancels_with_the_cause() {
        let h = harness();
        let err = h.engine.begin("Criminal", requester()).await.unwrap_err();

        assert!(matches!(err, DocketError::LedgerUnavailable { .. }));
        let sent = h.channel.sent_to(&requester());
        assert_eq!(sent.len(), 1);
        assert!(sent[0].starts_with("error accessing partition 'Criminal':"));
    }

    #[tokio::test(start_paused = true)]
    async fn busy_candidates_are_skipped_in_stored_order() {
        let h = harness();
        h.ledger.seed_partition(
            Category::Civel,
            &[
                rec("Ana", "adv-a", Availability::Busy),
                rec("Bruno", "adv-b", Availability::Free),
                rec("Carla", "adv-c", Availability::Free),
            ],
        );

        let handle = h.engine.begin("Cível", requester()).await.unwrap();
        settle().await;

        // first offer goes to Bruno, never to the busy Ana and not yet to Carla
        assert!(h.channel.sent_to(&contact("adv-a")).is_empty());
        assert!(h.channel.sent_to(&contact("adv-c")).is_empty());
        let to_bruno = h.channel.sent_to(&contact("adv-b"));
        assert_eq!(to_bruno.len(), 1);
        assert!(to_bruno[0].contains("Bruno"));
        assert!(to_bruno[0].contains("Cível"));

        assert_eq!(h.router.route(&contact("adv-b"), "sim"), Routed::Delivered);
        assert_eq!(
            handle.outcome().await,
            AssignmentOutcome::Assigned {
                candidate: contact("adv-b")
            }
        );
        assert!(h.channel.sent_to(&contact("adv-c")).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn accept_claims_the_row_and_stamps_the_date() {
        let h = harness();
        h.ledger
            .seed_partition(Category::Juri, &[rec("Ana", "adv-a", Availability::Free)]);

        let handle = h.engine.begin("Tribunal do Júri", requester()).await.unwrap();
        settle().await;
        assert_eq!(handle.state(), AssignmentState::AwaitingReply);

        h.router.route(&contact("adv-a"), "sim");
        assert_eq!(
            handle.outcome().await,
            AssignmentOutcome::Assigned {
                candidate: contact("adv-a")
            }
        );

        // physical row 2, per the header offset convention
        assert_eq!(h.ledger.cell(Category::Juri, 2, 5).as_deref(), Some("Ocupado"));
        assert_eq!(h.ledger.cell(Category::Juri, 2, 4).as_deref(), Some(TODAY));

        let records = h.ledger.fetch_partition(Category::Juri).await.unwrap();
        assert_eq!(records[0].availability, Availability::Busy);
        assert_eq!(records[0].last_assigned, Some(today()));

        assert!(
            h.channel
                .sent_to(&requester())
                .contains(&messages::CANDIDATE_ACCEPTED.to_string())
        );
        assert_eq!(
            h.channel.sent_to(&contact("adv-a")).last().map(String::as_str),
            Some(messages::OFFER_CONFIRMED)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn decline_releases_the_row_and_exhausts_a_single_candidate_list() {
        let h = harness();
        h.ledger
            .seed_partition(Category::Civel, &[rec("Ana", "adv-a", Availability::Free)]);

        let handle = h.engine.begin("Cível", requester()).await.unwrap();
        settle().await;

        h.router.route(&contact("adv-a"), "não");
        assert_eq!(handle.outcome().await, AssignmentOutcome::Exhausted);

        assert_eq!(h.ledger.cell(Category::Civel, 2, 5).as_deref(), Some("Livre"));
        assert_eq!(
            h.channel.sent_to(&contact("adv-a")).last().map(String::as_str),
            Some(messages::OFFER_DECLINED_ACK)
        );
        assert_eq!(
            h.channel.sent_to(&requester()).last().map(String::as_str),
            Some(messages::NO_CANDIDATE_AVAILABLE)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn decline_escalates_to_the_next_free_candidate() {
        let h = harness();
        h.ledger.seed_partition(
            Category::Criminal,
            &[
                rec("Ana", "adv-a", Availability::Free),
                rec("Bruno", "adv-b", Availability::Free),
            ],
        );

        let handle = h.engine.begin("Criminal", requester()).await.unwrap();
        settle().await;

        h.router.route(&contact("adv-a"), "não");
        settle().await;
        assert_eq!(h.channel.sent_to(&contact("adv-b")).len(), 1);

        h.router.route(&contact("adv-b"), "sim");
        assert_eq!(
            handle.outcome().await,
            AssignmentOutcome::Assigned {
                candidate: contact("adv-b")
            }
        );

        // Ana back to Free, Bruno claimed
        assert_eq!(h.ledger.cell(Category::Criminal, 2, 5).as_deref(), Some("Livre"));
        assert_eq!(h.ledger.cell(Category::Criminal, 3, 5).as_deref(), Some("Ocupado"));
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_notifies_the_candidate_and_resets_the_row() {
        let h = harness();
        h.ledger
            .seed_partition(Category::Civel, &[rec("Ana", "adv-a", Availability::Free)]);

        let handle = h.engine.begin("Cível", requester()).await.unwrap();
        // no reply: the paused clock jumps straight to the 600 s deadline
        assert_eq!(handle.outcome().await, AssignmentOutcome::Exhausted);

        assert!(
            h.channel
                .sent_to(&contact("adv-a"))
                .contains(&messages::OFFER_EXPIRED.to_string())
        );
        assert_eq!(h.ledger.cell(Category::Civel, 2, 5).as_deref(), Some("Livre"));
    }

    #[tokio::test(start_paused = true)]
    async fn unrecognized_text_keeps_the_wait_alive() {
        let h = harness();
        h.ledger
            .seed_partition(Category::Civel, &[rec("Ana", "adv-a", Availability::Free)]);

        let handle = h.engine.begin("Cível", requester()).await.unwrap();
        settle().await;

        assert_eq!(h.router.route(&contact("adv-a"), "talvez"), Routed::Delivered);
        settle().await;
        assert_eq!(handle.state(), AssignmentState::AwaitingReply);

        h.router.route(&contact("adv-a"), "sim");
        assert_eq!(
            handle.outcome().await,
            AssignmentOutcome::Assigned {
                candidate: contact("adv-a")
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn reply_from_a_stranger_is_unmatched_and_changes_nothing() {
        let h = harness();
        h.ledger
            .seed_partition(Category::Civel, &[rec("Ana", "adv-a", Availability::Free)]);

        let handle = h.engine.begin("Cível", requester()).await.unwrap();
        settle().await;

        assert_eq!(h.router.route(&contact("stranger"), "sim"), Routed::Unmatched);
        settle().await;
        assert_eq!(handle.state(), AssignmentState::AwaitingReply);
        assert!(h.channel.sent_to(&contact("stranger")).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn late_reply_after_timeout_is_discarded() {
        let h = harness();
        h.ledger
            .seed_partition(Category::Civel, &[rec("Ana", "adv-a", Availability::Free)]);

        let handle = h.engine.begin("Cível", requester()).await.unwrap();
        assert_eq!(handle.outcome().await, AssignmentOutcome::Exhausted);

        assert_eq!(h.router.route(&contact("adv-a"), "sim"), Routed::Unmatched);
        assert_eq!(h.ledger.cell(Category::Civel, 2, 5).as_deref(), Some("Livre"));
    }

    #[tokio::test(start_paused = true)]
    async fn offer_delivery_failure_aborts_and_informs_the_requester() {
        let h = harness();
        h.ledger
            .seed_partition(Category::Civel, &[rec("Ana", "adv-a", Availability::Free)]);
        h.channel.fail_sends_to(contact("adv-a"));

        let handle = h.engine.begin("Cível", requester()).await.unwrap();
        assert_eq!(handle.outcome().await, AssignmentOutcome::Cancelled);

        let sent = h.channel.sent_to(&requester());
        assert!(
            sent.iter()
                .any(|m| m.starts_with("could not deliver notification to 'adv-a'")),
            "requester not informed: {sent:?}"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_mid_wait_notifies_the_offered_candidate() {
        let h = harness();
        h.ledger
            .seed_partition(Category::Civel, &[rec("Ana", "adv-a", Availability::Free)]);

        let handle = h.engine.begin("Cível", requester()).await.unwrap();
        settle().await;
        assert_eq!(handle.state(), AssignmentState::AwaitingReply);

        handle.cancel();
        assert_eq!(handle.outcome().await, AssignmentOutcome::Cancelled);

        assert!(
            h.channel
                .sent_to(&contact("adv-a"))
                .contains(&messages::REQUEST_CANCELLED.to_string())
        );
        // the abandoned candidate's reply is dropped
        assert_eq!(h.router.route(&contact("adv-a"), "sim"), Routed::Unmatched);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_flows_never_double_offer_one_candidate() {
        let h = harness();
        h.ledger
            .seed_partition(Category::Civel, &[rec("Ana", "adv-a", Availability::Free)]);

        let first = h.engine.begin("Cível", requester()).await.unwrap();
        settle().await;

        // Ana already holds an offer from the first flow; the second flow
        // skips her and exhausts.
        let second = h.engine.begin("Cível", contact("requester-2")).await.unwrap();
        assert_eq!(second.outcome().await, AssignmentOutcome::Exhausted);
        assert_eq!(h.channel.sent_to(&contact("adv-a")).len(), 1);

        h.router.route(&contact("adv-a"), "sim");
        assert_eq!(
            first.outcome().await,
            AssignmentOutcome::Assigned {
                candidate: contact("adv-a")
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn lost_claim_advances_to_the_next_candidate() {
        let h = harness();
        h.ledger.seed_partition(
            Category::Civel,
            &[
                rec("Ana", "adv-a", Availability::Free),
                rec("Bruno", "adv-b", Availability::Free),
            ],
        );

        let handle = h.engine.begin("Cível", requester()).await.unwrap();
        settle().await;

        // a concurrent writer grabs Ana's row between offer and accept
        assert!(h.ledger.claim(Category::Civel, 0, today()).await.unwrap());

        h.router.route(&contact("adv-a"), "sim");
        settle().await;
        // the flow moved on to Bruno without touching Ana's row
        assert_eq!(h.ledger.cell(Category::Civel, 2, 5).as_deref(), Some("Ocupado"));
        assert_eq!(h.channel.sent_to(&contact("adv-b")).len(), 1);

        h.router.route(&contact("adv-b"), "sim");
        assert_eq!(
            handle.outcome().await,
            AssignmentOutcome::Assigned {
                candidate: contact("adv-b")
            }
        );
    }
}
