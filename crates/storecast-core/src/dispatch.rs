//! Per-message dispatcher.
//!
//! The dispatcher drives one inbound message through the pipeline:
//!
//! ```text
//! rate limit -> command? -> extract ids -> ack -> resolve each store -> reply
//!     |             |             |
//!   "wait"     static text   "invalid input"
//! ```
//!
//! Its only mutable state is the rate limiter's per-chat map, so one
//! instance can serve any number of concurrent call paths.

use std::time::Instant;

use futures_util::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use storecast_types::chat::{ChatId, InboundMessage};
use storecast_types::config::StorecastConfig;
use storecast_types::outcome::{PredictOutcome, ResolveResult, StoreOutcome, StoreReport};
use storecast_types::store::StoreId;

use crate::aggregate::{summarize, wants_summary};
use crate::dataset::DatasetSource;
use crate::forecast::{ForecastService, PredictionClient, total_prediction};
use crate::input::{Command, extract_store_ids};
use crate::rate_limit::RateLimiter;
use crate::reply::Replies;
use crate::resolver::StoreResolver;
use crate::transport::OutboundTransport;

/// Default bound on forecast calls in flight for one message.
const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// How a message was handled.
#[derive(Debug, Clone, PartialEq)]
pub enum Disposition {
    /// Denied by the cooldown gate; the chat got a "please wait" notice.
    RateLimited,
    /// A static command reply was sent.
    Command(Command),
    /// No store ids could be parsed.
    InvalidInput,
    /// Stores were resolved; one report per store in extraction order.
    Answered(Vec<StoreReport>),
}

/// Orchestrates rate limiting, parsing, resolution, and aggregation.
///
/// Generic over the dataset, forecast service, and transport so the core
/// never depends on concrete infrastructure.
pub struct Dispatcher<D, F, T> {
    limiter: RateLimiter,
    resolver: StoreResolver<D>,
    predictor: PredictionClient<F>,
    transport: T,
    replies: Replies,
    max_concurrency: usize,
}

impl<D, F, T> Dispatcher<D, F, T>
where
    D: DatasetSource,
    F: ForecastService,
    T: OutboundTransport,
{
    pub fn new(
        limiter: RateLimiter,
        resolver: StoreResolver<D>,
        predictor: PredictionClient<F>,
        transport: T,
        replies: Replies,
    ) -> Self {
        Self {
            limiter,
            resolver,
            predictor,
            transport,
            replies,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }

    /// Cap the forecast calls one message may have in flight. Zero is
    /// treated as one.
    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = limit.max(1);
        self
    }

    /// Wire a dispatcher from configuration.
    pub fn from_config(dataset: D, forecast: F, transport: T, config: &StorecastConfig) -> Self {
        Self::new(
            RateLimiter::new(config.bot.cooldown()),
            StoreResolver::new(dataset),
            PredictionClient::new(forecast, config.forecast.timeout()),
            transport,
            Replies::from_settings(&config.bot),
        )
        .with_max_concurrency(config.forecast.max_concurrency)
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn resolver(&self) -> &StoreResolver<D> {
        &self.resolver
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn replies(&self) -> &Replies {
        &self.replies
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Handle one inbound message now.
    pub async fn dispatch(&self, message: &InboundMessage) -> Disposition {
        self.dispatch_at(message, Instant::now()).await
    }

    /// Handle one inbound message as if it arrived at `now`.
    #[tracing::instrument(
        name = "dispatch",
        skip(self, message, now),
        fields(chat_id = %message.chat_id())
    )]
    pub async fn dispatch_at(&self, message: &InboundMessage, now: Instant) -> Disposition {
        let chat_id = message.chat_id();

        if !self.limiter.allow(chat_id, now) {
            debug!("request denied by cooldown");
            self.deliver(chat_id, &self.replies.wait()).await;
            return Disposition::RateLimited;
        }

        let text = message.trimmed_text();

        if let Some(command) = Command::parse(text) {
            let reply = match command {
                Command::Start => self.replies.start(),
                Command::Help => self.replies.help(),
            };
            self.deliver(chat_id, &reply).await;
            return Disposition::Command(command);
        }

        let stores = extract_store_ids(text);
        if stores.is_empty() {
            debug!("no store ids in message");
            self.deliver(chat_id, &self.replies.invalid_input()).await;
            return Disposition::InvalidInput;
        }

        self.deliver(chat_id, &self.replies.processing()).await;

        let reports = self.resolve_all(&stores).await;
        self.deliver(chat_id, &self.compose(&reports)).await;

        info!(
            stores = reports.len(),
            predicted = reports.iter().filter(|r| r.outcome.total().is_some()).count(),
            "request answered"
        );
        Disposition::Answered(reports)
    }

    /// Resolve stores with at most `max_concurrency` in flight. Output order
    /// matches input order.
    pub async fn resolve_all(&self, stores: &[StoreId]) -> Vec<StoreReport> {
        stream::iter(stores.iter().copied())
            .map(|store| async move {
                StoreReport {
                    store,
                    outcome: self.resolve_store(store).await,
                }
            })
            .buffered(self.max_concurrency)
            .collect()
            .await
    }

    /// Dataset lookup, then (if ready) a forecast call. Never fails; every
    /// problem becomes an outcome.
    pub async fn resolve_store(&self, store: StoreId) -> StoreOutcome {
        let outcome = match self.resolver.resolve(store) {
            ResolveResult::NotFound => StoreOutcome::NotFound,
            ResolveResult::Closed => StoreOutcome::Closed,
            ResolveResult::Ready(payload) => match self.predictor.predict(store, &payload).await {
                PredictOutcome::ServiceDown => StoreOutcome::ServiceDown,
                PredictOutcome::Predicted(rows) => StoreOutcome::Predicted {
                    total: total_prediction(&rows),
                },
            },
        };
        debug!(store_id = %store, outcome = outcome.label(), "store resolved");
        outcome
    }

    /// Store lines, plus the summary when more than one store was asked for
    /// and at least one was predicted.
    pub fn compose(&self, reports: &[StoreReport]) -> String {
        let mut lines: Vec<String> = reports
            .iter()
            .map(|report| self.replies.store_line(report))
            .collect();
        if wants_summary(reports) {
            lines.push(summarize(reports, &self.replies));
        }
        lines.join("\n")
    }

    async fn deliver(&self, chat_id: ChatId, text: &str) {
        if let Err(e) = self.transport.send(chat_id, text).await {
            warn!(
                chat_id = %chat_id,
                chars = text.chars().count(),
                error = %e,
                "failed to deliver reply"
            );
        }
    }
}

impl<D, F, T> std::fmt::Debug for Dispatcher<D, F, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("limiter", &self.limiter)
            .field("forecast_timeout", &self.predictor.timeout())
            .field("max_concurrency", &self.max_concurrency)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::dataset::InMemoryDataset;
    use crate::dataset::fixtures::{day, store};
    use crate::forecast::mock::{MockForecast, Script};
    use crate::transport::mock::RecordingTransport;
    use storecast_types::error::ForecastError;
    use storecast_types::store::{ForecastPayload, PredictionRow};

    type TestDispatcher = Dispatcher<InMemoryDataset, MockForecast, RecordingTransport>;

    /// Stores 1, 2, 4, 5 are open; 3 is closed; 99 does not exist.
    fn dataset() -> InMemoryDataset {
        InMemoryDataset::new(
            vec![store(1), store(2), store(3), store(4), store(5)],
            vec![
                day(1, 1, "2015-09-17", Some(1.0)),
                day(2, 1, "2015-09-18", Some(1.0)),
                day(3, 2, "2015-09-17", Some(1.0)),
                day(4, 3, "2015-09-17", Some(0.0)),
                day(5, 4, "2015-09-17", Some(1.0)),
                day(6, 5, "2015-09-17", Some(1.0)),
            ],
        )
    }

    fn forecast() -> MockForecast {
        MockForecast::new()
            .with(1, Script::Rows(vec![100.0, 200.0]))
            .with(2, Script::Rows(vec![500.0]))
            .with(4, Script::Fail)
            .with(5, Script::Rows(vec![1234.5]))
    }

    fn dispatcher_with(transport: RecordingTransport) -> TestDispatcher {
        Dispatcher::from_config(dataset(), forecast(), transport, &StorecastConfig::default())
    }

    fn dispatcher() -> TestDispatcher {
        dispatcher_with(RecordingTransport::default())
    }

    fn msg(chat: i64, text: &str) -> InboundMessage {
        InboundMessage::text(ChatId(chat), text)
    }

    #[tokio::test]
    async fn test_start_and_help_commands() {
        let d = dispatcher();
        let now = Instant::now();

        assert_eq!(
            d.dispatch_at(&msg(1, " /START "), now).await,
            Disposition::Command(Command::Start)
        );
        assert_eq!(
            d.dispatch_at(&msg(2, "/help"), now).await,
            Disposition::Command(Command::Help)
        );

        let texts = d.transport().texts();
        assert_eq!(texts.len(), 2);
        assert!(texts[0].contains("Welcome"));
        assert!(texts[1].contains("Help"));
    }

    #[tokio::test]
    async fn test_second_message_within_cooldown_is_rate_limited() {
        let d = dispatcher();
        let t1 = Instant::now();

        d.dispatch_at(&msg(7, "/start"), t1).await;
        let second = d.dispatch_at(&msg(7, "1"), t1 + Duration::from_secs(1)).await;
        assert_eq!(second, Disposition::RateLimited);

        let texts = d.transport().texts();
        assert_eq!(texts.len(), 2);
        assert!(texts[1].contains("Please wait"));

        let third = d.dispatch_at(&msg(7, "/help"), t1 + Duration::from_secs(5)).await;
        assert_eq!(third, Disposition::Command(Command::Help));
    }

    #[tokio::test]
    async fn test_invalid_input() {
        let d = dispatcher();
        assert_eq!(d.dispatch(&msg(1, "hello there")).await, Disposition::InvalidInput);
        assert_eq!(d.transport().texts(), vec![d.replies().invalid_input()]);
    }

    #[tokio::test]
    async fn test_message_without_text_is_invalid_input() {
        let d = dispatcher();
        let message = InboundMessage {
            chat: storecast_types::chat::Chat { id: ChatId(3) },
            text: None,
        };
        assert_eq!(d.dispatch(&message).await, Disposition::InvalidInput);
    }

    #[tokio::test]
    async fn test_single_store_has_no_summary() {
        let d = dispatcher();
        let disposition = d.dispatch(&msg(1, "1")).await;

        assert_eq!(
            disposition,
            Disposition::Answered(vec![StoreReport {
                store: StoreId(1),
                outcome: StoreOutcome::Predicted { total: 300.0 },
            }])
        );

        let texts = d.transport().texts();
        assert_eq!(texts.len(), 2);
        assert_eq!(texts[0], d.replies().processing());
        assert_eq!(texts[1], "🏪 Store 1: 💰 <b>€ 300,00</b>");
    }

    #[tokio::test]
    async fn test_mixed_batch_keeps_order_and_isolates_failures() {
        let d = dispatcher();
        let disposition = d.dispatch(&msg(1, "2, 99, 3, 4, 1, 2")).await;

        let Disposition::Answered(reports) = disposition else {
            panic!("expected an answer");
        };
        let outcomes: Vec<(u32, &str)> = reports
            .iter()
            .map(|r| (r.store.0, r.outcome.label()))
            .collect();
        assert_eq!(
            outcomes,
            [
                (2, "predicted"),
                (99, "not_found"),
                (3, "closed"),
                (4, "service_down"),
                (1, "predicted"),
            ]
        );

        let reply = d.transport().texts().pop().unwrap();
        let lines: Vec<&str> = reply.lines().collect();
        assert_eq!(lines[0], "🏪 Store 2: 💰 <b>€ 500,00</b>");
        assert_eq!(lines[1], "🏪 Store 99: ❓ <b>not found</b>");
        assert_eq!(lines[2], "🏪 Store 3: 🚫 <b>closed</b>");
        assert_eq!(lines[3], "🏪 Store 4: ⚠️ <b>service unavailable</b>");
        assert_eq!(lines[4], "🏪 Store 1: 💰 <b>€ 300,00</b>");
        assert_eq!(lines[5], "");
        assert_eq!(lines[6], "");
        assert_eq!(lines[7], "<b>📊 Summary</b>");

        assert!(reply.contains("Valid predictions: <b>2</b>"));
        assert!(reply.contains("Closed stores: <b>1</b>"));
        assert!(reply.contains("Not found: <b>1</b>"));
        assert!(reply.contains("<b>Total expected:</b> € 800,00"));
        assert!(reply.contains("<b>Top store:</b> 2 (€ 500,00)"));
        assert!(reply.contains("<b>Second:</b> 1 (€ 300,00)"));
        assert!(reply.contains("<b>Difference:</b> € 200,00"));
    }

    #[tokio::test]
    async fn test_batch_without_predictions_has_no_summary() {
        let d = dispatcher();
        d.dispatch(&msg(1, "3,99")).await;
        let reply = d.transport().texts().pop().unwrap();
        assert_eq!(reply.lines().count(), 2);
        assert!(!reply.contains("Summary"));
    }

    #[tokio::test]
    async fn test_closed_and_unknown_stores_never_call_forecast() {
        let d = dispatcher();
        d.dispatch(&msg(1, "3,99,5")).await;
        let calls = d.predictor.service().calls.lock().unwrap().clone();
        assert_eq!(calls, vec![StoreId(5)]);
    }

    #[tokio::test]
    async fn test_delivery_failure_does_not_abort_dispatch() {
        let d = dispatcher_with(RecordingTransport::failing());
        let disposition = d.dispatch(&msg(1, "1,2")).await;
        assert!(matches!(disposition, Disposition::Answered(ref r) if r.len() == 2));
        assert_eq!(d.transport().texts().len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_chats_are_served_independently() {
        let d = Arc::new(dispatcher());
        let now = Instant::now();

        let handles: Vec<_> = (0..8)
            .map(|chat| {
                let d = Arc::clone(&d);
                tokio::spawn(async move { d.dispatch_at(&msg(chat, "5"), now).await })
            })
            .collect();

        for handle in handles {
            assert!(matches!(handle.await.unwrap(), Disposition::Answered(_)));
        }
        assert_eq!(d.limiter().tracked_chats(), 8);
    }

    /// Forecast service that tracks how many calls overlap.
    #[derive(Default)]
    struct GaugedForecast {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        calls: AtomicUsize,
    }

    impl ForecastService for GaugedForecast {
        async fn forecast(
            &self,
            payload: &ForecastPayload,
        ) -> Result<Vec<PredictionRow>, ForecastError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(vec![PredictionRow {
                prediction: f64::from(payload.rows()[0].store.0),
                store: None,
                date: None,
            }])
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_forecast_calls_in_flight_are_bounded() {
        let ids: Vec<u32> = (1..=150).collect();
        let dataset = InMemoryDataset::new(
            ids.iter().map(|&id| store(id)).collect(),
            ids.iter()
                .map(|&id| day(id, id, "2015-09-17", Some(1.0)))
                .collect(),
        );
        let mut config = StorecastConfig::default();
        config.forecast.max_concurrency = 3;
        let d = Dispatcher::from_config(
            dataset,
            GaugedForecast::default(),
            RecordingTransport::default(),
            &config,
        );
        assert_eq!(d.max_concurrency(), 3);

        let text = ids.iter().map(u32::to_string).collect::<Vec<_>>().join(",");
        let Disposition::Answered(reports) = d.dispatch(&msg(1, &text)).await else {
            panic!("expected an answer");
        };

        let service = d.predictor.service();
        assert_eq!(service.calls.load(Ordering::SeqCst), 150);
        assert_eq!(service.peak.load(Ordering::SeqCst), 3);

        let order: Vec<u32> = reports.iter().map(|r| r.store.0).collect();
        assert_eq!(order, ids);

        // One acknowledgment and one reply, however long the batch.
        let texts = d.transport().texts();
        assert_eq!(texts.len(), 2);
        assert!(texts[1].starts_with("🏪 Store 1: "));
        assert!(texts[1].contains("<b>Top store:</b> 150"));
    }

    #[test]
    fn test_zero_concurrency_is_clamped_to_one() {
        assert_eq!(dispatcher().with_max_concurrency(0).max_concurrency(), 1);
        assert_eq!(dispatcher().max_concurrency(), 4);
    }
}
