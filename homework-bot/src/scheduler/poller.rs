//! Homework status poller
//!
//! Fetches review statuses on a fixed period and reports changes to the chat.
//! Each cycle runs to completion before the next one starts:
//!
//! 1. Fetch with the current cursor, advancing it to `current_date`
//! 2. Validate the response and take the most recent record
//! 3. Format the record into a notification line
//! 4. Send it unless it equals the last delivered message
//!
//! Any failure in steps 1-3 is logged and reported to the chat once; identical
//! consecutive failures are not repeated. Nothing short of shutdown stops
//! the loop.

use std::time::Duration;

use homework_core::dto::response;
use homework_core::parse_status;
use tokio::time;
use tokio_util::sync::CancellationToken;
use homework_client::MAX_MESSAGE_CHARS;
use tracing::{debug, error, info, warn};

use crate::error::CycleError;
use crate::repository::{HomeworkRepository, Notifier};
use crate::scheduler::state::PollState;

/// Prefix of the message sent when a cycle fails
const FAILURE_PREFIX: &str = "Сбой в работе программы";

/// What a single cycle ended with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A new status message was delivered
    Notified,
    /// The status message equals the last delivered one
    Duplicate,
    /// The response listed no reviews
    NoNewStatus,
    /// A new status message could not be delivered; retried next cycle
    DeliveryFailed,
    /// Fetching, validating or formatting failed
    Failed {
        /// Whether a failure report reached the chat
        error_notified: bool,
    },
}

/// Poller that watches one submission and notifies on status changes
pub struct StatusPoller<H, N> {
    homeworks: H,
    notifier: N,
    retry_period: Duration,
    state: PollState,
}

impl<H: HomeworkRepository, N: Notifier> StatusPoller<H, N> {
    /// Creates a poller whose cursor starts at the current time
    pub fn new(homeworks: H, notifier: N, retry_period: Duration) -> Self {
        Self {
            homeworks,
            notifier,
            retry_period,
            state: PollState::starting_now(),
        }
    }

    /// Replaces the starting cursor
    pub fn with_cursor(mut self, cursor: i64) -> Self {
        self.state.cursor = cursor;
        self
    }

    pub fn state(&self) -> &PollState {
        &self.state
    }

    /// Starts the polling loop
    ///
    /// Runs until `shutdown` is cancelled. A cancellation interrupts an
    /// in-flight cycle or the pause between cycles.
    pub async fn run(&mut self, shutdown: CancellationToken) {
        info!(
            "Starting status poller (period: {:?}, from_date: {})",
            self.retry_period, self.state.cursor
        );

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                outcome = self.poll_once() => {
                    debug!(?outcome, "Poll cycle finished");
                }
            }

            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = time::sleep(self.retry_period) => {}
            }
        }

        info!("Status poller stopped");
    }

    /// Performs a single poll cycle without sleeping
    pub async fn poll_once(&mut self) -> CycleOutcome {
        debug!(from_date = self.state.cursor, "Polling homework statuses");

        match self.check_for_update().await {
            Ok(update) => {
                self.state.last_error.clear();
                match update {
                    Some(message) => self.deliver(message).await,
                    None => CycleOutcome::NoNewStatus,
                }
            }
            Err(e) => self.report_failure(e).await,
        }
    }

    /// Fetches, validates and formats; `None` means nothing new
    async fn check_for_update(&mut self) -> Result<Option<String>, CycleError> {
        let raw = self.homeworks.fetch_statuses(self.state.cursor).await?;

        if let Some(current_date) = response::current_date(&raw) {
            debug!(
                from = self.state.cursor,
                to = current_date,
                "Advancing poll cursor"
            );
            self.state.cursor = current_date;
        }

        let records = response::extract_records(&raw)?;
        let Some(latest) = records.first() else {
            debug!("No new review statuses");
            return Ok(None);
        };

        Ok(Some(parse_status(latest)?))
    }

    async fn deliver(&mut self, message: String) -> CycleOutcome {
        if message == self.state.last_message {
            info!("Status unchanged, notification suppressed: {}", message);
            return CycleOutcome::Duplicate;
        }

        match self.notifier.notify(&message).await {
            Ok(()) => {
                info!("Status notification sent: {}", message);
                self.state.last_message = message;
                CycleOutcome::Notified
            }
            Err(e) => {
                error!(error = %e, "Failed to send status notification: {}", message);
                CycleOutcome::DeliveryFailed
            }
        }
    }

    async fn report_failure(&mut self, e: CycleError) -> CycleOutcome {
        let stage = e.stage();
        if matches!(&e, CycleError::Fetch(fetch_err) if fetch_err.is_unauthorized()) {
            warn!("Homework API rejected the token, check PRACTICUM_TOKEN");
        }

        let cause = format!("{:#}", anyhow::Error::new(e));
        error!(stage, error = %cause, from_date = self.state.cursor, "Poll cycle failed");

        let report = failure_report(&cause);
        if report == self.state.last_error {
            debug!("Failure already reported, notification suppressed");
            return CycleOutcome::Failed {
                error_notified: false,
            };
        }

        match self.notifier.notify(&report).await {
            Ok(()) => {
                self.state.last_error = report;
                CycleOutcome::Failed {
                    error_notified: true,
                }
            }
            Err(notify_err) => {
                error!(error = %notify_err, "Failed to report cycle failure");
                CycleOutcome::Failed {
                    error_notified: false,
                }
            }
        }
    }
}

/// Chat text for a failed cycle, cut to fit in one message
fn failure_report(cause: &str) -> String {
    let mut report = format!("{}: {}", FAILURE_PREFIX, cause);
    if report.chars().count() > MAX_MESSAGE_CHARS {
        if let Some((cut, _)) = report.char_indices().nth(MAX_MESSAGE_CHARS - 1) {
            report.truncate(cut);
        }
        report.push('…');
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use homework_client::ClientError;
    use serde_json::{Value, json};
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    const APPROVED: &str = "Изменился статус проверки работы \"proj1\". Работа проверена: ревьюеру всё понравилось. Ура!";

    /// Replays queued responses in order
    #[derive(Clone, Default)]
    struct FakeHomeworks {
        responses: Arc<Mutex<VecDeque<Result<Value, ClientError>>>>,
        requested: Arc<Mutex<Vec<i64>>>,
    }

    impl FakeHomeworks {
        fn push(&self, response: Result<Value, ClientError>) {
            self.responses.lock().unwrap().push_back(response);
        }

        fn requested(&self) -> Vec<i64> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HomeworkRepository for FakeHomeworks {
        async fn fetch_statuses(&self, from_date: i64) -> Result<Value, ClientError> {
            self.requested.lock().unwrap().push(from_date);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("no fake response queued")
        }
    }

    #[derive(Clone, Default)]
    struct FakeNotifier {
        sent: Arc<Mutex<Vec<String>>>,
        fail: Arc<Mutex<bool>>,
        cancel_on_send: Option<CancellationToken>,
    }

    impl FakeNotifier {
        fn sent(&self) -> Vec<String> {
            self.sent.lock().unwrap().clone()
        }

        fn set_failing(&self, fail: bool) {
            *self.fail.lock().unwrap() = fail;
        }
    }

    #[async_trait]
    impl Notifier for FakeNotifier {
        async fn notify(&self, message: &str) -> Result<(), ClientError> {
            if let Some(token) = &self.cancel_on_send {
                token.cancel();
            }
            if *self.fail.lock().unwrap() {
                return Err(ClientError::DeliveryFailed("chat not found".to_string()));
            }
            self.sent.lock().unwrap().push(message.to_string());
            Ok(())
        }
    }

    fn approved() -> Value {
        json!({
            "homeworks": [{ "homework_name": "proj1", "status": "approved" }],
            "current_date": 1000
        })
    }

    fn poller(
        homeworks: &FakeHomeworks,
        notifier: &FakeNotifier,
    ) -> StatusPoller<FakeHomeworks, FakeNotifier> {
        StatusPoller::new(homeworks.clone(), notifier.clone(), Duration::from_secs(600))
            .with_cursor(500)
    }

    async fn unreachable() -> ClientError {
        let err = reqwest::get("not a url").await.unwrap_err();
        ClientError::EndpointUnreachable(err)
    }

    #[tokio::test]
    async fn test_status_change_is_notified_and_cursor_advances() {
        let homeworks = FakeHomeworks::default();
        let notifier = FakeNotifier::default();
        homeworks.push(Ok(approved()));

        let mut poller = poller(&homeworks, &notifier);
        assert_eq!(poller.poll_once().await, CycleOutcome::Notified);

        assert_eq!(notifier.sent(), vec![APPROVED.to_string()]);
        assert_eq!(homeworks.requested(), vec![500]);
        assert_eq!(poller.state().cursor, 1000);
        assert_eq!(poller.state().last_message, APPROVED);
    }

    #[tokio::test]
    async fn test_same_status_twice_notifies_once() {
        let homeworks = FakeHomeworks::default();
        let notifier = FakeNotifier::default();
        homeworks.push(Ok(approved()));
        homeworks.push(Ok(approved()));

        let mut poller = poller(&homeworks, &notifier);
        assert_eq!(poller.poll_once().await, CycleOutcome::Notified);
        assert_eq!(poller.poll_once().await, CycleOutcome::Duplicate);

        assert_eq!(notifier.sent().len(), 1);
        assert_eq!(homeworks.requested(), vec![500, 1000]);
    }

    #[tokio::test]
    async fn test_empty_list_sends_nothing() {
        let homeworks = FakeHomeworks::default();
        let notifier = FakeNotifier::default();
        homeworks.push(Ok(json!({ "homeworks": [], "current_date": 700 })));

        let mut poller = poller(&homeworks, &notifier);
        assert_eq!(poller.poll_once().await, CycleOutcome::NoNewStatus);

        assert!(notifier.sent().is_empty());
        assert_eq!(poller.state().cursor, 700);
    }

    #[tokio::test]
    async fn test_cursor_kept_without_current_date() {
        let homeworks = FakeHomeworks::default();
        let notifier = FakeNotifier::default();
        homeworks.push(Ok(json!({ "homeworks": [] })));

        let mut poller = poller(&homeworks, &notifier);
        poller.poll_once().await;

        assert_eq!(poller.state().cursor, 500);
    }

    #[tokio::test]
    async fn test_only_most_recent_record_is_used() {
        let homeworks = FakeHomeworks::default();
        let notifier = FakeNotifier::default();
        homeworks.push(Ok(json!({
            "homeworks": [
                { "homework_name": "proj2", "status": "reviewing" },
                { "homework_name": "proj1", "status": "approved" }
            ]
        })));

        let mut poller = poller(&homeworks, &notifier);
        poller.poll_once().await;

        assert_eq!(
            notifier.sent(),
            vec!["Изменился статус проверки работы \"proj2\". Работа взята на проверку ревьюером.".to_string()]
        );
    }

    #[tokio::test]
    async fn test_missing_homeworks_is_reported_as_failure() {
        let homeworks = FakeHomeworks::default();
        let notifier = FakeNotifier::default();
        homeworks.push(Ok(json!({ "current_date": 1000 })));

        let mut poller = poller(&homeworks, &notifier);
        assert_eq!(
            poller.poll_once().await,
            CycleOutcome::Failed {
                error_notified: true
            }
        );

        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].starts_with("Сбой в работе программы: "));
        assert!(sent[0].contains("homeworks"));
    }

    #[tokio::test]
    async fn test_unknown_status_is_reported_not_defaulted() {
        let homeworks = FakeHomeworks::default();
        let notifier = FakeNotifier::default();
        homeworks.push(Ok(json!({
            "homeworks": [{ "homework_name": "proj1", "status": "" }]
        })));

        let mut poller = poller(&homeworks, &notifier);
        assert!(matches!(
            poller.poll_once().await,
            CycleOutcome::Failed { .. }
        ));
        assert!(poller.state().last_message.is_empty());
        assert!(notifier.sent()[0].contains("unknown review status"));
    }

    #[tokio::test]
    async fn test_repeated_unreachable_endpoint_reported_once() {
        let homeworks = FakeHomeworks::default();
        let notifier = FakeNotifier::default();
        homeworks.push(Err(unreachable().await));
        homeworks.push(Err(unreachable().await));

        let mut poller = poller(&homeworks, &notifier);
        assert_eq!(
            poller.poll_once().await,
            CycleOutcome::Failed {
                error_notified: true
            }
        );
        assert_eq!(
            poller.poll_once().await,
            CycleOutcome::Failed {
                error_notified: false
            }
        );

        assert_eq!(notifier.sent().len(), 1);
        assert_eq!(homeworks.requested(), vec![500, 500]);
    }

    #[tokio::test]
    async fn test_failure_report_includes_underlying_cause() {
        let homeworks = FakeHomeworks::default();
        let notifier = FakeNotifier::default();
        homeworks.push(Err(unreachable().await));

        let mut poller = poller(&homeworks, &notifier);
        poller.poll_once().await;

        let sent = notifier.sent();
        assert!(sent[0].starts_with("Сбой в работе программы: homework endpoint unreachable: "));
        assert!(sent[0].contains("relative URL without a base"));
    }

    #[tokio::test]
    async fn test_long_failure_report_fits_one_message() {
        let homeworks = FakeHomeworks::default();
        let notifier = FakeNotifier::default();
        homeworks.push(Err(ClientError::UnexpectedStatus {
            status: 502,
            message: "<html>".repeat(1000),
        }));

        let mut poller = poller(&homeworks, &notifier);
        assert_eq!(
            poller.poll_once().await,
            CycleOutcome::Failed {
                error_notified: true
            }
        );

        let sent = notifier.sent();
        assert_eq!(sent[0].chars().count(), MAX_MESSAGE_CHARS);
        assert!(sent[0].ends_with('…'));
        assert_eq!(poller.state().last_error, sent[0]);
    }

    #[test]
    fn test_short_failure_report_is_untouched() {
        assert_eq!(failure_report("boom"), "Сбой в работе программы: boom");

        let prefix_len = "Сбой в работе программы: ".chars().count();
        let exact = failure_report(&"x".repeat(MAX_MESSAGE_CHARS - prefix_len));
        assert_eq!(exact.chars().count(), MAX_MESSAGE_CHARS);
        assert!(exact.ends_with('x'));
    }

    #[tokio::test]
    async fn test_different_failures_are_each_reported() {
        let homeworks = FakeHomeworks::default();
        let notifier = FakeNotifier::default();
        homeworks.push(Err(ClientError::unexpected_status(500, "boom")));
        homeworks.push(Err(ClientError::unexpected_status(503, "busy")));

        let mut poller = poller(&homeworks, &notifier);
        poller.poll_once().await;
        poller.poll_once().await;

        assert_eq!(notifier.sent().len(), 2);
    }

    #[tokio::test]
    async fn test_failure_reported_again_after_recovery() {
        let homeworks = FakeHomeworks::default();
        let notifier = FakeNotifier::default();
        homeworks.push(Err(ClientError::unexpected_status(500, "boom")));
        homeworks.push(Ok(json!({ "homeworks": [] })));
        homeworks.push(Err(ClientError::unexpected_status(500, "boom")));

        let mut poller = poller(&homeworks, &notifier);
        poller.poll_once().await;
        assert_eq!(poller.poll_once().await, CycleOutcome::NoNewStatus);
        poller.poll_once().await;

        assert_eq!(notifier.sent().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_delivery_is_retried_next_cycle() {
        let homeworks = FakeHomeworks::default();
        let notifier = FakeNotifier::default();
        homeworks.push(Ok(approved()));
        homeworks.push(Ok(approved()));

        let mut poller = poller(&homeworks, &notifier);
        notifier.set_failing(true);
        assert_eq!(poller.poll_once().await, CycleOutcome::DeliveryFailed);
        assert!(poller.state().last_message.is_empty());

        notifier.set_failing(false);
        assert_eq!(poller.poll_once().await, CycleOutcome::Notified);
        assert_eq!(notifier.sent(), vec![APPROVED.to_string()]);
    }

    #[tokio::test]
    async fn test_failed_failure_report_is_not_remembered() {
        let homeworks = FakeHomeworks::default();
        let notifier = FakeNotifier::default();
        homeworks.push(Err(ClientError::unexpected_status(500, "boom")));
        homeworks.push(Err(ClientError::unexpected_status(500, "boom")));

        let mut poller = poller(&homeworks, &notifier);
        notifier.set_failing(true);
        assert_eq!(
            poller.poll_once().await,
            CycleOutcome::Failed {
                error_notified: false
            }
        );
        assert!(poller.state().last_error.is_empty());

        notifier.set_failing(false);
        assert_eq!(
            poller.poll_once().await,
            CycleOutcome::Failed {
                error_notified: true
            }
        );
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let homeworks = FakeHomeworks::default();
        homeworks.push(Ok(approved()));

        let shutdown = CancellationToken::new();
        let notifier = FakeNotifier {
            cancel_on_send: Some(shutdown.clone()),
            ..FakeNotifier::default()
        };

        let mut poller = poller(&homeworks, &notifier);
        time::timeout(Duration::from_secs(5), poller.run(shutdown))
            .await
            .expect("poller did not stop");

        assert_eq!(notifier.sent(), vec![APPROVED.to_string()]);
        assert_eq!(homeworks.requested().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_keeps_polling_after_failure_once_per_period() {
        let homeworks = FakeHomeworks::default();
        let notifier = FakeNotifier::default();
        homeworks.push(Err(ClientError::unexpected_status(500, "boom")));
        homeworks.push(Ok(approved()));

        let shutdown = CancellationToken::new();
        let mut poller = poller(&homeworks, &notifier);
        let handle = tokio::spawn({
            let shutdown = shutdown.clone();
            async move { poller.run(shutdown).await }
        });

        time::sleep(Duration::from_secs(1)).await;
        assert_eq!(homeworks.requested(), vec![500]);
        assert_eq!(notifier.sent().len(), 1);

        time::sleep(Duration::from_secs(598)).await;
        assert_eq!(homeworks.requested().len(), 1);

        time::sleep(Duration::from_secs(2)).await;
        assert_eq!(homeworks.requested(), vec![500, 500]);
        assert_eq!(notifier.sent()[1], APPROVED);

        shutdown.cancel();
        handle.await.unwrap();
        assert_eq!(homeworks.requested().len(), 2);
    }

    #[tokio::test]
    async fn test_run_does_nothing_when_already_cancelled() {
        let homeworks = FakeHomeworks::default();
        let notifier = FakeNotifier::default();
        let shutdown = CancellationToken::new();
        shutdown.cancel();

        let mut poller = poller(&homeworks, &notifier);
        poller.run(shutdown).await;

        assert!(homeworks.requested().is_empty());
    }
}
