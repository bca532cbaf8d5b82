//! # Reconciliation Worker
//!
//! Periodically asks the accrual service about every order that is not final yet and applies
//! the answers through the order store.
//!
//! Each tick walks the pending orders oldest first:
//!
//! | decision | effect |
//! |----------|--------|
//! | `Pending`, `Unreachable`, `Registered`, `Processing` | `New` becomes `Processing`, otherwise unchanged |
//! | `Invalid` | order becomes `Invalid` |
//! | `Processed(a)` | order settled: `Processed` plus a credit of `a` to the owner, as one step |
//! | `RateLimited(d)` | the tick stops at once and no request is sent before `d` has elapsed |
//!
//! An order that changed under the worker (already terminal, vanished) is skipped with a log
//! line. Any other store failure aborts the tick; the affected order stays pending and is
//! retried on the next one.

use crate::accrual::{AccrualOracle, AccrualStatus, Decision};
use crate::clients::OrderClient;
use crate::model::{Order, OrderStatus};
use crate::order_actor::OrderError;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Shortest accepted poll interval; `tokio::time::interval` rejects a zero period.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// What a single tick did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Orders the accrual service was asked about.
    pub polled: usize,
    /// Orders moved from `New` to `Processing`.
    pub advanced: usize,
    pub settled: usize,
    pub invalidated: usize,
    /// The service answered 429 and the tick stopped early.
    pub rate_limited: bool,
    /// The tick did nothing because a back-off was still running.
    pub suppressed: bool,
}

enum Outcome {
    Unchanged,
    Advanced,
    Settled,
    Invalidated,
}

pub struct ReconciliationWorker {
    orders: OrderClient,
    oracle: Arc<dyn AccrualOracle>,
    poll_interval: Duration,
    resume_at: Option<Instant>,
}

impl ReconciliationWorker {
    pub fn new(orders: OrderClient, oracle: Arc<dyn AccrualOracle>) -> Self {
        Self {
            orders,
            oracle,
            poll_interval: DEFAULT_POLL_INTERVAL,
            resume_at: None,
        }
    }

    /// Sets the tick period. Anything below [`MIN_POLL_INTERVAL`] is raised to it.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval.max(MIN_POLL_INTERVAL);
        self
    }

    /// When polling may resume after a rate limit, if a back-off is in force.
    pub fn backoff_until(&self) -> Option<Instant> {
        self.resume_at
    }

    /// Runs one reconciliation pass.
    pub async fn tick(&mut self) -> Result<TickReport, OrderError> {
        let mut report = TickReport::default();

        if let Some(resume_at) = self.resume_at {
            let now = Instant::now();
            if now < resume_at {
                let remaining_ms = (resume_at - now).as_millis() as u64;
                debug!(remaining_ms, "Accrual polling suspended");
                report.suppressed = true;
                return Ok(report);
            }
            self.resume_at = None;
            info!("Accrual back-off elapsed, resuming");
        }

        let pending = self.orders.list_pending().await?;
        for order in pending {
            report.polled += 1;
            let decision = self.oracle.check(&order.number).await;

            let outcome = match decision {
                Decision::RateLimited(retry_after) => {
                    warn!(
                        number = %order.number,
                        retry_after_secs = retry_after.as_secs(),
                        "Accrual service rate limited, suspending polling"
                    );
                    self.resume_at = Some(Instant::now() + retry_after);
                    report.rate_limited = true;
                    break;
                }
                Decision::Unreachable(reason) => {
                    warn!(order_id = %order.id, number = %order.number, %reason, "Accrual service unreachable");
                    self.mark_processing(&order).await
                }
                Decision::Pending => self.mark_processing(&order).await,
                Decision::Verdict { status, accrual } => self.apply(&order, status, accrual).await,
            };

            match outcome {
                Ok(Outcome::Unchanged) => {}
                Ok(Outcome::Advanced) => report.advanced += 1,
                Ok(Outcome::Settled) => report.settled += 1,
                Ok(Outcome::Invalidated) => report.invalidated += 1,
                Err(e @ (OrderError::InvalidTransition { .. } | OrderError::NotFound(_))) => {
                    debug!(order_id = %order.id, error = %e, "Order changed concurrently, skipping");
                }
                Err(e) => return Err(e),
            }
        }

        if report.polled > 0 {
            info!(
                polled = report.polled,
                advanced = report.advanced,
                settled = report.settled,
                invalidated = report.invalidated,
                rate_limited = report.rate_limited,
                "Reconciliation tick complete"
            );
        }
        Ok(report)
    }

    async fn apply(
        &self,
        order: &Order,
        status: AccrualStatus,
        accrual: Option<Decimal>,
    ) -> Result<Outcome, OrderError> {
        match status {
            AccrualStatus::Registered | AccrualStatus::Processing => {
                self.mark_processing(order).await
            }
            AccrualStatus::Invalid => {
                self.orders
                    .transition(order.id, OrderStatus::Invalid, None)
                    .await?;
                Ok(Outcome::Invalidated)
            }
            AccrualStatus::Processed => {
                self.orders
                    .settle(order.id, accrual.unwrap_or(Decimal::ZERO))
                    .await?;
                Ok(Outcome::Settled)
            }
        }
    }

    async fn mark_processing(&self, order: &Order) -> Result<Outcome, OrderError> {
        if order.status != OrderStatus::New {
            return Ok(Outcome::Unchanged);
        }
        self.orders
            .transition(order.id, OrderStatus::Processing, None)
            .await?;
        Ok(Outcome::Advanced)
    }

    /// Spawns the tick loop.
    pub fn start(self) -> WorkerHandle {
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(self.run(shutdown.clone()));
        WorkerHandle { shutdown, handle }
    }

    async fn run(mut self, shutdown: CancellationToken) {
        info!(
            poll_interval_secs = self.poll_interval.as_secs_f64(),
            "Reconciliation worker started"
        );

        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {}
            }

            // A tick abandoned here has no half-applied order: every change is one actor message
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                result = self.tick() => {
                    if let Err(e) = result {
                        error!(error = %e, "Reconciliation tick failed");
                    }
                }
            }
        }

        info!("Reconciliation worker stopped");
    }
}

/// Handle to a running [`ReconciliationWorker`].
pub struct WorkerHandle {
    shutdown: CancellationToken,
    handle: JoinHandle<()>,
}

impl WorkerHandle {
    /// Cancels the loop and waits for the task to exit.
    pub async fn stop(self) -> Result<(), JoinError> {
        self.shutdown.cancel();
        self.handle.await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::LedgerClient;
    use crate::model::UserId;
    use actor_framework::ActorClient;
    use async_trait::async_trait;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    /// Answers from a per-number script; `Pending` once a script runs out.
    #[derive(Default)]
    struct ScriptedOracle {
        scripts: Mutex<HashMap<String, VecDeque<Decision>>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedOracle {
        fn script(&self, number: &str, decisions: Vec<Decision>) {
            self.scripts
                .lock()
                .unwrap()
                .insert(number.to_string(), decisions.into());
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AccrualOracle for ScriptedOracle {
        async fn check(&self, number: &str) -> Decision {
            self.calls.lock().unwrap().push(number.to_string());
            self.scripts
                .lock()
                .unwrap()
                .get_mut(number)
                .and_then(|script| script.pop_front())
                .unwrap_or(Decision::Pending)
        }
    }

    fn processed(accrual: i64) -> Decision {
        Decision::Verdict {
            status: AccrualStatus::Processed,
            accrual: Some(Decimal::from(accrual)),
        }
    }

    fn verdict(status: AccrualStatus) -> Decision {
        Decision::Verdict {
            status,
            accrual: None,
        }
    }

    struct Harness {
        orders: OrderClient,
        ledger: LedgerClient,
        oracle: Arc<ScriptedOracle>,
        worker: ReconciliationWorker,
    }

    fn harness() -> Harness {
        let (ledger_actor, ledger_client) = crate::ledger_actor::new();
        tokio::spawn(ledger_actor.run(()));
        let ledger = LedgerClient::new(ledger_client);

        let (order_actor, order_client) = crate::order_actor::new();
        tokio::spawn(order_actor.run(ledger.clone()));
        let orders = OrderClient::new(order_client);

        let oracle = Arc::new(ScriptedOracle::default());
        let worker = ReconciliationWorker::new(orders.clone(), oracle.clone());
        Harness {
            orders,
            ledger,
            oracle,
            worker,
        }
    }

    #[tokio::test]
    async fn test_processed_verdict_settles_and_credits() {
        let mut h = harness();
        let order = h
            .orders
            .create(UserId(1), "12345678903".to_string())
            .await
            .unwrap();
        h.oracle.script("12345678903", vec![processed(500)]);

        let report = h.worker.tick().await.unwrap();
        assert_eq!(report.polled, 1);
        assert_eq!(report.settled, 1);

        let stored = h.orders.get(order.id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Processed);
        assert_eq!(stored.accrual, Some(Decimal::from(500)));
        assert_eq!(
            h.ledger.balance_of(UserId(1)).await.unwrap().current,
            Decimal::from(500)
        );
    }

    #[tokio::test]
    async fn test_non_final_answers_move_new_to_processing() {
        let mut h = harness();
        for number in ["12345678903", "9278923470", "79927398713", "2377225624"] {
            h.orders.create(UserId(1), number.to_string()).await.unwrap();
        }
        h.oracle.script("9278923470", vec![verdict(AccrualStatus::Registered)]);
        h.oracle.script("79927398713", vec![verdict(AccrualStatus::Processing)]);
        h.oracle.script(
            "2377225624",
            vec![Decision::Unreachable("connection reset".to_string())],
        );

        let report = h.worker.tick().await.unwrap();
        assert_eq!(report.polled, 4);
        assert_eq!(report.advanced, 4);

        let pending = h.orders.list_pending().await.unwrap();
        assert!(pending.iter().all(|o| o.status == OrderStatus::Processing));

        // Already processing: nothing more to record
        let report = h.worker.tick().await.unwrap();
        assert_eq!(report.polled, 4);
        assert_eq!(report.advanced, 0);
    }

    #[tokio::test]
    async fn test_invalid_verdict_is_terminal_without_credit() {
        let mut h = harness();
        let order = h
            .orders
            .create(UserId(1), "12345678903".to_string())
            .await
            .unwrap();
        h.oracle
            .script("12345678903", vec![verdict(AccrualStatus::Invalid)]);

        let report = h.worker.tick().await.unwrap();
        assert_eq!(report.invalidated, 1);

        let stored = h.orders.get(order.id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Invalid);
        assert_eq!(stored.accrual, None);
        assert_eq!(
            h.ledger.balance_of(UserId(1)).await.unwrap(),
            Default::default()
        );
    }

    #[tokio::test]
    async fn test_terminal_orders_are_never_polled_or_credited_again() {
        let mut h = harness();
        let order = h
            .orders
            .create(UserId(1), "12345678903".to_string())
            .await
            .unwrap();
        h.oracle.script(
            "12345678903",
            vec![processed(500), processed(500), processed(500)],
        );

        h.worker.tick().await.unwrap();
        for _ in 0..3 {
            let report = h.worker.tick().await.unwrap();
            assert_eq!(report, TickReport::default());
        }
        assert_eq!(h.oracle.calls().len(), 1);

        // A late settle for the same order is refused and credits nothing
        let err = h
            .orders
            .settle(order.id, Decimal::from(500))
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::InvalidTransition { .. }));
        assert_eq!(
            h.ledger.balance_of(UserId(1)).await.unwrap().current,
            Decimal::from(500)
        );
    }

    #[tokio::test]
    async fn test_orders_are_polled_oldest_first() {
        let mut h = harness();
        let numbers = ["79927398713", "12345678903", "9278923470"];
        for number in numbers {
            h.orders.create(UserId(1), number.to_string()).await.unwrap();
        }

        h.worker.tick().await.unwrap();
        assert_eq!(h.oracle.calls(), numbers);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_halts_tick_and_backs_off() {
        let mut h = harness();
        for number in ["79927398713", "12345678903", "9278923470"] {
            h.orders.create(UserId(1), number.to_string()).await.unwrap();
        }
        h.oracle.script(
            "12345678903",
            vec![Decision::RateLimited(Duration::from_secs(30))],
        );

        let report = h.worker.tick().await.unwrap();
        assert!(report.rate_limited);
        assert_eq!(report.polled, 2);
        // The third order was never requested
        assert_eq!(h.oracle.calls(), vec!["79927398713", "12345678903"]);
        assert!(h.worker.backoff_until().is_some());

        tokio::time::advance(Duration::from_secs(29)).await;
        let report = h.worker.tick().await.unwrap();
        assert!(report.suppressed);
        assert_eq!(h.oracle.calls().len(), 2);

        tokio::time::advance(Duration::from_secs(2)).await;
        let report = h.worker.tick().await.unwrap();
        assert!(!report.suppressed);
        assert_eq!(report.polled, 3);
        assert!(h.worker.backoff_until().is_none());
    }

    #[tokio::test]
    async fn test_started_worker_reconciles_until_stopped() {
        let h = harness();
        let order = h
            .orders
            .create(UserId(3), "12345678903".to_string())
            .await
            .unwrap();
        h.oracle.script("12345678903", vec![processed(42)]);

        let handle = h
            .worker
            .with_poll_interval(Duration::from_millis(10))
            .start();

        let mut settled = false;
        for _ in 0..200 {
            let stored = h.orders.get(order.id).await.unwrap().unwrap();
            if stored.status == OrderStatus::Processed {
                settled = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(settled);

        handle.stop().await.unwrap();
        assert_eq!(
            h.ledger.balance_of(UserId(3)).await.unwrap().current,
            Decimal::from(42)
        );
    }

    #[tokio::test]
    async fn test_zero_poll_interval_is_clamped() {
        let h = harness();
        let order = h
            .orders
            .create(UserId(5), "12345678903".to_string())
            .await
            .unwrap();
        h.oracle.script("12345678903", vec![processed(7)]);

        let worker = h.worker.with_poll_interval(Duration::ZERO);
        assert_eq!(worker.poll_interval, MIN_POLL_INTERVAL);
        let handle = worker.start();

        let mut settled = false;
        for _ in 0..200 {
            let stored = h.orders.get(order.id).await.unwrap().unwrap();
            if stored.status == OrderStatus::Processed {
                settled = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(settled);

        // The loop is still alive and exits cleanly
        handle.stop().await.unwrap();
    }

    /// Never answers; lets a test catch the worker in the middle of a tick.
    struct StuckOracle {
        entered: tokio::sync::Notify,
    }

    #[async_trait]
    impl AccrualOracle for StuckOracle {
        async fn check(&self, _number: &str) -> Decision {
            self.entered.notify_one();
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_stop_interrupts_an_inflight_tick() {
        let h = harness();
        h.orders
            .create(UserId(1), "12345678903".to_string())
            .await
            .unwrap();

        let oracle = Arc::new(StuckOracle {
            entered: tokio::sync::Notify::new(),
        });
        let handle = ReconciliationWorker::new(h.orders.clone(), oracle.clone()).start();
        oracle.entered.notified().await;

        let stopped = tokio::time::timeout(Duration::from_secs(1), handle.stop()).await;
        assert!(matches!(stopped, Ok(Ok(()))));

        let pending = h.orders.list_pending().await.unwrap();
        assert_eq!(pending[0].status, OrderStatus::New);
    }
}
