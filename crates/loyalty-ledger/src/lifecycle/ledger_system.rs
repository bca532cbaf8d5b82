use crate::accrual::AccrualOracle;
use crate::clients::{LedgerClient, OrderClient};
use crate::gateway::{UploadGateway, WithdrawGateway};
use crate::worker::{ReconciliationWorker, WorkerHandle};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Owns the running loyalty system: the ledger actor, the order actor and, once started,
/// the reconciliation worker.
///
/// # Architecture
///
/// - **Ledger Actor**: one account per user, created on first credit (`Context = ()`)
/// - **Order Actor**: uploaded orders keyed by number; settling an order credits the ledger
///   from inside the order actor (`Context = LedgerClient`)
/// - **Reconciliation Worker**: polls the accrual service and drives orders through the
///   order client
///
/// The dependency graph has no cycles (worker → orders → ledger), so dropping every client
/// lets the actors drain and exit in order.
///
/// # Example
///
/// ```ignore
/// let mut system = LedgerSystem::new();
/// system.start_worker(Arc::new(HttpAccrualClient::new(config)?), Duration::from_secs(10));
///
/// system.upload_gateway().upload(UserId(1), "12345678903").await?;
/// let balance = system.ledger_client.balance_of(UserId(1)).await?;
///
/// system.shutdown().await?;
/// ```
pub struct LedgerSystem {
    pub order_client: OrderClient,
    pub ledger_client: LedgerClient,
    worker: Option<WorkerHandle>,
    handles: Vec<JoinHandle<()>>,
}

impl LedgerSystem {
    /// Spawns both actors and wires the order actor to the ledger.
    pub fn new() -> Self {
        let (ledger_actor, ledger_client) = crate::ledger_actor::new();
        let (order_actor, order_client) = crate::order_actor::new();

        let ledger_client = LedgerClient::new(ledger_client);
        let order_client = OrderClient::new(order_client);

        let ledger_handle = tokio::spawn(ledger_actor.run(()));
        let order_handle = tokio::spawn(order_actor.run(ledger_client.clone()));

        Self {
            order_client,
            ledger_client,
            worker: None,
            handles: vec![order_handle, ledger_handle],
        }
    }

    /// Starts the reconciliation loop. A worker that is already running is left alone.
    pub fn start_worker(&mut self, oracle: Arc<dyn AccrualOracle>, poll_interval: Duration) {
        if self.worker.is_some() {
            return;
        }
        let worker = ReconciliationWorker::new(self.order_client.clone(), oracle)
            .with_poll_interval(poll_interval);
        self.worker = Some(worker.start());
    }

    pub fn upload_gateway(&self) -> UploadGateway {
        UploadGateway::new(self.order_client.clone())
    }

    pub fn withdraw_gateway(&self) -> WithdrawGateway {
        WithdrawGateway::new(self.ledger_client.clone())
    }

    /// Stops the worker, closes both actors and waits for them to exit.
    ///
    /// Gateways handed out earlier hold clients too; they must be dropped before this resolves.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down ledger system...");

        if let Some(worker) = self.worker {
            if let Err(e) = worker.stop().await {
                error!("Reconciliation worker failed: {:?}", e);
                return Err(format!("Reconciliation worker failed: {:?}", e));
            }
        }

        // Closing the channels ends each actor loop once its queue is drained
        drop(self.order_client);
        drop(self.ledger_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("Ledger system shutdown complete.");
        Ok(())
    }
}

impl Default for LedgerSystem {
    fn default() -> Self {
        Self::new()
    }
}
