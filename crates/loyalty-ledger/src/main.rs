use clap::Parser;
use loyalty_ledger::accrual::HttpAccrualClient;
use loyalty_ledger::config::Config;
use loyalty_ledger::lifecycle::{setup_tracing, LedgerSystem};
use loyalty_ledger::model::UserId;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{error, info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    let config = Config::parse();
    setup_tracing(config.log_format);

    info!(accrual_address = %config.accrual_address, "Starting loyalty ledger");

    let oracle = HttpAccrualClient::new(config.accrual_client()).map_err(|e| e.to_string())?;

    let mut system = LedgerSystem::new();
    system.start_worker(Arc::new(oracle), config.poll_interval());

    let users: BTreeSet<UserId> = config.uploads.iter().map(|seed| seed.user_id).collect();
    let uploads = system.upload_gateway();
    async {
        for seed in &config.uploads {
            match uploads.upload(seed.user_id, &seed.number).await {
                Ok(order) => info!(order_id = %order.id, number = %order.number, "Order accepted"),
                Err(e) => warn!(user_id = %seed.user_id, number = %seed.number, error = %e, "Order rejected"),
            }
        }
    }
    .instrument(tracing::info_span!("seed_uploads"))
    .await;
    drop(uploads);

    info!("Reconciling; press Ctrl-C to stop");
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for Ctrl-C");
    }

    let mut summary = Vec::new();
    for user_id in users {
        let orders = system
            .order_client
            .list_by_user(user_id)
            .await
            .map_err(|e| e.to_string())?;
        let balance = system
            .ledger_client
            .balance_of(user_id)
            .await
            .map_err(|e| e.to_string())?;
        summary.push(serde_json::json!({
            "user_id": user_id.0,
            "orders": orders,
            "balance": balance,
        }));
    }
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(e) => error!(error = %e, "Failed to render summary"),
    }

    system.shutdown().await
}
