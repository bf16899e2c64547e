use accumledger::orchestration::replay_file;
use accumledger::{config::Config, db::init_db, AppError, Repository, TxExecutor};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("{}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run() -> Result<(), AppError> {
    let config = Config::from_env()?;

    let pool = init_db(&config.database_path).await?;
    let repo = Arc::new(Repository::new(pool));
    let executor = TxExecutor::new(repo.clone(), config.allow_admin_overrides);

    tracing::info!(
        ops = %config.ops_path.display(),
        admin = config.allow_admin_overrides,
        "Replaying operations"
    );
    let summary = replay_file(&executor, &config.ops_path, config.stop_on_error).await?;
    let accumulators = repo.list_accumulator_names().await?;

    tracing::info!(
        accumulators = accumulators.len(),
        applied = summary.applied,
        failed = summary.failed,
        payouts = %summary.payouts,
        "Replay finished"
    );
    Ok(())
}
