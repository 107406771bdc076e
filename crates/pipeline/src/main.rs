//! Training Pipeline - Main Entry Point

use pipeline::{run, PipelineConfig};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("=== Turbofan RUL Training Pipeline v{} ===", env!("CARGO_PKG_VERSION"));

    let config = PipelineConfig::load()?;
    let report = run(&config)?;

    info!(
        "Done. Held-out RMSE {:.2} cycles, R2 {:.4}",
        report.rmse, report.r2
    );
    Ok(())
}
