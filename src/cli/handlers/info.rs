//! Information display handlers (health, config)

use crate::cli::output::print_config;
use crate::cli::output::print_health_report;
use crate::health::run_health_check;
use crate::AppConfig;
use crate::Result;

pub async fn handle_health(config: &AppConfig) -> Result<bool> {
    let rag = super::build_rag_service(config);
    let report = run_health_check(&rag).await;
    print_health_report(&report);
    Ok(report.success)
}

pub fn handle_config(config: &AppConfig) -> Result<()> {
    print_config(config);
    Ok(())
}
