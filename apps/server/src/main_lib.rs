use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::{config::Config, domain_events::ServerDomainEventSink};
use ledgerly_core::{
    budgets::{BudgetService, BudgetServiceTrait},
    events::DomainEventSink,
    goals::{SavingsGoalService, SavingsGoalServiceTrait},
    reports::{DefaultReportFormatter, ReportService, ReportServiceTrait},
    summaries::{SummaryService, SummaryServiceTrait},
    transactions::{TransactionService, TransactionServiceTrait},
};
use ledgerly_storage_sqlite::{
    budgets::BudgetRepository,
    db::{self, write_actor},
    goals::SavingsGoalRepository,
    reports::ReportRepository,
    summaries::SummaryRepository,
    transactions::TransactionRepository,
};

pub struct AppState {
    pub transaction_service: Arc<dyn TransactionServiceTrait>,
    pub summary_service: Arc<dyn SummaryServiceTrait>,
    pub budget_service: Arc<dyn BudgetServiceTrait>,
    pub goal_service: Arc<dyn SavingsGoalServiceTrait>,
    pub report_service: Arc<dyn ReportServiceTrait>,
}

pub fn init_tracing() {
    let log_format = std::env::var("LEDGERLY_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = write_actor::spawn_writer((*pool).clone());

    let domain_event_sink: Arc<dyn DomainEventSink> = Arc::new(ServerDomainEventSink::start());

    let transaction_repo = Arc::new(TransactionRepository::new(pool.clone(), writer.clone()));
    let summary_repo = Arc::new(SummaryRepository::new(pool.clone(), writer.clone()));
    let budget_repo = Arc::new(BudgetRepository::new(pool.clone(), writer.clone()));
    let goal_repo = Arc::new(SavingsGoalRepository::new(pool.clone(), writer.clone()));
    let report_repo = Arc::new(ReportRepository::new(pool.clone(), writer));

    let summary_service = Arc::new(SummaryService::new(
        transaction_repo.clone(),
        summary_repo,
    ));
    let transaction_service = Arc::new(TransactionService::new(
        transaction_repo.clone(),
        summary_service.clone(),
        domain_event_sink.clone(),
    ));
    let budget_service = Arc::new(BudgetService::new(budget_repo.clone()));
    let goal_service = Arc::new(SavingsGoalService::new(goal_repo.clone()));
    let report_service = Arc::new(ReportService::new(
        transaction_repo,
        budget_repo,
        goal_repo,
        report_repo,
        Arc::new(DefaultReportFormatter::new()),
        domain_event_sink,
    ));

    Ok(Arc::new(AppState {
        transaction_service,
        summary_service,
        budget_service,
        goal_service,
        report_service,
    }))
}
