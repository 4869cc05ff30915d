use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, info};
use std::sync::Arc;

use super::aggregation;
use super::reports_model::{
    CategoryTotal, ExportFormat, GoalStatus, NewReport, Report, ReportData, ReportPeriod,
    ReportRequest, ReportSummary, SavingsProgress,
};
use super::reports_traits::{ReportFormatter, ReportRepositoryTrait, ReportServiceTrait};
use crate::budgets::{Budget, BudgetQuery, BudgetRepositoryTrait};
use crate::constants::TOP_CATEGORIES_LIMIT;
use crate::errors::{Error, Result};
use crate::events::{DomainEvent, DomainEventSink};
use crate::goals::{SavingsGoalQuery, SavingsGoalRepositoryTrait};
use crate::transactions::{TransactionRepositoryTrait, TransactionType};
use crate::utils::time_utils::{current_year, month_end, month_start, today, year_bounds};

/// Synthesizes report documents from the raw ledger.
///
/// Reports never read the maintained summary tables.
pub struct ReportService {
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    budget_repository: Arc<dyn BudgetRepositoryTrait>,
    goal_repository: Arc<dyn SavingsGoalRepositoryTrait>,
    report_repository: Arc<dyn ReportRepositoryTrait>,
    formatter: Arc<dyn ReportFormatter>,
    event_sink: Arc<dyn DomainEventSink>,
}

impl ReportService {
    pub fn new(
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        budget_repository: Arc<dyn BudgetRepositoryTrait>,
        goal_repository: Arc<dyn SavingsGoalRepositoryTrait>,
        report_repository: Arc<dyn ReportRepositoryTrait>,
        formatter: Arc<dyn ReportFormatter>,
        event_sink: Arc<dyn DomainEventSink>,
    ) -> Self {
        Self {
            transaction_repository,
            budget_repository,
            goal_repository,
            report_repository,
            formatter,
            event_sink,
        }
    }

    fn budgets_in_period(&self, user_id: &str, period: &ReportPeriod) -> Result<Vec<Budget>> {
        let months = period.months();
        let mut budgets = Vec::new();
        for year in period.years() {
            let query = BudgetQuery {
                month: None,
                year: Some(year),
            };
            budgets.extend(
                self.budget_repository
                    .find_all(user_id, query)?
                    .into_iter()
                    .filter(|b| months.contains(&(b.year, b.month))),
            );
        }
        Ok(budgets)
    }

    /// Builds the full report document for the period as of `today`.
    fn build_document(
        &self,
        user_id: &str,
        period: ReportPeriod,
        today: NaiveDate,
    ) -> Result<ReportData> {
        let transactions =
            self.transaction_repository
                .find_in_range(user_id, period.start, period.end)?;
        let totals = aggregation::type_totals(&transactions);
        let budgets = self.budgets_in_period(user_id, &period)?;
        let goals = self
            .goal_repository
            .find_all(user_id, SavingsGoalQuery::default())?;
        debug!(
            "Synthesizing {} report for {} ({} - {}): {} transactions, {} budgets, {} goals",
            period.report_type,
            user_id,
            period.start,
            period.end,
            transactions.len(),
            budgets.len(),
            goals.len()
        );

        let granularity = period.trend_granularity();
        let income = aggregation::breakdown(
            &transactions,
            TransactionType::Income,
            totals.income,
            granularity,
        );
        let expenses = aggregation::breakdown(
            &transactions,
            TransactionType::Expense,
            totals.expense,
            granularity,
        );
        let budgets = aggregation::budget_usage(&budgets, &transactions);

        let mut savings_goals = Vec::with_capacity(goals.len());
        for goal in &goals {
            let linked = self
                .transaction_repository
                .find_by_savings_goal(user_id, &goal.id)?;
            let saved = aggregation::saved_towards_goal(&linked);
            let progress = aggregation::goal_progress(goal, saved, today);
            // Goals settled before the period starts are history, unfinished ones stay.
            let settled_earlier = progress.status == GoalStatus::Completed
                && goal.due_date.is_some_and(|due| due < period.start);
            if !settled_earlier {
                savings_goals.push(progress);
            }
        }

        let savings_progress = savings_goals.first().map(|goal| SavingsProgress {
            name: goal.name.clone(),
            target_amount: goal.target_amount,
            saved_amount: goal.saved_amount,
            percentage: goal.percentage,
        });

        let summary = ReportSummary {
            total_income: totals.income,
            total_expense: totals.expense,
            net_savings: totals.income - totals.expense,
            budgeted_amount: budgets.overall_usage.budgeted,
            budget_difference: budgets.overall_usage.budgeted - budgets.overall_usage.spent,
            savings_progress,
        };

        Ok(ReportData {
            period,
            summary,
            income,
            expenses,
            budgets,
            savings_goals,
        })
    }

    fn category_window(month: Option<u32>, year: Option<i32>) -> Result<(NaiveDate, NaiveDate)> {
        let year = year.unwrap_or_else(current_year);
        match month {
            Some(month) if (1..=12).contains(&month) => {
                Ok((month_start(year, month)?, month_end(year, month)?))
            }
            Some(month) => Err(Error::invalid_input(format!(
                "Month must be between 1 and 12, got {}",
                month
            ))),
            None => year_bounds(year),
        }
    }

    fn expense_totals(
        &self,
        user_id: &str,
        month: Option<u32>,
        year: Option<i32>,
    ) -> Result<Vec<CategoryTotal>> {
        let (start, end) = Self::category_window(month, year)?;
        let transactions = self
            .transaction_repository
            .find_in_range(user_id, start, end)?;
        Ok(aggregation::expense_totals(&transactions))
    }
}

#[async_trait]
impl ReportServiceTrait for ReportService {
    async fn create_report(&self, user_id: &str, request: ReportRequest) -> Result<Report> {
        let period = ReportPeriod::resolve(&request, current_year())?;
        let data = self.build_document(user_id, period, today())?;

        let report = self
            .report_repository
            .create(NewReport {
                user_id: user_id.to_string(),
                report_type: period.report_type,
                period_start: period.start,
                period_end: period.end,
                data,
            })
            .await?;

        info!(
            "Created {} report {} for user {}",
            report.report_type, report.id, user_id
        );
        self.event_sink.emit(DomainEvent::report_generated(
            user_id.to_string(),
            report.id.clone(),
        ));
        Ok(report)
    }

    async fn update_report(&self, report_id: &str, user_id: &str) -> Result<Report> {
        let mut report = self
            .report_repository
            .find_by_id_and_owner(report_id, user_id)?;

        let period = ReportPeriod {
            report_type: report.report_type,
            start: report.period_start,
            end: report.period_end,
        };
        let previous_period = report.data.period;
        let mut data = self.build_document(user_id, period, today())?;
        data.period = previous_period;
        report.data = data;

        let saved = self.report_repository.save(report).await?;
        self.event_sink.emit(DomainEvent::report_generated(
            user_id.to_string(),
            saved.id.clone(),
        ));
        Ok(saved)
    }

    fn get_report(&self, report_id: &str, user_id: &str) -> Result<Report> {
        self.report_repository
            .find_by_id_and_owner(report_id, user_id)
    }

    fn list_reports(&self, user_id: &str) -> Result<Vec<Report>> {
        self.report_repository.list(user_id)
    }

    async fn delete_report(&self, report_id: &str, user_id: &str) -> Result<()> {
        match self.report_repository.delete(report_id, user_id).await? {
            0 => Err(Error::NotFound(format!("Report {}", report_id))),
            _ => Ok(()),
        }
    }

    fn top_categories(
        &self,
        user_id: &str,
        month: Option<u32>,
        year: Option<i32>,
    ) -> Result<Vec<CategoryTotal>> {
        let mut totals = self.expense_totals(user_id, month, year)?;
        totals.truncate(TOP_CATEGORIES_LIMIT);
        Ok(totals)
    }

    fn category_charts(
        &self,
        user_id: &str,
        month: Option<u32>,
        year: Option<i32>,
    ) -> Result<Vec<CategoryTotal>> {
        self.expense_totals(user_id, month, year)
    }

    fn export_report(
        &self,
        report_id: &str,
        format: ExportFormat,
        user_id: &str,
    ) -> Result<Vec<u8>> {
        let report = self
            .report_repository
            .find_by_id_and_owner(report_id, user_id)?;
        self.formatter.format(&report.data, format)
    }
}
