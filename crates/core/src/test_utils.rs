//! In-memory repositories shared by the service tests.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::budgets::{Budget, BudgetQuery, BudgetRepositoryTrait, NewBudget};
use crate::errors::{DatabaseError, Error, Result};
use crate::goals::{NewSavingsGoal, SavingsGoal, SavingsGoalQuery, SavingsGoalRepositoryTrait};
use crate::reports::{NewReport, Report, ReportRepositoryTrait};
use crate::summaries::{
    DailySummary, MonthlyCategorySummary, MonthlySummary, SummaryRepositoryTrait,
};
use crate::transactions::{
    Category, DateFilter, NewTransaction, RecurringInterval, Transaction, TransactionPage,
    TransactionQuery, TransactionRepositoryTrait, TransactionType, TransactionUpdate, TypeTotals,
};

static NEXT_ID: AtomicUsize = AtomicUsize::new(1);

fn next_id(prefix: &str) -> String {
    format!("{}-{}", prefix, NEXT_ID.fetch_add(1, Ordering::Relaxed))
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn new_transaction(
    user_id: &str,
    transaction_type: TransactionType,
    category: Category,
    amount: Decimal,
    on: NaiveDate,
) -> NewTransaction {
    NewTransaction {
        id: None,
        user_id: user_id.to_string(),
        transaction_type,
        category,
        amount,
        date: on,
        description: None,
        recurring: false,
        recurring_interval: None,
        savings_goal_id: None,
    }
}

pub fn update_from(transaction: &Transaction) -> TransactionUpdate {
    TransactionUpdate {
        id: transaction.id.clone(),
        user_id: transaction.user_id.clone(),
        transaction_type: transaction.transaction_type,
        category: transaction.category,
        amount: transaction.amount,
        date: transaction.date,
        description: transaction.description.clone(),
        recurring: transaction.recurring,
        recurring_interval: transaction.recurring_interval,
        savings_goal_id: transaction.savings_goal_id.clone(),
    }
}

// =========================================================================
// Transactions
// =========================================================================

#[derive(Clone, Default)]
pub struct InMemoryTransactionRepository {
    transactions: Arc<Mutex<Vec<Transaction>>>,
}

impl InMemoryTransactionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Transaction> {
        self.transactions.lock().unwrap().clone()
    }

    fn owned_by(&self, user_id: &str) -> Vec<Transaction> {
        self.transactions
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl TransactionRepositoryTrait for InMemoryTransactionRepository {
    fn get_by_id(&self, transaction_id: &str, user_id: &str) -> Result<Transaction> {
        self.owned_by(user_id)
            .into_iter()
            .find(|t| t.id == transaction_id)
            .ok_or_else(|| Error::NotFound(format!("Transaction {}", transaction_id)))
    }

    fn find_in_range(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Transaction>> {
        let mut found: Vec<Transaction> = self
            .owned_by(user_id)
            .into_iter()
            .filter(|t| t.date >= start && t.date <= end)
            .collect();
        found.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));
        Ok(found)
    }

    fn search(
        &self,
        user_id: &str,
        query: &TransactionQuery,
        page: i64,
        page_size: i64,
    ) -> Result<TransactionPage> {
        let matching: Vec<Transaction> = self
            .owned_by(user_id)
            .into_iter()
            .filter(|t| query.start.is_none_or(|s| t.date >= s))
            .filter(|t| query.end.is_none_or(|e| t.date <= e))
            .filter(|t| query.transaction_type.is_none_or(|ty| t.transaction_type == ty))
            .filter(|t| query.category.is_none_or(|c| t.category == c))
            .collect();
        let total = matching.len() as i64;
        let data = matching
            .into_iter()
            .skip(((page - 1) * page_size) as usize)
            .take(page_size as usize)
            .collect();
        Ok(TransactionPage {
            data,
            total,
            page,
            page_size,
        })
    }

    fn find_by_savings_goal(
        &self,
        user_id: &str,
        savings_goal_id: &str,
    ) -> Result<Vec<Transaction>> {
        Ok(self
            .owned_by(user_id)
            .into_iter()
            .filter(|t| t.savings_goal_id.as_deref() == Some(savings_goal_id))
            .collect())
    }

    fn sum_by_type(&self, user_id: &str, filter: DateFilter) -> Result<TypeTotals> {
        let mut totals = TypeTotals::default();
        for t in self.owned_by(user_id).iter().filter(|t| filter.contains(t.date)) {
            totals.add(t.transaction_type, t.amount);
        }
        Ok(totals)
    }

    fn sum_by_category_type_range(
        &self,
        user_id: &str,
        category: Category,
        transaction_type: TransactionType,
        start: NaiveDate,
        end_exclusive: NaiveDate,
    ) -> Result<Decimal> {
        Ok(self
            .owned_by(user_id)
            .iter()
            .filter(|t| t.category == category && t.transaction_type == transaction_type)
            .filter(|t| t.date >= start && t.date < end_exclusive)
            .map(|t| t.amount)
            .sum())
    }

    async fn create(&self, new_transaction: NewTransaction) -> Result<Transaction> {
        let stamp = now();
        let transaction = Transaction {
            id: new_transaction.id.unwrap_or_else(|| next_id("tx")),
            user_id: new_transaction.user_id,
            transaction_type: new_transaction.transaction_type,
            category: new_transaction.category,
            amount: new_transaction.amount,
            date: new_transaction.date,
            description: new_transaction.description,
            recurring: new_transaction.recurring,
            recurring_interval: new_transaction.recurring_interval,
            savings_goal_id: new_transaction.savings_goal_id,
            created_at: stamp,
            updated_at: stamp,
        };
        self.transactions.lock().unwrap().push(transaction.clone());
        Ok(transaction)
    }

    async fn update(&self, update: TransactionUpdate) -> Result<Transaction> {
        let mut transactions = self.transactions.lock().unwrap();
        let existing = transactions
            .iter_mut()
            .find(|t| t.id == update.id && t.user_id == update.user_id)
            .ok_or_else(|| Error::NotFound(format!("Transaction {}", update.id)))?;
        existing.transaction_type = update.transaction_type;
        existing.category = update.category;
        existing.amount = update.amount;
        existing.date = update.date;
        existing.description = update.description;
        existing.recurring = update.recurring;
        existing.recurring_interval = update.recurring_interval;
        existing.savings_goal_id = update.savings_goal_id;
        existing.updated_at = now();
        Ok(existing.clone())
    }

    async fn delete(&self, transaction_id: &str, user_id: &str) -> Result<Transaction> {
        let mut transactions = self.transactions.lock().unwrap();
        let position = transactions
            .iter()
            .position(|t| t.id == transaction_id && t.user_id == user_id)
            .ok_or_else(|| Error::NotFound(format!("Transaction {}", transaction_id)))?;
        Ok(transactions.remove(position))
    }
}

// =========================================================================
// Summaries
// =========================================================================

#[derive(Clone, Default)]
pub struct InMemorySummaryRepository {
    daily: Arc<Mutex<BTreeMap<(String, NaiveDate), DailySummary>>>,
    monthly: Arc<Mutex<BTreeMap<(String, i32, u32), MonthlySummary>>>,
    category: Arc<Mutex<BTreeMap<(String, i32, u32, Category, TransactionType), MonthlyCategorySummary>>>,
    upserts: Arc<AtomicUsize>,
    fail_upserts: Arc<Mutex<bool>>,
}

impl InMemorySummaryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_upserts(&self, fail: bool) {
        *self.fail_upserts.lock().unwrap() = fail;
    }

    pub fn upsert_count(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }

    pub fn daily(&self, user_id: &str, on: NaiveDate) -> Option<DailySummary> {
        self.daily
            .lock()
            .unwrap()
            .get(&(user_id.to_string(), on))
            .cloned()
    }

    pub fn monthly(&self, user_id: &str, year: i32, month: u32) -> Option<MonthlySummary> {
        self.monthly
            .lock()
            .unwrap()
            .get(&(user_id.to_string(), year, month))
            .cloned()
    }

    pub fn category(
        &self,
        user_id: &str,
        year: i32,
        month: u32,
        category: Category,
        transaction_type: TransactionType,
    ) -> Option<MonthlyCategorySummary> {
        self.category
            .lock()
            .unwrap()
            .get(&(user_id.to_string(), year, month, category, transaction_type))
            .cloned()
    }

    pub fn row_counts(&self) -> (usize, usize, usize) {
        (
            self.daily.lock().unwrap().len(),
            self.monthly.lock().unwrap().len(),
            self.category.lock().unwrap().len(),
        )
    }

    fn check_write(&self) -> Result<()> {
        if *self.fail_upserts.lock().unwrap() {
            return Err(DatabaseError::QueryFailed("disk I/O error".to_string()).into());
        }
        self.upserts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl SummaryRepositoryTrait for InMemorySummaryRepository {
    async fn upsert_daily(&self, summary: DailySummary) -> Result<()> {
        self.check_write()?;
        self.daily
            .lock()
            .unwrap()
            .insert((summary.user_id.clone(), summary.date), summary);
        Ok(())
    }

    async fn upsert_monthly(&self, summary: MonthlySummary) -> Result<()> {
        self.check_write()?;
        self.monthly.lock().unwrap().insert(
            (summary.user_id.clone(), summary.year, summary.month),
            summary,
        );
        Ok(())
    }

    async fn upsert_monthly_category(&self, summary: MonthlyCategorySummary) -> Result<()> {
        self.check_write()?;
        self.category.lock().unwrap().insert(
            (
                summary.user_id.clone(),
                summary.year,
                summary.month,
                summary.category_id,
                summary.transaction_type,
            ),
            summary,
        );
        Ok(())
    }

    fn get_daily(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailySummary>> {
        Ok(self
            .daily
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.user_id == user_id && s.date >= start && s.date <= end)
            .cloned()
            .collect())
    }

    fn get_monthly(&self, user_id: &str, year: i32) -> Result<Vec<MonthlySummary>> {
        Ok(self
            .monthly
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.user_id == user_id && s.year == year)
            .cloned()
            .collect())
    }

    fn get_monthly_category(
        &self,
        user_id: &str,
        year: i32,
        month: Option<u32>,
    ) -> Result<Vec<MonthlyCategorySummary>> {
        Ok(self
            .category
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.user_id == user_id && s.year == year)
            .filter(|s| month.is_none_or(|m| s.month == m))
            .cloned()
            .collect())
    }
}

// =========================================================================
// Budgets, goals, reports
// =========================================================================

#[derive(Clone, Default)]
pub struct InMemoryBudgetRepository {
    budgets: Arc<Mutex<Vec<Budget>>>,
}

impl InMemoryBudgetRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BudgetRepositoryTrait for InMemoryBudgetRepository {
    fn find_all(&self, user_id: &str, query: BudgetQuery) -> Result<Vec<Budget>> {
        let mut budgets: Vec<Budget> = self
            .budgets
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.user_id == user_id)
            .filter(|b| query.year.is_none_or(|y| b.year == y))
            .filter(|b| query.month.is_none_or(|m| b.month == m))
            .cloned()
            .collect();
        budgets.sort_by(|a, b| {
            (a.year, a.month, a.category).cmp(&(b.year, b.month, b.category))
        });
        Ok(budgets)
    }

    async fn upsert(&self, new_budget: NewBudget) -> Result<Budget> {
        let mut budgets = self.budgets.lock().unwrap();
        if let Some(existing) = budgets.iter_mut().find(|b| {
            b.user_id == new_budget.user_id
                && b.category == new_budget.category
                && b.month == new_budget.month
                && b.year == new_budget.year
        }) {
            existing.amount = new_budget.amount;
            return Ok(existing.clone());
        }
        let budget = Budget {
            id: next_id("budget"),
            user_id: new_budget.user_id,
            category: new_budget.category,
            month: new_budget.month,
            year: new_budget.year,
            amount: new_budget.amount,
        };
        budgets.push(budget.clone());
        Ok(budget)
    }

    async fn delete(&self, budget_id: &str, user_id: &str) -> Result<usize> {
        let mut budgets = self.budgets.lock().unwrap();
        let before = budgets.len();
        budgets.retain(|b| !(b.id == budget_id && b.user_id == user_id));
        Ok(before - budgets.len())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryGoalRepository {
    goals: Arc<Mutex<Vec<SavingsGoal>>>,
}

impl InMemoryGoalRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SavingsGoalRepositoryTrait for InMemoryGoalRepository {
    fn find_all(&self, user_id: &str, query: SavingsGoalQuery) -> Result<Vec<SavingsGoal>> {
        Ok(self
            .goals
            .lock()
            .unwrap()
            .iter()
            .filter(|g| g.user_id == user_id)
            .filter(|g| match (query.due_on_or_after, g.due_date) {
                (Some(from), Some(due)) => due >= from,
                _ => true,
            })
            .cloned()
            .collect())
    }

    fn get_by_id(&self, goal_id: &str, user_id: &str) -> Result<SavingsGoal> {
        self.goals
            .lock()
            .unwrap()
            .iter()
            .find(|g| g.id == goal_id && g.user_id == user_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Savings goal {}", goal_id)))
    }

    async fn insert_new_goal(&self, new_goal: NewSavingsGoal) -> Result<SavingsGoal> {
        let goal = SavingsGoal {
            id: new_goal.id.unwrap_or_else(|| next_id("goal")),
            user_id: new_goal.user_id,
            name: new_goal.name,
            target_amount: new_goal.target_amount,
            saved_amount: new_goal.saved_amount,
            priority: new_goal.priority,
            due_date: new_goal.due_date,
        };
        self.goals.lock().unwrap().push(goal.clone());
        Ok(goal)
    }

    async fn update_goal(&self, goal_update: SavingsGoal) -> Result<SavingsGoal> {
        let mut goals = self.goals.lock().unwrap();
        let existing = goals
            .iter_mut()
            .find(|g| g.id == goal_update.id && g.user_id == goal_update.user_id)
            .ok_or_else(|| Error::NotFound(format!("Savings goal {}", goal_update.id)))?;
        *existing = goal_update.clone();
        Ok(goal_update)
    }

    async fn delete_goal(&self, goal_id: &str, user_id: &str) -> Result<usize> {
        let mut goals = self.goals.lock().unwrap();
        let before = goals.len();
        goals.retain(|g| !(g.id == goal_id && g.user_id == user_id));
        Ok(before - goals.len())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryReportRepository {
    reports: Arc<Mutex<Vec<Report>>>,
}

impl InMemoryReportRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReportRepositoryTrait for InMemoryReportRepository {
    async fn create(&self, new_report: NewReport) -> Result<Report> {
        let stamp = now();
        let report = Report {
            id: next_id("report"),
            user_id: new_report.user_id,
            report_type: new_report.report_type,
            period_start: new_report.period_start,
            period_end: new_report.period_end,
            data: new_report.data,
            created_at: stamp,
            updated_at: stamp,
        };
        self.reports.lock().unwrap().push(report.clone());
        Ok(report)
    }

    fn find_by_id_and_owner(&self, report_id: &str, user_id: &str) -> Result<Report> {
        self.reports
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == report_id && r.user_id == user_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Report {}", report_id)))
    }

    fn list(&self, user_id: &str) -> Result<Vec<Report>> {
        let mut reports: Vec<Report> = self
            .reports
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        reports.reverse();
        Ok(reports)
    }

    async fn save(&self, report: Report) -> Result<Report> {
        let mut reports = self.reports.lock().unwrap();
        let existing = reports
            .iter_mut()
            .find(|r| r.id == report.id && r.user_id == report.user_id)
            .ok_or_else(|| Error::NotFound(format!("Report {}", report.id)))?;
        existing.data = report.data;
        existing.updated_at = now();
        Ok(existing.clone())
    }

    async fn delete(&self, report_id: &str, user_id: &str) -> Result<usize> {
        let mut reports = self.reports.lock().unwrap();
        let before = reports.len();
        reports.retain(|r| !(r.id == report_id && r.user_id == user_id));
        Ok(before - reports.len())
    }
}

/// Recurring monthly transaction input, for tests that need the interval set.
pub fn recurring(mut transaction: NewTransaction) -> NewTransaction {
    transaction.recurring = true;
    transaction.recurring_interval = Some(RecurringInterval::Monthly);
    transaction
}
