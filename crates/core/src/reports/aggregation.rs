//! Pure aggregation helpers used to build report documents.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::period::TrendGranularity;
use super::reports_model::{
    BudgetUsage, BudgetsSection, CategoryAmount, CategoryBreakdown, CategoryTotal, GoalProgress,
    GoalStatus, OverallBudgetUsage, TrendPoint,
};
use crate::budgets::Budget;
use crate::constants::DISPLAY_DECIMAL_PRECISION;
use crate::goals::SavingsGoal;
use crate::transactions::{Category, Transaction, TransactionType, TypeTotals};

/// `part / whole * 100` at display precision; zero when `whole` is zero.
pub fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(dec!(100)))
        .map(|pct| pct.round_dp(DISPLAY_DECIMAL_PRECISION).normalize())
        .unwrap_or(Decimal::ZERO)
}

pub fn type_totals(transactions: &[Transaction]) -> TypeTotals {
    transactions
        .iter()
        .fold(TypeTotals::default(), |mut totals, transaction| {
            totals.add(transaction.transaction_type, transaction.amount);
            totals
        })
}

/// Category breakdown and trend for one transaction type.
pub fn breakdown(
    transactions: &[Transaction],
    transaction_type: TransactionType,
    type_total: Decimal,
    granularity: TrendGranularity,
) -> CategoryBreakdown {
    CategoryBreakdown {
        by_category: by_category(transactions, transaction_type, type_total),
        trend: trend(transactions, transaction_type, granularity),
    }
}

/// Per-category sums, largest first.
pub fn by_category(
    transactions: &[Transaction],
    transaction_type: TransactionType,
    type_total: Decimal,
) -> Vec<CategoryAmount> {
    let mut sums: HashMap<Category, Decimal> = HashMap::new();
    for transaction in transactions
        .iter()
        .filter(|t| t.transaction_type == transaction_type)
    {
        *sums.entry(transaction.category).or_default() += transaction.amount;
    }

    let mut rows: Vec<CategoryAmount> = sums
        .into_iter()
        .map(|(category, amount)| CategoryAmount {
            category,
            amount,
            percentage: percentage(amount, type_total),
        })
        .collect();
    rows.sort_by(|a, b| b.amount.cmp(&a.amount).then(a.category.cmp(&b.category)));
    rows
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum TrendKey {
    Day(NaiveDate),
    Month(i32, u32),
}

impl TrendKey {
    fn label(&self) -> String {
        match self {
            TrendKey::Day(date) => date.format("%Y-%m-%d").to_string(),
            TrendKey::Month(year, month) => format!("{}-{}", month, year),
        }
    }
}

/// Chronologically ordered totals for one transaction type.
pub fn trend(
    transactions: &[Transaction],
    transaction_type: TransactionType,
    granularity: TrendGranularity,
) -> Vec<TrendPoint> {
    let mut buckets: BTreeMap<TrendKey, Decimal> = BTreeMap::new();
    for transaction in transactions
        .iter()
        .filter(|t| t.transaction_type == transaction_type)
    {
        let key = match granularity {
            TrendGranularity::Day => TrendKey::Day(transaction.date),
            TrendGranularity::Month => {
                TrendKey::Month(transaction.date.year(), transaction.date.month())
            }
        };
        *buckets.entry(key).or_default() += transaction.amount;
    }

    buckets
        .into_iter()
        .map(|(key, amount)| TrendPoint {
            period: key.label(),
            amount,
        })
        .collect()
}

/// Budget utilization. Budgets of the same category across several months
/// are merged; `spent` counts every transaction of the category regardless
/// of its type.
pub fn budget_usage(budgets: &[Budget], transactions: &[Transaction]) -> BudgetsSection {
    let mut budgeted: Vec<(Category, Decimal)> = Vec::new();
    for budget in budgets {
        match budgeted.iter_mut().find(|(c, _)| *c == budget.category) {
            Some((_, amount)) => *amount += budget.amount,
            None => budgeted.push((budget.category, budget.amount)),
        }
    }

    let spent_in = |category: Category| -> Decimal {
        transactions
            .iter()
            .filter(|t| t.category == category)
            .map(|t| t.amount)
            .sum()
    };

    let by_category: Vec<BudgetUsage> = budgeted
        .iter()
        .map(|&(category, budgeted)| {
            let spent = spent_in(category);
            BudgetUsage {
                category,
                budgeted,
                spent,
                percentage_used: percentage(spent, budgeted),
            }
        })
        .collect();

    let overall_budgeted: Decimal = by_category.iter().map(|b| b.budgeted).sum();
    let overall_spent: Decimal = by_category.iter().map(|b| b.spent).sum();

    BudgetsSection {
        by_category,
        overall_usage: OverallBudgetUsage {
            budgeted: overall_budgeted,
            spent: overall_spent,
            percentage_used: percentage(overall_spent, overall_budgeted),
        },
    }
}

/// Amount contributed to a goal by its linked transactions.
pub fn saved_towards_goal(linked: &[Transaction]) -> Decimal {
    linked
        .iter()
        .filter(|t| {
            t.category == Category::SavingsInvestments
                && t.transaction_type == TransactionType::Expense
        })
        .map(|t| t.amount)
        .sum()
}

pub fn goal_status(
    saved: Decimal,
    target: Decimal,
    due_date: Option<NaiveDate>,
    today: NaiveDate,
) -> GoalStatus {
    if saved >= target {
        GoalStatus::Completed
    } else if due_date.is_some_and(|due| due < today) {
        GoalStatus::Overdue
    } else {
        GoalStatus::InProgress
    }
}

pub fn goal_progress(goal: &SavingsGoal, saved: Decimal, today: NaiveDate) -> GoalProgress {
    GoalProgress {
        name: goal.name.clone(),
        target_amount: goal.target_amount,
        saved_amount: saved,
        percentage: percentage(saved, goal.target_amount),
        due_date: goal.due_date,
        status: goal_status(saved, goal.target_amount, goal.due_date, today),
    }
}

/// Expense totals per category, largest first. Equal totals keep the order
/// in which their category first appears.
pub fn expense_totals(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for transaction in transactions
        .iter()
        .filter(|t| t.transaction_type == TransactionType::Expense)
    {
        match totals.iter_mut().find(|c| c.category == transaction.category) {
            Some(entry) => entry.total += transaction.amount,
            None => totals.push(CategoryTotal {
                category: transaction.category,
                total: transaction.amount,
            }),
        }
    }
    // sort_by is stable
    totals.sort_by(|a, b| b.total.cmp(&a.total));
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tx(transaction_type: TransactionType, category: Category, amount: Decimal, on: NaiveDate) -> Transaction {
        let stamp = NaiveDateTime::default();
        Transaction {
            id: format!("{}-{}-{}", category, amount, on),
            user_id: "u".to_string(),
            transaction_type,
            category,
            amount,
            date: on,
            description: None,
            recurring: false,
            recurring_interval: None,
            savings_goal_id: None,
            created_at: stamp,
            updated_at: stamp,
        }
    }

    #[test]
    fn percentage_is_zero_for_zero_total() {
        assert_eq!(percentage(dec!(50), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(percentage(dec!(1), dec!(3)), dec!(33.33));
        assert_eq!(percentage(dec!(50), dec!(200)), dec!(25));
    }

    #[test]
    fn by_category_orders_by_amount() {
        let txs = vec![
            tx(TransactionType::Expense, Category::Food, dec!(30), date(2025, 1, 1)),
            tx(TransactionType::Expense, Category::Travel, dec!(70), date(2025, 1, 2)),
            tx(TransactionType::Expense, Category::Food, dec!(20), date(2025, 1, 3)),
            tx(TransactionType::Income, Category::Salary, dec!(900), date(2025, 1, 3)),
        ];
        let rows = by_category(&txs, TransactionType::Expense, dec!(120));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].category, Category::Travel);
        assert_eq!(rows[0].percentage, dec!(58.33));
        assert_eq!(rows[1].amount, dec!(50));
        assert_eq!(rows[1].percentage, dec!(41.67));
    }

    #[test]
    fn trend_is_chronological() {
        let txs = vec![
            tx(TransactionType::Expense, Category::Food, dec!(5), date(2025, 11, 4)),
            tx(TransactionType::Expense, Category::Food, dec!(7), date(2025, 2, 9)),
            tx(TransactionType::Expense, Category::Travel, dec!(3), date(2025, 11, 20)),
        ];
        let points = trend(&txs, TransactionType::Expense, TrendGranularity::Month);
        let labels: Vec<&str> = points.iter().map(|p| p.period.as_str()).collect();
        assert_eq!(labels, vec!["2-2025", "11-2025"]);
        assert_eq!(points[1].amount, dec!(8));

        let daily = trend(&txs, TransactionType::Expense, TrendGranularity::Day);
        let labels: Vec<&str> = daily.iter().map(|p| p.period.as_str()).collect();
        assert_eq!(labels, vec!["2025-02-09", "2025-11-04", "2025-11-20"]);
    }

    #[test]
    fn budget_spent_counts_any_type() {
        let budgets = vec![Budget {
            id: "b1".to_string(),
            user_id: "u".to_string(),
            category: Category::OtherExpense,
            month: 1,
            year: 2025,
            amount: dec!(100),
        }];
        let txs = vec![
            tx(TransactionType::Expense, Category::OtherExpense, dec!(40), date(2025, 1, 1)),
            // Mismatched type still counts towards the category.
            tx(TransactionType::Income, Category::OtherExpense, dec!(10), date(2025, 1, 2)),
            tx(TransactionType::Expense, Category::Food, dec!(99), date(2025, 1, 2)),
        ];
        let section = budget_usage(&budgets, &txs);
        assert_eq!(section.by_category[0].spent, dec!(50));
        assert_eq!(section.by_category[0].percentage_used, dec!(50));
        assert_eq!(section.overall_usage.spent, dec!(50));
        assert_eq!(section.overall_usage.budgeted, dec!(100));
    }

    #[test]
    fn zero_budget_has_zero_usage() {
        let budgets = vec![Budget {
            id: "b1".to_string(),
            user_id: "u".to_string(),
            category: Category::Food,
            month: 1,
            year: 2025,
            amount: Decimal::ZERO,
        }];
        let txs = vec![tx(TransactionType::Expense, Category::Food, dec!(12), date(2025, 1, 1))];
        let section = budget_usage(&budgets, &txs);
        assert_eq!(section.by_category[0].percentage_used, Decimal::ZERO);
        assert_eq!(section.overall_usage.percentage_used, Decimal::ZERO);
    }

    #[test]
    fn goal_status_rules() {
        let today = date(2025, 6, 1);
        assert_eq!(
            goal_status(dec!(100), dec!(100), Some(date(2020, 1, 1)), today),
            GoalStatus::Completed
        );
        assert_eq!(
            goal_status(dec!(10), dec!(100), Some(date(2025, 5, 31)), today),
            GoalStatus::Overdue
        );
        assert_eq!(
            goal_status(dec!(10), dec!(100), Some(today), today),
            GoalStatus::InProgress
        );
        assert_eq!(goal_status(dec!(10), dec!(100), None, today), GoalStatus::InProgress);
    }

    #[test]
    fn expense_totals_ties_keep_first_appearance() {
        let txs = vec![
            tx(TransactionType::Expense, Category::Travel, dec!(10), date(2025, 1, 1)),
            tx(TransactionType::Expense, Category::Food, dec!(10), date(2025, 1, 2)),
            tx(TransactionType::Income, Category::Salary, dec!(500), date(2025, 1, 2)),
            tx(TransactionType::Expense, Category::Housing, dec!(25), date(2025, 1, 3)),
        ];
        let totals = expense_totals(&txs);
        let categories: Vec<Category> = totals.iter().map(|t| t.category).collect();
        assert_eq!(
            categories,
            vec![Category::Housing, Category::Travel, Category::Food]
        );
    }
}
