//! Monthly dashboard statistics.
//!
//! [`compute_monthly_stats`] is a pure function over a transaction snapshot: it
//! buckets transactions by calendar month relative to a reference date and
//! produces current-month totals, previous-month comparisons, the category
//! breakdown and budget figures. Amounts are normalized with `abs()` before
//! summing, so every monetary total is a non-negative magnitude except
//! `remaining_budget`, which goes negative on overspend.
//!
//! Money is summed as [`Decimal`], so the category breakdown adds up to
//! `total_spent` exactly. Percentages are derived ratios and are reported as
//! `f64`. Category names are grouped ignoring case, matching how categories
//! are looked up; each group keeps the first spelling seen.
//!
//! Undefined ratios (savings rate with no income, change against an empty
//! previous month, budget use against a zero budget) are reported as `0`.
//!
//! [`load_monthly_stats`] is the data-fetch shim: it reads both months and the
//! user's categories inside one database transaction and then runs the pure
//! computation.

use crate::{
    config::BudgetMode,
    core::{category, transaction},
    entities::{CategoryModel, TransactionKind, TransactionModel},
    errors::{Error, Result},
};
use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// Breakdown label for expenses stored without a category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Where the monthly budget ceiling comes from.
#[derive(Debug, Clone, Copy)]
pub enum BudgetBasis<'a> {
    /// A single scalar ceiling
    Global(Decimal),
    /// The sum of these categories' budgets; unset budgets count as zero
    PerCategory(&'a [CategoryModel]),
}

impl BudgetBasis<'_> {
    /// Resolves the basis to a single ceiling.
    #[must_use]
    pub fn resolve(&self) -> Decimal {
        match self {
            Self::Global(amount) => *amount,
            Self::PerCategory(categories) => categories.iter().filter_map(|c| c.budget).sum(),
        }
    }
}

/// Spending total for one category in the current month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    /// Category name as stored on the transactions
    pub category: String,
    /// Sum of expense magnitudes
    pub total: Decimal,
}

/// Aggregated figures for one month and its predecessor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStats {
    /// First day of the reference month
    pub month: NaiveDate,
    /// Current-month expense total
    pub total_spent: Decimal,
    /// Previous-month expense total
    pub previous_month_total: Decimal,
    /// Current-month transaction count (both kinds)
    pub transaction_count: u64,
    /// Previous-month transaction count (both kinds)
    pub previous_transaction_count: u64,
    /// Current-month income total
    pub total_income: Decimal,
    /// Monthly budget ceiling
    pub budget: Decimal,
    /// Current-month expenses per category, in first-seen order
    pub categories: Vec<CategoryTotal>,
    /// `budget - total_spent`; negative when overspent
    pub remaining_budget: Decimal,
    /// Share of income not spent, in percent
    pub savings_rate: f64,
    /// Change in spending against the previous month, in percent
    pub spending_change_percent: f64,
    /// Change in transaction count against the previous month, in percent
    pub transaction_change_percent: f64,
    /// Share of the budget already spent, in percent
    pub budget_used_percent: f64,
}

/// Budget versus spending for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUsage {
    /// Category name
    pub name: String,
    /// Display color, if the category has one
    pub color: Option<String>,
    /// Monthly budget (zero when unset or unknown)
    pub budget: Decimal,
    /// Current-month spending
    pub spent: Decimal,
    /// `budget - spent`
    pub remaining: Decimal,
    /// Share of the budget spent, in percent
    pub percent_used: f64,
}

/// Everything the dashboard needs for one user and month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyDashboard {
    /// Aggregated figures
    pub stats: MonthlyStats,
    /// Per-category budget use
    pub usage: Vec<CategoryUsage>,
}

/// First day of the date's month.
#[must_use]
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Last day of the date's month.
#[must_use]
pub fn month_end(date: NaiveDate) -> NaiveDate {
    month_start(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

/// First day of the month before the date's month.
///
/// January rolls back to December of the previous year.
#[must_use]
pub fn previous_month(date: NaiveDate) -> NaiveDate {
    let first = month_start(date);
    first.pred_opt().map_or(first, month_start)
}

/// Parses a `YYYY-MM` month into its first day.
pub fn parse_month(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", input.trim()), "%Y-%m-%d").map_err(|_| {
        Error::InvalidMonth {
            input: input.to_string(),
        }
    })
}

/// `numerator / denominator` in percent, or `0` when the denominator is zero.
fn ratio_percent(numerator: Decimal, denominator: Decimal) -> f64 {
    if denominator.is_zero() {
        return 0.0;
    }
    numerator
        .checked_div(denominator)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .and_then(|percent| percent.to_f64())
        .unwrap_or(0.0)
}

/// Relative change from `previous` to `current`, in percent.
///
/// Returns `0` when `previous` is zero.
#[must_use]
pub fn percent_change(current: Decimal, previous: Decimal) -> f64 {
    ratio_percent(current - previous, previous)
}

/// `part / whole` in percent, or `0` when `whole` is not positive.
fn percent_of(part: Decimal, whole: Decimal) -> f64 {
    if whole > Decimal::ZERO {
        ratio_percent(part, whole)
    } else {
        0.0
    }
}

/// Key under which category names are grouped and matched.
fn category_key(name: &str) -> String {
    name.to_lowercase()
}

fn month_key(date: NaiveDate) -> (i32, u32) {
    (date.year(), date.month())
}

/// Computes monthly statistics for the reference date's calendar month.
///
/// Transactions outside the current and previous month are ignored, so the
/// input may be the user's whole ledger or a pre-filtered range.
#[must_use]
pub fn compute_monthly_stats(
    transactions: &[TransactionModel],
    reference: NaiveDate,
    budget: BudgetBasis<'_>,
) -> MonthlyStats {
    let current = month_key(reference);
    let previous = month_key(previous_month(reference));

    let mut total_spent = Decimal::ZERO;
    let mut total_income = Decimal::ZERO;
    let mut previous_month_total = Decimal::ZERO;
    let mut transaction_count: u64 = 0;
    let mut previous_transaction_count: u64 = 0;

    let mut categories: Vec<CategoryTotal> = Vec::new();
    let mut category_index: HashMap<String, usize> = HashMap::new();

    for tx in transactions {
        let key = month_key(tx.date);
        let magnitude = tx.amount.abs();

        if key == current {
            transaction_count += 1;
            match tx.kind {
                TransactionKind::Expense => {
                    total_spent += magnitude;
                    let name = tx
                        .category
                        .as_deref()
                        .filter(|c| !c.is_empty())
                        .unwrap_or(UNCATEGORIZED);
                    let key = category_key(name);
                    if let Some(&i) = category_index.get(&key) {
                        categories[i].total += magnitude;
                    } else {
                        category_index.insert(key, categories.len());
                        categories.push(CategoryTotal {
                            category: name.to_string(),
                            total: magnitude,
                        });
                    }
                }
                TransactionKind::Income => total_income += magnitude,
            }
        } else if key == previous {
            previous_transaction_count += 1;
            if tx.kind == TransactionKind::Expense {
                previous_month_total += magnitude;
            }
        }
    }

    let budget = budget.resolve();
    let savings_rate = percent_of(total_income - total_spent, total_income);
    let transaction_change_percent = percent_change(
        Decimal::from(transaction_count),
        Decimal::from(previous_transaction_count),
    );

    MonthlyStats {
        month: month_start(reference),
        total_spent,
        previous_month_total,
        transaction_count,
        previous_transaction_count,
        total_income,
        budget,
        categories,
        remaining_budget: budget - total_spent,
        savings_rate,
        spending_change_percent: percent_change(total_spent, previous_month_total),
        transaction_change_percent,
        budget_used_percent: percent_of(total_spent, budget),
    }
}

/// Pairs each category's budget with its current-month spending.
///
/// Categories keep their stored order. Spending under names with no category
/// row (deleted or never created) follows with a zero budget. Names match
/// ignoring case.
#[must_use]
pub fn category_usage(stats: &MonthlyStats, categories: &[CategoryModel]) -> Vec<CategoryUsage> {
    let spent_for = |name: &str| -> Decimal {
        let key = category_key(name);
        stats
            .categories
            .iter()
            .filter(|t| category_key(&t.category) == key)
            .map(|t| t.total)
            .sum()
    };

    let mut usage: Vec<CategoryUsage> = categories
        .iter()
        .map(|c| {
            let budget = c.budget.unwrap_or(Decimal::ZERO);
            let spent = spent_for(&c.name);
            CategoryUsage {
                name: c.name.clone(),
                color: c.color.clone(),
                budget,
                spent,
                remaining: budget - spent,
                percent_used: percent_of(spent, budget),
            }
        })
        .collect();

    for total in &stats.categories {
        let key = category_key(&total.category);
        let known = categories.iter().any(|c| category_key(&c.name) == key);
        if !known {
            usage.push(CategoryUsage {
                name: total.category.clone(),
                color: None,
                budget: Decimal::ZERO,
                spent: total.total,
                remaining: -total.total,
                percent_used: 0.0,
            });
        }
    }

    usage
}

/// Loads a user's transactions and categories and computes the dashboard.
///
/// Both months and the categories are read inside one database transaction so
/// they observe the same snapshot.
pub async fn load_monthly_stats(
    db: &DatabaseConnection,
    user_id: i64,
    reference: NaiveDate,
    mode: BudgetMode,
) -> Result<MonthlyDashboard> {
    let start = previous_month(reference);
    let end = month_end(reference);

    let txn = db.begin().await?;
    let transactions = transaction::get_transactions_in_range(&txn, user_id, start, end).await?;
    let categories = category::get_categories_for_user(&txn, user_id).await?;
    txn.commit().await?;

    debug!(
        user_id,
        %start,
        %end,
        rows = transactions.len(),
        "Loaded transactions for monthly stats"
    );

    let basis = match mode {
        BudgetMode::Global { amount } => BudgetBasis::Global(amount),
        BudgetMode::PerCategory => BudgetBasis::PerCategory(&categories),
    };

    let stats = compute_monthly_stats(&transactions, reference, basis);
    let usage = category_usage(&stats, &categories);

    Ok(MonthlyDashboard { stats, usage })
}
