//! Aggregation engine - summary statistics over a slice of expenses.
//!
//! Every function in this module except [`generate_dashboard`] is pure: it
//! takes an already-loaded ledger and returns owned result structures. Empty
//! ledgers are a normal state, so averages and maxima fall back to `0.0`
//! instead of failing.
//!
//! Category ordering is total: descending by amount, then ascending by
//! category name when two categories spent the same.

use crate::{config::settings::Settings, entities::expense, errors::Result};
use chrono::{Datelike, Months, NaiveDate};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Total spent in one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    /// Category label
    pub category: String,
    /// Sum of all amounts in the category
    pub total: f64,
}

/// Total spent in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotal {
    /// First day of the month
    pub month: NaiveDate,
    /// Display label such as `"Mar 2024"`
    pub label: String,
    /// Sum of amounts created in that month, `0.0` when there were none
    pub total: f64,
}

/// Sum of all amounts; `0.0` for an empty ledger.
#[must_use]
pub fn total_amount(expenses: &[expense::Model]) -> f64 {
    expenses.iter().map(|e| e.amount).sum()
}

/// Mean amount, defined as `0.0` for an empty ledger.
#[must_use]
pub fn average_amount(expenses: &[expense::Model]) -> f64 {
    if expenses.is_empty() {
        return 0.0;
    }

    // Ledger sizes are far below 2^52, precision loss is not a concern.
    #[allow(clippy::cast_precision_loss)]
    let count = expenses.len() as f64;
    total_amount(expenses) / count
}

/// Largest single amount; `0.0` for an empty ledger.
#[must_use]
pub fn max_amount(expenses: &[expense::Model]) -> f64 {
    expenses
        .iter()
        .map(|e| e.amount)
        .reduce(f64::max)
        .unwrap_or(0.0)
}

/// Number of distinct categories used in the ledger.
#[must_use]
pub fn distinct_category_count(expenses: &[expense::Model]) -> usize {
    expenses
        .iter()
        .map(|e| e.category.as_str())
        .collect::<BTreeSet<_>>()
        .len()
}

/// Groups expenses by category and sums each group.
///
/// Ordered by descending total, ties broken by category name ascending.
#[must_use]
pub fn category_breakdown(expenses: &[expense::Model]) -> Vec<CategoryTotal> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for expense in expenses {
        *totals.entry(expense.category.as_str()).or_insert(0.0) += expense.amount;
    }

    let mut breakdown: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_string(),
            total,
        })
        .collect();

    breakdown.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| a.category.cmp(&b.category))
    });
    breakdown
}

/// The first `n` entries of [`category_breakdown`].
#[must_use]
pub fn top_categories(expenses: &[expense::Model], n: usize) -> Vec<CategoryTotal> {
    let mut breakdown = category_breakdown(expenses);
    breakdown.truncate(n);
    breakdown
}

/// First day of the calendar month containing `date`.
fn first_of_month(date: NaiveDate) -> NaiveDate {
    // Day 1 exists in every month.
    date.with_day(1).unwrap_or(date)
}

/// Builds a window of `month_count` consecutive calendar months ending with
/// the month of `reference` and sums the expenses created in each.
///
/// Months are calendar aligned, not rolling 30-day windows. Expenses outside
/// the window are ignored. The result is in chronological order.
#[must_use]
pub fn monthly_totals(
    expenses: &[expense::Model],
    reference: NaiveDate,
    month_count: u32,
) -> Vec<MonthlyTotal> {
    let last_month = first_of_month(reference);

    let mut window: Vec<MonthlyTotal> = (0..month_count)
        .rev()
        .filter_map(|back| last_month.checked_sub_months(Months::new(back)))
        .map(|month| MonthlyTotal {
            month,
            label: month.format("%b %Y").to_string(),
            total: 0.0,
        })
        .collect();

    for expense in expenses {
        let month = first_of_month(expense.created_at.date_naive());
        if let Some(slot) = window.iter_mut().find(|slot| slot.month == month) {
            slot.total += expense.amount;
        }
    }

    window
}

/// Sum of expenses created in the calendar month of `today`.
#[must_use]
pub fn current_month_total(expenses: &[expense::Model], today: NaiveDate) -> f64 {
    let month = first_of_month(today);
    expenses
        .iter()
        .filter(|e| first_of_month(e.created_at.date_naive()) == month)
        .map(|e| e.amount)
        .sum()
}

/// Per-member totals for a wallet.
///
/// Only expenses logged into `wallet_id` count. Every member appears in the
/// result, with `0.0` when they have not contributed. Expenses by users that
/// are not (or no longer) listed as members are left out of the mapping but
/// still count towards the wallet total.
#[must_use]
pub fn member_contribution(
    wallet_id: i64,
    members: &[String],
    expenses: &[expense::Model],
) -> BTreeMap<String, f64> {
    let mut contributions: BTreeMap<String, f64> =
        members.iter().map(|m| (m.clone(), 0.0)).collect();

    for expense in expenses.iter().filter(|e| e.wallet_id == Some(wallet_id)) {
        if let Some(total) = contributions.get_mut(&expense.owner_id) {
            *total += expense.amount;
        }
    }

    contributions
}

/// Knobs for [`build_dashboard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardOptions {
    /// How many of the newest expenses to include
    pub recent_limit: usize,
    /// Number of months in the trend series
    pub month_window: u32,
    /// How many categories to list as top spenders
    pub top_count: usize,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            recent_limit: 10,
            month_window: 6,
            top_count: 3,
        }
    }
}

impl From<&Settings> for DashboardOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            recent_limit: settings.recent_expense_limit,
            month_window: settings.month_window,
            top_count: settings.top_category_count,
        }
    }
}

/// Everything the dashboard and profile views show for one ledger.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    /// Sum of all amounts
    pub total: f64,
    /// Number of expenses
    pub item_count: usize,
    /// Number of distinct categories
    pub category_count: usize,
    /// Mean amount
    pub average: f64,
    /// Largest single amount
    pub max: f64,
    /// Spent in the current calendar month
    pub current_month_total: f64,
    /// Every category with its total
    pub breakdown: Vec<CategoryTotal>,
    /// The highest-spending categories
    pub top_categories: Vec<CategoryTotal>,
    /// Monthly trend ending with the current month
    pub monthly: Vec<MonthlyTotal>,
    /// Newest expenses first
    pub recent: Vec<expense::Model>,
}

/// Builds a [`DashboardSummary`] from an already-loaded ledger.
#[must_use]
pub fn build_dashboard(
    expenses: &[expense::Model],
    today: NaiveDate,
    options: DashboardOptions,
) -> DashboardSummary {
    let breakdown = category_breakdown(expenses);
    let top_categories = breakdown.iter().take(options.top_count).cloned().collect();

    let mut recent = expenses.to_vec();
    recent.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
    recent.truncate(options.recent_limit);

    DashboardSummary {
        total: total_amount(expenses),
        item_count: expenses.len(),
        category_count: breakdown.len(),
        average: average_amount(expenses),
        max: max_amount(expenses),
        current_month_total: current_month_total(expenses, today),
        breakdown,
        top_categories,
        monthly: monthly_totals(expenses, today, options.month_window),
        recent,
    }
}

/// Loads the owner's ledger and builds their dashboard.
pub async fn generate_dashboard(
    db: &DatabaseConnection,
    owner_id: &str,
    today: NaiveDate,
    options: DashboardOptions,
) -> Result<DashboardSummary> {
    let expenses = crate::core::ledger::list_expenses_for_owner(db, owner_id).await?;
    Ok(build_dashboard(&expenses, today, options))
}
