//! Report formatting.
//!
//! Turns the structured results of the aggregation, budget and wallet modules
//! into plain text for the command line. Rendering HTML or PDF is left to the
//! callers.

use crate::{
    core::{aggregation::DashboardSummary, budget::BudgetStatus, wallet::WalletReport},
    entities::expense,
};
use std::fmt::Write;

/// Currency symbol used in every rendered amount.
pub const CURRENCY_SYMBOL: &str = "₹";

/// Formats an amount with the currency symbol and two decimals, e.g. `"₹150.00"`.
#[must_use]
pub fn format_currency(amount: f64) -> String {
    if amount < 0.0 {
        format!("-{CURRENCY_SYMBOL}{:.2}", amount.abs())
    } else {
        format!("{CURRENCY_SYMBOL}{amount:.2}")
    }
}

/// Generates a utilization bar such as `[████████░░] 80.0%`.
///
/// The bar is clamped to 0-100 while the printed percentage is not, so an
/// overspent budget shows a full bar with its real figure.
#[must_use]
pub fn format_progress_bar(percent: f64, bar_length: Option<usize>) -> String {
    let length = bar_length.unwrap_or(10);
    let clamped = percent.clamp(0.0, 100.0);

    // clamped ∈ [0, 100] and length is small, so the product fits in usize.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let filled = ((clamped / 100.0) * length as f64).round() as usize;
    let empty = length.saturating_sub(filled);

    format!("[{}{}] {percent:.1}%", "█".repeat(filled), "░".repeat(empty))
}

/// One line per expense: date, title, category and amount.
#[must_use]
pub fn format_expense_line(expense: &expense::Model) -> String {
    format!(
        "#{} {} | {} | {} | {}",
        expense.id,
        expense.created_at.format("%Y-%m-%d"),
        expense.title,
        expense.category,
        format_currency(expense.amount)
    )
}

/// One line per budget with its bar, spend and severity.
#[must_use]
pub fn format_budget_line(status: &BudgetStatus) -> String {
    let remaining = if status.remaining < 0.0 {
        format!("over by {}", format_currency(-status.remaining))
    } else {
        format!("{} left", format_currency(status.remaining))
    };

    format!(
        "{} {} {} of {} ({remaining}) [{}]",
        status.category,
        format_progress_bar(status.percent, None),
        format_currency(status.spent),
        format_currency(status.limit),
        status.severity
    )
}

/// Multi-line dashboard text.
#[must_use]
pub fn format_dashboard(summary: &DashboardSummary) -> String {
    let mut out = String::new();

    // write! to a String cannot fail
    let _ = writeln!(
        out,
        "Total spent: {} across {} expenses in {} categories",
        format_currency(summary.total),
        summary.item_count,
        summary.category_count
    );
    let _ = writeln!(
        out,
        "This month: {} | Average: {} | Largest: {}",
        format_currency(summary.current_month_total),
        format_currency(summary.average),
        format_currency(summary.max)
    );

    if !summary.top_categories.is_empty() {
        out.push_str("\nTop categories\n");
        for (rank, category) in summary.top_categories.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {}. {} {}",
                rank + 1,
                category.category,
                format_currency(category.total)
            );
        }
    }

    out.push_str("\nMonthly trend\n");
    for month in &summary.monthly {
        let _ = writeln!(out, "  {} {}", month.label, format_currency(month.total));
    }

    if !summary.recent.is_empty() {
        out.push_str("\nRecent expenses\n");
        for expense in &summary.recent {
            let _ = writeln!(out, "  {}", format_expense_line(expense));
        }
    }

    out
}

/// Multi-line wallet report text.
#[must_use]
pub fn format_wallet_report(report: &WalletReport) -> String {
    let mut out = format!(
        "Wallet {} (#{}) - {} members, total {}\n",
        report.wallet.name,
        report.wallet.id,
        report.members.len(),
        format_currency(report.total)
    );

    for member in &report.members {
        let contributed = report.contributions.get(member).copied().unwrap_or(0.0);
        let _ = writeln!(out, "  {member}: {}", format_currency(contributed));
    }

    if !report.breakdown.is_empty() {
        out.push_str("By category\n");
        for category in &report.breakdown {
            let _ = writeln!(
                out,
                "  {} {}",
                category.category,
                format_currency(category.total)
            );
        }
    }

    out
}
