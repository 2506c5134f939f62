//! Export of ledger data.
//!
//! CSV rows carry `Title, Amount, Category, Date`. Pie-chart slices give each
//! category's share of the total; drawing the chart or a PDF is up to the
//! caller.

use crate::{core::aggregation, entities::expense, errors::Result};
use serde::Serialize;
use std::io;

/// One row of the CSV export.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "Title")]
    title: &'a str,
    #[serde(rename = "Amount")]
    amount: String,
    #[serde(rename = "Category")]
    category: &'a str,
    #[serde(rename = "Date")]
    date: String,
}

/// Writes expenses as CSV, in the order given, with a header row.
pub fn write_expenses_csv<W: io::Write>(expenses: &[expense::Model], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    if expenses.is_empty() {
        // serialize() only emits headers alongside the first record
        csv_writer.write_record(["Title", "Amount", "Category", "Date"])?;
    }

    for expense in expenses {
        csv_writer.serialize(CsvRow {
            title: &expense.title,
            amount: format!("{:.2}", expense.amount),
            category: &expense.category,
            date: expense.created_at.format("%Y-%m-%d").to_string(),
        })?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Renders the CSV export into a `String`.
pub fn expenses_to_csv_string(expenses: &[expense::Model]) -> Result<String> {
    let mut buffer = Vec::new();
    write_expenses_csv(expenses, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// A category's slice of the pie chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    /// Category label
    pub category: String,
    /// Total spent in the category
    pub total: f64,
    /// Share of the overall total in percent, `0.0` when the total is zero
    pub share_percent: f64,
}

/// Category slices in breakdown order.
#[must_use]
pub fn category_pie_slices(expenses: &[expense::Model]) -> Vec<PieSlice> {
    let total = aggregation::total_amount(expenses);

    aggregation::category_breakdown(expenses)
        .into_iter()
        .map(|c| PieSlice {
            share_percent: if total > 0.0 {
                c.total / total * 100.0
            } else {
                0.0
            },
            category: c.category,
            total: c.total,
        })
        .collect()
}
