//! Shared test utilities for `Spendora`.
//!
//! This module provides helpers for setting up in-memory databases and for
//! building expense and budget records with sensible defaults.

use crate::{
    core::ledger::{self, NewExpense},
    entities::{budget, expense},
    errors::Result,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Noon UTC on the given day, so the calendar date is unambiguous.
pub fn at_noon(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN + chrono::Duration::hours(12))
        .and_utc()
}

/// Builds an in-memory personal expense created at noon on `date`.
///
/// # Defaults
/// * `title`: "Test expense"
/// * `wallet_id`: None
pub fn expense_on(
    id: i64,
    owner_id: &str,
    category: &str,
    amount: f64,
    date: NaiveDate,
) -> expense::Model {
    expense::Model {
        id,
        owner_id: owner_id.to_string(),
        wallet_id: None,
        title: "Test expense".to_string(),
        amount,
        category: category.to_string(),
        created_at: at_noon(date),
    }
}

/// Builds an in-memory expense on 15 January 2024, for tests where the date
/// does not matter.
pub fn sample_expense(id: i64, owner_id: &str, category: &str, amount: f64) -> expense::Model {
    let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap_or_default();
    expense_on(id, owner_id, category, amount, date)
}

/// Builds an in-memory expense logged into a wallet.
pub fn wallet_expense(id: i64, owner_id: &str, wallet_id: i64, amount: f64) -> expense::Model {
    expense::Model {
        wallet_id: Some(wallet_id),
        ..sample_expense(id, owner_id, "Shared", amount)
    }
}

/// Builds an in-memory budget with the default icon.
pub fn test_budget(id: i64, owner_id: &str, category: &str, limit: f64) -> budget::Model {
    budget::Model {
        id,
        owner_id: owner_id.to_string(),
        category: category.to_string(),
        limit_amount: limit,
        icon: crate::core::budget::DEFAULT_BUDGET_ICON.to_string(),
    }
}

/// Input for a personal expense created now.
pub fn new_expense(owner_id: &str, title: &str, amount: f64, category: &str) -> NewExpense {
    NewExpense {
        owner_id: owner_id.to_string(),
        title: title.to_string(),
        amount,
        category: Some(category.to_string()),
        wallet_id: None,
        created_at: None,
    }
}

/// Stores a personal expense titled "Test expense", created now.
pub async fn create_test_expense(
    db: &DatabaseConnection,
    owner_id: &str,
    amount: f64,
    category: &str,
) -> Result<expense::Model> {
    ledger::create_expense(db, new_expense(owner_id, "Test expense", amount, category)).await
}

/// Stores a personal expense backdated to noon on `date`.
pub async fn create_dated_expense(
    db: &DatabaseConnection,
    owner_id: &str,
    title: &str,
    amount: f64,
    category: &str,
    date: NaiveDate,
) -> Result<expense::Model> {
    ledger::create_expense(
        db,
        NewExpense {
            created_at: Some(at_noon(date)),
            ..new_expense(owner_id, title, amount, category)
        },
    )
    .await
}
