//! Ledger business logic - Handles all expense record operations.
//!
//! This module is the store boundary the reporting core reads from. It creates,
//! edits and deletes expenses on behalf of an owner and materialises ledger
//! slices (by owner, wallet, category or time range) as plain vectors, so
//! the aggregation, budget and insight code never holds a live query.
//!
//! Every lookup by ID is scoped to the caller: an expense that exists but
//! belongs to someone else is reported as [`Error::ExpenseNotFound`].

use crate::{
    entities::{Expense, expense},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{debug, info};

/// Category used when an expense is recorded without one.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Categories offered to users when recording an expense.
///
/// These are suggestions only, any non-empty text is a valid category.
pub const DEFAULT_CATEGORIES: [&str; 7] = [
    "Food",
    "Transport",
    "Shopping",
    "Bills",
    "Health",
    "Entertainment",
    "Other",
];

/// Input for [`create_expense`].
#[derive(Debug, Clone)]
pub struct NewExpense {
    /// User recording the expense
    pub owner_id: String,
    /// Short description, must not be blank
    pub title: String,
    /// Amount spent, finite and non-negative
    pub amount: f64,
    /// Category; blank or `None` becomes [`UNCATEGORIZED`]
    pub category: Option<String>,
    /// Wallet to log the expense into; the owner must be a member
    pub wallet_id: Option<i64>,
    /// Backdated creation time, defaults to now
    pub created_at: Option<DateTime<Utc>>,
}

/// Partial edit applied by [`update_expense`]. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ExpenseUpdate {
    /// New title
    pub title: Option<String>,
    /// New amount
    pub amount: Option<f64>,
    /// New category; blank becomes [`UNCATEGORIZED`]
    pub category: Option<String>,
    /// New creation time
    pub created_at: Option<DateTime<Utc>>,
}

fn validate_title(title: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput {
            message: "Expense title cannot be empty".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

fn validate_amount(amount: f64) -> Result<f64> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(amount)
}

/// Trims a category and falls back to [`UNCATEGORIZED`] when blank.
#[must_use]
pub fn normalize_category(category: Option<&str>) -> String {
    match category.map(str::trim) {
        Some(c) if !c.is_empty() => c.to_string(),
        _ => UNCATEGORIZED.to_string(),
    }
}

/// Categories to offer when recording an expense.
///
/// The defaults come first in their fixed order, followed by any other
/// categories the ledger already uses, sorted by name.
#[must_use]
pub fn category_suggestions(expenses: &[expense::Model]) -> Vec<String> {
    let used: BTreeSet<&str> = expenses
        .iter()
        .map(|e| e.category.as_str())
        .filter(|c| !DEFAULT_CATEGORIES.contains(c))
        .collect();

    DEFAULT_CATEGORIES
        .iter()
        .copied()
        .chain(used)
        .map(str::to_string)
        .collect()
}

/// Records a new expense after validating it.
///
/// When a wallet is referenced the owner must be one of its members,
/// otherwise the wallet is reported as not found.
pub async fn create_expense(db: &DatabaseConnection, new: NewExpense) -> Result<expense::Model> {
    let title = validate_title(&new.title)?;
    let amount = validate_amount(new.amount)?;
    let category = normalize_category(new.category.as_deref());

    if let Some(wallet_id) = new.wallet_id {
        if !crate::core::wallet::is_member(db, wallet_id, &new.owner_id).await? {
            return Err(Error::WalletNotFound { id: wallet_id });
        }
    }

    let model = expense::ActiveModel {
        owner_id: Set(new.owner_id),
        wallet_id: Set(new.wallet_id),
        title: Set(title),
        amount: Set(amount),
        category: Set(category),
        created_at: Set(new.created_at.unwrap_or_else(Utc::now)),
        ..Default::default()
    };

    let created = model.insert(db).await?;
    debug!(
        expense_id = created.id,
        owner = %created.owner_id,
        "Recorded expense"
    );
    Ok(created)
}

/// Fetches an expense if it exists and belongs to `owner_id`.
pub async fn get_expense_for_owner(
    db: &DatabaseConnection,
    owner_id: &str,
    expense_id: i64,
) -> Result<expense::Model> {
    Expense::find_by_id(expense_id)
        .filter(expense::Column::OwnerId.eq(owner_id))
        .one(db)
        .await?
        .ok_or(Error::ExpenseNotFound { id: expense_id })
}

/// Applies a partial edit to one of the owner's expenses.
pub async fn update_expense(
    db: &DatabaseConnection,
    owner_id: &str,
    expense_id: i64,
    update: ExpenseUpdate,
) -> Result<expense::Model> {
    // Validate before touching the store
    let title = update.title.as_deref().map(validate_title).transpose()?;
    let amount = update.amount.map(validate_amount).transpose()?;

    let existing = get_expense_for_owner(db, owner_id, expense_id).await?;
    let mut active: expense::ActiveModel = existing.into();

    if let Some(title) = title {
        active.title = Set(title);
    }
    if let Some(amount) = amount {
        active.amount = Set(amount);
    }
    if let Some(category) = update.category {
        active.category = Set(normalize_category(Some(&category)));
    }
    if let Some(created_at) = update.created_at {
        active.created_at = Set(created_at);
    }

    let updated = active.update(db).await?;
    info!(expense_id, owner = owner_id, "Expense updated");
    Ok(updated)
}

/// Deletes one of the owner's expenses.
pub async fn delete_expense(db: &DatabaseConnection, owner_id: &str, expense_id: i64) -> Result<()> {
    let existing = get_expense_for_owner(db, owner_id, expense_id).await?;
    existing.delete(db).await?;
    info!(expense_id, owner = owner_id, "Expense deleted");
    Ok(())
}

/// All expenses recorded by `owner_id`, newest first.
///
/// Wallet expenses the owner logged are included.
pub async fn list_expenses_for_owner(
    db: &DatabaseConnection,
    owner_id: &str,
) -> Result<Vec<expense::Model>> {
    Expense::find()
        .filter(expense::Column::OwnerId.eq(owner_id))
        .order_by_desc(expense::Column::CreatedAt)
        .order_by_desc(expense::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// All expenses logged into a wallet by any member, newest first.
pub async fn list_expenses_for_wallet(
    db: &DatabaseConnection,
    wallet_id: i64,
) -> Result<Vec<expense::Model>> {
    Expense::find()
        .filter(expense::Column::WalletId.eq(wallet_id))
        .order_by_desc(expense::Column::CreatedAt)
        .order_by_desc(expense::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// The owner's expenses created in the half-open range `[start, end)`.
pub async fn list_expenses_in_range(
    db: &DatabaseConnection,
    owner_id: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<expense::Model>> {
    Expense::find()
        .filter(expense::Column::OwnerId.eq(owner_id))
        .filter(expense::Column::CreatedAt.gte(start))
        .filter(expense::Column::CreatedAt.lt(end))
        .order_by_asc(expense::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// The owner's expenses in one category (exact, case-sensitive match).
pub async fn list_expenses_by_category(
    db: &DatabaseConnection,
    owner_id: &str,
    category: &str,
) -> Result<Vec<expense::Model>> {
    Expense::find()
        .filter(expense::Column::OwnerId.eq(owner_id))
        .filter(expense::Column::Category.eq(category))
        .order_by_desc(expense::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use chrono::NaiveDate;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_create_expense_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        // Blank title
        let result = create_expense(&db, new_expense("alice", "   ", 10.0, "Food")).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidInput { message: _ }
        ));

        // Negative amount
        let result = create_expense(&db, new_expense("alice", "Lunch", -5.0, "Food")).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidAmount { amount: -5.0 }
        ));

        // NaN amount
        let result = create_expense(&db, new_expense("alice", "Lunch", f64::NAN, "Food")).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidAmount { amount: _ }
        ));

        // Infinite amount
        let result =
            create_expense(&db, new_expense("alice", "Lunch", f64::INFINITY, "Food")).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidAmount { amount: _ }
        ));

        Ok(())
    }

    #[test]
    fn test_normalize_category() {
        assert_eq!(normalize_category(None), "Uncategorized");
        assert_eq!(normalize_category(Some("  ")), "Uncategorized");
        assert_eq!(normalize_category(Some(" Food ")), "Food");
    }

    #[tokio::test]
    async fn test_create_expense_integration() -> Result<()> {
        let db = setup_test_db().await?;

        let created = create_expense(
            &db,
            NewExpense {
                owner_id: "alice".to_string(),
                title: "  Groceries ".to_string(),
                amount: 42.5,
                category: None,
                wallet_id: None,
                created_at: None,
            },
        )
        .await?;

        assert_eq!(created.title, "Groceries");
        assert_eq!(created.amount, 42.5);
        assert_eq!(created.category, "Uncategorized");
        assert!(created.wallet_id.is_none());

        let fetched = get_expense_for_owner(&db, "alice", created.id).await?;
        assert_eq!(fetched, created);

        Ok(())
    }

    #[tokio::test]
    async fn test_zero_amount_is_allowed() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_expense(&db, new_expense("alice", "Free sample", 0.0, "Food")).await?;
        assert_eq!(created.amount, 0.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_get_expense_for_other_owner_is_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_test_expense(&db, "alice", 10.0, "Food").await?;

        let result = get_expense_for_owner(&db, "bob", created.id).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::ExpenseNotFound { id } if id == created.id
        ));

        let result = get_expense_for_owner(&db, "alice", 9999).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::ExpenseNotFound { id: 9999 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_expense() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_test_expense(&db, "alice", 10.0, "Food").await?;

        let updated = update_expense(
            &db,
            "alice",
            created.id,
            ExpenseUpdate {
                amount: Some(25.0),
                category: Some("Transport".to_string()),
                ..Default::default()
            },
        )
        .await?;

        assert_eq!(updated.amount, 25.0);
        assert_eq!(updated.category, "Transport");
        assert_eq!(updated.title, created.title);
        assert_eq!(updated.created_at, created.created_at);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_expense_rejects_invalid_and_foreign() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_test_expense(&db, "alice", 10.0, "Food").await?;

        let result = update_expense(
            &db,
            "alice",
            created.id,
            ExpenseUpdate {
                amount: Some(f64::NAN),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));

        let result = update_expense(&db, "bob", created.id, ExpenseUpdate::default()).await;
        assert!(matches!(result.unwrap_err(), Error::ExpenseNotFound { .. }));

        // Untouched
        let fetched = get_expense_for_owner(&db, "alice", created.id).await?;
        assert_eq!(fetched.amount, 10.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_expense() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_test_expense(&db, "alice", 10.0, "Food").await?;

        // Someone else cannot delete it
        let result = delete_expense(&db, "bob", created.id).await;
        assert!(matches!(result.unwrap_err(), Error::ExpenseNotFound { .. }));

        delete_expense(&db, "alice", created.id).await?;
        assert!(list_expenses_for_owner(&db, "alice").await?.is_empty());

        // Second delete reports not found
        let result = delete_expense(&db, "alice", created.id).await;
        assert!(matches!(result.unwrap_err(), Error::ExpenseNotFound { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_list_expenses_for_owner_newest_first() -> Result<()> {
        let db = setup_test_db().await?;
        create_dated_expense(&db, "alice", "Old", 1.0, "Food", date(2024, 1, 1)).await?;
        create_dated_expense(&db, "alice", "New", 2.0, "Food", date(2024, 6, 1)).await?;
        create_dated_expense(&db, "bob", "Other", 3.0, "Food", date(2024, 3, 1)).await?;

        let titles: Vec<String> = list_expenses_for_owner(&db, "alice")
            .await?
            .into_iter()
            .map(|e| e.title)
            .collect();
        assert_eq!(titles, vec!["New", "Old"]);

        Ok(())
    }

    #[tokio::test]
    async fn test_list_expenses_in_range_is_half_open() -> Result<()> {
        let db = setup_test_db().await?;
        create_dated_expense(&db, "alice", "Before", 1.0, "Food", date(2024, 2, 29)).await?;
        create_dated_expense(&db, "alice", "Start", 2.0, "Food", date(2024, 3, 1)).await?;
        create_dated_expense(&db, "alice", "End", 3.0, "Food", date(2024, 4, 1)).await?;

        let start = at_noon(date(2024, 3, 1));
        let end = at_noon(date(2024, 4, 1));
        let titles: Vec<String> = list_expenses_in_range(&db, "alice", start, end)
            .await?
            .into_iter()
            .map(|e| e.title)
            .collect();
        assert_eq!(titles, vec!["Start"]);

        Ok(())
    }

    #[tokio::test]
    async fn test_list_expenses_by_category_is_case_sensitive() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_expense(&db, "alice", 10.0, "Food").await?;
        create_test_expense(&db, "alice", 20.0, "food").await?;
        create_test_expense(&db, "bob", 30.0, "Food").await?;

        let food = list_expenses_by_category(&db, "alice", "Food").await?;
        assert_eq!(food.len(), 1);
        assert_eq!(food[0].amount, 10.0);

        Ok(())
    }

    #[test]
    fn test_category_suggestions() {
        assert_eq!(category_suggestions(&[]), DEFAULT_CATEGORIES.to_vec());

        let ledger = vec![
            sample_expense(1, "alice", "Travel", 50.0),
            sample_expense(2, "alice", "Food", 10.0),
            sample_expense(3, "alice", "Books", 5.0),
            sample_expense(4, "alice", "Travel", 20.0),
        ];
        let suggestions = category_suggestions(&ledger);

        assert_eq!(suggestions.len(), DEFAULT_CATEGORIES.len() + 2);
        assert_eq!(&suggestions[..DEFAULT_CATEGORIES.len()], &DEFAULT_CATEGORIES[..]);
        assert_eq!(&suggestions[DEFAULT_CATEGORIES.len()..], &["Books", "Travel"]);
    }
}
