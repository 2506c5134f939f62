//! Insight generation - rule-based observations about a user's spending.
//!
//! Three rules run over the owner's full ledger:
//!
//! 1. **Weekly change**: spend in `[today - 7, today)` against
//!    `[today - 14, today - 7)`. Skipped when the earlier week is zero. A
//!    change of exactly zero is reported as "less".
//! 2. **Top category**: the all-time highest-spending category, using the
//!    same ordering as [`aggregation::category_breakdown`].
//! 3. **Large transaction**: the most recently recorded expense (highest ID,
//!    not latest date) when its amount is at least
//!    [`LARGE_TRANSACTION_THRESHOLD`].
//!
//! Generated messages are appended to the insight table. Nothing is
//! deduplicated unless the caller passes an idempotency key, in which case a
//! second run with the same key for the same owner writes nothing. Keys are
//! claimed through a uniquely indexed `insight_runs` marker row.

use crate::{
    core::{aggregation, report::format_currency},
    entities::{Insight, expense, insight, insight_run},
    errors::Result,
};
use chrono::{Days, NaiveDate, Utc};
use sea_orm::{QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait, prelude::*};
use serde::Serialize;
use tracing::{debug, info, instrument};

/// Amount at or above which the newest expense raises an alert.
pub const LARGE_TRANSACTION_THRESHOLD: f64 = 1000.0;

/// A generated observation, before it is persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InsightKind {
    /// Spend this week compared with the week before
    WeeklyChange {
        /// Spend in `[today - 7, today)`
        this_week: f64,
        /// Spend in `[today - 14, today - 7)`
        last_week: f64,
        /// Signed change relative to `last_week`
        change_percent: f64,
    },
    /// Highest-spending category of all time
    TopCategory {
        /// Category label
        category: String,
        /// All-time total in the category
        total: f64,
    },
    /// The newest expense crossed the alert threshold
    LargeTransaction {
        /// Amount of the newest expense
        amount: f64,
        /// Its category
        category: String,
    },
}

impl InsightKind {
    /// Stable identifier stored alongside the message.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::WeeklyChange { .. } => "weekly_change",
            Self::TopCategory { .. } => "top_category",
            Self::LargeTransaction { .. } => "large_transaction",
        }
    }

    /// Renders the message shown to the user.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::WeeklyChange { change_percent, .. } => {
                let direction = if *change_percent > 0.0 { "more" } else { "less" };
                format!(
                    "You spent {:.1}% {direction} this week.",
                    change_percent.abs()
                )
            }
            Self::TopCategory { category, total } => format!(
                "Highest spending category: {category} ({}).",
                format_currency(*total)
            ),
            Self::LargeTransaction { amount, category } => format!(
                "High transaction detected: {} on {category}.",
                format_currency(*amount)
            ),
        }
    }
}

/// Sum of expenses whose creation date falls in `[start, end)`.
fn spent_between(expenses: &[expense::Model], start: NaiveDate, end: NaiveDate) -> f64 {
    expenses
        .iter()
        .filter(|e| {
            let day = e.created_at.date_naive();
            day >= start && day < end
        })
        .map(|e| e.amount)
        .sum()
}

/// Week-over-week comparison; `None` when the earlier week had no spend.
#[must_use]
pub fn weekly_change(expenses: &[expense::Model], today: NaiveDate) -> Option<InsightKind> {
    let week_ago = today - Days::new(7);
    let two_weeks_ago = today - Days::new(14);

    let this_week = spent_between(expenses, week_ago, today);
    let last_week = spent_between(expenses, two_weeks_ago, week_ago);

    if last_week <= 0.0 {
        return None;
    }

    Some(InsightKind::WeeklyChange {
        this_week,
        last_week,
        change_percent: (this_week - last_week) / last_week * 100.0,
    })
}

/// The all-time top category; `None` for an empty ledger.
#[must_use]
pub fn top_category(expenses: &[expense::Model]) -> Option<InsightKind> {
    aggregation::top_categories(expenses, 1)
        .into_iter()
        .next()
        .map(|top| InsightKind::TopCategory {
            category: top.category,
            total: top.total,
        })
}

/// Alert for the most recently recorded expense, if it is large.
#[must_use]
pub fn large_transaction(expenses: &[expense::Model]) -> Option<InsightKind> {
    expenses
        .iter()
        .max_by_key(|e| e.id)
        .filter(|latest| latest.amount >= LARGE_TRANSACTION_THRESHOLD)
        .map(|latest| InsightKind::LargeTransaction {
            amount: latest.amount,
            category: latest.category.clone(),
        })
}

/// Runs every rule in order and returns the observations that apply (0 to 3).
#[must_use]
pub fn derive_insights(expenses: &[expense::Model], today: NaiveDate) -> Vec<InsightKind> {
    [
        weekly_change(expenses, today),
        top_category(expenses),
        large_transaction(expenses),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Key that limits generation to one run per owner per day.
#[must_use]
pub fn daily_idempotency_key(owner_id: &str, today: NaiveDate) -> String {
    format!("{owner_id}:{}", today.format("%Y-%m-%d"))
}

/// Whether insights were already written for `(owner_id, key)`.
pub async fn already_generated<C>(db: &C, owner_id: &str, key: &str) -> Result<bool>
where
    C: ConnectionTrait,
{
    let count = Insight::find()
        .filter(insight::Column::OwnerId.eq(owner_id))
        .filter(insight::Column::IdempotencyKey.eq(key))
        .count(db)
        .await?;
    Ok(count > 0)
}

/// Claims `(owner_id, key)` by inserting its run marker.
///
/// Returns `false` when the store already holds the marker, which the unique
/// index reports as a constraint violation.
pub async fn claim_run<C>(db: &C, owner_id: &str, key: &str) -> Result<bool>
where
    C: ConnectionTrait,
{
    let marker = insight_run::ActiveModel {
        owner_id: Set(owner_id.to_string()),
        idempotency_key: Set(key.to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    match marker.insert(db).await {
        Ok(_) => Ok(true),
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Generates insights for `owner_id` and appends them to the store.
///
/// Returns the rows written. With an `idempotency_key` that has already been
/// used for this owner, nothing is written and an empty vector is returned.
/// The key is claimed inside the write transaction, so overlapping runs with
/// the same key write at most one set of rows. Store failures are
/// propagated; there is no retry.
#[instrument(skip(db))]
pub async fn generate_insights(
    db: &DatabaseConnection,
    owner_id: &str,
    today: NaiveDate,
    idempotency_key: Option<&str>,
) -> Result<Vec<insight::Model>> {
    let expenses = crate::core::ledger::list_expenses_for_owner(db, owner_id).await?;
    let kinds = derive_insights(&expenses, today);
    debug!(count = kinds.len(), "Derived insights");

    if kinds.is_empty() {
        return Ok(Vec::new());
    }

    // Key claim and all rows of one run are written together
    let txn = db.begin().await?;

    if let Some(key) = idempotency_key {
        if already_generated(&txn, owner_id, key).await?
            || !claim_run(&txn, owner_id, key).await?
        {
            txn.rollback().await?;
            info!(key, "Insights already generated for this key, skipping");
            return Ok(Vec::new());
        }
    }

    let now = Utc::now();
    let mut written = Vec::with_capacity(kinds.len());

    for kind in &kinds {
        let row = insight::ActiveModel {
            owner_id: Set(owner_id.to_string()),
            kind: Set(kind.as_str().to_string()),
            message: Set(kind.message()),
            idempotency_key: Set(idempotency_key.map(str::to_string)),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        written.push(row);
    }

    txn.commit().await?;

    info!(count = written.len(), "Insights written");
    Ok(written)
}

/// The owner's insights, newest first, optionally limited.
pub async fn list_insights_for_owner(
    db: &DatabaseConnection,
    owner_id: &str,
    limit: Option<u64>,
) -> Result<Vec<insight::Model>> {
    let mut query = Insight::find()
        .filter(insight::Column::OwnerId.eq(owner_id))
        .order_by_desc(insight::Column::Id);

    if let Some(limit) = limit {
        query = query.limit(limit);
    }

    query.all(db).await.map_err(Into::into)
}
