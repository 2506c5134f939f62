//! Budget business logic - per-category limits and their utilization.
//!
//! Budgets are evaluated against the owner's all-time spend in the budget's
//! category. Duplicate budgets for the same category are evaluated as
//! independent limits and produce one row each.

use crate::{
    core::aggregation,
    entities::{Budget, budget, expense},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Serialize;
use std::fmt;
use tracing::{info, instrument};

/// Utilization at or above which a budget is in the warning tier.
pub const WARNING_THRESHOLD_PERCENT: f64 = 70.0;

/// Utilization at or above which a budget is in the danger tier.
pub const DANGER_THRESHOLD_PERCENT: f64 = 90.0;

/// Icon stored when none is chosen.
pub const DEFAULT_BUDGET_ICON: &str = "bi-wallet2";

/// How close a budget is to its limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetSeverity {
    /// Under 70% used
    Normal,
    /// Between 70% and 90% used
    Warning,
    /// 90% or more used
    Danger,
}

impl BudgetSeverity {
    /// Classifies an uncapped utilization percentage.
    #[must_use]
    pub fn from_percent(percent: f64) -> Self {
        if percent >= DANGER_THRESHOLD_PERCENT {
            Self::Danger
        } else if percent >= WARNING_THRESHOLD_PERCENT {
            Self::Warning
        } else {
            Self::Normal
        }
    }

    /// Lowercase name used in reports.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

impl fmt::Display for BudgetSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evaluation of one budget row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetStatus {
    /// ID of the evaluated budget
    pub budget_id: i64,
    /// Category the limit applies to
    pub category: String,
    /// Display icon
    pub icon: String,
    /// Configured limit
    pub limit: f64,
    /// All-time spend in the category
    pub spent: f64,
    /// Uncapped utilization, `0.0` for a zero limit
    pub percent: f64,
    /// Utilization capped at 100 for progress bars
    pub display_percent: f64,
    /// `limit - spent`; negative when over budget
    pub remaining: f64,
    /// Tier derived from the uncapped percentage
    pub severity: BudgetSeverity,
}

/// Calculates what share of `limit` has been spent, as a percentage.
///
/// Returns `0.0` for a non-positive limit instead of dividing by zero.
#[must_use]
pub fn utilization_percent(spent: f64, limit: f64) -> f64 {
    if limit <= 0.0 {
        return 0.0;
    }

    (spent / limit) * 100.0
}

/// Evaluates one budget against a ledger.
///
/// Only expenses whose category matches exactly (case-sensitive) count.
#[must_use]
pub fn evaluate_budget(budget: &budget::Model, expenses: &[expense::Model]) -> BudgetStatus {
    let spent: f64 = expenses
        .iter()
        .filter(|e| e.category == budget.category)
        .map(|e| e.amount)
        .sum();
    let percent = utilization_percent(spent, budget.limit_amount);

    BudgetStatus {
        budget_id: budget.id,
        category: budget.category.clone(),
        icon: budget.icon.clone(),
        limit: budget.limit_amount,
        spent,
        percent,
        display_percent: percent.min(100.0),
        remaining: budget.limit_amount - spent,
        severity: BudgetSeverity::from_percent(percent),
    }
}

/// Evaluates every budget, in the order given, against the same ledger.
#[must_use]
pub fn evaluate_budgets(budgets: &[budget::Model], expenses: &[expense::Model]) -> Vec<BudgetStatus> {
    budgets
        .iter()
        .map(|budget| evaluate_budget(budget, expenses))
        .collect()
}

/// Creates a budget for `owner_id`.
pub async fn create_budget(
    db: &DatabaseConnection,
    owner_id: &str,
    category: &str,
    limit: f64,
    icon: Option<String>,
) -> Result<budget::Model> {
    let category = category.trim();
    if category.is_empty() {
        return Err(Error::InvalidInput {
            message: "Budget category cannot be empty".to_string(),
        });
    }

    if !limit.is_finite() || limit < 0.0 {
        return Err(Error::InvalidAmount { amount: limit });
    }

    let icon = icon
        .filter(|i| !i.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BUDGET_ICON.to_string());

    let created = budget::ActiveModel {
        owner_id: Set(owner_id.to_string()),
        category: Set(category.to_string()),
        limit_amount: Set(limit),
        icon: Set(icon),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(budget_id = created.id, owner = owner_id, category, "Budget created");
    Ok(created)
}

/// The owner's budgets in creation order.
pub async fn list_budgets_for_owner(
    db: &DatabaseConnection,
    owner_id: &str,
) -> Result<Vec<budget::Model>> {
    Budget::find()
        .filter(budget::Column::OwnerId.eq(owner_id))
        .order_by_asc(budget::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Deletes one of the owner's budgets.
pub async fn delete_budget(db: &DatabaseConnection, owner_id: &str, budget_id: i64) -> Result<()> {
    let existing = Budget::find_by_id(budget_id)
        .filter(budget::Column::OwnerId.eq(owner_id))
        .one(db)
        .await?
        .ok_or(Error::BudgetNotFound { id: budget_id })?;

    existing.delete(db).await?;
    info!(budget_id, owner = owner_id, "Budget deleted");
    Ok(())
}

/// Loads the owner's budgets and ledger and evaluates every budget.
#[instrument(skip(db))]
pub async fn generate_budget_report(
    db: &DatabaseConnection,
    owner_id: &str,
) -> Result<Vec<BudgetStatus>> {
    let budgets = list_budgets_for_owner(db, owner_id).await?;
    if budgets.is_empty() {
        return Ok(Vec::new());
    }

    let expenses = crate::core::ledger::list_expenses_for_owner(db, owner_id).await?;
    Ok(evaluate_budgets(&budgets, &expenses))
}

/// Sum of every limit and every matching spend, for a headline figure.
#[must_use]
pub fn total_budgeted(statuses: &[BudgetStatus]) -> (f64, f64) {
    statuses
        .iter()
        .fold((0.0, 0.0), |(limit, spent), s| (limit + s.limit, spent + s.spent))
}

/// Categories that have spending but no budget, ordered by spend.
#[must_use]
pub fn unbudgeted_categories(
    budgets: &[budget::Model],
    expenses: &[expense::Model],
) -> Vec<aggregation::CategoryTotal> {
    aggregation::category_breakdown(expenses)
        .into_iter()
        .filter(|c| !budgets.iter().any(|b| b.category == c.category))
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn food_budget(limit: f64) -> budget::Model {
        test_budget(1, "alice", "Food", limit)
    }

    fn food_spend(amount: f64) -> Vec<expense::Model> {
        vec![sample_expense(1, "alice", "Food", amount)]
    }

    #[test]
    fn test_severity_tiers() {
        let danger = evaluate_budget(&food_budget(100.0), &food_spend(95.0));
        assert_eq!(danger.percent, 95.0);
        assert_eq!(danger.severity, BudgetSeverity::Danger);
        assert_eq!(danger.severity.as_str(), "danger");

        let warning = evaluate_budget(&food_budget(100.0), &food_spend(75.0));
        assert_eq!(warning.severity, BudgetSeverity::Warning);

        let normal = evaluate_budget(&food_budget(100.0), &food_spend(50.0));
        assert_eq!(normal.severity, BudgetSeverity::Normal);
        assert_eq!(normal.remaining, 50.0);
    }

    #[test]
    fn test_severity_boundaries() {
        assert_eq!(BudgetSeverity::from_percent(90.0), BudgetSeverity::Danger);
        assert_eq!(BudgetSeverity::from_percent(89.99), BudgetSeverity::Warning);
        assert_eq!(BudgetSeverity::from_percent(70.0), BudgetSeverity::Warning);
        assert_eq!(BudgetSeverity::from_percent(69.99), BudgetSeverity::Normal);
    }

    #[test]
    fn test_overspend_caps_display_but_not_remaining() {
        let status = evaluate_budget(&food_budget(100.0), &food_spend(150.0));
        assert_eq!(status.percent, 150.0);
        assert_eq!(status.display_percent, 100.0);
        assert_eq!(status.remaining, -50.0);
        assert_eq!(status.severity, BudgetSeverity::Danger);
    }

    #[test]
    fn test_zero_limit_never_divides() {
        let status = evaluate_budget(&food_budget(0.0), &food_spend(40.0));
        assert_eq!(status.percent, 0.0);
        assert_eq!(status.remaining, -40.0);
        assert_eq!(status.severity, BudgetSeverity::Normal);

        assert_eq!(utilization_percent(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_category_match_is_exact() {
        let ledger = vec![
            sample_expense(1, "alice", "Food", 10.0),
            sample_expense(2, "alice", "food", 20.0),
            sample_expense(3, "alice", "Food ", 30.0),
        ];
        let status = evaluate_budget(&food_budget(100.0), &ledger);
        assert_eq!(status.spent, 10.0);
    }

    #[test]
    fn test_duplicate_budgets_are_independent_rows() {
        let budgets = vec![
            test_budget(1, "alice", "Food", 100.0),
            test_budget(2, "alice", "Food", 200.0),
        ];
        let statuses = evaluate_budgets(&budgets, &food_spend(80.0));
        assert_eq!(statuses.len(), 2);
        assert_eq!(statuses[0].percent, 80.0);
        assert_eq!(statuses[0].severity, BudgetSeverity::Warning);
        assert_eq!(statuses[1].percent, 40.0);
        assert_eq!(statuses[1].severity, BudgetSeverity::Normal);
    }

    #[test]
    fn test_unbudgeted_categories_and_totals() {
        let budgets = vec![food_budget(100.0)];
        let ledger = vec![
            sample_expense(1, "alice", "Food", 60.0),
            sample_expense(2, "alice", "Bills", 80.0),
            sample_expense(3, "alice", "Health", 5.0),
        ];

        let names: Vec<String> = unbudgeted_categories(&budgets, &ledger)
            .into_iter()
            .map(|c| c.category)
            .collect();
        assert_eq!(names, vec!["Bills", "Health"]);

        let statuses = evaluate_budgets(&budgets, &ledger);
        assert_eq!(total_budgeted(&statuses), (100.0, 60.0));
    }

    #[tokio::test]
    async fn test_create_budget_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = create_budget(&db, "alice", "  ", 100.0, None).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidInput { .. }));

        let result = create_budget(&db, "alice", "Food", -1.0, None).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidAmount { amount: -1.0 }
        ));

        let result = create_budget(&db, "alice", "Food", f64::NAN, None).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_budget_report_integration() -> Result<()> {
        let db = setup_test_db().await?;

        let food = create_budget(&db, "alice", "Food", 200.0, None).await?;
        assert_eq!(food.icon, DEFAULT_BUDGET_ICON);
        create_budget(&db, "alice", "Transport", 0.0, Some("bi-bus-front".to_string())).await?;
        create_budget(&db, "bob", "Food", 10.0, None).await?;

        create_test_expense(&db, "alice", 150.0, "Food").await?;
        create_test_expense(&db, "alice", 30.0, "Food").await?;
        create_test_expense(&db, "bob", 1000.0, "Food").await?;

        let report = generate_budget_report(&db, "alice").await?;
        assert_eq!(report.len(), 2);

        assert_eq!(report[0].category, "Food");
        assert_eq!(report[0].spent, 180.0);
        assert_eq!(report[0].percent, 90.0);
        assert_eq!(report[0].severity, BudgetSeverity::Danger);
        assert_eq!(report[0].remaining, 20.0);

        assert_eq!(report[1].category, "Transport");
        assert_eq!(report[1].icon, "bi-bus-front");
        assert_eq!(report[1].percent, 0.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_budget_report_without_budgets() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_expense(&db, "alice", 10.0, "Food").await?;
        assert!(generate_budget_report(&db, "alice").await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_budget() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_budget(&db, "alice", "Food", 100.0, None).await?;

        let result = delete_budget(&db, "bob", created.id).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::BudgetNotFound { id } if id == created.id
        ));

        delete_budget(&db, "alice", created.id).await?;
        assert!(list_budgets_for_owner(&db, "alice").await?.is_empty());

        Ok(())
    }
}
