//! Budget entity - A per-category spending limit owned by one user.
//!
//! Nothing enforces one budget per `(owner_id, category)`; duplicates are
//! evaluated as independent limits.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Budget database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    /// Unique identifier for the budget
    #[sea_orm(primary_key)]
    pub id: i64,
    /// User the budget belongs to
    pub owner_id: String,
    /// Category this limit applies to (exact, case-sensitive match)
    pub category: String,
    /// Spending limit
    pub limit_amount: f64,
    /// Display icon name, cosmetic only
    pub icon: String,
}

/// Budgets have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
