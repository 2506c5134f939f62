//! Insight entity - Append-only generated observations about a user's spending.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Insight database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "insights")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// User the insight was generated for
    pub owner_id: String,
    /// Rule that produced it: `"weekly_change"`, `"top_category"` or `"large_transaction"`
    pub kind: String,
    /// Rendered message shown to the user
    pub message: String,
    /// Caller-supplied key used to suppress repeated generation runs
    pub idempotency_key: Option<String>,
    /// When the insight was written
    pub created_at: DateTimeUtc,
}

/// Insights have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
