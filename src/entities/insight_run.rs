//! Insight run entity - One marker row per keyed insight generation.
//!
//! The `(owner_id, idempotency_key)` pair is unique in the store, so two
//! overlapping runs with the same key cannot both claim it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Insight run database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "insight_runs")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// User the run was for
    pub owner_id: String,
    /// Caller-supplied key (e.g., `"alice:2024-03-15"`)
    pub idempotency_key: String,
    /// When the run claimed the key
    pub created_at: DateTimeUtc,
}

/// Insight runs have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
