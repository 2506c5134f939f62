//! Expense entity - One ledger row recorded by a user.
//!
//! Each expense has an `owner_id`, title, amount, free-text category, an
//! optional `wallet_id` (absent for personal expenses) and a `created_at`
//! timestamp that users may backdate.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Expense database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    /// Unique identifier, also the creation order of the ledger
    #[sea_orm(primary_key)]
    pub id: i64,
    /// User who recorded the expense
    pub owner_id: String,
    /// Shared wallet this expense was logged into, `None` for personal spending
    pub wallet_id: Option<i64>,
    /// Short human-readable title
    pub title: String,
    /// Amount spent
    pub amount: f64,
    /// Free-text category, `"Uncategorized"` when none was given
    pub category: String,
    /// When the expense happened
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Expense and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// An expense optionally belongs to one wallet
    #[sea_orm(
        belongs_to = "super::wallet::Entity",
        from = "Column::WalletId",
        to = "super::wallet::Column::Id",
        on_delete = "Cascade"
    )]
    Wallet,
}

impl Related<super::wallet::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wallet.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
