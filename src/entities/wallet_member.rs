//! Wallet membership - Join rows between wallets and users.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Wallet membership database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "wallet_members")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Wallet the user belongs to
    pub wallet_id: i64,
    /// Member user ID
    pub user_id: String,
    /// When the user joined
    pub joined_at: DateTimeUtc,
}

/// Each membership row belongs to one wallet
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The wallet this membership refers to
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
