//! Wallet business logic - shared ledgers with several contributing members.
//!
//! A wallet's creator is always a member. Membership only grows; there is no
//! removal path. Callers that are not members of a wallet see it as missing.

use crate::{
    core::aggregation::{self, CategoryTotal},
    entities::{Wallet, WalletMember, wallet, wallet_member},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{info, instrument};

/// Creates a wallet and registers its creator as the first member.
pub async fn create_wallet(
    db: &DatabaseConnection,
    created_by: &str,
    name: &str,
) -> Result<wallet::Model> {
    if name.trim().is_empty() {
        return Err(Error::InvalidInput {
            message: "Wallet name cannot be empty".to_string(),
        });
    }

    // Wallet and creator membership are written together
    let txn = db.begin().await?;
    let now = Utc::now();

    let created = wallet::ActiveModel {
        name: Set(name.trim().to_string()),
        created_by: Set(created_by.to_string()),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    wallet_member::ActiveModel {
        wallet_id: Set(created.id),
        user_id: Set(created_by.to_string()),
        joined_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    info!(wallet_id = created.id, creator = created_by, "Wallet created");
    Ok(created)
}

/// Whether `user_id` is a member of the wallet.
pub async fn is_member<C>(db: &C, wallet_id: i64, user_id: &str) -> Result<bool>
where
    C: ConnectionTrait,
{
    let count = WalletMember::find()
        .filter(wallet_member::Column::WalletId.eq(wallet_id))
        .filter(wallet_member::Column::UserId.eq(user_id))
        .count(db)
        .await?;
    Ok(count > 0)
}

/// Fetches a wallet the requester belongs to.
pub async fn get_wallet_for_member(
    db: &DatabaseConnection,
    requester: &str,
    wallet_id: i64,
) -> Result<wallet::Model> {
    let wallet = Wallet::find_by_id(wallet_id)
        .one(db)
        .await?
        .ok_or(Error::WalletNotFound { id: wallet_id })?;

    if !is_member(db, wallet_id, requester).await? {
        return Err(Error::WalletNotFound { id: wallet_id });
    }

    Ok(wallet)
}

/// Adds `member` to the wallet on behalf of an existing member.
///
/// Adding someone who already belongs returns their existing membership.
pub async fn add_member(
    db: &DatabaseConnection,
    requester: &str,
    wallet_id: i64,
    member: &str,
) -> Result<wallet_member::Model> {
    let member = member.trim();
    if member.is_empty() {
        return Err(Error::InvalidInput {
            message: "Member ID cannot be empty".to_string(),
        });
    }

    get_wallet_for_member(db, requester, wallet_id).await?;

    let existing = WalletMember::find()
        .filter(wallet_member::Column::WalletId.eq(wallet_id))
        .filter(wallet_member::Column::UserId.eq(member))
        .one(db)
        .await?;
    if let Some(existing) = existing {
        return Ok(existing);
    }

    let added = wallet_member::ActiveModel {
        wallet_id: Set(wallet_id),
        user_id: Set(member.to_string()),
        joined_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(wallet_id, member, added_by = requester, "Wallet member added");
    Ok(added)
}

/// Member user IDs in the order they joined.
pub async fn list_members(db: &DatabaseConnection, wallet_id: i64) -> Result<Vec<String>> {
    let members = WalletMember::find()
        .filter(wallet_member::Column::WalletId.eq(wallet_id))
        .order_by_asc(wallet_member::Column::Id)
        .all(db)
        .await?;
    Ok(members.into_iter().map(|m| m.user_id).collect())
}

/// Wallets the user belongs to, ordered by name.
pub async fn list_wallets_for_user(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Vec<wallet::Model>> {
    let wallet_ids: Vec<i64> = WalletMember::find()
        .filter(wallet_member::Column::UserId.eq(user_id))
        .all(db)
        .await?
        .into_iter()
        .map(|m| m.wallet_id)
        .collect();

    if wallet_ids.is_empty() {
        return Ok(Vec::new());
    }

    Wallet::find()
        .filter(wallet::Column::Id.is_in(wallet_ids))
        .order_by_asc(wallet::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Spending summary for a shared wallet.
#[derive(Debug, Clone, Serialize)]
pub struct WalletReport {
    /// The wallet being reported on
    pub wallet: wallet::Model,
    /// Member user IDs in join order
    pub members: Vec<String>,
    /// Sum of every expense logged into the wallet
    pub total: f64,
    /// Per-member totals
    pub contributions: BTreeMap<String, f64>,
    /// Category breakdown across all members
    pub breakdown: Vec<CategoryTotal>,
}

/// Builds the wallet report for a member of the wallet.
#[instrument(skip(db))]
pub async fn generate_wallet_report(
    db: &DatabaseConnection,
    requester: &str,
    wallet_id: i64,
) -> Result<WalletReport> {
    let wallet = get_wallet_for_member(db, requester, wallet_id).await?;
    let members = list_members(db, wallet_id).await?;
    let expenses = crate::core::ledger::list_expenses_for_wallet(db, wallet_id).await?;

    Ok(WalletReport {
        total: aggregation::total_amount(&expenses),
        contributions: aggregation::member_contribution(wallet_id, &members, &expenses),
        breakdown: aggregation::category_breakdown(&expenses),
        wallet,
        members,
    })
}
