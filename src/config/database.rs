//! Database configuration module for `Spendora`.
//!
//! This module handles the `SQLite` connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs without hand-written SQL.

use crate::entities::{Budget, Expense, Insight, InsightRun, Wallet, WalletMember, insight_run};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema, sea_query::Index};
use tracing::{debug, info};

/// Default database location when neither the settings file nor the
/// environment provide one.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/spendora.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable or
/// returns the default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Opens a connection to the database at `database_url` and makes sure all
/// tables exist.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to database at {database_url}");
    let db = Database::connect(database_url).await?;
    create_tables(&db).await?;
    info!("Database ready");
    Ok(db)
}

/// Creates all tables (if missing) from the entity definitions.
///
/// Wallets are created before the tables that reference them. Insight run
/// markers get a unique index on `(owner_id, idempotency_key)`.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let tables = [
        schema.create_table_from_entity(Wallet),
        schema.create_table_from_entity(WalletMember),
        schema.create_table_from_entity(Expense),
        schema.create_table_from_entity(Budget),
        schema.create_table_from_entity(Insight),
        schema.create_table_from_entity(InsightRun),
    ];

    for mut table in tables {
        table.if_not_exists();
        db.execute(builder.build(&table)).await?;
    }

    let run_key_index = Index::create()
        .name("idx_insight_runs_owner_key")
        .table(InsightRun)
        .col(insight_run::Column::OwnerId)
        .col(insight_run::Column::IdempotencyKey)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&run_key_index)).await?;

    Ok(())
}
