//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the ledger tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod budget;
pub mod expense;
pub mod insight;
pub mod insight_run;
pub mod wallet;
pub mod wallet_member;

// Re-export specific types to avoid conflicts
pub use budget::{Column as BudgetColumn, Entity as Budget, Model as BudgetModel};
pub use expense::{Column as ExpenseColumn, Entity as Expense, Model as ExpenseModel};
pub use insight::{Column as InsightColumn, Entity as Insight, Model as InsightModel};
pub use insight_run::{
    Column as InsightRunColumn, Entity as InsightRun, Model as InsightRunModel,
};
pub use wallet::{Column as WalletColumn, Entity as Wallet, Model as WalletModel};
pub use wallet_member::{
    Column as WalletMemberColumn, Entity as WalletMember, Model as WalletMemberModel,
};
