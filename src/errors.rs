//! Unified error type for the ledger, reporting and insight layers.

use thiserror::Error;

/// Errors surfaced by the store layer and the reporting core.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the problem
        message: String,
    },

    /// A required field was missing or malformed
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Human-readable description of the problem
        message: String,
    },

    /// An amount or limit was negative or not a finite number
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// The expense does not exist or does not belong to the caller
    #[error("Expense not found: {id}")]
    ExpenseNotFound {
        /// Requested expense ID
        id: i64,
    },

    /// The wallet does not exist or the caller is not a member
    #[error("Wallet not found: {id}")]
    WalletNotFound {
        /// Requested wallet ID
        id: i64,
    },

    /// The budget does not exist or does not belong to the caller
    #[error("Budget not found: {id}")]
    BudgetNotFound {
        /// Requested budget ID
        id: i64,
    },

    /// The underlying store failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Writing an export failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV writer failure during export
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
