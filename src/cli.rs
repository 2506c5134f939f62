//! Command-line argument definitions using clap.
//!
//! The command implementations live in the `commands` module.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use spendora::{
    config::settings::DEFAULT_SETTINGS_PATH,
    errors::{Error, Result},
};
use std::path::PathBuf;

/// Spendora - track personal and shared expenses
#[derive(Debug, Parser)]
#[command(name = "spendora")]
#[command(about = "Expense tracking with budgets, dashboards and insights", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Settings file
    #[arg(long, default_value = DEFAULT_SETTINGS_PATH, global = true)]
    pub config: PathBuf,

    /// User the command acts for (required by every command)
    #[arg(long, global = true)]
    pub owner: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// The `--owner` value, trimmed.
    ///
    /// # Errors
    /// Returns `Error::InvalidInput` when no owner was given.
    pub fn owner(&self) -> Result<&str> {
        self.owner
            .as_deref()
            .map(str::trim)
            .filter(|owner| !owner.is_empty())
            .ok_or_else(|| Error::InvalidInput {
                message: "--owner is required".to_string(),
            })
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Record an expense
    AddExpense {
        /// Short description
        title: String,

        /// Amount spent
        amount: f64,

        /// Category, e.g. Food, Transport, Shopping, Bills, Health,
        /// Entertainment or Other (defaults to Uncategorized)
        #[arg(short, long)]
        category: Option<String>,

        /// Log the expense into a shared wallet
        #[arg(short, long)]
        wallet: Option<i64>,

        /// Backdate the expense (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Edit one of your expenses
    EditExpense {
        /// Expense ID
        id: i64,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New amount
        #[arg(long)]
        amount: Option<f64>,

        /// New category
        #[arg(long)]
        category: Option<String>,

        /// New date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Delete one of your expenses
    DeleteExpense {
        /// Expense ID
        id: i64,
    },

    /// List your expenses, newest first
    List {
        /// Only this category
        #[arg(short, long)]
        category: Option<String>,

        /// First day to include (YYYY-MM-DD)
        #[arg(long, requires = "to")]
        from: Option<NaiveDate>,

        /// Day after the last one to include (YYYY-MM-DD)
        #[arg(long, requires = "from")]
        to: Option<NaiveDate>,

        /// Maximum rows to print
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// List suggested categories, including ones you already use
    Categories,

    /// Show totals, top categories and the monthly trend
    Dashboard,

    /// Set a spending limit for a category
    SetBudget {
        /// Category the limit applies to
        category: String,

        /// Limit amount
        limit: f64,

        /// Icon name shown next to the budget
        #[arg(long)]
        icon: Option<String>,
    },

    /// Delete one of your budgets
    DeleteBudget {
        /// Budget ID
        id: i64,
    },

    /// Show budget utilization
    Budgets,

    /// Generate insights from your ledger, then list the latest ones
    Insights {
        /// Skip generation if this key was already used
        #[arg(long, conflicts_with = "daily")]
        key: Option<String>,

        /// Use today's date as the key, so generation runs once per day
        #[arg(long)]
        daily: bool,

        /// Number of insights to list
        #[arg(short, long, default_value = "10")]
        limit: u64,
    },

    /// Create a shared wallet
    CreateWallet {
        /// Wallet name
        name: String,
    },

    /// Add a member to a wallet you belong to
    AddMember {
        /// Wallet ID
        wallet: i64,

        /// User to add
        member: String,
    },

    /// Show a wallet report, or list your wallets
    Wallet {
        /// Wallet ID
        id: Option<i64>,
    },

    /// Export expenses as CSV
    Export {
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export a wallet's expenses instead of your own
        #[arg(short, long)]
        wallet: Option<i64>,

        /// Also print each category's share of the total
        #[arg(long)]
        shares: bool,
    },
}
