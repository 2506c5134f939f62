//! Command implementations for the CLI.
//!
//! Each command prints plain text to stdout. Failures are returned to `main`.

use chrono::{NaiveDate, Utc};
use sea_orm::DatabaseConnection;
use spendora::{
    config::settings::Settings,
    core::{
        aggregation::{self, DashboardOptions},
        budget, export, insight,
        ledger::{self, ExpenseUpdate, NewExpense},
        report, wallet,
    },
    errors::Result,
};
use std::{fs::File, io, path::Path};
use tracing::info;

use crate::cli::Commands;

/// Creates the directory holding a file-backed `SQLite` database, if any.
pub fn ensure_database_dir(database_url: &str) -> Result<()> {
    let Some(rest) = database_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let path = rest.split('?').next().unwrap_or(rest);
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Runs one parsed command for `owner`.
pub async fn run(
    db: &DatabaseConnection,
    settings: &Settings,
    owner: &str,
    command: Commands,
) -> Result<()> {
    let today = Utc::now().date_naive();

    match command {
        Commands::AddExpense {
            title,
            amount,
            category,
            wallet,
            date,
        } => cmd_add_expense(db, owner, title, amount, category, wallet, date).await,
        Commands::EditExpense {
            id,
            title,
            amount,
            category,
            date,
        } => {
            let update = ExpenseUpdate {
                title,
                amount,
                category,
                created_at: date.map(start_of_day),
            };
            let updated = ledger::update_expense(db, owner, id, update).await?;
            println!("Updated {}", report::format_expense_line(&updated));
            Ok(())
        }
        Commands::DeleteExpense { id } => {
            ledger::delete_expense(db, owner, id).await?;
            println!("Deleted expense #{id}");
            Ok(())
        }
        Commands::List {
            category,
            from,
            to,
            limit,
        } => cmd_list(db, owner, category.as_deref(), from.zip(to), limit).await,
        Commands::Categories => {
            let expenses = ledger::list_expenses_for_owner(db, owner).await?;
            for category in ledger::category_suggestions(&expenses) {
                println!("{category}");
            }
            Ok(())
        }
        Commands::Dashboard => {
            let summary =
                aggregation::generate_dashboard(db, owner, today, DashboardOptions::from(settings))
                    .await?;
            print!("{}", report::format_dashboard(&summary));
            Ok(())
        }
        Commands::SetBudget {
            category,
            limit,
            icon,
        } => {
            let created = budget::create_budget(db, owner, &category, limit, icon).await?;
            println!(
                "Budget #{} set: {} {}",
                created.id,
                created.category,
                report::format_currency(created.limit_amount)
            );
            Ok(())
        }
        Commands::DeleteBudget { id } => {
            budget::delete_budget(db, owner, id).await?;
            println!("Deleted budget #{id}");
            Ok(())
        }
        Commands::Budgets => cmd_budgets(db, owner).await,
        Commands::Insights { key, daily, limit } => {
            let key = if daily {
                Some(insight::daily_idempotency_key(owner, today))
            } else {
                key
            };
            cmd_insights(db, owner, today, key.as_deref(), limit).await
        }
        Commands::CreateWallet { name } => {
            let created = wallet::create_wallet(db, owner, &name).await?;
            println!("Created wallet #{} {}", created.id, created.name);
            Ok(())
        }
        Commands::AddMember {
            wallet: wallet_id,
            member,
        } => {
            let added = wallet::add_member(db, owner, wallet_id, &member).await?;
            println!("{} is a member of wallet #{wallet_id}", added.user_id);
            Ok(())
        }
        Commands::Wallet { id } => cmd_wallet(db, owner, id).await,
        Commands::Export {
            output,
            wallet: wallet_id,
            shares,
        } => cmd_export(db, owner, output.as_deref(), wallet_id, shares).await,
    }
}

fn start_of_day(date: NaiveDate) -> chrono::DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

async fn cmd_add_expense(
    db: &DatabaseConnection,
    owner: &str,
    title: String,
    amount: f64,
    category: Option<String>,
    wallet_id: Option<i64>,
    date: Option<NaiveDate>,
) -> Result<()> {
    let created = ledger::create_expense(
        db,
        NewExpense {
            owner_id: owner.to_string(),
            title,
            amount,
            category,
            wallet_id,
            created_at: date.map(start_of_day),
        },
    )
    .await?;
    println!("Recorded {}", report::format_expense_line(&created));
    Ok(())
}

async fn cmd_list(
    db: &DatabaseConnection,
    owner: &str,
    category: Option<&str>,
    range: Option<(NaiveDate, NaiveDate)>,
    limit: Option<usize>,
) -> Result<()> {
    let mut expenses = match range {
        Some((from, to)) => {
            let mut found =
                ledger::list_expenses_in_range(db, owner, start_of_day(from), start_of_day(to))
                    .await?;
            found.reverse();
            found
        }
        None => match category {
            Some(category) => ledger::list_expenses_by_category(db, owner, category).await?,
            None => ledger::list_expenses_for_owner(db, owner).await?,
        },
    };

    if range.is_some() {
        if let Some(category) = category {
            expenses.retain(|e| e.category == category);
        }
    }
    if let Some(limit) = limit {
        expenses.truncate(limit);
    }

    if expenses.is_empty() {
        println!("No expenses found");
        return Ok(());
    }
    for expense in &expenses {
        println!("{}", report::format_expense_line(expense));
    }
    println!(
        "{} expenses, {}",
        expenses.len(),
        report::format_currency(aggregation::total_amount(&expenses))
    );
    Ok(())
}

async fn cmd_budgets(db: &DatabaseConnection, owner: &str) -> Result<()> {
    let statuses = budget::generate_budget_report(db, owner).await?;
    if statuses.is_empty() {
        println!("No budgets set");
        return Ok(());
    }

    for status in &statuses {
        println!("#{} {}", status.budget_id, report::format_budget_line(status));
    }
    let (limit, spent) = budget::total_budgeted(&statuses);
    println!(
        "Budgeted {} | Spent {}",
        report::format_currency(limit),
        report::format_currency(spent)
    );

    let budgets = budget::list_budgets_for_owner(db, owner).await?;
    let expenses = ledger::list_expenses_for_owner(db, owner).await?;
    let unbudgeted = budget::unbudgeted_categories(&budgets, &expenses);
    if !unbudgeted.is_empty() {
        println!("Without a budget:");
        for category in &unbudgeted {
            println!(
                "  {} {}",
                category.category,
                report::format_currency(category.total)
            );
        }
    }
    Ok(())
}

async fn cmd_insights(
    db: &DatabaseConnection,
    owner: &str,
    today: NaiveDate,
    key: Option<&str>,
    limit: u64,
) -> Result<()> {
    let written = insight::generate_insights(db, owner, today, key).await?;
    info!(count = written.len(), "Generated insights");

    let latest = insight::list_insights_for_owner(db, owner, Some(limit)).await?;
    if latest.is_empty() {
        println!("No insights yet");
        return Ok(());
    }
    for row in &latest {
        println!("{} {}", row.created_at.format("%Y-%m-%d"), row.message);
    }
    Ok(())
}

async fn cmd_wallet(db: &DatabaseConnection, owner: &str, id: Option<i64>) -> Result<()> {
    if let Some(wallet_id) = id {
        let summary = wallet::generate_wallet_report(db, owner, wallet_id).await?;
        print!("{}", report::format_wallet_report(&summary));
        return Ok(());
    }

    let wallets = wallet::list_wallets_for_user(db, owner).await?;
    if wallets.is_empty() {
        println!("You are not a member of any wallet");
    }
    for found in &wallets {
        println!("#{} {} (created by {})", found.id, found.name, found.created_by);
    }
    Ok(())
}

async fn cmd_export(
    db: &DatabaseConnection,
    owner: &str,
    output: Option<&Path>,
    wallet_id: Option<i64>,
    shares: bool,
) -> Result<()> {
    let expenses = match wallet_id {
        Some(wallet_id) => {
            wallet::get_wallet_for_member(db, owner, wallet_id).await?;
            ledger::list_expenses_for_wallet(db, wallet_id).await?
        }
        None => ledger::list_expenses_for_owner(db, owner).await?,
    };

    match output {
        Some(path) => {
            export::write_expenses_csv(&expenses, File::create(path)?)?;
            info!(rows = expenses.len(), path = %path.display(), "Exported expenses");
        }
        None => export::write_expenses_csv(&expenses, io::stdout().lock())?,
    }

    if shares {
        // Shares go to stderr so stdout stays valid CSV
        for slice in export::category_pie_slices(&expenses) {
            eprintln!(
                "{} {} {:.1}%",
                slice.category,
                report::format_currency(slice.total),
                slice.share_percent
            );
        }
    }
    Ok(())
}
