//! Core business logic - framework-agnostic ledger, reporting and insight operations.
//!
//! The pure functions in [`aggregation`], [`budget`], [`insight`] and
//! [`export`] work on already-loaded slices of expenses. The async functions
//! next to them load those slices from the store and, for insights, write
//! results back.

/// Aggregation engine: totals, category breakdowns, monthly series, dashboard
pub mod aggregation;
/// Budget limits and utilization evaluation
pub mod budget;
/// CSV export and chart data
pub mod export;
/// Rule-based spending insights
pub mod insight;
/// Expense records: create, edit, delete, query
pub mod ledger;
/// Plain-text report formatting
pub mod report;
/// Shared wallets and member contributions
pub mod wallet;
