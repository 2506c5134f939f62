/// Database configuration and connection management
pub mod database;

/// Application settings loading from spendora.toml
pub mod settings;
