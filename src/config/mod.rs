/// Database configuration and connection management
pub mod database;

/// Budget mode and default categories from config.toml
pub mod settings;

pub use settings::{AppConfig, BudgetMode, CategoryConfig};
