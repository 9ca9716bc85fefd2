//! Application settings loaded from `config.toml`.
//!
//! The file decides how the dashboard budget is computed and which categories
//! a new user starts with. A missing file falls back to the built-in defaults;
//! a file that exists but cannot be parsed is a configuration error.

use crate::{
    core::category::validate_color,
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::{collections::HashSet, path::Path};
use tracing::{debug, info};

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "LEDGER_BUDDY_CONFIG";

/// Config file used when `LEDGER_BUDDY_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Global budget used when the config does not specify one.
pub const DEFAULT_GLOBAL_BUDGET: Decimal = Decimal::from_parts(3000, 0, 0, false, 0);

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AppConfig {
    /// How the monthly budget ceiling is determined
    #[serde(default)]
    pub budget: BudgetMode,
    /// Categories created for every newly registered user
    #[serde(default = "default_categories")]
    pub default_categories: Vec<CategoryConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            budget: BudgetMode::default(),
            default_categories: default_categories(),
        }
    }
}

/// Source of the monthly budget ceiling shown on the dashboard
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum BudgetMode {
    /// One scalar ceiling for all spending
    Global {
        /// Monthly ceiling in dollars
        amount: Decimal,
    },
    /// Sum of the user's per-category budgets
    PerCategory,
}

impl Default for BudgetMode {
    fn default() -> Self {
        Self::Global {
            amount: DEFAULT_GLOBAL_BUDGET,
        }
    }
}

/// A category seeded at registration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CategoryConfig {
    /// Category name
    pub name: String,
    /// Monthly budget ceiling
    pub budget: Option<Decimal>,
    /// Display color as `#rrggbb`
    pub color: Option<String>,
}

impl CategoryConfig {
    fn new(name: &str, budget: u32, color: &str) -> Self {
        Self {
            name: name.to_string(),
            budget: Some(Decimal::from(budget)),
            color: Some(color.to_string()),
        }
    }
}

/// Built-in starter categories.
#[must_use]
pub fn default_categories() -> Vec<CategoryConfig> {
    vec![
        CategoryConfig::new("Food", 300, "#ef4444"),
        CategoryConfig::new("Transportation", 150, "#3b82f6"),
        CategoryConfig::new("Entertainment", 100, "#8b5cf6"),
        CategoryConfig::new("Utilities", 200, "#10b981"),
        CategoryConfig::new("Shopping", 150, "#f59e0b"),
        CategoryConfig::new("Other", 100, "#6b7280"),
    ]
}

/// Parses configuration from TOML text and validates it.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    validate_config(config)
}

/// Checks value ranges and normalizes default category colors.
///
/// Default categories are seeded without going through category validation,
/// so they must satisfy the same rules here: unique names ignoring case,
/// non-negative budgets and `#rrggbb` colors.
fn validate_config(mut config: AppConfig) -> Result<AppConfig> {
    if let BudgetMode::Global { amount } = config.budget {
        if amount < Decimal::ZERO {
            return Err(Error::Config {
                message: format!("budget.amount must be a non-negative number, got {amount}"),
            });
        }
    }

    let mut seen = HashSet::new();
    for category in &mut config.default_categories {
        if category.name.trim().is_empty() {
            return Err(Error::Config {
                message: "default category names cannot be empty".to_string(),
            });
        }
        if !seen.insert(category.name.trim().to_lowercase()) {
            return Err(Error::Config {
                message: format!("default category '{}' is listed twice", category.name),
            });
        }
        if let Some(color) = category.color.as_deref() {
            let normalized = validate_color(color).map_err(|_| Error::Config {
                message: format!(
                    "default category '{}' has an invalid color '{color}'",
                    category.name
                ),
            })?;
            category.color = Some(normalized);
        }
        if let Some(budget) = category.budget {
            if budget < Decimal::ZERO {
                return Err(Error::Config {
                    message: format!(
                        "default category '{}' has an invalid budget {budget}",
                        category.name
                    ),
                });
            }
        }
    }

    Ok(config)
}

/// Loads configuration from a TOML file.
///
/// # Errors
/// Returns an error if the file exists but cannot be read, the TOML syntax is
/// invalid, or a value is out of range. A missing file yields the defaults.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);

    if !path_ref.exists() {
        info!("No config file at {:?}, using built-in defaults", path_ref);
        return Ok(AppConfig::default());
    }

    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {path_ref:?}: {e}"),
    })?;
    parse_config(&contents)
}

/// Loads configuration from `LEDGER_BUDDY_CONFIG` or `./config.toml`.
pub fn load_default_config() -> Result<AppConfig> {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    load_config(path)
}
