//! Shared test utilities for `LedgerBuddy`.
//!
//! This module provides common helper functions for setting up test databases
//! and building entity models with sensible defaults.

use crate::{
    config::settings::default_categories,
    core::user,
    entities::{self, TransactionKind},
    errors::Result,
};
use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Shorthand for a calendar date. Panics on an invalid date.
#[allow(clippy::unwrap_used)]
#[must_use]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Parses an exact decimal. Panics on malformed input.
#[allow(clippy::unwrap_used)]
#[must_use]
pub fn dec(value: &str) -> Decimal {
    value.parse().unwrap()
}

/// Exact decimal for a float literal, via its shortest round-trip text.
///
/// `money(0.1)` is exactly `0.1`, not the nearest binary fraction.
#[must_use]
pub fn money(value: f64) -> Decimal {
    dec(&value.to_string())
}

/// Creates a user without any categories.
pub async fn create_test_user(
    db: &DatabaseConnection,
    discord_id: &str,
) -> Result<entities::user::Model> {
    user::ensure_user(db, discord_id, discord_id, &[]).await
}

/// Creates a user with the built-in default categories.
pub async fn create_registered_user(
    db: &DatabaseConnection,
    discord_id: &str,
) -> Result<entities::user::Model> {
    user::ensure_user(db, discord_id, discord_id, &default_categories()).await
}

/// Sets up a database with a single user and no categories.
/// Returns (db, user) for common test scenarios.
pub async fn setup_with_user() -> Result<(DatabaseConnection, entities::user::Model)> {
    let db = setup_test_db().await?;
    let user = create_test_user(&db, "test_user").await?;
    Ok((db, user))
}

fn transaction_model(
    id: i64,
    amount: f64,
    kind: TransactionKind,
    date: NaiveDate,
) -> entities::transaction::Model {
    entities::transaction::Model {
        id,
        user_id: 1,
        amount: money(amount),
        kind,
        description: String::new(),
        category: None,
        subcategory: None,
        income_source: None,
        remark: None,
        date,
        created_at: Utc.timestamp_opt(1_700_000_000 + id, 0).single().unwrap_or_default(),
    }
}

/// Builds an in-memory expense model (not persisted).
///
/// # Defaults
/// * `user_id`: 1
/// * `description`: `"Test expense"`
#[must_use]
pub fn expense_model(
    id: i64,
    amount: f64,
    category: &str,
    date: NaiveDate,
) -> entities::transaction::Model {
    entities::transaction::Model {
        description: "Test expense".to_string(),
        category: Some(category.to_string()),
        ..transaction_model(id, amount, TransactionKind::Expense, date)
    }
}

/// Builds an in-memory expense with no category, as legacy rows may have.
#[must_use]
pub fn uncategorized_expense_model(
    id: i64,
    amount: f64,
    date: NaiveDate,
) -> entities::transaction::Model {
    entities::transaction::Model {
        description: "Test expense".to_string(),
        ..transaction_model(id, amount, TransactionKind::Expense, date)
    }
}

/// Builds an in-memory income model (not persisted).
///
/// # Defaults
/// * `user_id`: 1
/// * `description`: `"Test income"`
#[must_use]
pub fn income_model(
    id: i64,
    amount: f64,
    source: &str,
    date: NaiveDate,
) -> entities::transaction::Model {
    entities::transaction::Model {
        description: "Test income".to_string(),
        income_source: Some(source.to_string()),
        ..transaction_model(id, amount, TransactionKind::Income, date)
    }
}

/// Builds an in-memory category model (not persisted).
#[must_use]
pub fn category_model(id: i64, name: &str, budget: Option<f64>) -> entities::category::Model {
    entities::category::Model {
        id,
        user_id: 1,
        name: name.to_string(),
        budget: budget.map(money),
        color: None,
    }
}
