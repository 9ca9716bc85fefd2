//! Transaction business logic - Handles all transaction-related operations.
//!
//! Transactions are stored as an unsigned magnitude plus a `kind` tag. Input is
//! validated and normalized here before it reaches the database: amounts must be
//! positive, expenses need a category, incomes need an income source,
//! and the field that does not belong to the kind is cleared. Every query is scoped
//! by an explicit `user_id`; a transaction owned by someone else is reported as
//! not found.

use crate::{
    entities::{
        Transaction,
        transaction::{self, TransactionKind},
    },
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use rust_decimal::{Decimal, prelude::FromPrimitive};
use sea_orm::{QueryOrder, QuerySelect, Set, prelude::*};
use tracing::debug;

/// Number of rows returned by [`list_recent_transactions`] when no limit is given.
pub const DEFAULT_RECENT_LIMIT: u64 = 10;

/// Upper bound for [`list_recent_transactions`].
pub const MAX_RECENT_LIMIT: u64 = 50;

/// User-supplied fields for creating or replacing a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// Positive magnitude in dollars
    pub amount: Decimal,
    /// Expense or income
    pub kind: TransactionKind,
    /// What the money was for
    pub description: String,
    /// Category name (expenses)
    pub category: Option<String>,
    /// Optional finer label (expenses)
    pub subcategory: Option<String>,
    /// Where the money came from (incomes)
    pub income_source: Option<String>,
    /// Free-form note
    pub remark: Option<String>,
    /// Calendar date of the transaction
    pub date: NaiveDate,
}

impl NewTransaction {
    /// Builds an expense with no subcategory or remark.
    #[must_use]
    pub fn expense(
        amount: Decimal,
        category: impl Into<String>,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            amount,
            kind: TransactionKind::Expense,
            description: description.into(),
            category: Some(category.into()),
            subcategory: None,
            income_source: None,
            remark: None,
            date,
        }
    }

    /// Builds an income with no remark.
    #[must_use]
    pub fn income(
        amount: Decimal,
        income_source: impl Into<String>,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            amount,
            kind: TransactionKind::Income,
            description: description.into(),
            category: None,
            subcategory: None,
            income_source: Some(income_source.into()),
            remark: None,
            date,
        }
    }
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Validates and normalizes transaction input.
///
/// Trims all text, drops blank optional fields, and clears the fields that do
/// not belong to the transaction's kind.
///
/// # Errors
/// * `InvalidAmount` - amount is zero or negative
/// * `MissingField` - description, category (expense) or income source (income) is blank
pub fn validate_new_transaction(input: NewTransaction) -> Result<NewTransaction> {
    if input.amount <= Decimal::ZERO {
        return Err(Error::InvalidAmount {
            amount: input.amount.to_string(),
        });
    }

    let description = input.description.trim().to_string();
    if description.is_empty() {
        return Err(Error::MissingField {
            field: "Description",
        });
    }

    let mut category = clean(input.category);
    let mut subcategory = clean(input.subcategory);
    let mut income_source = clean(input.income_source);

    match input.kind {
        TransactionKind::Expense => {
            if category.is_none() {
                return Err(Error::MissingField { field: "Category" });
            }
            income_source = None;
        }
        TransactionKind::Income => {
            if income_source.is_none() {
                return Err(Error::MissingField {
                    field: "Income source",
                });
            }
            category = None;
            subcategory = None;
        }
    }

    Ok(NewTransaction {
        amount: input.amount,
        kind: input.kind,
        description,
        category,
        subcategory,
        income_source,
        remark: clean(input.remark),
        date: input.date,
    })
}

/// Converts a number entered in Discord into an exact decimal amount.
///
/// The float is read at its shortest round-trip precision, so `12.34` becomes
/// exactly `12.34`. NaN and infinities are rejected; the sign is checked later.
pub fn amount_from_f64(value: f64) -> Result<Decimal> {
    Decimal::from_f64(value).ok_or_else(|| Error::InvalidAmount {
        amount: value.to_string(),
    })
}

/// Parses a `YYYY-MM-DD` calendar date.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| Error::InvalidDate {
        input: input.to_string(),
    })
}

/// Records a new transaction for a user.
pub async fn create_transaction(
    db: &DatabaseConnection,
    user_id: i64,
    input: NewTransaction,
) -> Result<transaction::Model> {
    let input = validate_new_transaction(input)?;

    let model = transaction::ActiveModel {
        user_id: Set(user_id),
        amount: Set(input.amount),
        kind: Set(input.kind),
        description: Set(input.description),
        category: Set(input.category),
        subcategory: Set(input.subcategory),
        income_source: Set(input.income_source),
        remark: Set(input.remark),
        date: Set(input.date),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let created = model.insert(db).await?;
    debug!(
        user_id,
        transaction_id = created.id,
        kind = %created.kind,
        "Created transaction"
    );
    Ok(created)
}

/// Retrieves a transaction by id, returning `None` if it does not exist or
/// belongs to another user.
pub async fn get_transaction_for_user(
    db: &DatabaseConnection,
    user_id: i64,
    transaction_id: i64,
) -> Result<Option<transaction::Model>> {
    Transaction::find_by_id(transaction_id)
        .filter(transaction::Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists a user's most recent transactions, newest date first.
///
/// Rows on the same date are ordered by insertion time, newest first. The
/// limit defaults to [`DEFAULT_RECENT_LIMIT`] and is clamped to `1..=MAX_RECENT_LIMIT`.
pub async fn list_recent_transactions(
    db: &DatabaseConnection,
    user_id: i64,
    limit: Option<u64>,
) -> Result<Vec<transaction::Model>> {
    let limit = limit
        .unwrap_or(DEFAULT_RECENT_LIMIT)
        .clamp(1, MAX_RECENT_LIMIT);

    Transaction::find()
        .filter(transaction::Column::UserId.eq(user_id))
        .order_by_desc(transaction::Column::Date)
        .order_by_desc(transaction::Column::CreatedAt)
        .order_by_desc(transaction::Column::Id)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Returns a user's transactions dated within `start..=end`, oldest first.
///
/// Generic over the connection so it can run inside a database transaction.
pub async fn get_transactions_in_range<C>(
    conn: &C,
    user_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<transaction::Model>>
where
    C: ConnectionTrait,
{
    Transaction::find()
        .filter(transaction::Column::UserId.eq(user_id))
        .filter(transaction::Column::Date.between(start, end))
        .order_by_asc(transaction::Column::Date)
        .order_by_asc(transaction::Column::CreatedAt)
        .order_by_asc(transaction::Column::Id)
        .all(conn)
        .await
        .map_err(Into::into)
}

/// Replaces every user-editable field of an existing transaction.
///
/// `id`, `user_id` and `created_at` are preserved.
pub async fn update_transaction(
    db: &DatabaseConnection,
    user_id: i64,
    transaction_id: i64,
    input: NewTransaction,
) -> Result<transaction::Model> {
    let input = validate_new_transaction(input)?;

    let existing = get_transaction_for_user(db, user_id, transaction_id)
        .await?
        .ok_or(Error::TransactionNotFound { id: transaction_id })?;

    let mut active_model: transaction::ActiveModel = existing.into();
    active_model.amount = Set(input.amount);
    active_model.kind = Set(input.kind);
    active_model.description = Set(input.description);
    active_model.category = Set(input.category);
    active_model.subcategory = Set(input.subcategory);
    active_model.income_source = Set(input.income_source);
    active_model.remark = Set(input.remark);
    active_model.date = Set(input.date);

    let updated = active_model.update(db).await?;
    debug!(user_id, transaction_id, "Replaced transaction");
    Ok(updated)
}

/// Deletes a transaction owned by the user.
pub async fn delete_transaction(
    db: &DatabaseConnection,
    user_id: i64,
    transaction_id: i64,
) -> Result<()> {
    let existing = get_transaction_for_user(db, user_id, transaction_id)
        .await?
        .ok_or(Error::TransactionNotFound { id: transaction_id })?;

    existing.delete(db).await?;
    debug!(user_id, transaction_id, "Deleted transaction");
    Ok(())
}
