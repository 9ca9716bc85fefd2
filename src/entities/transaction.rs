//! Transaction entity - One recorded money movement.
//!
//! `amount` is always stored as a non-negative magnitude; `kind` carries the
//! direction. Expenses carry a `category`, incomes an `income_source`.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Direction of a transaction
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money spent
    #[sea_orm(string_value = "expense")]
    Expense,
    /// Money received
    #[sea_orm(string_value = "income")]
    Income,
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Expense => f.write_str("expense"),
            Self::Income => f.write_str("income"),
        }
    }
}

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of the transaction
    pub user_id: i64,
    /// Non-negative magnitude in dollars
    pub amount: Decimal,
    /// `expense` or `income`
    pub kind: TransactionKind,
    /// Human-readable description of the transaction
    pub description: String,
    /// Category name, set for expenses only
    pub category: Option<String>,
    /// Optional finer-grained label for expenses
    pub subcategory: Option<String>,
    /// Where the money came from, set for incomes only
    pub income_source: Option<String>,
    /// Free-form note
    pub remark: Option<String>,
    /// Calendar date used for monthly bucketing
    pub date: Date,
    /// When the row was inserted
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
