//! Category entity - A user-defined spending category with an optional budget.
//!
//! Transactions reference categories by `name`, not by id, so renaming or
//! deleting a category leaves existing transactions untouched.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    /// Unique identifier for the category
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of the category
    pub user_id: i64,
    /// Display name (e.g., "Food", "Utilities")
    pub name: String,
    /// Monthly budget ceiling in dollars, if one is set
    pub budget: Option<Decimal>,
    /// Display color as `#rrggbb`
    pub color: Option<String>,
}

/// Defines relationships between Category and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each category belongs to one user
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
