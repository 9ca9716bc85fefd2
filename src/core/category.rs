//! Category business logic - per-user budget envelopes.
//!
//! Category names are unique per user, compared case-insensitively. Transactions
//! refer to categories by name only, so deleting a category never touches the
//! ledger.

use crate::{
    config::CategoryConfig,
    entities::{Category, category},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Partial edit for an existing category. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryUpdate {
    /// New monthly budget
    pub budget: Option<Decimal>,
    /// New display color
    pub color: Option<String>,
}

/// Validates a `#rrggbb` color and returns it lowercased.
pub fn validate_color(input: &str) -> Result<String> {
    let trimmed = input.trim();
    let valid = trimmed.len() == 7
        && trimmed.starts_with('#')
        && trimmed[1..].chars().all(|c| c.is_ascii_hexdigit());

    if valid {
        Ok(trimmed.to_ascii_lowercase())
    } else {
        Err(Error::InvalidColor {
            input: input.to_string(),
        })
    }
}

fn validate_budget(budget: Option<Decimal>) -> Result<Option<Decimal>> {
    match budget {
        Some(amount) if amount < Decimal::ZERO => Err(Error::InvalidAmount {
            amount: amount.to_string(),
        }),
        other => Ok(other),
    }
}

/// Retrieves all of a user's categories in creation order.
pub async fn get_categories_for_user<C>(conn: &C, user_id: i64) -> Result<Vec<category::Model>>
where
    C: ConnectionTrait,
{
    Category::find()
        .filter(category::Column::UserId.eq(user_id))
        .order_by_asc(category::Column::Id)
        .all(conn)
        .await
        .map_err(Into::into)
}

/// Finds a user's category by name, ignoring case.
pub async fn get_category_by_name(
    db: &DatabaseConnection,
    user_id: i64,
    name: &str,
) -> Result<Option<category::Model>> {
    let wanted = name.trim().to_lowercase();
    let categories = get_categories_for_user(db, user_id).await?;
    Ok(categories
        .into_iter()
        .find(|c| c.name.to_lowercase() == wanted))
}

/// Creates a category for a user after validating its fields.
pub async fn create_category(
    db: &DatabaseConnection,
    user_id: i64,
    name: &str,
    budget: Option<Decimal>,
    color: Option<&str>,
) -> Result<category::Model> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::MissingField {
            field: "Category name",
        });
    }
    let budget = validate_budget(budget)?;
    let color = color.map(validate_color).transpose()?;

    if get_category_by_name(db, user_id, name).await?.is_some() {
        return Err(Error::DuplicateCategory {
            name: name.to_string(),
        });
    }

    let model = category::ActiveModel {
        user_id: Set(user_id),
        name: Set(name.to_string()),
        budget: Set(budget),
        color: Set(color),
        ..Default::default()
    };

    model.insert(db).await.map_err(Into::into)
}

/// Applies a partial edit to a user's category.
pub async fn update_category(
    db: &DatabaseConnection,
    user_id: i64,
    name: &str,
    update: CategoryUpdate,
) -> Result<category::Model> {
    let budget = validate_budget(update.budget)?;
    let color = update.color.as_deref().map(validate_color).transpose()?;

    let existing = get_category_by_name(db, user_id, name)
        .await?
        .ok_or_else(|| Error::CategoryNotFound {
            name: name.trim().to_string(),
        })?;

    let mut active_model: category::ActiveModel = existing.into();
    if let Some(budget) = budget {
        active_model.budget = Set(Some(budget));
    }
    if let Some(color) = color {
        active_model.color = Set(Some(color));
    }

    active_model.update(db).await.map_err(Into::into)
}

/// Deletes a user's category. Transactions that reference it keep their name.
pub async fn delete_category(db: &DatabaseConnection, user_id: i64, name: &str) -> Result<()> {
    let existing = get_category_by_name(db, user_id, name)
        .await?
        .ok_or_else(|| Error::CategoryNotFound {
            name: name.trim().to_string(),
        })?;

    existing.delete(db).await?;
    Ok(())
}

/// Inserts the configured starter categories for a user.
///
/// Returns the number of categories created.
pub async fn seed_default_categories<C>(
    conn: &C,
    user_id: i64,
    defaults: &[CategoryConfig],
) -> Result<usize>
where
    C: ConnectionTrait,
{
    for default in defaults {
        let model = category::ActiveModel {
            user_id: Set(user_id),
            name: Set(default.name.trim().to_string()),
            budget: Set(default.budget),
            color: Set(default.color.clone()),
            ..Default::default()
        };
        model.insert(conn).await?;
    }

    info!(user_id, count = defaults.len(), "Seeded default categories");
    Ok(defaults.len())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::config::settings::default_categories;
    use crate::test_utils::*;

    #[test]
    fn test_validate_color() {
        assert_eq!(validate_color("#EF4444").unwrap(), "#ef4444");
        assert_eq!(validate_color(" #3b82f6 ").unwrap(), "#3b82f6");
        assert!(matches!(validate_color("ef4444"), Err(Error::InvalidColor { .. })));
        assert!(matches!(validate_color("#ef44"), Err(Error::InvalidColor { .. })));
        assert!(matches!(validate_color("#gg4444"), Err(Error::InvalidColor { .. })));
    }

    #[tokio::test]
    async fn test_seed_default_categories() -> Result<()> {
        let (db, user) = setup_with_user().await?;

        let created = seed_default_categories(&db, user.id, &default_categories()).await?;
        assert_eq!(created, 6);

        let categories = get_categories_for_user(&db, user.id).await?;
        assert_eq!(categories.len(), 6);
        assert_eq!(categories[0].name, "Food");
        assert_eq!(categories[0].budget, Some(money(300.0)));
        assert_eq!(categories[0].color.as_deref(), Some("#ef4444"));
        assert_eq!(categories[5].name, "Other");

        Ok(())
    }

    #[tokio::test]
    async fn test_create_category_rejects_duplicates_ignoring_case() -> Result<()> {
        let (db, user) = setup_with_user().await?;

        create_category(&db, user.id, "Travel", Some(money(250.0)), Some("#123456")).await?;
        let result = create_category(&db, user.id, "travel", None, None).await;
        assert!(matches!(result, Err(Error::DuplicateCategory { .. })));

        // Another user may use the same name
        let other = create_test_user(&db, "other").await?;
        create_category(&db, other.id, "Travel", None, None).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_category_validation() -> Result<()> {
        let (db, user) = setup_with_user().await?;

        assert!(matches!(
            create_category(&db, user.id, "  ", None, None).await,
            Err(Error::MissingField { .. })
        ));
        assert!(matches!(
            create_category(&db, user.id, "Gym", Some(money(-1.0)), None).await,
            Err(Error::InvalidAmount { .. })
        ));
        assert!(matches!(
            create_category(&db, user.id, "Gym", None, Some("blue")).await,
            Err(Error::InvalidColor { .. })
        ));
        assert!(get_categories_for_user(&db, user.id).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_update_category_is_partial() -> Result<()> {
        let (db, user) = setup_with_user().await?;
        create_category(&db, user.id, "Food", Some(money(300.0)), Some("#ef4444")).await?;

        let updated = update_category(
            &db,
            user.id,
            "food",
            CategoryUpdate {
                budget: Some(money(450.0)),
                color: None,
            },
        )
        .await?;

        assert_eq!(updated.name, "Food");
        assert_eq!(updated.budget, Some(money(450.0)));
        assert_eq!(updated.color.as_deref(), Some("#ef4444"));

        let missing = update_category(&db, user.id, "Nope", CategoryUpdate::default()).await;
        assert!(matches!(missing, Err(Error::CategoryNotFound { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_category() -> Result<()> {
        let (db, user) = setup_with_user().await?;
        create_category(&db, user.id, "Food", Some(money(300.0)), None).await?;

        delete_category(&db, user.id, "FOOD").await?;
        assert!(get_category_by_name(&db, user.id, "Food").await?.is_none());

        let again = delete_category(&db, user.id, "Food").await;
        assert!(matches!(again, Err(Error::CategoryNotFound { .. })));

        Ok(())
    }
}
