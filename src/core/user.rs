//! User registration.
//!
//! Discord authenticates the caller; this module only maps a Discord id to an
//! internal user row. Registering a user also seeds their starter categories,
//! both inside one database transaction.

use crate::{
    config::CategoryConfig,
    core::category,
    entities::{User, user},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{Set, TransactionTrait, prelude::*};
use tracing::{info, warn};

/// Finds a user by their Discord id.
pub async fn get_user_by_discord_id(
    db: &DatabaseConnection,
    discord_id: &str,
) -> Result<Option<user::Model>> {
    User::find()
        .filter(user::Column::DiscordId.eq(discord_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Registers a Discord user, seeding their default categories.
///
/// Idempotent: an existing user is returned unchanged.
///
/// # Returns
/// The user and `true` if this call created it.
pub async fn register_user(
    db: &DatabaseConnection,
    discord_id: &str,
    display_name: &str,
    defaults: &[CategoryConfig],
) -> Result<(user::Model, bool)> {
    if let Some(existing) = get_user_by_discord_id(db, discord_id).await? {
        return Ok((existing, false));
    }

    let txn = db.begin().await?;

    let inserted = user::ActiveModel {
        discord_id: Set(discord_id.to_string()),
        display_name: Set(display_name.to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await;

    let new_user = match inserted {
        Ok(model) => model,
        Err(e) => {
            // A concurrent command may have registered the same user first
            txn.rollback().await?;
            warn!(discord_id, "User insert failed, checking for concurrent registration: {e}");
            return get_user_by_discord_id(db, discord_id)
                .await?
                .map(|existing| (existing, false))
                .ok_or(Error::Database(e));
        }
    };

    category::seed_default_categories(&txn, new_user.id, defaults).await?;
    txn.commit().await?;

    info!(user_id = new_user.id, discord_id, "Registered new user");
    Ok((new_user, true))
}

/// Returns the internal user for a Discord id, registering it on first use.
pub async fn ensure_user(
    db: &DatabaseConnection,
    discord_id: &str,
    display_name: &str,
    defaults: &[CategoryConfig],
) -> Result<user::Model> {
    register_user(db, discord_id, display_name, defaults)
        .await
        .map(|(user, _)| user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::default_categories;
    use crate::core::category::get_categories_for_user;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_register_user_creates_user_and_categories() -> Result<()> {
        let db = setup_test_db().await?;

        let (user, created) =
            register_user(&db, "1234567890", "Ada", &default_categories()).await?;
        assert!(created);
        assert_eq!(user.discord_id, "1234567890");
        assert_eq!(user.display_name, "Ada");

        let categories = get_categories_for_user(&db, user.id).await?;
        assert_eq!(categories.len(), 6);

        Ok(())
    }

    #[tokio::test]
    async fn test_register_user_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;

        let (first, created_first) =
            register_user(&db, "42", "Grace", &default_categories()).await?;
        let (second, created_second) =
            register_user(&db, "42", "Grace Hopper", &default_categories()).await?;

        assert!(created_first);
        assert!(!created_second);
        assert_eq!(first, second);

        // Categories are seeded only once
        let categories = get_categories_for_user(&db, first.id).await?;
        assert_eq!(categories.len(), 6);

        Ok(())
    }

    #[tokio::test]
    async fn test_ensure_user_with_no_defaults() -> Result<()> {
        let db = setup_test_db().await?;

        let user = ensure_user(&db, "7", "Linus", &[]).await?;
        assert!(get_categories_for_user(&db, user.id).await?.is_empty());

        let found = get_user_by_discord_id(&db, "7").await?;
        assert_eq!(found, Some(user));
        assert!(get_user_by_discord_id(&db, "8").await?.is_none());

        Ok(())
    }
}
