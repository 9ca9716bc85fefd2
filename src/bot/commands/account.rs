//! Account commands - explicit registration.

mod inner {
    #![allow(missing_docs)]

    use crate::{bot::Context, core::user, errors::Result};

    /// Sets up your ledger and seeds the starter categories.
    ///
    /// Every other command registers the caller on first use, so this only
    /// makes the step visible. Running it again changes nothing.
    #[poise::command(slash_command, prefix_command)]
    pub async fn register(ctx: Context<'_>) -> Result<()> {
        let data = ctx.data();
        let author = ctx.author();

        let (account, created) = user::register_user(
            &data.database,
            &author.id.to_string(),
            &author.name,
            &data.config.default_categories,
        )
        .await?;

        if created {
            ctx.say(format!(
                "✅ Welcome, {}! Your ledger is ready with {} starter categories. Try `/expense` or `/dashboard`.",
                account.display_name,
                data.config.default_categories.len()
            ))
            .await?;
        } else {
            ctx.say(format!(
                "ℹ️ You're already registered (since {}).",
                account.created_at.format("%Y-%m-%d")
            ))
            .await?;
        }
        Ok(())
    }
}

pub use inner::*;
