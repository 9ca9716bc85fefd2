//! Category commands - list and manage your budget categories.

mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, current_user, handlers::autocomplete},
        core::{
            category::{self, CategoryUpdate},
            report::{EMBED_DESCRIPTION_LIMIT, format_currency, pack_lines},
            transaction::amount_from_f64,
        },
        errors::Result,
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    /// Lists your categories with their budgets and colors.
    #[poise::command(slash_command, prefix_command)]
    pub async fn categories(ctx: Context<'_>) -> Result<()> {
        let user = current_user(ctx).await?;
        let categories = category::get_categories_for_user(&ctx.data().database, user.id).await?;

        if categories.is_empty() {
            ctx.say("You have no categories. Add one with `/category add`.")
                .await?;
            return Ok(());
        }

        let mut lines = Vec::with_capacity(categories.len());
        for cat in &categories {
            let budget = cat
                .budget
                .map_or_else(|| "no budget".to_string(), format_currency);
            let mut line = format!("**{}** - {budget}", cat.name);
            if let Some(color) = cat.color.as_deref() {
                write!(&mut line, " `{color}`")?;
            }
            lines.push(line);
        }
        let listing = pack_lines(&lines, EMBED_DESCRIPTION_LIMIT, 1).concat();

        let embed = serenity::CreateEmbed::default()
            .title("🗂️ Your Categories")
            .description(listing)
            .color(0x0010_B981)
            .footer(serenity::CreateEmbedFooter::new(format!(
                "{} categor{}",
                categories.len(),
                if categories.len() == 1 { "y" } else { "ies" }
            )));

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Manage your categories.
    #[poise::command(
        slash_command,
        prefix_command,
        subcommands("category_add", "category_edit", "category_delete")
    )]
    pub async fn category(ctx: Context<'_>) -> Result<()> {
        ctx.say("Use one of: `/category add`, `/category edit`, `/category delete`")
            .await?;
        Ok(())
    }

    /// Creates a new category.
    #[poise::command(slash_command, prefix_command, rename = "add")]
    pub async fn category_add(
        ctx: Context<'_>,
        #[description = "Category name"] name: String,
        #[description = "Monthly budget"] budget: Option<f64>,
        #[description = "Color as #rrggbb"] color: Option<String>,
    ) -> Result<()> {
        let budget = budget.map(amount_from_f64).transpose()?;
        let user = current_user(ctx).await?;
        let created = category::create_category(
            &ctx.data().database,
            user.id,
            &name,
            budget,
            color.as_deref(),
        )
        .await?;

        ctx.say(format!("✅ Created category **{}**.", created.name))
            .await?;
        Ok(())
    }

    /// Changes a category's budget or color.
    #[poise::command(slash_command, prefix_command, rename = "edit")]
    pub async fn category_edit(
        ctx: Context<'_>,
        #[description = "Category to edit"]
        #[autocomplete = "autocomplete::autocomplete_category_name"]
        name: String,
        #[description = "New monthly budget"] budget: Option<f64>,
        #[description = "New color as #rrggbb"] color: Option<String>,
    ) -> Result<()> {
        if budget.is_none() && color.is_none() {
            ctx.say("ℹ️ Nothing to change. Provide a budget or a color.")
                .await?;
            return Ok(());
        }

        let budget = budget.map(amount_from_f64).transpose()?;
        let user = current_user(ctx).await?;
        let updated = category::update_category(
            &ctx.data().database,
            user.id,
            &name,
            CategoryUpdate { budget, color },
        )
        .await?;

        ctx.say(format!("✏️ Updated category **{}**.", updated.name))
            .await?;
        Ok(())
    }

    /// Deletes a category. Existing transactions keep their category name.
    #[poise::command(slash_command, prefix_command, rename = "delete")]
    pub async fn category_delete(
        ctx: Context<'_>,
        #[description = "Category to delete"]
        #[autocomplete = "autocomplete::autocomplete_category_name"]
        name: String,
    ) -> Result<()> {
        let user = current_user(ctx).await?;
        category::delete_category(&ctx.data().database, user.id, &name).await?;

        ctx.say(format!("🗑️ Deleted category **{}**.", name.trim()))
            .await?;
        Ok(())
    }
}

pub use inner::*;
