//! Transaction Discord commands - record, list, edit and delete ledger entries.
//!
//! Validation lives in [`crate::core::transaction`]; these commands only
//! translate Discord parameters into a [`NewTransaction`] and format replies.
//! Rejected input surfaces through the framework error hook.
//!
//! [`NewTransaction`]: crate::core::transaction::NewTransaction

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, current_user, handlers::autocomplete},
        core::{
            report::{
                EMBED_DESCRIPTION_LIMIT, MESSAGE_LIMIT, format_currency, format_transaction_line,
                pack_lines, truncate_text,
            },
            transaction::{self, NewTransaction},
        },
        entities::TransactionKind,
        errors::Result,
    };
    use chrono::{Local, NaiveDate};
    use poise::serenity_prelude as serenity;

    /// Transaction kind as offered in the slash command picker.
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum KindChoice {
        #[name = "expense"]
        Expense,
        #[name = "income"]
        Income,
    }

    impl From<KindChoice> for TransactionKind {
        fn from(choice: KindChoice) -> Self {
            match choice {
                KindChoice::Expense => Self::Expense,
                KindChoice::Income => Self::Income,
            }
        }
    }

    fn resolve_date(date: Option<&str>) -> Result<NaiveDate> {
        date.map_or_else(
            || Ok(Local::now().date_naive()),
            transaction::parse_date,
        )
    }

    /// Records an expense.
    #[poise::command(slash_command, prefix_command)]
    pub async fn expense(
        ctx: Context<'_>,
        #[description = "Amount spent"] amount: f64,
        #[description = "Category of the expense"]
        #[autocomplete = "autocomplete::autocomplete_category_name"]
        category: String,
        #[description = "What the money was spent on"] description: String,
        #[description = "Date as YYYY-MM-DD (defaults to today)"] date: Option<String>,
        #[description = "Optional subcategory"] subcategory: Option<String>,
        #[description = "Optional note"] remark: Option<String>,
    ) -> Result<()> {
        let user = current_user(ctx).await?;
        let date = resolve_date(date.as_deref())?;
        let amount = transaction::amount_from_f64(amount)?;
        let mut input = NewTransaction::expense(amount, category, description, date);
        input.subcategory = subcategory;
        input.remark = remark;

        let created =
            transaction::create_transaction(&ctx.data().database, user.id, input).await?;

        let reply = format!(
            "✅ Recorded expense of {} in **{}**.\n{}",
            format_currency(created.amount),
            created.category.as_deref().unwrap_or_default(),
            format_transaction_line(&created)
        );
        ctx.say(truncate_text(&reply, MESSAGE_LIMIT)).await?;
        Ok(())
    }

    /// Records income.
    #[poise::command(slash_command, prefix_command)]
    pub async fn income(
        ctx: Context<'_>,
        #[description = "Amount received"] amount: f64,
        #[description = "Where the money came from"] source: String,
        #[description = "Description of the income"] description: String,
        #[description = "Date as YYYY-MM-DD (defaults to today)"] date: Option<String>,
        #[description = "Optional note"] remark: Option<String>,
    ) -> Result<()> {
        let user = current_user(ctx).await?;
        let date = resolve_date(date.as_deref())?;
        let amount = transaction::amount_from_f64(amount)?;
        let mut input = NewTransaction::income(amount, source, description, date);
        input.remark = remark;

        let created =
            transaction::create_transaction(&ctx.data().database, user.id, input).await?;

        let reply = format!(
            "✅ Recorded income of {} from **{}**.\n{}",
            format_currency(created.amount),
            created.income_source.as_deref().unwrap_or_default(),
            format_transaction_line(&created)
        );
        ctx.say(truncate_text(&reply, MESSAGE_LIMIT)).await?;
        Ok(())
    }

    /// Lists your most recent transactions.
    #[poise::command(slash_command, prefix_command)]
    pub async fn transactions(
        ctx: Context<'_>,
        #[description = "How many to show (default 10, max 50)"] limit: Option<u64>,
    ) -> Result<()> {
        let user = current_user(ctx).await?;
        let recent =
            transaction::list_recent_transactions(&ctx.data().database, user.id, limit).await?;

        if recent.is_empty() {
            ctx.say("No transactions yet. Record one with `/expense` or `/income`.")
                .await?;
            return Ok(());
        }

        let lines: Vec<String> = recent.iter().map(format_transaction_line).collect();
        let listing = pack_lines(&lines, EMBED_DESCRIPTION_LIMIT, 1).concat();
        let embed = serenity::CreateEmbed::default()
            .title("🧾 Recent Transactions")
            .description(listing)
            .color(0x0034_98DB)
            .footer(serenity::CreateEmbedFooter::new(format!(
                "{} transaction{}",
                recent.len(),
                if recent.len() == 1 { "" } else { "s" }
            )));

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Replaces every field of one of your transactions.
    #[poise::command(slash_command, prefix_command)]
    pub async fn edit_transaction(
        ctx: Context<'_>,
        #[description = "Transaction id (shown in /transactions)"] id: i64,
        #[description = "Expense or income"] kind: KindChoice,
        #[description = "Amount"] amount: f64,
        #[description = "Category (expense) or source (income)"]
        #[autocomplete = "autocomplete::autocomplete_category_name"]
        label: String,
        #[description = "Description"] description: String,
        #[description = "Date as YYYY-MM-DD (defaults to today)"] date: Option<String>,
        #[description = "Optional subcategory (expenses only)"] subcategory: Option<String>,
        #[description = "Optional note"] remark: Option<String>,
    ) -> Result<()> {
        let user = current_user(ctx).await?;
        let date = resolve_date(date.as_deref())?;
        let amount = transaction::amount_from_f64(amount)?;

        let mut input = match TransactionKind::from(kind) {
            TransactionKind::Expense => {
                let mut expense = NewTransaction::expense(amount, label, description, date);
                expense.subcategory = subcategory;
                expense
            }
            TransactionKind::Income => NewTransaction::income(amount, label, description, date),
        };
        input.remark = remark;

        let updated =
            transaction::update_transaction(&ctx.data().database, user.id, id, input).await?;

        let reply = format!(
            "✏️ Updated transaction.\n{}",
            format_transaction_line(&updated)
        );
        ctx.say(truncate_text(&reply, MESSAGE_LIMIT)).await?;
        Ok(())
    }

    /// Deletes one of your transactions.
    #[poise::command(slash_command, prefix_command)]
    pub async fn delete_transaction(
        ctx: Context<'_>,
        #[description = "Transaction id (shown in /transactions)"] id: i64,
    ) -> Result<()> {
        let user = current_user(ctx).await?;
        transaction::delete_transaction(&ctx.data().database, user.id, id).await?;

        ctx.say(format!("🗑️ Deleted transaction `#{id}`.")).await?;
        Ok(())
    }
}

pub use inner::*;
