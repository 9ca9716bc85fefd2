//! General Discord commands - ping and help.
//! These commands don't touch the ledger and provide basic bot functionality
//! and user assistance.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{bot::Context, errors::Result};

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: Context<'_>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: Context<'_>) -> Result<()> {
        let help_text = "**LedgerBuddy Help**\n\
        Track your spending and income, then see how the month compares to the last.\n\n\
        **Ledger Commands**\n\
        • `/expense <amount> <category> <description> [date] [subcategory] [remark]` - Records an expense.\n\
        • `/income <amount> <source> <description> [date] [remark]` - Records income.\n\
        • `/transactions [limit]` - Lists your most recent transactions.\n\
        • `/edit_transaction <id> ...` - Replaces a transaction's details.\n\
        • `/delete_transaction <id>` - Deletes a transaction.\n\n\
        **Budget Commands**\n\
        • `/dashboard [YYYY-MM]` - Shows the monthly dashboard.\n\
        • `/categories` - Lists your categories and budgets.\n\
        • `/category <add|edit|delete>` - Manages your categories.\n\n\
        **Utility Commands**\n\
        • `/register` - Sets up your ledger with starter categories.\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.\n\n\
        Dates use the `YYYY-MM-DD` format and default to today.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
