//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Registration commands
pub mod account;

/// Category management commands
pub mod category;

/// Monthly dashboard command
pub mod dashboard;

/// General utility commands
pub mod general;

/// Transaction commands
pub mod transaction;

// Export commands
pub use account::*;
pub use category::*;
pub use dashboard::*;
pub use general::*;
pub use transaction::*;

use crate::{bot::BotData, errors::Error};

/// Every command the bot registers with Discord.
#[must_use]
pub fn all() -> Vec<poise::Command<BotData, Error>> {
    vec![
        ping(),
        help(),
        register(),
        expense(),
        income(),
        transactions(),
        edit_transaction(),
        delete_transaction(),
        categories(),
        category(),
        dashboard(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_commands_have_unique_names() {
        let commands = all();
        let mut names: Vec<&str> = commands.iter().map(|c| c.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), commands.len());
    }

    #[test]
    fn test_category_subcommands() {
        let parent = category();
        let subs: Vec<&str> = parent.subcommands.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(subs, vec!["add", "edit", "delete"]);
    }
}
