//! Autocomplete handlers for Discord slash command parameters.
//!
//! Suggestions are drawn from the calling user's own categories, so one user's
//! category names never show up for another.

use crate::{
    bot::{Context, current_user},
    core::category,
};

/// Discord caps autocomplete responses at 25 choices.
const MAX_SUGGESTIONS: usize = 25;

/// Filters names by a case-insensitive substring and sorts them.
fn matching_names(names: impl IntoIterator<Item = String>, partial: &str) -> Vec<String> {
    let partial_lower = partial.to_lowercase();
    let mut matching: Vec<String> = names
        .into_iter()
        .filter(|name| name.to_lowercase().contains(&partial_lower))
        .take(MAX_SUGGESTIONS)
        .collect();

    // Sort alphabetically for consistent UX
    matching.sort();
    matching
}

/// Provides autocomplete suggestions for the caller's category names.
pub async fn autocomplete_category_name(ctx: Context<'_>, partial: &str) -> Vec<String> {
    let Ok(user) = current_user(ctx).await else {
        return Vec::new();
    };
    let Ok(categories) = category::get_categories_for_user(&ctx.data().database, user.id).await
    else {
        return Vec::new();
    };

    matching_names(categories.into_iter().map(|c| c.name), partial)
}
