//! Report formatting and dashboard quick stats.
//!
//! This module turns [`MonthlyStats`] and transactions into display-ready
//! values. All functions are framework-agnostic and return plain strings or
//! structs that the bot layer places into embeds.
//!
//! Discord rejects embeds whose text exceeds fixed limits, so anything built
//! from user data goes through [`truncate_text`] or [`pack_lines`] first.
//! Lengths are measured in UTF-16 code units, which is never less than the
//! character count Discord enforces.

use crate::{
    core::stats::{CategoryTotal, MonthlyStats, month_end, month_start},
    entities::{TransactionKind, TransactionModel},
};
use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

/// Maximum length of an embed field value.
pub const EMBED_FIELD_LIMIT: usize = 1024;

/// Maximum length of an embed description.
pub const EMBED_DESCRIPTION_LIMIT: usize = 4096;

/// Maximum length of a plain message.
pub const MESSAGE_LIMIT: usize = 2000;

/// Maximum number of fields in one embed.
pub const EMBED_MAX_FIELDS: usize = 25;

/// Maximum combined length of all text in one embed.
pub const EMBED_TOTAL_LIMIT: usize = 6000;

/// Direction indicator for a month-over-month change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    /// Value went up
    Up,
    /// Value went down or stayed the same
    Down,
}

impl Trend {
    /// Classifies a percentage change; zero counts as down.
    #[must_use]
    pub fn from_change(change_percent: f64) -> Self {
        if change_percent > 0.0 { Self::Up } else { Self::Down }
    }

    /// Emoji arrow for embeds.
    #[must_use]
    pub const fn arrow(self) -> &'static str {
        match self {
            Self::Up => "📈",
            Self::Down => "📉",
        }
    }
}

/// Secondary figures shown under the headline stats.
#[derive(Debug, Clone, PartialEq)]
pub struct QuickStats {
    /// Spending per elapsed day of the month
    pub daily_average: Decimal,
    /// Category with the most spending, if any
    pub largest_category: Option<CategoryTotal>,
    /// Share of the budget spent, in percent
    pub budget_used_percent: f64,
}

/// Number of days of the reference month that have elapsed as of `today`.
///
/// A past month counts all its days, the current month counts up to today,
/// and a future month counts none.
#[must_use]
pub fn days_elapsed(reference: NaiveDate, today: NaiveDate) -> u32 {
    let first = month_start(reference);
    let last = month_end(reference);
    if today < first {
        0
    } else if today > last {
        last.day()
    } else {
        today.day()
    }
}

/// Derives the quick stats for a month.
#[must_use]
pub fn quick_stats(stats: &MonthlyStats, today: NaiveDate) -> QuickStats {
    let days = days_elapsed(stats.month, today);
    let daily_average = if days > 0 {
        stats.total_spent / Decimal::from(days)
    } else {
        Decimal::ZERO
    };

    let largest_category = stats
        .categories
        .iter()
        .max_by(|a, b| a.total.cmp(&b.total))
        .cloned();

    QuickStats {
        daily_average,
        largest_category,
        budget_used_percent: stats.budget_used_percent,
    }
}

/// Formats dollars with thousands separators, e.g. `$1,234.50` or `-$12.00`.
///
/// Half-cents round away from zero.
#[must_use]
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount
        .abs()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{rounded:.2}");
    let (whole, frac) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${grouped}.{frac}")
}

/// Formats a percentage change with an explicit sign, e.g. `+12.5%`.
#[must_use]
pub fn format_percent_change(change_percent: f64) -> String {
    format!("{change_percent:+.1}%")
}

/// Generates a text progress bar like `[████████░░] 80.0%`.
///
/// The bar is clamped to 0–100% but the label shows the real value, so an
/// overspent budget reads `[██████████] 140.0%`.
#[must_use]
pub fn format_progress_bar(percent: f64, bar_length: Option<usize>) -> String {
    let length = bar_length.unwrap_or(10);
    let clamped = percent.clamp(0.0, 100.0);

    // Cast safety: clamped ∈ [0, 100] and length is small
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let filled = ((clamped / 100.0) * length as f64).round() as usize;
    let empty = length.saturating_sub(filled);

    format!("[{}{}] {percent:.1}%", "█".repeat(filled), "░".repeat(empty))
}

/// One-line summary of a transaction for lists.
///
/// Expenses render as `#12 2024-01-05 | -$100.00 | Food › Groceries | Weekly shop`,
/// incomes as `#13 2024-01-01 | +$1,000.00 | Salary | January pay`.
#[must_use]
pub fn format_transaction_line(tx: &TransactionModel) -> String {
    let (sign, label) = match tx.kind {
        TransactionKind::Expense => {
            let category = tx.category.as_deref().unwrap_or("Uncategorized");
            let label = match tx.subcategory.as_deref() {
                Some(sub) => format!("{category} › {sub}"),
                None => category.to_string(),
            };
            ("-", label)
        }
        TransactionKind::Income => (
            "+",
            tx.income_source.as_deref().unwrap_or("Income").to_string(),
        ),
    };

    let mut line = format!(
        "`#{}` {} | {sign}{} | {label} | {}",
        tx.id,
        tx.date.format("%Y-%m-%d"),
        format_currency(tx.amount.abs()),
        tx.description
    );
    if let Some(remark) = tx.remark.as_deref() {
        line.push_str(&format!(" _({remark})_"));
    }
    line
}

/// Length of `text` as Discord measures it, in UTF-16 code units.
#[must_use]
pub fn display_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Shortens `text` to at most `limit` units, ending it with `…` when cut.
#[must_use]
pub fn truncate_text(text: &str, limit: usize) -> String {
    if display_len(text) <= limit {
        return text.to_string();
    }

    let budget = limit.saturating_sub(1);
    let mut used = 0;
    let mut truncated = String::new();
    for ch in text.chars() {
        used += ch.len_utf16();
        if used > budget {
            break;
        }
        truncated.push(ch);
    }
    if limit > 0 {
        truncated.push('…');
    }
    truncated
}

fn block_len(block: &[String]) -> usize {
    block.iter().map(|line| display_len(line)).sum::<usize>() + block.len().saturating_sub(1)
}

/// Packs lines into newline-joined blocks of at most `limit` units each.
///
/// At most `max_blocks` blocks are produced. Over-long lines are truncated.
/// When lines are left over, the last block ends with `…and N more` instead.
#[must_use]
pub fn pack_lines(lines: &[String], limit: usize, max_blocks: usize) -> Vec<String> {
    let mut blocks: Vec<Vec<String>> = Vec::new();
    let mut taken = 0;

    for line in lines {
        let line = truncate_text(line, limit);
        let fits = blocks
            .last()
            .is_some_and(|block| block_len(block) + 1 + display_len(&line) <= limit);

        if fits {
            if let Some(block) = blocks.last_mut() {
                block.push(line);
            }
        } else if blocks.len() < max_blocks {
            blocks.push(vec![line]);
        } else {
            break;
        }
        taken += 1;
    }

    let mut omitted = lines.len() - taken;
    if omitted > 0 {
        if let Some(block) = blocks.last_mut() {
            loop {
                let note = format!("…and {omitted} more");
                if block.is_empty() || block_len(block) + 1 + display_len(&note) <= limit {
                    block.push(truncate_text(&note, limit));
                    break;
                }
                block.pop();
                omitted += 1;
            }
        }
    }

    blocks
        .into_iter()
        .map(|block| block.join("\n"))
        .filter(|block| !block.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::stats::{BudgetBasis, compute_monthly_stats};
    use crate::test_utils::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(Decimal::ZERO), "$0.00");
        assert_eq!(format_currency(dec("5.5")), "$5.50");
        assert_eq!(format_currency(dec("999.999")), "$1,000.00");
        assert_eq!(format_currency(dec("1234.5")), "$1,234.50");
        assert_eq!(format_currency(dec("1234567.891")), "$1,234,567.89");
        assert_eq!(format_currency(dec("-12")), "-$12.00");
        assert_eq!(format_currency(dec("-0.001")), "$0.00");
        assert_eq!(format_currency(dec("0.005")), "$0.01");
        assert_eq!(format_currency(dec("100000")), "$100,000.00");
    }

    #[test]
    fn test_format_percent_change() {
        assert_eq!(format_percent_change(12.345), "+12.3%");
        assert_eq!(format_percent_change(-50.0), "-50.0%");
        assert_eq!(format_percent_change(0.0), "+0.0%");
    }

    #[test]
    fn test_trend() {
        assert_eq!(Trend::from_change(3.0), Trend::Up);
        assert_eq!(Trend::from_change(0.0), Trend::Down);
        assert_eq!(Trend::from_change(-3.0), Trend::Down);
    }

    #[test]
    fn test_format_progress_bar() {
        assert_eq!(format_progress_bar(50.0, Some(10)), "[█████░░░░░] 50.0%");
        assert_eq!(format_progress_bar(0.0, Some(4)), "[░░░░] 0.0%");
        assert_eq!(format_progress_bar(140.0, Some(10)), "[██████████] 140.0%");
    }

    #[test]
    fn test_days_elapsed() {
        let today = date(2024, 3, 12);
        assert_eq!(days_elapsed(date(2024, 3, 1), today), 12);
        assert_eq!(days_elapsed(date(2024, 2, 1), today), 29);
        assert_eq!(days_elapsed(date(2024, 4, 1), today), 0);
    }

    #[test]
    fn test_quick_stats() {
        let ledger = vec![
            expense_model(1, 40.0, "Food", date(2024, 3, 1)),
            expense_model(2, 80.0, "Rent", date(2024, 3, 2)),
        ];
        let stats =
            compute_monthly_stats(&ledger, date(2024, 3, 10), BudgetBasis::Global(money(240.0)));

        let quick = quick_stats(&stats, date(2024, 3, 10));
        assert_eq!(quick.daily_average, money(12.0));
        assert_eq!(quick.largest_category.map(|c| c.category), Some("Rent".to_string()));
        assert_eq!(quick.budget_used_percent, 50.0);

        let empty =
            compute_monthly_stats(&[], date(2024, 3, 10), BudgetBasis::Global(Decimal::ZERO));
        let quick = quick_stats(&empty, date(2024, 3, 10));
        assert_eq!(quick.daily_average, Decimal::ZERO);
        assert!(quick.largest_category.is_none());
    }

    #[test]
    fn test_format_transaction_line() {
        let mut expense = expense_model(12, 100.0, "Food", date(2024, 1, 5));
        expense.subcategory = Some("Groceries".to_string());
        assert_eq!(
            format_transaction_line(&expense),
            "`#12` 2024-01-05 | -$100.00 | Food › Groceries | Test expense"
        );

        let mut income = income_model(13, 1000.0, "Salary", date(2024, 1, 1));
        income.remark = Some("bonus included".to_string());
        assert_eq!(
            format_transaction_line(&income),
            "`#13` 2024-01-01 | +$1,000.00 | Salary | Test income _(bonus included)_"
        );
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("exactly10!", 10), "exactly10!");
        assert_eq!(truncate_text("this is too long", 8), "this is…");
        assert_eq!(display_len(&truncate_text(&"🟢".repeat(10), 7)), 7);
    }

    #[test]
    fn test_pack_lines_splits_into_blocks() {
        let lines: Vec<String> = (0..6).map(|i| format!("line {i}")).collect();

        let blocks = pack_lines(&lines, 13, 3);
        assert_eq!(blocks, vec!["line 0\nline 1", "line 2\nline 3", "line 4\nline 5"]);
        assert!(blocks.iter().all(|b| display_len(b) <= 13));

        assert_eq!(pack_lines(&lines, 100, 1), vec![lines.join("\n")]);
        assert!(pack_lines(&[], 100, 3).is_empty());
    }

    #[test]
    fn test_pack_lines_reports_omitted_lines() {
        let lines: Vec<String> = (0..40).map(|i| format!("Category number {i:02}")).collect();

        let blocks = pack_lines(&lines, 100, 2);
        assert_eq!(blocks.len(), 2);
        assert!(blocks.iter().all(|b| display_len(b) <= 100));
        assert!(blocks[1].ends_with("more"));

        let shown = blocks.iter().flat_map(|b| b.lines()).filter(|l| !l.starts_with('…')).count();
        let note = blocks[1].lines().last().unwrap_or_default();
        assert_eq!(note, format!("…and {} more", 40 - shown));
    }

    #[test]
    fn test_pack_lines_truncates_long_lines() {
        let lines = vec!["x".repeat(5000), "tail".to_string()];
        let blocks = pack_lines(&lines, EMBED_FIELD_LIMIT, 3);
        assert_eq!(blocks.len(), 2);
        assert_eq!(display_len(&blocks[0]), EMBED_FIELD_LIMIT);
        assert_eq!(blocks[1], "tail");
    }
}
