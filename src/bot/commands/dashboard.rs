//! Dashboard command - the monthly spending overview.
//!
//! Shows current-month spending against the previous month, the budget,
//! income and savings rate, quick stats, and a per-category budget breakdown.
//! The breakdown is split across several fields when it is long, and is cut
//! short with a count of the hidden categories once the embed would overflow.

mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, current_user},
        core::{
            report::{
                EMBED_FIELD_LIMIT, EMBED_MAX_FIELDS, EMBED_TOTAL_LIMIT, QuickStats, Trend,
                display_len, format_currency, format_percent_change, format_progress_bar,
                pack_lines, quick_stats, truncate_text,
            },
            stats::{self, MonthlyDashboard},
        },
        errors::Result,
    };
    use chrono::Local;
    use poise::serenity_prelude as serenity;
    use rust_decimal::Decimal;
    use std::fmt::Write;

    const GREEN: u32 = 0x0010_B981;
    const RED: u32 = 0x00EF_4444;

    /// Fields share the embed total with the title, description and footer.
    pub(super) const FIELDS_TEXT_LIMIT: usize = EMBED_TOTAL_LIMIT - 512;
    const CATEGORY_FIELDS: usize = 3;
    const MAX_NAME_LEN: usize = 64;

    /// Builds the embed fields for a dashboard.
    pub(super) fn dashboard_fields(
        dashboard: &MonthlyDashboard,
        quick: &QuickStats,
    ) -> Result<Vec<(String, String, bool)>> {
        let s = &dashboard.stats;
        let mut fields = Vec::new();

        let spending_trend = Trend::from_change(s.spending_change_percent);
        fields.push((
            "💸 Total Spent".to_string(),
            format!(
                "{}\n{} {} vs last month ({})",
                format_currency(s.total_spent),
                spending_trend.arrow(),
                format_percent_change(s.spending_change_percent),
                format_currency(s.previous_month_total)
            ),
            true,
        ));

        let count_trend = Trend::from_change(s.transaction_change_percent);
        fields.push((
            "🧾 Transactions".to_string(),
            format!(
                "{}\n{} {} vs last month ({})",
                s.transaction_count,
                count_trend.arrow(),
                format_percent_change(s.transaction_change_percent),
                s.previous_transaction_count
            ),
            true,
        ));

        fields.push((
            "💰 Income".to_string(),
            format!(
                "{}\nSavings rate: {:.1}%",
                format_currency(s.total_income),
                s.savings_rate
            ),
            true,
        ));

        fields.push((
            "🎯 Budget".to_string(),
            format!(
                "{} of {} remaining\n{}",
                format_currency(s.remaining_budget),
                format_currency(s.budget),
                format_progress_bar(s.budget_used_percent, None)
            ),
            false,
        ));

        let mut quick_value = format!("Daily average: {}", format_currency(quick.daily_average));
        match &quick.largest_category {
            Some(largest) => write!(
                &mut quick_value,
                "\nLargest category: {} ({})",
                largest.category,
                format_currency(largest.total)
            )?,
            None => quick_value.push_str("\nLargest category: none"),
        }
        write!(
            &mut quick_value,
            "\nBudget used: {:.1}%",
            quick.budget_used_percent
        )?;
        fields.push((
            "⚡ Quick Stats".to_string(),
            truncate_text(&quick_value, EMBED_FIELD_LIMIT),
            false,
        ));

        if !dashboard.usage.is_empty() {
            let lines: Vec<String> = dashboard
                .usage
                .iter()
                .map(|usage| {
                    let status = if usage.remaining < Decimal::ZERO {
                        "🔴"
                    } else {
                        "🟢"
                    };
                    format!(
                        "{status} **{}** {} / {} {}",
                        truncate_text(&usage.name, MAX_NAME_LEN),
                        format_currency(usage.spent),
                        format_currency(usage.budget),
                        format_progress_bar(usage.percent_used, Some(8))
                    )
                })
                .collect();

            let used: usize = fields
                .iter()
                .map(|(name, value, _)| display_len(name) + display_len(value))
                .sum();
            let room = FIELDS_TEXT_LIMIT.saturating_sub(used);
            let blocks = (room / (EMBED_FIELD_LIMIT + 32))
                .clamp(1, CATEGORY_FIELDS)
                .min(EMBED_MAX_FIELDS - fields.len());

            for (i, block) in pack_lines(&lines, EMBED_FIELD_LIMIT, blocks)
                .into_iter()
                .enumerate()
            {
                let name = if i == 0 {
                    "🗂️ Categories"
                } else {
                    "🗂️ Categories (cont.)"
                };
                fields.push((name.to_string(), block, false));
            }
        }

        Ok(fields)
    }

    /// Shows your monthly dashboard.
    #[poise::command(slash_command, prefix_command)]
    pub async fn dashboard(
        ctx: Context<'_>,
        #[description = "Month as YYYY-MM (defaults to this month)"] month: Option<String>,
    ) -> Result<()> {
        let today = Local::now().date_naive();
        let reference = match month.as_deref() {
            Some(input) => stats::parse_month(input)?,
            None => today,
        };

        let user = current_user(ctx).await?;
        let data = ctx.data();
        let dashboard =
            stats::load_monthly_stats(&data.database, user.id, reference, data.config.budget)
                .await?;
        let quick = quick_stats(&dashboard.stats, today);

        let color = if dashboard.stats.remaining_budget < Decimal::ZERO {
            RED
        } else {
            GREEN
        };
        let embed = serenity::CreateEmbed::default()
            .title(format!(
                "📊 Dashboard for {}",
                dashboard.stats.month.format("%B %Y")
            ))
            .description(format!(
                "Spending overview for {}",
                truncate_text(&user.display_name, MAX_NAME_LEN)
            ))
            .color(color)
            .fields(dashboard_fields(&dashboard, &quick)?)
            .footer(serenity::CreateEmbedFooter::new(format!(
                "LedgerBuddy v{}",
                env!("CARGO_PKG_VERSION")
            )));

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }
}

pub use inner::*;

#[cfg(test)]
mod tests {
    use super::inner::{FIELDS_TEXT_LIMIT, dashboard_fields};
    use crate::core::report::{EMBED_FIELD_LIMIT, EMBED_MAX_FIELDS, display_len, quick_stats};
    use crate::core::stats::{BudgetBasis, MonthlyDashboard, category_usage, compute_monthly_stats};
    use crate::errors::Result;
    use crate::test_utils::*;

    #[test]
    fn test_dashboard_fields_cover_every_section() -> Result<()> {
        let ledger = vec![
            expense_model(1, 150.0, "Food", date(2024, 3, 3)),
            income_model(2, 1000.0, "Salary", date(2024, 3, 1)),
            expense_model(3, 100.0, "Food", date(2024, 2, 10)),
        ];
        let categories = vec![category_model(1, "Food", Some(300.0))];
        let stats = compute_monthly_stats(
            &ledger,
            date(2024, 3, 15),
            BudgetBasis::PerCategory(&categories),
        );
        let dashboard = MonthlyDashboard {
            usage: category_usage(&stats, &categories),
            stats,
        };
        let quick = quick_stats(&dashboard.stats, date(2024, 3, 15));

        let fields = dashboard_fields(&dashboard, &quick)?;
        let names: Vec<&str> = fields.iter().map(|(name, _, _)| name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "💸 Total Spent",
                "🧾 Transactions",
                "💰 Income",
                "🎯 Budget",
                "⚡ Quick Stats",
                "🗂️ Categories"
            ]
        );

        assert!(fields[0].1.contains("$150.00"));
        assert!(fields[0].1.contains("+50.0%"));
        assert!(fields[2].1.contains("Savings rate: 85.0%"));
        assert!(fields[3].1.contains("$150.00 of $300.00 remaining"));
        assert!(fields[4].1.contains("Largest category: Food ($150.00)"));
        assert!(fields[5].1.contains("**Food** $150.00 / $300.00"));

        Ok(())
    }

    fn dashboard_for(categories: &[crate::entities::CategoryModel]) -> MonthlyDashboard {
        let ledger: Vec<_> = categories
            .iter()
            .zip(1..)
            .map(|(cat, id)| expense_model(id, 1234.56, &cat.name, date(2024, 3, 2)))
            .collect();
        let stats = compute_monthly_stats(
            &ledger,
            date(2024, 3, 15),
            BudgetBasis::PerCategory(categories),
        );
        MonthlyDashboard {
            usage: category_usage(&stats, categories),
            stats,
        }
    }

    fn assert_within_embed_limits(fields: &[(String, String, bool)]) {
        assert!(fields.len() <= EMBED_MAX_FIELDS);
        for (name, value, _) in fields {
            assert!(display_len(name) <= 256, "field name too long: {name}");
            assert!(
                display_len(value) <= EMBED_FIELD_LIMIT,
                "{name} is {} long",
                display_len(value)
            );
        }
        let total: usize = fields
            .iter()
            .map(|(name, value, _)| display_len(name) + display_len(value))
            .sum();
        assert!(total <= FIELDS_TEXT_LIMIT, "fields total {total}");
    }

    #[test]
    fn test_dashboard_fields_split_many_categories() -> Result<()> {
        let categories: Vec<_> = (1..=20)
            .map(|i| category_model(i, &format!("Category number {i:02}"), Some(5000.0)))
            .collect();
        let dashboard = dashboard_for(&categories);
        let quick = quick_stats(&dashboard.stats, date(2024, 3, 15));

        let fields = dashboard_fields(&dashboard, &quick)?;
        assert_within_embed_limits(&fields);

        let breakdown: Vec<&str> = fields
            .iter()
            .filter(|(name, _, _)| name.starts_with("🗂️ Categories"))
            .flat_map(|(_, value, _)| value.lines())
            .collect();
        assert!(fields.iter().filter(|(name, _, _)| name.starts_with("🗂️")).count() > 1);
        assert_eq!(breakdown.len(), 20);
        assert!(breakdown.iter().any(|line| line.contains("Category number 20")));

        Ok(())
    }

    #[test]
    fn test_dashboard_fields_cap_huge_breakdowns() -> Result<()> {
        let categories: Vec<_> = (1..=200)
            .map(|i| category_model(i, &format!("{i:03} {}", "x".repeat(150)), Some(10.0)))
            .collect();
        let dashboard = dashboard_for(&categories);
        let quick = quick_stats(&dashboard.stats, date(2024, 3, 15));

        let fields = dashboard_fields(&dashboard, &quick)?;
        assert_within_embed_limits(&fields);

        let last = fields.last().map(|(_, value, _)| value.as_str()).unwrap_or_default();
        assert!(last.ends_with("more"), "missing overflow note: {last}");

        Ok(())
    }
}
