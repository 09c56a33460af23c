// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ReportingStore;
use crate::commands::range_from;
use crate::models::Entity;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use anyhow::Result;
use rust_decimal::Decimal;

pub fn handle(store: &ReportingStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("by-category", sub)) => by_category(store, sub)?,
        Some(("by-payment", sub)) => by_payment(store, sub)?,
        Some(("by-region", sub)) => by_region(store, sub)?,
        Some(("by-product", sub)) => by_product(store, sub)?,
        Some(("daily", sub)) => daily(store, sub)?,
        Some(("monthly", sub)) => monthly(store, sub)?,
        Some(("monthly-by-category", sub)) => monthly_by_category(store, sub)?,
        Some(("stats", sub)) => stats(store, sub)?,
        Some(("insights", sub)) => insights(store, sub)?,
        Some(("recurring", sub)) => recurring(store, sub)?,
        Some(("top", sub)) => top(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn entity(sub: &clap::ArgMatches) -> Result<Entity> {
    let raw = sub
        .get_one::<String>("entity")
        .map(|s| s.as_str())
        .unwrap_or("expenses");
    Ok(raw.parse::<Entity>()?)
}

fn by_category(store: &ReportingStore, sub: &clap::ArgMatches) -> Result<()> {
    let range = range_from(sub)?;
    let agg = store.aggregate_expenses_by_category(&range)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &agg)? {
        let mut items: Vec<_> = agg.into_iter().collect();
        items.sort_by(|a, b| b.1.cmp(&a.1));
        let rows = items
            .into_iter()
            .map(|(cat, amt)| vec![cat, format!("{:.2}", amt)])
            .collect();
        println!("{}", pretty_table(&["Category", "Spent"], rows));
    }
    Ok(())
}

fn by_payment(store: &ReportingStore, sub: &clap::ArgMatches) -> Result<()> {
    let range = range_from(sub)?;
    let agg = store.aggregate_expenses_by_payment_method(&range)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &agg)? {
        let total = agg
            .values()
            .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v));
        let rows = agg
            .into_iter()
            .map(|(method, amt)| {
                let share = total
                    .filter(|t| !t.is_zero())
                    .and_then(|t| amt.checked_div(t))
                    .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
                    .map(|p| format!("{}%", p.round_dp(1)))
                    .unwrap_or_else(|| "-".to_string());
                vec![method, format!("{:.2}", amt), share]
            })
            .collect();
        println!("{}", pretty_table(&["Payment", "Spent", "Share"], rows));
    }
    Ok(())
}

fn by_region(store: &ReportingStore, sub: &clap::ArgMatches) -> Result<()> {
    let range = range_from(sub)?;
    let agg = store.aggregate_sales_by_region(&range)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &agg)? {
        let rows = agg
            .into_iter()
            .map(|(region, qty)| vec![region, qty.to_string()])
            .collect();
        println!("{}", pretty_table(&["Region", "Units"], rows));
    }
    Ok(())
}

fn by_product(store: &ReportingStore, sub: &clap::ArgMatches) -> Result<()> {
    let range = range_from(sub)?;
    let agg = store.aggregate_sales_by_product(&range)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &agg)? {
        let rows = agg
            .into_iter()
            .map(|(product, qty)| vec![product, qty.to_string()])
            .collect();
        println!("{}", pretty_table(&["Product", "Units"], rows));
    }
    Ok(())
}

fn daily(store: &ReportingStore, sub: &clap::ArgMatches) -> Result<()> {
    let range = range_from(sub)?;
    let data = store.daily_totals(entity(sub)?, &range)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .into_iter()
            .map(|d| vec![d.date.to_string(), d.total.to_string()])
            .collect();
        println!("{}", pretty_table(&["Date", "Total"], rows));
    }
    Ok(())
}

fn monthly(store: &ReportingStore, sub: &clap::ArgMatches) -> Result<()> {
    let range = range_from(sub)?;
    let data = store.monthly_totals(entity(sub)?, &range)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .into_iter()
            .map(|m| vec![m.month, m.total.to_string()])
            .collect();
        println!("{}", pretty_table(&["Month", "Total"], rows));
    }
    Ok(())
}

fn monthly_by_category(store: &ReportingStore, sub: &clap::ArgMatches) -> Result<()> {
    let range = range_from(sub)?;
    let data = store.monthly_totals_by_category(&range)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .into_iter()
            .map(|m| vec![m.month, m.category, format!("{:.2}", m.total)])
            .collect();
        println!("{}", pretty_table(&["Month", "Category", "Spent"], rows));
    }
    Ok(())
}

fn insights(store: &ReportingStore, sub: &clap::ArgMatches) -> Result<()> {
    let range = range_from(sub)?;
    let Some(i) = store.spending_insights(&range)? else {
        println!("No expenses between {} and {}", range.start(), range.end());
        return Ok(());
    };
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &i)? {
        let mut rows = vec![
            vec!["Monthly average".into(), fmt_money(&i.monthly_average)],
            vec!["Usual payment".into(), i.preferred_payment_method.clone()],
            vec!["Trend".into(), i.trend.to_string()],
        ];
        for alert in &i.alerts {
            rows.push(vec!["Alert".into(), alert.to_string()]);
        }
        println!("{}", pretty_table(&["Insight", "Value"], rows));
    }
    Ok(())
}

fn recurring(store: &ReportingStore, sub: &clap::ArgMatches) -> Result<()> {
    let range = range_from(sub)?;
    let limit = *sub.get_one::<usize>("limit").unwrap_or(&5);
    let data = store.recurring_expenses(&range, limit)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .into_iter()
            .map(|r| {
                vec![
                    r.category,
                    format!("{:.2}", r.amount),
                    r.occurrences.to_string(),
                    r.last_date.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "Amount", "Times", "Last seen"], rows)
        );
    }
    Ok(())
}

fn stats(store: &ReportingStore, sub: &clap::ArgMatches) -> Result<()> {
    let range = range_from(sub)?;
    let Some(s) = store.expense_stats(&range)? else {
        println!("No expenses between {} and {}", range.start(), range.end());
        return Ok(());
    };
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        let rows = vec![
            vec!["Total".into(), fmt_money(&s.total)],
            vec!["Mean".into(), fmt_money(&s.mean)],
            vec!["Median".into(), fmt_money(&s.median)],
            vec!["Largest".into(), fmt_money(&s.max)],
            vec!["Smallest".into(), fmt_money(&s.min)],
            vec!["Expenses".into(), s.count.to_string()],
            vec![
                "Top category".into(),
                s.top_category.unwrap_or_else(|| "N/A".into()),
            ],
        ];
        println!("{}", pretty_table(&["Metric", "Value"], rows));
    }
    Ok(())
}

fn top(store: &ReportingStore, sub: &clap::ArgMatches) -> Result<()> {
    let range = range_from(sub)?;
    let limit = *sub.get_one::<usize>("limit").unwrap_or(&5);
    let data = store.top_expenses(&range, limit)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .into_iter()
            .map(|e| {
                vec![
                    e.date.to_string(),
                    e.category,
                    e.amount.map(|a| format!("{:.2}", a)).unwrap_or_default(),
                    e.description.unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Category", "Amount", "Description"], rows)
        );
    }
    Ok(())
}
