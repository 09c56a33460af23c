// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ReportingStore;
use crate::commands::range_from;
use crate::models::{Expense, NewExpense};
use crate::utils::{maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::Result;

pub fn handle(store: &ReportingStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(store: &ReportingStore, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let category = sub.get_one::<String>("category").unwrap().trim();

    let mut new = NewExpense::new(date, amount, category);
    if let Some(d) = sub.get_one::<String>("description") {
        new = new.with_description(d.trim());
    }
    if let Some(p) = sub.get_one::<String>("payment") {
        new = new.with_payment_method(p.trim());
    }
    let stored = store.append_expense(&new)?;
    println!(
        "Recorded expense #{}: {:.2} on {} ({})",
        stored.id,
        new.amount,
        stored.date,
        stored.category
    );
    Ok(())
}

pub fn query_rows(store: &ReportingStore, sub: &clap::ArgMatches) -> Result<Vec<Expense>> {
    let range = range_from(sub)?;
    let category = sub.get_one::<String>("category").map(|s| s.as_str());
    let payment = sub.get_one::<String>("payment").map(|s| s.as_str());
    Ok(store.filter_expenses(&range, category, payment)?)
}

fn list(store: &ReportingStore, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(store, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|e| {
                vec![
                    e.id.to_string(),
                    e.date.to_string(),
                    e.amount.map(|a| format!("{:.2}", a)).unwrap_or_default(),
                    e.category.clone(),
                    e.payment_method.clone().unwrap_or_default(),
                    e.description.clone().unwrap_or_default(),
                    flags(e),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Amount", "Category", "Payment", "Description", "Flags"],
                rows,
            )
        );
    }
    Ok(())
}

pub(crate) fn flags(e: &Expense) -> String {
    e.warnings
        .iter()
        .map(|w| format!("{} {}", w.field, w.issue))
        .collect::<Vec<_>>()
        .join(", ")
}
