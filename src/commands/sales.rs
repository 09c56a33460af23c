// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ReportingStore;
use crate::commands::range_from;
use crate::models::{NewSale, Sale};
use crate::utils::{maybe_print_json, parse_date, pretty_table};
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
    let quantity = *sub.get_one::<i64>("quantity").unwrap();
    let product = sub.get_one::<String>("product").unwrap().trim();
    let region = sub.get_one::<String>("region").unwrap().trim();

    let stored = store.append_sale(&NewSale::new(date, quantity, product, region))?;
    println!(
        "Recorded sale #{}: {} x {} in {} on {}",
        stored.id, quantity, stored.product, stored.region, stored.date
    );
    Ok(())
}

pub fn query_rows(store: &ReportingStore, sub: &clap::ArgMatches) -> Result<Vec<Sale>> {
    let range = range_from(sub)?;
    let product = sub.get_one::<String>("product").map(|s| s.as_str());
    let region = sub.get_one::<String>("region").map(|s| s.as_str());
    Ok(store.list_sales(&range, product, region)?)
}

fn list(store: &ReportingStore, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(store, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|s| {
                vec![
                    s.id.to_string(),
                    s.date.to_string(),
                    s.quantity.map(|q| q.to_string()).unwrap_or_default(),
                    s.product.clone(),
                    s.region.clone(),
                    flags(s),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Date", "Units", "Product", "Region", "Flags"], rows)
        );
    }
    Ok(())
}

pub(crate) fn flags(s: &Sale) -> String {
    s.warnings
        .iter()
        .map(|w| format!("{} {}", w.field, w.issue))
        .collect::<Vec<_>>()
        .join(", ")
}
