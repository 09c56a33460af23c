// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ReportingStore;
use crate::commands::{expenses, range_from, sales};
use anyhow::{Context, Result};

pub fn handle(store: &ReportingStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("expenses", sub)) => export_expenses(store, sub),
        Some(("sales", sub)) => export_sales(store, sub),
        _ => Ok(()),
    }
}

fn export_expenses(store: &ReportingStore, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    let range = range_from(sub)?;
    let rows = store.list_expenses(&range, None)?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr =
                csv::Writer::from_path(out).with_context(|| format!("Create {}", out))?;
            wtr.write_record([
                "id",
                "date",
                "amount",
                "category",
                "description",
                "payment_method",
                "created_at",
                "flags",
            ])?;
            for e in &rows {
                wtr.write_record([
                    e.id.to_string(),
                    e.date.to_string(),
                    e.amount.map(|a| format!("{:.2}", a)).unwrap_or_default(),
                    e.category.clone(),
                    e.description.clone().unwrap_or_default(),
                    e.payment_method.clone().unwrap_or_default(),
                    e.created_at.to_string(),
                    expenses::flags(e),
                ])?;
            }
            wtr.flush()?;
        }
        _ => {
            std::fs::write(out, serde_json::to_string_pretty(&rows)?)
                .with_context(|| format!("Write {}", out))?;
        }
    }
    println!("Exported {} expenses to {}", rows.len(), out);
    Ok(())
}

fn export_sales(store: &ReportingStore, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    let range = range_from(sub)?;
    let rows = store.list_sales(&range, None, None)?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr =
                csv::Writer::from_path(out).with_context(|| format!("Create {}", out))?;
            wtr.write_record([
                "id",
                "date",
                "quantity",
                "product",
                "region",
                "created_at",
                "flags",
            ])?;
            for s in &rows {
                wtr.write_record([
                    s.id.to_string(),
                    s.date.to_string(),
                    s.quantity.map(|q| q.to_string()).unwrap_or_default(),
                    s.product.clone(),
                    s.region.clone(),
                    s.created_at.to_string(),
                    sales::flags(s),
                ])?;
            }
            wtr.flush()?;
        }
        _ => {
            std::fs::write(out, serde_json::to_string_pretty(&rows)?)
                .with_context(|| format!("Write {}", out))?;
        }
    }
    println!("Exported {} sales to {}", rows.len(), out);
    Ok(())
}
