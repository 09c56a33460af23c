// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ReportingStore;
use crate::utils::pretty_table;
use anyhow::Result;

pub fn handle(store: &ReportingStore) -> Result<()> {
    let issues = store.quality_report()?;
    if issues.is_empty() {
        println!("doctor: no issues found");
        return Ok(());
    }
    let rows = issues
        .into_iter()
        .map(|i| {
            vec![
                i.table.to_string(),
                i.id.to_string(),
                i.date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string()),
                i.field.to_string(),
                i.issue.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Table", "ID", "Date", "Field", "Issue"], rows)
    );
    Ok(())
}
