// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::types::ValueRef;
use tracing::debug;

use super::{ReportingStore, read_amount, read_date, read_quantity};
use crate::error::Result;
use crate::models::{QualityIssue, QualityIssueRow};

type Check = fn(ValueRef<'_>) -> Option<QualityIssue>;

fn amount_issue(v: ValueRef<'_>) -> Option<QualityIssue> {
    read_amount(v).1
}

fn quantity_issue(v: ValueRef<'_>) -> Option<QualityIssue> {
    read_quantity(v).1
}

impl ReportingStore {
    /// Full scan of both tables for stored values the schema lets through.
    /// A row with an unreadable date is reported, not skipped. Nothing is
    /// changed.
    pub fn quality_report(&self) -> Result<Vec<QualityIssueRow>> {
        let conn = self.conn()?;
        let mut out = Vec::new();

        let scans: [(&'static str, &'static str, &str, Check); 2] = [
            ("gastos", "amount", "SELECT id, data, valor FROM gastos ORDER BY id", amount_issue),
            ("vendas", "quantity", "SELECT id, data, vendas FROM vendas ORDER BY id", quantity_issue),
        ];

        for (table, field, sql, check) in scans {
            let mut stmt = conn.prepare(sql)?;
            let mut cur = stmt.query([])?;
            while let Some(r) = cur.next()? {
                let id: i64 = r.get(0)?;
                let (date, date_issue) = read_date(r.get_ref(1)?);
                if let Some(issue) = date_issue {
                    out.push(QualityIssueRow {
                        table,
                        id,
                        date,
                        field: "date",
                        issue,
                    });
                }
                if let Some(issue) = check(r.get_ref(2)?) {
                    out.push(QualityIssueRow {
                        table,
                        id,
                        date,
                        field,
                        issue,
                    });
                }
            }
        }
        debug!(issues = out.len(), "quality_report");
        Ok(out)
    }
}
