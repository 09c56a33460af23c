// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Row, params, params_from_iter};
use tracing::{debug, info};

use super::{ReportingStore, flag, read_quantity};
use crate::error::Result;
use crate::models::{DateRange, NewSale, Sale};

const COLUMNS: &str = "id, data, vendas, produto, regiao, created_at";

fn from_row(r: &Row<'_>) -> rusqlite::Result<Sale> {
    let id: i64 = r.get(0)?;
    let (quantity, issue) = read_quantity(r.get_ref(2)?);
    Ok(Sale {
        id,
        date: r.get(1)?,
        quantity,
        product: r.get(3)?,
        region: r.get(4)?,
        created_at: r.get(5)?,
        warnings: flag("vendas", id, "quantity", issue),
    })
}

impl ReportingStore {
    pub fn list_sales(
        &self,
        range: &DateRange,
        product: Option<&str>,
        region: Option<&str>,
    ) -> Result<Vec<Sale>> {
        let mut sql = format!("SELECT {} FROM vendas WHERE data BETWEEN ? AND ?", COLUMNS);
        let mut args: Vec<String> = vec![range.start().to_string(), range.end().to_string()];
        if let Some(p) = product {
            sql.push_str(" AND produto = ?");
            args.push(p.to_string());
        }
        if let Some(r) = region {
            sql.push_str(" AND regiao = ?");
            args.push(r.to_string());
        }
        sql.push_str(" ORDER BY data ASC, id ASC");

        let conn = self.conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(args.iter()), from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        debug!(%range, ?product, ?region, rows = rows.len(), "list_sales");
        Ok(rows)
    }

    pub fn append_sale(&self, new: &NewSale) -> Result<Sale> {
        new.validate()?;
        let conn = self.conn()?;
        let stored = conn.query_row(
            &format!(
                "INSERT INTO vendas(data, vendas, produto, regiao)
                 VALUES (?1, ?2, ?3, ?4)
                 RETURNING {}",
                COLUMNS
            ),
            params![new.date, new.quantity, new.product, new.region],
            from_row,
        )?;
        info!(id = stored.id, date = %stored.date, region = %stored.region, "sale recorded");
        Ok(stored)
    }
}
