// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, Row, params, params_from_iter};
use tracing::{debug, info};

use super::{ReportingStore, flag, read_amount};
use crate::error::Result;
use crate::models::{DEFAULT_PAYMENT_METHOD, DateRange, Expense, NewExpense};

const COLUMNS: &str = "id, data, valor, categoria, descricao, forma_pagamento, created_at";

fn from_row(r: &Row<'_>) -> rusqlite::Result<Expense> {
    let id: i64 = r.get(0)?;
    let (amount, issue) = read_amount(r.get_ref(2)?);
    Ok(Expense {
        id,
        date: r.get(1)?,
        amount,
        category: r.get(3)?,
        description: r.get(4)?,
        payment_method: r.get(5)?,
        created_at: r.get(6)?,
        warnings: flag("gastos", id, "amount", issue),
    })
}

fn insert(conn: &Connection, new: &NewExpense) -> rusqlite::Result<Expense> {
    conn.query_row(
        &format!(
            "INSERT INTO gastos(data, valor, categoria, descricao, forma_pagamento)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING {}",
            COLUMNS
        ),
        params![
            new.date,
            format!("{:.2}", new.amount),
            new.category,
            new.description,
            new.payment_method
        ],
        from_row,
    )
}

impl ReportingStore {
    /// Expenses dated within `range`, oldest first, ties by id.
    pub fn list_expenses(&self, range: &DateRange, category: Option<&str>) -> Result<Vec<Expense>> {
        self.filter_expenses(range, category, None)
    }

    /// [`list_expenses`](Self::list_expenses) with an extra payment method
    /// filter. Rows without a stored method match the storage default.
    pub fn filter_expenses(
        &self,
        range: &DateRange,
        category: Option<&str>,
        payment_method: Option<&str>,
    ) -> Result<Vec<Expense>> {
        let mut sql = format!("SELECT {} FROM gastos WHERE data BETWEEN ? AND ?", COLUMNS);
        let mut args: Vec<String> = vec![range.start().to_string(), range.end().to_string()];
        if let Some(cat) = category {
            sql.push_str(" AND categoria = ?");
            args.push(cat.to_string());
        }
        if let Some(method) = payment_method {
            sql.push_str(" AND COALESCE(forma_pagamento, ?) = ?");
            args.push(DEFAULT_PAYMENT_METHOD.to_string());
            args.push(method.to_string());
        }
        sql.push_str(" ORDER BY data ASC, id ASC");

        let conn = self.conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(args.iter()), from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        debug!(%range, ?category, ?payment_method, rows = rows.len(), "list_expenses");
        Ok(rows)
    }

    /// Validates, then inserts one row. Returns it as stored.
    pub fn append_expense(&self, new: &NewExpense) -> Result<Expense> {
        new.validate()?;
        let conn = self.conn()?;
        let stored = insert(&conn, new)?;
        info!(id = stored.id, date = %stored.date, category = %stored.category, "expense recorded");
        Ok(stored)
    }
}
