// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Read-mostly access to the `gastos` and `vendas` tables.
//!
//! Every operation checks one connection out of the pool and hands it back
//! when it returns, whichever way it returns. The store keeps no other state,
//! so clones can be used from as many threads as the pool allows.

mod expenses;
mod insights;
mod quality;
mod reports;
mod sales;

use std::fmt;

use chrono::NaiveDate;
use rusqlite::types::ValueRef;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::config::StoreConfig;
use crate::db::{self, DbPool, PooledConn};
use crate::error::Result;
use crate::models::{DataQualityWarning, MAX_AMOUNT, MAX_QUANTITY, QualityIssue};

#[derive(Clone)]
pub struct ReportingStore {
    pool: DbPool,
}

impl fmt::Debug for ReportingStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.pool.state();
        f.debug_struct("ReportingStore")
            .field("max_size", &self.pool.max_size())
            .field("connections", &state.connections)
            .field("idle", &state.idle_connections)
            .finish()
    }
}

impl ReportingStore {
    /// Builds the connection pool. Does not touch the schema.
    pub fn open(cfg: &StoreConfig) -> Result<Self> {
        debug!(path = %cfg.db_path.display(), pool_size = cfg.pool_size, "opening store");
        let pool = db::build_pool(cfg)?;
        Ok(Self { pool })
    }

    fn conn(&self) -> Result<PooledConn> {
        Ok(self.pool.get()?)
    }

    /// Creates the tables and indexes if they are missing.
    pub fn ensure_schema(&self) -> Result<()> {
        let conn = self.conn()?;
        db::init_schema(&conn)?;
        info!("schema ready");
        Ok(())
    }

    /// Discards every row in both tables and loads the sample data.
    /// Only meant for bootstrapping a demo environment.
    pub fn reset_and_seed(&self) -> Result<()> {
        let mut conn = self.conn()?;
        db::init_schema(&conn)?;
        db::reset_and_seed(&mut conn)?;
        warn!(
            gastos = db::SEED_GASTOS.len(),
            vendas = db::SEED_VENDAS.len(),
            "tables reset and seeded"
        );
        Ok(())
    }
}

fn raw_text(v: ValueRef<'_>) -> String {
    match v {
        ValueRef::Null => "NULL".to_string(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
        ValueRef::Blob(b) => format!("<{} byte blob>", b.len()),
    }
}

/// Reads a stored currency value without failing the row.
pub(crate) fn read_amount(v: ValueRef<'_>) -> (Option<Decimal>, Option<QualityIssue>) {
    let parsed = match v {
        ValueRef::Null => return (None, Some(QualityIssue::Null)),
        ValueRef::Integer(i) => Some(Decimal::from(i)),
        ValueRef::Real(f) => Decimal::try_from(f).ok(),
        ValueRef::Text(t) => std::str::from_utf8(t)
            .ok()
            .and_then(|s| s.trim().parse::<Decimal>().ok()),
        ValueRef::Blob(_) => None,
    };
    match parsed {
        Some(d) if d.is_sign_negative() && !d.is_zero() => (Some(d), Some(QualityIssue::Negative)),
        Some(d) if d > MAX_AMOUNT || d.normalize().scale() > 2 => {
            (Some(d), Some(QualityIssue::OutOfRange { raw: raw_text(v) }))
        }
        Some(d) => (Some(d), None),
        None => (None, Some(QualityIssue::Unreadable { raw: raw_text(v) })),
    }
}

/// Reads a stored unit count without failing the row.
pub(crate) fn read_quantity(v: ValueRef<'_>) -> (Option<i64>, Option<QualityIssue>) {
    let parsed = match v {
        ValueRef::Null => return (None, Some(QualityIssue::Null)),
        ValueRef::Integer(i) => Some(i),
        ValueRef::Real(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Some(f as i64),
        ValueRef::Text(t) => std::str::from_utf8(t)
            .ok()
            .and_then(|s| s.trim().parse::<i64>().ok()),
        _ => None,
    };
    match parsed {
        Some(q) if q < 0 => (Some(q), Some(QualityIssue::Negative)),
        Some(q) if q > MAX_QUANTITY => (Some(q), Some(QualityIssue::OutOfRange { raw: q.to_string() })),
        Some(q) => (Some(q), None),
        None => (None, Some(QualityIssue::Unreadable { raw: raw_text(v) })),
    }
}

/// Reads a stored `YYYY-MM-DD` date without failing the row.
pub(crate) fn read_date(v: ValueRef<'_>) -> (Option<NaiveDate>, Option<QualityIssue>) {
    let parsed = match v {
        ValueRef::Null => return (None, Some(QualityIssue::Null)),
        ValueRef::Text(t) => std::str::from_utf8(t)
            .ok()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()),
        _ => None,
    };
    match parsed {
        Some(d) => (Some(d), None),
        None => (None, Some(QualityIssue::Unreadable { raw: raw_text(v) })),
    }
}

pub(crate) fn flag(
    table: &'static str,
    id: i64,
    field: &'static str,
    issue: Option<QualityIssue>,
) -> Vec<DataQualityWarning> {
    match issue {
        Some(issue) => {
            warn!(table, id, field, issue = %issue, "data quality");
            vec![DataQualityWarning { field, issue }]
        }
        None => Vec::new(),
    }
}
