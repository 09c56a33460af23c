// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, params};

use crate::config::StoreConfig;
use crate::error::Result;

pub type DbPool = r2d2::Pool<SqliteConnectionManager>;
pub type PooledConn = r2d2::PooledConnection<SqliteConnectionManager>;

pub fn build_pool(cfg: &StoreConfig) -> Result<DbPool> {
    let busy = cfg.busy_timeout;
    let manager = SqliteConnectionManager::file(&cfg.db_path).with_init(move |c| {
        if let Some(t) = busy {
            c.busy_timeout(t)?;
        }
        Ok(())
    });
    let pool = r2d2::Pool::builder()
        .max_size(cfg.pool_size)
        .connection_timeout(cfg.connect_timeout)
        .build(manager)?;
    Ok(pool)
}

/// Create-if-absent. Existing tables and rows are left untouched.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS gastos(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        data TEXT NOT NULL,
        valor TEXT NOT NULL, -- DECIMAL(10,2) kept as exact text
        categoria TEXT NOT NULL,
        descricao TEXT,
        forma_pagamento TEXT DEFAULT 'Dinheiro',
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_gastos_data ON gastos(data);
    CREATE INDEX IF NOT EXISTS idx_gastos_categoria ON gastos(categoria);
    CREATE INDEX IF NOT EXISTS idx_gastos_forma_pagamento ON gastos(forma_pagamento);

    CREATE TABLE IF NOT EXISTS vendas(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        data TEXT NOT NULL,
        vendas INTEGER NOT NULL,
        produto TEXT NOT NULL,
        regiao TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_vendas_data ON vendas(data);
    CREATE INDEX IF NOT EXISTS idx_vendas_produto ON vendas(produto);
    CREATE INDEX IF NOT EXISTS idx_vendas_regiao ON vendas(regiao);
    "#,
    )?;
    Ok(())
}

// (data, valor, categoria, descricao, forma_pagamento)
pub const SEED_GASTOS: [(&str, &str, &str, &str, &str); 10] = [
    ("2024-01-02", "45.90", "Alimentação", "Supermercado", "Cartão Débito"),
    ("2024-01-03", "12.50", "Transporte", "Ônibus", "Dinheiro"),
    ("2024-01-03", "89.99", "Lazer", "Cinema e jantar", "Cartão Crédito"),
    ("2024-01-05", "150.00", "Saúde", "Consulta médica", "PIX"),
    ("2024-01-06", "32.75", "Alimentação", "Padaria", "Dinheiro"),
    ("2024-01-08", "60.00", "Transporte", "Combustível", "Cartão Crédito"),
    ("2024-01-10", "250.00", "Mensalidades", "Academia", "Débito Automático"),
    ("2024-01-11", "18.40", "Alimentação", "Lanche", "PIX"),
    ("2024-01-12", "120.00", "Roupas", "Camiseta", "Cartão Crédito"),
    ("2024-01-15", "39.90", "Lazer", "Streaming", "Débito Automático"),
];

// (data, vendas, produto, regiao)
pub const SEED_VENDAS: [(&str, i64, &str, &str); 15] = [
    ("2024-01-01", 150, "Produto A", "Norte"),
    ("2024-01-02", 200, "Produto B", "Sul"),
    ("2024-01-03", 175, "Produto C", "Centro"),
    ("2024-01-04", 300, "Produto A", "Leste"),
    ("2024-01-05", 250, "Produto B", "Oeste"),
    ("2024-01-06", 180, "Produto C", "Norte"),
    ("2024-01-07", 220, "Produto A", "Sul"),
    ("2024-01-08", 190, "Produto B", "Centro"),
    ("2024-01-09", 280, "Produto C", "Leste"),
    ("2024-01-10", 260, "Produto A", "Oeste"),
    ("2024-01-11", 165, "Produto B", "Norte"),
    ("2024-01-12", 210, "Produto C", "Sul"),
    ("2024-01-13", 185, "Produto A", "Centro"),
    ("2024-01-14", 310, "Produto B", "Leste"),
    ("2024-01-15", 240, "Produto C", "Oeste"),
];

/// Destructive: empties both tables, resets their identity sequences and
/// inserts the sample rows, all in one transaction.
pub fn reset_and_seed(conn: &mut Connection) -> Result<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(
        "DELETE FROM gastos;
         DELETE FROM vendas;
         DELETE FROM sqlite_sequence WHERE name IN ('gastos', 'vendas');",
    )?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO gastos(data, valor, categoria, descricao, forma_pagamento)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for (data, valor, categoria, descricao, forma) in SEED_GASTOS {
            stmt.execute(params![data, valor, categoria, descricao, forma])?;
        }
        let mut stmt =
            tx.prepare("INSERT INTO vendas(data, vendas, produto, regiao) VALUES (?1, ?2, ?3, ?4)")?;
        for (data, qty, produto, regiao) in SEED_VENDAS {
            stmt.execute(params![data, qty, produto, regiao])?;
        }
    }
    tx.commit()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO gastos(data, valor, categoria) VALUES ('2024-02-01', '1.00', 'Outros')",
            [],
        )
        .unwrap();
        init_schema(&conn).unwrap();
        let (n, forma): (i64, String) = conn
            .query_row("SELECT COUNT(*), MAX(forma_pagamento) FROM gastos", [], |r| {
                Ok((r.get(0)?, r.get(1)?))
            })
            .unwrap();
        assert_eq!(n, 1);
        assert_eq!(forma, "Dinheiro");
    }

    #[test]
    fn seed_restarts_identity() {
        let mut conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        reset_and_seed(&mut conn).unwrap();
        reset_and_seed(&mut conn).unwrap();
        let (n, lo, hi): (i64, i64, i64) = conn
            .query_row("SELECT COUNT(*), MIN(id), MAX(id) FROM vendas", [], |r| {
                Ok((r.get(0)?, r.get(1)?, r.get(2)?))
            })
            .unwrap();
        assert_eq!((n, lo, hi), (15, 1, 15));
        let gastos: i64 = conn
            .query_row("SELECT MAX(id) FROM gastos", [], |r| r.get(0))
            .unwrap();
        assert_eq!(gastos, SEED_GASTOS.len() as i64);
    }
}
