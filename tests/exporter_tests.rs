// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::seeded_store;
use painel::{cli, commands::exporter};
use tempfile::tempdir;

fn run_export(store: &painel::ReportingStore, args: &[&str]) {
    let mut argv = vec!["painel", "export"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(store, export_m).unwrap();
    } else {
        panic!("no export subcommand");
    }
}

#[test]
fn export_expenses_writes_csv_in_list_order() {
    let (_dir, store) = seeded_store();
    let out = tempdir().unwrap();
    let path = out.path().join("gastos.csv");
    let path_str = path.to_string_lossy().to_string();

    run_export(
        &store,
        &["expenses", "--from", "2024-01-01", "--to", "2024-01-03", "--out", &path_str],
    );

    let mut rdr = csv::Reader::from_path(&path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(&headers[0], "id");
    assert_eq!(&headers[2], "amount");
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(&rows[0][1], "2024-01-02");
    assert_eq!(&rows[0][2], "45.90");
    assert_eq!(&rows[2][3], "Lazer");
    assert_eq!(&rows[2][7], "");
}

#[test]
fn export_sales_writes_pretty_json() {
    let (_dir, store) = seeded_store();
    let out = tempdir().unwrap();
    let path = out.path().join("vendas.json");
    let path_str = path.to_string_lossy().to_string();

    run_export(
        &store,
        &["sales", "--month", "2024-01", "--format", "json", "--out", &path_str],
    );

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.starts_with("[\n"));
    let v: serde_json::Value = serde_json::from_str(&contents).unwrap();
    let arr = v.as_array().unwrap();
    assert_eq!(arr.len(), 15);
    assert_eq!(arr[0]["region"], "Norte");
    assert_eq!(arr[0]["quantity"], 150);
    assert!(arr[0].get("warnings").is_none());
}
