// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use chrono::NaiveDate;
use painel::ReportingStore;
use painel::config::StoreConfig;
use painel::models::DateRange;
use tempfile::{TempDir, tempdir};

pub fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn range(a: &str, b: &str) -> DateRange {
    DateRange::new(d(a), d(b)).unwrap()
}

pub fn january() -> DateRange {
    DateRange::month(2024, 1).unwrap()
}

/// Empty schema in a fresh on-disk database. Keep the TempDir alive.
pub fn empty_store() -> (TempDir, ReportingStore) {
    let dir = tempdir().unwrap();
    let cfg = StoreConfig::new(dir.path().join("painel.sqlite"));
    let store = ReportingStore::open(&cfg).unwrap();
    store.ensure_schema().unwrap();
    (dir, store)
}

pub fn seeded_store() -> (TempDir, ReportingStore) {
    let (dir, store) = empty_store();
    store.reset_and_seed().unwrap();
    (dir, store)
}
