// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ReportingStore;
use anyhow::{Result, bail};

pub fn handle(store: &ReportingStore, sub: &clap::ArgMatches) -> Result<()> {
    if !sub.get_flag("yes") {
        bail!("seed discards every gastos and vendas row; re-run with --yes to confirm");
    }
    store.reset_and_seed()?;
    println!("Tables reset and sample data loaded");
    Ok(())
}
