// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

use crate::config::ENV_DB;

fn json_flags() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print as pretty JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    ]
}

fn range_args() -> [Arg; 3] {
    [
        Arg::new("from")
            .long("from")
            .value_name("YYYY-MM-DD")
            .conflicts_with("month"),
        Arg::new("to")
            .long("to")
            .value_name("YYYY-MM-DD")
            .conflicts_with("month"),
        Arg::new("month").long("month").value_name("YYYY-MM"),
    ]
}

fn entity_arg() -> Arg {
    Arg::new("entity")
        .long("entity")
        .value_parser(["expenses", "sales"])
        .default_value("expenses")
}

pub fn build_cli() -> Command {
    Command::new("painel")
        .about("Expense and sales reporting over the gastos/vendas store")
        .version(clap::crate_version!())
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .env(ENV_DB)
                .value_name("PATH")
                .help("SQLite database file"),
        )
        .subcommand(Command::new("init").about("Create tables and indexes if missing"))
        .subcommand(
            Command::new("seed")
                .about("DESTRUCTIVE: empty both tables and load the sample rows")
                .arg(
                    Arg::new("yes")
                        .long("yes")
                        .action(ArgAction::SetTrue)
                        .help("Confirm that existing rows may be discarded"),
                ),
        )
        .subcommand(
            Command::new("expense")
                .about("Record or list expenses (gastos)")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .allow_hyphen_values(true),
                        )
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("payment").long("payment")),
                )
                .subcommand(
                    Command::new("list")
                        .args(range_args())
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("payment").long("payment"))
                        .args(json_flags()),
                ),
        )
        .subcommand(
            Command::new("sale")
                .about("Record or list sales (vendas)")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(
                            Arg::new("quantity")
                                .long("quantity")
                                .required(true)
                                .allow_hyphen_values(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("product").long("product").required(true))
                        .arg(Arg::new("region").long("region").required(true)),
                )
                .subcommand(
                    Command::new("list")
                        .args(range_args())
                        .arg(Arg::new("product").long("product"))
                        .arg(Arg::new("region").long("region"))
                        .args(json_flags()),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Aggregated views")
                .subcommand(
                    Command::new("by-category")
                        .args(range_args())
                        .args(json_flags()),
                )
                .subcommand(
                    Command::new("by-payment")
                        .args(range_args())
                        .args(json_flags()),
                )
                .subcommand(
                    Command::new("by-region")
                        .args(range_args())
                        .args(json_flags()),
                )
                .subcommand(
                    Command::new("by-product")
                        .args(range_args())
                        .args(json_flags()),
                )
                .subcommand(
                    Command::new("daily")
                        .args(range_args())
                        .arg(entity_arg())
                        .args(json_flags()),
                )
                .subcommand(
                    Command::new("monthly")
                        .args(range_args())
                        .arg(entity_arg())
                        .args(json_flags()),
                )
                .subcommand(
                    Command::new("monthly-by-category")
                        .args(range_args())
                        .args(json_flags()),
                )
                .subcommand(
                    Command::new("stats")
                        .args(range_args())
                        .args(json_flags()),
                )
                .subcommand(
                    Command::new("insights")
                        .about("Monthly average, usual payment method, trend and alerts")
                        .args(range_args())
                        .args(json_flags()),
                )
                .subcommand(
                    Command::new("recurring")
                        .about("Same category and amount seen more than once")
                        .args(range_args())
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize))
                                .default_value("5"),
                        )
                        .args(json_flags()),
                )
                .subcommand(
                    Command::new("top")
                        .args(range_args())
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize))
                                .default_value("5"),
                        )
                        .args(json_flags()),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Write listed rows to a file")
                .subcommand(
                    Command::new("expenses")
                        .args(range_args())
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .value_parser(["csv", "json"])
                                .default_value("csv"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                )
                .subcommand(
                    Command::new("sales")
                        .args(range_args())
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .value_parser(["csv", "json"])
                                .default_value("csv"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Report stored values that need attention"))
}
