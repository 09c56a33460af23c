// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError, Violations};

/// Storage default for `gastos.forma_pagamento`.
pub const DEFAULT_PAYMENT_METHOD: &str = "Dinheiro";

pub const MAX_LABEL_LEN: usize = 50;
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// Upper bound of a DECIMAL(10,2) column.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

/// Upper bound of a 32-bit INTEGER column.
pub const MAX_QUANTITY: i64 = i32::MAX as i64;

/// Dates are stored as `YYYY-MM-DD` text and compared as text, which only
/// orders correctly for four-digit years.
pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

/// Inclusive calendar range. `start <= end` always holds and both ends fall
/// in years `MIN_YEAR..=MAX_YEAR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        let mut v = Violations::default();
        if start > end {
            v.push("date_range", format!("start {} is after end {}", start, end));
        }
        for (field, date) in [("start", start), ("end", end)] {
            if !(MIN_YEAR..=MAX_YEAR).contains(&date.year()) {
                v.push(
                    field,
                    format!("{} is outside years {}..={}", date, MIN_YEAR, MAX_YEAR),
                );
            }
        }
        v.into_result()?;
        Ok(Self { start, end })
    }

    pub fn day(date: NaiveDate) -> Result<Self> {
        Self::new(date, date)
    }

    pub fn month(year: i32, month: u32) -> Result<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            ValidationError::single("month", format!("{:04}-{:02} is not a month", year, month))
        })?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        };
        let end = next
            .and_then(|d| d.pred_opt())
            .ok_or_else(|| ValidationError::single("month", "out of calendar range"))?;
        Self::new(start, end)
    }

    pub fn year(year: i32) -> Result<Self> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1);
        let end = NaiveDate::from_ymd_opt(year, 12, 31);
        match (start, end) {
            (Some(start), Some(end)) => Self::new(start, end),
            _ => Err(ValidationError::single("year", format!("{} is out of range", year)).into()),
        }
    }

    /// `today` and the `days` days before it.
    pub fn last_days(today: NaiveDate, days: u64) -> Result<Self> {
        let start = today
            .checked_sub_days(Days::new(days))
            .ok_or_else(|| ValidationError::single("days", "reaches before the calendar start"))?;
        Self::new(start, today)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Which table a bucketed total is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Entity {
    Expenses,
    Sales,
}

impl FromStr for Entity {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "expenses" | "gastos" => Ok(Entity::Expenses),
            "sales" | "vendas" => Ok(Entity::Sales),
            other => Err(ValidationError::single(
                "entity",
                format!("unknown entity '{}' (use expenses|sales)", other),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QualityIssue {
    Null,
    Negative,
    /// Readable, but larger or more precise than the column allows.
    OutOfRange { raw: String },
    Unreadable { raw: String },
}

impl fmt::Display for QualityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityIssue::Null => write!(f, "null"),
            QualityIssue::Negative => write!(f, "negative"),
            QualityIssue::OutOfRange { raw } => write!(f, "out of range '{}'", raw),
            QualityIssue::Unreadable { raw } => write!(f, "unreadable '{}'", raw),
        }
    }
}

/// A stored value the schema allows but the domain does not expect.
/// Reported alongside the row, never corrected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataQualityWarning {
    pub field: &'static str,
    pub issue: QualityIssue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expense {
    pub id: i64,
    pub date: NaiveDate,
    pub amount: Option<Decimal>,
    pub category: String,
    pub description: Option<String>,
    pub payment_method: Option<String>,
    pub created_at: NaiveDateTime,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<DataQualityWarning>,
}

impl Expense {
    pub fn is_flagged(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sale {
    pub id: i64,
    pub date: NaiveDate,
    pub quantity: Option<i64>,
    pub product: String,
    pub region: String,
    pub created_at: NaiveDateTime,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<DataQualityWarning>,
}

impl Sale {
    pub fn is_flagged(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub category: String,
    pub description: Option<String>,
    pub payment_method: String,
}

impl NewExpense {
    pub fn new(date: NaiveDate, amount: Decimal, category: impl Into<String>) -> Self {
        Self {
            date,
            amount,
            category: category.into(),
            description: None,
            payment_method: DEFAULT_PAYMENT_METHOD.to_string(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_payment_method(mut self, method: impl Into<String>) -> Self {
        self.payment_method = method.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        let mut v = Violations::default();
        check_label(&mut v, "category", &self.category);
        check_label(&mut v, "payment_method", &self.payment_method);
        if let Some(d) = &self.description {
            if d.chars().count() > MAX_DESCRIPTION_LEN {
                v.push(
                    "description",
                    format!("exceeds {} characters", MAX_DESCRIPTION_LEN),
                );
            }
        }
        if self.amount.is_sign_negative() && !self.amount.is_zero() {
            v.push("amount", "must not be negative");
        } else if self.amount > MAX_AMOUNT {
            v.push("amount", format!("exceeds {}", MAX_AMOUNT));
        }
        if self.amount.normalize().scale() > 2 {
            v.push("amount", "has more than 2 fractional digits");
        }
        v.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSale {
    pub date: NaiveDate,
    pub quantity: i64,
    pub product: String,
    pub region: String,
}

impl NewSale {
    pub fn new(
        date: NaiveDate,
        quantity: i64,
        product: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            date,
            quantity,
            product: product.into(),
            region: region.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let mut v = Violations::default();
        if self.quantity < 0 {
            v.push("quantity", "must not be negative");
        }
        check_label(&mut v, "product", &self.product);
        check_label(&mut v, "region", &self.region);
        v.into_result()
    }
}

fn check_label(v: &mut Violations, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        v.push(field, "is required");
    } else if value.chars().count() > MAX_LABEL_LEN {
        v.push(field, format!("exceeds {} characters", MAX_LABEL_LEN));
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTotal {
    /// YYYY-MM
    pub month: String,
    pub total: Decimal,
}

impl MonthlyTotal {
    pub(crate) fn bucket(date: NaiveDate) -> String {
        format!("{:04}-{:02}", date.year(), date.month())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseStats {
    pub total: Decimal,
    pub mean: Decimal,
    pub median: Decimal,
    pub max: Decimal,
    pub min: Decimal,
    pub count: usize,
    pub top_category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyCategoryTotal {
    /// YYYY-MM
    pub month: String,
    pub category: String,
    pub total: Decimal,
}

/// Same category and amount seen more than once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecurringExpense {
    pub category: String,
    pub amount: Decimal,
    pub occurrences: usize,
    pub last_date: NaiveDate,
}

/// Direction of the last two monthly totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpendingTrend {
    Rising,
    Falling,
    Steady,
}

impl fmt::Display for SpendingTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SpendingTrend::Rising => "rising",
            SpendingTrend::Falling => "falling",
            SpendingTrend::Steady => "steady",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpendingAlert {
    /// The largest expense is more than three times the mean.
    Outlier { amount: Decimal, mean: Decimal },
    /// One category holds more than 60% of the total. `share` is a percentage.
    Concentrated { category: String, share: Decimal },
}

impl fmt::Display for SpendingAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpendingAlert::Outlier { amount, mean } => {
                write!(f, "unusually large expense {:.2} (mean {:.2})", amount, mean)
            }
            SpendingAlert::Concentrated { category, share } => {
                write!(f, "spending concentrated in {} ({}%)", category, share)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpendingInsights {
    pub monthly_average: Decimal,
    pub preferred_payment_method: String,
    pub trend: SpendingTrend,
    pub alerts: Vec<SpendingAlert>,
}

/// One finding of the data-quality scan. `date` is `None` when the stored
/// date itself could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QualityIssueRow {
    pub table: &'static str,
    pub id: i64,
    pub date: Option<NaiveDate>,
    pub field: &'static str,
    pub issue: QualityIssue,
}
