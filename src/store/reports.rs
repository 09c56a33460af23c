// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Aggregated views. Every report folds the same rows the matching `list_*`
//! call returns, so a report always agrees with the listing for its range.
//! Null values add nothing to a sum; negative values are summed as stored.
//! A sum that leaves the representable range fails with `Error::Overflow`.

use std::collections::BTreeMap;
use std::fmt::Display;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::ReportingStore;
use crate::error::{Error, Result};
use crate::models::{
    DEFAULT_PAYMENT_METHOD, DailyTotal, DateRange, Entity, Expense, ExpenseStats, MonthlyTotal,
};
use crate::utils::round_money;

pub(crate) fn sum_by<K: Ord + Display>(
    field: &'static str,
    rows: impl IntoIterator<Item = (K, Option<Decimal>)>,
) -> Result<BTreeMap<K, Decimal>> {
    let mut agg: BTreeMap<K, Decimal> = BTreeMap::new();
    for (k, v) in rows {
        let current = agg.get(&k).copied().unwrap_or(Decimal::ZERO);
        let next = current
            .checked_add(v.unwrap_or(Decimal::ZERO))
            .ok_or_else(|| Error::Overflow {
                field,
                group: k.to_string(),
            })?;
        agg.insert(k, next);
    }
    Ok(agg.into_iter().map(|(k, v)| (k, round_money(v))).collect())
}

fn count_by<K: Ord + Display>(
    field: &'static str,
    rows: impl IntoIterator<Item = (K, Option<i64>)>,
) -> Result<BTreeMap<K, i64>> {
    let mut agg: BTreeMap<K, i64> = BTreeMap::new();
    for (k, v) in rows {
        let current = agg.get(&k).copied().unwrap_or(0);
        let next = current
            .checked_add(v.unwrap_or(0))
            .ok_or_else(|| Error::Overflow {
                field,
                group: k.to_string(),
            })?;
        agg.insert(k, next);
    }
    Ok(agg)
}

/// Halfway between `a` and `b` without overflowing on large inputs.
fn midpoint(a: Decimal, b: Decimal) -> Decimal {
    a.checked_add(b)
        .map(|s| s / Decimal::TWO)
        // only overflows when both share a sign, so the difference fits
        .unwrap_or_else(|| a + (b - a) / Decimal::TWO)
}

impl ReportingStore {
    /// Rows dated in `range` as (date, value) pairs; sales counts widen to
    /// decimal. Also returns the name of the summed field.
    fn dated_values(
        &self,
        entity: Entity,
        range: &DateRange,
    ) -> Result<(&'static str, Vec<(NaiveDate, Option<Decimal>)>)> {
        Ok(match entity {
            Entity::Expenses => {
                let rows = self.list_expenses(range, None)?;
                ("amount", rows.into_iter().map(|e| (e.date, e.amount)).collect())
            }
            Entity::Sales => {
                let rows = self.list_sales(range, None, None)?;
                let values = rows
                    .into_iter()
                    .map(|s| (s.date, s.quantity.map(Decimal::from)))
                    .collect();
                ("quantity", values)
            }
        })
    }

    pub fn aggregate_expenses_by_category(&self, range: &DateRange) -> Result<BTreeMap<String, Decimal>> {
        let rows = self.list_expenses(range, None)?;
        category_totals(&rows)
    }

    /// Rows without a stored payment method count under the storage default.
    pub fn aggregate_expenses_by_payment_method(
        &self,
        range: &DateRange,
    ) -> Result<BTreeMap<String, Decimal>> {
        let rows = self.list_expenses(range, None)?;
        sum_by(
            "amount",
            rows.into_iter().map(|e| {
                (
                    e.payment_method
                        .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_string()),
                    e.amount,
                )
            }),
        )
    }

    pub fn aggregate_sales_by_region(&self, range: &DateRange) -> Result<BTreeMap<String, i64>> {
        let rows = self.list_sales(range, None, None)?;
        count_by("quantity", rows.into_iter().map(|s| (s.region, s.quantity)))
    }

    pub fn aggregate_sales_by_product(&self, range: &DateRange) -> Result<BTreeMap<String, i64>> {
        let rows = self.list_sales(range, None, None)?;
        count_by("quantity", rows.into_iter().map(|s| (s.product, s.quantity)))
    }

    /// One entry per day that has rows. Gaps are not filled.
    pub fn daily_totals(&self, entity: Entity, range: &DateRange) -> Result<Vec<DailyTotal>> {
        let (field, rows) = self.dated_values(entity, range)?;
        Ok(sum_by(field, rows)?
            .into_iter()
            .map(|(date, total)| DailyTotal { date, total })
            .collect())
    }

    pub fn monthly_totals(&self, entity: Entity, range: &DateRange) -> Result<Vec<MonthlyTotal>> {
        let (field, rows) = self.dated_values(entity, range)?;
        Ok(sum_by(field, rows.into_iter().map(|(d, v)| (MonthlyTotal::bucket(d), v)))?
            .into_iter()
            .map(|(month, total)| MonthlyTotal { month, total })
            .collect())
    }

    /// The `n` largest expenses; equal amounts keep date, then id, order.
    pub fn top_expenses(&self, range: &DateRange, n: usize) -> Result<Vec<Expense>> {
        let mut rows: Vec<Expense> = self
            .list_expenses(range, None)?
            .into_iter()
            .filter(|e| e.amount.is_some())
            .collect();
        // list order is (date, id) and sort_by is stable
        rows.sort_by(|a, b| b.amount.cmp(&a.amount));
        rows.truncate(n);
        Ok(rows)
    }

    /// Summary over non-null amounts; `None` when there are none.
    pub fn expense_stats(&self, range: &DateRange) -> Result<Option<ExpenseStats>> {
        let rows = self.list_expenses(range, None)?;
        let by_category = category_totals(&rows)?;
        stats_of(&rows, &by_category)
    }
}

pub(super) fn category_totals(rows: &[Expense]) -> Result<BTreeMap<String, Decimal>> {
    sum_by("amount", rows.iter().map(|e| (e.category.clone(), e.amount)))
}

pub(super) fn stats_of(
    rows: &[Expense],
    by_category: &BTreeMap<String, Decimal>,
) -> Result<Option<ExpenseStats>> {
    let mut amounts: Vec<Decimal> = rows.iter().filter_map(|e| e.amount).collect();
    if amounts.is_empty() {
        return Ok(None);
    }
    amounts.sort();
    let count = amounts.len();
    let total = amounts
        .iter()
        .try_fold(Decimal::ZERO, |acc, a| acc.checked_add(*a))
        .ok_or_else(|| Error::Overflow {
            field: "amount",
            group: "all rows".to_string(),
        })?;
    let mid = count / 2;
    let median = if count % 2 == 0 {
        midpoint(amounts[mid - 1], amounts[mid])
    } else {
        amounts[mid]
    };
    let top_category = by_category
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(k, _)| k.clone());
    Ok(Some(ExpenseStats {
        total: round_money(total),
        mean: round_money(total / Decimal::from(count)),
        median: round_money(median),
        max: round_money(amounts[count - 1]),
        min: round_money(amounts[0]),
        count,
        top_category,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn sums_round_after_adding() {
        let agg = sum_by(
            "amount",
            vec![
                ("a", Some(dec!(0.125))),
                ("a", Some(dec!(0.0))),
                ("b", None),
                ("a", Some(dec!(1.000))),
            ],
        )
        .unwrap();
        assert_eq!(agg["a"], dec!(1.12));
        assert_eq!(agg["b"], Decimal::ZERO);
    }

    #[test]
    fn counts_skip_nulls() {
        let agg = count_by(
            "quantity",
            vec![("Norte", Some(3)), ("Norte", None), ("Sul", Some(-1))],
        )
        .unwrap();
        assert_eq!(agg["Norte"], 3);
        assert_eq!(agg["Sul"], -1);
    }

    #[test]
    fn overflowing_sums_name_the_group() {
        let err = count_by("quantity", vec![("Sul", Some(i64::MAX)), ("Sul", Some(1))]).unwrap_err();
        assert_eq!(err.to_string(), "sum of quantity for 'Sul' overflows");
        let err = sum_by(
            "amount",
            vec![("Lazer", Some(Decimal::MAX)), ("Lazer", Some(Decimal::ONE))],
        )
        .unwrap_err();
        assert!(err.is_overflow());
    }

    #[test]
    fn midpoint_survives_large_values() {
        assert_eq!(midpoint(dec!(45.90), dec!(60.00)), dec!(52.95));
        assert_eq!(midpoint(Decimal::MAX, Decimal::MAX), Decimal::MAX);
    }
}
