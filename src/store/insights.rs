// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Spending patterns over the expense listing: month-by-category totals,
//! recurring amounts, and a short profile with alerts.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use super::ReportingStore;
use super::reports::{category_totals, stats_of, sum_by};
use crate::error::{Error, Result};
use crate::models::{
    DEFAULT_PAYMENT_METHOD, DateRange, Expense, MonthlyCategoryTotal, MonthlyTotal,
    RecurringExpense, SpendingAlert, SpendingInsights, SpendingTrend,
};
use crate::utils::round_money;

const OUTLIER_FACTOR: Decimal = Decimal::from_parts(3, 0, 0, false, 0);
/// 0.6
const CONCENTRATION_SHARE: Decimal = Decimal::from_parts(6, 0, 0, false, 1);

#[derive(PartialEq, Eq, PartialOrd, Ord)]
struct MonthCategory {
    month: String,
    category: String,
}

impl fmt::Display for MonthCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month, self.category)
    }
}

fn month_totals(rows: &[Expense]) -> Result<BTreeMap<String, Decimal>> {
    sum_by(
        "amount",
        rows.iter().map(|e| (MonthlyTotal::bucket(e.date), e.amount)),
    )
}

fn preferred_payment_method(rows: &[Expense]) -> String {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for e in rows {
        let method = e.payment_method.as_deref().unwrap_or(DEFAULT_PAYMENT_METHOD);
        *counts.entry(method).or_insert(0) += 1;
    }
    // ties go to the alphabetically first method
    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(m, _)| m.to_string())
        .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_string())
}

fn trend(months: &BTreeMap<String, Decimal>) -> SpendingTrend {
    let mut last_two = months.values().rev();
    match (last_two.next(), last_two.next()) {
        (Some(last), Some(prev)) if last > prev => SpendingTrend::Rising,
        (Some(last), Some(prev)) if last < prev => SpendingTrend::Falling,
        _ => SpendingTrend::Steady,
    }
}

fn concentration(by_category: &BTreeMap<String, Decimal>) -> Option<SpendingAlert> {
    let total = by_category
        .values()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))?;
    if total <= Decimal::ZERO {
        return None;
    }
    let (category, top) = by_category
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))?;
    let ratio = top.checked_div(total)?;
    if ratio <= CONCENTRATION_SHARE {
        return None;
    }
    Some(SpendingAlert::Concentrated {
        category: category.clone(),
        share: ratio.checked_mul(Decimal::ONE_HUNDRED)?.round_dp(1),
    })
}

impl ReportingStore {
    /// Expense totals per (month, category), ordered by month then category.
    pub fn monthly_totals_by_category(&self, range: &DateRange) -> Result<Vec<MonthlyCategoryTotal>> {
        let rows = self.list_expenses(range, None)?;
        let agg = sum_by(
            "amount",
            rows.into_iter().map(|e| {
                let key = MonthCategory {
                    month: MonthlyTotal::bucket(e.date),
                    category: e.category,
                };
                (key, e.amount)
            }),
        )?;
        Ok(agg
            .into_iter()
            .map(|(k, total)| MonthlyCategoryTotal {
                month: k.month,
                category: k.category,
                total,
            })
            .collect())
    }

    /// Amounts seen at least twice within one category, most frequent first,
    /// at most `limit` entries. Equal counts keep category, then amount, order.
    pub fn recurring_expenses(&self, range: &DateRange, limit: usize) -> Result<Vec<RecurringExpense>> {
        let rows = self.list_expenses(range, None)?;
        let mut seen: BTreeMap<(String, Decimal), (usize, NaiveDate)> = BTreeMap::new();
        for e in rows {
            let Some(amount) = e.amount else { continue };
            let slot = seen.entry((e.category, amount)).or_insert((0, e.date));
            slot.0 += 1;
            slot.1 = slot.1.max(e.date);
        }
        let mut out: Vec<RecurringExpense> = seen
            .into_iter()
            .filter(|(_, (occurrences, _))| *occurrences >= 2)
            .map(|((category, amount), (occurrences, last_date))| RecurringExpense {
                category,
                amount,
                occurrences,
                last_date,
            })
            .collect();
        out.sort_by(|a, b| b.occurrences.cmp(&a.occurrences));
        out.truncate(limit);
        debug!(%range, found = out.len(), "recurring_expenses");
        Ok(out)
    }

    /// Monthly average, usual payment method, direction of the last two
    /// months and alerts. `None` when no expense in `range` has an amount.
    pub fn spending_insights(&self, range: &DateRange) -> Result<Option<SpendingInsights>> {
        let rows = self.list_expenses(range, None)?;
        let by_category = category_totals(&rows)?;
        let Some(stats) = stats_of(&rows, &by_category)? else {
            return Ok(None);
        };

        let months = month_totals(&rows)?;
        let months_total = months
            .values()
            .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))
            .ok_or_else(|| Error::Overflow {
                field: "amount",
                group: "monthly totals".to_string(),
            })?;
        let monthly_average = round_money(months_total / Decimal::from(months.len()));

        let mut alerts = Vec::new();
        if let Some(limit) = stats.mean.checked_mul(OUTLIER_FACTOR) {
            if stats.max > limit {
                alerts.push(SpendingAlert::Outlier {
                    amount: stats.max,
                    mean: stats.mean,
                });
            }
        }
        alerts.extend(concentration(&by_category));

        Ok(Some(SpendingInsights {
            monthly_average,
            preferred_payment_method: preferred_payment_method(&rows),
            trend: trend(&months),
            alerts,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn totals(values: &[(&str, Decimal)]) -> BTreeMap<String, Decimal> {
        values.iter().map(|(m, v)| (m.to_string(), *v)).collect()
    }

    #[test]
    fn trend_compares_the_last_two_totals() {
        assert_eq!(
            trend(&totals(&[("2024-01", dec!(10)), ("2024-02", dec!(12))])),
            SpendingTrend::Rising
        );
        assert_eq!(
            trend(&totals(&[
                ("2023-12", dec!(1)),
                ("2024-01", dec!(10)),
                ("2024-02", dec!(9))
            ])),
            SpendingTrend::Falling
        );
        assert_eq!(trend(&totals(&[("2024-01", dec!(10))])), SpendingTrend::Steady);
    }

    #[test]
    fn concentration_needs_more_than_sixty_percent() {
        let split = totals(&[("Lazer", dec!(60)), ("Outros", dec!(40))]);
        assert_eq!(concentration(&split), None);
        let heavy = totals(&[("Lazer", dec!(61)), ("Outros", dec!(39))]);
        assert_eq!(
            concentration(&heavy),
            Some(SpendingAlert::Concentrated {
                category: "Lazer".into(),
                share: dec!(61.0),
            })
        );
        assert_eq!(concentration(&totals(&[("Lazer", dec!(0))])), None);
    }
}
