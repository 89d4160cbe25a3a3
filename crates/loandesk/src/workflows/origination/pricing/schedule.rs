use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::calculator::{round_currency, QuoteFigures};

/// One weekly row of the repayment schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepaymentInstallment {
    pub week_number: u32,
    pub due_date: NaiveDate,
    pub interest_portion: Decimal,
    /// Non-zero only in week one; informational, excluded from `total_due`.
    pub processing_fee_due: Decimal,
    /// Non-zero only in week one and only for new customers.
    pub registration_fee_due: Decimal,
    pub total_due: Decimal,
}

/// Expand quote figures into exactly `duration_weeks` weekly rows.
///
/// Week one falls seven days after the start date. The final week absorbs
/// any rounding remainder in both the installment and interest columns, so
/// `sum(total_due)` reconciles against `total_payable` exactly.
pub(crate) fn build_schedule(
    figures: &QuoteFigures,
    duration_weeks: u32,
    start_date: NaiveDate,
) -> Vec<RepaymentInstallment> {
    let interest_per_week = round_currency(figures.total_interest / Decimal::from(duration_weeks));
    let settled_weeks = Decimal::from(duration_weeks - 1);

    let mut entries = Vec::with_capacity(duration_weeks as usize);
    for week in 1..=duration_weeks {
        let final_week = week == duration_weeks;
        let total_due = if final_week {
            figures.total_payable - figures.weekly_installment * settled_weeks
        } else {
            figures.weekly_installment
        };
        let interest_portion = if final_week {
            figures.total_interest - interest_per_week * settled_weeks
        } else {
            interest_per_week
        };

        entries.push(RepaymentInstallment {
            week_number: week,
            due_date: start_date + Duration::days(i64::from(week) * 7),
            interest_portion,
            processing_fee_due: if week == 1 {
                figures.processing_fee
            } else {
                Decimal::ZERO
            },
            registration_fee_due: if week == 1 {
                figures.registration_fee
            } else {
                Decimal::ZERO
            },
            total_due,
        });
    }

    entries
}
