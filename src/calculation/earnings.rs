//! Driver earnings, salary and net pay.
//!
//! Salary scales linearly with earnings up to the monthly target and is
//! capped at the base salary. Net pay is salary less approved advances and
//! approved fines, and may go negative.

use std::collections::BTreeSet;

use chrono::FixedOffset;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::PayrollConfig;
use crate::models::{Period, Shift, Transaction};

use super::balances::{driver_advances, driver_fines};
use super::saturating_sum;

/// Sums a driver's earnings over completed, approved shifts.
///
/// # Arguments
///
/// * `shifts` - The shifts snapshot
/// * `driver` - Roster name of the driver
/// * `period` - Optional calendar window on the shift's local start date
/// * `offset` - Display offset used to find local dates
///
/// # Examples
///
/// ```
/// use fleet_ledger::calculation::driver_earnings;
/// use fleet_ledger::models::{ApprovalStatus, Period, Shift, ShiftStatus};
/// use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};
/// use rust_decimal::Decimal;
///
/// let mut shift = Shift::new_started(
///     "a1".to_string(),
///     "Ijaz".to_string(),
///     "Car Max (New)".to_string(),
///     Utc.with_ymd_and_hms(2026, 1, 15, 6, 0, 0).unwrap(),
///     Decimal::ZERO,
///     100,
///     true,
/// );
/// shift.status = ShiftStatus::Completed;
/// shift.total_earnings = Decimal::from(250);
///
/// let offset = FixedOffset::east_opt(3 * 3600).unwrap();
/// assert_eq!(driver_earnings(&[shift.clone()], "Ijaz", None, offset), Decimal::from(250));
///
/// let february = Period::month_of(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
/// assert_eq!(driver_earnings(&[shift], "Ijaz", Some(february), offset), Decimal::ZERO);
/// ```
pub fn driver_earnings(
    shifts: &[Shift],
    driver: &str,
    period: Option<Period>,
    offset: FixedOffset,
) -> Decimal {
    saturating_sum(
        settled_shifts(shifts, driver, period, offset).map(|shift| shift.total_earnings),
    )
}

fn settled_shifts<'a>(
    shifts: &'a [Shift],
    driver: &'a str,
    period: Option<Period>,
    offset: FixedOffset,
) -> impl Iterator<Item = &'a Shift> + 'a {
    shifts.iter().filter(move |shift| {
        shift.driver == driver
            && shift.is_settled()
            && period.is_none_or(|p| p.contains(shift.local_start_date(offset)))
    })
}

/// Returns `min(earnings / target, 1)`, or zero when the target is zero.
pub fn target_ratio(earnings: Decimal, monthly_target: Decimal) -> Decimal {
    if monthly_target <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    earnings
        .checked_div(monthly_target)
        .map_or(Decimal::ONE, |ratio| ratio.min(Decimal::ONE))
}

/// Computes the salary earned for a given amount of earnings.
///
/// # Examples
///
/// ```
/// use fleet_ledger::calculation::salary_for_earnings;
/// use fleet_ledger::config::PayrollConfig;
/// use rust_decimal::Decimal;
///
/// let payroll = PayrollConfig {
///     base_salary: Decimal::from(2000),
///     monthly_target: Decimal::from(6000),
/// };
/// assert_eq!(salary_for_earnings(Decimal::from(3000), &payroll), Decimal::from(1000));
/// assert_eq!(salary_for_earnings(Decimal::from(9000), &payroll), Decimal::from(2000));
/// ```
pub fn salary_for_earnings(earnings: Decimal, payroll: &PayrollConfig) -> Decimal {
    payroll.base_salary * target_ratio(earnings, payroll.monthly_target)
}

/// Computes net pay: salary less advances and fines. May be negative.
pub fn net_payable(salary: Decimal, advances: Decimal, fines: Decimal) -> Decimal {
    salary.saturating_sub(advances).saturating_sub(fines)
}

/// A driver's personal dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriverHud {
    /// Roster name of the driver.
    pub driver: String,
    /// Earnings over completed, approved shifts.
    pub revenue: Decimal,
    /// Salary earned so far.
    pub salary_earned: Decimal,
    /// Share of the monthly target reached, 0 to 1.
    pub target_progress: Decimal,
    /// Earnings still needed to reach the target, never negative.
    pub left_to_target: Decimal,
    /// Distinct local dates with a completed shift.
    pub days_worked: usize,
    /// Revenue per day worked.
    pub daily_average: Decimal,
    /// Approved advances taken.
    pub advances: Decimal,
    /// Approved fines.
    pub fines: Decimal,
    /// Salary less advances and fines.
    pub net_payable: Decimal,
}

/// Builds the dashboard for one driver.
pub fn driver_hud(
    shifts: &[Shift],
    transactions: &[Transaction],
    driver: &str,
    payroll: &PayrollConfig,
    offset: FixedOffset,
) -> DriverHud {
    let revenue = driver_earnings(shifts, driver, None, offset);
    let days: BTreeSet<_> = settled_shifts(shifts, driver, None, offset)
        .map(|shift| shift.local_start_date(offset))
        .collect();
    let days_worked = days.len();

    let salary_earned = salary_for_earnings(revenue, payroll);
    let advances = driver_advances(transactions, driver);
    let fines = driver_fines(transactions, driver);
    let daily_average = if days_worked > 0 {
        revenue / Decimal::from(days_worked)
    } else {
        Decimal::ZERO
    };

    DriverHud {
        driver: driver.to_string(),
        revenue,
        salary_earned,
        target_progress: target_ratio(revenue, payroll.monthly_target),
        left_to_target: payroll
            .monthly_target
            .saturating_sub(revenue)
            .max(Decimal::ZERO),
        days_worked,
        daily_average,
        advances,
        fines,
        net_payable: net_payable(salary_earned, advances, fines),
    }
}
