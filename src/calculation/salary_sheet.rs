//! Payroll sheet across the whole roster.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::PayrollConfig;
use crate::models::{Shift, Transaction};

use super::balances::{driver_advances, driver_fines};
use super::earnings::{net_payable, salary_for_earnings, target_ratio};

/// One driver's line on the salary sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalarySheetRow {
    /// Driver name.
    pub driver: String,
    /// Completed, approved shifts.
    pub shifts: usize,
    /// Earnings over those shifts.
    pub revenue: Decimal,
    /// Share of the monthly target reached, 0 to 1.
    pub performance: Decimal,
    /// Salary earned.
    pub salary: Decimal,
    /// Approved advances.
    pub advances: Decimal,
    /// Approved fines.
    pub fines: Decimal,
    /// Salary less advances and fines.
    pub net_payable: Decimal,
    /// Revenue per completed shift.
    pub average_per_shift: Decimal,
}

/// Column totals of the salary sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SalarySheetTotals {
    /// Total completed, approved shifts.
    pub shifts: usize,
    /// Total revenue.
    pub revenue: Decimal,
    /// Total salary.
    pub salary: Decimal,
    /// Total advances.
    pub advances: Decimal,
    /// Total fines.
    pub fines: Decimal,
    /// Total net pay.
    pub net_payable: Decimal,
}

/// The payroll sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalarySheet {
    /// One row per roster driver, in roster order.
    pub rows: Vec<SalarySheetRow>,
    /// Column totals.
    pub totals: SalarySheetTotals,
}

/// Builds the salary sheet for every roster driver.
///
/// Drivers without shifts still get a row, so the sheet always has one row
/// per roster entry.
///
/// # Examples
///
/// ```
/// use fleet_ledger::calculation::salary_sheet;
/// use fleet_ledger::config::PayrollConfig;
/// use rust_decimal::Decimal;
///
/// let payroll = PayrollConfig {
///     base_salary: Decimal::from(2000),
///     monthly_target: Decimal::from(6000),
/// };
/// let sheet = salary_sheet(&[], &[], &["Sunny".to_string(), "Ijaz".to_string()], &payroll);
/// assert_eq!(sheet.rows.len(), 2);
/// assert_eq!(sheet.totals.net_payable, Decimal::ZERO);
/// ```
pub fn salary_sheet(
    shifts: &[Shift],
    transactions: &[Transaction],
    roster: &[String],
    payroll: &PayrollConfig,
) -> SalarySheet {
    let mut totals = SalarySheetTotals::default();

    let rows = roster
        .iter()
        .map(|driver| {
            let (count, revenue) = shifts
                .iter()
                .filter(|shift| shift.is_settled() && &shift.driver == driver)
                .fold((0usize, Decimal::ZERO), |(n, sum), shift| {
                    (n + 1, sum.saturating_add(shift.total_earnings))
                });

            let salary = salary_for_earnings(revenue, payroll);
            let advances = driver_advances(transactions, driver);
            let fines = driver_fines(transactions, driver);
            let row = SalarySheetRow {
                driver: driver.clone(),
                shifts: count,
                revenue,
                performance: target_ratio(revenue, payroll.monthly_target),
                salary,
                advances,
                fines,
                net_payable: net_payable(salary, advances, fines),
                average_per_shift: if count > 0 {
                    revenue / Decimal::from(count)
                } else {
                    Decimal::ZERO
                },
            };

            totals.shifts += row.shifts;
            totals.revenue = totals.revenue.saturating_add(row.revenue);
            totals.salary = totals.salary.saturating_add(row.salary);
            totals.advances = totals.advances.saturating_add(row.advances);
            totals.fines = totals.fines.saturating_add(row.fines);
            totals.net_payable = totals.net_payable.saturating_add(row.net_payable);
            row
        })
        .collect();

    SalarySheet { rows, totals }
}
