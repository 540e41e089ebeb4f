//! Calculation logic for the fleet ledger engine.
//!
//! This module contains the pure, read-only projections computed from a
//! snapshot of the shifts and transactions tables: ledger balances and the
//! finance summary, driver earnings with salary and net pay, the
//! leaderboard, the duty timer, period reports, the salary sheet, the fleet
//! radar and the history logs. Nothing here touches the store.

mod balances;
mod duty;
mod earnings;
mod fleet_radar;
mod history;
mod leaderboard;
mod period_report;
mod salary_sheet;

use rust_decimal::Decimal;

pub use balances::{
    FinanceSummary, LedgerBalances, driver_advances, driver_fines, finance_summary,
    ledger_balances,
};
pub use duty::{DutyStatus, duty_elapsed};
pub use earnings::{
    DriverHud, driver_earnings, driver_hud, net_payable, salary_for_earnings, target_ratio,
};
pub use fleet_radar::{RadarEntry, fleet_radar};
pub use history::{shift_history, transaction_history};
pub use leaderboard::{LeaderboardEntry, leaderboard};
pub use period_report::{PeriodReport, format_hours_minutes, period_report};
pub use salary_sheet::{SalarySheet, SalarySheetRow, SalarySheetTotals, salary_sheet};

/// Sums amounts or hours, clamping at the `Decimal` bounds.
///
/// Legacy cells are only checked for sign, so a corrupt value near
/// `Decimal::MAX` must not abort a report.
pub(crate) fn saturating_sum(values: impl IntoIterator<Item = Decimal>) -> Decimal {
    values.into_iter().fold(Decimal::ZERO, Decimal::saturating_add)
}
