//! Read-only projections over a fresh snapshot.
//!
//! Each method loads the tables once and hands them to the pure functions in
//! [`crate::calculation`]. Methods scoped to one driver reject names that are
//! not on the roster.

use rust_decimal::Decimal;

use crate::calculation::{
    self, DriverHud, DutyStatus, FinanceSummary, LeaderboardEntry, LedgerBalances, PeriodReport,
    RadarEntry, SalarySheet,
};
use crate::error::FleetResult;
use crate::models::{Period, ReportTarget, Shift, Transaction};

use super::FleetEngine;

impl FleetEngine {
    /// Sums settled earnings for a driver, optionally within a period.
    pub fn driver_earnings(&self, driver: &str, period: Option<Period>) -> FleetResult<Decimal> {
        self.require_driver("driver", driver)?;
        let shifts = self.repository().load_shifts()?;
        Ok(calculation::driver_earnings(
            &shifts,
            driver,
            period,
            self.config().display_offset(),
        ))
    }

    /// Salary earned so far against the monthly target.
    pub fn salary_earned(&self, driver: &str) -> FleetResult<Decimal> {
        let earnings = self.driver_earnings(driver, None)?;
        Ok(calculation::salary_for_earnings(
            earnings,
            self.config().payroll(),
        ))
    }

    /// Salary earned minus approved advances and fines; may be negative.
    pub fn net_payable(&self, driver: &str) -> FleetResult<Decimal> {
        let salary = self.salary_earned(driver)?;
        let transactions = self.repository().load_transactions()?;
        Ok(calculation::net_payable(
            salary,
            calculation::driver_advances(&transactions, driver),
            calculation::driver_fines(&transactions, driver),
        ))
    }

    /// Balances over the approved ledger.
    pub fn ledger_balances(&self) -> FleetResult<LedgerBalances> {
        let transactions = self.repository().load_transactions()?;
        Ok(calculation::ledger_balances(&transactions))
    }

    /// Drivers ranked by settled earnings.
    pub fn leaderboard(&self) -> FleetResult<Vec<LeaderboardEntry>> {
        let shifts = self.repository().load_shifts()?;
        Ok(calculation::leaderboard(&shifts, self.config().drivers()))
    }

    /// Elapsed time on the driver's active shift, if any.
    pub fn duty_elapsed(&self, driver: &str) -> FleetResult<Option<DutyStatus>> {
        self.require_driver("driver", driver)?;
        let shifts = self.repository().load_shifts()?;
        Ok(calculation::duty_elapsed(
            &shifts,
            driver,
            self.now(),
            self.config().duty_hours_limit(),
        ))
    }

    /// Summary for one driver or the whole fleet over a period.
    pub fn period_report(&self, target: &ReportTarget, period: Period) -> FleetResult<PeriodReport> {
        if let ReportTarget::Driver(driver) = target {
            self.require_driver("target", driver)?;
        }
        let snapshot = self.snapshot()?;
        Ok(calculation::period_report(
            &snapshot.shifts,
            &snapshot.transactions,
            target,
            period,
            self.config().display_offset(),
        ))
    }

    /// The driver's dashboard figures.
    pub fn driver_hud(&self, driver: &str) -> FleetResult<DriverHud> {
        self.require_driver("driver", driver)?;
        let snapshot = self.snapshot()?;
        Ok(calculation::driver_hud(
            &snapshot.shifts,
            &snapshot.transactions,
            driver,
            self.config().payroll(),
            self.config().display_offset(),
        ))
    }

    /// Cash position and gross revenue.
    pub fn finance_summary(&self) -> FleetResult<FinanceSummary> {
        let snapshot = self.snapshot()?;
        Ok(calculation::finance_summary(
            &snapshot.shifts,
            &snapshot.transactions,
        ))
    }

    /// One payroll row per roster driver, with totals.
    pub fn salary_sheet(&self) -> FleetResult<SalarySheet> {
        let snapshot = self.snapshot()?;
        Ok(calculation::salary_sheet(
            &snapshot.shifts,
            &snapshot.transactions,
            self.config().drivers(),
            self.config().payroll(),
        ))
    }

    /// Live status of every roster driver.
    pub fn fleet_radar(&self) -> FleetResult<Vec<RadarEntry>> {
        let shifts = self.repository().load_shifts()?;
        let config = self.config();
        Ok(calculation::fleet_radar(&shifts, config.drivers(), |driver| {
            config.driver_phone(driver)
        }))
    }

    /// Finished and end-pending shifts, newest first.
    pub fn shift_history(&self, driver: Option<&str>) -> FleetResult<Vec<Shift>> {
        if let Some(driver) = driver {
            self.require_driver("driver", driver)?;
        }
        let shifts = self.repository().load_shifts()?;
        Ok(calculation::shift_history(&shifts, driver))
    }

    /// Ledger entries, newest first.
    pub fn transaction_history(&self, driver: Option<&str>) -> FleetResult<Vec<Transaction>> {
        if let Some(driver) = driver {
            self.require_driver("driver", driver)?;
        }
        let transactions = self.repository().load_transactions()?;
        Ok(calculation::transaction_history(&transactions, driver))
    }
}
