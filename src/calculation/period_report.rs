//! Period reports for one driver or the whole fleet.

use chrono::FixedOffset;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use crate::models::{Period, ReportTarget, Shift, Transaction, TransactionType};

use super::saturating_sum;

/// Totals for a target over a calendar window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodReport {
    /// Report heading, e.g. `DAILY REPORT | 05-Jan-2026`.
    pub title: String,
    /// Who the report covers, e.g. `ALL TEAM (FLEET)`.
    pub target: String,
    /// The window the report covers.
    pub period: Period,
    /// Completed, approved shifts in the window.
    pub shift_count: usize,
    /// Summed shift duration in hours.
    pub duration_hours: Decimal,
    /// `duration_hours` rendered as `H:MM`.
    pub duration_display: String,
    /// Summed shift earnings.
    pub revenue: Decimal,
    /// Approved advances in the window.
    pub advances: Decimal,
    /// Approved fines in the window.
    pub fines: Decimal,
    /// `revenue - fines`.
    pub net_revenue: Decimal,
}

/// Renders decimal hours as `H:MM`, truncating to whole minutes.
///
/// # Examples
///
/// ```
/// use fleet_ledger::calculation::format_hours_minutes;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_hours_minutes(Decimal::new(28, 1)), "2:48");
/// assert_eq!(format_hours_minutes(Decimal::new(1225, 2)), "12:15");
/// assert_eq!(format_hours_minutes(Decimal::ZERO), "0:00");
/// ```
pub fn format_hours_minutes(hours: Decimal) -> String {
    let total_minutes = hours
        .saturating_mul(Decimal::from(60))
        .trunc()
        .to_i64()
        .unwrap_or(i64::MAX)
        .max(0);
    format!("{}:{:02}", total_minutes / 60, total_minutes % 60)
}

/// Builds a period report.
///
/// Shifts are bucketed by their local start date and transactions by their
/// local date, both in `offset`. Only completed, approved shifts and
/// approved transactions count.
///
/// # Arguments
///
/// * `shifts` - The shifts snapshot
/// * `transactions` - The transactions snapshot
/// * `target` - One driver or the whole fleet
/// * `period` - Calendar day, calendar month or all time
/// * `offset` - Display offset used to find local dates
pub fn period_report(
    shifts: &[Shift],
    transactions: &[Transaction],
    target: &ReportTarget,
    period: Period,
    offset: FixedOffset,
) -> PeriodReport {
    let settled: Vec<&Shift> = shifts
        .iter()
        .filter(|shift| {
            shift.is_settled()
                && target.includes(&shift.driver)
                && period.contains(shift.local_start_date(offset))
        })
        .collect();

    let in_window = |kind: TransactionType| -> Decimal {
        saturating_sum(
            transactions
                .iter()
                .filter(|tx| {
                    tx.is_approved()
                        && tx.kind == kind
                        && target_includes_party(target, tx)
                        && period.contains(tx.local_date(offset))
                })
                .map(|tx| tx.amount),
        )
    };

    let duration_hours = saturating_sum(settled.iter().map(|shift| shift.duration_hours));
    let revenue = saturating_sum(settled.iter().map(|shift| shift.total_earnings));
    let advances = in_window(TransactionType::Advance);
    let fines = in_window(TransactionType::Challan);

    PeriodReport {
        title: period.title(),
        target: target.label(),
        period,
        shift_count: settled.len(),
        duration_hours,
        duration_display: format_hours_minutes(duration_hours),
        revenue,
        advances,
        fines,
        net_revenue: revenue.saturating_sub(fines),
    }
}

fn target_includes_party(target: &ReportTarget, tx: &Transaction) -> bool {
    match target {
        ReportTarget::Fleet => true,
        ReportTarget::Driver(name) => tx.party.is_driver(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ApprovalStatus, Party, ShiftStatus, Source};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn riyadh() -> FixedOffset {
        FixedOffset::east_opt(3 * 3600).unwrap()
    }

    fn completed(driver: &str, month: u32, day: u32, earnings: i64, hours: i64) -> Shift {
        let mut shift = Shift::new_started(
            format!("{}-{}-{}", driver, month, day),
            driver.to_string(),
            "Car Max (New)".to_string(),
            Utc.with_ymd_and_hms(2026, month, day, 6, 0, 0).unwrap(),
            Decimal::ZERO,
            100,
            true,
        );
        shift.status = ShiftStatus::Completed;
        shift.total_earnings = Decimal::from(earnings);
        shift.duration_hours = Decimal::from(hours);
        shift
    }

    fn tx(driver: &str, kind: TransactionType, day: u32, amount: i64) -> Transaction {
        Transaction {
            id: format!("{}-{}-{}", driver, day, amount),
            timestamp: Utc.with_ymd_and_hms(2026, 1, day, 9, 0, 0).unwrap(),
            party: Party::Driver(driver.to_string()),
            kind,
            amount: Decimal::from(amount),
            method: "Cash".to_string(),
            notes: String::new(),
            approval: ApprovalStatus::Approved,
            source: Source::Manager,
        }
    }

    fn day(d: u32) -> Period {
        Period::Day {
            date: NaiveDate::from_ymd_opt(2026, 1, d).unwrap(),
        }
    }

    #[test]
    fn test_daily_report_for_one_driver() {
        let shifts = vec![
            completed("Sunny", 1, 5, 300, 8),
            completed("Sunny", 1, 6, 200, 4),
            completed("Ijaz", 1, 5, 900, 10),
        ];
        let transactions = vec![
            tx("Sunny", TransactionType::Challan, 5, 100),
            tx("Sunny", TransactionType::Advance, 5, 50),
            tx("Ijaz", TransactionType::Challan, 5, 70),
        ];

        let report = period_report(
            &shifts,
            &transactions,
            &ReportTarget::Driver("Sunny".to_string()),
            day(5),
            riyadh(),
        );

        assert_eq!(report.title, "DAILY REPORT | 05-Jan-2026");
        assert_eq!(report.target, "SUNNY");
        assert_eq!(report.shift_count, 1);
        assert_eq!(report.revenue, Decimal::from(300));
        assert_eq!(report.fines, Decimal::from(100));
        assert_eq!(report.advances, Decimal::from(50));
        assert_eq!(report.net_revenue, Decimal::from(200));
        assert_eq!(report.duration_display, "8:00");
    }

    #[test]
    fn test_monthly_report_checks_the_year() {
        let mut last_year = completed("Sunny", 1, 5, 1000, 5);
        last_year.start_time = Utc.with_ymd_and_hms(2025, 1, 5, 6, 0, 0).unwrap();
        let shifts = vec![completed("Sunny", 1, 5, 300, 8), last_year];

        let report = period_report(
            &shifts,
            &[],
            &ReportTarget::Fleet,
            Period::Month {
                year: 2026,
                month: 1,
            },
            riyadh(),
        );

        assert_eq!(report.shift_count, 1);
        assert_eq!(report.revenue, Decimal::from(300));
        assert_eq!(report.target, "ALL TEAM (FLEET)");
    }

    #[test]
    fn test_all_time_fleet_report_sums_everything_settled() {
        let mut pending = completed("Ijaz", 1, 7, 500, 3);
        pending.status = ShiftStatus::PendingEnd;
        let shifts = vec![
            completed("Sunny", 1, 5, 300, 8),
            completed("Ijaz", 2, 1, 250, 4),
            pending,
        ];

        let report = period_report(&shifts, &[], &ReportTarget::Fleet, Period::AllTime, riyadh());

        assert_eq!(report.title, "LIFETIME PERFORMANCE");
        assert_eq!(report.shift_count, 2);
        assert_eq!(report.revenue, Decimal::from(550));
        assert_eq!(report.duration_hours, Decimal::from(12));
        assert_eq!(report.duration_display, "12:00");
    }

    #[test]
    fn test_corrupt_totals_saturate() {
        let mut corrupt = completed("Sunny", 1, 5, 0, 0);
        corrupt.total_earnings = Decimal::MAX;
        corrupt.duration_hours = Decimal::MAX;
        let shifts = vec![corrupt, completed("Sunny", 1, 6, 300, 8)];
        let mut fine = tx("Sunny", TransactionType::Challan, 5, 0);
        fine.amount = Decimal::MAX;
        let transactions = vec![fine, tx("Sunny", TransactionType::Challan, 6, 100)];

        let report = period_report(
            &shifts,
            &transactions,
            &ReportTarget::Fleet,
            Period::AllTime,
            riyadh(),
        );

        assert_eq!(report.revenue, Decimal::MAX);
        assert_eq!(report.duration_hours, Decimal::MAX);
        assert_eq!(report.fines, Decimal::MAX);
        assert_eq!(report.net_revenue, Decimal::ZERO);
        assert!(!report.duration_display.is_empty());
    }

    #[test]
    fn test_hours_minutes_truncates() {
        assert_eq!(format_hours_minutes(Decimal::new(833, 2)), "8:19");
        assert_eq!(format_hours_minutes(Decimal::new(-5, 0)), "0:00");
    }
}
