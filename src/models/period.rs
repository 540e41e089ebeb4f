//! Reporting periods and report targets.
//!
//! Periods are calendar windows evaluated on local dates, i.e. after the
//! display offset has been applied to the stored UTC timestamps.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A calendar window used to filter shifts and transactions.
///
/// # Example
///
/// ```
/// use fleet_ledger::models::Period;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
/// let month = Period::month_of(date);
///
/// assert!(month.contains(NaiveDate::from_ymd_opt(2026, 1, 31).unwrap()));
/// assert!(!month.contains(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()));
/// assert!(Period::Day { date }.contains(date));
/// assert!(Period::AllTime.contains(date));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Period {
    /// A single calendar day.
    Day {
        /// The local calendar date.
        date: NaiveDate,
    },
    /// A calendar month of a given year.
    Month {
        /// Calendar year.
        year: i32,
        /// Calendar month, 1-12.
        month: u32,
    },
    /// No filtering.
    AllTime,
}

impl Period {
    /// Returns the calendar month containing `date`.
    pub fn month_of(date: NaiveDate) -> Self {
        Period::Month {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Checks if a local date falls within this period.
    pub fn contains(&self, date: NaiveDate) -> bool {
        match self {
            Period::Day { date: day } => *day == date,
            Period::Month { year, month } => date.year() == *year && date.month() == *month,
            Period::AllTime => true,
        }
    }

    /// Returns a short human-readable title for the period.
    pub fn title(&self) -> String {
        match self {
            Period::Day { date } => format!("DAILY REPORT | {}", date.format("%d-%b-%Y")),
            Period::Month { year, month } => match NaiveDate::from_ymd_opt(*year, *month, 1) {
                Some(first) => format!("MONTHLY REPORT | {}", first.format("%B %Y")),
                None => format!("MONTHLY REPORT | {}-{:02}", year, month),
            },
            Period::AllTime => "LIFETIME PERFORMANCE".to_string(),
        }
    }
}

/// Who a report covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "driver", rename_all = "snake_case")]
pub enum ReportTarget {
    /// The whole roster combined.
    Fleet,
    /// A single driver.
    Driver(String),
}

impl ReportTarget {
    /// Returns true if the target covers the given driver.
    pub fn includes(&self, driver: &str) -> bool {
        match self {
            ReportTarget::Fleet => true,
            ReportTarget::Driver(name) => name == driver,
        }
    }

    /// Returns the label printed on reports.
    pub fn label(&self) -> String {
        match self {
            ReportTarget::Fleet => "ALL TEAM (FLEET)".to_string(),
            ReportTarget::Driver(name) => name.to_uppercase(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_period_contains_only_that_day() {
        let period = Period::Day {
            date: date(2026, 1, 15),
        };
        assert!(period.contains(date(2026, 1, 15)));
        assert!(!period.contains(date(2026, 1, 16)));
    }

    #[test]
    fn test_month_period_checks_year_as_well() {
        let period = Period::month_of(date(2026, 3, 10));
        assert!(period.contains(date(2026, 3, 1)));
        assert!(period.contains(date(2026, 3, 31)));
        assert!(!period.contains(date(2026, 4, 1)));
        assert!(!period.contains(date(2025, 3, 10)));
    }

    #[test]
    fn test_titles() {
        assert_eq!(
            Period::Day {
                date: date(2026, 1, 5)
            }
            .title(),
            "DAILY REPORT | 05-Jan-2026"
        );
        assert_eq!(
            Period::month_of(date(2026, 2, 5)).title(),
            "MONTHLY REPORT | February 2026"
        );
        assert_eq!(Period::AllTime.title(), "LIFETIME PERFORMANCE");
    }

    #[test]
    fn test_report_target_includes() {
        assert!(ReportTarget::Fleet.includes("Sunny"));
        let target = ReportTarget::Driver("Sunny".to_string());
        assert!(target.includes("Sunny"));
        assert!(!target.includes("Ijaz"));
        assert_eq!(target.label(), "SUNNY");
    }

    #[test]
    fn test_period_serialization() {
        let json = serde_json::to_value(Period::Day {
            date: date(2026, 1, 15),
        })
        .unwrap();
        assert_eq!(json["kind"], "day");
        assert_eq!(json["date"], "2026-01-15");
        let month: Period =
            serde_json::from_str(r#"{"kind":"month","year":2026,"month":1}"#).unwrap();
        assert_eq!(month, Period::Month { year: 2026, month: 1 });
    }
}
