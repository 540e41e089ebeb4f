//! Shift model.
//!
//! A shift is one vehicle-use session by one driver, from the start request
//! until the admin approves the reported earnings.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ApprovalStatus, ShiftStatus};

/// Represents one vehicle-use session.
///
/// # Example
///
/// ```
/// use fleet_ledger::models::{ApprovalStatus, Shift, ShiftStatus};
/// use chrono::{TimeZone, Utc};
/// use rust_decimal::Decimal;
///
/// let shift = Shift::new_started(
///     "1a2b3c4d".to_string(),
///     "Ijaz".to_string(),
///     "Car Max (New)".to_string(),
///     Utc.with_ymd_and_hms(2026, 1, 15, 6, 0, 0).unwrap(),
///     Decimal::from(100),
///     100,
///     false,
/// );
/// assert_eq!(shift.status, ShiftStatus::PendingStart);
/// assert_eq!(shift.approval, ApprovalStatus::Pending);
/// assert!(shift.end_time.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shift {
    /// Unique identifier for the shift.
    pub id: String,
    /// Driver name, a member of the driver roster.
    pub driver: String,
    /// Vehicle identifier, a member of the vehicle roster.
    pub vehicle: String,
    /// Lifecycle state.
    pub status: ShiftStatus,
    /// Approval gate state.
    pub approval: ApprovalStatus,
    /// When the shift was started.
    pub start_time: DateTime<Utc>,
    /// When the end was reported; `None` until then.
    pub end_time: Option<DateTime<Utc>>,
    /// Hours between start and end, never negative.
    pub duration_hours: Decimal,
    /// Earnings reported at the end of the shift.
    pub total_earnings: Decimal,
    /// Wallet float handed to the driver at start.
    pub start_wallet: Decimal,
    /// Wallet float returned at the end.
    pub end_wallet: Decimal,
    /// Cash collected during the shift.
    pub cash_collected: Decimal,
    /// Fuel level at start, 0-100.
    pub start_fuel: u8,
    /// Fuel level at end, 0-100.
    pub end_fuel: u8,
}

impl Shift {
    /// Creates a freshly started shift.
    ///
    /// With `expedite` the shift skips the start approval and goes straight to
    /// `Active`/`Approved`.
    pub fn new_started(
        id: String,
        driver: String,
        vehicle: String,
        start_time: DateTime<Utc>,
        start_wallet: Decimal,
        start_fuel: u8,
        expedite: bool,
    ) -> Self {
        let (status, approval) = if expedite {
            (ShiftStatus::Active, ApprovalStatus::Approved)
        } else {
            (ShiftStatus::PendingStart, ApprovalStatus::Pending)
        };

        Self {
            id,
            driver,
            vehicle,
            status,
            approval,
            start_time,
            end_time: None,
            duration_hours: Decimal::ZERO,
            total_earnings: Decimal::ZERO,
            start_wallet,
            end_wallet: Decimal::ZERO,
            cash_collected: Decimal::ZERO,
            start_fuel,
            end_fuel: 0,
        }
    }

    /// Returns true while the shift occupies its driver and vehicle.
    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }

    /// Returns true when the shift's earnings count towards aggregates.
    pub fn is_settled(&self) -> bool {
        self.status == ShiftStatus::Completed && self.approval == ApprovalStatus::Approved
    }

    /// Resets every end-of-shift field so the shift can be ended again.
    pub fn clear_end_fields(&mut self) {
        self.end_time = None;
        self.duration_hours = Decimal::ZERO;
        self.total_earnings = Decimal::ZERO;
        self.cash_collected = Decimal::ZERO;
        self.end_wallet = Decimal::ZERO;
        self.end_fuel = 0;
    }

    /// Returns the calendar date the shift started on, in the display offset.
    pub fn local_start_date(&self, offset: FixedOffset) -> NaiveDate {
        self.start_time.with_timezone(&offset).date_naive()
    }
}

/// Converts an elapsed span into hours, clamped at zero and rounded to 2 dp.
///
/// A negative span (the end clock reading behind the start) yields zero.
///
/// # Example
///
/// ```
/// use fleet_ledger::models::elapsed_hours;
/// use chrono::{TimeZone, Utc};
/// use rust_decimal::Decimal;
///
/// let start = Utc.with_ymd_and_hms(2026, 1, 15, 6, 0, 0).unwrap();
/// let end = Utc.with_ymd_and_hms(2026, 1, 15, 14, 30, 0).unwrap();
/// assert_eq!(elapsed_hours(start, end), Decimal::new(850, 2));
/// assert_eq!(elapsed_hours(end, start), Decimal::ZERO);
/// ```
pub fn elapsed_hours(start: DateTime<Utc>, end: DateTime<Utc>) -> Decimal {
    let seconds = (end - start).num_seconds().max(0);
    (Decimal::from(seconds) / Decimal::from(3600)).round_dp(2)
}
