//! Duty timer for an active shift.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Shift, ShiftStatus};

/// Elapsed-duty readout for a driver's active shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DutyStatus {
    /// The active shift.
    pub shift_id: String,
    /// Vehicle in use.
    pub vehicle: String,
    /// When the shift started.
    pub started_at: DateTime<Utc>,
    /// Seconds on duty, never negative.
    pub elapsed_seconds: i64,
    /// Duty limit in seconds.
    pub limit_seconds: i64,
    /// `elapsed / limit`, capped at 1.
    pub progress: Decimal,
    /// True once elapsed time exceeds the limit.
    pub overtime: bool,
}

/// Reports elapsed duty for the driver's `Active` shift.
///
/// Returns `None` when the driver has no active shift. The readout never
/// ends a shift, however long it has run.
///
/// # Arguments
///
/// * `shifts` - The shifts snapshot
/// * `driver` - Roster name of the driver
/// * `now` - Current time
/// * `limit_hours` - Duty limit in hours
///
/// # Examples
///
/// ```
/// use fleet_ledger::calculation::duty_elapsed;
/// use fleet_ledger::models::Shift;
/// use chrono::{Duration, TimeZone, Utc};
/// use rust_decimal::Decimal;
///
/// let start = Utc.with_ymd_and_hms(2026, 1, 15, 6, 0, 0).unwrap();
/// let shift = Shift::new_started(
///     "a1".to_string(),
///     "Sunny".to_string(),
///     "Car Jenny (White)".to_string(),
///     start,
///     Decimal::ZERO,
///     100,
///     true,
/// );
///
/// let duty = duty_elapsed(&[shift], "Sunny", start + Duration::hours(6), 12).unwrap();
/// assert_eq!(duty.elapsed_seconds, 6 * 3600);
/// assert_eq!(duty.progress, Decimal::new(5, 1));
/// assert!(!duty.overtime);
/// ```
pub fn duty_elapsed(
    shifts: &[Shift],
    driver: &str,
    now: DateTime<Utc>,
    limit_hours: u32,
) -> Option<DutyStatus> {
    let shift = shifts
        .iter()
        .find(|shift| shift.driver == driver && shift.status == ShiftStatus::Active)?;

    let elapsed_seconds = (now - shift.start_time).num_seconds().max(0);
    let limit_seconds = i64::from(limit_hours) * 3600;
    let progress = if limit_seconds > 0 {
        (Decimal::from(elapsed_seconds) / Decimal::from(limit_seconds)).min(Decimal::ONE)
    } else {
        Decimal::ONE
    };

    Some(DutyStatus {
        shift_id: shift.id.clone(),
        vehicle: shift.vehicle.clone(),
        started_at: shift.start_time,
        elapsed_seconds,
        limit_seconds,
        progress,
        overtime: elapsed_seconds > limit_seconds,
    })
}
