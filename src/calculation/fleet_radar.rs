//! Live roster view: who is on the road, in which vehicle.

use serde::Serialize;

use crate::models::{Shift, ShiftStatus};

/// One roster driver's live status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RadarEntry {
    /// Driver name.
    pub driver: String,
    /// Contact number, when configured.
    pub phone: Option<String>,
    /// True while the driver has an `Active` shift.
    pub live: bool,
    /// Vehicle of the active shift.
    pub vehicle: Option<String>,
    /// ID of the active shift.
    pub shift_id: Option<String>,
}

/// Builds the radar for every roster driver, in roster order.
///
/// Only `Active` shifts make a driver live; pending requests do not.
pub fn fleet_radar<'a>(
    shifts: &[Shift],
    roster: &[String],
    phone_of: impl Fn(&str) -> Option<&'a str>,
) -> Vec<RadarEntry> {
    roster
        .iter()
        .map(|driver| {
            let active = shifts
                .iter()
                .find(|shift| &shift.driver == driver && shift.status == ShiftStatus::Active);
            RadarEntry {
                driver: driver.clone(),
                phone: phone_of(driver).map(str::to_string),
                live: active.is_some(),
                vehicle: active.map(|shift| shift.vehicle.clone()),
                shift_id: active.map(|shift| shift.id.clone()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    fn shift(driver: &str, status: ShiftStatus) -> Shift {
        let mut shift = Shift::new_started(
            format!("{}-shift", driver),
            driver.to_string(),
            "Car Boult (Black)".to_string(),
            Utc.with_ymd_and_hms(2026, 1, 15, 6, 0, 0).unwrap(),
            Decimal::ZERO,
            100,
            true,
        );
        shift.status = status;
        shift
    }

    #[test]
    fn test_only_active_shifts_are_live() {
        let roster = vec!["Sunny".to_string(), "Ijaz".to_string(), "Azeem".to_string()];
        let shifts = vec![
            shift("Sunny", ShiftStatus::Active),
            shift("Ijaz", ShiftStatus::PendingStart),
        ];

        let radar = fleet_radar(&shifts, &roster, |driver| {
            (driver == "Sunny").then_some("0510446075")
        });

        assert!(radar[0].live);
        assert_eq!(radar[0].vehicle.as_deref(), Some("Car Boult (Black)"));
        assert_eq!(radar[0].phone.as_deref(), Some("0510446075"));
        assert!(!radar[1].live);
        assert!(radar[1].vehicle.is_none());
        assert!(!radar[2].live);
        assert!(radar[2].phone.is_none());
    }
}
