//! Shift lifecycle.
//!
//! ```text
//! Pending_Start --approve--> Active --end--> Pending_End --approve--> Completed
//!       |                      ^                  |
//!       +--reject--> (deleted) +------reject------+
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{FleetError, FleetResult};
use crate::models::{ApprovalStatus, Shift, ShiftStatus, elapsed_hours};

use super::{FleetEngine, new_record_id};

/// Request to start a shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartShift {
    /// Roster name of the driver.
    pub driver: String,
    /// Roster name of the vehicle.
    pub vehicle: String,
    /// Wallet float handed over at start.
    pub start_wallet: Decimal,
    /// Fuel level at start, 0-100.
    pub start_fuel: u8,
    /// Skip the start approval and go straight to `Active`.
    #[serde(default)]
    pub expedite: bool,
}

/// Request to end a shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndShift {
    /// Earnings reported for the shift.
    pub total_earnings: Decimal,
    /// Fuel level at the end, 0-100.
    pub end_fuel: u8,
}

/// What rejecting a shift did.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ShiftRejection {
    /// A start request was rejected and the row removed.
    Discarded(Shift),
    /// An end request was rejected; the shift is active again.
    Reverted(Shift),
}

fn check_fuel(field: &str, fuel: u8) -> FleetResult<()> {
    if fuel > 100 {
        return Err(FleetError::validation(
            field,
            format!("fuel level {} is above 100", fuel),
        ));
    }
    Ok(())
}

fn check_not_negative(field: &str, amount: Decimal) -> FleetResult<()> {
    if amount < Decimal::ZERO {
        return Err(FleetError::validation(
            field,
            format!("{} must not be negative", amount),
        ));
    }
    Ok(())
}

fn pending_index(shifts: &[Shift], shift_id: &str) -> FleetResult<usize> {
    shifts
        .iter()
        .position(|shift| shift.id == shift_id && shift.status.is_pending())
        .ok_or_else(|| FleetError::not_found("Shift", shift_id, "no shift awaiting approval"))
}

impl FleetEngine {
    /// Starts a shift for a roster driver in a roster vehicle.
    ///
    /// # Errors
    ///
    /// - `Validation` for an unknown driver or vehicle, a negative wallet or
    ///   fuel above 100
    /// - `Conflict` when the driver or the vehicle already has a shift that
    ///   is not completed
    pub fn start_shift(&self, request: StartShift) -> FleetResult<Shift> {
        self.require_driver("driver", &request.driver)?;
        if !self.config().is_vehicle(&request.vehicle) {
            return Err(FleetError::validation(
                "vehicle",
                format!("'{}' is not on the vehicle roster", request.vehicle),
            ));
        }
        check_not_negative("start_wallet", request.start_wallet)?;
        check_fuel("start_fuel", request.start_fuel)?;

        let mut shifts = self.repository().load_shifts()?;

        if let Some(busy) = shifts
            .iter()
            .find(|shift| shift.is_open() && shift.driver == request.driver)
        {
            return Err(FleetError::Conflict {
                message: format!(
                    "driver '{}' already has shift {} ({})",
                    request.driver, busy.id, busy.status
                ),
            });
        }
        if let Some(busy) = shifts
            .iter()
            .find(|shift| shift.is_open() && shift.vehicle == request.vehicle)
        {
            return Err(FleetError::Conflict {
                message: format!(
                    "vehicle '{}' is in use by {} on shift {} ({})",
                    request.vehicle, busy.driver, busy.id, busy.status
                ),
            });
        }

        let shift = Shift::new_started(
            new_record_id(),
            request.driver,
            request.vehicle,
            self.now(),
            request.start_wallet,
            request.start_fuel,
            request.expedite,
        );
        shifts.push(shift.clone());
        self.repository().save_shifts(&shifts)?;

        info!(
            shift_id = %shift.id,
            driver = %shift.driver,
            vehicle = %shift.vehicle,
            status = %shift.status,
            "shift started"
        );
        Ok(shift)
    }

    /// Reports the end of a shift with its earnings.
    ///
    /// Accepted for shifts that are `Active` or still `Pending_Start`. The
    /// shift moves to `Pending_End` until an admin approves it; the wallet
    /// float is returned untouched and cash collected equals the earnings.
    ///
    /// # Errors
    ///
    /// - `Validation` for negative earnings or fuel above 100
    /// - `NotFound` unless the shift exists and can be ended
    pub fn end_shift(&self, shift_id: &str, request: EndShift) -> FleetResult<Shift> {
        check_not_negative("total_earnings", request.total_earnings)?;
        check_fuel("end_fuel", request.end_fuel)?;

        let mut shifts = self.repository().load_shifts()?;
        let shift = shifts
            .iter_mut()
            .find(|shift| {
                shift.id == shift_id
                    && matches!(shift.status, ShiftStatus::Active | ShiftStatus::PendingStart)
            })
            .ok_or_else(|| FleetError::not_found("Shift", shift_id, "no shift in progress"))?;

        let end_time = self.now();
        shift.status = ShiftStatus::PendingEnd;
        shift.approval = ApprovalStatus::Pending;
        shift.end_time = Some(end_time);
        shift.duration_hours = elapsed_hours(shift.start_time, end_time);
        shift.total_earnings = request.total_earnings;
        shift.cash_collected = request.total_earnings;
        shift.end_wallet = shift.start_wallet;
        shift.end_fuel = request.end_fuel;
        let ended = shift.clone();

        self.repository().save_shifts(&shifts)?;

        info!(
            shift_id = %ended.id,
            driver = %ended.driver,
            earnings = %ended.total_earnings,
            duration_hours = %ended.duration_hours,
            "shift end reported"
        );
        Ok(ended)
    }

    /// Approves a pending start or end request.
    ///
    /// `Pending_Start` becomes `Active`, `Pending_End` becomes `Completed`.
    pub fn approve_shift(&self, shift_id: &str) -> FleetResult<Shift> {
        let mut shifts = self.repository().load_shifts()?;
        let index = pending_index(&shifts, shift_id)?;

        let shift = &mut shifts[index];
        shift.status = match shift.status {
            ShiftStatus::PendingStart => ShiftStatus::Active,
            _ => ShiftStatus::Completed,
        };
        shift.approval = ApprovalStatus::Approved;
        let approved = shift.clone();

        self.repository().save_shifts(&shifts)?;

        info!(
            shift_id = %approved.id,
            driver = %approved.driver,
            status = %approved.status,
            "shift approved"
        );
        Ok(approved)
    }

    /// Rejects a pending start or end request.
    ///
    /// A rejected start removes the row. A rejected end puts the shift back
    /// to `Active`/`Approved` with every end field cleared, so it can be
    /// ended again.
    pub fn reject_shift(&self, shift_id: &str) -> FleetResult<ShiftRejection> {
        let mut shifts = self.repository().load_shifts()?;
        let index = pending_index(&shifts, shift_id)?;

        let rejection = if shifts[index].status == ShiftStatus::PendingStart {
            ShiftRejection::Discarded(shifts.remove(index))
        } else {
            let shift = &mut shifts[index];
            shift.status = ShiftStatus::Active;
            shift.approval = ApprovalStatus::Approved;
            shift.clear_end_fields();
            ShiftRejection::Reverted(shift.clone())
        };

        self.repository().save_shifts(&shifts)?;

        match &rejection {
            ShiftRejection::Discarded(shift) => {
                info!(shift_id = %shift.id, driver = %shift.driver, "shift start rejected, row removed")
            }
            ShiftRejection::Reverted(shift) => {
                info!(shift_id = %shift.id, driver = %shift.driver, "shift end rejected, shift active again")
            }
        }
        Ok(rejection)
    }

    /// Returns roster drivers without a shift in progress, in roster order.
    pub fn available_drivers(&self) -> FleetResult<Vec<String>> {
        let shifts = self.repository().load_shifts()?;
        Ok(self
            .config()
            .drivers()
            .iter()
            .filter(|driver| !shifts.iter().any(|s| s.is_open() && &s.driver == *driver))
            .cloned()
            .collect())
    }

    /// Returns roster vehicles not in use, in roster order.
    pub fn available_vehicles(&self) -> FleetResult<Vec<String>> {
        let shifts = self.repository().load_shifts()?;
        Ok(self
            .config()
            .vehicles()
            .iter()
            .filter(|vehicle| !shifts.iter().any(|s| s.is_open() && &s.vehicle == *vehicle))
            .cloned()
            .collect())
    }

    /// Returns the shifts that can be ended, optionally for one driver.
    pub fn open_shifts(&self, driver: Option<&str>) -> FleetResult<Vec<Shift>> {
        let shifts = self.repository().load_shifts()?;
        Ok(shifts
            .into_iter()
            .filter(|shift| matches!(shift.status, ShiftStatus::Active | ShiftStatus::PendingStart))
            .filter(|shift| driver.is_none_or(|d| shift.driver == d))
            .collect())
    }
}
