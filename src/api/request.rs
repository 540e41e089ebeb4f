//! Request types for the fleet ledger API.
//!
//! Bodies and query strings are resolved against the authenticated user
//! here, so handlers can pass finished engine requests straight through.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::auth::{Permission, require, require_self};
use crate::engine::{NewTransaction, StartShift};
use crate::error::{FleetError, FleetResult};
use crate::models::{Party, Period, ReportTarget, Role, Source, TransactionType, User};

/// Request body for `POST /shifts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartShiftRequest {
    /// Roster name of the driver; drivers may leave it out.
    #[serde(default)]
    pub driver: Option<String>,
    /// Roster name of the vehicle.
    pub vehicle: String,
    /// Wallet float handed over at start.
    #[serde(default)]
    pub start_wallet: Decimal,
    /// Fuel level at start, 0-100.
    pub start_fuel: u8,
    /// Skip the start approval (admin only).
    #[serde(default)]
    pub expedite: bool,
}

impl StartShiftRequest {
    /// Resolves the request for `user`.
    ///
    /// Drivers start shifts for themselves only and cannot expedite.
    pub fn into_start_shift(self, user: &User) -> FleetResult<StartShift> {
        let driver = match (self.driver, user.role) {
            (Some(driver), _) => driver,
            (None, Role::Driver) => user.display_name.clone(),
            (None, _) => return Err(FleetError::validation("driver", "driver is required")),
        };
        require_self(user, &driver)?;
        if self.expedite {
            require(user, Permission::ExpediteShifts)?;
        }

        Ok(StartShift {
            driver,
            vehicle: self.vehicle,
            start_wallet: self.start_wallet,
            start_fuel: self.start_fuel,
            expedite: self.expedite,
        })
    }
}

/// Request body for `POST /transactions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRequest {
    /// Party the entry is booked against; drivers may leave it out.
    #[serde(default)]
    pub party: Option<Party>,
    /// Transaction type.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Amount moved.
    pub amount: Decimal,
    /// How the money moved.
    #[serde(default)]
    pub method: Option<String>,
    /// Free-text reference.
    #[serde(default)]
    pub notes: String,
    /// Vehicle for expenses and challans.
    #[serde(default)]
    pub vehicle: Option<String>,
}

impl TransactionRequest {
    /// Returns the party, defaulting to the driver themselves.
    pub fn party_for(&self, user: &User) -> FleetResult<Party> {
        match (&self.party, user.role) {
            (Some(party), _) => Ok(party.clone()),
            (None, Role::Driver) => Ok(Party::Driver(user.display_name.clone())),
            (None, _) => Err(FleetError::validation("party", "party is required")),
        }
    }

    /// Converts into a ledger entry booked against `party`.
    pub fn into_new_transaction(self, party: Party) -> NewTransaction {
        NewTransaction {
            party,
            kind: self.kind,
            amount: self.amount,
            method: self.method.unwrap_or_else(|| "Cash".to_string()),
            notes: self.notes,
            source: Source::Manager,
        }
    }
}

/// Query string for the history endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryQuery {
    /// Restrict to one driver.
    #[serde(default)]
    pub driver: Option<String>,
}

impl HistoryQuery {
    /// Returns the driver filter for `user`; drivers always see only their own.
    pub fn driver_for(self, user: &User) -> Option<String> {
        match user.role {
            Role::Driver => Some(user.display_name.clone()),
            _ => self.driver,
        }
    }
}

/// Query string for `GET /reports`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportQuery {
    /// `fleet` (default) or a driver name.
    #[serde(default)]
    pub target: Option<String>,
    /// `day`, `month` (default) or `all`.
    #[serde(default)]
    pub period: Option<String>,
    /// Reference date for `day` and `month`; defaults to today.
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl ReportQuery {
    /// Returns the report target.
    pub fn target(&self) -> ReportTarget {
        match self.target.as_deref().map(str::trim) {
            None | Some("") => ReportTarget::Fleet,
            Some(name) if name.eq_ignore_ascii_case("fleet") => ReportTarget::Fleet,
            Some(name) => ReportTarget::Driver(name.to_string()),
        }
    }

    /// Returns the reporting period, using `today` when no date was given.
    pub fn period(&self, today: NaiveDate) -> FleetResult<Period> {
        let date = self.date.unwrap_or(today);
        match self.period.as_deref().map(str::trim).unwrap_or("month") {
            "day" => Ok(Period::Day { date }),
            "month" => Ok(Period::month_of(date)),
            "all" | "all_time" => Ok(Period::AllTime),
            other => Err(FleetError::validation(
                "period",
                format!("unknown period '{}', expected day, month or all", other),
            )),
        }
    }
}
