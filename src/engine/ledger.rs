//! Transaction ledger.
//!
//! Entries recorded by the admin are committed immediately; entries
//! recorded by a driver wait for approval. Approved entries are never
//! edited, and a pending entry can only be approved or deleted.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{FleetError, FleetResult};
use crate::models::{ApprovalStatus, Party, Role, Source, Transaction, TransactionType, User};

use super::{FleetEngine, new_record_id};

/// A transaction to record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    /// Who the movement is booked against.
    pub party: Party,
    /// What kind of movement this is.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Amount moved.
    pub amount: Decimal,
    /// How the money moved.
    #[serde(default = "default_method")]
    pub method: String,
    /// Free-text reference.
    #[serde(default)]
    pub notes: String,
    /// Who initiated the movement.
    #[serde(default = "default_source")]
    pub source: Source,
}

fn default_method() -> String {
    "Cash".to_string()
}

fn default_source() -> Source {
    Source::Manager
}

impl NewTransaction {
    fn new(party: Party, kind: TransactionType, amount: Decimal, source: Source) -> Self {
        Self {
            party,
            kind,
            amount,
            method: default_method(),
            notes: String::new(),
            source,
        }
    }

    fn with_method(mut self, method: &str) -> Self {
        self.method = method.to_string();
        self
    }

    fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

impl FleetEngine {
    /// Records a transaction on behalf of `recorded_by`.
    ///
    /// Admin entries start `Approved`. Admin expenses and challans follow
    /// the service rules: the amount must be above zero and a challan is
    /// always owed by the driver. Drivers may only hand over their own
    /// cash (`Received` booked against themselves); those entries start
    /// `Pending` with source `Driver`. The ceo role cannot record.
    ///
    /// # Errors
    ///
    /// - `Forbidden` for the ceo role
    /// - `Validation` for a negative amount, a zero expense or challan, a
    ///   party that is neither a
    ///   roster driver nor the general party, or a driver recording
    ///   anything other than their own handover
    pub fn record_transaction(
        &self,
        entry: NewTransaction,
        recorded_by: &User,
    ) -> FleetResult<Transaction> {
        match recorded_by.role {
            Role::Admin => {
                let entry = service_rules(entry)?;
                self.append(entry, ApprovalStatus::Approved)
            }
            Role::Driver => {
                if entry.kind != TransactionType::Received
                    || !entry.party.is_driver(&recorded_by.display_name)
                {
                    warn!(
                        user = %recorded_by.username,
                        kind = %entry.kind,
                        party = %entry.party,
                        "driver tried to record a transaction other than an own handover"
                    );
                    return Err(FleetError::validation(
                        "type",
                        "drivers may only record cash handovers for themselves",
                    ));
                }
                let entry = NewTransaction {
                    source: Source::Driver,
                    ..entry
                };
                self.append(entry, ApprovalStatus::Pending)
            }
            Role::Ceo => Err(FleetError::Forbidden {
                role: recorded_by.role.to_string(),
                action: "record transactions".to_string(),
            }),
        }
    }

    /// Admin receives cash from a driver.
    pub fn receive_cash(&self, driver: &str, amount: Decimal, notes: &str) -> FleetResult<Transaction> {
        let entry = NewTransaction::new(
            Party::from_name(driver),
            TransactionType::Received,
            amount,
            Source::Manager,
        )
        .with_notes(notes);
        self.append(entry, ApprovalStatus::Approved)
    }

    /// Admin pays an advance to a driver.
    pub fn give_advance(&self, driver: &str, amount: Decimal, notes: &str) -> FleetResult<Transaction> {
        self.require_driver("party", driver)?;
        let entry = NewTransaction::new(
            Party::from_name(driver),
            TransactionType::Advance,
            amount,
            Source::Manager,
        )
        .with_notes(notes);
        self.append(entry, ApprovalStatus::Approved)
    }

    /// Admin passes cash on to the owner, on behalf of a driver or the
    /// general account.
    pub fn transfer_to_ceo(&self, party: Party, amount: Decimal, notes: &str) -> FleetResult<Transaction> {
        let entry = NewTransaction::new(party, TransactionType::CeoTransfer, amount, Source::Manager)
            .with_notes(notes);
        self.append(entry, ApprovalStatus::Approved)
    }

    /// Admin books a vehicle cost (repair, wash) against a driver.
    ///
    /// The vehicle is prefixed to the notes. Zero amounts are rejected.
    pub fn record_expense(
        &self,
        driver: &str,
        vehicle: &str,
        amount: Decimal,
        notes: &str,
    ) -> FleetResult<Transaction> {
        let entry = self.service_entry(driver, vehicle, amount, notes, TransactionType::Expense)?;
        self.append(entry, ApprovalStatus::Approved)
    }

    /// Admin books a traffic fine against a driver; it is deducted from the
    /// driver's pay.
    ///
    /// The vehicle is prefixed to the notes. Zero amounts are rejected.
    pub fn record_challan(
        &self,
        driver: &str,
        vehicle: &str,
        amount: Decimal,
        notes: &str,
    ) -> FleetResult<Transaction> {
        let entry = self.service_entry(driver, vehicle, amount, notes, TransactionType::Challan)?;
        self.append(entry, ApprovalStatus::Approved)
    }

    /// A driver hands cash over to the manager; waits for approval.
    pub fn handover_cash(&self, driver: &str, amount: Decimal, notes: &str) -> FleetResult<Transaction> {
        self.require_driver("party", driver)?;
        let entry = NewTransaction::new(
            Party::from_name(driver),
            TransactionType::Received,
            amount,
            Source::Driver,
        )
        .with_notes(notes);
        self.append(entry, ApprovalStatus::Pending)
    }

    /// Approves a pending transaction.
    pub fn approve_transaction(&self, transaction_id: &str) -> FleetResult<Transaction> {
        let mut transactions = self.repository().load_transactions()?;
        let tx = transactions
            .iter_mut()
            .find(|tx| tx.id == transaction_id && tx.approval == ApprovalStatus::Pending)
            .ok_or_else(|| {
                FleetError::not_found("Transaction", transaction_id, "no pending transaction")
            })?;
        tx.approval = ApprovalStatus::Approved;
        let approved = tx.clone();

        self.repository().save_transactions(&transactions)?;

        info!(
            transaction_id = %approved.id,
            party = %approved.party,
            kind = %approved.kind,
            amount = %approved.amount,
            "transaction approved"
        );
        Ok(approved)
    }

    /// Deletes a pending transaction.
    pub fn reject_transaction(&self, transaction_id: &str) -> FleetResult<Transaction> {
        let mut transactions = self.repository().load_transactions()?;
        let index = transactions
            .iter()
            .position(|tx| tx.id == transaction_id && tx.approval == ApprovalStatus::Pending)
            .ok_or_else(|| {
                FleetError::not_found("Transaction", transaction_id, "no pending transaction")
            })?;
        let rejected = transactions.remove(index);

        self.repository().save_transactions(&transactions)?;

        info!(
            transaction_id = %rejected.id,
            party = %rejected.party,
            amount = %rejected.amount,
            "transaction rejected, row removed"
        );
        Ok(rejected)
    }

    fn service_entry(
        &self,
        driver: &str,
        vehicle: &str,
        amount: Decimal,
        notes: &str,
        kind: TransactionType,
    ) -> FleetResult<NewTransaction> {
        self.require_driver("party", driver)?;
        if !self.config().is_vehicle(vehicle) {
            return Err(FleetError::validation(
                "vehicle",
                format!("'{}' is not on the vehicle roster", vehicle),
            ));
        }
        service_rules(
            NewTransaction::new(Party::from_name(driver), kind, amount, Source::Manager)
                .with_method("System")
                .with_notes(format!("{} | {}", vehicle, notes)),
        )
    }

    fn append(&self, entry: NewTransaction, approval: ApprovalStatus) -> FleetResult<Transaction> {
        if entry.amount < Decimal::ZERO {
            return Err(FleetError::validation(
                "amount",
                format!("{} must not be negative", entry.amount),
            ));
        }
        if let Party::Driver(name) = &entry.party {
            self.require_driver("party", name)?;
        }

        let mut transactions = self.repository().load_transactions()?;
        let tx = Transaction {
            id: new_record_id(),
            timestamp: self.now(),
            party: entry.party,
            kind: entry.kind,
            amount: entry.amount,
            method: entry.method,
            notes: entry.notes,
            approval,
            source: entry.source,
        };
        transactions.push(tx.clone());
        self.repository().save_transactions(&transactions)?;

        info!(
            transaction_id = %tx.id,
            party = %tx.party,
            kind = %tx.kind,
            amount = %tx.amount,
            approval = %tx.approval,
            "transaction recorded"
        );
        Ok(tx)
    }
}

/// Expenses and challans need a positive amount; a challan is owed by the
/// driver whoever books it.
fn service_rules(entry: NewTransaction) -> FleetResult<NewTransaction> {
    match entry.kind {
        TransactionType::Expense | TransactionType::Challan if entry.amount <= Decimal::ZERO => {
            Err(FleetError::validation("amount", "amount must be above zero"))
        }
        TransactionType::Challan => Ok(NewTransaction {
            source: Source::Driver,
            ..entry
        }),
        _ => Ok(entry),
    }
}

