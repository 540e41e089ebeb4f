//! Ledger transaction model.
//!
//! Transactions are append-only: once approved they are never edited, and a
//! pending entry can only be approved or deleted.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{ApprovalStatus, Source, TransactionType};

/// Persisted name of the party used for entries not tied to one driver.
pub const GENERAL_PARTY: &str = "General (Admin)";

/// The party a transaction is booked against.
///
/// Serialized as the driver's name, or as [`GENERAL_PARTY`].
///
/// # Example
///
/// ```
/// use fleet_ledger::models::Party;
///
/// assert_eq!(Party::from_name("General (Admin)"), Party::General);
/// assert_eq!(Party::from_name("Sunny"), Party::Driver("Sunny".to_string()));
/// assert!(Party::Driver("Sunny".to_string()).is_driver("Sunny"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Party {
    /// Booked against the business rather than a driver.
    General,
    /// Booked against a roster driver.
    Driver(String),
}

impl Party {
    /// Parses a persisted party name.
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        if name == GENERAL_PARTY {
            Party::General
        } else {
            Party::Driver(name.to_string())
        }
    }

    /// Returns the persisted party name.
    pub fn name(&self) -> &str {
        match self {
            Party::General => GENERAL_PARTY,
            Party::Driver(name) => name,
        }
    }

    /// Returns true if the party is the given driver.
    pub fn is_driver(&self, driver: &str) -> bool {
        matches!(self, Party::Driver(name) if name == driver)
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Party {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Party {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Party::from_name(&name))
    }
}

/// Represents one money movement in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier for the transaction.
    pub id: String,
    /// When the movement was recorded.
    pub timestamp: DateTime<Utc>,
    /// Who the movement is booked against.
    pub party: Party,
    /// What kind of movement this is.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Amount moved, never negative.
    pub amount: Decimal,
    /// How the money moved (free text, e.g. "Cash").
    pub method: String,
    /// Free-text reference.
    pub notes: String,
    /// Approval gate state.
    pub approval: ApprovalStatus,
    /// Who initiated or is accountable for the movement.
    pub source: Source,
}

impl Transaction {
    /// Returns true when the transaction counts towards balances.
    pub fn is_approved(&self) -> bool {
        self.approval == ApprovalStatus::Approved
    }

    /// Returns the calendar date of the transaction, in the display offset.
    pub fn local_date(&self, offset: FixedOffset) -> NaiveDate {
        self.timestamp.with_timezone(&offset).date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn handover() -> Transaction {
        Transaction {
            id: "TX-001".to_string(),
            timestamp: Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap(),
            party: Party::Driver("Sunny".to_string()),
            kind: TransactionType::Received,
            amount: Decimal::from(500),
            method: "Cash".to_string(),
            notes: String::new(),
            approval: ApprovalStatus::Pending,
            source: Source::Driver,
        }
    }

    #[test]
    fn test_party_round_trips_general_sentinel() {
        let general = Party::from_name(GENERAL_PARTY);
        assert_eq!(general, Party::General);
        assert_eq!(general.name(), "General (Admin)");
        assert!(!general.is_driver("General (Admin)"));
    }

    #[test]
    fn test_party_trims_whitespace() {
        assert_eq!(Party::from_name("  Ijaz "), Party::Driver("Ijaz".to_string()));
    }

    #[test]
    fn test_pending_transaction_is_not_approved() {
        let mut tx = handover();
        assert!(!tx.is_approved());
        tx.approval = ApprovalStatus::Approved;
        assert!(tx.is_approved());
    }

    #[test]
    fn test_transaction_serializes_party_as_name() {
        let json = serde_json::to_value(handover()).unwrap();
        assert_eq!(json["party"], "Sunny");
        assert_eq!(json["type"], "Received");
        assert_eq!(json["approval"], "Pending");
        assert_eq!(json["amount"], "500");
    }

    #[test]
    fn test_transaction_deserializes_general_party() {
        let json = r#"{
            "id": "TX-002",
            "timestamp": "2026-01-15T09:00:00Z",
            "party": "General (Admin)",
            "type": "CEO_Transfer",
            "amount": "1200",
            "method": "Cash",
            "notes": "weekly",
            "approval": "Approved",
            "source": "Manager"
        }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.party, Party::General);
        assert_eq!(tx.kind, TransactionType::CeoTransfer);
        assert_eq!(tx.amount, Decimal::from(1200));
    }
}
