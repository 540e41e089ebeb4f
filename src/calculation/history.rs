//! Shift and transaction history logs.

use crate::models::{Shift, ShiftStatus, Transaction};

/// Returns completed shifts and shifts awaiting end approval, newest first.
///
/// With `driver` set, only that driver's shifts are returned.
pub fn shift_history(shifts: &[Shift], driver: Option<&str>) -> Vec<Shift> {
    let mut history: Vec<Shift> = shifts
        .iter()
        .filter(|shift| matches!(shift.status, ShiftStatus::Completed | ShiftStatus::PendingEnd))
        .filter(|shift| driver.is_none_or(|d| shift.driver == d))
        .cloned()
        .collect();
    history.sort_by(|a, b| b.start_time.cmp(&a.start_time));
    history
}

/// Returns transactions newest first, optionally for one driver.
pub fn transaction_history(transactions: &[Transaction], driver: Option<&str>) -> Vec<Transaction> {
    let mut history: Vec<Transaction> = transactions
        .iter()
        .filter(|tx| driver.is_none_or(|d| tx.party.is_driver(d)))
        .cloned()
        .collect();
    history.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    history
}
