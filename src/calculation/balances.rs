//! Ledger balance derivation.
//!
//! Balances are never stored: they are recomputed from the approved subset
//! of the transactions table whenever they are needed. Pending entries do
//! not move any balance.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Shift, Source, Transaction, TransactionType};

use super::saturating_sum;

/// Totals derived from the approved transactions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LedgerBalances {
    /// Cash handed over by drivers.
    pub received: Decimal,
    /// Advances paid out to drivers.
    pub advances_given: Decimal,
    /// Cash the manager passed on to the owner.
    pub manager_to_ceo: Decimal,
    /// Vehicle costs.
    pub expenses: Decimal,
    /// Cash the manager should physically hold:
    /// `received - advances_given - manager_to_ceo`.
    pub safe_cash: Decimal,
}

/// Computes the ledger balances from a transaction snapshot.
///
/// Only `Approved` entries count. `manager_to_ceo` only counts transfers
/// whose source is the manager.
///
/// # Examples
///
/// ```
/// use fleet_ledger::calculation::ledger_balances;
/// use fleet_ledger::models::{ApprovalStatus, Party, Source, Transaction, TransactionType};
/// use chrono::Utc;
/// use rust_decimal::Decimal;
///
/// let tx = |kind, amount: i64, approval| Transaction {
///     id: "t".to_string(),
///     timestamp: Utc::now(),
///     party: Party::Driver("Sunny".to_string()),
///     kind,
///     amount: Decimal::from(amount),
///     method: "Cash".to_string(),
///     notes: String::new(),
///     approval,
///     source: Source::Manager,
/// };
///
/// let balances = ledger_balances(&[
///     tx(TransactionType::Received, 1000, ApprovalStatus::Approved),
///     tx(TransactionType::Advance, 300, ApprovalStatus::Approved),
///     tx(TransactionType::Received, 500, ApprovalStatus::Pending),
/// ]);
/// assert_eq!(balances.received, Decimal::from(1000));
/// assert_eq!(balances.safe_cash, Decimal::from(700));
/// ```
pub fn ledger_balances(transactions: &[Transaction]) -> LedgerBalances {
    let mut balances = LedgerBalances::default();

    for tx in transactions.iter().filter(|tx| tx.is_approved()) {
        match tx.kind {
            TransactionType::Received => add(&mut balances.received, tx.amount),
            TransactionType::Advance => add(&mut balances.advances_given, tx.amount),
            TransactionType::CeoTransfer if tx.source == Source::Manager => {
                add(&mut balances.manager_to_ceo, tx.amount)
            }
            TransactionType::Expense => add(&mut balances.expenses, tx.amount),
            TransactionType::CeoTransfer | TransactionType::Challan => {}
        }
    }

    balances.safe_cash = balances
        .received
        .saturating_sub(balances.advances_given)
        .saturating_sub(balances.manager_to_ceo);
    balances
}

fn add(total: &mut Decimal, amount: Decimal) {
    *total = total.saturating_add(amount);
}

fn approved_total(transactions: &[Transaction], driver: &str, kind: TransactionType) -> Decimal {
    saturating_sum(
        transactions
            .iter()
            .filter(|tx| tx.is_approved() && tx.kind == kind && tx.party.is_driver(driver))
            .map(|tx| tx.amount),
    )
}

/// Sums the approved challans booked against a driver.
pub fn driver_fines(transactions: &[Transaction], driver: &str) -> Decimal {
    approved_total(transactions, driver, TransactionType::Challan)
}

/// Sums the approved advances paid to a driver.
pub fn driver_advances(transactions: &[Transaction], driver: &str) -> Decimal {
    approved_total(transactions, driver, TransactionType::Advance)
}

/// The manager's finance dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinanceSummary {
    /// Derived ledger balances.
    #[serde(flatten)]
    pub balances: LedgerBalances,
    /// Earnings over every completed shift ("total work done").
    pub gross_revenue: Decimal,
}

/// Builds the finance summary from a full snapshot.
pub fn finance_summary(shifts: &[Shift], transactions: &[Transaction]) -> FinanceSummary {
    let gross_revenue = saturating_sum(
        shifts
            .iter()
            .filter(|shift| shift.is_settled())
            .map(|shift| shift.total_earnings),
    );

    FinanceSummary {
        balances: ledger_balances(transactions),
        gross_revenue,
    }
}
