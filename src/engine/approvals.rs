//! The approval queue.
//!
//! Pending shift requests and pending driver transactions are merged into a
//! single queue the admin works through. Each entry carries exactly two
//! actions, approve and reject.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::FleetResult;
use crate::models::{ApprovalStatus, Shift, Transaction};

use super::{FleetEngine, ShiftRejection};

/// Which table a queue entry comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// A shift start or end request.
    Shift,
    /// A driver-recorded transaction.
    Transaction,
}

/// An action available on a queue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalAction {
    /// Approve a shift request.
    ApproveShift,
    /// Reject a shift request.
    RejectShift,
    /// Approve a pending transaction.
    ApproveTransaction,
    /// Reject (delete) a pending transaction.
    RejectTransaction,
}

/// The admin's decision on a queue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalDecision {
    /// Accept the request.
    Approve,
    /// Refuse the request.
    Reject,
}

/// A record waiting for approval.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PendingItem {
    /// A shift in `Pending_Start` or `Pending_End`.
    Shift(Shift),
    /// A transaction in `Pending`.
    Transaction(Transaction),
}

impl PendingItem {
    /// Returns the record identifier.
    pub fn id(&self) -> &str {
        match self {
            PendingItem::Shift(shift) => &shift.id,
            PendingItem::Transaction(tx) => &tx.id,
        }
    }

    /// Returns which table the item comes from.
    pub fn kind(&self) -> ItemKind {
        match self {
            PendingItem::Shift(_) => ItemKind::Shift,
            PendingItem::Transaction(_) => ItemKind::Transaction,
        }
    }

    /// Returns the approve and reject actions for this item.
    pub fn actions(&self) -> [ApprovalAction; 2] {
        match self {
            PendingItem::Shift(_) => [ApprovalAction::ApproveShift, ApprovalAction::RejectShift],
            PendingItem::Transaction(_) => [
                ApprovalAction::ApproveTransaction,
                ApprovalAction::RejectTransaction,
            ],
        }
    }
}

/// One entry of the approval queue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueEntry {
    /// Approve and reject, in that order.
    pub actions: [ApprovalAction; 2],
    /// The pending record.
    #[serde(flatten)]
    pub item: PendingItem,
}

/// Everything awaiting the admin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApprovalQueue {
    /// Pending shifts first, then pending transactions, each in table order.
    pub entries: Vec<QueueEntry>,
    /// Number of entries.
    pub total: usize,
}

impl ApprovalQueue {
    /// Returns true when nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Result of deciding on a queue entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DecisionOutcome {
    /// A shift request was approved.
    ShiftApproved {
        /// The shift after approval.
        shift: Shift,
    },
    /// A shift request was rejected.
    ShiftRejected {
        /// What the rejection did.
        rejection: ShiftRejection,
    },
    /// A pending transaction was approved.
    TransactionApproved {
        /// The transaction after approval.
        transaction: Transaction,
    },
    /// A pending transaction was deleted.
    TransactionRejected {
        /// The deleted transaction.
        transaction: Transaction,
    },
}

impl FleetEngine {
    /// Lists every record awaiting approval.
    pub fn approval_queue(&self) -> FleetResult<ApprovalQueue> {
        let snapshot = self.snapshot()?;

        let shifts = snapshot
            .shifts
            .into_iter()
            .filter(|shift| shift.status.is_pending())
            .map(PendingItem::Shift);
        let transactions = snapshot
            .transactions
            .into_iter()
            .filter(|tx| tx.approval == ApprovalStatus::Pending)
            .map(PendingItem::Transaction);

        let entries: Vec<QueueEntry> = shifts
            .chain(transactions)
            .map(|item| QueueEntry {
                actions: item.actions(),
                item,
            })
            .collect();

        debug!(pending = entries.len(), "approval queue loaded");
        Ok(ApprovalQueue {
            total: entries.len(),
            entries,
        })
    }

    /// Applies a decision to the queue entry `id` of the given kind.
    ///
    /// # Errors
    ///
    /// `NotFound` if the record is not pending, plus any store failure.
    pub fn decide(
        &self,
        kind: ItemKind,
        id: &str,
        decision: ApprovalDecision,
    ) -> FleetResult<DecisionOutcome> {
        Ok(match (kind, decision) {
            (ItemKind::Shift, ApprovalDecision::Approve) => DecisionOutcome::ShiftApproved {
                shift: self.approve_shift(id)?,
            },
            (ItemKind::Shift, ApprovalDecision::Reject) => DecisionOutcome::ShiftRejected {
                rejection: self.reject_shift(id)?,
            },
            (ItemKind::Transaction, ApprovalDecision::Approve) => {
                DecisionOutcome::TransactionApproved {
                    transaction: self.approve_transaction(id)?,
                }
            }
            (ItemKind::Transaction, ApprovalDecision::Reject) => {
                DecisionOutcome::TransactionRejected {
                    transaction: self.reject_transaction(id)?,
                }
            }
        })
    }
}
