// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Commit-time conflict detection for Snapshot and Serializable commits.

use super::registry::TransactionRegistry;
use super::transaction::{IsolationLevel, Transaction, TxnId};

/// Scans for a committed transaction that conflicts with `txn`.
///
/// Candidates are the transactions that could have been concurrent with
/// `txn`: those in its begin-time snapshot, plus every id allocated after it
/// up to `last_id`. Ids never recorded in the registry contribute nothing.
///
/// Snapshot flags overlapping write sets; Serializable additionally flags a
/// read on either side of the other's write. Weaker levels never conflict.
///
/// Returns the id of the first conflicting transaction found.
pub(crate) fn find_conflict(
    registry: &TransactionRegistry,
    txn: &Transaction,
    last_id: TxnId,
) -> Option<TxnId> {
    if !txn.isolation.validates_at_commit() {
        return None;
    }

    let started_after = (txn.id.0 + 1..=last_id.0).map(TxnId);
    let candidates = txn.snapshot.iter().copied().chain(started_after);

    for other_id in candidates {
        let Some(other) = registry.get(other_id) else {
            continue;
        };
        if !other.is_committed() {
            continue;
        }

        let overlaps = match txn.isolation {
            IsolationLevel::Snapshot => !txn.write_set.is_disjoint(&other.write_set),
            IsolationLevel::Serializable => {
                !txn.read_set.is_disjoint(&other.write_set)
                    || !txn.write_set.is_disjoint(&other.read_set)
            }
            _ => false,
        };
        if overlaps {
            return Some(other_id);
        }
    }
    None
}
