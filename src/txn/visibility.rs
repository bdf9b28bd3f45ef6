// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Per-isolation-level version visibility.
//!
//! The predicate is a pure function of the registry, the reading
//! transaction, and one version. A read walks its key's chain newest-first
//! and returns the first version the predicate accepts.

use crate::storage::Version;

use super::registry::TransactionRegistry;
use super::transaction::{IsolationLevel, Transaction, TxnId, TxnState};

/// Decides whether `version` is live from `txn`'s vantage point.
pub(crate) fn is_visible(
    registry: &TransactionRegistry,
    txn: &Transaction,
    version: &Version,
) -> bool {
    match txn.isolation {
        // The newest unfinished version wins, no matter who wrote it or
        // whether the writer has aborted since.
        IsolationLevel::ReadUncommitted => version.is_live(),
        IsolationLevel::ReadCommitted => read_committed_visible(registry, txn, version),
        IsolationLevel::RepeatableRead
        | IsolationLevel::Snapshot
        | IsolationLevel::Serializable => snapshot_visible(registry, txn, version),
    }
}

fn committed(registry: &TransactionRegistry, id: TxnId) -> bool {
    registry.status(id) == Some(TxnState::Committed)
}

/// Read Committed: the writer must be this transaction or committed, and the
/// version must not have been invalidated by this transaction or by any
/// committed one.
fn read_committed_visible(
    registry: &TransactionRegistry,
    txn: &Transaction,
    version: &Version,
) -> bool {
    if version.start() != txn.id && !committed(registry, version.start()) {
        return false;
    }
    if version.finish() == txn.id {
        return false;
    }
    if !version.is_live() && committed(registry, version.finish()) {
        return false;
    }
    true
}

/// Repeatable Read, Snapshot, and Serializable all read from the begin-time
/// snapshot: versions created after this transaction began are invisible,
/// and deletions committed after it began are ignored.
fn snapshot_visible(
    registry: &TransactionRegistry,
    txn: &Transaction,
    version: &Version,
) -> bool {
    if version.start() > txn.id {
        return false;
    }
    if txn.snapshot.contains(&version.start()) {
        return false;
    }
    if version.start() != txn.id && !committed(registry, version.start()) {
        return false;
    }
    if version.finish() == txn.id {
        return false;
    }
    // A deletion counts only if the deleter committed before this
    // transaction began.
    if !version.is_live()
        && version.finish() < txn.id
        && committed(registry, version.finish())
        && !txn.snapshot.contains(&version.finish())
    {
        return false;
    }
    true
}
