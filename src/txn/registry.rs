// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Registry of every transaction the database has ever started.

use std::collections::{BTreeSet, HashMap};

use super::error::TxnError;
use super::transaction::{IsolationLevel, Transaction, TxnId, TxnState};

/// Registry of every transaction ever begun.
///
/// Records are kept after commit or abort: the visibility predicate and the
/// conflict detector both look up the status and the read/write sets of
/// finished transactions by id.
#[derive(Debug, Default)]
pub struct TransactionRegistry {
    txns: HashMap<TxnId, Transaction>,
}

impl TransactionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            txns: HashMap::new(),
        }
    }

    /// Records a new in-progress transaction under `id`.
    ///
    /// The begin-time snapshot is captured here, before the new record is
    /// inserted, so a transaction never appears in its own snapshot.
    pub(crate) fn begin(&mut self, id: TxnId, isolation: IsolationLevel) -> &Transaction {
        debug_assert!(!id.is_none());
        debug_assert!(!self.txns.contains_key(&id));

        let snapshot = self.in_progress_ids();
        self.txns
            .entry(id)
            .or_insert_with(|| Transaction::new(id, isolation, snapshot))
    }

    /// Looks up a transaction by id.
    pub fn get(&self, id: TxnId) -> Option<&Transaction> {
        self.txns.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: TxnId) -> Option<&mut Transaction> {
        self.txns.get_mut(&id)
    }

    /// Returns the state of `id`, or `None` if the id was never allocated.
    pub fn status(&self, id: TxnId) -> Option<TxnState> {
        self.txns.get(&id).map(|txn| txn.state)
    }

    /// Moves `id` into a terminal state. The transaction must still be in
    /// progress.
    pub(crate) fn finish(&mut self, id: TxnId, state: TxnState) -> Result<(), TxnError> {
        debug_assert_ne!(state, TxnState::InProgress);

        let txn = self
            .txns
            .get_mut(&id)
            .ok_or(TxnError::UnknownTransaction { id })?;
        match txn.state {
            TxnState::InProgress => {
                txn.state = state;
                Ok(())
            }
            TxnState::Committed => Err(TxnError::AlreadyCommitted),
            TxnState::Aborted => Err(TxnError::AlreadyAborted),
        }
    }

    /// Returns the ids of all in-progress transactions.
    pub fn in_progress_ids(&self) -> BTreeSet<TxnId> {
        self.txns
            .values()
            .filter(|txn| txn.is_active())
            .map(|txn| txn.id)
            .collect()
    }

    /// Returns the number of transactions ever begun.
    #[inline]
    pub fn len(&self) -> usize {
        self.txns.len()
    }

    /// Returns true if no transaction has ever begun.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.txns.is_empty()
    }
}
