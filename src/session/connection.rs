// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Client sessions and the command dispatcher.

use std::sync::Arc;

use crate::storage::{Key, Value};
use crate::txn::{Database, IsolationLevel, TxnError, TxnId};

/// A command a session can execute.
///
/// Three control commands drive the transaction lifecycle; the three data
/// commands operate on keys within the current transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Begin,
    Commit,
    Abort,
    Get(Key),
    Set(Key, Value),
    Delete(Key),
}

/// A client session bound to a database.
///
/// A connection runs at most one transaction at a time. Issuing a data
/// command with no transaction in progress, or `Begin` with one already
/// running, fails without touching engine state.
#[derive(Debug)]
pub struct Connection {
    db: Arc<Database>,
    current: Option<TxnId>,
}

impl Connection {
    /// Creates a session on `db`.
    pub fn new(db: Arc<Database>) -> Self {
        Self { db, current: None }
    }

    /// Begins a transaction at the database's default isolation level.
    pub fn begin(&mut self) -> Result<(), TxnError> {
        if self.current.is_some() {
            return Err(TxnError::TransactionInProgress);
        }
        self.current = Some(self.db.begin());
        Ok(())
    }

    /// Begins a transaction at an explicit isolation level.
    pub fn begin_with_isolation(&mut self, isolation: IsolationLevel) -> Result<(), TxnError> {
        if self.current.is_some() {
            return Err(TxnError::TransactionInProgress);
        }
        self.current = Some(self.db.begin_with_isolation(isolation));
        Ok(())
    }

    /// Commits the current transaction.
    ///
    /// The session's transaction slot is cleared whether the commit
    /// succeeds or aborts on a conflict.
    pub fn commit(&mut self) -> Result<(), TxnError> {
        let id = self.current.take().ok_or(TxnError::NoActiveTransaction)?;
        self.db.commit(id)
    }

    /// Aborts the current transaction.
    pub fn abort(&mut self) -> Result<(), TxnError> {
        let id = self.current.take().ok_or(TxnError::NoActiveTransaction)?;
        self.db.abort(id)
    }

    /// Reads a key within the current transaction. Returns `None` when no
    /// version is visible.
    pub fn get(&mut self, key: impl Into<Key>) -> Result<Option<Value>, TxnError> {
        let id = self.current.ok_or(TxnError::NoActiveTransaction)?;
        self.db.get(id, &key.into())
    }

    /// Writes a key within the current transaction.
    pub fn set(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> Result<(), TxnError> {
        let id = self.current.ok_or(TxnError::NoActiveTransaction)?;
        self.db.set(id, key.into(), value.into())
    }

    /// Deletes a key within the current transaction.
    pub fn delete(&mut self, key: impl Into<Key>) -> Result<(), TxnError> {
        let id = self.current.ok_or(TxnError::NoActiveTransaction)?;
        self.db.delete(id, &key.into())
    }

    /// Executes one command. Only `Get` produces a value.
    pub fn exec(&mut self, command: Command) -> Result<Option<Value>, TxnError> {
        match command {
            Command::Begin => self.begin().map(|()| None),
            Command::Commit => self.commit().map(|()| None),
            Command::Abort => self.abort().map(|()| None),
            Command::Get(key) => self.get(key),
            Command::Set(key, value) => self.set(key, value).map(|()| None),
            Command::Delete(key) => self.delete(key).map(|()| None),
        }
    }

    /// Returns true if a transaction is in progress on this session.
    #[inline]
    pub fn in_transaction(&self) -> bool {
        self.current.is_some()
    }

    /// Returns the current transaction's id, if any.
    #[inline]
    pub fn transaction_id(&self) -> Option<TxnId> {
        self.current
    }

    /// Returns the shared database handle.
    #[inline]
    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }
}
