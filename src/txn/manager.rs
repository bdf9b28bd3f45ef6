// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! The database engine: transaction lifecycle and versioned reads/writes.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tracing::debug;

use crate::storage::{Key, Value, Version, VersionStore};

use super::conflict::find_conflict;
use super::error::TxnError;
use super::registry::TransactionRegistry;
use super::transaction::{IsolationLevel, Transaction, TxnId, TxnState};
use super::visibility::is_visible;

/// Configuration for a [`Database`].
#[derive(Debug, Clone, Default)]
pub struct DatabaseConfig {
    /// Isolation level applied to transactions begun without an explicit
    /// level.
    pub default_isolation: IsolationLevel,
}

impl DatabaseConfig {
    /// Creates a configuration with the default isolation level
    /// (Read Committed).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default isolation level.
    pub fn with_default_isolation(mut self, isolation: IsolationLevel) -> Self {
        self.default_isolation = isolation;
        self
    }
}

/// Point-in-time size counters, for observability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DatabaseStats {
    /// Keys with at least one version.
    pub keys: usize,
    /// Versions across all chains, live or not.
    pub versions: usize,
    /// Transactions ever begun.
    pub transactions: usize,
}

/// Store and registry, guarded together so every command sees a consistent
/// view and commits are atomic with respect to readers.
#[derive(Debug, Default)]
struct DatabaseInner {
    default_isolation: IsolationLevel,
    store: VersionStore,
    registry: TransactionRegistry,
}

/// The in-memory MVCC database.
///
/// Commands run to completion under a single mutex; nothing ever waits on
/// another transaction. The id counter is the sole source of transaction
/// ordering, and it is allocated while the lock is held so a begin-time
/// snapshot is always consistent with the allocated id.
#[derive(Debug)]
pub struct Database {
    next_txn_id: AtomicU64,
    inner: Mutex<DatabaseInner>,
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

impl Database {
    /// Creates a database with the default configuration.
    pub fn new() -> Self {
        Self::with_config(DatabaseConfig::default())
    }

    /// Creates a database with the given configuration.
    pub fn with_config(config: DatabaseConfig) -> Self {
        Self {
            next_txn_id: AtomicU64::new(1),
            inner: Mutex::new(DatabaseInner {
                default_isolation: config.default_isolation,
                store: VersionStore::new(),
                registry: TransactionRegistry::new(),
            }),
        }
    }

    /// Returns the isolation level applied at the next begin.
    pub fn default_isolation(&self) -> IsolationLevel {
        self.inner.lock().default_isolation
    }

    /// Changes the isolation level applied to subsequent begins. Running
    /// transactions keep the level they started with.
    pub fn set_default_isolation(&self, isolation: IsolationLevel) {
        self.inner.lock().default_isolation = isolation;
    }

    /// Begins a transaction at the current default isolation level.
    pub fn begin(&self) -> TxnId {
        let mut inner = self.inner.lock();
        let isolation = inner.default_isolation;
        self.begin_locked(&mut inner, isolation)
    }

    /// Begins a transaction at an explicit isolation level.
    pub fn begin_with_isolation(&self, isolation: IsolationLevel) -> TxnId {
        let mut inner = self.inner.lock();
        self.begin_locked(&mut inner, isolation)
    }

    fn begin_locked(&self, inner: &mut DatabaseInner, isolation: IsolationLevel) -> TxnId {
        let id = TxnId(self.next_txn_id.fetch_add(1, Ordering::Relaxed));
        let txn = inner.registry.begin(id, isolation);
        debug!(txn = id.0, %isolation, snapshot = txn.snapshot.len(), "begin");
        id
    }

    /// Reads `key` within transaction `id`.
    ///
    /// The key enters the read set whether or not a visible version exists.
    pub fn get(&self, id: TxnId, key: &Key) -> Result<Option<Value>, TxnError> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        let txn = active_mut(&mut inner.registry, id)?;
        txn.read_set.insert(key.clone());

        let txn = inner
            .registry
            .get(id)
            .ok_or(TxnError::UnknownTransaction { id })?;
        for version in inner.store.chain(key) {
            if is_visible(&inner.registry, txn, version) {
                return Ok(Some(version.value().clone()));
            }
        }
        Ok(None)
    }

    /// Writes `value` under `key` within transaction `id`.
    ///
    /// Marks every version of the key visible to the transaction as
    /// finished, records the key in the write set, and prepends the new
    /// version.
    pub fn set(&self, id: TxnId, key: Key, value: Value) -> Result<(), TxnError> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        active_mut(&mut inner.registry, id)?;
        invalidate(&mut inner.store, &inner.registry, id, &key)?;

        let txn = active_mut(&mut inner.registry, id)?;
        txn.write_set.insert(key.clone());
        inner.store.append(key, Version::new(value, id));
        Ok(())
    }

    /// Deletes `key` within transaction `id`.
    ///
    /// A no-op when no version of the key is visible; only an actual
    /// deletion records the key in the write set.
    pub fn delete(&self, id: TxnId, key: &Key) -> Result<(), TxnError> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        active_mut(&mut inner.registry, id)?;
        let found = invalidate(&mut inner.store, &inner.registry, id, key)?;
        if found {
            let txn = active_mut(&mut inner.registry, id)?;
            txn.write_set.insert(key.clone());
        }
        Ok(())
    }

    /// Commits transaction `id`.
    ///
    /// For Snapshot and Serializable transactions the conflict detector runs
    /// first; on a conflict the transaction is finished as aborted before
    /// the error is returned, so any later visibility check observes the
    /// abort.
    pub fn commit(&self, id: TxnId) -> Result<(), TxnError> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        let last_id = TxnId(self.next_txn_id.load(Ordering::Relaxed) - 1);
        let (isolation, conflict) = {
            let txn = active(&inner.registry, id)?;
            (txn.isolation(), find_conflict(&inner.registry, txn, last_id))
        };

        match conflict {
            Some(other) => {
                inner.registry.finish(id, TxnState::Aborted)?;
                debug!(txn = id.0, other = other.0, "commit aborted on conflict");
                Err(match isolation {
                    IsolationLevel::Snapshot => TxnError::WriteConflict { other },
                    _ => TxnError::ReadConflict { other },
                })
            }
            None => {
                inner.registry.finish(id, TxnState::Committed)?;
                debug!(txn = id.0, "commit");
                Ok(())
            }
        }
    }

    /// Aborts transaction `id`, discarding its writes from every other
    /// transaction's view.
    pub fn abort(&self, id: TxnId) -> Result<(), TxnError> {
        let mut guard = self.inner.lock();
        active(&guard.registry, id)?;
        guard.registry.finish(id, TxnState::Aborted)
    }

    /// Returns the state of transaction `id`, or `None` if the id was never
    /// allocated.
    pub fn status(&self, id: TxnId) -> Option<TxnState> {
        self.inner.lock().registry.status(id)
    }

    /// Returns point-in-time size counters.
    pub fn stats(&self) -> DatabaseStats {
        let inner = self.inner.lock();
        DatabaseStats {
            keys: inner.store.key_count(),
            versions: inner.store.version_count(),
            transactions: inner.registry.len(),
        }
    }
}

/// Marks every version of `key` visible to transaction `id` as finished.
/// Returns whether any version was found.
fn invalidate(
    store: &mut VersionStore,
    registry: &TransactionRegistry,
    id: TxnId,
    key: &Key,
) -> Result<bool, TxnError> {
    let txn = registry
        .get(id)
        .ok_or(TxnError::UnknownTransaction { id })?;

    let mut found = false;
    for version in store.chain_mut(key) {
        if is_visible(registry, txn, version) {
            version.mark_finished(id);
            found = true;
        }
    }
    Ok(found)
}

/// Looks up `id` and requires it to be in progress.
fn active(registry: &TransactionRegistry, id: TxnId) -> Result<&Transaction, TxnError> {
    let txn = registry
        .get(id)
        .ok_or(TxnError::UnknownTransaction { id })?;
    match txn.state() {
        TxnState::InProgress => Ok(txn),
        TxnState::Committed => Err(TxnError::AlreadyCommitted),
        TxnState::Aborted => Err(TxnError::AlreadyAborted),
    }
}

fn active_mut(registry: &mut TransactionRegistry, id: TxnId) -> Result<&mut Transaction, TxnError> {
    let txn = registry
        .get_mut(id)
        .ok_or(TxnError::UnknownTransaction { id })?;
    match txn.state() {
        TxnState::InProgress => Ok(txn),
        TxnState::Committed => Err(TxnError::AlreadyCommitted),
        TxnState::Aborted => Err(TxnError::AlreadyAborted),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_monotonic() {
        let db = Database::new();
        let first = db.begin();
        let second = db.begin();
        assert!(first < second);
        assert_eq!(first, TxnId(1));
    }

    #[test]
    fn test_read_your_writes() {
        let db = Database::new();
        let txn = db.begin();
        let key = Key::from("key");

        db.set(txn, key.clone(), Value::from("value")).unwrap();
        assert_eq!(db.get(txn, &key).unwrap(), Some(Value::from("value")));
    }

    #[test]
    fn test_get_missing_key() {
        let db = Database::new();
        let txn = db.begin();
        assert_eq!(db.get(txn, &Key::from("nope")).unwrap(), None);
    }

    #[test]
    fn test_self_overwrite_keeps_newest() {
        let db = Database::new();
        let txn = db.begin();
        let key = Key::from("k");

        db.set(txn, key.clone(), Value::from("a")).unwrap();
        db.set(txn, key.clone(), Value::from("b")).unwrap();
        assert_eq!(db.get(txn, &key).unwrap(), Some(Value::from("b")));

        // Both versions are retained; the older one was finished by the
        // same transaction.
        assert_eq!(db.stats().versions, 2);
    }

    #[test]
    fn test_set_then_delete_same_txn() {
        let db = Database::new();
        let txn = db.begin();
        let key = Key::from("k");

        db.set(txn, key.clone(), Value::from("v")).unwrap();
        db.delete(txn, &key).unwrap();
        assert_eq!(db.get(txn, &key).unwrap(), None);
    }

    #[test]
    fn test_delete_missing_key_leaves_write_set_empty() {
        let db = Database::new();
        db.set_default_isolation(IsolationLevel::Snapshot);

        let t1 = db.begin();
        let t2 = db.begin();

        db.delete(t1, &Key::from("ghost")).unwrap();
        db.set(t2, Key::from("ghost"), Value::from("v")).unwrap();
        db.commit(t2).unwrap();

        // Had the no-op delete entered t1's write set, this commit would
        // conflict with t2.
        db.commit(t1).unwrap();
    }

    #[test]
    fn test_abort_hides_writes() {
        let db = Database::new();
        let t1 = db.begin();
        db.set(t1, Key::from("x"), Value::from("v")).unwrap();
        db.abort(t1).unwrap();

        let t2 = db.begin();
        assert_eq!(db.get(t2, &Key::from("x")).unwrap(), None);
        assert_eq!(db.status(t1), Some(TxnState::Aborted));
    }

    #[test]
    fn test_committed_write_has_version_with_start() {
        let db = Database::new();
        let t1 = db.begin();
        db.set(t1, Key::from("x"), Value::from("v")).unwrap();
        db.commit(t1).unwrap();

        let stats = db.stats();
        assert_eq!(stats.keys, 1);
        assert_eq!(stats.versions, 1);
        assert_eq!(db.status(t1), Some(TxnState::Committed));
    }

    #[test]
    fn test_ops_on_finished_txn_fail() {
        let db = Database::new();
        let txn = db.begin();
        db.commit(txn).unwrap();

        assert!(matches!(
            db.get(txn, &Key::from("x")),
            Err(TxnError::AlreadyCommitted)
        ));
        assert!(matches!(db.commit(txn), Err(TxnError::AlreadyCommitted)));

        let txn = db.begin();
        db.abort(txn).unwrap();
        assert!(matches!(
            db.set(txn, Key::from("x"), Value::from("v")),
            Err(TxnError::AlreadyAborted)
        ));
    }

    #[test]
    fn test_unknown_txn_rejected() {
        let db = Database::new();
        assert!(matches!(
            db.get(TxnId(99), &Key::from("x")),
            Err(TxnError::UnknownTransaction { id: TxnId(99) })
        ));
    }

    #[test]
    fn test_conflict_commit_observes_abort() {
        let db = Database::with_config(
            DatabaseConfig::new().with_default_isolation(IsolationLevel::Snapshot),
        );

        let t1 = db.begin();
        let t2 = db.begin();
        db.set(t1, Key::from("x"), Value::from("a")).unwrap();
        db.set(t2, Key::from("x"), Value::from("b")).unwrap();
        db.commit(t1).unwrap();

        assert!(matches!(
            db.commit(t2),
            Err(TxnError::WriteConflict { other }) if other == t1
        ));
        // The loser is recorded as aborted, not committed.
        assert_eq!(db.status(t2), Some(TxnState::Aborted));
    }

    #[test]
    fn test_default_isolation_applied_at_begin() {
        let db = Database::new();
        assert_eq!(db.default_isolation(), IsolationLevel::ReadCommitted);

        db.set_default_isolation(IsolationLevel::Serializable);
        let txn = db.begin();

        // A Serializable reader records reads and conflicts with a later
        // committed writer of the same key.
        db.get(txn, &Key::from("x")).unwrap();
        let writer = db.begin_with_isolation(IsolationLevel::ReadCommitted);
        db.set(writer, Key::from("x"), Value::from("v")).unwrap();
        db.commit(writer).unwrap();

        assert!(matches!(db.commit(txn), Err(TxnError::ReadConflict { .. })));
    }
}
