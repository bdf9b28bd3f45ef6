// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Transaction layer: isolation levels, visibility, and conflict detection.
//!
//! This module provides MVCC transactions over the version store with five
//! isolation levels:
//! - Read Uncommitted, Read Committed
//! - Repeatable Read, Snapshot, Serializable (all snapshot-readers)
//!
//! # Key Concepts
//!
//! ## Id-ordered snapshots
//!
//! Transaction ids are the only ordering in the system; there are no clocks.
//! Each transaction captures, at begin, the set of ids still in progress.
//! The snapshot-based levels read as of that instant: a version is visible
//! only if its writer committed before the reader began, and a deletion is
//! honoured only if the deleter did too.
//!
//! ## Optimistic commits
//!
//! Nothing blocks. Writers do not take locks and readers never wait;
//! instead, Snapshot and Serializable transactions track the keys they
//! touched and validate them at commit against every concurrent committed
//! transaction. A write-write overlap (Snapshot) or read-write overlap
//! (Serializable) aborts the committer, which observes the abort as an
//! error from commit.
//!
//! # Example
//!
//! ```
//! use lithiumdb::storage::{Key, Value};
//! use lithiumdb::txn::{Database, IsolationLevel, TxnError};
//!
//! fn example() -> Result<(), TxnError> {
//!     let db = Database::new();
//!
//!     let txn = db.begin_with_isolation(IsolationLevel::Snapshot);
//!     db.set(txn, Key::from("counter"), Value::from("1"))?;
//!     assert_eq!(db.get(txn, &Key::from("counter"))?, Some(Value::from("1")));
//!     db.commit(txn)?;
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

mod conflict;
mod error;
mod manager;
mod registry;
mod transaction;
mod visibility;

pub use error::TxnError;
pub use manager::{Database, DatabaseConfig, DatabaseStats};
pub use registry::TransactionRegistry;
pub use transaction::{
    IsolationLevel, ParseIsolationLevelError, Transaction, TxnId, TxnState,
};
