// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! LithiumDB: an in-memory multi-version key/value store with five
//! transaction isolation levels.
//!
//! Every write creates a new version; readers pick the version their
//! isolation level allows, and the two strictest levels (Snapshot,
//! Serializable) validate their read/write sets at commit instead of ever
//! blocking. All state is process-local and volatile.

pub mod session;
pub mod storage;
pub mod txn;

pub use session::{Command, Connection};
pub use storage::{Key, Value, Version, VersionStore};
pub use txn::{
    Database, DatabaseConfig, DatabaseStats, IsolationLevel, ParseIsolationLevelError,
    Transaction, TransactionRegistry, TxnError, TxnId, TxnState,
};
