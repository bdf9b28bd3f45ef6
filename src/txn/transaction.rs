// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Transaction types and state management.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::storage::Key;

/// Unique transaction identifier.
///
/// Ids are allocated monotonically starting at 1; [`TxnId::NONE`] is the
/// sentinel for "no transaction" and marks live versions in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TxnId(pub u64);

impl TxnId {
    /// The "no transaction" sentinel.
    pub const NONE: TxnId = TxnId(0);

    /// Returns true if this is the sentinel id.
    #[inline]
    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

/// Transaction isolation levels, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IsolationLevel {
    /// Reads see the newest unfinished version, even from uncommitted or
    /// aborted writers.
    ReadUncommitted,
    /// Reads see only committed data, re-evaluated at every read.
    #[default]
    ReadCommitted,
    /// Reads come from a snapshot taken at begin.
    RepeatableRead,
    /// Repeatable Read plus write-write conflict detection at commit.
    Snapshot,
    /// Snapshot plus read-write conflict detection at commit.
    Serializable,
}

impl IsolationLevel {
    /// Returns true if reads are served from the begin-time snapshot.
    #[inline]
    pub fn is_snapshot_based(self) -> bool {
        matches!(
            self,
            Self::RepeatableRead | Self::Snapshot | Self::Serializable
        )
    }

    /// Returns true if commit runs the conflict detector.
    #[inline]
    pub fn validates_at_commit(self) -> bool {
        matches!(self, Self::Snapshot | Self::Serializable)
    }
}

impl fmt::Display for IsolationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ReadUncommitted => "read uncommitted",
            Self::ReadCommitted => "read committed",
            Self::RepeatableRead => "repeatable read",
            Self::Snapshot => "snapshot",
            Self::Serializable => "serializable",
        };
        f.write_str(name)
    }
}

/// Error returned when parsing an unknown isolation level name.
#[derive(Debug, thiserror::Error)]
#[error("unknown isolation level: {0}")]
pub struct ParseIsolationLevelError(String);

impl FromStr for IsolationLevel {
    type Err = ParseIsolationLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], " ").as_str() {
            "read uncommitted" => Ok(Self::ReadUncommitted),
            "read committed" => Ok(Self::ReadCommitted),
            "repeatable read" => Ok(Self::RepeatableRead),
            "snapshot" => Ok(Self::Snapshot),
            "serializable" => Ok(Self::Serializable),
            _ => Err(ParseIsolationLevelError(s.to_string())),
        }
    }
}

/// Transaction state. Transitions out of `InProgress` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxnState {
    InProgress,
    Committed,
    Aborted,
}

/// A transaction record.
///
/// Carries the begin-time snapshot of in-progress transactions and the keys
/// this transaction has read and written. The sets only grow while the
/// transaction is in progress; they are frozen once it commits or aborts.
#[derive(Debug, Clone)]
pub struct Transaction {
    /// Unique identifier for this transaction.
    pub(crate) id: TxnId,
    /// Isolation level, fixed at begin.
    pub(crate) isolation: IsolationLevel,
    /// Current state.
    pub(crate) state: TxnState,
    /// Ids of transactions that were in progress when this one began.
    /// Never contains this transaction's own id.
    pub(crate) snapshot: BTreeSet<TxnId>,
    /// Keys this transaction has read.
    pub(crate) read_set: BTreeSet<Key>,
    /// Keys this transaction has written or deleted.
    pub(crate) write_set: BTreeSet<Key>,
}

impl Transaction {
    pub(crate) fn new(id: TxnId, isolation: IsolationLevel, snapshot: BTreeSet<TxnId>) -> Self {
        debug_assert!(!snapshot.contains(&id));
        Self {
            id,
            isolation,
            state: TxnState::InProgress,
            snapshot,
            read_set: BTreeSet::new(),
            write_set: BTreeSet::new(),
        }
    }

    /// Returns the transaction id.
    #[inline]
    pub fn id(&self) -> TxnId {
        self.id
    }

    /// Returns the isolation level.
    #[inline]
    pub fn isolation(&self) -> IsolationLevel {
        self.isolation
    }

    /// Returns the current state.
    #[inline]
    pub fn state(&self) -> TxnState {
        self.state
    }

    /// Returns true if the transaction is in progress.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.state == TxnState::InProgress
    }

    /// Returns true if the transaction committed.
    #[inline]
    pub fn is_committed(&self) -> bool {
        self.state == TxnState::Committed
    }

    /// Returns true if the transaction aborted.
    #[inline]
    pub fn is_aborted(&self) -> bool {
        self.state == TxnState::Aborted
    }

    /// Returns the number of keys read so far.
    #[inline]
    pub fn read_count(&self) -> usize {
        self.read_set.len()
    }

    /// Returns the number of keys written or deleted so far.
    #[inline]
    pub fn write_count(&self) -> usize {
        self.write_set.len()
    }
}
