// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Transaction error types.

use super::TxnId;

/// Errors that can occur in transaction operations.
///
/// The two conflict variants are only ever returned from commit; by the time
/// either surfaces, the committing transaction has already been finished as
/// aborted.
#[derive(Debug, thiserror::Error)]
pub enum TxnError {
    #[error("write-write conflict with committed transaction {other:?}")]
    WriteConflict { other: TxnId },

    #[error("read-write conflict with committed transaction {other:?}")]
    ReadConflict { other: TxnId },

    #[error("no transaction in progress")]
    NoActiveTransaction,

    #[error("a transaction is already in progress")]
    TransactionInProgress,

    #[error("transaction already committed")]
    AlreadyCommitted,

    #[error("transaction already aborted")]
    AlreadyAborted,

    #[error("unknown transaction {id:?}")]
    UnknownTransaction { id: TxnId },
}
