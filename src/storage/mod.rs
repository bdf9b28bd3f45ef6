// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Version-chained key/value storage.
//!
//! This module provides the storage half of the MVCC engine: every write
//! creates a new [`Version`] carrying the writing transaction's id, and every
//! key maps to a chain of versions ordered newest-first.
//!
//! # Key Concepts
//!
//! A version is live while its `finish` id is [`TxnId::NONE`]; overwriting or
//! deleting a key does not remove anything, it marks the visible versions
//! finished and (for writes) prepends a fresh one. Which version of a chain a
//! reader actually sees is not decided here at all; the visibility rules
//! live in the transaction layer, parameterised by isolation level.
//!
//! # Example
//!
//! ```
//! use lithiumdb::storage::{Key, Value, Version, VersionStore};
//! use lithiumdb::txn::TxnId;
//!
//! let mut store = VersionStore::new();
//! store.append(Key::from("greeting"), Version::new(Value::from("hello"), TxnId(1)));
//! store.append(Key::from("greeting"), Version::new(Value::from("hey"), TxnId(2)));
//!
//! // Chains are walked newest-first.
//! let newest = store.chain(&Key::from("greeting")).next().unwrap();
//! assert_eq!(newest.value().as_str(), "hey");
//! ```
//!
//! [`TxnId::NONE`]: crate::txn::TxnId::NONE

mod store;
mod version;

pub use store::VersionStore;
pub use version::{Key, Value, Version};
