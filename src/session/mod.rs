// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Client sessions over a shared database.
//!
//! A [`Connection`] binds an `Arc<Database>` to at most one in-flight
//! transaction and exposes the command surface: `Begin`, `Commit`, `Abort`,
//! `Get`, `Set`, `Delete`. Sessions are cheap; open one per client.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use lithiumdb::session::Connection;
//! use lithiumdb::storage::Value;
//! use lithiumdb::txn::Database;
//!
//! let db = Arc::new(Database::new());
//! let mut writer = Connection::new(db.clone());
//! let mut reader = Connection::new(db);
//!
//! writer.begin().unwrap();
//! writer.set("x", "hey").unwrap();
//! writer.commit().unwrap();
//!
//! reader.begin().unwrap();
//! assert_eq!(reader.get("x").unwrap(), Some(Value::from("hey")));
//! ```

mod connection;

pub use connection::{Command, Connection};
