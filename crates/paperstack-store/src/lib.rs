// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// paperstack-store — Durable document storage.
//
// `DocumentStore` is the repository interface the view models talk to;
// `SqliteDocumentStore` is the implementation used by the app and the tests.

pub mod sqlite;
pub mod store;

pub use sqlite::SqliteDocumentStore;
pub use store::DocumentStore;
