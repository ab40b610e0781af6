// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Paperstack — View models.
//
// Two state containers sit between the UI and the backend crates: one for the
// document list (refresh, create from scan, delete, scanner visibility) and
// one for a single document (rename, PDF export, print, share). Each publishes
// a snapshot on a `tokio::sync::watch` channel after every state change.
//
// Failures never escape as errors: they are logged where they are detected
// and reported to the caller as `None`/`false`.

pub mod detail;
pub mod documents;
pub mod shared;

pub use detail::{DetailSnapshot, DocumentDetailViewModel, PageListing};
pub use documents::{DocumentsSnapshot, DocumentsViewModel};
pub use shared::{DynStore, SharedBridge, SharedStore, lock_store};

/// MIME type handed to the print dialog and share sheet.
pub const PDF_MIME_TYPE: &str = "application/pdf";
