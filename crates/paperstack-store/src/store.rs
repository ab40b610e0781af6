// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Repository interface over persisted documents.

use paperstack_core::error::Result;
use paperstack_core::{Document, DocumentId, SortOrder};

/// A keyed, durable collection of documents.
///
/// Changes to a `Document` value are not written back implicitly; callers
/// commit them with [`DocumentStore::save`].
pub trait DocumentStore {
    /// Every stored document, pages included, in the requested order.
    fn fetch_all(&self, order: SortOrder) -> Result<Vec<Document>>;

    /// A single document by id, or `None` if it does not exist.
    fn get(&self, id: DocumentId) -> Result<Option<Document>>;

    /// Persist a new document together with all its pages.
    fn insert(&mut self, document: &Document) -> Result<()>;

    /// Commit the mutable fields (the name) of an existing document.
    ///
    /// Fails with `DocumentNotFound` if the document was never inserted or
    /// has been deleted.
    fn save(&mut self, document: &Document) -> Result<()>;

    /// Remove a document and its pages. Removing an unknown id is `Ok(())`.
    fn delete(&mut self, id: DocumentId) -> Result<()>;

    /// Number of stored documents.
    fn count(&self) -> Result<usize>;
}
