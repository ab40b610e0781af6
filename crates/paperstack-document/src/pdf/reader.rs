// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — load a generated PDF back with `lopdf` to inspect its pages.

use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId};
use paperstack_core::error::PaperstackError;
use tracing::{debug, info, instrument};

/// Read-only view over an existing PDF.
pub struct PdfReader {
    /// The underlying lopdf document.
    document: Document,
    /// Source path, if opened from a file (useful for diagnostics).
    source_path: Option<String>,
}

impl PdfReader {
    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PaperstackError> {
        let path_ref = path.as_ref();
        info!("Opening PDF: {}", path_ref.display());

        let document = Document::load(path_ref).map_err(|err| {
            PaperstackError::PdfError(format!("failed to open {}: {}", path_ref.display(), err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded");

        Ok(Self {
            document,
            source_path: Some(path_ref.display().to_string()),
        })
    }

    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, PaperstackError> {
        let document = Document::load_mem(data).map_err(|err| {
            PaperstackError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self {
            document,
            source_path: None,
        })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Path the PDF was opened from, if any.
    pub fn source_path(&self) -> Option<&str> {
        self.source_path.as_deref()
    }

    /// Width and height in points of every page, in page order.
    ///
    /// The MediaBox is looked up on the page first and then inherited from
    /// its ancestors. Pages without any MediaBox report `(0.0, 0.0)`.
    pub fn page_sizes(&self) -> Vec<(f32, f32)> {
        self.document
            .get_pages()
            .values()
            .map(|page_id| self.media_box(*page_id).unwrap_or((0.0, 0.0)))
            .collect()
    }

    fn media_box(&self, page_id: ObjectId) -> Option<(f32, f32)> {
        let mut current = self.document.get_dictionary(page_id).ok()?;
        loop {
            if let Some(size) = media_box_size(&self.document, current) {
                return Some(size);
            }
            let parent = current.get(b"Parent").ok()?.as_reference().ok()?;
            current = self.document.get_dictionary(parent).ok()?;
        }
    }
}

/// Extract `(width, height)` from a dictionary's /MediaBox, if present.
fn media_box_size(document: &Document, dict: &Dictionary) -> Option<(f32, f32)> {
    let entry = dict.get(b"MediaBox").ok()?;
    let array = match entry {
        Object::Reference(id) => document.get_object(*id).ok()?.as_array().ok()?,
        other => other.as_array().ok()?,
    };
    if array.len() != 4 {
        return None;
    }
    let coords: Vec<f32> = array
        .iter()
        .map(|value| value.as_float().ok())
        .collect::<Option<_>>()?;
    Some(((coords[2] - coords[0]).abs(), (coords[3] - coords[1]).abs()))
}
