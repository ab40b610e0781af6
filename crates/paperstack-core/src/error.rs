// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Paperstack.

use thiserror::Error;

use crate::types::DocumentId;

/// Top-level error type for all Paperstack operations.
#[derive(Debug, Error)]
pub enum PaperstackError {
    // -- Document errors --
    #[error("document has no pages")]
    EmptyDocument,

    #[error("document {0} not found")]
    DocumentNotFound(DocumentId),

    #[error("page {index} could not be decoded")]
    UndecodablePage { index: usize },

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- Storage / persistence --
    #[error("database error: {0}")]
    Database(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Bridge(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PaperstackError>;
