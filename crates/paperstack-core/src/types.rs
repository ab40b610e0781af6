// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Paperstack: documents, their pages, and the settings
// that shape how pages are stored and exported.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Unique identifier for a stored document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub Uuid);

impl DocumentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One scanned page, kept as encoded image bytes (PNG or JPEG).
///
/// The bytes are never modified after capture. Decoding lives in
/// `paperstack-document` so that this crate stays free of codec dependencies.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ImageData {
    bytes: Vec<u8>,
}

impl ImageData {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// The encoded image bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// SHA-256 of the encoded bytes as lowercase hex.
    ///
    /// Used as a stable page key by the UI and in log fields.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.bytes);
        hex::encode(hasher.finalize())
    }
}

impl std::fmt::Debug for ImageData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageData")
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A named, dated, ordered collection of scanned pages.
///
/// Page order is capture order and is never changed. The creation date is
/// fixed at construction; only the name can be changed afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    id: DocumentId,
    name: String,
    pages: Vec<ImageData>,
    date: DateTime<Utc>,
}

impl Document {
    /// Create a new document with a fresh id.
    pub fn new(name: impl Into<String>, pages: Vec<ImageData>, date: DateTime<Utc>) -> Self {
        Self {
            id: DocumentId::new(),
            name: name.into(),
            pages,
            date,
        }
    }

    /// Rebuild a document that already exists in storage.
    pub fn from_parts(
        id: DocumentId,
        name: String,
        pages: Vec<ImageData>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            pages,
            date,
        }
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Pages in capture order.
    pub fn pages(&self) -> &[ImageData] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// The first page, source of the list preview.
    pub fn first_page(&self) -> Option<&ImageData> {
        self.pages.first()
    }

    /// Replace the name. An empty name is ignored and `false` is returned.
    pub fn rename(&mut self, new_name: &str) -> bool {
        if new_name.is_empty() {
            return false;
        }
        self.name = new_name.to_string();
        true
    }
}

/// Result of one scanner presentation. Exactly one is produced per session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Encoded page images in capture order.
    Captured(Vec<Vec<u8>>),
    /// The scanner could not capture.
    Failed(String),
    /// The user dismissed the scanner.
    Cancelled,
}

impl From<crate::error::Result<Option<Vec<Vec<u8>>>>> for ScanOutcome {
    fn from(result: crate::error::Result<Option<Vec<Vec<u8>>>>) -> Self {
        match result {
            Ok(Some(pages)) => Self::Captured(pages),
            Ok(None) => Self::Cancelled,
            Err(e) => Self::Failed(e.to_string()),
        }
    }
}

/// Ordering used when listing documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    /// Newest first.
    #[default]
    DateDescending,
    /// Oldest first.
    DateAscending,
}

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Custom { width_mm: u32, height_mm: u32 },
}

impl PaperSize {
    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
            Self::A3 => (297, 420),
            Self::A5 => (148, 210),
            Self::Letter => (216, 279),
            Self::Legal => (216, 356),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }
}

/// How a page image is laid out on its PDF page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageLayout {
    /// The PDF page takes the image's own size (one pixel per point).
    MatchImage,
    /// The image is centred and scaled down to fit the paper, with margins.
    FitToPaper(PaperSize),
}

/// Encoding used for captured pages before they are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageImageFormat {
    Png,
    Jpeg { quality: u8 },
}

impl PageImageFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg { .. } => "image/jpeg",
        }
    }
}

/// What to do with a stored page whose bytes no longer decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DecodePolicy {
    /// Drop the page and carry on with the rest.
    #[default]
    Skip,
    /// Abort the whole operation.
    Fail,
}
