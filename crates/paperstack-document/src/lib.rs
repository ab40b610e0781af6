// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// paperstack-document — Page and PDF handling for the Paperstack scanner.
//
// Decodes stored page images, encodes freshly captured ones, renders ordered
// page sequences into multi-page PDFs, and manages the scratch directory the
// PDFs are written to for printing and sharing.

pub mod image;
pub mod pages;
pub mod pdf;
pub mod scratch;

// Re-export the primary structs so callers can use `paperstack_document::PdfWriter` etc.
pub use self::image::processor::ImageProcessor;
pub use pages::{DecodedPages, decode_page, decode_pages, encode_pages, preview, thumbnail};
pub use pdf::reader::PdfReader;
pub use pdf::writer::PdfWriter;
pub use scratch::ScratchDir;
