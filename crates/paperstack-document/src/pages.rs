// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page decoding and encoding.
//
// Stored pages are encoded bytes; display, preview, and PDF export all need
// decoded rasters. Decoding is an explicit per-page step so the policy for
// corrupt pages (skip or fail) is chosen by the caller rather than hidden in
// an iterator adaptor.

use image::DynamicImage;
use paperstack_core::error::{PaperstackError, Result};
use paperstack_core::{DecodePolicy, Document, ImageData, PageImageFormat};
use tracing::{debug, instrument, warn};

use crate::image::processor::ImageProcessor;

/// Outcome of decoding a document's pages.
#[derive(Debug, Default)]
pub struct DecodedPages {
    /// Decoded rasters, in page order.
    pub images: Vec<DynamicImage>,
    /// Zero-based indices of pages that failed to decode and were dropped.
    pub skipped: Vec<usize>,
}

impl DecodedPages {
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Decode a single stored page. Returns `None` when the bytes are not a
/// valid image.
pub fn decode_page(page: &ImageData) -> Option<DynamicImage> {
    ImageProcessor::from_bytes(page.bytes())
        .ok()
        .map(ImageProcessor::into_dynamic)
}

/// Decode every page in order.
///
/// With [`DecodePolicy::Skip`] undecodable pages are left out and their
/// indices reported in [`DecodedPages::skipped`], so a document with N stored
/// pages can yield fewer than N images. With [`DecodePolicy::Fail`] the first
/// undecodable page aborts with [`PaperstackError::UndecodablePage`].
#[instrument(skip(pages), fields(pages = pages.len(), ?policy))]
pub fn decode_pages(pages: &[ImageData], policy: DecodePolicy) -> Result<DecodedPages> {
    let mut decoded = DecodedPages {
        images: Vec::with_capacity(pages.len()),
        skipped: Vec::new(),
    };

    for (index, page) in pages.iter().enumerate() {
        match decode_page(page) {
            Some(image) => decoded.images.push(image),
            None => match policy {
                DecodePolicy::Skip => {
                    warn!(index, bytes = page.len(), "skipping undecodable page");
                    decoded.skipped.push(index);
                }
                DecodePolicy::Fail => {
                    return Err(PaperstackError::UndecodablePage { index });
                }
            },
        }
    }

    debug!(
        decoded = decoded.images.len(),
        skipped = decoded.skipped.len(),
        "pages decoded"
    );
    Ok(decoded)
}

/// Encode captured rasters into storable pages, keeping capture order.
#[instrument(skip(images), fields(images = images.len(), ?format))]
pub fn encode_pages(images: &[DynamicImage], format: PageImageFormat) -> Result<Vec<ImageData>> {
    images
        .iter()
        .map(|image| {
            ImageProcessor::from_dynamic(image.clone())
                .encode(format)
                .map(ImageData::new)
        })
        .collect()
}

/// The decoded first page, or `None` when the document is empty or its first
/// page does not decode.
pub fn preview(document: &Document) -> Option<DynamicImage> {
    document.first_page().and_then(decode_page)
}

/// A preview shrunk so its longest edge is at most `max_edge` pixels.
pub fn thumbnail(document: &Document, max_edge: u32) -> Option<DynamicImage> {
    preview(document).map(|image| {
        ImageProcessor::from_dynamic(image)
            .thumbnail(max_edge)
            .into_dynamic()
    })
}
