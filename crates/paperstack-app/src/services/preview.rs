// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Turn decoded page rasters into `data:` URLs the webview can show.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::DynamicImage;
use paperstack_core::Document;
use paperstack_document::ImageProcessor;
use paperstack_viewmodel::PageListing;

/// Longest edge of a document-list thumbnail, in pixels.
pub const THUMBNAIL_EDGE: u32 = 160;

/// PNG-encode `image` as a `data:image/png;base64,...` URL.
pub fn data_url(image: &DynamicImage) -> Option<String> {
    match ImageProcessor::from_dynamic(image.clone()).to_png_bytes() {
        Ok(png) => Some(format!("data:image/png;base64,{}", STANDARD.encode(png))),
        Err(e) => {
            tracing::warn!(error = %e, "could not encode preview");
            None
        }
    }
}

/// Encoded pages of one document, ready for the detail screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PagePreviews {
    /// Page count shown above the thumbnail strip.
    pub label: String,
    /// One `data:` URL per decodable page, in page order.
    pub urls: Vec<String>,
}

/// Encode every page of `listing` once, for reuse across renders.
pub fn page_previews(listing: &PageListing) -> PagePreviews {
    PagePreviews {
        label: listing.label(),
        urls: listing.images.iter().filter_map(data_url).collect(),
    }
}

/// Thumbnail of the document's first page, if it has a decodable one.
pub fn thumbnail_url(document: &Document) -> Option<String> {
    paperstack_document::thumbnail(document, THUMBNAIL_EDGE).and_then(|image| data_url(&image))
}
