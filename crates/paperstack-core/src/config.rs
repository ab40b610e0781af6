// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::{DecodePolicy, PageImageFormat, PageLayout};

/// Name given to every freshly scanned document.
pub const DEFAULT_DOCUMENT_NAME: &str = "Document";

/// Persistent application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Name assigned to documents created from a scan.
    pub default_document_name: String,
    /// How each page image is placed on its PDF page.
    pub page_layout: PageLayout,
    /// Encoding used when storing captured pages.
    pub page_image_format: PageImageFormat,
    /// What to do with stored pages that no longer decode.
    pub decode_policy: DecodePolicy,
    /// Override for the scratch directory generated PDFs are written to.
    pub scratch_dir: Option<PathBuf>,
    /// Delete leftover scratch PDFs when the app starts.
    pub purge_scratch_on_start: bool,
}

impl AppConfig {
    /// Name for a freshly scanned document. An empty configured name falls
    /// back to [`DEFAULT_DOCUMENT_NAME`].
    pub fn document_name(&self) -> &str {
        if self.default_document_name.is_empty() {
            DEFAULT_DOCUMENT_NAME
        } else {
            &self.default_document_name
        }
    }

    /// Scratch directory to use, falling back to `<tmp>/paperstack`.
    pub fn scratch_dir(&self) -> PathBuf {
        self.scratch_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("paperstack"))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_document_name: DEFAULT_DOCUMENT_NAME.to_string(),
            page_layout: PageLayout::MatchImage,
            page_image_format: PageImageFormat::Png,
            decode_policy: DecodePolicy::Skip,
            scratch_dir: None,
            purge_scratch_on_start: false,
        }
    }
}
