// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scratch directory for generated PDFs.
//
// Every export writes a new `<uuid>.pdf`. Nothing is deleted automatically:
// files stay until `purge` is called, which the app only does at startup when
// configured to.

use std::path::{Path, PathBuf};

use paperstack_core::error::Result;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

const PDF_EXTENSION: &str = "pdf";

/// A directory that holds throwaway PDF exports.
#[derive(Debug, Clone)]
pub struct ScratchDir {
    root: PathBuf,
}

impl ScratchDir {
    /// Use `root` as the scratch directory. It is created lazily on first
    /// write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Write `bytes` to a freshly named `<uuid>.pdf` and return its path.
    #[instrument(skip(self, bytes), fields(bytes = bytes.len()))]
    pub fn write_pdf(&self, bytes: &[u8]) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.root)?;
        let path = self
            .root
            .join(Uuid::new_v4().to_string())
            .with_extension(PDF_EXTENSION);
        std::fs::write(&path, bytes)?;
        info!(path = %path.display(), "wrote scratch PDF");
        Ok(path)
    }

    /// Read a previously written file back into memory.
    pub fn read(&self, path: impl AsRef<Path>) -> Result<Vec<u8>> {
        let data = std::fs::read(path.as_ref())?;
        debug!(path = %path.as_ref().display(), bytes = data.len(), "read scratch file");
        Ok(data)
    }

    /// All PDFs currently in the scratch directory, sorted by path.
    pub fn list(&self) -> Result<Vec<PathBuf>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let mut files = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.is_file()
                && path.extension().and_then(|e| e.to_str()) == Some(PDF_EXTENSION)
            {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Delete every scratch PDF. Returns how many were removed.
    ///
    /// Files that vanish or cannot be removed are logged and skipped.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn purge(&self) -> Result<usize> {
        let mut removed = 0;
        for path in self.list()? {
            match std::fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => warn!(path = %path.display(), error = %e, "could not remove scratch PDF"),
            }
        }
        info!(removed, "scratch directory purged");
        Ok(removed)
    }
}
