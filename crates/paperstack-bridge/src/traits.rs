// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for native capabilities.

use paperstack_core::error::Result;

/// Unified bridge that groups all native capabilities.
pub trait PlatformBridge: NativeScanner + NativePrint + NativeShare + Send + Sync {
    /// Human-readable platform name (e.g. "iOS", "Desktop (stub)").
    fn platform_name(&self) -> &str;
}

/// The system document camera.
pub trait NativeScanner {
    /// Present the document camera modally and block until the session ends.
    ///
    /// Returns the captured pages as encoded images in capture order,
    /// `Ok(None)` if the user cancelled, or an error if capture failed.
    /// A session resolves exactly once.
    fn scan_document(&self) -> Result<Option<Vec<Vec<u8>>>>;
}

/// Send documents to the OS-level print dialog.
pub trait NativePrint {
    /// Open the native print dialog for the given document bytes, using
    /// `job_name` as the print job title.
    /// Returns Ok(()) if the dialog was presented (user may still cancel).
    fn show_print_dialog(&self, document: &[u8], mime_type: &str, job_name: &str) -> Result<()>;
}

/// Share content via the OS share sheet.
pub trait NativeShare {
    /// Share a file with other apps via the native share sheet.
    fn share_file(&self, path: &str, mime_type: &str) -> Result<()>;
}
