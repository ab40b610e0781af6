// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page capture.
//
// On iOS the document camera comes from the platform bridge. On desktop the
// "camera" is a file dialog for picking page images; picking nothing counts
// as a cancelled scan.

use paperstack_core::ScanOutcome;

use super::app_services::AppServices;

/// Run one capture session and report how it ended.
pub fn capture_pages(svc: &AppServices) -> ScanOutcome {
    #[cfg(target_os = "ios")]
    {
        svc.bridge().scan_document().into()
    }
    #[cfg(not(target_os = "ios"))]
    {
        let _ = svc;
        pick_image_files()
    }
}

#[cfg(not(target_os = "ios"))]
fn pick_image_files() -> ScanOutcome {
    let Some(paths) = rfd::FileDialog::new()
        .set_title("Choose page images")
        .add_filter("Images", &["jpg", "jpeg", "png", "tiff", "tif", "bmp", "webp"])
        .pick_files()
    else {
        return ScanOutcome::Cancelled;
    };

    read_pages(&paths)
}

/// Read every picked file in order. Any unreadable file fails the session.
#[cfg(not(target_os = "ios"))]
fn read_pages(paths: &[std::path::PathBuf]) -> ScanOutcome {
    let mut pages = Vec::with_capacity(paths.len());
    for path in paths {
        match std::fs::read(path) {
            Ok(bytes) => {
                tracing::info!(path = %path.display(), bytes = bytes.len(), "page image loaded");
                pages.push(bytes);
            }
            Err(e) => return ScanOutcome::Failed(format!("{}: {e}", path.display())),
        }
    }
    ScanOutcome::Captured(pages)
}
