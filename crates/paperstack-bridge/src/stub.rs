// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub bridge for desktop/CI builds where native mobile APIs are unavailable.
//
// Every trait method returns `PlatformUnavailable`. The desktop app supplies
// its own scanner replacement (an image file dialog).

use paperstack_core::error::{PaperstackError, Result};

use crate::traits::*;

/// No-op bridge returned on non-mobile platforms.
pub struct StubBridge;

impl PlatformBridge for StubBridge {
    fn platform_name(&self) -> &str {
        "Desktop (stub)"
    }
}

impl NativeScanner for StubBridge {
    fn scan_document(&self) -> Result<Option<Vec<Vec<u8>>>> {
        tracing::warn!("NativeScanner::scan_document called on stub bridge");
        Err(PaperstackError::PlatformUnavailable)
    }
}

impl NativePrint for StubBridge {
    fn show_print_dialog(&self, _document: &[u8], _mime_type: &str, _job_name: &str) -> Result<()> {
        tracing::warn!("NativePrint::show_print_dialog called on stub bridge");
        Err(PaperstackError::PlatformUnavailable)
    }
}

impl NativeShare for StubBridge {
    fn share_file(&self, _path: &str, _mime_type: &str) -> Result<()> {
        tracing::warn!("NativeShare::share_file called on stub bridge");
        Err(PaperstackError::PlatformUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_capability_is_unavailable() {
        let bridge = StubBridge;
        assert_eq!(bridge.platform_name(), "Desktop (stub)");
        assert!(matches!(
            bridge.scan_document(),
            Err(PaperstackError::PlatformUnavailable)
        ));
        assert!(matches!(
            bridge.show_print_dialog(b"%PDF", "application/pdf", "Document"),
            Err(PaperstackError::PlatformUnavailable)
        ));
        assert!(matches!(
            bridge.share_file("/tmp/x.pdf", "application/pdf"),
            Err(PaperstackError::PlatformUnavailable)
        ));
    }

    #[test]
    fn platform_bridge_is_stub_off_ios() {
        assert_eq!(crate::platform_bridge().platform_name(), "Desktop (stub)");
    }
}
