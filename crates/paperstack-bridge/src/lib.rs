// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Paperstack — Native platform bridge abstractions.
//
// The scanner, print dialog, and share sheet are platform capabilities. This
// crate defines them as traits and selects the implementation for the target
// operating system.

pub mod traits;

mod run_loop;

#[cfg(target_os = "ios")]
pub mod ios;

#[cfg(not(target_os = "ios"))]
pub mod stub;

pub use traits::{NativePrint, NativeScanner, NativeShare, PlatformBridge};

/// The bridge implementation for the target operating system.
pub fn platform_bridge() -> Box<dyn PlatformBridge> {
    #[cfg(target_os = "ios")]
    {
        // iOS: VisionKit document camera and UIKit dialogs through objc2.
        Box::new(ios::IosBridge::new())
    }
    #[cfg(not(target_os = "ios"))]
    {
        // Desktop/CI: every capability reports PlatformUnavailable.
        Box::new(stub::StubBridge)
    }
}
