// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// iOS platform bridge via objc2.
//
// Requires compilation with the iOS SDK (Xcode). The document camera is
// VisionKit's `VNDocumentCameraViewController`; printing and sharing go
// through UIKit. All UIKit interactions require the main thread; methods that
// present view controllers return `PaperstackError::Bridge` if called off-main.
//
// Unsafe code here is limited to Objective-C message sends (selector
// correctness is checked against Apple's SDK headers) and two UIKit C
// functions.

#![cfg(target_os = "ios")]

use std::cell::RefCell;
use std::ffi::c_void;
use std::sync::mpsc;

use objc2::rc::Retained;
use objc2::runtime::{AnyObject, Bool, NSObject};
use objc2::{MainThreadMarker, define_class, msg_send};
use objc2_foundation::{NSArray, NSData, NSError, NSString, NSURL};
use objc2_ui_kit::{
    UIActivityViewController, UIApplication, UIPrintInteractionController, UIViewController,
};

use paperstack_core::error::{PaperstackError, Result};

use crate::run_loop::recv_while_pumping;
use crate::traits::*;

// ---------------------------------------------------------------------------
// Frameworks and UIKit C functions
// ---------------------------------------------------------------------------

// VisionKit has no objc2 binding crate; linking the framework makes
// `VNDocumentCameraViewController` resolvable through `class!`.
#[link(name = "VisionKit", kind = "framework")]
unsafe extern "C" {}

unsafe extern "C" {
    /// Convert a `UIImage` to PNG `NSData`.
    ///
    /// ```c
    /// NSData * _Nullable UIImagePNGRepresentation(UIImage *image);
    /// ```
    fn UIImagePNGRepresentation(image: *const AnyObject) -> *mut AnyObject;
}

/// `UIPrintInfoOutputGeneral`: mixed text and graphics.
const PRINT_OUTPUT_GENERAL: isize = 0;

/// Longest single slice of the main run loop while waiting on the camera.
const RUN_LOOP_SLICE_SECS: f64 = 0.05;

/// What the scan delegate hands back to `scan_document`.
type ScanResult = std::result::Result<Option<Vec<Vec<u8>>>, String>;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Obtain the root `UIViewController` from the key window.
fn root_view_controller() -> Result<Retained<UIViewController>> {
    let mtm = require_main_thread()?;
    let app = UIApplication::sharedApplication(mtm);

    // SAFETY: keyWindow and rootViewController are well-known UIApplication /
    // UIWindow selectors; we are on the main thread.
    let root: Option<Retained<UIViewController>> = unsafe {
        let window: Option<Retained<AnyObject>> = msg_send![&app, keyWindow];
        window.and_then(|w| msg_send![&w, rootViewController])
    };

    root.ok_or_else(|| PaperstackError::Bridge("no root view controller available".into()))
}

/// Assert that we are on the main thread and return the marker.
fn require_main_thread() -> Result<MainThreadMarker> {
    MainThreadMarker::new()
        .ok_or_else(|| PaperstackError::Bridge("must be called from the main thread".into()))
}

/// Run the current thread's run loop in the default mode for at most one
/// slice, so UIKit can deliver events and delegate callbacks.
fn pump_run_loop() {
    let mode = NSString::from_str("kCFRunLoopDefaultMode");
    // SAFETY: +currentRunLoop, +dateWithTimeIntervalSinceNow: and
    // -runMode:beforeDate: are documented Foundation selectors.
    unsafe {
        let run_loop: Retained<AnyObject> = msg_send![objc2::class!(NSRunLoop), currentRunLoop];
        let limit: Retained<AnyObject> = msg_send![
            objc2::class!(NSDate),
            dateWithTimeIntervalSinceNow: RUN_LOOP_SLICE_SECS
        ];
        let _: Bool = msg_send![&run_loop, runMode: &*mode, beforeDate: &*limit];
    }
}

/// PNG-encode a `UIImage`, or `None` if UIKit cannot represent it.
fn png_bytes(image: &AnyObject) -> Option<Vec<u8>> {
    // SAFETY: UIImagePNGRepresentation is a UIKit C function returning an
    // autoreleased NSData* or nil. We copy the bytes immediately.
    let raw = unsafe { UIImagePNGRepresentation(image as *const AnyObject) };
    if raw.is_null() {
        return None;
    }
    let data: &NSData = unsafe { &*(raw as *const NSData) };
    Some(data.to_vec())
}

/// Dismiss a modally presented controller.
fn dismiss(controller: &AnyObject) {
    // SAFETY: dismissViewControllerAnimated:completion: is a standard
    // UIViewController selector; delegate callbacks run on the main thread.
    unsafe {
        let _: () = msg_send![
            controller,
            dismissViewControllerAnimated: true,
            completion: std::ptr::null::<c_void>()
        ];
    }
}

// ---------------------------------------------------------------------------
// Document camera delegate (VNDocumentCameraViewControllerDelegate)
// ---------------------------------------------------------------------------
// Holds an `mpsc::Sender` so that `scan_document` can wait until the user
// finishes, cancels, or the camera fails.

struct ScanDelegateIvars {
    /// Taken on the first callback, so a session resolves exactly once.
    sender: RefCell<Option<mpsc::Sender<ScanResult>>>,
}

define_class! {
    #[unsafe(super(NSObject))]
    #[thread_kind = MainThreadOnly]
    #[name = "PaperstackScanDelegate"]
    #[ivars = ScanDelegateIvars]
    struct ScanDelegate;

    impl ScanDelegate {
        /// The camera finished with one or more pages.
        #[unsafe(method(documentCameraViewController:didFinishWithScan:))]
        fn did_finish(&self, controller: &AnyObject, scan: &AnyObject) {
            // SAFETY: pageCount / imageOfPageAtIndex: are VNDocumentCameraScan
            // selectors; indices stay below pageCount.
            let count: usize = unsafe { msg_send![scan, pageCount] };
            let pages: Vec<Vec<u8>> = (0..count)
                .filter_map(|index| {
                    let image: Option<Retained<AnyObject>> =
                        unsafe { msg_send![scan, imageOfPageAtIndex: index] };
                    image.as_deref().and_then(png_bytes)
                })
                .collect();

            tracing::info!(count, encoded = pages.len(), "iOS: document camera finished");
            dismiss(controller);
            self.resolve(Ok(Some(pages)));
        }

        /// The user cancelled the document camera.
        #[unsafe(method(documentCameraViewControllerDidCancel:))]
        fn did_cancel(&self, controller: &AnyObject) {
            dismiss(controller);
            self.resolve(Ok(None));
        }

        /// The camera could not capture.
        #[unsafe(method(documentCameraViewController:didFailWithError:))]
        fn did_fail(&self, controller: &AnyObject, error: &NSError) {
            let message = error.localizedDescription().to_string();
            tracing::error!(%message, "iOS: document camera failed");
            dismiss(controller);
            self.resolve(Err(message));
        }
    }
}

impl ScanDelegate {
    fn new(mtm: MainThreadMarker, tx: mpsc::Sender<ScanResult>) -> Retained<Self> {
        let this = mtm.alloc::<Self>();
        let this = this.set_ivars(ScanDelegateIvars {
            sender: RefCell::new(Some(tx)),
        });
        // SAFETY: Standard NSObject init via super.
        unsafe { msg_send![super(this), init] }
    }

    fn resolve(&self, result: ScanResult) {
        if let Some(tx) = self.ivars().sender.borrow_mut().take() {
            let _ = tx.send(result);
        }
    }
}

// ---------------------------------------------------------------------------
// IosBridge
// ---------------------------------------------------------------------------

/// Concrete iOS platform bridge. Every method must be called from the main
/// thread.
pub struct IosBridge;

impl IosBridge {
    /// Create a new iOS bridge instance.
    pub fn new() -> Self {
        Self
    }
}

impl PlatformBridge for IosBridge {
    fn platform_name(&self) -> &str {
        "iOS"
    }
}

// ---------------------------------------------------------------------------
// NativeScanner -- VNDocumentCameraViewController
// ---------------------------------------------------------------------------

impl NativeScanner for IosBridge {
    /// Present the VisionKit document camera and wait until it resolves.
    ///
    /// Pages are returned PNG-encoded in capture order. While waiting, the
    /// main run loop is run in short slices so the camera UI stays live and
    /// its delegate callbacks are delivered.
    fn scan_document(&self) -> Result<Option<Vec<Vec<u8>>>> {
        let mtm = require_main_thread()?;

        // SAFETY: +isSupported is a class property of VNDocumentCameraViewController.
        let supported: Bool =
            unsafe { msg_send![objc2::class!(VNDocumentCameraViewController), isSupported] };
        if !supported.as_bool() {
            return Err(PaperstackError::Bridge(
                "document camera is not supported on this device".into(),
            ));
        }

        tracing::info!("iOS: presenting VNDocumentCameraViewController");

        let (tx, rx) = mpsc::channel();
        let delegate = ScanDelegate::new(mtm, tx);

        // SAFETY: alloc/init of a UIViewController subclass, then the
        // `delegate` property setter. The delegate outlives the session
        // because we hold `delegate` until the wait below returns.
        let camera: Retained<AnyObject> = unsafe {
            let camera: Retained<AnyObject> =
                msg_send![objc2::class!(VNDocumentCameraViewController), new];
            let delegate_obj: &AnyObject =
                &*((&*delegate) as *const ScanDelegate as *const AnyObject);
            let _: () = msg_send![&camera, setDelegate: delegate_obj];
            camera
        };

        let root_vc = root_view_controller()?;
        // SAFETY: presentViewController:animated:completion: on the main thread.
        unsafe {
            let _: () = msg_send![
                &root_vc,
                presentViewController: &*camera,
                animated: true,
                completion: std::ptr::null::<c_void>()
            ];
        }

        let result = recv_while_pumping(&rx, pump_run_loop)?;
        drop(delegate);

        result.map_err(PaperstackError::Bridge)
    }
}

// ---------------------------------------------------------------------------
// NativePrint -- UIPrintInteractionController
// ---------------------------------------------------------------------------

impl NativePrint for IosBridge {
    /// Present the system print dialog for the supplied document bytes.
    ///
    /// Fire-and-forget: once the dialog is presented the user drives the rest
    /// of the interaction.
    fn show_print_dialog(&self, document: &[u8], _mime_type: &str, job_name: &str) -> Result<()> {
        let mtm = require_main_thread()?;

        tracing::info!(
            bytes = document.len(),
            job_name,
            "iOS: presenting UIPrintInteractionController"
        );

        let controller = UIPrintInteractionController::sharedPrintController(mtm);
        let ns_data = NSData::with_bytes(document);
        let ns_job_name = NSString::from_str(job_name);

        // SAFETY: +[UIPrintInfo printInfo], setJobName:, setOutputType: and
        // setPrintInfo: are documented UIKit selectors; main thread checked.
        unsafe {
            let info: Retained<AnyObject> = msg_send![objc2::class!(UIPrintInfo), printInfo];
            let _: () = msg_send![&info, setJobName: &*ns_job_name];
            let _: () = msg_send![&info, setOutputType: PRINT_OUTPUT_GENERAL];
            let _: () = msg_send![&controller, setPrintInfo: &*info];
            controller.setPrintingItem(Some(&ns_data));
        }

        // SAFETY: documented UIKit method, main thread checked above.
        let presented = unsafe { controller.presentAnimated_completionHandler(true, None) };

        if presented {
            Ok(())
        } else {
            Err(PaperstackError::Bridge(
                "UIPrintInteractionController refused to present".into(),
            ))
        }
    }
}

// ---------------------------------------------------------------------------
// NativeShare -- UIActivityViewController
// ---------------------------------------------------------------------------

impl NativeShare for IosBridge {
    /// Present the iOS share sheet for the file at `path`.
    ///
    /// The share sheet infers the content type from the file extension, so
    /// `mime_type` is unused.
    fn share_file(&self, path: &str, _mime_type: &str) -> Result<()> {
        let _mtm = require_main_thread()?;

        tracing::info!(path, "iOS: presenting UIActivityViewController");

        let ns_path = NSString::from_str(path);
        let url = NSURL::fileURLWithPath(&ns_path);
        let url_as_obj: Retained<AnyObject> = Retained::into_super(Retained::into_super(url));
        let items = NSArray::from_retained_slice(&[url_as_obj]);

        // SAFETY: alloc + initWithActivityItems:applicationActivities:
        // (nil activities = system default).
        let activity_vc: Retained<UIActivityViewController> = unsafe {
            let alloc: Retained<UIActivityViewController> =
                msg_send![objc2::class!(UIActivityViewController), alloc];
            msg_send![
                alloc,
                initWithActivityItems: &*items,
                applicationActivities: std::ptr::null::<AnyObject>()
            ]
        };

        let root_vc = root_view_controller()?;
        // SAFETY: presentViewController on the main thread.
        unsafe {
            root_vc.presentViewController_animated_completion(&activity_vc, true, None);
        }

        Ok(())
    }
}
