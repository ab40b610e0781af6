// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Documents page — every stored document, newest first, with a scan button.

use chrono::Local;
use dioxus::prelude::*;

use paperstack_core::{Document, ScanOutcome};
use paperstack_viewmodel::DocumentsViewModel;

use crate::Route;
use crate::services::app_services::AppServices;
use crate::services::capture::capture_pages;
use crate::services::preview::thumbnail_url;

#[component]
pub fn Documents() -> Element {
    let mut vm = use_context::<Signal<DocumentsViewModel>>();
    let svc = use_context::<AppServices>();
    let mut status_msg = use_signal(|| Option::<String>::None);

    rsx! {
        div {
            div { style: "display: flex; justify-content: space-between; align-items: center;",
                h1 { "Documents" }
                button {
                    style: "padding: 10px 16px; border-radius: 8px; border: none; background: #007aff; color: white; font-size: 16px;",
                    disabled: vm.read().scanner_presented(),
                    onclick: move |_| {
                        vm.write().toggle_scanner_presentation();
                        let outcome = capture_pages(&svc);
                        let message = match &outcome {
                            ScanOutcome::Failed(reason) => Some(format!("Scan failed: {reason}")),
                            _ => None,
                        };
                        vm.write().handle_scan_outcome(outcome);
                        status_msg.set(message);
                    },
                    "\u{1F4F7} Scan"
                }
            }

            if let Some(ref msg) = *status_msg.read() {
                p { style: "color: #ff3b30; font-size: 14px;", "{msg}" }
            }

            if vm.read().documents().is_empty() {
                p { style: "text-align: center; color: #aaa; margin: 48px 0;",
                    "No documents yet. Scan one to get started."
                }
            } else {
                for document in vm.read().documents().iter() {
                    DocumentRow { key: "{document.id()}", document: document.clone() }
                }
            }
        }
    }
}

/// One list row: thumbnail, name, and creation date, plus a delete button.
#[component]
fn DocumentRow(document: Document) -> Element {
    let mut vm = use_context::<Signal<DocumentsViewModel>>();

    let thumbnail = thumbnail_url(&document);
    let date = document
        .date()
        .with_timezone(&Local)
        .format("%d/%m/%Y %H:%M")
        .to_string();
    let id = document.id().to_string();
    let doomed = document.clone();

    rsx! {
        div { style: "display: flex; align-items: center; gap: 12px; padding: 12px 0; border-bottom: 1px solid #eee;",
            Link { to: Route::DocumentDetail { id },
                style: "display: flex; align-items: center; gap: 12px; flex: 1; text-decoration: none; color: inherit;",
                if let Some(src) = thumbnail {
                    img { src: "{src}", style: "width: 56px; height: 72px; object-fit: cover; border: 1px solid #ddd; border-radius: 4px;" }
                } else {
                    div { style: "width: 56px; height: 72px; border: 1px solid #ddd; border-radius: 4px; background: #f0f0f0;" }
                }
                div {
                    div { style: "font-weight: 600;", "{document.name()}" }
                    div { style: "color: #888; font-size: 13px;", "{date}" }
                }
            }
            button {
                style: "padding: 6px 12px; border-radius: 6px; border: 1px solid #ff3b30; color: #ff3b30; background: white;",
                onclick: move |_| vm.write().delete(&doomed),
                "Delete"
            }
        }
    }
}
