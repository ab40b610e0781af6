// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document detail page — the pages of one document, with rename, share, and
// print actions and a collapsible page list.

use dioxus::prelude::*;

use paperstack_viewmodel::{DocumentDetailViewModel, DocumentsViewModel};

use crate::Route;
use crate::services::preview::{PagePreviews, page_previews};

#[component]
pub fn DocumentDetail(id: String) -> Element {
    let mut list = use_context::<Signal<DocumentsViewModel>>();
    let mut detail = use_context::<Signal<DocumentDetailViewModel>>();
    let mut show_page_list = use_signal(|| false);
    let mut status_msg = use_signal(|| Option::<String>::None);

    // Encoded once per document id. Page bytes never change after capture.
    let previews = use_memo(use_reactive((&id,), move |(id,)| {
        list.peek()
            .documents()
            .iter()
            .find(|d| d.id().to_string() == id)
            .map(|document| page_previews(&detail.peek().pages(document)))
            .unwrap_or_default()
    }));

    let document = list
        .read()
        .documents()
        .iter()
        .find(|d| d.id().to_string() == id)
        .cloned();

    let Some(document) = document else {
        return rsx! {
            div {
                p { style: "color: #888;", "This document no longer exists." }
                Link { to: Route::Documents {}, "Back to documents" }
            }
        };
    };

    let PagePreviews { label, urls: page_urls } = previews();

    let to_share = document.clone();
    let to_print = document.clone();
    let mut to_rename = document.clone();

    rsx! {
        div {
            // Title and actions
            div { style: "display: flex; justify-content: space-between; align-items: center; flex-wrap: wrap; gap: 8px;",
                h1 { "{document.name()}" }
                div { style: "display: flex; gap: 8px;",
                    button {
                        style: "padding: 8px 12px; border-radius: 8px; border: 1px solid #ccc; background: white;",
                        onclick: move |_| detail.write().request_rename(),
                        "\u{270F} Rename"
                    }
                    button {
                        style: "padding: 8px 12px; border-radius: 8px; border: 1px solid #ccc; background: white;",
                        onclick: move |_| {
                            if !detail.read().share_document(&to_share) {
                                status_msg.set(Some("Sharing is not available.".into()));
                            }
                        },
                        "Share"
                    }
                    button {
                        style: "padding: 8px 12px; border-radius: 8px; border: none; background: #007aff; color: white;",
                        onclick: move |_| {
                            if !detail.read().print_document(&to_print) {
                                status_msg.set(Some("Could not open the print dialog.".into()));
                            }
                        },
                        "\u{1F5A8} Print"
                    }
                    button {
                        style: "padding: 8px 12px; border-radius: 8px; border: 1px solid #ccc; background: white;",
                        onclick: move |_| {
                            let shown = *show_page_list.read();
                            show_page_list.set(!shown);
                        },
                        "\u{2630}"
                    }
                }
            }

            if let Some(ref msg) = *status_msg.read() {
                p { style: "color: #666; font-size: 14px;", "{msg}" }
            }

            // Rename dialog
            if detail.read().rename_presented() {
                div { style: "margin: 12px 0; padding: 16px; border: 1px solid #ddd; border-radius: 12px; background: #fafafa;",
                    h3 { "Rename the document" }
                    input {
                        style: "width: 100%; padding: 8px; border-radius: 6px; border: 1px solid #ccc; box-sizing: border-box;",
                        value: "{detail.read().new_document_name()}",
                        oninput: move |evt| detail.write().set_new_document_name(evt.value()),
                    }
                    div { style: "display: flex; gap: 8px; margin-top: 12px; justify-content: flex-end;",
                        button {
                            style: "padding: 8px 12px; border-radius: 8px; border: 1px solid #ccc; background: white;",
                            onclick: move |_| detail.write().cancel_rename(),
                            "Cancel"
                        }
                        button {
                            style: "padding: 8px 12px; border-radius: 8px; border: none; background: #007aff; color: white;",
                            onclick: move |_| {
                                if detail.write().confirm_rename(&mut to_rename) {
                                    list.write().refresh();
                                }
                            },
                            "OK"
                        }
                    }
                }
            }

            div { style: "display: flex; gap: 12px; margin-top: 12px;",
                // Full-size pages
                div { style: "flex: 1; display: flex; flex-direction: column; gap: 12px;",
                    for (index, src) in page_urls.iter().enumerate() {
                        img { key: "{index}", src: "{src}", style: "width: 100%; height: auto;" }
                    }
                }

                // Page list
                if *show_page_list.read() {
                    div { style: "width: 125px; padding: 8px; background: rgba(128, 128, 128, 0.2); border-radius: 8px;",
                        p { style: "font-size: 12px; color: #666; margin: 0 0 8px;", "{label}" }
                        for (index, src) in page_urls.iter().enumerate() {
                            img { key: "thumb-{index}", src: "{src}", style: "width: 100px; height: 100px; object-fit: contain; margin-bottom: 10px;" }
                        }
                    }
                }
            }
        }
    }
}
