// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Paperstack — pocket document scanner
//
// Entry point. Initialises logging and backend services, then launches the
// Dioxus UI. Failing to open the document store is fatal.

mod pages;
mod services;

use dioxus::prelude::*;

use paperstack_viewmodel::{DocumentDetailViewModel, DocumentsViewModel};
use pages::detail::DocumentDetail;
use pages::documents::Documents;

use services::app_services::AppServices;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Paperstack starting");

    let svc = match AppServices::init() {
        Ok(svc) => svc,
        Err(e) => {
            tracing::error!(error = %e, "could not open the document store");
            std::process::exit(1);
        }
    };
    svc.purge_scratch_if_configured();

    dioxus::LaunchBuilder::new().with_context(svc).launch(app);
}

/// Top-level route enum.
#[derive(Debug, Clone, Routable, PartialEq)]
enum Route {
    #[layout(AppLayout)]
    #[route("/")]
    Documents {},
    #[route("/document/:id")]
    DocumentDetail { id: String },
}

/// Root component.
fn app() -> Element {
    let svc = use_context::<AppServices>();

    // One view model per screen, shared with every page as context
    let list_svc = svc.clone();
    use_context_provider(|| {
        Signal::new(DocumentsViewModel::new(list_svc.store(), list_svc.config()))
    });
    use_context_provider(|| {
        Signal::new(DocumentDetailViewModel::new(
            svc.store(),
            svc.bridge(),
            svc.config(),
        ))
    });

    rsx! {
        Router::<Route> {}
    }
}

/// Header bar wrapping every page.
#[component]
fn AppLayout() -> Element {
    rsx! {
        div { class: "app-container",
            style: "display: flex; flex-direction: column; height: 100vh; font-family: system-ui, -apple-system, sans-serif;",

            nav { class: "title-bar",
                style: "display: flex; align-items: center; padding: 12px 16px; border-bottom: 1px solid #e0e0e0; background: #fafafa;",
                Link { to: Route::Documents {},
                    style: "text-decoration: none; color: #333; font-weight: bold; font-size: 18px;",
                    "Paperstack"
                }
            }

            div { class: "page-content",
                style: "flex: 1; overflow-y: auto; padding: 16px;",
                Outlet::<Route> {}
            }
        }
    }
}
