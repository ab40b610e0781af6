// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document list view model.
//
// Holds a display-ordered cache of every stored document. The store is the
// source of truth: every mutation goes to the store first and the cache is
// then re-read, never patched in place.

use std::sync::Arc;

use chrono::Utc;
use image::DynamicImage;
use paperstack_core::{AppConfig, Document, DocumentId, ImageData, ScanOutcome, SortOrder};
use paperstack_document::{decode_page, encode_pages};
use tokio::sync::watch;
use tracing::{error, info, instrument, warn};

use crate::shared::{SharedStore, lock_store};

/// What the document list shows.
#[derive(Debug, Clone, Default)]
pub struct DocumentsSnapshot {
    /// Every document, newest first.
    pub documents: Arc<Vec<Document>>,
    /// Whether the document camera is on screen.
    pub scanner_presented: bool,
}

/// State container for the document list screen.
pub struct DocumentsViewModel {
    store: SharedStore,
    config: AppConfig,
    documents: Arc<Vec<Document>>,
    scanner_presented: bool,
    tx: watch::Sender<DocumentsSnapshot>,
}

impl DocumentsViewModel {
    /// Create the view model and load the initial list from the store.
    pub fn new(store: SharedStore, config: AppConfig) -> Self {
        let (tx, _rx) = watch::channel(DocumentsSnapshot::default());
        let mut vm = Self {
            store,
            config,
            documents: Arc::new(Vec::new()),
            scanner_presented: false,
            tx,
        };
        vm.refresh();
        vm
    }

    /// Cached documents, newest first.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn scanner_presented(&self) -> bool {
        self.scanner_presented
    }

    /// Receive a snapshot after every state change.
    pub fn subscribe(&self) -> watch::Receiver<DocumentsSnapshot> {
        self.tx.subscribe()
    }

    /// Current state as a snapshot.
    pub fn snapshot(&self) -> DocumentsSnapshot {
        DocumentsSnapshot {
            documents: Arc::clone(&self.documents),
            scanner_presented: self.scanner_presented,
        }
    }

    /// Re-read every document from the store, newest first.
    ///
    /// If the query fails the error is logged and the previous cache is kept.
    #[instrument(skip(self))]
    pub fn refresh(&mut self) {
        let fetched =
            lock_store(&self.store).and_then(|store| store.fetch_all(SortOrder::DateDescending));
        match fetched {
            Ok(documents) => {
                info!(count = documents.len(), "document list refreshed");
                self.documents = Arc::new(documents);
                self.publish();
            }
            Err(e) => error!(error = %e, "fetch failed, keeping cached documents"),
        }
    }

    /// Store a new document built from freshly captured pages.
    ///
    /// The document gets the configured default name and the current time.
    /// An empty capture still creates a document with zero pages. Returns the
    /// new document's id, or `None` if encoding or the insert failed.
    #[instrument(skip(self, pages), fields(pages = pages.len()))]
    pub fn create_from_scan(&mut self, pages: &[DynamicImage]) -> Option<DocumentId> {
        let encoded = match encode_pages(pages, self.config.page_image_format) {
            Ok(encoded) => encoded,
            Err(e) => {
                error!(error = %e, "could not encode scanned pages");
                return None;
            }
        };

        let document = Document::new(self.config.document_name(), encoded, Utc::now());
        let id = document.id();

        if let Err(e) = lock_store(&self.store).and_then(|mut store| store.insert(&document)) {
            error!(document_id = %id, error = %e, "could not store scanned document");
            return None;
        }

        info!(document_id = %id, pages = document.page_count(), "document created from scan");
        self.refresh();
        Some(id)
    }

    /// Remove a document from the store and refresh the list.
    ///
    /// Deleting a document that is no longer stored is not an error.
    #[instrument(skip(self, document), fields(document_id = %document.id()))]
    pub fn delete(&mut self, document: &Document) {
        match lock_store(&self.store).and_then(|mut store| store.delete(document.id())) {
            Ok(()) => info!("document deleted"),
            Err(e) => error!(error = %e, "could not delete document"),
        }
        self.refresh();
    }

    /// Show the scanner if hidden, hide it if shown.
    pub fn toggle_scanner_presentation(&mut self) {
        self.scanner_presented = !self.scanner_presented;
        self.publish();
    }

    /// Resolve a scanner session.
    ///
    /// Captured pages become a new document, pages whose bytes do not decode
    /// are dropped with a warning. Failure is logged and cancellation does
    /// nothing. In every case the scanner is hidden afterwards.
    pub fn handle_scan_outcome(&mut self, outcome: ScanOutcome) -> Option<DocumentId> {
        self.scanner_presented = false;
        self.publish();

        match outcome {
            ScanOutcome::Captured(pages) => {
                let images: Vec<DynamicImage> = pages
                    .into_iter()
                    .enumerate()
                    .filter_map(|(index, bytes)| {
                        let page = ImageData::new(bytes);
                        let image = decode_page(&page);
                        if image.is_none() {
                            warn!(index, bytes = page.len(), "dropping undecodable captured page");
                        }
                        image
                    })
                    .collect();
                self.create_from_scan(&images)
            }
            ScanOutcome::Failed(message) => {
                error!(%message, "scan failed");
                None
            }
            ScanOutcome::Cancelled => {
                info!("scan cancelled");
                None
            }
        }
    }

    fn publish(&self) {
        self.tx.send_replace(self.snapshot());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use image::{Rgb, RgbImage};
    use paperstack_core::PageImageFormat;
    use paperstack_core::error::{PaperstackError, Result};
    use paperstack_store::{DocumentStore, SqliteDocumentStore};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Store whose queries can be made to fail on demand.
    struct FlakyStore {
        inner: SqliteDocumentStore,
        failing: Arc<AtomicBool>,
    }

    impl DocumentStore for FlakyStore {
        fn fetch_all(&self, order: SortOrder) -> Result<Vec<Document>> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(PaperstackError::Database("disk I/O error".into()));
            }
            self.inner.fetch_all(order)
        }

        fn get(&self, id: DocumentId) -> Result<Option<Document>> {
            self.inner.get(id)
        }

        fn insert(&mut self, document: &Document) -> Result<()> {
            self.inner.insert(document)
        }

        fn save(&mut self, document: &Document) -> Result<()> {
            self.inner.save(document)
        }

        fn delete(&mut self, id: DocumentId) -> Result<()> {
            self.inner.delete(id)
        }

        fn count(&self) -> Result<usize> {
            self.inner.count()
        }
    }

    fn memory_store() -> SharedStore {
        Arc::new(Mutex::new(
            SqliteDocumentStore::open_in_memory().expect("open store"),
        ))
    }

    fn raster(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([200, 200, 200])))
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        encode_pages(&[raster(width, height)], PageImageFormat::Png).expect("encode")[0]
            .bytes()
            .to_vec()
    }

    fn assert_strictly_newest_first(documents: &[Document]) {
        for pair in documents.windows(2) {
            assert!(
                pair[0].date() >= pair[1].date(),
                "{} is older than {}",
                pair[0].date(),
                pair[1].date()
            );
            assert_ne!(pair[0].id(), pair[1].id());
        }
    }

    #[test]
    fn new_view_model_loads_existing_documents() {
        let store = memory_store();
        {
            let mut guard = lock_store(&store).expect("lock");
            guard
                .insert(&Document::new("Old", Vec::new(), Utc::now()))
                .expect("insert");
        }

        let vm = DocumentsViewModel::new(store, AppConfig::default());
        assert_eq!(vm.documents().len(), 1);
        assert_eq!(vm.documents()[0].name(), "Old");
    }

    #[test]
    fn created_document_comes_first_with_default_name() {
        let mut vm = DocumentsViewModel::new(memory_store(), AppConfig::default());
        vm.create_from_scan(&[raster(8, 8)]).expect("create");

        let before = Utc::now();
        let id = vm
            .create_from_scan(&[raster(10, 10), raster(12, 12), raster(14, 14)])
            .expect("create");

        let first = &vm.documents()[0];
        assert_eq!(first.id(), id);
        assert_eq!(first.name(), "Document");
        assert_eq!(first.page_count(), 3);
        assert!((first.date() - before).abs() < Duration::seconds(5));
    }

    #[test]
    fn empty_capture_still_creates_a_document() {
        let mut vm = DocumentsViewModel::new(memory_store(), AppConfig::default());
        vm.create_from_scan(&[]).expect("create");

        assert_eq!(vm.documents().len(), 1);
        assert_eq!(vm.documents()[0].page_count(), 0);
        assert_eq!(vm.documents()[0].name(), "Document");
    }

    #[test]
    fn configured_default_name_is_used() {
        let config = AppConfig {
            default_document_name: "Scan".into(),
            ..AppConfig::default()
        };
        let mut vm = DocumentsViewModel::new(memory_store(), config);
        vm.create_from_scan(&[raster(4, 4)]).expect("create");
        assert_eq!(vm.documents()[0].name(), "Scan");
    }

    #[test]
    fn empty_configured_name_uses_document() {
        let config = AppConfig {
            default_document_name: String::new(),
            ..AppConfig::default()
        };
        let mut vm = DocumentsViewModel::new(memory_store(), config);
        vm.create_from_scan(&[raster(4, 4)]).expect("create");
        assert_eq!(vm.documents()[0].name(), "Document");
    }

    #[test]
    fn float_raster_capture_is_stored() {
        let mut vm = DocumentsViewModel::new(memory_store(), AppConfig::default());
        let float_page = DynamicImage::ImageRgb32F(image::Rgb32FImage::from_pixel(
            4,
            4,
            Rgb([0.5, 0.5, 0.5]),
        ));

        vm.create_from_scan(&[float_page, raster(4, 4)])
            .expect("create");

        assert_eq!(vm.documents().len(), 1);
        assert_eq!(vm.documents()[0].page_count(), 2);
        assert!(vm.documents()[0].pages().iter().all(|p| decode_page(p).is_some()));
    }

    #[test]
    fn stored_pages_keep_capture_order() {
        let mut vm = DocumentsViewModel::new(memory_store(), AppConfig::default());
        vm.create_from_scan(&[raster(10, 1), raster(20, 1), raster(30, 1)])
            .expect("create");

        let widths: Vec<u32> = vm.documents()[0]
            .pages()
            .iter()
            .map(|page| decode_page(page).expect("decode").width())
            .collect();
        assert_eq!(widths, vec![10, 20, 30]);
    }

    #[test]
    fn deleted_document_leaves_the_cache() {
        let mut vm = DocumentsViewModel::new(memory_store(), AppConfig::default());
        vm.create_from_scan(&[raster(4, 4)]).expect("create");
        vm.create_from_scan(&[raster(4, 4)]).expect("create");

        let doomed = vm.documents()[1].clone();
        vm.delete(&doomed);

        assert_eq!(vm.documents().len(), 1);
        assert!(vm.documents().iter().all(|d| d.id() != doomed.id()));
    }

    #[test]
    fn deleting_twice_is_harmless() {
        let mut vm = DocumentsViewModel::new(memory_store(), AppConfig::default());
        vm.create_from_scan(&[raster(4, 4)]).expect("create");
        let doc = vm.documents()[0].clone();

        vm.delete(&doc);
        vm.delete(&doc);
        assert!(vm.documents().is_empty());
    }

    #[test]
    fn order_stays_newest_first_across_creates_and_deletes() {
        let mut vm = DocumentsViewModel::new(memory_store(), AppConfig::default());
        for _ in 0..4 {
            vm.create_from_scan(&[raster(4, 4)]).expect("create");
            assert_strictly_newest_first(vm.documents());
        }
        let middle = vm.documents()[2].clone();
        vm.delete(&middle);
        vm.create_from_scan(&[raster(4, 4)]).expect("create");

        assert_eq!(vm.documents().len(), 4);
        assert_strictly_newest_first(vm.documents());
    }

    #[test]
    fn toggle_flips_scanner_flag_and_publishes() {
        let mut vm = DocumentsViewModel::new(memory_store(), AppConfig::default());
        let rx = vm.subscribe();
        assert!(!vm.scanner_presented());

        vm.toggle_scanner_presentation();
        assert!(vm.scanner_presented());
        assert!(rx.borrow().scanner_presented);

        vm.toggle_scanner_presentation();
        assert!(!vm.scanner_presented());
        assert!(!rx.borrow().scanner_presented);
    }

    #[test]
    fn captured_outcome_creates_document_and_hides_scanner() {
        let mut vm = DocumentsViewModel::new(memory_store(), AppConfig::default());
        vm.toggle_scanner_presentation();

        let id = vm
            .handle_scan_outcome(ScanOutcome::Captured(vec![png(5, 5), png(6, 6)]))
            .expect("create");

        assert!(!vm.scanner_presented());
        assert_eq!(vm.documents()[0].id(), id);
        assert_eq!(vm.documents()[0].page_count(), 2);
    }

    #[test]
    fn undecodable_captured_pages_are_dropped() {
        let mut vm = DocumentsViewModel::new(memory_store(), AppConfig::default());
        vm.handle_scan_outcome(ScanOutcome::Captured(vec![
            png(5, 5),
            b"not an image".to_vec(),
            png(7, 7),
        ]))
        .expect("create");

        assert_eq!(vm.documents()[0].page_count(), 2);
    }

    #[test]
    fn failed_and_cancelled_outcomes_only_hide_scanner() {
        let mut vm = DocumentsViewModel::new(memory_store(), AppConfig::default());

        vm.toggle_scanner_presentation();
        assert!(vm.handle_scan_outcome(ScanOutcome::Failed("camera busy".into())).is_none());
        assert!(!vm.scanner_presented());

        vm.toggle_scanner_presentation();
        assert!(vm.handle_scan_outcome(ScanOutcome::Cancelled).is_none());
        assert!(!vm.scanner_presented());

        assert!(vm.documents().is_empty());
    }

    #[test]
    fn failed_refresh_keeps_previous_cache() {
        let failing = Arc::new(AtomicBool::new(false));
        let store: SharedStore = Arc::new(Mutex::new(FlakyStore {
            inner: SqliteDocumentStore::open_in_memory().expect("open store"),
            failing: Arc::clone(&failing),
        }));
        let mut vm = DocumentsViewModel::new(Arc::clone(&store), AppConfig::default());
        vm.create_from_scan(&[raster(4, 4)]).expect("create");

        failing.store(true, Ordering::SeqCst);
        vm.create_from_scan(&[raster(4, 4)]).expect("insert still succeeds");
        assert_eq!(vm.documents().len(), 1, "stale cache is kept");

        failing.store(false, Ordering::SeqCst);
        vm.refresh();
        assert_eq!(vm.documents().len(), 2);
    }

    #[test]
    fn refresh_publishes_documents() {
        let mut vm = DocumentsViewModel::new(memory_store(), AppConfig::default());
        let mut rx = vm.subscribe();
        rx.borrow_and_update();

        vm.create_from_scan(&[raster(4, 4)]).expect("create");

        assert!(rx.has_changed().expect("sender alive"));
        assert_eq!(rx.borrow_and_update().documents.len(), 1);
    }
}
