// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document detail view model — rename, PDF export, print, and share for a
// single document.
//
// Generated PDFs are never stored with the document. Each export writes a
// fresh file to the scratch directory and hands its path (or bytes) to the
// platform.

use std::path::PathBuf;

use image::DynamicImage;
use paperstack_core::{AppConfig, Document};
use paperstack_document::{DecodedPages, PdfWriter, ScratchDir, decode_pages};
use tokio::sync::watch;
use tracing::{error, info, instrument, warn};

use crate::PDF_MIME_TYPE;
use crate::shared::{SharedBridge, SharedStore, lock_store};

/// Rename dialog state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailSnapshot {
    pub rename_presented: bool,
    /// Text currently typed into the rename field.
    pub new_document_name: String,
}

/// Decoded pages of a document, ready for display.
#[derive(Debug, Default)]
pub struct PageListing {
    /// Rasters in page order, undecodable pages left out.
    pub images: Vec<DynamicImage>,
    /// Number of pages the document stores.
    pub stored: usize,
}

impl PageListing {
    /// Page count shown above the thumbnail strip.
    pub fn label(&self) -> String {
        match self.stored {
            1 => "1 page".to_string(),
            n => format!("{n} pages"),
        }
    }
}

/// State container for the document detail screen.
pub struct DocumentDetailViewModel {
    store: SharedStore,
    bridge: SharedBridge,
    config: AppConfig,
    scratch: ScratchDir,
    rename_presented: bool,
    new_document_name: String,
    tx: watch::Sender<DetailSnapshot>,
}

impl DocumentDetailViewModel {
    pub fn new(store: SharedStore, bridge: SharedBridge, config: AppConfig) -> Self {
        let scratch = ScratchDir::new(config.scratch_dir());
        let (tx, _rx) = watch::channel(DetailSnapshot::default());
        Self {
            store,
            bridge,
            config,
            scratch,
            rename_presented: false,
            new_document_name: String::new(),
            tx,
        }
    }

    pub fn rename_presented(&self) -> bool {
        self.rename_presented
    }

    pub fn new_document_name(&self) -> &str {
        &self.new_document_name
    }

    /// Receive a snapshot after every state change.
    pub fn subscribe(&self) -> watch::Receiver<DetailSnapshot> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> DetailSnapshot {
        DetailSnapshot {
            rename_presented: self.rename_presented,
            new_document_name: self.new_document_name.clone(),
        }
    }

    // -- Rename --------------------------------------------------------------

    /// Flip the rename dialog's visibility. Opening it starts from an empty
    /// name field.
    pub fn request_rename(&mut self) {
        self.rename_presented = !self.rename_presented;
        if self.rename_presented {
            self.new_document_name.clear();
        }
        self.publish();
    }

    /// Hide the rename dialog without touching the document.
    pub fn cancel_rename(&mut self) {
        self.rename_presented = false;
        self.publish();
    }

    /// Update the text typed into the rename field.
    pub fn set_new_document_name(&mut self, name: impl Into<String>) {
        self.new_document_name = name.into();
        self.publish();
    }

    /// Rename `document` to `new_name` and commit the change to the store.
    ///
    /// An empty name is ignored. If the store rejects the change the
    /// document keeps its old name. Returns whether the rename was persisted.
    #[instrument(skip(self, document), fields(document_id = %document.id()))]
    pub fn commit_rename(&mut self, document: &mut Document, new_name: &str) -> bool {
        let mut renamed = document.clone();
        if !renamed.rename(new_name) {
            info!("empty name, rename ignored");
            return false;
        }

        match lock_store(&self.store).and_then(|mut store| store.save(&renamed)) {
            Ok(()) => {
                info!(name = new_name, "document renamed");
                *document = renamed;
                true
            }
            Err(e) => {
                error!(error = %e, "could not save renamed document");
                false
            }
        }
    }

    /// Confirm the rename dialog using the typed name, then hide it.
    pub fn confirm_rename(&mut self, document: &mut Document) -> bool {
        let new_name = self.new_document_name.clone();
        let renamed = self.commit_rename(document, &new_name);
        self.rename_presented = false;
        self.publish();
        renamed
    }

    // -- Pages ---------------------------------------------------------------

    /// Decode the document's pages for display.
    ///
    /// Undecodable pages are left out under the skip policy. Under the fail
    /// policy a corrupt page is logged and nothing is shown.
    pub fn pages(&self, document: &Document) -> PageListing {
        let images = match self.decode(document) {
            Some(decoded) => decoded.images,
            None => Vec::new(),
        };
        PageListing {
            images,
            stored: document.page_count(),
        }
    }

    // -- PDF export ----------------------------------------------------------

    /// Render `images` into a multi-page PDF in the scratch directory.
    ///
    /// Page *i* of the file is image *i*. An empty slice gives a zero-page
    /// PDF. Returns `None` if rendering or writing failed.
    pub fn render_to_pdf(&self, images: &[DynamicImage]) -> Option<PathBuf> {
        self.render_titled(images, None)
    }

    /// Present the platform print dialog for `document`.
    ///
    /// A document without pages is refused before anything is rendered. No
    /// dialog is shown if decoding, rendering, or reading the PDF back fails.
    /// Returns whether the dialog was presented.
    #[instrument(skip(self, document), fields(document_id = %document.id(), pages = document.page_count()))]
    pub fn print_document(&self, document: &Document) -> bool {
        if document.is_empty() {
            warn!("document has no pages, nothing to print");
            return false;
        }

        let Some(path) = self.export(document) else {
            error!("PDF generation failed, print dialog not shown");
            return false;
        };

        let bytes = match self.scratch.read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(path = %path.display(), error = %e, "could not read PDF back for printing");
                return false;
            }
        };

        match self
            .bridge
            .show_print_dialog(&bytes, PDF_MIME_TYPE, document.name())
        {
            Ok(()) => {
                info!(bytes = bytes.len(), "print dialog presented");
                true
            }
            Err(e) => {
                error!(error = %e, "print dialog unavailable");
                false
            }
        }
    }

    /// Hand a freshly rendered PDF of `document` to the platform share sheet.
    #[instrument(skip(self, document), fields(document_id = %document.id()))]
    pub fn share_document(&self, document: &Document) -> bool {
        let Some(path) = self.export(document) else {
            error!("PDF generation failed, nothing to share");
            return false;
        };

        match self
            .bridge
            .share_file(&path.to_string_lossy(), PDF_MIME_TYPE)
        {
            Ok(()) => {
                info!(path = %path.display(), "share sheet presented");
                true
            }
            Err(e) => {
                error!(error = %e, "share sheet unavailable");
                false
            }
        }
    }

    /// Decode, render and write `document` as a PDF titled with its name.
    fn export(&self, document: &Document) -> Option<PathBuf> {
        let decoded = self.decode(document)?;
        self.render_titled(&decoded.images, Some(document.name()))
    }

    fn decode(&self, document: &Document) -> Option<DecodedPages> {
        match decode_pages(document.pages(), self.config.decode_policy) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                error!(document_id = %document.id(), error = %e, "could not decode pages");
                None
            }
        }
    }

    fn render_titled(&self, images: &[DynamicImage], title: Option<&str>) -> Option<PathBuf> {
        let mut writer = PdfWriter::new(self.config.page_layout);
        if let Some(title) = title {
            writer.set_title(title);
        }

        let bytes = match writer.create_from_images(images) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(error = %e, "PDF rendering failed");
                return None;
            }
        };

        match self.scratch.write_pdf(&bytes) {
            Ok(path) => Some(path),
            Err(e) => {
                error!(error = %e, "could not write PDF to scratch directory");
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
    use std::sync::{Arc, Mutex};

    use chrono::Utc;
    use image::{Rgb, RgbImage};
    use paperstack_bridge::{NativePrint, NativeScanner, NativeShare, PlatformBridge};
    use paperstack_core::error::Result;
    use paperstack_core::{DecodePolicy, DocumentId, ImageData, PageImageFormat, SortOrder};
    use paperstack_document::{PdfReader, encode_pages};
    use paperstack_store::SqliteDocumentStore;

    /// One presented print dialog.
    #[derive(Debug, Clone)]
    struct PrintCall {
        bytes: Vec<u8>,
        mime_type: String,
        job_name: String,
    }

    /// Bridge that records every dialog it is asked to present.
    #[derive(Default)]
    struct RecordingBridge {
        prints: Mutex<Vec<PrintCall>>,
        shares: Mutex<Vec<(String, String)>>,
    }

    impl RecordingBridge {
        fn prints(&self) -> Vec<PrintCall> {
            self.prints.lock().expect("lock").clone()
        }

        fn shares(&self) -> Vec<(String, String)> {
            self.shares.lock().expect("lock").clone()
        }
    }

    impl PlatformBridge for RecordingBridge {
        fn platform_name(&self) -> &str {
            "Recording"
        }
    }

    impl NativeScanner for RecordingBridge {
        fn scan_document(&self) -> Result<Option<Vec<Vec<u8>>>> {
            Ok(None)
        }
    }

    impl NativePrint for RecordingBridge {
        fn show_print_dialog(&self, document: &[u8], mime_type: &str, job_name: &str) -> Result<()> {
            self.prints.lock().expect("lock").push(PrintCall {
                bytes: document.to_vec(),
                mime_type: mime_type.to_string(),
                job_name: job_name.to_string(),
            });
            Ok(())
        }
    }

    impl NativeShare for RecordingBridge {
        fn share_file(&self, path: &str, mime_type: &str) -> Result<()> {
            self.shares
                .lock()
                .expect("lock")
                .push((path.to_string(), mime_type.to_string()));
            Ok(())
        }
    }

    struct Fixture {
        _scratch: tempfile::TempDir,
        store: SharedStore,
        bridge: Arc<RecordingBridge>,
        vm: DocumentDetailViewModel,
    }

    fn fixture_with(policy: DecodePolicy) -> Fixture {
        let scratch = tempfile::tempdir().expect("tempdir");
        let store: SharedStore = Arc::new(Mutex::new(
            SqliteDocumentStore::open_in_memory().expect("open store"),
        ));
        let bridge = Arc::new(RecordingBridge::default());
        let config = AppConfig {
            scratch_dir: Some(scratch.path().to_path_buf()),
            decode_policy: policy,
            ..AppConfig::default()
        };
        let vm = DocumentDetailViewModel::new(
            Arc::clone(&store),
            Arc::clone(&bridge) as SharedBridge,
            config,
        );
        Fixture {
            _scratch: scratch,
            store,
            bridge,
            vm,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(DecodePolicy::Skip)
    }

    fn raster(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([250, 250, 250])))
    }

    fn stored_document(store: &SharedStore, pages: Vec<ImageData>) -> Document {
        let document = Document::new("Document", pages, Utc::now());
        lock_store(store)
            .expect("lock")
            .insert(&document)
            .expect("insert");
        document
    }

    fn pages(widths: &[u32]) -> Vec<ImageData> {
        let images: Vec<DynamicImage> = widths.iter().map(|w| raster(*w, 20)).collect();
        encode_pages(&images, PageImageFormat::Png).expect("encode")
    }

    fn reload(store: &SharedStore, id: DocumentId) -> Document {
        lock_store(store)
            .expect("lock")
            .get(id)
            .expect("get")
            .expect("document exists")
    }

    // -- Rename --------------------------------------------------------------

    #[test]
    fn request_rename_toggles_dialog() {
        let mut f = fixture();
        let rx = f.vm.subscribe();

        f.vm.request_rename();
        assert!(f.vm.rename_presented());
        assert!(rx.borrow().rename_presented);

        f.vm.request_rename();
        assert!(!f.vm.rename_presented());
    }

    #[test]
    fn reopening_rename_starts_with_empty_name() {
        let mut f = fixture();
        let mut doc = stored_document(&f.store, pages(&[10]));

        f.vm.request_rename();
        f.vm.set_new_document_name("Invoice");
        assert!(f.vm.confirm_rename(&mut doc));
        assert_eq!(doc.name(), "Invoice");

        let rx = f.vm.subscribe();
        f.vm.request_rename();
        assert!(f.vm.rename_presented());
        assert_eq!(f.vm.new_document_name(), "");
        assert_eq!(rx.borrow().new_document_name, "");
    }

    #[test]
    fn empty_name_is_ignored() {
        let mut f = fixture();
        let mut doc = stored_document(&f.store, pages(&[10]));

        assert!(!f.vm.commit_rename(&mut doc, ""));
        assert_eq!(doc.name(), "Document");
        assert_eq!(reload(&f.store, doc.id()).name(), "Document");
    }

    #[test]
    fn rename_persists_across_refresh() {
        let mut f = fixture();
        let mut doc = stored_document(&f.store, pages(&[10]));

        assert!(f.vm.commit_rename(&mut doc, "Report"));
        assert_eq!(doc.name(), "Report");

        let all = lock_store(&f.store)
            .expect("lock")
            .fetch_all(SortOrder::DateDescending)
            .expect("fetch");
        assert_eq!(all[0].name(), "Report");
    }

    #[test]
    fn rename_of_deleted_document_keeps_old_name() {
        let mut f = fixture();
        let mut doc = stored_document(&f.store, pages(&[10]));
        lock_store(&f.store)
            .expect("lock")
            .delete(doc.id())
            .expect("delete");

        assert!(!f.vm.commit_rename(&mut doc, "Gone"));
        assert_eq!(doc.name(), "Document");
    }

    #[test]
    fn confirm_uses_typed_name_and_hides_dialog() {
        let mut f = fixture();
        let mut doc = stored_document(&f.store, pages(&[10]));

        f.vm.request_rename();
        f.vm.set_new_document_name("Invoice");
        assert_eq!(f.vm.snapshot().new_document_name, "Invoice");

        assert!(f.vm.confirm_rename(&mut doc));
        assert!(!f.vm.rename_presented());
        assert_eq!(reload(&f.store, doc.id()).name(), "Invoice");
    }

    #[test]
    fn cancel_leaves_document_alone() {
        let mut f = fixture();
        let doc = stored_document(&f.store, pages(&[10]));

        f.vm.request_rename();
        f.vm.set_new_document_name("Never");
        f.vm.cancel_rename();

        assert!(!f.vm.rename_presented());
        assert_eq!(reload(&f.store, doc.id()).name(), "Document");
    }

    // -- PDF export ----------------------------------------------------------

    #[test]
    fn rendered_pdf_has_one_page_per_image_in_order() {
        let f = fixture();
        let path = f
            .vm
            .render_to_pdf(&[raster(100, 40), raster(200, 40), raster(300, 40)])
            .expect("render");

        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("pdf"));
        let reader = PdfReader::open(&path).expect("open");
        assert_eq!(reader.page_count(), 3);
        let widths: Vec<f32> = reader.page_sizes().iter().map(|(w, _)| *w).collect();
        for (actual, expected) in widths.iter().zip([100.0f32, 200.0, 300.0]) {
            assert!((actual - expected).abs() < 0.5, "{actual} != {expected}");
        }
    }

    #[test]
    fn rendering_nothing_gives_zero_page_pdf() {
        let f = fixture();
        let path = f.vm.render_to_pdf(&[]).expect("render");
        assert_eq!(PdfReader::open(&path).expect("open").page_count(), 0);
    }

    #[test]
    fn every_render_writes_a_new_file() {
        let f = fixture();
        let a = f.vm.render_to_pdf(&[raster(10, 10)]).expect("render");
        let b = f.vm.render_to_pdf(&[raster(10, 10)]).expect("render");
        assert_ne!(a, b);
        assert!(a.exists() && b.exists());
    }

    #[test]
    fn unwritable_scratch_dir_gives_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"file").expect("write");

        let store: SharedStore = Arc::new(Mutex::new(
            SqliteDocumentStore::open_in_memory().expect("open store"),
        ));
        let config = AppConfig {
            scratch_dir: Some(blocker.join("scratch")),
            ..AppConfig::default()
        };
        let vm = DocumentDetailViewModel::new(
            store,
            Arc::new(RecordingBridge::default()) as SharedBridge,
            config,
        );
        assert!(vm.render_to_pdf(&[raster(10, 10)]).is_none());
    }

    // -- Print ---------------------------------------------------------------

    #[test]
    fn empty_document_never_reaches_print_dialog() {
        let f = fixture();
        let doc = stored_document(&f.store, Vec::new());

        assert!(!f.vm.print_document(&doc));
        assert!(f.bridge.prints().is_empty());
    }

    #[test]
    fn print_hands_pdf_and_name_to_dialog() {
        let mut f = fixture();
        let mut doc = stored_document(&f.store, pages(&[30, 40]));
        f.vm.commit_rename(&mut doc, "Lease");

        assert!(f.vm.print_document(&doc));

        let prints = f.bridge.prints();
        assert_eq!(prints.len(), 1);
        assert_eq!(prints[0].job_name, "Lease");
        assert_eq!(prints[0].mime_type, "application/pdf");
        assert!(prints[0].bytes.starts_with(b"%PDF"));
        let reader = PdfReader::from_bytes(&prints[0].bytes).expect("parse");
        assert_eq!(reader.page_count(), 2);
    }

    #[test]
    fn print_skips_corrupt_pages() {
        let f = fixture();
        let mut stored = pages(&[30]);
        stored.push(ImageData::new(b"garbage".to_vec()));
        stored.extend(pages(&[50]));
        let doc = stored_document(&f.store, stored);

        assert!(f.vm.print_document(&doc));
        let prints = f.bridge.prints();
        let reader = PdfReader::from_bytes(&prints[0].bytes).expect("parse");
        assert_eq!(reader.page_count(), 2);
    }

    #[test]
    fn print_with_only_corrupt_pages_sends_empty_pdf() {
        let f = fixture();
        let doc = stored_document(&f.store, vec![ImageData::new(b"garbage".to_vec())]);

        assert!(f.vm.print_document(&doc));
        let reader = PdfReader::from_bytes(&f.bridge.prints()[0].bytes).expect("parse");
        assert_eq!(reader.page_count(), 0);
    }

    #[test]
    fn fail_policy_blocks_print_of_corrupt_document() {
        let f = fixture_with(DecodePolicy::Fail);
        let mut stored = pages(&[30]);
        stored.push(ImageData::new(b"garbage".to_vec()));
        let doc = stored_document(&f.store, stored);

        assert!(!f.vm.print_document(&doc));
        assert!(f.bridge.prints().is_empty());
    }

    #[test]
    fn unavailable_print_dialog_reports_false() {
        let scratch = tempfile::tempdir().expect("tempdir");
        let store: SharedStore = Arc::new(Mutex::new(
            SqliteDocumentStore::open_in_memory().expect("open store"),
        ));
        let config = AppConfig {
            scratch_dir: Some(scratch.path().to_path_buf()),
            ..AppConfig::default()
        };
        let vm = DocumentDetailViewModel::new(
            Arc::clone(&store),
            Arc::new(paperstack_bridge::stub::StubBridge) as SharedBridge,
            config,
        );
        let doc = stored_document(&store, pages(&[10]));

        assert!(!vm.print_document(&doc));
    }

    // -- Share and pages -----------------------------------------------------

    #[test]
    fn share_passes_pdf_path() {
        let f = fixture();
        let doc = stored_document(&f.store, pages(&[10, 20]));

        assert!(f.vm.share_document(&doc));
        let shares = f.bridge.shares();
        assert_eq!(shares.len(), 1);
        assert!(shares[0].0.ends_with(".pdf"));
        assert_eq!(shares[0].1, "application/pdf");
        assert_eq!(PdfReader::open(&shares[0].0).expect("open").page_count(), 2);
    }

    #[test]
    fn page_listing_counts_stored_pages() {
        let f = fixture();
        let mut stored = pages(&[10, 20]);
        stored.push(ImageData::new(b"garbage".to_vec()));
        let doc = stored_document(&f.store, stored);

        let listing = f.vm.pages(&doc);
        assert_eq!(listing.images.len(), 2);
        assert_eq!(listing.label(), "3 pages");
    }

    #[test]
    fn page_listing_is_empty_under_fail_policy() {
        let f = fixture_with(DecodePolicy::Fail);
        let doc = stored_document(&f.store, vec![ImageData::new(b"garbage".to_vec())]);

        let listing = f.vm.pages(&doc);
        assert!(listing.images.is_empty());
        assert_eq!(listing.label(), "1 page");
    }
}
