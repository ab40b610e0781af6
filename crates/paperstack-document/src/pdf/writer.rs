// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — render an ordered sequence of page images into a multi-page
// PDF using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`. A document with no pages is assembled directly with
// `lopdf` so that it still carries a well-formed, empty page tree.

use image::DynamicImage;
use lopdf::{Object, dictionary};
use paperstack_core::error::PaperstackError;
use paperstack_core::{PageLayout, PaperSize};
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument, warn};

/// Millimetres per PostScript point.
const MM_PER_PT: f32 = 25.4 / 72.0;

/// Margin kept around images when fitting them to paper.
const PAPER_MARGIN_MM: f32 = 15.0;

/// Resolution at which images are sized when fitted to paper.
const PAPER_DPI: f32 = 150.0;

/// Renders page images into PDF documents, one page per image.
pub struct PdfWriter {
    /// How each image is placed on its page.
    layout: PageLayout,
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
}

impl PdfWriter {
    /// Create a new writer with the given page layout.
    pub fn new(layout: PageLayout) -> Self {
        Self {
            layout,
            title: None,
        }
    }

    /// Writer whose pages take each image's own size.
    pub fn match_image() -> Self {
        Self::new(PageLayout::MatchImage)
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Render `images` into a PDF with exactly one page per image.
    ///
    /// Page *i* of the output is image *i* of the input; nothing is
    /// reordered or deduplicated. An empty slice yields a valid PDF with zero
    /// pages.
    #[instrument(skip(self, images), fields(images = images.len()))]
    pub fn create_from_images(&self, images: &[DynamicImage]) -> Result<Vec<u8>, PaperstackError> {
        let title = self.title.as_deref().unwrap_or("Paperstack Document");

        info!(layout = ?self.layout, title, "Creating multi-page PDF");

        if images.is_empty() {
            return empty_pdf(title);
        }

        let mut doc = PdfDocument::new(title);
        let mut pages: Vec<PdfPage> = Vec::with_capacity(images.len());

        for (index, image) in images.iter().enumerate() {
            let (width, height) = (image.width(), image.height());
            if width == 0 || height == 0 {
                return Err(PaperstackError::PdfError(format!(
                    "page {index} has zero size ({width}x{height})"
                )));
            }

            let rgb_image = image.to_rgb8();
            let raw = RawImage {
                pixels: RawImageData::U8(rgb_image.into_raw()),
                width: width as usize,
                height: height as usize,
                data_format: RawImageFormat::RGB8,
                tag: Vec::new(),
            };
            let xobject_id = doc.add_image(&raw);

            let placement = self.place(width, height);
            let ops = vec![Op::UseXobject {
                id: xobject_id,
                transform: placement.transform,
            }];

            debug!(index, width, height, "Page image placed");
            pages.push(PdfPage::new(placement.page_w, placement.page_h, ops));
        }

        doc.with_pages(pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);

        if !warnings.is_empty() {
            warn!(count = warnings.len(), "printpdf reported warnings while saving");
        }
        debug!(bytes = output.len(), pages = images.len(), "PDF rendered");

        Ok(output)
    }

    /// Work out page size and image transform for one image.
    fn place(&self, width_px: u32, height_px: u32) -> Placement {
        match self.layout {
            PageLayout::MatchImage => {
                // One pixel per point; the page hugs the image.
                let w_pt = width_px as f32;
                let h_pt = height_px as f32;
                Placement {
                    page_w: Mm(w_pt * MM_PER_PT),
                    page_h: Mm(h_pt * MM_PER_PT),
                    transform: XObjectTransform {
                        translate_x: Some(Pt(0.0)),
                        translate_y: Some(Pt(0.0)),
                        scale_x: Some(1.0),
                        scale_y: Some(1.0),
                        dpi: Some(72.0),
                        rotate: None,
                    },
                }
            }
            PageLayout::FitToPaper(paper) => fit_to_paper(paper, width_px, height_px),
        }
    }
}

/// Page geometry for a single image.
struct Placement {
    page_w: Mm,
    page_h: Mm,
    transform: XObjectTransform,
}

/// Centre the image on the paper, scaled down (never up) to fit inside the
/// margins while preserving its aspect ratio.
fn fit_to_paper(paper: PaperSize, width_px: u32, height_px: u32) -> Placement {
    let (w_mm, h_mm) = paper.dimensions_mm();
    let (page_w, page_h) = (Mm(w_mm as f32), Mm(h_mm as f32));

    let usable_w_pt = Mm(page_w.0 - 2.0 * PAPER_MARGIN_MM).into_pt().0;
    let usable_h_pt = Mm(page_h.0 - 2.0 * PAPER_MARGIN_MM).into_pt().0;

    let img_w_pt = width_px as f32 / PAPER_DPI * 72.0;
    let img_h_pt = height_px as f32 / PAPER_DPI * 72.0;

    let scale = (usable_w_pt / img_w_pt).min(usable_h_pt / img_h_pt).min(1.0);

    let rendered_w_pt = img_w_pt * scale;
    let rendered_h_pt = img_h_pt * scale;

    let margin_pt = Mm(PAPER_MARGIN_MM).into_pt().0;
    let x_offset = margin_pt + (usable_w_pt - rendered_w_pt) / 2.0;
    let y_offset = margin_pt + (usable_h_pt - rendered_h_pt) / 2.0;

    Placement {
        page_w,
        page_h,
        transform: XObjectTransform {
            translate_x: Some(Pt(x_offset)),
            translate_y: Some(Pt(y_offset)),
            scale_x: Some(scale),
            scale_y: Some(scale),
            dpi: Some(PAPER_DPI),
            rotate: None,
        },
    }
}

/// Build a PDF whose page tree has no kids.
fn empty_pdf(title: &str) -> Result<Vec<u8>, PaperstackError> {
    let mut doc = lopdf::Document::with_version("1.5");

    let pages_id = doc.new_object_id();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => Vec::<Object>::new(),
            "Count" => 0,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(title),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut output = Vec::new();
    doc.save_to(&mut output)
        .map_err(|err| PaperstackError::PdfError(format!("failed to write empty PDF: {err}")))?;

    debug!(bytes = output.len(), "Empty PDF rendered");
    Ok(output)
}
