// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — decode, thumbnail, and encode page images using the
// `image` crate.

use image::{DynamicImage, ImageFormat};
use paperstack_core::PageImageFormat;
use paperstack_core::error::PaperstackError;
use tracing::{debug, instrument};

/// Thin wrapper over a single decoded page image.
///
/// Transformations consume `self` and return a new `ImageProcessor`, so calls
/// chain:
///
/// ```ignore
/// let png = ImageProcessor::from_bytes(&jpeg)?
///     .thumbnail(96)
///     .to_png_bytes()?;
/// ```
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Create a processor from raw encoded bytes (JPEG, PNG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, PaperstackError> {
        let img = image::load_from_memory(data).map_err(|err| {
            PaperstackError::ImageError(format!("failed to decode image: {}", err))
        })?;
        debug!(
            width = img.width(),
            height = img.height(),
            "Image decoded from bytes"
        );
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    /// Current image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Current image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the underlying `DynamicImage`.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    /// Consume the processor and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Transformations ------------------------------------------------------

    /// Shrink the image so its longest edge is at most `max_edge` pixels,
    /// preserving aspect ratio. Images already small enough are returned as-is.
    #[instrument(skip(self), fields(max_edge))]
    pub fn thumbnail(self, max_edge: u32) -> Self {
        if self.image.width() <= max_edge && self.image.height() <= max_edge {
            return self;
        }
        let resized = self
            .image
            .resize(max_edge, max_edge, image::imageops::FilterType::Lanczos3);
        debug!(
            new_w = resized.width(),
            new_h = resized.height(),
            "Thumbnail complete"
        );
        Self { image: resized }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current image in the configured page format.
    pub fn encode(&self, format: PageImageFormat) -> Result<Vec<u8>, PaperstackError> {
        match format {
            PageImageFormat::Png => self.to_png_bytes(),
            PageImageFormat::Jpeg { quality } => self.to_jpeg_bytes(quality),
        }
    }

    /// Encode the current image as PNG bytes.
    ///
    /// PNG has no floating-point samples, so 32-bit float rasters are stored
    /// as 16-bit integers.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, PaperstackError> {
        match &self.image {
            DynamicImage::ImageRgb32F(_) => encode_to_format(
                &DynamicImage::ImageRgb16(self.image.to_rgb16()),
                ImageFormat::Png,
            ),
            DynamicImage::ImageRgba32F(_) => encode_to_format(
                &DynamicImage::ImageRgba16(self.image.to_rgba16()),
                ImageFormat::Png,
            ),
            image => encode_to_format(image, ImageFormat::Png),
        }
    }

    /// Encode the current image as JPEG bytes with the given quality (1-100).
    pub fn to_jpeg_bytes(&self, quality: u8) -> Result<Vec<u8>, PaperstackError> {
        let mut buffer = Vec::new();
        let rgb = self.image.to_rgb8();
        let encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
        rgb.write_with_encoder(encoder).map_err(|err| {
            PaperstackError::ImageError(format!("JPEG encoding failed: {}", err))
        })?;
        Ok(buffer)
    }
}

/// Encode a `DynamicImage` into the specified format, returning the raw bytes.
fn encode_to_format(
    image: &DynamicImage,
    format: ImageFormat,
) -> Result<Vec<u8>, PaperstackError> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    image.write_to(&mut cursor, format).map_err(|err| {
        PaperstackError::ImageError(format!("image encoding failed: {}", err))
    })?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn solid(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([200, 40, 40])))
    }

    #[test]
    fn png_bytes_decode_back_to_same_size() {
        let png = ImageProcessor::from_dynamic(solid(31, 17))
            .to_png_bytes()
            .expect("encode");
        let decoded = ImageProcessor::from_bytes(&png).expect("decode");
        assert_eq!((decoded.width(), decoded.height()), (31, 17));
    }

    #[test]
    fn float_rasters_encode_as_png() {
        let rgb = DynamicImage::ImageRgb32F(image::Rgb32FImage::from_pixel(
            6,
            4,
            image::Rgb([0.25, 0.5, 1.0]),
        ));
        let rgba = DynamicImage::ImageRgba32F(image::Rgba32FImage::from_pixel(
            3,
            5,
            image::Rgba([1.0, 0.0, 0.5, 1.0]),
        ));

        for (image, size) in [(rgb, (6, 4)), (rgba, (3, 5))] {
            let png = ImageProcessor::from_dynamic(image)
                .encode(PageImageFormat::Png)
                .expect("encode");
            let decoded = ImageProcessor::from_bytes(&png).expect("decode");
            assert_eq!((decoded.width(), decoded.height()), size);
        }
    }

    #[test]
    fn jpeg_encoding_produces_jpeg_magic() {
        let jpeg = ImageProcessor::from_dynamic(solid(8, 8))
            .encode(PageImageFormat::Jpeg { quality: 80 })
            .expect("encode");
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let result = ImageProcessor::from_bytes(b"definitely not an image");
        assert!(matches!(result, Err(PaperstackError::ImageError(_))));
    }

    #[test]
    fn thumbnail_preserves_aspect_ratio() {
        let thumb = ImageProcessor::from_dynamic(solid(400, 200)).thumbnail(100);
        assert_eq!(thumb.width(), 100);
        assert_eq!(thumb.height(), 50);
    }

    #[test]
    fn thumbnail_never_upscales() {
        let thumb = ImageProcessor::from_dynamic(solid(20, 10)).thumbnail(100);
        assert_eq!((thumb.width(), thumb.height()), (20, 10));
    }
}
