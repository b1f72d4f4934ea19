//! Margin cropping for imported photographs.
//!
//! A pixel is *margin* when it sits within `tolerance` (Euclidean RGB distance) of the
//! reference colors; with [`MarginMatch::All`] it must be close to every one of them,
//! with [`MarginMatch::Any`] to at least one. Everything else is content, and the
//! image is cut down to the content bounding box plus a small pad.

use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{DynamicImage, Rgb, RgbImage};
use tracing::{debug, warn};

use configs::{ImportConfig, MarginMatch};

use crate::errors::ServiceError;

/// `#000000` side bars, `#242527` top/bottom chrome, `#68696b` notch area.
pub const DEFAULT_MARGIN_COLORS: [[u8; 3]; 3] = [[0, 0, 0], [36, 37, 39], [104, 105, 107]];
pub const DEFAULT_TOLERANCE: f32 = 15.0;
pub const DEFAULT_PAD: u32 = 2;
pub const JPEG_QUALITY: u8 = 90;

#[derive(Debug, Clone, PartialEq)]
pub struct MarginSpec {
    pub colors: Vec<[u8; 3]>,
    pub tolerance: f32,
    pub mode: MarginMatch,
    pub pad: u32,
}

impl Default for MarginSpec {
    fn default() -> Self {
        Self { colors: DEFAULT_MARGIN_COLORS.to_vec(), tolerance: DEFAULT_TOLERANCE, mode: MarginMatch::All, pad: DEFAULT_PAD }
    }
}

impl MarginSpec {
    pub fn from_config(cfg: &ImportConfig) -> Self {
        Self { tolerance: cfg.margin_tolerance, mode: cfg.margin_match, ..Self::default() }
    }

    fn is_margin(&self, px: &Rgb<u8>) -> bool {
        let limit = self.tolerance * self.tolerance;
        let close = |c: &[u8; 3]| {
            let d: f32 = px.0.iter().zip(c).map(|(&a, &b)| (a as f32 - b as f32).powi(2)).sum();
            d <= limit
        };
        match self.mode {
            MarginMatch::All => self.colors.iter().all(close),
            MarginMatch::Any => self.colors.iter().any(close),
        }
    }
}

/// Axis-aligned rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Padded bounding box of all content pixels, clamped to the image. `None` when
/// every pixel is margin.
pub fn content_bounds(rgb: &RgbImage, spec: &MarginSpec) -> Option<Bounds> {
    let (w, h) = rgb.dimensions();
    let mut rows = (u32::MAX, 0u32);
    let mut cols = (u32::MAX, 0u32);
    let mut found = false;
    for (x, y, px) in rgb.enumerate_pixels() {
        if spec.is_margin(px) {
            continue;
        }
        found = true;
        rows = (rows.0.min(y), rows.1.max(y));
        cols = (cols.0.min(x), cols.1.max(x));
    }
    if !found {
        return None;
    }
    let top = rows.0.saturating_sub(spec.pad);
    let bottom = (rows.1 + spec.pad).min(h - 1);
    let left = cols.0.saturating_sub(spec.pad);
    let right = (cols.1 + spec.pad).min(w - 1);
    Some(Bounds { x: left, y: top, width: right - left + 1, height: bottom - top + 1 })
}

/// Crop `img` to its content. Degenerate (all-margin) images come back as-is.
pub fn crop_margins(img: &DynamicImage, spec: &MarginSpec) -> DynamicImage {
    let rgb = img.to_rgb8();
    match content_bounds(&rgb, spec) {
        Some(b) if (b.width, b.height) != rgb.dimensions() || b.x != 0 || b.y != 0 => {
            img.crop_imm(b.x, b.y, b.width, b.height)
        }
        _ => img.clone(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CropOutcome {
    /// Margins removed; dimensions before and after.
    Cropped { from: (u32, u32), to: (u32, u32) },
    /// Decoded and re-encoded, nothing to trim.
    Unchanged { size: (u32, u32) },
    /// Source could not be processed; original bytes were copied.
    Fallback { reason: String },
}

/// Crop `src` and write the result to `dest`, encoded after `dest`'s extension.
///
/// Decoding or encoding failures degrade to copying the source bytes. Only failing to
/// read `src` or to write `dest` at all is an error.
pub fn process_file(src: &Path, dest: &Path, spec: &MarginSpec) -> Result<CropOutcome, ServiceError> {
    let bytes = std::fs::read(src)?;
    match crop_and_encode(&bytes, dest, spec) {
        Ok((encoded, outcome)) => {
            std::fs::write(dest, encoded)?;
            debug!(src = %src.display(), dest = %dest.display(), ?outcome, "image processed");
            Ok(outcome)
        }
        Err(e) => {
            warn!(src = %src.display(), error = %e, "could not crop image, keeping original");
            std::fs::write(dest, &bytes)?;
            Ok(CropOutcome::Fallback { reason: e.to_string() })
        }
    }
}

/// [`process_file`] on the blocking pool.
pub async fn process_file_blocking(
    src: std::path::PathBuf,
    dest: std::path::PathBuf,
    spec: MarginSpec,
) -> Result<CropOutcome, ServiceError> {
    tokio::task::spawn_blocking(move || process_file(&src, &dest, &spec))
        .await
        .map_err(|e| ServiceError::Media(format!("crop task failed: {e}")))?
}

fn crop_and_encode(bytes: &[u8], dest: &Path, spec: &MarginSpec) -> Result<(Vec<u8>, CropOutcome), image::ImageError> {
    let img = image::load_from_memory(bytes)?;
    let from = (img.width(), img.height());
    let cropped = crop_margins(&img, spec);
    let to = (cropped.width(), cropped.height());

    let mut out = Vec::new();
    let ext = dest.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => {
            let enc = PngEncoder::new_with_quality(&mut out, CompressionType::Best, FilterType::Adaptive);
            cropped.write_with_encoder(enc)?;
        }
        _ => {
            // JPEG has no alpha channel
            let enc = JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY);
            DynamicImage::ImageRgb8(cropped.to_rgb8()).write_with_encoder(enc)?;
        }
    }

    let outcome = if from == to { CropOutcome::Unchanged { size: to } } else { CropOutcome::Cropped { from, to } };
    Ok((out, outcome))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHROME: [u8; 3] = [36, 37, 39];

    fn only(color: [u8; 3]) -> MarginSpec { MarginSpec { colors: vec![color], ..MarginSpec::default() } }

    /// `w`×`h` image of `border`, with a red block at `x0..x1` × `y0..y1`.
    fn framed(w: u32, h: u32, border: [u8; 3], x0: u32, x1: u32, y0: u32, y1: u32) -> RgbImage {
        RgbImage::from_fn(w, h, |x, y| {
            if (x0..x1).contains(&x) && (y0..y1).contains(&y) { Rgb([200, 30, 30]) } else { Rgb(border) }
        })
    }

    #[test]
    fn all_margin_image_is_returned_unchanged() {
        let img = RgbImage::from_pixel(20, 10, Rgb(CHROME));
        assert_eq!(content_bounds(&img, &only(CHROME)), None);
        let out = crop_margins(&DynamicImage::ImageRgb8(img.clone()), &only(CHROME));
        assert_eq!(out.to_rgb8(), img);
    }

    #[test]
    fn border_within_tolerance_is_cut_to_content_plus_pad() {
        // slightly off-color border stays within tolerance
        let img = framed(40, 30, [40, 40, 42], 10, 20, 5, 15);
        let b = content_bounds(&img, &only(CHROME)).unwrap();
        assert_eq!(b, Bounds { x: 8, y: 3, width: 14, height: 14 });

        let out = crop_margins(&DynamicImage::ImageRgb8(img), &only(CHROME));
        assert_eq!((out.width(), out.height()), (14, 14));
    }

    #[test]
    fn pad_is_clamped_to_image_edges() {
        let img = framed(12, 12, CHROME, 0, 3, 10, 12);
        let b = content_bounds(&img, &only(CHROME)).unwrap();
        assert_eq!(b, Bounds { x: 0, y: 8, width: 5, height: 4 });
    }

    #[test]
    fn default_conjunctive_test_never_trims_distinct_reference_colors() {
        // no pixel can be within 15 of both black and #68696b at once
        let img = framed(30, 30, [0, 0, 0], 10, 20, 10, 20);
        let b = content_bounds(&img, &MarginSpec::default()).unwrap();
        assert_eq!(b, Bounds { x: 0, y: 0, width: 30, height: 30 });
    }

    #[test]
    fn any_mode_strips_mixed_black_and_chrome_bars() {
        let mut img = framed(30, 30, [0, 0, 0], 10, 20, 10, 20);
        for x in 0..30 {
            for y in 0..4 {
                img.put_pixel(x, y, Rgb(CHROME));
            }
        }
        let spec = MarginSpec { mode: MarginMatch::Any, ..MarginSpec::default() };
        assert_eq!(content_bounds(&img, &spec).unwrap(), Bounds { x: 8, y: 8, width: 14, height: 14 });
    }

    #[test]
    fn grayscale_and_alpha_are_normalized() {
        let gray = image::GrayImage::from_fn(10, 10, |x, _| image::Luma([if x < 5 { 0 } else { 255 }]));
        let out = crop_margins(&DynamicImage::ImageLuma8(gray), &only([0, 0, 0]));
        assert_eq!((out.width(), out.height()), (7, 10));

        let rgba = image::RgbaImage::from_fn(10, 10, |x, _| image::Rgba(if x < 5 { [0, 0, 0, 255] } else { [9, 200, 9, 0] }));
        let out = crop_margins(&DynamicImage::ImageRgba8(rgba), &only([0, 0, 0]));
        assert_eq!(out.width(), 7);
    }

    #[test]
    fn process_file_crops_and_writes_jpeg() -> Result<(), anyhow::Error> {
        let tmp = tempfile::tempdir()?;
        let src = tmp.path().join("IMG_0001.png");
        framed(40, 30, CHROME, 10, 20, 5, 15).save(&src)?;
        let dest = tmp.path().join("out.jpg");

        let outcome = process_file(&src, &dest, &only(CHROME))?;
        assert_eq!(outcome, CropOutcome::Cropped { from: (40, 30), to: (14, 14) });
        let written = image::open(&dest)?;
        assert_eq!((written.width(), written.height()), (14, 14));
        Ok(())
    }

    #[test]
    fn corrupt_source_falls_back_to_copy() -> Result<(), anyhow::Error> {
        let tmp = tempfile::tempdir()?;
        let src = tmp.path().join("broken.jpg");
        std::fs::write(&src, b"definitely not a jpeg")?;
        let dest = tmp.path().join("copy.jpg");

        let outcome = process_file(&src, &dest, &MarginSpec::default())?;
        assert!(matches!(outcome, CropOutcome::Fallback { .. }));
        assert_eq!(std::fs::read(&dest)?, b"definitely not a jpeg");
        Ok(())
    }

    #[test]
    fn missing_source_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let res = process_file(&tmp.path().join("nope.jpg"), &tmp.path().join("out.jpg"), &MarginSpec::default());
        assert!(matches!(res, Err(ServiceError::Io(_))));
    }
}
