use image::{GrayImage, RgbaImage};

use crate::error::{CutoutError, Result};

/// Mask values at or above this count as foreground.
pub const FOREGROUND_THRESHOLD: u8 = 128;

/// Knock the background out of `source` using a foreground-confidence mask.
///
/// Background pixels (mask value below [`FOREGROUND_THRESHOLD`]) get alpha 0;
/// foreground pixels are copied through untouched, alpha included. The output
/// always has the same dimensions as the input.
///
/// ```
/// use image::{GrayImage, RgbaImage, Rgba, Luma};
/// use cutout::matte::knockout_background;
///
/// let source = RgbaImage::from_pixel(2, 1, Rgba([10, 20, 30, 255]));
/// let mut mask = GrayImage::from_pixel(2, 1, Luma([200]));
/// mask.put_pixel(0, 0, Luma([50]));
///
/// let cut = knockout_background(&source, &mask).unwrap();
/// assert_eq!(cut.get_pixel(0, 0).0[3], 0);
/// assert_eq!(cut.get_pixel(1, 0), &Rgba([10, 20, 30, 255]));
/// ```
pub fn knockout_background(source: &RgbaImage, mask: &GrayImage) -> Result<RgbaImage> {
    if mask.dimensions() != source.dimensions() {
        return Err(CutoutError::MaskDimensionMismatch {
            width: source.width(),
            height: source.height(),
            mask_width: mask.width(),
            mask_height: mask.height(),
        });
    }

    // Binary thresholding keeps strictly-greater pixels, so binarize one
    // below the foreground cutoff: mask >= FOREGROUND_THRESHOLD survives
    // as 255.
    let binary = imageproc::contrast::threshold(
        mask,
        FOREGROUND_THRESHOLD - 1,
        imageproc::contrast::ThresholdType::Binary,
    );

    let mut out = source.clone();
    for (x, y, pixel) in out.enumerate_pixels_mut() {
        if binary.get_pixel(x, y).0[0] == 0 {
            pixel.0[3] = 0;
        }
    }
    Ok(out)
}
