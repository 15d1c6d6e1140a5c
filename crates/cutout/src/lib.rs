//! # Background removal for garment photos
//!
//! Turns a raw uploaded bitmap into one with a transparent background, using
//! an external segmentation model behind the [`Segmenter`] trait. The model
//! returns a per-pixel foreground-confidence mask; pixels the model is not
//! confident about are knocked out to alpha 0, everything else passes
//! through untouched.
//!
//! The pipeline never fails a submission: before the model is initialized,
//! or whenever inference errors, the caller gets the original image back
//! flagged with a [`FallbackReason`].
//!
//! ```
//! use cutout::matte::knockout_background;
//! use image::{GrayImage, Luma, Rgba, RgbaImage};
//!
//! let photo = RgbaImage::from_pixel(8, 8, Rgba([200, 180, 160, 255]));
//! let mask = GrayImage::from_fn(8, 8, |x, _| if x < 4 { Luma([0]) } else { Luma([255]) });
//!
//! let cut = knockout_background(&photo, &mask)?;
//! assert_eq!(cut.get_pixel(0, 0).0[3], 0);
//! # Ok::<(), cutout::CutoutError>(())
//! ```

pub mod error;
pub mod matte;
pub mod pipeline;
pub mod segmenter;

pub use error::{CutoutError, Result};
pub use matte::FOREGROUND_THRESHOLD;
pub use pipeline::{CutoutPipeline, CutoutResult, FallbackReason};
pub use segmenter::Segmenter;
