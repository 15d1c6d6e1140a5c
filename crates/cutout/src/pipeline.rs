use std::sync::atomic::{AtomicBool, Ordering};

use image::RgbaImage;
use strum::Display;
use tracing::{debug, warn};

use crate::matte;
use crate::segmenter::Segmenter;

/// Why a [`CutoutResult`] carries the original image instead of a cutout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum FallbackReason {
    /// Processing was requested before the segmentation backend finished
    /// its one-time initialization.
    NotReady,
    /// The backend returned an error for this image.
    InferenceFailed,
    /// The backend produced a mask whose dimensions do not match the image.
    MaskMismatch,
}

/// Outcome of a background-removal request. Always carries a usable image:
/// either the cutout, or (flagged) the unmodified original.
#[derive(Debug, Clone)]
pub struct CutoutResult {
    pub image: RgbaImage,
    pub fallback: Option<FallbackReason>,
}

impl CutoutResult {
    fn clean(image: RgbaImage) -> Self {
        Self { image, fallback: None }
    }

    fn degraded(image: RgbaImage, reason: FallbackReason) -> Self {
        Self { image, fallback: Some(reason) }
    }

    pub fn is_degraded(&self) -> bool {
        self.fallback.is_some()
    }
}

/// Background-removal pipeline over an external [`Segmenter`].
///
/// The segmenter needs one-time async initialization; until that completes,
/// `process` does not queue or block: it hands the original image back
/// immediately, flagged [`FallbackReason::NotReady`]. Inference errors
/// likewise degrade to the original. No retry is attempted; the caller (or
/// the user resubmitting) decides whether to try again.
pub struct CutoutPipeline<S: Segmenter> {
    segmenter: S,
    ready: AtomicBool,
}

impl<S: Segmenter> CutoutPipeline<S> {
    pub fn new(segmenter: S) -> Self {
        Self {
            segmenter,
            ready: AtomicBool::new(false),
        }
    }

    /// Run the segmenter's one-time setup. Returns whether the pipeline is
    /// now ready; a failed setup is logged and leaves the pipeline in
    /// permanent fallback mode rather than surfacing an error.
    pub async fn initialize(&self) -> bool {
        match self.segmenter.initialize().await {
            Ok(()) => {
                debug!("segmentation backend initialized");
                self.ready.store(true, Ordering::Release);
                true
            }
            Err(error) => {
                warn!(%error, "segmentation backend failed to initialize, images will be stored unprocessed");
                false
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Remove the background from `image`, or fall back to the original.
    ///
    /// Takes `&self` so multiple submissions can be in flight concurrently;
    /// each call is an independent request with no shared result state.
    pub async fn process(&self, image: &RgbaImage) -> CutoutResult {
        if !self.is_ready() {
            return CutoutResult::degraded(image.clone(), FallbackReason::NotReady);
        }

        let mask = match self.segmenter.infer(image).await {
            Ok(mask) => mask,
            Err(error) => {
                warn!(%error, "segmentation inference failed, keeping original image");
                return CutoutResult::degraded(image.clone(), FallbackReason::InferenceFailed);
            }
        };

        if mask.dimensions() != image.dimensions() {
            warn!(
                image_dims = ?image.dimensions(),
                mask_dims = ?mask.dimensions(),
                "segmentation mask dimensions do not match image, keeping original"
            );
            return CutoutResult::degraded(image.clone(), FallbackReason::MaskMismatch);
        }

        match matte::knockout_background(image, &mask) {
            Ok(cut) => CutoutResult::clean(cut),
            Err(error) => {
                warn!(%error, "mask compositing failed, keeping original image");
                CutoutResult::degraded(image.clone(), FallbackReason::InferenceFailed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CutoutError, Result};
    use image::{GrayImage, Luma, Rgba};

    /// Marks the left half of every image as background.
    struct HalfSegmenter {
        fail_init: bool,
        fail_infer: bool,
        mask_dims: Option<(u32, u32)>,
    }

    impl HalfSegmenter {
        fn working() -> Self {
            Self { fail_init: false, fail_infer: false, mask_dims: None }
        }
    }

    impl Segmenter for HalfSegmenter {
        async fn initialize(&self) -> Result<()> {
            if self.fail_init {
                Err(CutoutError::Backend("no weights".into()))
            } else {
                Ok(())
            }
        }

        async fn infer(&self, image: &RgbaImage) -> Result<GrayImage> {
            if self.fail_infer {
                return Err(CutoutError::Backend("inference exploded".into()));
            }
            let (width, height) = self.mask_dims.unwrap_or(image.dimensions());
            Ok(GrayImage::from_fn(width, height, |x, _| {
                if x < width / 2 { Luma([0]) } else { Luma([255]) }
            }))
        }
    }

    fn garment() -> RgbaImage {
        RgbaImage::from_pixel(4, 4, Rgba([120, 80, 40, 255]))
    }

    #[tokio::test]
    async fn not_ready_returns_original_without_blocking() {
        let pipeline = CutoutPipeline::new(HalfSegmenter::working());

        let result = pipeline.process(&garment()).await;
        assert_eq!(result.fallback, Some(FallbackReason::NotReady));
        assert_eq!(result.image, garment());
    }

    #[tokio::test]
    async fn initialized_pipeline_cuts_background() {
        let pipeline = CutoutPipeline::new(HalfSegmenter::working());
        assert!(pipeline.initialize().await);

        let result = pipeline.process(&garment()).await;
        assert!(!result.is_degraded());
        assert_eq!(result.image.get_pixel(0, 0).0[3], 0);
        assert_eq!(result.image.get_pixel(3, 0).0[3], 255);
    }

    #[tokio::test]
    async fn failed_init_leaves_pipeline_in_fallback_mode() {
        let pipeline = CutoutPipeline::new(HalfSegmenter {
            fail_init: true,
            ..HalfSegmenter::working()
        });
        assert!(!pipeline.initialize().await);
        assert!(!pipeline.is_ready());

        let result = pipeline.process(&garment()).await;
        assert_eq!(result.fallback, Some(FallbackReason::NotReady));
    }

    #[tokio::test]
    async fn inference_error_falls_back_to_original() {
        let pipeline = CutoutPipeline::new(HalfSegmenter {
            fail_infer: true,
            ..HalfSegmenter::working()
        });
        pipeline.initialize().await;

        let result = pipeline.process(&garment()).await;
        assert_eq!(result.fallback, Some(FallbackReason::InferenceFailed));
        assert_eq!(result.image, garment());
    }

    #[tokio::test]
    async fn mismatched_mask_falls_back_to_original() {
        let pipeline = CutoutPipeline::new(HalfSegmenter {
            mask_dims: Some((2, 2)),
            ..HalfSegmenter::working()
        });
        pipeline.initialize().await;

        let result = pipeline.process(&garment()).await;
        assert_eq!(result.fallback, Some(FallbackReason::MaskMismatch));
        assert_eq!(result.image, garment());
    }
}
