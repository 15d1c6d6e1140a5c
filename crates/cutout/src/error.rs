use thiserror::Error;

#[derive(Error, Debug)]
pub enum CutoutError {
    #[error("Segmentation backend error: {0}")]
    Backend(String),

    #[error("Mask dimensions {mask_width}x{mask_height} do not match source {width}x{height}")]
    MaskDimensionMismatch {
        width: u32,
        height: u32,
        mask_width: u32,
        mask_height: u32,
    },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, CutoutError>;
