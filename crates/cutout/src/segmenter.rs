use std::future::Future;

use image::{GrayImage, RgbaImage};

use crate::error::Result;

/// External segmentation model behind an async request/response seam.
///
/// Implementations wrap whatever actually runs the model (an ONNX session, a
/// subprocess, a remote service). Each `infer` call is an independent
/// request; results are returned directly to the awaiting caller, never
/// routed through shared callback state.
pub trait Segmenter: Send + Sync {
    /// One-time model setup (weight loading, session creation). Must
    /// complete before `infer` produces usable masks.
    fn initialize(&self) -> impl Future<Output = Result<()>> + Send;

    /// Produce a single-channel foreground-confidence mask (0 = certain
    /// background, 255 = certain foreground) with the same dimensions as
    /// the input image.
    fn infer(&self, image: &RgbaImage) -> impl Future<Output = Result<GrayImage>> + Send;
}
