//! Headless drive of the full closet flow: submit a few garments through
//! the background-removal pipeline, rotate the top ring, pick an outfit.
//!
//! Run with `RUST_LOG=debug cargo run --example closet_demo` to watch the
//! state transitions.

use color_eyre::eyre::Result;
use image::{GrayImage, Luma, Rgba, RgbaImage};
use tracing::info;
use tracing_subscriber::EnvFilter;
use wardrobe::{
    Closet, CutoutPipeline, ItemDraft, Kind, MemoryBlobStore, Segmenter, Viewport, WardrobeStore,
    DEFAULT_BLOB_KEY,
};

/// Stand-in segmentation model: everything outside a centered rectangle is
/// background. A real embedder would wrap an ONNX session or a remote
/// service here.
struct RectangleSegmenter;

impl Segmenter for RectangleSegmenter {
    async fn initialize(&self) -> cutout::Result<()> {
        Ok(())
    }

    async fn infer(&self, image: &RgbaImage) -> cutout::Result<GrayImage> {
        let (width, height) = image.dimensions();
        Ok(GrayImage::from_fn(width, height, |x, y| {
            let inside = x > width / 4 && x < width * 3 / 4 && y > height / 4 && y < height * 3 / 4;
            Luma([if inside { 255 } else { 0 }])
        }))
    }
}

fn photo(shade: u8) -> RgbaImage {
    RgbaImage::from_pixel(64, 64, Rgba([shade, shade / 2, 255 - shade, 255]))
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let store = WardrobeStore::load(MemoryBlobStore::new(), DEFAULT_BLOB_KEY);
    let mut closet = Closet::new(
        CutoutPipeline::new(RectangleSegmenter),
        store,
        Viewport::new(800.0, 600.0),
    );
    closet.subscribe(|event| info!(?event, "observer"));

    if closet.first_run() {
        info!("empty closet, add some garments to the rings");
    }
    closet.initialize().await;

    for (category, season, material) in [
        ("Work", "Winter", "Wool"),
        ("Play", "Summer", "Cotton"),
        ("Denim", "All-season", "Denim"),
    ] {
        let shade = 40 * (category.len() as u8);
        let item = closet
            .submit(ItemDraft::new(photo(shade), category, season, material))
            .await?;
        info!(id = %item.id, kind = %item.kind, category, "stored");
    }

    // drag the top ring a quarter turn's worth of travel
    closet.gesture_began(Kind::Top, 0.0);
    closet.gesture_moved(480.0);
    closet.gesture_ended();

    for kind in [Kind::Top, Kind::Bottom] {
        for (item, placement) in closet
            .store()
            .list(Some(kind))
            .zip(closet.placements(kind))
        {
            info!(
                ring = %kind,
                id = %item.id,
                angle = placement.angle_degrees,
                x = placement.x,
                y = placement.y,
                "placed"
            );
        }
    }

    let top_id = closet.store().list(Some(Kind::Top)).next().unwrap().id.clone();
    let bottom_id = closet
        .store()
        .list(Some(Kind::Bottom))
        .next()
        .unwrap()
        .id
        .clone();
    closet.select(Kind::Top, &top_id);
    closet.select(Kind::Bottom, &bottom_id);

    info!(
        top = %closet.selected_top().map(|item| item.category.as_str()).unwrap_or("-"),
        bottom = %closet.selected_bottom().map(|item| item.category.as_str()).unwrap_or("-"),
        "outfit preview"
    );
    Ok(())
}
