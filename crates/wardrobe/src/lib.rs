//! # Wardrobe cataloguing core
//!
//! The item/selection state model behind the closet UI: garments are
//! validated, background-stripped, stored most-recent-first in a
//! write-through [`WardrobeStore`], hung on two independently rotatable
//! rings (see the `carousel` crate), and tap-selected into an outfit
//! preview. The [`Closet`] facade wires all of it together and emits
//! [`ClosetEvent`]s so a rendering surface can stay a pure consumer.
//!
//! Persistence and segmentation stay behind traits ([`BlobStore`],
//! [`Segmenter`]), so the core runs headless, which is also how its tests and
//! the `closet_demo` example drive it.

pub mod blob;
pub mod closet;
pub mod error;
pub mod item;
pub mod selection;
pub mod store;

pub use blob::{BlobError, BlobStore, MemoryBlobStore};
pub use closet::{Closet, ClosetEvent, RingOptions};
pub use error::{Result, WardrobeError};
pub use item::{ImageRef, Item, ItemDraft, ItemId, Kind, KindInference, KindSpec};
pub use selection::Selection;
pub use store::{WardrobeStore, DEFAULT_BLOB_KEY, SCHEMA_VERSION};

// Re-exports for convenience: the collaborator seams and renderer-facing
// geometry types embedders need alongside the store.
pub use carousel::{Orientation, Placement, Viewport};
pub use cutout::{CutoutPipeline, CutoutResult, FallbackReason, Segmenter};
