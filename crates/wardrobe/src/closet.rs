use carousel::{
    DragRotation, Orientation, Placement, RingGeometry, Viewport, DEFAULT_MARGIN,
    DEFAULT_SENSITIVITY, DEFAULT_SQUASH,
};
use cutout::{CutoutPipeline, CutoutResult, Segmenter};
use image::RgbaImage;
use tracing::{debug, warn};

use crate::blob::BlobStore;
use crate::error::Result;
use crate::item::{ImageRef, Item, ItemDraft, ItemId, Kind};
use crate::selection::Selection;
use crate::store::WardrobeStore;

/// Tuning shared by both rings. Session-only, never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingOptions {
    pub margin: f64,
    pub squash: f64,
    pub orientation: Orientation,
    pub sensitivity: f64,
}

impl Default for RingOptions {
    fn default() -> Self {
        Self {
            margin: DEFAULT_MARGIN,
            squash: DEFAULT_SQUASH,
            orientation: Orientation::default(),
            sensitivity: DEFAULT_SENSITIVITY,
        }
    }
}

/// State-change notification for the rendering surface. The renderer pulls
/// fresh lists/placements in response; nothing here carries render state.
#[derive(Debug, Clone, PartialEq)]
pub enum ClosetEvent {
    ItemAdded { id: ItemId, kind: Kind },
    ItemRemoved { id: ItemId, kind: Kind },
    SelectionChanged { kind: Kind },
    RingRotated { kind: Kind },
    ViewportResized,
}

type Observer = Box<dyn Fn(&ClosetEvent) + Send>;

struct RingSession {
    geometry: RingGeometry,
    drag: DragRotation,
}

impl RingSession {
    fn new(viewport: Viewport, options: RingOptions) -> Self {
        let mut geometry = RingGeometry::fit(viewport, options.margin);
        geometry.squash = options.squash;
        geometry.orientation = options.orientation;
        Self {
            geometry,
            drag: DragRotation::new(options.sensitivity),
        }
    }
}

/// The wardrobe session: store, selection, and the two garment rings,
/// wired to the background-removal pipeline.
///
/// All mutation is synchronous (`&mut self`) and runs to completion before
/// the next event, matching a single cooperative event loop. The only async
/// surface is [`Closet::initialize`] and [`Closet::process_image`], and
/// `process_image` takes `&self` precisely so several submissions can be in
/// flight at once. When they are, whoever finishes first calls
/// [`Closet::add`] first: store order follows completion order, which is
/// harmless because adds only ever append.
pub struct Closet<S: Segmenter, B: BlobStore> {
    pipeline: CutoutPipeline<S>,
    store: WardrobeStore<B>,
    selection: Selection,
    top_ring: RingSession,
    bottom_ring: RingSession,
    active_drag: Option<Kind>,
    observers: Vec<Observer>,
    options: RingOptions,
}

impl<S: Segmenter, B: BlobStore> Closet<S, B> {
    pub fn new(pipeline: CutoutPipeline<S>, store: WardrobeStore<B>, viewport: Viewport) -> Self {
        Self::with_options(pipeline, store, viewport, RingOptions::default())
    }

    pub fn with_options(
        pipeline: CutoutPipeline<S>,
        store: WardrobeStore<B>,
        viewport: Viewport,
        options: RingOptions,
    ) -> Self {
        Self {
            pipeline,
            store,
            selection: Selection::default(),
            top_ring: RingSession::new(viewport, options),
            bottom_ring: RingSession::new(viewport, options),
            active_drag: None,
            observers: Vec::new(),
            options,
        }
    }

    /// One-time segmentation setup. Until this completes, submissions are
    /// stored with their original image (see [`cutout::FallbackReason`]).
    pub async fn initialize(&self) -> bool {
        self.pipeline.initialize().await
    }

    pub fn store(&self) -> &WardrobeStore<B> {
        &self.store
    }

    pub fn first_run(&self) -> bool {
        self.store.first_run()
    }

    /// Register a state-change observer. Observers are session-scoped and
    /// called synchronously from the mutating call.
    pub fn subscribe(&mut self, observer: impl Fn(&ClosetEvent) + Send + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn emit(&self, event: ClosetEvent) {
        debug!(?event, "closet event");
        for observer in &self.observers {
            observer(&event);
        }
    }

    /// Run background removal on one uploaded bitmap. Safe to call for
    /// several uploads concurrently; each call is independent and the
    /// result is handed straight back to the awaiting submitter.
    pub async fn process_image(&self, image: &RgbaImage) -> CutoutResult {
        self.pipeline.process(image).await
    }

    /// Insert a (processed) draft into the store. Synchronous: a result
    /// arriving late, even after unrelated removals, appends exactly one
    /// item and touches nothing else, so it can never resurrect a cleared
    /// selection.
    pub fn add(&mut self, draft: ItemDraft) -> Result<Item> {
        let item = self.store.add(draft)?;
        self.emit(ClosetEvent::ItemAdded {
            id: item.id.clone(),
            kind: item.kind,
        });
        Ok(item)
    }

    /// Convenience submission path: background removal, then storage. On a
    /// degraded pipeline outcome the original image is stored and the
    /// submission still succeeds.
    pub async fn submit(&mut self, mut draft: ItemDraft) -> Result<Item> {
        draft.validate()?;

        let processed = self.process_image(draft.image.as_image()).await;
        if let Some(reason) = processed.fallback {
            warn!(%reason, "background removal degraded, storing original image");
        }
        draft.image = ImageRef::new(processed.image);
        self.add(draft)
    }

    /// Remove a garment. Clears whichever selection referenced it; unknown
    /// ids are a no-op.
    pub fn remove(&mut self, id: &ItemId) -> Option<Item> {
        let removed = self.store.remove(id)?;
        self.emit(ClosetEvent::ItemRemoved {
            id: removed.id.clone(),
            kind: removed.kind,
        });
        if let Some(kind) = self.selection.clear_id(id) {
            self.emit(ClosetEvent::SelectionChanged { kind });
        }
        Some(removed)
    }

    /// Tap-to-select. Rejected (false, no event) when the id is unknown or
    /// hangs on the other ring.
    pub fn select(&mut self, kind: Kind, id: &ItemId) -> bool {
        if self.selection.select(&self.store, kind, id) {
            self.emit(ClosetEvent::SelectionChanged { kind });
            true
        } else {
            false
        }
    }

    /// Live read of the previewed item for one ring.
    pub fn selected(&self, kind: Kind) -> Option<&Item> {
        self.selection
            .selected(kind)
            .and_then(|id| self.store.get(id))
    }

    pub fn selected_top(&self) -> Option<&Item> {
        self.selected(Kind::Top)
    }

    pub fn selected_bottom(&self) -> Option<&Item> {
        self.selected(Kind::Bottom)
    }

    /// Current placements for one ring, in the same order as
    /// `store().list(Some(kind))`.
    pub fn placements(&self, kind: Kind) -> Vec<Placement> {
        let ring = self.ring(kind);
        ring.geometry
            .project(self.store.count(kind), ring.drag.offset_degrees())
    }

    pub fn ring_offset(&self, kind: Kind) -> f64 {
        self.ring(kind).drag.offset_degrees()
    }

    /// Viewport change: refit both rings' radii (the expensive trigger).
    pub fn resize_viewport(&mut self, viewport: Viewport) {
        self.top_ring.geometry.refit(viewport, self.options.margin);
        self.bottom_ring
            .geometry
            .refit(viewport, self.options.margin);
        self.emit(ClosetEvent::ViewportResized);
    }

    /// Gesture start on one ring's surface. Ignored while another gesture
    /// is live; a drag can never switch rings midway.
    pub fn gesture_began(&mut self, kind: Kind, coord: f64) {
        if self.active_drag.is_some() {
            return;
        }
        self.active_drag = Some(kind);
        self.ring_mut(kind).drag.begin(coord);
    }

    /// Movement sample, routed to whichever ring owns the live gesture.
    /// Tracking is global: leaving the ring's bounds does not end the drag.
    pub fn gesture_moved(&mut self, coord: f64) {
        let Some(kind) = self.active_drag else {
            return;
        };
        if self.ring_mut(kind).drag.move_to(coord).is_some() {
            self.emit(ClosetEvent::RingRotated { kind });
        }
    }

    /// Gesture release: the ring keeps its offset exactly where it is.
    pub fn gesture_ended(&mut self) {
        if let Some(kind) = self.active_drag.take() {
            self.ring_mut(kind).drag.end();
        }
    }

    /// Platform-cancelled gesture; same outcome as a release.
    pub fn gesture_cancelled(&mut self) {
        if let Some(kind) = self.active_drag.take() {
            self.ring_mut(kind).drag.cancel();
        }
    }

    fn ring(&self, kind: Kind) -> &RingSession {
        match kind {
            Kind::Top => &self.top_ring,
            Kind::Bottom => &self.bottom_ring,
        }
    }

    fn ring_mut(&mut self, kind: Kind) -> &mut RingSession {
        match kind {
            Kind::Top => &mut self.top_ring,
            Kind::Bottom => &mut self.bottom_ring,
        }
    }
}
