//! # Circular rack geometry and rotation gestures
//!
//! Pure interaction math for the garment rings: [`layout`] turns an item
//! count, a viewport-derived radius, and a rotation offset into per-item
//! [`Placement`]s on a squashed circle; [`drag`] turns gesture movement into
//! that rotation offset. No rendering and no item data live here; the crate
//! works on counts and coordinates so it can be exercised headlessly.
//!
//! ```
//! use carousel::{DragRotation, RingGeometry, Viewport};
//!
//! let geometry = RingGeometry::fit(Viewport::new(800.0, 600.0), 24.0);
//! let mut drag = DragRotation::default();
//!
//! drag.begin(0.0);
//! let offset = drag.move_to(120.0).unwrap();
//!
//! let placements = geometry.project(6, offset);
//! assert_eq!(placements.len(), 6);
//! ```

pub mod drag;
pub mod layout;

pub use drag::{DragRotation, DEFAULT_SENSITIVITY};
pub use layout::{
    Orientation, Placement, RingGeometry, Viewport, DEFAULT_MARGIN, DEFAULT_SQUASH, MIN_RADIUS,
};
