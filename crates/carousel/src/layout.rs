use serde::{Deserialize, Serialize};

/// Rings never collapse below this, whatever the viewport says.
pub const MIN_RADIUS: f64 = 16.0;

pub const DEFAULT_MARGIN: f64 = 24.0;

/// Vertical squash that flattens the circle into the rail ellipse.
pub const DEFAULT_SQUASH: f64 = 0.45;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// How a garment tile is rotated at its spot on the rail. One policy per
/// ring, applied uniformly, never mixed per item. This is a rendering
/// convention, not data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Tiles stay upright wherever they sit on the ring.
    #[default]
    Upright,
    /// Tiles rotate with their placement angle, as if hung on the rail.
    TangentToRail,
}

/// Where one item sits on its ring, ready for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub angle_degrees: f64,
    pub x: f64,
    pub y: f64,
    pub local_rotation_degrees: f64,
}

/// Per-ring projection geometry.
///
/// [`RingGeometry::fit`] derives the radius from the viewport and is the
/// expensive trigger (construction and resize). [`RingGeometry::project`]
/// is the cheap path, re-run on every rotation change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingGeometry {
    pub radius: f64,
    pub squash: f64,
    pub orientation: Orientation,
}

impl RingGeometry {
    pub fn new(radius: f64, squash: f64, orientation: Orientation) -> Self {
        Self {
            radius: radius.max(MIN_RADIUS),
            squash,
            orientation,
        }
    }

    /// Derive the ring radius from the containing viewport.
    pub fn fit(viewport: Viewport, margin: f64) -> Self {
        Self::new(
            Self::radius_for(viewport, margin),
            DEFAULT_SQUASH,
            Orientation::default(),
        )
    }

    pub fn radius_for(viewport: Viewport, margin: f64) -> f64 {
        (viewport.width.min(viewport.height) / 2.0 - margin).max(MIN_RADIUS)
    }

    /// Recompute the radius for a new viewport, keeping squash and
    /// orientation as configured.
    pub fn refit(&mut self, viewport: Viewport, margin: f64) {
        self.radius = Self::radius_for(viewport, margin);
    }

    /// Angular placement for `item_count` items under the given rotation
    /// offset. Items are spaced evenly; an empty ring yields an empty list
    /// rather than dividing by zero.
    pub fn project(&self, item_count: usize, rotation_offset_degrees: f64) -> Vec<Placement> {
        if item_count == 0 {
            return Vec::new();
        }

        let step = 360.0 / item_count as f64;
        (0..item_count)
            .map(|index| {
                let angle = (step * index as f64 + rotation_offset_degrees).rem_euclid(360.0);
                let radians = angle.to_radians();
                Placement {
                    angle_degrees: angle,
                    x: self.radius * radians.cos(),
                    y: self.radius * radians.sin() * self.squash,
                    local_rotation_degrees: match self.orientation {
                        Orientation::Upright => 0.0,
                        Orientation::TangentToRail => angle,
                    },
                }
            })
            .collect()
    }
}
