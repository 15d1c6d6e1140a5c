use tracing::debug;

/// Degrees of ring rotation per unit of gesture travel.
pub const DEFAULT_SENSITIVITY: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    Dragging { last_coord: f64 },
}

/// Converts drag gestures into a cumulative rotation offset for one ring.
///
/// One instance per ring. Pointer and touch input are unified upstream into
/// scalar primary-axis coordinates, so the controller only ever sees `f64`s:
/// `begin` on gesture start, `move_to` for every movement sample, `end` or
/// `cancel` on termination. There is no snapping and no inertia; the ring
/// stops exactly where it is released.
#[derive(Debug, Clone)]
pub struct DragRotation {
    phase: Phase,
    sensitivity: f64,
    offset_degrees: f64,
}

impl Default for DragRotation {
    fn default() -> Self {
        Self::new(DEFAULT_SENSITIVITY)
    }
}

impl DragRotation {
    pub fn new(sensitivity: f64) -> Self {
        Self {
            phase: Phase::Idle,
            sensitivity,
            offset_degrees: 0.0,
        }
    }

    /// Cumulative rotation offset, fed to [`RingGeometry::project`].
    ///
    /// [`RingGeometry::project`]: crate::layout::RingGeometry::project
    pub fn offset_degrees(&self) -> f64 {
        self.offset_degrees
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging { .. })
    }

    /// Gesture landed on this ring's surface.
    pub fn begin(&mut self, coord: f64) {
        debug!(coord, "drag begin");
        self.phase = Phase::Dragging { last_coord: coord };
    }

    /// Movement sample. While dragging, accumulates `delta * sensitivity`
    /// into the offset and returns the new value so the caller can
    /// re-project; samples arriving while idle are ignored.
    pub fn move_to(&mut self, coord: f64) -> Option<f64> {
        let Phase::Dragging { last_coord } = self.phase else {
            return None;
        };
        self.offset_degrees += (coord - last_coord) * self.sensitivity;
        self.phase = Phase::Dragging { last_coord: coord };
        Some(self.offset_degrees)
    }

    /// Gesture released: keep the offset exactly where it is.
    pub fn end(&mut self) {
        debug!(offset = self.offset_degrees, "drag end");
        self.phase = Phase::Idle;
    }

    /// Gesture cancelled by the platform. Same outcome as [`end`]: the
    /// accumulated offset is kept, only the tracking stops.
    ///
    /// [`end`]: DragRotation::end
    pub fn cancel(&mut self) {
        self.phase = Phase::Idle;
    }
}
