use crate::blob::BlobStore;
use crate::item::{ItemId, Kind};
use crate::store::WardrobeStore;

/// The chosen top/bottom pair forming the outfit preview.
///
/// Holds id references only, never item copies: the preview re-reads the
/// referenced item from the store on every access, so removals and the
/// clearing invariant propagate immediately.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    top: Option<ItemId>,
    bottom: Option<ItemId>,
}

impl Selection {
    pub fn selected(&self, kind: Kind) -> Option<&ItemId> {
        match kind {
            Kind::Top => self.top.as_ref(),
            Kind::Bottom => self.bottom.as_ref(),
        }
    }

    /// Point the given ring's selection at `id`. Only takes effect when an
    /// item with that id AND that kind exists; a mismatched kind or unknown
    /// id leaves the selection untouched and returns false.
    pub fn select<B: BlobStore>(
        &mut self,
        store: &WardrobeStore<B>,
        kind: Kind,
        id: &ItemId,
    ) -> bool {
        match store.get(id) {
            Some(item) if item.kind == kind => {
                *self.slot_mut(kind) = Some(id.clone());
                true
            }
            _ => false,
        }
    }

    pub fn clear(&mut self, kind: Kind) {
        *self.slot_mut(kind) = None;
    }

    /// Drop whichever side references `id`, returning the ring that was
    /// cleared. Called on every removal to uphold the no-dangling-selection
    /// invariant.
    pub fn clear_id(&mut self, id: &ItemId) -> Option<Kind> {
        if self.top.as_ref() == Some(id) {
            self.top = None;
            Some(Kind::Top)
        } else if self.bottom.as_ref() == Some(id) {
            self.bottom = None;
            Some(Kind::Bottom)
        } else {
            None
        }
    }

    fn slot_mut(&mut self, kind: Kind) -> &mut Option<ItemId> {
        match kind {
            Kind::Top => &mut self.top,
            Kind::Bottom => &mut self.bottom,
        }
    }
}
