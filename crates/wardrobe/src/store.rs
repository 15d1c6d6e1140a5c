use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::blob::BlobStore;
use crate::error::Result;
use crate::item::{Item, ItemDraft, ItemId, Kind, KindInference};

/// Version tag written into every persisted document. Unknown versions are
/// treated like corruption: the store starts empty instead of guessing.
pub const SCHEMA_VERSION: u32 = 1;

pub const DEFAULT_BLOB_KEY: &str = "closet/items";

#[derive(Debug, Serialize, Deserialize)]
struct ClosetDocument {
    schema_version: u32,
    items: Vec<Item>,
}

/// Owns the garment collection and its write-through persistence.
///
/// The collection loads once at construction; a missing or undecodable blob
/// degrades to an empty closet, never an error. Every mutation persists the
/// whole collection back as one versioned JSON document. A failed write is
/// logged and tolerated: the in-memory collection is NOT rolled back, an
/// accepted divergence until the next successful write.
pub struct WardrobeStore<B: BlobStore> {
    blob: B,
    key: String,
    items: Vec<Item>,
    inference: KindInference,
    first_run: bool,
}

impl<B: BlobStore> WardrobeStore<B> {
    /// Load the collection from `blob` under `key`.
    pub fn load(blob: B, key: impl Into<String>) -> Self {
        let key = key.into();
        let (items, first_run) = match blob.get(&key) {
            Ok(Some(bytes)) => match serde_json::from_slice::<ClosetDocument>(&bytes) {
                Ok(doc) if doc.schema_version == SCHEMA_VERSION => {
                    debug!(count = doc.items.len(), "closet loaded");
                    (doc.items, false)
                }
                Ok(doc) => {
                    warn!(
                        found = doc.schema_version,
                        expected = SCHEMA_VERSION,
                        "unknown closet schema version, starting empty"
                    );
                    (Vec::new(), false)
                }
                Err(error) => {
                    warn!(%error, "undecodable closet blob, starting empty");
                    (Vec::new(), false)
                }
            },
            Ok(None) => (Vec::new(), true),
            Err(error) => {
                warn!(%error, "blob read failed, starting empty");
                (Vec::new(), true)
            }
        };

        Self {
            blob,
            key,
            items,
            inference: KindInference::default(),
            first_run,
        }
    }

    /// Replace the category-to-kind mapping used for `KindSpec::Infer`.
    pub fn with_inference(mut self, inference: KindInference) -> Self {
        self.inference = inference;
        self
    }

    /// True when no persisted closet existed at load time. Lets the
    /// renderer show first-use hints on the empty rings.
    pub fn first_run(&self) -> bool {
        self.first_run
    }

    /// Validate and store a submission. The item goes in at the head so the
    /// most recent garment shows first. Rejected drafts leave the store
    /// untouched and unpersisted.
    pub fn add(&mut self, draft: ItemDraft) -> Result<Item> {
        draft.validate()?;

        let kind = self.inference.resolve(draft.kind, &draft.category);
        let item = Item {
            id: ItemId::fresh(),
            image: draft.image,
            category: draft.category,
            season: draft.season,
            material: draft.material,
            kind,
            created_at: Utc::now(),
        };

        self.items.insert(0, item.clone());
        self.persist();
        Ok(item)
    }

    /// Remove and return the matching item. Unknown ids are a no-op, which
    /// makes removal idempotent.
    pub fn remove(&mut self, id: &ItemId) -> Option<Item> {
        let position = self.items.iter().position(|item| &item.id == id)?;
        let removed = self.items.remove(position);
        self.persist();
        Some(removed)
    }

    /// Items in store order (most recent first), optionally one ring only.
    pub fn list(&self, kind: Option<Kind>) -> impl Iterator<Item = &Item> {
        self.items
            .iter()
            .filter(move |item| kind.is_none_or(|k| item.kind == k))
    }

    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.get(id).is_some()
    }

    pub fn count(&self, kind: Kind) -> usize {
        self.list(Some(kind)).count()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn persist(&self) {
        let document = ClosetDocument {
            schema_version: SCHEMA_VERSION,
            items: self.items.clone(),
        };
        let bytes = match serde_json::to_vec(&document) {
            Ok(bytes) => bytes,
            Err(error) => {
                warn!(%error, "closet serialization failed, keeping in-memory state only");
                return;
            }
        };
        if let Err(error) = self.blob.set(&self.key, &bytes) {
            warn!(%error, "closet write failed, keeping in-memory state only");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::{BlobError, MemoryBlobStore};
    use crate::item::ImageRef;
    use image::{Rgba, RgbaImage};

    fn swatch(shade: u8) -> ImageRef {
        ImageRef::new(RgbaImage::from_pixel(3, 3, Rgba([shade, shade, shade, 255])))
    }

    fn draft(category: &str) -> ItemDraft {
        ItemDraft::new(swatch(128), category, "Summer", "Cotton")
    }

    #[test]
    fn add_assigns_id_timestamp_and_inferred_kind() {
        let mut store = WardrobeStore::load(MemoryBlobStore::new(), DEFAULT_BLOB_KEY);

        let item = store.add(draft("Work")).unwrap();
        assert_eq!(item.kind, Kind::Top);
        assert!(item.id.as_str().starts_with("i_"));
        assert!(store.contains(&item.id));
    }

    #[test]
    fn newest_items_come_first() {
        let mut store = WardrobeStore::load(MemoryBlobStore::new(), DEFAULT_BLOB_KEY);
        store.add(draft("Work")).unwrap();
        let newer = store.add(draft("Play")).unwrap();

        let first = store.list(None).next().unwrap();
        assert_eq!(first.id, newer.id);
    }

    #[test]
    fn rejected_drafts_leave_no_trace() {
        let blob = MemoryBlobStore::new();
        let mut store = WardrobeStore::load(blob.clone(), DEFAULT_BLOB_KEY);

        let result = store.add(ItemDraft::new(swatch(10), "", "Summer", "Cotton"));
        assert!(result.is_err());
        assert!(store.is_empty());
        assert_eq!(blob.get(DEFAULT_BLOB_KEY).unwrap(), None);
    }

    #[test]
    fn collection_round_trips_through_the_blob() {
        let blob = MemoryBlobStore::new();
        let mut store = WardrobeStore::load(blob.clone(), DEFAULT_BLOB_KEY);
        let coat = store.add(draft("Work")).unwrap();
        let jeans = store.add(draft("Denim").with_kind(Kind::Bottom)).unwrap();

        let reloaded = WardrobeStore::load(blob, DEFAULT_BLOB_KEY);
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.get(&coat.id), Some(&coat));
        assert_eq!(reloaded.get(&jeans.id), Some(&jeans));
        assert!(!reloaded.first_run());
    }

    #[test]
    fn remove_is_idempotent() {
        let mut store = WardrobeStore::load(MemoryBlobStore::new(), DEFAULT_BLOB_KEY);
        let item = store.add(draft("Work")).unwrap();

        assert!(store.remove(&item.id).is_some());
        let after_first = store.len();
        assert!(store.remove(&item.id).is_none());
        assert_eq!(store.len(), after_first);
    }

    #[test]
    fn removing_an_unknown_id_is_a_no_op() {
        let mut store = WardrobeStore::load(MemoryBlobStore::new(), DEFAULT_BLOB_KEY);
        store.add(draft("Work")).unwrap();

        assert!(store.remove(&ItemId::from("i_missing")).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn kind_filter_splits_the_rings() {
        let mut store = WardrobeStore::load(MemoryBlobStore::new(), DEFAULT_BLOB_KEY);
        store.add(draft("Work")).unwrap();
        store.add(draft("Play")).unwrap();
        store.add(draft("Denim")).unwrap();

        assert_eq!(store.count(Kind::Top), 2);
        assert_eq!(store.count(Kind::Bottom), 1);
        assert_eq!(store.list(None).count(), 3);
    }

    #[test]
    fn corrupt_blob_degrades_to_empty() {
        let blob = MemoryBlobStore::new();
        blob.set(DEFAULT_BLOB_KEY, b"{not json").unwrap();

        let store = WardrobeStore::load(blob, DEFAULT_BLOB_KEY);
        assert!(store.is_empty());
        assert!(!store.first_run());
    }

    #[test]
    fn unknown_schema_version_degrades_to_empty() {
        let blob = MemoryBlobStore::new();
        blob.set(DEFAULT_BLOB_KEY, br#"{"schema_version":99,"items":[]}"#)
            .unwrap();

        let store = WardrobeStore::load(blob, DEFAULT_BLOB_KEY);
        assert!(store.is_empty());
    }

    #[test]
    fn missing_blob_marks_first_run() {
        let store = WardrobeStore::load(MemoryBlobStore::new(), DEFAULT_BLOB_KEY);
        assert!(store.is_empty());
        assert!(store.first_run());
    }

    /// Accepts nothing, like a storage quota that is already full.
    struct FullBlobStore;

    impl BlobStore for FullBlobStore {
        fn get(&self, _key: &str) -> std::result::Result<Option<Vec<u8>>, BlobError> {
            Ok(None)
        }
        fn set(&self, _key: &str, _bytes: &[u8]) -> std::result::Result<(), BlobError> {
            Err(BlobError::new("quota exceeded"))
        }
    }

    #[test]
    fn write_failures_do_not_roll_back_memory() {
        let mut store = WardrobeStore::load(FullBlobStore, DEFAULT_BLOB_KEY);

        let item = store.add(draft("Work")).unwrap();
        assert!(store.contains(&item.id));
        assert_eq!(store.len(), 1);
    }
}
