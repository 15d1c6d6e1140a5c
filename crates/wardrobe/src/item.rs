use std::fmt;
use std::io::Cursor;
use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, Utc};
use image::{ImageFormat, RgbaImage};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use strum::{Display, EnumIter, EnumString};
use uuid::Uuid;

use crate::error::{Result, WardrobeError};

/// Which ring a garment hangs on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Kind {
    Top,
    Bottom,
}

/// Unique garment identifier, assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// A fresh id, unique by construction.
    pub fn fresh() -> Self {
        Self(format!("i_{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Cheaply clonable handle to a garment bitmap.
///
/// Serializes as PNG bytes in a base64 string so the whole collection can
/// live in one opaque blob.
#[derive(Clone)]
pub struct ImageRef(Arc<RgbaImage>);

impl ImageRef {
    pub fn new(image: RgbaImage) -> Self {
        Self(Arc::new(image))
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.0
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.0.dimensions()
    }

    pub fn is_empty(&self) -> bool {
        let (width, height) = self.dimensions();
        width == 0 || height == 0
    }
}

impl From<RgbaImage> for ImageRef {
    fn from(image: RgbaImage) -> Self {
        Self::new(image)
    }
}

impl fmt::Debug for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (width, height) = self.dimensions();
        write!(f, "ImageRef({width}x{height})")
    }
}

impl PartialEq for ImageRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
            || (self.dimensions() == other.dimensions() && self.0.as_raw() == other.0.as_raw())
    }
}

impl Serialize for ImageRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut png = Vec::new();
        self.0
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&BASE64.encode(&png))
    }
}

impl<'de> Deserialize<'de> for ImageRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        let png = BASE64.decode(encoded.as_bytes()).map_err(de::Error::custom)?;
        let image = image::load_from_memory_with_format(&png, ImageFormat::Png)
            .map_err(de::Error::custom)?;
        Ok(Self::new(image.to_rgba8()))
    }
}

/// A catalogued garment. Immutable once stored; the only lifecycle event
/// after creation is removal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub image: ImageRef,
    pub category: String,
    pub season: String,
    pub material: String,
    pub kind: Kind,
    pub created_at: DateTime<Utc>,
}

/// How the draft's kind is decided: stated outright, or inferred from the
/// category tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KindSpec {
    Explicit(Kind),
    #[default]
    Infer,
}

/// Category-to-kind mapping used when a draft leaves its kind to inference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KindInference {
    /// Categories that hang on the top ring; everything else is a bottom.
    pub top_categories: Vec<String>,
}

impl Default for KindInference {
    fn default() -> Self {
        Self {
            top_categories: vec!["Work".to_owned(), "Play".to_owned()],
        }
    }
}

impl KindInference {
    pub fn infer(&self, category: &str) -> Kind {
        if self
            .top_categories
            .iter()
            .any(|top| top.eq_ignore_ascii_case(category))
        {
            Kind::Top
        } else {
            Kind::Bottom
        }
    }

    pub fn resolve(&self, spec: KindSpec, category: &str) -> Kind {
        match spec {
            KindSpec::Explicit(kind) => kind,
            KindSpec::Infer => self.infer(category),
        }
    }
}

/// User-submitted garment awaiting validation and storage.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDraft {
    pub image: ImageRef,
    pub category: String,
    pub season: String,
    pub material: String,
    pub kind: KindSpec,
}

impl ItemDraft {
    pub fn new(
        image: impl Into<ImageRef>,
        category: impl Into<String>,
        season: impl Into<String>,
        material: impl Into<String>,
    ) -> Self {
        Self {
            image: image.into(),
            category: category.into(),
            season: season.into(),
            material: material.into(),
            kind: KindSpec::Infer,
        }
    }

    pub fn with_kind(mut self, kind: Kind) -> Self {
        self.kind = KindSpec::Explicit(kind);
        self
    }

    /// Check the submission is complete. Runs before any mutation so a
    /// rejected draft never leaves a partial item behind.
    pub fn validate(&self) -> Result<()> {
        if self.image.is_empty() {
            return Err(WardrobeError::EmptyImage);
        }
        if self.category.trim().is_empty() {
            return Err(WardrobeError::MissingField("category"));
        }
        if self.season.trim().is_empty() {
            return Err(WardrobeError::MissingField("season"));
        }
        if self.material.trim().is_empty() {
            return Err(WardrobeError::MissingField("material"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn swatch() -> ImageRef {
        ImageRef::new(RgbaImage::from_pixel(2, 2, Rgba([200, 100, 50, 255])))
    }

    #[test]
    fn fresh_ids_are_unique() {
        let a = ItemId::fresh();
        let b = ItemId::fresh();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("i_"));
    }

    #[test]
    fn work_and_play_infer_as_tops() {
        let inference = KindInference::default();
        assert_eq!(inference.infer("Work"), Kind::Top);
        assert_eq!(inference.infer("Play"), Kind::Top);
        assert_eq!(inference.infer("play"), Kind::Top);
        assert_eq!(inference.infer("Lounge"), Kind::Bottom);
        assert_eq!(inference.infer(""), Kind::Bottom);
    }

    #[test]
    fn explicit_kind_wins_over_inference() {
        let inference = KindInference::default();
        assert_eq!(
            inference.resolve(KindSpec::Explicit(Kind::Bottom), "Work"),
            Kind::Bottom
        );
        assert_eq!(inference.resolve(KindSpec::Infer, "Work"), Kind::Top);
    }

    #[test]
    fn custom_mapping_replaces_the_default() {
        let inference = KindInference {
            top_categories: vec!["Shirt".to_owned()],
        };
        assert_eq!(inference.infer("Shirt"), Kind::Top);
        assert_eq!(inference.infer("Work"), Kind::Bottom);
    }

    #[test]
    fn drafts_reject_missing_fields() {
        let draft = ItemDraft::new(swatch(), "", "Summer", "Cotton");
        assert!(matches!(
            draft.validate(),
            Err(WardrobeError::MissingField("category"))
        ));

        let draft = ItemDraft::new(swatch(), "Work", "  ", "Cotton");
        assert!(matches!(
            draft.validate(),
            Err(WardrobeError::MissingField("season"))
        ));
    }

    #[test]
    fn drafts_reject_empty_images() {
        let draft = ItemDraft::new(RgbaImage::new(0, 0), "Work", "Summer", "Cotton");
        assert!(matches!(draft.validate(), Err(WardrobeError::EmptyImage)));
    }

    #[test]
    fn image_survives_the_blob_format() {
        let original = swatch();
        let json = serde_json::to_string(&original).unwrap();
        let restored: ImageRef = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn kind_parses_from_tag_strings() {
        use std::str::FromStr;
        assert_eq!(Kind::from_str("top").unwrap(), Kind::Top);
        assert_eq!(Kind::from_str("Bottom").unwrap(), Kind::Bottom);
        assert_eq!(Kind::Top.to_string(), "top");
    }
}
