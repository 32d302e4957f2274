//! Wall layout: the fixed, load-time list of framed images.
//!
//! Items are described by position, orientation and an image reference. The
//! core never fetches or decodes image bytes; references are carried forward
//! to the renderer untouched.
//!
//! # Invariants
//! - The item sequence is fixed after construction; nothing is added or removed.
//! - Every item's identifier is computed once, at construction, and cached.
//! - Malformed descriptors fail construction, never rendering.

mod demo;

pub use demo::demo_document;

use glam::{EulerRot, Quat, Vec3};
use mediawall_common::{ItemId, Pose, identify};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;

/// Wall group offset used by the gallery scene.
pub const DEFAULT_ORIGIN: [f32; 3] = [0.0, -0.5, 0.0];

fn default_origin() -> [f32; 3] {
    DEFAULT_ORIGIN
}

/// Item orientation as written in a descriptor file: XYZ Euler angles in
/// radians, or an `[x, y, z, w]` quaternion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Orientation {
    Euler([f32; 3]),
    Quaternion([f32; 4]),
}

impl Default for Orientation {
    fn default() -> Self {
        Self::Euler([0.0; 3])
    }
}

impl Orientation {
    fn to_quat(self) -> Option<Quat> {
        match self {
            Self::Euler([x, y, z]) => {
                if !(x.is_finite() && y.is_finite() && z.is_finite()) {
                    return None;
                }
                Some(Quat::from_euler(EulerRot::XYZ, x, y, z))
            }
            Self::Quaternion(q) => {
                let q = Quat::from_array(q);
                let len = q.length();
                if !len.is_finite() || len < 1e-6 {
                    return None;
                }
                Some(q / len)
            }
        }
    }
}

/// One entry of a wall descriptor document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDescriptor {
    pub position: [f32; 3],
    #[serde(default)]
    pub rotation: Orientation,
    #[serde(default, alias = "url", skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Serialized wall description, as read from JSON or YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallDocument {
    #[serde(default = "default_origin")]
    pub origin: [f32; 3],
    pub items: Vec<ItemDescriptor>,
}

/// Errors from building or loading a wall layout.
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("wall has no items")]
    Empty,
    #[error("item {index} has no image reference")]
    MissingImageRef { index: usize },
    #[error("item {index} has a non-finite position or rotation")]
    NonFinite { index: usize },
    #[error("item {index} has a degenerate orientation quaternion")]
    InvalidOrientation { index: usize },
    #[error("wall origin is not finite")]
    InvalidOrigin,
    #[error("items {first} and {second} share identifier {id}")]
    DuplicateId {
        first: usize,
        second: usize,
        id: ItemId,
    },
}

/// A framed image on the wall. Immutable once the layout is built.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaItem {
    pub index: usize,
    pub id: ItemId,
    /// Position relative to the wall origin.
    pub position: Vec3,
    pub rotation: Quat,
    pub image_ref: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

/// The fixed wall: ordered items plus an identifier index.
#[derive(Debug, Clone)]
pub struct WallLayout {
    origin: Vec3,
    items: Vec<MediaItem>,
    by_id: BTreeMap<ItemId, usize>,
    document: WallDocument,
}

impl WallLayout {
    /// Validate a document and precompute every item's identifier.
    pub fn from_document(document: WallDocument) -> Result<Self, LayoutError> {
        Self::validate(&document)?;
        let layout = Self::assemble(document);
        tracing::debug!(items = layout.len(), "wall layout built");
        Ok(layout)
    }

    /// The built-in nine-panel gallery wall.
    pub fn demo() -> Self {
        Self::assemble(demo_document())
    }

    fn image_ref(desc: &ItemDescriptor) -> Option<&str> {
        desc.image.as_deref().map(str::trim).filter(|r| !r.is_empty())
    }

    fn validate(document: &WallDocument) -> Result<(), LayoutError> {
        if document.items.is_empty() {
            return Err(LayoutError::Empty);
        }
        if !Vec3::from_array(document.origin).is_finite() {
            return Err(LayoutError::InvalidOrigin);
        }

        let mut seen = BTreeMap::new();
        for (index, desc) in document.items.iter().enumerate() {
            let image_ref = Self::image_ref(desc).ok_or(LayoutError::MissingImageRef { index })?;
            if !Vec3::from_array(desc.position).is_finite() {
                return Err(LayoutError::NonFinite { index });
            }
            if desc.rotation.to_quat().is_none() {
                return Err(match desc.rotation {
                    Orientation::Euler(_) => LayoutError::NonFinite { index },
                    Orientation::Quaternion(_) => LayoutError::InvalidOrientation { index },
                });
            }
            let id = identify(image_ref, index);
            if let Some(&first) = seen.get(&id) {
                return Err(LayoutError::DuplicateId {
                    first,
                    second: index,
                    id,
                });
            }
            seen.insert(id, index);
        }
        Ok(())
    }

    /// Build items from a document already known to be valid.
    fn assemble(document: WallDocument) -> Self {
        let items: Vec<MediaItem> = document
            .items
            .iter()
            .enumerate()
            .map(|(index, desc)| {
                let image_ref = Self::image_ref(desc).unwrap_or_default().to_string();
                MediaItem {
                    index,
                    id: identify(&image_ref, index),
                    position: Vec3::from_array(desc.position),
                    rotation: desc.rotation.to_quat().unwrap_or(Quat::IDENTITY),
                    image_ref,
                }
            })
            .collect();
        let by_id = items.iter().map(|item| (item.id, item.index)).collect();
        Self {
            origin: Vec3::from_array(document.origin),
            items,
            by_id,
            document,
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self, LayoutError> {
        Self::from_document(serde_json::from_str(s)?)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, LayoutError> {
        Self::from_document(serde_yaml::from_str(s)?)
    }

    /// Load a descriptor file; `.yaml`/`.yml` is read as YAML, anything else as JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LayoutError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let layout = match DocumentFormat::from_path(path) {
            DocumentFormat::Yaml => Self::from_yaml_str(&data)?,
            DocumentFormat::Json => Self::from_json_str(&data)?,
        };
        tracing::info!(path = %path.display(), items = layout.len(), "loaded wall layout");
        Ok(layout)
    }

    /// Write the descriptor document back out, format chosen by extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), LayoutError> {
        let path = path.as_ref();
        let file = std::fs::File::create(path)?;
        match DocumentFormat::from_path(path) {
            DocumentFormat::Yaml => serde_yaml::to_writer(file, &self.document)?,
            DocumentFormat::Json => serde_json::to_writer_pretty(file, &self.document)?,
        }
        Ok(())
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&MediaItem> {
        self.items.get(index)
    }

    pub fn index_of(&self, id: ItemId) -> Option<usize> {
        self.by_id.get(&id).copied()
    }

    pub fn find(&self, id: ItemId) -> Option<&MediaItem> {
        self.index_of(id).map(|i| &self.items[i])
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Identifiers in wall order.
    pub fn ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.items.iter().map(|i| i.id)
    }

    /// World-space pose of the item at `index`.
    pub fn item_pose(&self, index: usize) -> Option<Pose> {
        self.items
            .get(index)
            .map(|item| Pose::new(self.origin + item.position, item.rotation))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// SHA-256 of the canonical JSON form of the document, hex encoded.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        match serde_json::to_vec(&self.document) {
            Ok(bytes) => hasher.update(&bytes),
            Err(e) => tracing::warn!("fingerprint serialization failed: {e}"),
        }
        hasher
            .finalize()
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect()
    }
}

pub fn crate_info() -> &'static str {
    "mediawall-layout v0.1.0"
}
