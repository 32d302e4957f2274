use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Domain tag mixed into every identifier hash so wall ids never coincide
/// with other SHA-256 derived handles.
const ID_DOMAIN: &[u8] = b"mediawall.item.v1";

/// Stable identifier of a wall item.
///
/// Derived from the item's image reference and its index in the wall, so the
/// same layout always produces the same ids and they can be round-tripped
/// through navigation state as plain strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub Uuid);

impl ItemId {
    /// Parse an identifier from its hyphenated string form.
    ///
    /// Returns `None` for anything that is not a well-formed identifier.
    pub fn parse(s: &str) -> Option<Self> {
        Uuid::try_parse(s.trim()).ok().map(Self)
    }

    /// Caption shown next to the panel: the identifier with dashes as spaces.
    pub fn caption(&self) -> String {
        self.to_string().replace('-', " ")
    }

    /// Short prefix for logs.
    pub fn short(&self) -> String {
        self.to_string()[..8].to_string()
    }

    /// Deterministic value in `[0, 1)` derived from the identifier.
    pub fn unit_phase(&self) -> f32 {
        let b = self.0.as_bytes();
        let word = u32::from_le_bytes([b[12], b[13], b[14], b[15]]);
        (word as f64 / (u32::MAX as f64 + 1.0)) as f32
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for ItemId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::try_parse(s.trim()).map(Self)
    }
}

/// Compute the identifier of the item at `index` showing `image_ref`.
///
/// Pure: no randomness, no clock. The image reference is length-prefixed so
/// `("a1", 1)` and `("a", 11)` hash different inputs.
pub fn identify(image_ref: &str, index: usize) -> ItemId {
    let mut hasher = Sha256::new();
    hasher.update(ID_DOMAIN);
    hasher.update((image_ref.len() as u64).to_le_bytes());
    hasher.update(image_ref.as_bytes());
    hasher.update((index as u64).to_le_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest[..16]);
    ItemId(Uuid::new_v8(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn identify_is_deterministic() {
        let a = identify("/assets/1.jpg", 0);
        let b = identify("/assets/1.jpg", 0);
        assert_eq!(a, b);
        assert_eq!(a.to_string(), b.to_string());
    }

    #[test]
    fn index_participates_in_identity() {
        let a = identify("/assets/1.jpg", 0);
        let b = identify("/assets/1.jpg", 1);
        assert_ne!(a, b);
    }

    #[test]
    fn concatenation_ambiguity_is_avoided() {
        assert_ne!(identify("a1", 1), identify("a", 11));
    }

    #[test]
    fn many_items_do_not_collide() {
        let ids: BTreeSet<ItemId> = (0..1000).map(|i| identify("same.jpg", i)).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn string_round_trip() {
        let id = identify("/assets/main.jpg", 8);
        let s = id.to_string();
        assert_eq!(ItemId::parse(&s), Some(id));
        assert_eq!(s.parse::<ItemId>().ok(), Some(id));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(ItemId::parse("").is_none());
        assert!(ItemId::parse("not-an-id").is_none());
    }

    #[test]
    fn caption_replaces_dashes() {
        let id = identify("x.jpg", 0);
        let caption = id.caption();
        assert!(!caption.contains('-'));
        assert_eq!(caption.split(' ').count(), 5);
    }

    #[test]
    fn unit_phase_in_range() {
        for i in 0..64 {
            let p = identify("p.jpg", i).unit_phase();
            assert!((0.0..1.0).contains(&p));
        }
    }
}
