use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

pub const GOLDEN_RATIO: f32 = 1.618_034;

/// Panel frame extents in item-local units. Panels stand on the item origin
/// and face +Z.
pub const PANEL_WIDTH: f32 = 1.0;
pub const PANEL_HEIGHT: f32 = GOLDEN_RATIO;
pub const PANEL_DEPTH: f32 = 0.05;

/// Rigid pose: position and orientation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Pose {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Map a point from this pose's local frame into the parent frame.
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation * local
    }

    /// Local -Z axis; the direction a camera with this pose looks along.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Angle in radians between the two orientations.
    pub fn angle_to(&self, other: &Pose) -> f32 {
        self.rotation.angle_between(other.rotation)
    }

    pub fn distance_to(&self, other: &Pose) -> f32 {
        self.position.distance(other.position)
    }
}

/// Linear RGB triple in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color(pub Vec3);

impl Color {
    pub const WHITE: Self = Self(Vec3::ONE);
    /// CSS `orange` (#ffa500).
    pub const ORANGE: Self = Self(Vec3::new(1.0, 0.647_058_84, 0.0));
    /// Panel backing (#151515).
    pub const FRAME: Self = Self(Vec3::new(0.082_352_94, 0.082_352_94, 0.082_352_94));

    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self(Vec3::new(r, g, b))
    }

    /// Parse `#rrggbb` or `rrggbb`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).ok().map(|v| v as f32 / 255.0)
        };
        Some(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn to_array(self, alpha: f32) -> [f32; 4] {
        [self.0.x, self.0.y, self.0.z, alpha]
    }

    pub fn distance(self, other: Color) -> f32 {
        self.0.distance(other.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}
