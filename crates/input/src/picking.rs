use glam::Vec3;
use mediawall_common::{ItemId, PANEL_DEPTH, PANEL_HEIGHT, PANEL_WIDTH};
use mediawall_layout::WallLayout;

/// World-space ray with a normalized direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    /// Returns `None` when `dir` has no usable length.
    pub fn new(origin: Vec3, dir: Vec3) -> Option<Self> {
        let dir = dir.try_normalize()?;
        Some(Self { origin, dir })
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    pub id: ItemId,
    pub index: usize,
    pub distance: f32,
    pub point: Vec3,
}

/// Nearest panel hit along `ray`.
///
/// Each panel's hit region is its frame box: `PANEL_WIDTH x PANEL_HEIGHT x
/// PANEL_DEPTH`, standing on the item origin. Equal distances resolve to the
/// lower index.
pub fn pick(layout: &WallLayout, ray: Ray) -> Option<PickHit> {
    let half = Vec3::new(PANEL_WIDTH, PANEL_HEIGHT, PANEL_DEPTH) * 0.5;
    let center = Vec3::new(0.0, PANEL_HEIGHT * 0.5, 0.0);

    let mut best: Option<PickHit> = None;
    for item in layout.items() {
        let Some(pose) = layout.item_pose(item.index) else {
            continue;
        };
        let inv = pose.rotation.inverse();
        let local_origin = inv * (ray.origin - pose.position) - center;
        let local_dir = inv * ray.dir;

        let Some(t) = ray_box_hit_t(local_origin, local_dir, half) else {
            continue;
        };
        if best.is_none_or(|b| t < b.distance) {
            best = Some(PickHit {
                id: item.id,
                index: item.index,
                distance: t,
                point: ray.at(t),
            });
        }
    }

    if let Some(hit) = &best {
        tracing::trace!(index = hit.index, distance = hit.distance, "pick hit");
    }
    best
}

/// Slab test against an origin-centred box. Returns the entry distance, or
/// the exit distance when the ray starts inside.
fn ray_box_hit_t(origin: Vec3, dir: Vec3, half: Vec3) -> Option<f32> {
    let mut t_min = 0.0_f32;
    let mut t_max = f32::INFINITY;
    for axis in 0..3 {
        let o = origin[axis];
        let d = dir[axis];
        let h = half[axis];
        if d.abs() < 1e-8 {
            if o < -h || o > h {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let mut t0 = (-h - o) * inv;
        let mut t1 = (h - o) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_min = t_min.max(t0);
        t_max = t_max.min(t1);
        if t_min > t_max {
            return None;
        }
    }
    Some(t_min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediawall_layout::{ItemDescriptor, Orientation, WallDocument};

    fn two_panels() -> WallLayout {
        WallLayout::from_document(WallDocument {
            origin: [0.0, 0.0, 0.0],
            items: vec![
                ItemDescriptor {
                    position: [0.0, 0.0, 0.0],
                    rotation: Orientation::default(),
                    image: Some("a.jpg".into()),
                },
                ItemDescriptor {
                    position: [3.0, 0.0, 0.0],
                    rotation: Orientation::Euler([0.0, std::f32::consts::FRAC_PI_2, 0.0]),
                    image: Some("b.jpg".into()),
                },
            ],
        })
        .unwrap()
    }

    #[test]
    fn ray_rejects_zero_direction() {
        assert!(Ray::new(Vec3::ZERO, Vec3::ZERO).is_none());
    }

    #[test]
    fn hit_front_panel() {
        let layout = two_panels();
        let ray = Ray::new(Vec3::new(0.0, 0.8, 5.0), Vec3::NEG_Z).unwrap();
        let hit = pick(&layout, ray).unwrap();
        assert_eq!(hit.index, 0);
        assert!((hit.distance - (5.0 - PANEL_DEPTH * 0.5)).abs() < 1e-4);
    }

    #[test]
    fn miss_above_panels() {
        let layout = two_panels();
        let ray = Ray::new(Vec3::new(0.0, 5.0, 5.0), Vec3::NEG_Z).unwrap();
        assert!(pick(&layout, ray).is_none());
    }

    #[test]
    fn rotated_panel_is_thin_along_world_x() {
        let layout = two_panels();
        // Panel 1 faces +X, so a ray along -X hits its face.
        let ray = Ray::new(Vec3::new(10.0, 0.8, 0.0), Vec3::NEG_X).unwrap();
        let hit = pick(&layout, ray).unwrap();
        assert_eq!(hit.index, 1);
        assert!((hit.distance - (7.0 - PANEL_DEPTH * 0.5)).abs() < 1e-4);
        // Offset 0.3 along world Z is inside the 1.0 wide face.
        let ray = Ray::new(Vec3::new(10.0, 0.8, 0.3), Vec3::NEG_X).unwrap();
        assert_eq!(pick(&layout, ray).map(|h| h.index), Some(1));
    }

    #[test]
    fn nearest_hit_wins() {
        let layout = two_panels();
        // Travelling -X at z=0 passes panel 1 first, then panel 0.
        let ray = Ray::new(Vec3::new(10.0, 0.8, 0.0), Vec3::NEG_X).unwrap();
        assert_eq!(pick(&layout, ray).map(|h| h.index), Some(1));
        let ray = Ray::new(Vec3::new(-10.0, 0.8, 0.0), Vec3::X).unwrap();
        assert_eq!(pick(&layout, ray).map(|h| h.index), Some(0));
    }

    #[test]
    fn demo_centre_panel_is_pickable_from_overview() {
        let layout = WallLayout::demo();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.5), Vec3::new(0.0, 0.0, -1.0)).unwrap();
        let hit = pick(&layout, ray).unwrap();
        assert_eq!(hit.index, 0);
    }
}
