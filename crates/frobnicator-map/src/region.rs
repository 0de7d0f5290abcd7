//! Region: named rectangle used for containment tests and routing.

use rand::Rng;
use serde::{Deserialize, Serialize};

use frobnicator_core::enums::RegionKind;
use frobnicator_core::error::ContentError;
use frobnicator_core::types::{IVec2, Rect, Vec2};

/// A waypoint or spawnpoint. Immutable once the level is loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    pub kind: RegionKind,
    pub rect: Rect,
    /// Waypoint creeps head for after entering this region.
    pub next: Option<String>,
    /// Waypoint used instead of `next` every few entries (waypoints only).
    pub inner: Option<String>,
}

impl Region {
    /// Create a region, rejecting empty or inverted rectangles.
    pub fn new(
        name: impl Into<String>,
        kind: RegionKind,
        rect: Rect,
        next: Option<String>,
        inner: Option<String>,
    ) -> Result<Self, ContentError> {
        let name = name.into();
        if rect.w <= 0 || rect.h <= 0 {
            return Err(ContentError::InvalidRegion {
                name,
                w: rect.w,
                h: rect.h,
            });
        }
        Ok(Self {
            name,
            kind,
            rect,
            next,
            inner,
        })
    }

    /// Center point; this is where creeps routed to the region aim.
    pub fn middle(&self) -> Vec2 {
        self.rect.middle()
    }

    pub fn contains(&self, pos: Vec2, size: Vec2, fully_inside: bool) -> bool {
        self.rect.contains(pos, size, fully_inside)
    }

    /// Random top-left corner such that a box of `size` fits inside the
    /// region. Regions smaller than `size` yield their own corner.
    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R, size: IVec2) -> Vec2 {
        let span_x = (self.rect.w - size.x).max(1);
        let span_y = (self.rect.h - size.y).max(1);
        let rx = rng.gen_range(0..span_x);
        let ry = rng.gen_range(0..span_y);
        Vec2::new((self.rect.x + rx) as f32, (self.rect.y + ry) as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_rejects_degenerate_rect() {
        let err = Region::new(
            "flat",
            RegionKind::Waypoint,
            Rect::new(0, 0, 10, 0),
            None,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ContentError::InvalidRegion { h: 0, .. }));
    }

    #[test]
    fn test_random_point_fits_box() {
        let region = Region::new(
            "spawn",
            RegionKind::Spawnpoint,
            Rect::new(100, 200, 96, 64),
            None,
            None,
        )
        .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let size = Vec2::splat(48.0);
        for _ in 0..200 {
            let p = region.random_point(&mut rng, IVec2::splat(48));
            assert!(
                region.contains(p, size, true),
                "point {p} leaves the region"
            );
        }
    }

    #[test]
    fn test_random_point_in_small_region() {
        let region = Region::new(
            "tiny",
            RegionKind::Spawnpoint,
            Rect::new(5, 5, 10, 10),
            None,
            None,
        )
        .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(
            region.random_point(&mut rng, IVec2::splat(48)),
            Vec2::new(5.0, 5.0)
        );
    }
}
