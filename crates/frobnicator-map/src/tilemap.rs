//! Tilemap: grid of tiles with per-tile buildability.

use frobnicator_core::constants::TOWER_FOOTPRINT;
use frobnicator_core::error::ContentError;
use frobnicator_core::types::Vec2;

/// Row character marking a tile towers may be built on.
pub const BUILDABLE_TILE: char = '.';

/// Read-mostly tile grid. The only mutation is reserving tiles under a
/// newly placed building.
#[derive(Debug, Clone, PartialEq)]
pub struct Tilemap {
    /// Tile width in world units.
    tile_width: u32,
    /// Tile height in world units.
    tile_height: u32,
    /// Number of columns.
    width: u32,
    /// Number of rows.
    height: u32,
    /// Buildability, row-major.
    build: Vec<bool>,
}

impl Tilemap {
    /// Build from text rows, one character per tile. Every row must have
    /// the same width.
    pub fn from_rows<S: AsRef<str>>(
        tile_width: u32,
        tile_height: u32,
        rows: &[S],
    ) -> Result<Self, ContentError> {
        let Some(first) = rows.first() else {
            return Err(ContentError::EmptyTilemap);
        };
        let width = first.as_ref().chars().count();
        if width == 0 {
            return Err(ContentError::EmptyTilemap);
        }

        let mut build = Vec::with_capacity(width * rows.len());
        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let found = line.chars().count();
            if found != width {
                return Err(ContentError::RaggedTilemap {
                    row,
                    found,
                    expected: width,
                });
            }
            build.extend(line.chars().map(|c| c == BUILDABLE_TILE));
        }

        Ok(Self {
            tile_width,
            tile_height,
            width: width as u32,
            height: rows.len() as u32,
            build,
        })
    }

    pub fn tile_width(&self) -> u32 {
        self.tile_width
    }

    pub fn tile_height(&self) -> u32 {
        self.tile_height
    }

    /// Width in tiles.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in tiles.
    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Buildability of tile (x, y), or `None` outside the map.
    pub fn at(&self, x: u32, y: u32) -> Option<bool> {
        self.index(x, y).map(|i| self.build[i])
    }

    /// Out-of-map tiles are never buildable.
    pub fn is_buildable(&self, x: u32, y: u32) -> bool {
        self.at(x, y).unwrap_or(false)
    }

    /// Whether a building's footprint with its top-left tile at (x, y)
    /// lies entirely on buildable tiles.
    pub fn can_place(&self, x: u32, y: u32) -> bool {
        footprint(x, y).all(|(tx, ty)| self.is_buildable(tx, ty))
    }

    /// Mark the footprint at (x, y) as no longer buildable. Cells past the
    /// map edge are ignored.
    pub fn reserve(&mut self, x: u32, y: u32) {
        for (tx, ty) in footprint(x, y) {
            if let Some(i) = self.index(tx, ty) {
                self.build[i] = false;
            }
        }
    }

    /// Make a previously reserved footprint buildable again.
    pub fn release(&mut self, x: u32, y: u32) {
        for (tx, ty) in footprint(x, y) {
            if let Some(i) = self.index(tx, ty) {
                self.build[i] = true;
            }
        }
    }

    /// World position of a tile's top-left corner.
    pub fn tile_to_world(&self, x: u32, y: u32) -> Vec2 {
        Vec2::new(
            (x * self.tile_width) as f32,
            (y * self.tile_height) as f32,
        )
    }

    /// Tile containing a world position, or `None` outside the map.
    pub fn world_to_tile(&self, pos: Vec2) -> Option<(u32, u32)> {
        if pos.x < 0.0 || pos.y < 0.0 || self.tile_width == 0 || self.tile_height == 0 {
            return None;
        }
        let x = pos.x as u32 / self.tile_width;
        let y = pos.y as u32 / self.tile_height;
        self.index(x, y).map(|_| (x, y))
    }
}

fn footprint(x: u32, y: u32) -> impl Iterator<Item = (u32, u32)> {
    (0..TOWER_FOOTPRINT).flat_map(move |dy| {
        (0..TOWER_FOOTPRINT).map(move |dx| (x.saturating_add(dx), y.saturating_add(dy)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_map() -> Tilemap {
        Tilemap::from_rows(48, 48, &["...#", "...#", "####"]).unwrap()
    }

    #[test]
    fn test_dimensions_and_lookup() {
        let map = make_map();
        assert_eq!((map.width(), map.height()), (4, 3));
        assert_eq!(map.at(0, 0), Some(true));
        assert_eq!(map.at(3, 0), Some(false));
        assert_eq!(map.at(4, 0), None);
        assert_eq!(map.at(0, 3), None);
    }

    #[test]
    fn test_placement_at_far_edge_is_bounds_checked() {
        let map = make_map();
        assert!(map.can_place(0, 0));
        assert!(map.can_place(1, 0));
        // Third column is fine, fourth is scenery.
        assert!(!map.can_place(2, 0));
        // Bottom row would spill off the map.
        assert!(!map.can_place(0, 2));
        assert!(!map.can_place(u32::MAX, u32::MAX));
    }

    #[test]
    fn test_reserve_blocks_footprint() {
        let mut map = make_map();
        map.reserve(0, 0);
        assert_eq!(map.at(0, 0), Some(false));
        assert_eq!(map.at(1, 1), Some(false));
        assert_eq!(map.at(2, 0), Some(true));
        assert!(!map.can_place(1, 0));

        // Reserving over the edge touches only cells that exist.
        map.reserve(3, 2);
        assert_eq!(map.at(3, 2), Some(false));

        map.release(0, 0);
        assert!(map.can_place(0, 0));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = Tilemap::from_rows(48, 48, &["...", ".."]).unwrap_err();
        assert!(matches!(
            err,
            ContentError::RaggedTilemap {
                row: 1,
                found: 2,
                expected: 3
            }
        ));
        let empty: [&str; 0] = [];
        assert!(matches!(
            Tilemap::from_rows(48, 48, &empty),
            Err(ContentError::EmptyTilemap)
        ));
    }

    #[test]
    fn test_world_tile_conversion() {
        let map = make_map();
        assert_eq!(map.tile_to_world(2, 1), Vec2::new(96.0, 48.0));
        assert_eq!(map.world_to_tile(Vec2::new(100.0, 50.0)), Some((2, 1)));
        assert_eq!(map.world_to_tile(Vec2::new(-1.0, 0.0)), None);
        assert_eq!(map.world_to_tile(Vec2::new(192.0, 0.0)), None);
    }
}
