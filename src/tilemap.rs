//! Grid-keyed tile storage with neighbour and room queries.
//!
//! Tiles live in slots keyed by their grid coordinate. Lookups hand out
//! [`TileHandle`]s carrying the slot generation, so a handle taken before
//! [`Tilemap::add_tile`] overwrote its coordinate resolves to `None` instead
//! of silently pointing at the replacement.

use std::collections::HashMap;

use crate::constants::TILE_SIZE;
use crate::geometry::{FloatRect, Rect};
use crate::tile::{Tile, TileId, TileType};
use crate::utility::random_int;
use glam::Vec2;
use rand::Rng;

/// Neighbour scan order: west column top to bottom, then above/below, then east column
const NEIGHBOUR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Reference to a tile at the time it was looked up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileHandle {
    pub id: TileId,
    generation: u32,
}

#[derive(Debug, Clone)]
struct TileSlot {
    generation: u32,
    tile: Tile,
}

#[derive(Debug, Clone)]
pub struct Tilemap {
    width: i32,
    height: i32,
    map: HashMap<TileId, TileSlot>,
    rooms: Vec<Rect>,
    next_generation: u32,
}

impl Tilemap {
    /// Empty map of the given extent. Nothing is present until added.
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            map: HashMap::new(),
            rooms: Vec::new(),
            next_generation: 0,
        }
    }

    /// Map of the given extent with every coordinate set to `fill`
    pub fn filled(width: i32, height: i32, fill: TileType) -> Self {
        let mut tilemap = Self::new(width, height);
        for x in 0..width {
            for y in 0..height {
                tilemap.add_tile(TileId::new(x, y), fill);
            }
        }
        tilemap
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    /// World-space extent of the whole map (local to the tilemap node)
    pub fn bounds(&self) -> FloatRect {
        FloatRect::new(
            0.0,
            0.0,
            self.width as f32 * TILE_SIZE,
            self.height as f32 * TILE_SIZE,
        )
    }

    pub fn rooms(&self) -> &[Rect] {
        &self.rooms
    }

    /// Register a room rectangle. Its tiles are expected to be present already.
    pub fn push_room(&mut self, room: Rect) {
        self.rooms.push(room);
    }

    /// Insert or replace the tile at `id`. A replaced tile's old handles go stale.
    pub fn add_tile(&mut self, id: TileId, tile_type: TileType) {
        // Evict first so the old slot can never be confused with the new one
        self.map.remove(&id);

        let generation = self.next_generation;
        self.next_generation = self.next_generation.wrapping_add(1);
        self.map.insert(
            id,
            TileSlot {
                generation,
                tile: Tile::new(id, tile_type),
            },
        );
    }

    /// Inside the extent and present in the map
    pub fn validate_tile(&self, id: TileId) -> bool {
        id.x >= 0
            && id.x < self.width
            && id.y >= 0
            && id.y < self.height
            && self.map.contains_key(&id)
    }

    pub fn get_tile(&self, id: TileId) -> Option<TileHandle> {
        if !self.validate_tile(id) {
            return None;
        }
        self.map.get(&id).map(|slot| TileHandle {
            id,
            generation: slot.generation,
        })
    }

    pub fn get_tile_at(&self, position: Vec2) -> Option<TileHandle> {
        self.get_tile(TileId::from_world(position))
    }

    /// Resolve a handle. `None` if the coordinate was overwritten since the lookup.
    pub fn tile(&self, handle: TileHandle) -> Option<&Tile> {
        self.map
            .get(&handle.id)
            .filter(|slot| slot.generation == handle.generation)
            .map(|slot| &slot.tile)
    }

    /// Shortcut for `get_tile` + `tile`
    pub fn tile_at(&self, id: TileId) -> Option<&Tile> {
        if !self.validate_tile(id) {
            return None;
        }
        self.map.get(&id).map(|slot| &slot.tile)
    }

    pub fn tile_type(&self, id: TileId) -> Option<TileType> {
        self.tile_at(id).map(|tile| tile.tile_type())
    }

    pub fn is_walkable(&self, id: TileId) -> bool {
        self.tile_at(id).is_some_and(|tile| tile.is_walkable())
    }

    /// Append the valid 8-connected neighbours of `id`, never `id` itself
    pub fn get_neighbours(&self, id: TileId, neighbours: &mut Vec<TileHandle>) {
        for (dx, dy) in NEIGHBOUR_OFFSETS {
            if let Some(handle) = self.get_tile(id.offset(dx, dy)) {
                neighbours.push(handle);
            }
        }
    }

    pub fn get_neighbours_at(&self, position: Vec2, neighbours: &mut Vec<TileHandle>) {
        self.get_neighbours(TileId::from_world(position), neighbours);
    }

    /// Append every tile of the room containing `id`
    pub fn get_room(&self, id: TileId, tiles: &mut Vec<TileHandle>) {
        if !self.validate_tile(id) {
            return;
        }

        // Rooms never overlap, so the first match is the only one
        let Some(room) = self.rooms.iter().find(|room| room.contains(id.x, id.y)) else {
            return;
        };

        for x in room.x..room.x + room.width {
            for y in room.y..room.y + room.height {
                if let Some(handle) = self.get_tile(TileId::new(x, y)) {
                    tiles.push(handle);
                }
            }
        }
    }

    pub fn get_room_at(&self, position: Vec2, tiles: &mut Vec<TileHandle>) {
        self.get_room(TileId::from_world(position), tiles);
    }

    /// Center of a uniformly chosen room, or `None` if no room was generated
    pub fn get_random_room_center(&self, rng: &mut impl Rng) -> Option<TileId> {
        if self.rooms.is_empty() {
            return None;
        }
        let index = random_int(rng, self.rooms.len() as i32) as usize;
        let (x, y) = self.rooms[index].center();
        Some(TileId::new(x, y))
    }

    /// Every present tile, in no particular order
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.map.values().map(|slot| &slot.tile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_get_tile_inside_and_outside_extent() {
        let tilemap = Tilemap::filled(10, 8, TileType::Floor);
        assert!(tilemap.get_tile(TileId::new(0, 0)).is_some());
        assert!(tilemap.get_tile(TileId::new(9, 7)).is_some());
        assert!(tilemap.get_tile(TileId::new(10, 0)).is_none());
        assert!(tilemap.get_tile(TileId::new(0, 8)).is_none());
        assert!(tilemap.get_tile(TileId::new(-1, 3)).is_none());
    }

    #[test]
    fn test_absent_coordinate_fails_validation() {
        let mut tilemap = Tilemap::new(4, 4);
        assert!(!tilemap.validate_tile(TileId::new(1, 1)));
        tilemap.add_tile(TileId::new(1, 1), TileType::Wall);
        assert!(tilemap.validate_tile(TileId::new(1, 1)));
    }

    #[test]
    fn test_add_tile_outside_extent_is_not_reachable() {
        let mut tilemap = Tilemap::new(4, 4);
        tilemap.add_tile(TileId::new(5, 5), TileType::Floor);
        assert!(tilemap.get_tile(TileId::new(5, 5)).is_none());
    }

    #[test]
    fn test_get_tile_at_world_position() {
        let tilemap = Tilemap::filled(10, 10, TileType::Floor);
        let handle = tilemap.get_tile_at(Vec2::new(40.0, 20.0)).expect("tile");
        assert_eq!(handle.id, TileId::new(2, 1));
        assert!(tilemap.get_tile_at(Vec2::new(-3.0, 20.0)).is_none());
    }

    #[test]
    fn test_overwrite_makes_old_handle_stale() {
        let mut tilemap = Tilemap::filled(4, 4, TileType::None);
        let id = TileId::new(2, 2);
        let old = tilemap.get_tile(id).expect("tile");
        assert_eq!(tilemap.tile(old).map(|t| t.tile_type()), Some(TileType::None));

        tilemap.add_tile(id, TileType::Floor);
        assert!(tilemap.tile(old).is_none());

        let fresh = tilemap.get_tile(id).expect("tile");
        assert_eq!(tilemap.tile(fresh).map(|t| t.tile_type()), Some(TileType::Floor));
        assert_eq!(tilemap.tiles().count(), 16);
    }

    #[test]
    fn test_neighbours_exclude_self_and_respect_edges() {
        let tilemap = Tilemap::filled(5, 5, TileType::Floor);

        let mut neighbours = Vec::new();
        tilemap.get_neighbours(TileId::new(2, 2), &mut neighbours);
        assert_eq!(neighbours.len(), 8);
        assert!(neighbours.iter().all(|h| h.id != TileId::new(2, 2)));

        neighbours.clear();
        tilemap.get_neighbours(TileId::new(0, 0), &mut neighbours);
        assert_eq!(neighbours.len(), 3);

        neighbours.clear();
        tilemap.get_neighbours(TileId::new(4, 2), &mut neighbours);
        assert_eq!(neighbours.len(), 5);
    }

    #[test]
    fn test_neighbour_scan_order_is_fixed() {
        let tilemap = Tilemap::filled(3, 3, TileType::Floor);
        let mut neighbours = Vec::new();
        tilemap.get_neighbours(TileId::new(1, 1), &mut neighbours);
        let ids: Vec<TileId> = neighbours.iter().map(|h| h.id).collect();
        assert_eq!(
            ids,
            vec![
                TileId::new(0, 0),
                TileId::new(0, 1),
                TileId::new(0, 2),
                TileId::new(1, 0),
                TileId::new(1, 2),
                TileId::new(2, 0),
                TileId::new(2, 1),
                TileId::new(2, 2),
            ]
        );
    }

    #[test]
    fn test_get_room_returns_room_tiles() {
        let mut tilemap = Tilemap::filled(10, 10, TileType::None);
        tilemap.push_room(Rect::new(2, 2, 3, 4));

        let mut tiles = Vec::new();
        tilemap.get_room(TileId::new(3, 3), &mut tiles);
        assert_eq!(tiles.len(), 12);

        tiles.clear();
        tilemap.get_room(TileId::new(8, 8), &mut tiles);
        assert!(tiles.is_empty());

        tiles.clear();
        tilemap.get_room(TileId::new(50, 50), &mut tiles);
        assert!(tiles.is_empty());
    }

    #[test]
    fn test_random_room_center() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut tilemap = Tilemap::filled(20, 20, TileType::None);
        assert!(tilemap.get_random_room_center(&mut rng).is_none());

        tilemap.push_room(Rect::new(2, 2, 4, 4));
        tilemap.push_room(Rect::new(10, 10, 6, 4));
        for _ in 0..20 {
            let center = tilemap.get_random_room_center(&mut rng).expect("center");
            assert!(center == TileId::new(4, 4) || center == TileId::new(13, 12));
        }
    }
}
