//! Room-and-corridor dungeon generation.
//!
//! Rooms are placed at random and rejected on overlap; each accepted room is
//! joined to the previously accepted one with an L-shaped corridor. A final
//! pass walls in any unused tile that touches walkable space.

use crate::constants::*;
use crate::geometry::Rect;
use crate::tile::{TileId, TileType};
use crate::tilemap::Tilemap;
use crate::utility::random_int;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How the map extent is chosen
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MapExtent {
    Fixed {
        width: i32,
        height: i32,
    },
    /// `base + step * factor` per axis, factor uniform in `[1, max_factor]`
    Random {
        base: i32,
        step: i32,
        max_factor: i32,
    },
}

impl MapExtent {
    /// Shortest and longest edge this extent can produce, `None` on overflow
    pub fn edge_range(&self) -> Option<(i32, i32)> {
        match *self {
            MapExtent::Fixed { width, height } => Some((width.min(height), width.max(height))),
            MapExtent::Random {
                base,
                step,
                max_factor,
            } => {
                let shortest = base.checked_add(step)?;
                let longest = step.checked_mul(max_factor)?.checked_add(base)?;
                Some((shortest.min(longest), shortest.max(longest)))
            }
        }
    }
}

impl Default for MapExtent {
    fn default() -> Self {
        MapExtent::Random {
            base: DUNGEON_BASE_SIZE,
            step: DUNGEON_SIZE_STEP,
            max_factor: DUNGEON_MAX_SCALE_FACTOR,
        }
    }
}

/// Tunables of a generation run
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub extent: MapExtent,
    /// Placement attempts; derived from the extent when absent
    pub max_rooms: Option<u32>,
    pub room_min_size: i32,
    pub room_max_size: i32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            extent: MapExtent::default(),
            max_rooms: None,
            room_min_size: DUNGEON_MIN_ROOM_SIZE,
            room_max_size: DUNGEON_MAX_ROOM_SIZE,
        }
    }
}

pub struct DungeonGenerator {
    tilemap: Tilemap,
}

impl DungeonGenerator {
    fn new(width: i32, height: i32) -> Self {
        // Fills the map so neighbour queries never hit an absent coordinate
        Self {
            tilemap: Tilemap::filled(width, height, TileType::None),
        }
    }

    /// Generate a tilemap. Fewer rooms than `max_rooms`, even none, is a valid result.
    pub fn generate(config: &GenerationConfig, rng: &mut impl Rng) -> Tilemap {
        puffin::profile_function!();

        let (width, height, factor_x, factor_y) = match config.extent {
            MapExtent::Fixed { width, height } => (width, height, 1, 1),
            MapExtent::Random {
                base,
                step,
                max_factor,
            } => {
                let factor_x = 1 + random_int(rng, max_factor);
                let factor_y = 1 + random_int(rng, max_factor);
                let edge = |factor: i32| step.saturating_mul(factor).saturating_add(base);
                (edge(factor_x), edge(factor_y), factor_x, factor_y)
            }
        };
        // Unvalidated extents are cut down to something buildable
        let width = width.clamp(0, DUNGEON_MAX_EXTENT);
        let height = height.clamp(0, DUNGEON_MAX_EXTENT);

        let max_rooms = config
            .max_rooms
            .unwrap_or_else(|| {
                let derived = width.max(height) / factor_x.min(factor_y).max(1);
                u32::try_from(derived).unwrap_or(0)
            })
            .min(DUNGEON_MAX_ROOM_ATTEMPTS);

        let mut generator = Self::new(width, height);
        let mut rooms: Vec<Rect> = Vec::new();

        for _ in 0..max_rooms {
            let Some(candidate) = generator.random_room(config, rng) else {
                continue;
            };

            // Overlapping candidates are dropped, not retried
            if rooms.iter().any(|room| room.intersects(&candidate)) {
                continue;
            }

            generator.carve_room(&candidate);
            if let Some(previous) = rooms.last() {
                generator.connect_rooms(previous, &candidate, rng);
            }
            generator.tilemap.push_room(candidate);
            rooms.push(candidate);
        }

        generator.enclose_walkable_space();

        debug!(
            width,
            height,
            max_rooms,
            rooms = rooms.len(),
            "dungeon_generated"
        );

        generator.tilemap
    }

    /// Random room that fits inside the map with the border margin, if any can
    fn random_room(&self, config: &GenerationConfig, rng: &mut impl Rng) -> Option<Rect> {
        if config.room_min_size < 1 || config.room_min_size > config.room_max_size {
            return None;
        }
        let room_width = rng.gen_range(config.room_min_size..=config.room_max_size);
        let room_height = rng.gen_range(config.room_min_size..=config.room_max_size);

        let max_x = self.tilemap.width() - room_width - DUNGEON_ROOM_MARGIN;
        let max_y = self.tilemap.height() - room_height - DUNGEON_ROOM_MARGIN;
        if max_x < DUNGEON_ROOM_MARGIN || max_y < DUNGEON_ROOM_MARGIN {
            return None;
        }

        let x = rng.gen_range(DUNGEON_ROOM_MARGIN..=max_x);
        let y = rng.gen_range(DUNGEON_ROOM_MARGIN..=max_y);
        Some(Rect::new(x, y, room_width, room_height))
    }

    fn set_tile(&mut self, x: i32, y: i32, tile_type: TileType) {
        let id = TileId::new(x, y);
        if self.tilemap.validate_tile(id) {
            self.tilemap.add_tile(id, tile_type);
        }
    }

    fn get_tile(&self, x: i32, y: i32) -> Option<TileType> {
        self.tilemap.tile_type(TileId::new(x, y))
    }

    fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.get_tile(x, y).is_some_and(|t| t.is_walkable())
    }

    /// Perimeter becomes wall, interior floor. Corridors already crossing the
    /// perimeter stay open so earlier connections survive.
    fn carve_room(&mut self, room: &Rect) {
        for x in room.x..room.x + room.width {
            for y in room.y..room.y + room.height {
                if room.is_perimeter(x, y) {
                    if !self.is_walkable(x, y) {
                        self.set_tile(x, y, TileType::Wall);
                    }
                } else {
                    self.set_tile(x, y, TileType::Floor);
                }
            }
        }
    }

    /// Connect two room centers with an L-shaped corridor.
    fn connect_rooms(&mut self, previous: &Rect, room: &Rect, rng: &mut impl Rng) {
        let (x1, y1) = previous.center();
        let (x2, y2) = room.center();

        // Randomly choose to go horizontal-then-vertical or vertical-then-horizontal
        if rng.gen_bool(0.5) {
            self.create_h_corridor(x1, x2, y1);
            self.create_v_corridor(y1, y2, x2);
        } else {
            self.create_v_corridor(y1, y2, x1);
            self.create_h_corridor(x1, x2, y2);
        }
    }

    fn create_h_corridor(&mut self, x1: i32, x2: i32, y: i32) {
        for x in x1.min(x2)..=x1.max(x2) {
            self.carve_corridor_tile(x, y);
            self.flank_corridor(x, y - 1);
            self.flank_corridor(x, y + 1);
        }
    }

    fn create_v_corridor(&mut self, y1: i32, y2: i32, x: i32) {
        for y in y1.min(y2)..=y1.max(y2) {
            self.carve_corridor_tile(x, y);
            self.flank_corridor(x - 1, y);
            self.flank_corridor(x + 1, y);
        }
    }

    fn carve_corridor_tile(&mut self, x: i32, y: i32) {
        // Room floors keep their type where a corridor passes through
        if !self.is_walkable(x, y) {
            self.set_tile(x, y, TileType::TunnelFloor);
        }
    }

    fn flank_corridor(&mut self, x: i32, y: i32) {
        if self.get_tile(x, y) == Some(TileType::None) {
            self.set_tile(x, y, TileType::TunnelWall);
        }
    }

    /// Turn unused tiles bordering walkable space into walls.
    fn enclose_walkable_space(&mut self) {
        let mut neighbours = Vec::new();
        let mut to_wall = Vec::new();

        for x in 0..self.tilemap.width() {
            for y in 0..self.tilemap.height() {
                let id = TileId::new(x, y);
                if self.tilemap.tile_type(id) != Some(TileType::None) {
                    continue;
                }

                neighbours.clear();
                self.tilemap.get_neighbours(id, &mut neighbours);
                let touches_walkable = neighbours
                    .iter()
                    .filter_map(|handle| self.tilemap.tile(*handle))
                    .any(|tile| tile.is_walkable());
                if touches_walkable {
                    to_wall.push(id);
                }
            }
        }

        for id in to_wall {
            self.tilemap.add_tile(id, TileType::Wall);
        }
    }
}
