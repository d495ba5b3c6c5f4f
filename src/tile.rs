use crate::category::Category;
use crate::constants::TILE_SIZE;
use crate::data_tables::tile_data;
use crate::entity::Entity;
use crate::geometry::FloatRect;
use crate::render::TextureId;
use glam::Vec2;

/// Integer grid coordinate of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId {
    pub x: i32,
    pub y: i32,
}

impl TileId {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Grid cell containing a world position
    pub fn from_world(position: Vec2) -> Self {
        Self {
            x: (position.x / TILE_SIZE).floor() as i32,
            y: (position.y / TILE_SIZE).floor() as i32,
        }
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Top-left corner of the cell in world units
    pub fn world_origin(&self) -> Vec2 {
        Vec2::new(self.x as f32 * TILE_SIZE, self.y as f32 * TILE_SIZE)
    }

    /// Middle of the cell in world units
    pub fn world_center(&self) -> Vec2 {
        self.world_origin() + Vec2::splat(TILE_SIZE / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileType {
    /// Unused space outside rooms and corridors
    None,
    Floor,
    Wall,
    TunnelFloor,
    TunnelWall,
}

impl TileType {
    pub fn is_walkable(&self) -> bool {
        matches!(self, TileType::Floor | TileType::TunnelFloor)
    }

    pub fn category(&self) -> Category {
        match self {
            TileType::Floor | TileType::TunnelFloor => Category::FLOOR_TILE,
            TileType::Wall | TileType::TunnelWall => Category::WALL_TILE,
            TileType::None => Category::TILE,
        }
    }
}

/// A single grid cell. Its id never changes once created.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    id: TileId,
    tile_type: TileType,
    tileset_index: u32,
    entity: Entity,
}

impl Tile {
    pub fn new(id: TileId, tile_type: TileType) -> Self {
        let data = tile_data(tile_type);
        Self {
            id,
            tile_type,
            tileset_index: data.tileset_index,
            entity: Entity::new(data.hitpoints),
        }
    }

    pub fn id(&self) -> TileId {
        self.id
    }

    pub fn tile_type(&self) -> TileType {
        self.tile_type
    }

    pub fn tileset_index(&self) -> u32 {
        self.tileset_index
    }

    pub fn texture(&self) -> TextureId {
        tile_data(self.tile_type).texture
    }

    pub fn is_walkable(&self) -> bool {
        self.tile_type.is_walkable()
    }

    pub fn category(&self) -> Category {
        self.tile_type.category()
    }

    /// World bounds derived from the grid coordinate
    pub fn bounds(&self) -> FloatRect {
        let origin = self.id.world_origin();
        FloatRect::new(origin.x, origin.y, TILE_SIZE, TILE_SIZE)
    }

    /// Bounds relative to the tile's own origin, used when the tile is a scene node
    pub fn local_bounds(&self) -> FloatRect {
        FloatRect::new(0.0, 0.0, TILE_SIZE, TILE_SIZE)
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    pub fn is_marked_for_removal(&self) -> bool {
        self.entity.is_destroyed()
    }
}
