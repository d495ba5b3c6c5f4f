//! Static per-type data for characters and tiles.
//!
//! Keeps stats, hitboxes and sprite lookups out of the entity code so new
//! character or tile types only need a table entry.

use crate::character::CharacterType;
use crate::constants::*;
use crate::geometry::Rect;
use crate::render::TextureId;
use crate::tile::TileType;
use glam::Vec2;

/// One leg of a scripted movement pattern
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Direction {
    /// Heading in degrees; 0 walks down the screen, 90 walks left
    pub angle: f32,
    /// World units to travel before switching to the next leg
    pub distance: f32,
}

impl Direction {
    pub const fn new(angle: f32, distance: f32) -> Self {
        Self { angle, distance }
    }
}

/// Everything needed to build a character of a given type
#[derive(Debug, Clone, Copy)]
pub struct CharacterData {
    pub hitpoints: i32,
    pub speed: f32,
    /// Collision box, centered on the character's origin
    pub hitbox: Vec2,
    pub texture: TextureId,
    pub texture_rect: Rect,
    /// Cycled patrol pattern; empty for input-driven characters
    pub directions: &'static [Direction],
    /// Sprite sheet has left/right idle frames next to the base frame
    pub has_idle_animation: bool,
}

/// Sprite lookup and durability of a tile type
#[derive(Debug, Clone, Copy)]
pub struct TileData {
    pub texture: TextureId,
    pub tileset_index: u32,
    pub hitpoints: i32,
}

pub const PLAYER: CharacterData = CharacterData {
    hitpoints: PLAYER_STARTING_HEALTH,
    speed: PLAYER_SPEED,
    hitbox: Vec2::new(PLAYER_HITBOX, PLAYER_HITBOX),
    texture: TextureId::Characters,
    texture_rect: Rect::new(2, 0, 22, 24),
    directions: &[],
    has_idle_animation: false,
};

pub const SKELETON: CharacterData = CharacterData {
    hitpoints: SKELETON_HEALTH,
    speed: SKELETON_SPEED,
    hitbox: Vec2::new(SKELETON_HITBOX, SKELETON_HITBOX),
    texture: TextureId::Characters,
    texture_rect: Rect::new(0, 24, 16, 16),
    directions: &[
        Direction::new(0.0, SKELETON_PATROL_DISTANCE),
        Direction::new(90.0, SKELETON_PATROL_DISTANCE),
        Direction::new(180.0, SKELETON_PATROL_DISTANCE),
        Direction::new(270.0, SKELETON_PATROL_DISTANCE),
    ],
    has_idle_animation: true,
};

pub const RAT: CharacterData = CharacterData {
    hitpoints: RAT_HEALTH,
    speed: RAT_SPEED,
    hitbox: Vec2::new(RAT_HITBOX, RAT_HITBOX),
    texture: TextureId::Characters,
    texture_rect: Rect::new(0, 40, 16, 16),
    directions: &[
        Direction::new(-90.0, RAT_PATROL_DISTANCE),
        Direction::new(90.0, RAT_PATROL_DISTANCE),
    ],
    has_idle_animation: true,
};

pub fn character_data(kind: CharacterType) -> &'static CharacterData {
    match kind {
        CharacterType::Player => &PLAYER,
        CharacterType::Skeleton => &SKELETON,
        CharacterType::Rat => &RAT,
    }
}

pub fn tile_data(tile_type: TileType) -> TileData {
    let (tileset_index, hitpoints) = match tile_type {
        TileType::None => (0, 0),
        TileType::Floor => (1, 1),
        TileType::Wall => (2, 100),
        TileType::TunnelFloor => (3, 1),
        TileType::TunnelWall => (4, 100),
    };

    TileData {
        texture: TextureId::Tiles,
        tileset_index,
        hitpoints,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_monsters_patrol() {
        assert!(character_data(CharacterType::Player).directions.is_empty());
        assert_eq!(character_data(CharacterType::Skeleton).directions.len(), 4);
        assert_eq!(character_data(CharacterType::Rat).directions.len(), 2);
    }

    #[test]
    fn test_tiles_use_distinct_tileset_indices() {
        let types = [
            TileType::None,
            TileType::Floor,
            TileType::Wall,
            TileType::TunnelFloor,
            TileType::TunnelWall,
        ];
        let mut indices: Vec<u32> = types.iter().map(|t| tile_data(*t).tileset_index).collect();
        indices.sort_unstable();
        indices.dedup();
        assert_eq!(indices.len(), types.len());
    }
}
