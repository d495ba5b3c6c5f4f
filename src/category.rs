//! Scene node categories, used to dispatch commands and classify collisions.

use std::ops::{BitAnd, BitOr};

/// Bitmask tag carried by every scene node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Category(u32);

impl Category {
    pub const NONE: Category = Category(0);
    pub const SCENE_LAYER: Category = Category(1 << 0);
    pub const PLAYER_CHARACTER: Category = Category(1 << 1);
    pub const ALLIED_CHARACTER: Category = Category(1 << 2);
    pub const ENEMY_CHARACTER: Category = Category(1 << 3);
    pub const FLOOR_TILE: Category = Category(1 << 4);
    pub const WALL_TILE: Category = Category(1 << 5);
    pub const SOUND_EFFECT: Category = Category(1 << 6);
    pub const TILEMAP: Category = Category(1 << 7);

    pub const CHARACTER: Category = Category(
        Self::PLAYER_CHARACTER.0 | Self::ALLIED_CHARACTER.0 | Self::ENEMY_CHARACTER.0,
    );
    pub const TILE: Category = Category(Self::FLOOR_TILE.0 | Self::WALL_TILE.0);

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// At least one bit in common
    pub const fn intersects(self, other: Category) -> bool {
        self.0 & other.0 != 0
    }

    /// Every bit of `other` is set in `self`
    pub const fn contains(self, other: Category) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Category {
    type Output = Category;

    fn bitor(self, rhs: Category) -> Category {
        Category(self.0 | rhs.0)
    }
}

impl BitAnd for Category {
    type Output = Category;

    fn bitand(self, rhs: Category) -> Category {
        Category(self.0 & rhs.0)
    }
}
