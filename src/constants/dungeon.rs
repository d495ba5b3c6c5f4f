//! Dungeon generation constants.

/// Edge length of a single tile, in world units (pixels)
pub const TILE_SIZE: f32 = 16.0;
/// Base map extent before the random scale factor is applied
pub const DUNGEON_BASE_SIZE: i32 = 10;
/// Tiles added to the extent per unit of scale factor
pub const DUNGEON_SIZE_STEP: i32 = 10;
/// Upper bound of the per-axis random scale factor (inclusive)
pub const DUNGEON_MAX_SCALE_FACTOR: i32 = 10;
/// Smallest room edge, perimeter walls included
pub const DUNGEON_MIN_ROOM_SIZE: i32 = 3;
/// Largest room edge, perimeter walls included
pub const DUNGEON_MAX_ROOM_SIZE: i32 = 10;
/// Empty tiles kept between a room and the map border
pub const DUNGEON_ROOM_MARGIN: i32 = 1;
/// Generation runs attempted before giving up on finding a spawn room
pub const DUNGEON_GENERATION_ATTEMPTS: u32 = 8;
/// Largest map edge a generation run will build
pub const DUNGEON_MAX_EXTENT: i32 = 512;
/// Upper bound on room placement attempts per run
pub const DUNGEON_MAX_ROOM_ATTEMPTS: u32 = 10_000;
