//! Core gameplay constants (player stats, spawning).

/// Player's starting hitpoints
pub const PLAYER_STARTING_HEALTH: i32 = 100;
/// Player's maximum speed in world units per second
pub const PLAYER_SPEED: f32 = 200.0;
/// Player's collision box edge
pub const PLAYER_HITBOX: f32 = 12.0;

/// Enemies spawned in a freshly generated dungeon
pub const DEFAULT_ENEMY_COUNT: usize = 4;

/// Fixed timestep used by the headless driver (seconds)
pub const FRAME_TIME: f32 = 1.0 / 60.0;
/// Frames simulated by the headless driver
pub const HEADLESS_FRAME_COUNT: u32 = 600;
