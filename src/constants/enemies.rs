//! Enemy stats constants.

// SKELETON
/// Skeleton hitpoints
pub const SKELETON_HEALTH: i32 = 10;
/// Skeleton maximum speed (world units per second)
pub const SKELETON_SPEED: f32 = 60.0;
/// Skeleton collision box edge
pub const SKELETON_HITBOX: f32 = 12.0;
/// Length of each leg of the skeleton's square patrol
pub const SKELETON_PATROL_DISTANCE: f32 = 48.0;

// RAT
/// Rat hitpoints (weak)
pub const RAT_HEALTH: i32 = 4;
/// Rat maximum speed (fast)
pub const RAT_SPEED: f32 = 90.0;
/// Rat collision box edge
pub const RAT_HITBOX: f32 = 8.0;
/// Distance the rat paces before turning around
pub const RAT_PATROL_DISTANCE: f32 = 32.0;
