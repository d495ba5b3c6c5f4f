//! Camera and view constants.

/// Default viewport width in pixels
pub const VIEWPORT_DEFAULT_WIDTH: f32 = 1024.0;
/// Default viewport height in pixels
pub const VIEWPORT_DEFAULT_HEIGHT: f32 = 768.0;
/// Tiles visible along the shorter viewport axis
pub const VIEW_VISIBLE_TILES: f32 = 10.0;
