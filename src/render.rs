//! Renderer-facing interface.
//!
//! The core never touches a graphics API. Each frame it tells a [`Renderer`]
//! which view to use and hands over every visible node with its accumulated
//! world transform.

use crate::character::Character;
use crate::constants::TILE_SIZE;
use crate::geometry::FloatRect;
use crate::tile::Tile;
use crate::tilemap::Tilemap;
use glam::{Affine2, Vec2};

/// Opaque texture handle resolved by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureId {
    Characters,
    Tiles,
}

/// The visual part of a scene node
#[derive(Debug, Clone, Copy)]
pub enum Drawable<'a> {
    Character(&'a Character),
    Tile(&'a Tile),
    Tilemap(&'a Tilemap),
}

pub trait Renderer {
    fn set_view(&mut self, view: &View);

    /// Draw one node at its world transform
    fn draw(&mut self, drawable: Drawable<'_>, transform: &Affine2);
}

/// Camera rectangle in world units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    pub center: Vec2,
    pub size: Vec2,
}

impl View {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self { center, size }
    }

    /// View showing `visible_tiles` tiles across the shorter viewport axis,
    /// keeping the viewport's aspect ratio
    pub fn for_viewport(viewport: Vec2, visible_tiles: f32) -> Self {
        let span = visible_tiles * TILE_SIZE;
        let shorter = viewport.x.min(viewport.y).max(1.0);
        let size = viewport / shorter * span;
        Self::new(size / 2.0, size)
    }

    pub fn bounds(&self) -> FloatRect {
        FloatRect::centered(self.center, self.size)
    }
}
