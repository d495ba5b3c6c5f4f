//! Rectangles and 2D transforms.

use glam::{Affine2, Vec2};

/// An integer rectangle in grid space (rooms, texture rects)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Check if a point is inside this rectangle
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    /// True when the two rectangles share at least one cell. Touching edges don't count.
    pub fn intersects(&self, other: &Rect) -> bool {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = (self.x + self.width).min(other.x + other.width);
        let bottom = (self.y + self.height).min(other.y + other.height);
        left < right && top < bottom
    }

    /// Whether (x, y) lies on the outermost ring of the rectangle
    pub fn is_perimeter(&self, x: i32, y: i32) -> bool {
        self.contains(x, y)
            && (x == self.x
                || y == self.y
                || x == self.x + self.width - 1
                || y == self.y + self.height - 1)
    }
}

/// An axis-aligned rectangle in world space
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FloatRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl FloatRect {
    pub const EMPTY: FloatRect = FloatRect {
        left: 0.0,
        top: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Rectangle of `size` centered on `center`
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self::new(center.x - size.x / 2.0, center.y - size.y / 2.0, size.x, size.y)
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left && point.x < self.right() && point.y >= self.top && point.y < self.bottom()
    }

    /// Strict overlap test; rectangles that only touch do not intersect
    pub fn intersects(&self, other: &FloatRect) -> bool {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        left < right && top < bottom
    }

    /// Axis-aligned bounds of this rectangle after applying `transform`
    pub fn transformed(&self, transform: &Affine2) -> FloatRect {
        let corners = [
            transform.transform_point2(Vec2::new(self.left, self.top)),
            transform.transform_point2(Vec2::new(self.right(), self.top)),
            transform.transform_point2(Vec2::new(self.left, self.bottom())),
            transform.transform_point2(Vec2::new(self.right(), self.bottom())),
        ];

        let mut min = corners[0];
        let mut max = corners[0];
        for corner in &corners[1..] {
            min = min.min(*corner);
            max = max.max(*corner);
        }

        FloatRect::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }
}

/// Local transform of a scene node: translate, then rotate, then scale
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    /// Rotation in degrees
    pub rotation: f32,
    pub scale: Vec2,
}

impl Transform {
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn to_affine(&self) -> Affine2 {
        Affine2::from_scale_angle_translation(self.scale, self.rotation.to_radians(), self.position)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
        }
    }
}
