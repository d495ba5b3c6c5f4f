//! Base lifecycle shared by everything in the scene that can move or take damage.

use crate::geometry::Transform;
use glam::Vec2;

/// Hitpoints, destroyed flag and velocity.
///
/// `destroyed` is monotonic: once set, damage and repair are ignored and
/// movement is suppressed until the owning node is swept from the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    hitpoints: i32,
    destroyed: bool,
    velocity: Vec2,
}

impl Entity {
    pub fn new(hitpoints: i32) -> Self {
        Self {
            hitpoints,
            destroyed: false,
            velocity: Vec2::ZERO,
        }
    }

    pub fn hitpoints(&self) -> i32 {
        self.hitpoints
    }

    pub fn repair(&mut self, points: i32) {
        if self.destroyed {
            return;
        }
        self.hitpoints += points;
    }

    pub fn damage(&mut self, points: i32) {
        if self.destroyed {
            return;
        }
        self.hitpoints -= points;
        if self.hitpoints <= 0 {
            self.destroyed = true;
        }
    }

    pub fn destroy(&mut self) {
        self.destroyed = true;
    }

    /// Mark for removal from the scene (same as destroying)
    pub fn remove(&mut self) {
        self.destroy();
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    pub fn accelerate(&mut self, velocity: Vec2) {
        self.velocity += velocity;
    }

    /// Integrate velocity into the node's local position
    pub fn update_current(&mut self, dt: f32, transform: &mut Transform) {
        if self.destroyed {
            return;
        }
        transform.position += self.velocity * dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_to_zero_destroys() {
        let mut entity = Entity::new(10);
        entity.damage(4);
        assert_eq!(entity.hitpoints(), 6);
        assert!(!entity.is_destroyed());

        entity.damage(6);
        assert!(entity.is_destroyed());
    }

    #[test]
    fn test_destroyed_ignores_damage_and_repair() {
        let mut entity = Entity::new(10);
        entity.destroy();
        entity.damage(3);
        entity.repair(50);
        assert_eq!(entity.hitpoints(), 10);
        assert!(entity.is_destroyed());
    }

    #[test]
    fn test_movement_suppressed_when_destroyed() {
        let mut entity = Entity::new(1);
        let mut transform = Transform::default();
        entity.set_velocity(Vec2::new(10.0, 0.0));
        entity.update_current(0.5, &mut transform);
        assert_eq!(transform.position, Vec2::new(5.0, 0.0));

        entity.destroy();
        entity.update_current(0.5, &mut transform);
        assert_eq!(transform.position, Vec2::new(5.0, 0.0));
    }

    #[test]
    fn test_accelerate_accumulates() {
        let mut entity = Entity::new(1);
        entity.accelerate(Vec2::new(1.0, 0.0));
        entity.accelerate(Vec2::new(0.0, -2.0));
        assert_eq!(entity.velocity(), Vec2::new(1.0, -2.0));
    }
}
