//! Player and monster characters.

use crate::category::Category;
use crate::command::{Action, Command, CommandQueue};
use crate::data_tables::{character_data, CharacterData};
use crate::entity::Entity;
use crate::geometry::{FloatRect, Rect, Transform};
use crate::render::TextureId;
use crate::sound::SoundEffect;
use crate::utility::to_radian;
use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CharacterType {
    Player,
    Skeleton,
    Rat,
}

impl CharacterType {
    pub fn data(&self) -> &'static CharacterData {
        character_data(*self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    kind: CharacterType,
    entity: Entity,
    travelled_distance: f32,
    direction_index: usize,
    /// Current sprite frame, shifted sideways by the idle animation
    texture_rect: Rect,
    health_text: String,
}

impl Character {
    pub fn new(kind: CharacterType) -> Self {
        let data = kind.data();
        let mut character = Self {
            kind,
            entity: Entity::new(data.hitpoints),
            travelled_distance: 0.0,
            direction_index: 0,
            texture_rect: data.texture_rect,
            health_text: String::new(),
        };
        character.update_texts();
        character
    }

    pub fn kind(&self) -> CharacterType {
        self.kind
    }

    /// Only the player is allied
    pub fn is_allied(&self) -> bool {
        self.kind == CharacterType::Player
    }

    pub fn category(&self) -> Category {
        if self.is_allied() {
            Category::PLAYER_CHARACTER
        } else {
            Category::ENEMY_CHARACTER
        }
    }

    pub fn max_speed(&self) -> f32 {
        self.kind.data().speed
    }

    pub fn texture(&self) -> TextureId {
        self.kind.data().texture
    }

    pub fn texture_rect(&self) -> Rect {
        self.texture_rect
    }

    /// Text shown under the character; empty once destroyed
    pub fn health_text(&self) -> &str {
        &self.health_text
    }

    /// Hitbox relative to the character's origin
    pub fn local_bounds(&self) -> FloatRect {
        FloatRect::centered(Vec2::ZERO, self.kind.data().hitbox)
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    pub fn hitpoints(&self) -> i32 {
        self.entity.hitpoints()
    }

    pub fn damage(&mut self, points: i32) {
        self.entity.damage(points);
    }

    pub fn repair(&mut self, points: i32) {
        self.entity.repair(points);
    }

    pub fn destroy(&mut self) {
        self.entity.destroy();
    }

    pub fn remove(&mut self) {
        self.entity.remove();
    }

    pub fn is_destroyed(&self) -> bool {
        self.entity.is_destroyed()
    }

    pub fn is_marked_for_removal(&self) -> bool {
        self.entity.is_destroyed()
    }

    pub fn velocity(&self) -> Vec2 {
        self.entity.velocity()
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.entity.set_velocity(velocity);
    }

    pub fn accelerate(&mut self, velocity: Vec2) {
        self.entity.accelerate(velocity);
    }

    /// Queue a sound at `position` for the sound node to pick up
    pub fn play_local_sound(&self, commands: &mut CommandQueue, effect: SoundEffect, position: Vec2) {
        commands.push(Command::new(
            Category::SOUND_EFFECT,
            Action::PlaySound { effect, position },
        ));
    }

    /// Per-frame logic. A destroyed character still refreshes its text and frame once.
    pub fn update_current(&mut self, dt: f32, transform: &mut Transform) {
        self.update_texts();
        self.update_idle_animation();

        if self.is_destroyed() {
            return;
        }

        self.update_movement_pattern(dt);
        self.entity.update_current(dt, transform);
    }

    fn update_movement_pattern(&mut self, dt: f32) {
        let directions = self.kind.data().directions;
        if directions.is_empty() {
            return;
        }

        if self.travelled_distance > directions[self.direction_index].distance {
            self.direction_index = (self.direction_index + 1) % directions.len();
            self.travelled_distance = 0.0;
        }

        let radians = to_radian(directions[self.direction_index].angle + 90.0);
        let speed = self.max_speed();
        self.set_velocity(Vec2::new(speed * radians.cos(), speed * radians.sin()));

        self.travelled_distance += speed * dt;
    }

    fn update_texts(&mut self) {
        self.health_text = if self.is_destroyed() {
            String::new()
        } else {
            format!("{} HP", self.hitpoints().max(0))
        };
    }

    fn update_idle_animation(&mut self) {
        let data = self.kind.data();
        if !data.has_idle_animation {
            return;
        }

        let mut rect = data.texture_rect;
        let vx = self.velocity().x;
        if vx < 0.0 {
            rect.x += rect.width;
        } else if vx > 0.0 {
            rect.x += 2 * rect.width;
        }
        self.texture_rect = rect;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affiliation_follows_type() {
        assert!(Character::new(CharacterType::Player).is_allied());
        assert!(!Character::new(CharacterType::Skeleton).is_allied());
        assert_eq!(
            Character::new(CharacterType::Rat).category(),
            Category::ENEMY_CHARACTER
        );
    }

    #[test]
    fn test_health_text_cleared_on_destroy() {
        let mut character = Character::new(CharacterType::Skeleton);
        assert_eq!(character.health_text(), "10 HP");

        character.damage(25);
        assert!(character.is_destroyed());

        let mut transform = Transform::default();
        character.update_current(0.1, &mut transform);
        assert_eq!(character.health_text(), "");
    }

    #[test]
    fn test_patrol_changes_direction_after_distance() {
        let mut character = Character::new(CharacterType::Rat);
        let mut transform = Transform::default();

        // First leg heads -90 + 90 = 0 degrees: along +x
        character.update_current(0.1, &mut transform);
        assert!(character.velocity().x > 0.0);
        assert!(character.velocity().y.abs() < 1e-3);

        // 9 units per tick; the fifth tick sees 36 > 32 and turns around
        for _ in 0..4 {
            character.update_current(0.1, &mut transform);
        }
        assert!(character.velocity().x < 0.0);
    }

    #[test]
    fn test_player_has_no_pattern() {
        let mut player = Character::new(CharacterType::Player);
        let mut transform = Transform::default();
        player.update_current(1.0, &mut transform);
        assert_eq!(player.velocity(), Vec2::ZERO);
        assert_eq!(transform.position, Vec2::ZERO);
    }

    #[test]
    fn test_idle_frame_follows_velocity_sign() {
        let mut rat = Character::new(CharacterType::Rat);
        let base = rat.texture_rect();
        let mut transform = Transform::default();

        rat.update_current(0.01, &mut transform);
        // Pattern set +x velocity after the frame was chosen from the old one
        rat.update_current(0.01, &mut transform);
        assert_eq!(rat.texture_rect().x, base.x + 2 * base.width);
    }

    #[test]
    fn test_play_local_sound_targets_sound_nodes() {
        let player = Character::new(CharacterType::Player);
        let mut commands = CommandQueue::new();
        player.play_local_sound(&mut commands, SoundEffect::Hit, Vec2::new(8.0, 8.0));

        let command = commands.pop().expect("queued");
        assert_eq!(command.category, Category::SOUND_EFFECT);
        assert_eq!(
            command.action,
            Action::PlaySound {
                effect: SoundEffect::Hit,
                position: Vec2::new(8.0, 8.0)
            }
        );
    }
}
