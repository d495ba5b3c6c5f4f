//! Deferred actions targeted at scene nodes by category.

use crate::category::Category;
use crate::sound::SoundEffect;
use glam::Vec2;
use std::collections::VecDeque;

/// What a command does to the node it reaches
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Add `direction * max_speed` to a character's velocity
    Accelerate(Vec2),
    PlaySound { effect: SoundEffect, position: Vec2 },
}

/// An action and the categories of node it applies to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Command {
    pub category: Category,
    pub action: Action,
}

impl Command {
    pub fn new(category: Category, action: Action) -> Self {
        Self { category, action }
    }
}

/// FIFO of pending commands
#[derive(Debug, Clone, Default)]
pub struct CommandQueue {
    queue: VecDeque<Command>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) {
        self.queue.push_back(command);
    }

    pub fn pop(&mut self) -> Option<Command> {
        self.queue.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Remove and yield every queued command in order
    pub fn drain(&mut self) -> impl Iterator<Item = Command> + '_ {
        self.queue.drain(..)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_is_fifo() {
        let mut queue = CommandQueue::new();
        let left = Command::new(Category::PLAYER_CHARACTER, Action::Accelerate(Vec2::new(-1.0, 0.0)));
        let up = Command::new(Category::PLAYER_CHARACTER, Action::Accelerate(Vec2::new(0.0, -1.0)));
        queue.push(left);
        queue.push(up);

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop(), Some(left));
        assert_eq!(queue.pop(), Some(up));
        assert!(queue.pop().is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_drain_empties_queue() {
        let mut queue = CommandQueue::new();
        for i in 0..3 {
            queue.push(Command::new(
                Category::SOUND_EFFECT,
                Action::PlaySound {
                    effect: SoundEffect::Hit,
                    position: Vec2::splat(i as f32),
                },
            ));
        }
        let drained: Vec<Command> = queue.drain().collect();
        assert_eq!(drained.len(), 3);
        assert!(queue.is_empty());
    }
}
