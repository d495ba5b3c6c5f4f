//! Audio-facing interface and the in-tree sound node.

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    Hit,
    Death,
}

/// Audio collaborator. Mixing and buffering are entirely its business.
pub trait SoundPlayer {
    fn play(&mut self, effect: SoundEffect, position: Vec2);
    fn set_listener_position(&mut self, position: Vec2);
    fn remove_stopped_sounds(&mut self);
}

/// A positional sound waiting to be handed to the [`SoundPlayer`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundRequest {
    pub effect: SoundEffect,
    pub position: Vec2,
}

/// Scene node that collects sound commands during a frame.
///
/// The scene graph cannot hold the audio service, so requests are buffered
/// here and flushed once per frame.
#[derive(Debug, Clone, Default)]
pub struct SoundNode {
    pending: Vec<SoundRequest>,
}

impl SoundNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn play_sound(&mut self, effect: SoundEffect, position: Vec2) {
        self.pending.push(SoundRequest { effect, position });
    }

    pub fn pending(&self) -> &[SoundRequest] {
        &self.pending
    }

    /// Hand every buffered request to `player`, oldest first
    pub fn flush(&mut self, player: &mut dyn SoundPlayer) {
        for request in self.pending.drain(..) {
            player.play(request.effect, request.position);
        }
    }
}
