//! Keyboard to command mapping for the player's character.

use crate::category::Category;
use crate::command::{Action, Command, CommandQueue};
use glam::Vec2;
use std::collections::{HashMap, HashSet};
use winit::keyboard::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PlayerAction {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
}

impl PlayerAction {
    pub const ALL: [PlayerAction; 4] = [
        PlayerAction::MoveLeft,
        PlayerAction::MoveRight,
        PlayerAction::MoveUp,
        PlayerAction::MoveDown,
    ];

    /// Held-key actions fire every frame instead of once per press
    pub fn is_realtime(&self) -> bool {
        match self {
            PlayerAction::MoveLeft
            | PlayerAction::MoveRight
            | PlayerAction::MoveUp
            | PlayerAction::MoveDown => true,
        }
    }

    fn command(&self) -> Command {
        let direction = match self {
            PlayerAction::MoveLeft => Vec2::new(-1.0, 0.0),
            PlayerAction::MoveRight => Vec2::new(1.0, 0.0),
            PlayerAction::MoveUp => Vec2::new(0.0, -1.0),
            PlayerAction::MoveDown => Vec2::new(0.0, 1.0),
        };
        Command::new(Category::PLAYER_CHARACTER, Action::Accelerate(direction))
    }
}

pub struct Player {
    key_binding: HashMap<KeyCode, PlayerAction>,
    action_binding: HashMap<PlayerAction, Command>,
}

impl Player {
    pub fn new() -> Self {
        let key_binding = HashMap::from([
            (KeyCode::ArrowLeft, PlayerAction::MoveLeft),
            (KeyCode::ArrowRight, PlayerAction::MoveRight),
            (KeyCode::ArrowUp, PlayerAction::MoveUp),
            (KeyCode::ArrowDown, PlayerAction::MoveDown),
        ]);
        let action_binding = PlayerAction::ALL
            .iter()
            .map(|action| (*action, action.command()))
            .collect();

        Self {
            key_binding,
            action_binding,
        }
    }

    /// One-shot actions on key press
    pub fn handle_event(&self, key: KeyCode, pressed: bool, commands: &mut CommandQueue) {
        if !pressed {
            return;
        }
        if let Some(action) = self.key_binding.get(&key) {
            if !action.is_realtime() {
                self.push_action(*action, commands);
            }
        }
    }

    /// Realtime actions for every bound key currently held
    pub fn handle_realtime_input(&self, held: &HashSet<KeyCode>, commands: &mut CommandQueue) {
        let mut actions: Vec<PlayerAction> = self
            .key_binding
            .iter()
            .filter(|(key, action)| held.contains(*key) && action.is_realtime())
            .map(|(_, action)| *action)
            .collect();
        // HashMap order is arbitrary; keep the command order stable
        actions.sort_unstable();

        for action in actions {
            self.push_action(action, commands);
        }
    }

    fn push_action(&self, action: PlayerAction, commands: &mut CommandQueue) {
        if let Some(command) = self.action_binding.get(&action) {
            commands.push(*command);
        }
    }

    /// Bind `key` to `action`, dropping any key previously bound to it
    pub fn assign_key(&mut self, action: PlayerAction, key: KeyCode) {
        self.key_binding.retain(|_, bound| *bound != action);
        self.key_binding.insert(key, action);
    }

    pub fn assigned_key(&self, action: PlayerAction) -> Option<KeyCode> {
        self.key_binding
            .iter()
            .find(|(_, bound)| **bound == action)
            .map(|(key, _)| *key)
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}
