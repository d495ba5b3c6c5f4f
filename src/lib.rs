//! Simulation core of a top-down dungeon crawler: a scene graph of game
//! objects, a room-and-corridor dungeon generator, and the per-frame world
//! update that ties them together. Rendering, audio and windowing are left to
//! the caller through the [`render::Renderer`] and [`sound::SoundPlayer`] traits.

pub mod category;
pub mod character;
pub mod collision;
pub mod command;
pub mod config;
pub mod constants;
pub mod data_tables;
pub mod dungeon;
pub mod dungeon_gen;
pub mod entity;
pub mod error;
pub mod geometry;
pub mod player;
pub mod render;
pub mod scene;
pub mod sound;
pub mod tile;
pub mod tilemap;
pub mod utility;

pub use config::GameConfig;
pub use dungeon::Dungeon;
pub use error::{ConfigError, DungeonError};
