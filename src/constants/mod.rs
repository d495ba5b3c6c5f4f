//! Tunables, one submodule per domain. Config defaults are drawn from here.

mod camera;
mod dungeon;
mod enemies;
mod gameplay;

pub use camera::*;
pub use dungeon::*;
pub use enemies::*;
pub use gameplay::*;
