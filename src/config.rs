//! Game configuration, loaded from JSON. Every field falls back to the
//! values in [`crate::constants`].

use crate::constants::*;
use crate::dungeon_gen::{GenerationConfig, MapExtent};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub generation: GenerationConfig,
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Tiles visible across the shorter viewport axis
    pub visible_tiles: f32,
    pub enemy_count: usize,
    /// Generation runs allowed before giving up on a map with no rooms
    pub generation_attempts: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            generation: GenerationConfig::default(),
            viewport_width: VIEWPORT_DEFAULT_WIDTH,
            viewport_height: VIEWPORT_DEFAULT_HEIGHT,
            visible_tiles: VIEW_VISIBLE_TILES,
            enemy_count: DEFAULT_ENEMY_COUNT,
            generation_attempts: DUNGEON_GENERATION_ATTEMPTS,
        }
    }
}

impl GameConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig =
            serde_json::from_str(json).map_err(|source| ConfigError::Parse { source })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let generation = &self.generation;
        if generation.room_min_size < DUNGEON_MIN_ROOM_SIZE {
            return Err(ConfigError::Invalid(format!(
                "room_min_size {} is below {DUNGEON_MIN_ROOM_SIZE}",
                generation.room_min_size
            )));
        }
        if generation.room_min_size > generation.room_max_size {
            return Err(ConfigError::Invalid(format!(
                "room_min_size {} exceeds room_max_size {}",
                generation.room_min_size, generation.room_max_size
            )));
        }

        if let MapExtent::Random {
            step, max_factor, ..
        } = generation.extent
        {
            if max_factor < 1 || step < 0 {
                return Err(ConfigError::Invalid(format!(
                    "random extent needs max_factor >= 1 and step >= 0, got {max_factor} and {step}"
                )));
            }
        }
        let Some((shortest, longest)) = generation.extent.edge_range() else {
            return Err(ConfigError::Invalid(
                "map extent overflows an i32".to_string(),
            ));
        };
        if longest > DUNGEON_MAX_EXTENT {
            return Err(ConfigError::Invalid(format!(
                "map extent {longest} exceeds {DUNGEON_MAX_EXTENT}"
            )));
        }
        // The smallest map must fit the smallest room plus its margins
        let needed = generation.room_min_size.saturating_add(2 * DUNGEON_ROOM_MARGIN);
        if shortest < needed {
            return Err(ConfigError::Invalid(format!(
                "map extent {shortest} cannot fit a room of size {}",
                generation.room_min_size
            )));
        }
        if generation
            .max_rooms
            .is_some_and(|max_rooms| max_rooms > DUNGEON_MAX_ROOM_ATTEMPTS)
        {
            return Err(ConfigError::Invalid(format!(
                "max_rooms exceeds {DUNGEON_MAX_ROOM_ATTEMPTS}"
            )));
        }

        if self.generation_attempts == 0 {
            return Err(ConfigError::Invalid(
                "generation_attempts must be at least 1".to_string(),
            ));
        }
        if self.viewport_width <= 0.0 || self.viewport_height <= 0.0 || self.visible_tiles <= 0.0 {
            return Err(ConfigError::Invalid(
                "viewport and visible_tiles must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_are_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GameConfig::from_json_str(r#"{ "enemy_count": 7 }"#).expect("valid");
        assert_eq!(config.enemy_count, 7);
        assert_eq!(config.generation_attempts, DUNGEON_GENERATION_ATTEMPTS);
        assert_eq!(config.generation, GenerationConfig::default());
    }

    #[test]
    fn test_fixed_extent_from_json() {
        let json = r#"{
            "generation": {
                "extent": { "kind": "fixed", "width": 50, "height": 40 },
                "max_rooms": 5,
                "room_min_size": 3,
                "room_max_size": 6
            }
        }"#;
        let config = GameConfig::from_json_str(json).expect("valid");
        assert_eq!(
            config.generation.extent,
            MapExtent::Fixed {
                width: 50,
                height: 40
            }
        );
        assert_eq!(config.generation.max_rooms, Some(5));
    }

    #[test]
    fn test_rejects_inverted_room_sizes() {
        let json = r#"{ "generation": { "room_min_size": 8, "room_max_size": 4 } }"#;
        assert!(matches!(
            GameConfig::from_json_str(json),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_rejects_map_too_small_for_a_room() {
        let json = r#"{ "generation": { "extent": { "kind": "fixed", "width": 4, "height": 30 } } }"#;
        assert!(matches!(
            GameConfig::from_json_str(json),
            Err(ConfigError::Invalid(_))
        ));
    }

    fn assert_invalid(json: &str) {
        assert!(
            matches!(GameConfig::from_json_str(json), Err(ConfigError::Invalid(_))),
            "{json} was accepted"
        );
    }

    #[test]
    fn test_rejects_extent_overflow() {
        assert_invalid(
            r#"{ "generation": { "extent": { "kind": "random", "base": 10, "step": 500000000, "max_factor": 10 } } }"#,
        );
        assert_invalid(
            r#"{ "generation": { "extent": { "kind": "random", "base": 2147483000, "step": 1000, "max_factor": 1 } } }"#,
        );
    }

    #[test]
    fn test_rejects_oversized_extent() {
        assert_invalid(
            r#"{ "generation": { "extent": { "kind": "fixed", "width": 100000, "height": 100000 } } }"#,
        );
        assert_invalid(
            r#"{ "generation": { "extent": { "kind": "random", "base": 10, "step": 100, "max_factor": 10 } } }"#,
        );
    }

    #[test]
    fn test_rejects_negative_extent_and_bad_factor() {
        assert_invalid(r#"{ "generation": { "extent": { "kind": "fixed", "width": -5, "height": 30 } } }"#);
        assert_invalid(
            r#"{ "generation": { "extent": { "kind": "random", "base": 10, "step": 10, "max_factor": 0 } } }"#,
        );
    }

    #[test]
    fn test_rejects_excessive_max_rooms() {
        assert_invalid(r#"{ "generation": { "max_rooms": 4000000000 } }"#);
        assert!(GameConfig::from_json_str(r#"{ "generation": { "max_rooms": 200 } }"#).is_ok());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            GameConfig::from_json_str("{ enemy_count: "),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("game.json");
        let mut file = fs::File::create(&path).expect("create");
        write!(file, r#"{{ "generation_attempts": 3 }}"#).expect("write");

        let config = GameConfig::load(&path).expect("load");
        assert_eq!(config.generation_attempts, 3);

        let missing = GameConfig::load(dir.path().join("missing.json"));
        assert!(matches!(missing, Err(ConfigError::Read { .. })));
    }
}
