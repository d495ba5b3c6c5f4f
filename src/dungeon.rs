//! The dungeon world: owns the scene graph and drives one frame at a time.

use crate::category::Category;
use crate::character::{Character, CharacterType};
use crate::collision::{normalize_diagonal, resolve_collisions, resolve_wall_contacts};
use crate::command::CommandQueue;
use crate::config::GameConfig;
use crate::constants::TILE_SIZE;
use crate::dungeon_gen::DungeonGenerator;
use crate::error::DungeonError;
use crate::geometry::FloatRect;
use crate::render::{Renderer, View};
use crate::scene::{CollisionSet, NodeId, SceneNode};
use crate::sound::{SoundNode, SoundPlayer};
use crate::tile::TileId;
use crate::tilemap::Tilemap;
use glam::{Affine2, Vec2};
use rand::Rng;
use tracing::{info, warn};

/// Scene layers, drawn in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Background,
    Main,
}

pub struct Dungeon {
    scene_graph: SceneNode,
    layers: [NodeId; 2],
    tilemap: NodeId,
    sound: NodeId,
    player: NodeId,
    command_queue: CommandQueue,
    view: View,
    dungeon_bounds: FloatRect,
    spawn_position: Vec2,
}

impl Dungeon {
    /// Generate a map and populate it, regenerating while a run yields no rooms
    pub fn new(config: &GameConfig, rng: &mut impl Rng) -> Result<Self, DungeonError> {
        for attempt in 1..=config.generation_attempts {
            let tilemap = DungeonGenerator::generate(&config.generation, rng);
            if !tilemap.rooms().is_empty() {
                return Self::from_tilemap(tilemap, config, rng);
            }
            warn!(
                attempt,
                max_attempts = config.generation_attempts,
                "dungeon_without_rooms"
            );
        }

        Err(DungeonError::NoRooms {
            attempts: config.generation_attempts,
        })
    }

    /// Populate a ready-made map. It needs at least one room to spawn the player in.
    pub fn from_tilemap(
        tilemap: Tilemap,
        config: &GameConfig,
        rng: &mut impl Rng,
    ) -> Result<Self, DungeonError> {
        let spawn_tile = tilemap
            .get_random_room_center(rng)
            .ok_or(DungeonError::NoRooms { attempts: 0 })?;
        let spawn_position = spawn_tile.world_center();

        // At most one enemy per remaining room, in generation order
        let enemy_tiles: Vec<TileId> = tilemap
            .rooms()
            .iter()
            .map(|room| {
                let (x, y) = room.center();
                TileId::new(x, y)
            })
            .filter(|center| *center != spawn_tile)
            .take(config.enemy_count)
            .collect();

        let dungeon_bounds = tilemap.bounds();
        let (width, height) = tilemap.size();
        let rooms = tilemap.rooms().len();

        let mut background = SceneNode::layer(Category::NONE);
        let tilemap_id = background.attach_child(SceneNode::tilemap(tilemap));

        let mut main = SceneNode::layer(Category::SCENE_LAYER);
        let sound = main.attach_child(SceneNode::sound(SoundNode::new()));
        let player = main.attach_child(SceneNode::character(
            Character::new(CharacterType::Player),
            spawn_position,
        ));

        let mut scene_graph = SceneNode::layer(Category::NONE);
        let background_id = scene_graph.attach_child(background);
        let main_id = scene_graph.attach_child(main);

        let mut dungeon = Self {
            scene_graph,
            layers: [background_id, main_id],
            tilemap: tilemap_id,
            sound,
            player,
            command_queue: CommandQueue::new(),
            view: View::for_viewport(
                Vec2::new(config.viewport_width, config.viewport_height),
                config.visible_tiles,
            ),
            dungeon_bounds,
            spawn_position,
        };

        for (i, tile) in enemy_tiles.iter().enumerate() {
            let kind = if i % 2 == 0 {
                CharacterType::Skeleton
            } else {
                CharacterType::Rat
            };
            dungeon.spawn_enemy(kind, *tile);
        }

        dungeon.view.center = spawn_position;
        dungeon.adapt_view_position();

        info!(
            width,
            height,
            rooms,
            enemies = enemy_tiles.len(),
            spawn_x = spawn_position.x,
            spawn_y = spawn_position.y,
            "dungeon_created"
        );

        Ok(dungeon)
    }

    /// Place an enemy at the centre of `tile` on the main layer
    pub fn spawn_enemy(&mut self, kind: CharacterType, tile: TileId) -> Option<NodeId> {
        let main = self.scene_graph.find_mut(self.layer(Layer::Main))?;
        Some(main.attach_child(SceneNode::character(
            Character::new(kind),
            tile.world_center(),
        )))
    }

    /// Advance the world by `dt` seconds.
    ///
    /// Wrecks are swept before the update pass, so only nodes destroyed during
    /// that pass get a final update; an enemy killed by collision is gone first.
    /// Movement is followed by a second wall push-out so no character ends the
    /// frame inside a wall.
    pub fn update(&mut self, dt: f32) {
        puffin::profile_function!();

        // Input rebuilds the player's velocity from scratch every frame
        if let Some(player) = self.player_mut() {
            player.set_velocity(Vec2::ZERO);
        }
        self.adapt_view_position();

        while let Some(command) = self.command_queue.pop() {
            self.scene_graph.on_command(&command, dt);
        }
        self.adapt_player_velocity();

        self.handle_collisions();
        self.scene_graph.remove_wrecks();

        {
            puffin::profile_scope!("scene_update");
            self.scene_graph.update(dt, &mut self.command_queue);
        }

        self.settle_wall_contacts();
        self.adapt_player_position();
    }

    fn handle_collisions(&mut self) {
        puffin::profile_scope!("collisions");

        let mut pairs = CollisionSet::new();
        self.scene_graph.check_scene_collision(&mut pairs);
        resolve_collisions(&mut self.scene_graph, &pairs, &mut self.command_queue);
    }

    fn settle_wall_contacts(&mut self) {
        puffin::profile_scope!("wall_contacts");

        let mut pairs = CollisionSet::new();
        self.scene_graph.check_scene_collision(&mut pairs);
        resolve_wall_contacts(&mut self.scene_graph, &pairs);
    }

    fn adapt_player_velocity(&mut self) {
        if let Some(player) = self.player_mut() {
            let velocity = normalize_diagonal(player.velocity());
            player.set_velocity(velocity);
        }
    }

    /// Keep the player inside the map, half a tile from the edge
    fn adapt_player_position(&mut self) {
        let border = TILE_SIZE / 2.0;
        let bounds = self.dungeon_bounds;
        let Some(node) = self.scene_graph.find_mut(self.player) else {
            return;
        };

        let position = &mut node.transform.position;
        position.x = position.x.max(bounds.left + border).min(bounds.right() - border);
        position.y = position.y.max(bounds.top + border).min(bounds.bottom() - border);
    }

    /// Follow the player without showing anything outside the map
    fn adapt_view_position(&mut self) {
        let Some(mut position) = self.player_position() else {
            return;
        };
        let border = self.view.size / 2.0;
        let bounds = self.dungeon_bounds;

        // Applied as max then min: a map smaller than the view pins to its far edge
        position.x = position.x.max(bounds.left + border.x).min(bounds.right() - border.x);
        position.y = position.y.max(bounds.top + border.y).min(bounds.bottom() - border.y);
        self.view.center = position;
    }

    pub fn draw(&self, renderer: &mut dyn Renderer) {
        renderer.set_view(&self.view);
        self.scene_graph.draw(renderer, &Affine2::IDENTITY);
    }

    /// Move the listener to the player and hand this frame's sounds to `sounds`
    pub fn update_sounds(&mut self, sounds: &mut dyn SoundPlayer) {
        if let Some(position) = self.player_position() {
            sounds.set_listener_position(position);
        }
        if let Some(node) = self
            .scene_graph
            .find_mut(self.sound)
            .and_then(|node| node.as_sound_mut())
        {
            node.flush(sounds);
        }
        sounds.remove_stopped_sounds();
    }

    pub fn layer(&self, layer: Layer) -> NodeId {
        self.layers[layer as usize]
    }

    pub fn player_id(&self) -> NodeId {
        self.player
    }

    /// `None` once the player has been swept from the scene
    pub fn player(&self) -> Option<&Character> {
        self.scene_graph
            .find(self.player)
            .and_then(|node| node.as_character())
    }

    fn player_mut(&mut self) -> Option<&mut Character> {
        self.scene_graph
            .find_mut(self.player)
            .and_then(|node| node.as_character_mut())
    }

    pub fn player_position(&self) -> Option<Vec2> {
        self.scene_graph.world_position_of(self.player)
    }

    pub fn has_alive_player(&self) -> bool {
        self.player().is_some_and(|player| !player.is_destroyed())
    }

    pub fn command_queue(&mut self) -> &mut CommandQueue {
        &mut self.command_queue
    }

    pub fn tilemap(&self) -> Option<&Tilemap> {
        self.scene_graph
            .find(self.tilemap)
            .and_then(|node| node.as_tilemap())
    }

    pub fn scene_graph(&self) -> &SceneNode {
        &self.scene_graph
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn dungeon_bounds(&self) -> FloatRect {
        self.dungeon_bounds
    }

    pub fn spawn_position(&self) -> Vec2 {
        self.spawn_position
    }
}
