//! Collision response.
//!
//! The scene graph only reports which nodes overlap. This module decides what
//! each overlap means: characters are pushed out of walls, and a player
//! touching an enemy trades its health for the enemy's life.

use crate::category::Category;
use crate::command::CommandQueue;
use crate::geometry::FloatRect;
use crate::scene::{CollisionSet, NodeId, Pair, SceneNode};
use crate::sound::SoundEffect;
use crate::tile::TileId;
use glam::Vec2;
use std::f32::consts::SQRT_2;
use tracing::trace;

/// Order `pair` so the first id matches `first` and the second matches `second`.
/// `None` if the pair matches neither way round.
pub fn matches_categories(
    pair: &Pair,
    scene: &SceneNode,
    first: Category,
    second: Category,
) -> Option<(NodeId, NodeId)> {
    let a = scene.find(pair.first())?.category();
    let b = scene.find(pair.second())?.category();

    if first.intersects(a) && second.intersects(b) {
        Some((pair.first(), pair.second()))
    } else if first.intersects(b) && second.intersects(a) {
        Some((pair.second(), pair.first()))
    } else {
        None
    }
}

/// Smallest translation that moves `character` out of `obstacle`.
///
/// Each axis takes the shallower of its two exits; the shallower axis wins.
/// After applying the push the rectangles only touch.
pub fn penetration(character: &FloatRect, obstacle: &FloatRect) -> Option<Vec2> {
    if !character.intersects(obstacle) {
        return None;
    }

    let axis_push = |near: f32, far: f32| if far < -near { far } else { near };
    let push_x = axis_push(obstacle.left - character.right(), obstacle.right() - character.left);
    let push_y = axis_push(obstacle.top - character.bottom(), obstacle.bottom() - character.top);

    if push_x.abs() < push_y.abs() {
        Some(Vec2::new(push_x, 0.0))
    } else {
        Some(Vec2::new(0.0, push_y))
    }
}

/// Scale diagonal movement so it is no faster than axis-aligned movement
pub fn normalize_diagonal(velocity: Vec2) -> Vec2 {
    if velocity.x != 0.0 && velocity.y != 0.0 {
        velocity / SQRT_2
    } else {
        velocity
    }
}

/// Apply the response rule for every reported pair, in set order
pub fn resolve_collisions(scene: &mut SceneNode, pairs: &CollisionSet, commands: &mut CommandQueue) {
    puffin::profile_function!();

    for pair in pairs {
        if resolve_wall_contact(scene, pair) {
            continue;
        }
        if let Some((player, enemy)) = matches_categories(
            pair,
            scene,
            Category::PLAYER_CHARACTER,
            Category::ENEMY_CHARACTER,
        ) {
            sacrifice_kill(scene, player, enemy, commands);
        }
    }
}

/// Only push characters out of walls; every other pairing is left alone
pub fn resolve_wall_contacts(scene: &mut SceneNode, pairs: &CollisionSet) {
    puffin::profile_function!();

    for pair in pairs {
        resolve_wall_contact(scene, pair);
    }
}

/// `true` if the pair was a character against a wall
fn resolve_wall_contact(scene: &mut SceneNode, pair: &Pair) -> bool {
    if let Some((character, tilemap)) =
        matches_categories(pair, scene, Category::CHARACTER, Category::TILEMAP)
    {
        push_out_of_tilemap(scene, character, tilemap);
        true
    } else if let Some((character, wall)) =
        matches_categories(pair, scene, Category::CHARACTER, Category::WALL_TILE)
    {
        if let Some(bounds) = scene.world_bounds_of(wall) {
            push_out(scene, character, &bounds);
        }
        true
    } else {
        false
    }
}

/// Push a character out of every unwalkable tile around it
fn push_out_of_tilemap(scene: &mut SceneNode, character: NodeId, tilemap_id: NodeId) {
    let Some(bounds) = scene.world_bounds_of(character) else {
        return;
    };
    let Some(tilemap_world) = scene.world_transform_of(tilemap_id) else {
        return;
    };
    let Some(tilemap) = scene.find(tilemap_id).and_then(|node| node.as_tilemap()) else {
        return;
    };

    let local_center = tilemap_world.inverse().transform_point2(bounds.center());
    let center = TileId::from_world(local_center);

    let mut handles = Vec::with_capacity(9);
    if let Some(handle) = tilemap.get_tile(center) {
        handles.push(handle);
    }
    tilemap.get_neighbours(center, &mut handles);

    let obstacles: Vec<FloatRect> = handles
        .iter()
        .filter_map(|handle| tilemap.tile(*handle))
        .filter(|tile| !tile.is_walkable())
        .map(|tile| tile.bounds().transformed(&tilemap_world))
        .collect();

    for obstacle in &obstacles {
        push_out(scene, character, obstacle);
    }
}

/// Move a character out of `obstacle` if they overlap, using its current bounds
fn push_out(scene: &mut SceneNode, character: NodeId, obstacle: &FloatRect) {
    let Some(world) = scene.world_transform_of(character) else {
        return;
    };
    let Some(node) = scene.find_mut(character) else {
        return;
    };
    let Some(push) = penetration(&node.bounding_rect(&world), obstacle) else {
        return;
    };

    // Express the world-space push in the parent's frame
    let to_parent = node.transform.to_affine() * world.inverse();
    node.transform.position += to_parent.transform_vector2(push);
    trace!(?character, push_x = push.x, push_y = push.y, "character_pushed_out");
}

/// The enemy dies and deals its remaining hitpoints to the player
fn sacrifice_kill(scene: &mut SceneNode, player: NodeId, enemy: NodeId, commands: &mut CommandQueue) {
    let position = scene.world_position_of(enemy).unwrap_or_default();

    let Some(enemy_character) = scene.find_mut(enemy).and_then(|node| node.as_character_mut()) else {
        return;
    };
    if enemy_character.is_destroyed() {
        return;
    }
    let damage = enemy_character.hitpoints();
    enemy_character.destroy();
    enemy_character.play_local_sound(commands, SoundEffect::Death, position);

    if let Some(player_character) = scene.find_mut(player).and_then(|node| node.as_character_mut()) {
        player_character.damage(damage);
        trace!(damage, hitpoints = player_character.hitpoints(), "player_hit");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{Character, CharacterType};
    use crate::tile::{Tile, TileType};
    use crate::tilemap::Tilemap;

    fn wall_rect() -> FloatRect {
        FloatRect::new(48.0, 48.0, 16.0, 16.0)
    }

    #[test]
    fn test_penetration_picks_shallow_axis() {
        // 2 units into the wall's left side, 8 into its top
        let character = FloatRect::new(38.0, 44.0, 12.0, 12.0);
        let push = penetration(&character, &wall_rect()).expect("overlap");
        assert_eq!(push, Vec2::new(-2.0, 0.0));

        let pushed = FloatRect::new(character.left + push.x, character.top + push.y, 12.0, 12.0);
        assert!(!pushed.intersects(&wall_rect()));
    }

    #[test]
    fn test_penetration_pushes_away_from_center() {
        let below = FloatRect::new(50.0, 60.0, 12.0, 12.0);
        assert_eq!(penetration(&below, &wall_rect()), Some(Vec2::new(0.0, 4.0)));

        let right = FloatRect::new(61.0, 50.0, 12.0, 12.0);
        assert_eq!(penetration(&right, &wall_rect()), Some(Vec2::new(3.0, 0.0)));
    }

    #[test]
    fn test_touching_is_not_penetrating() {
        let touching = FloatRect::new(36.0, 48.0, 12.0, 12.0);
        assert!(penetration(&touching, &wall_rect()).is_none());
    }

    #[test]
    fn test_normalize_diagonal() {
        let speed = 200.0;
        let diagonal = normalize_diagonal(Vec2::new(-speed, -speed));
        assert!((diagonal.length() - speed).abs() < 1e-3);
        assert_eq!(normalize_diagonal(Vec2::new(speed, 0.0)), Vec2::new(speed, 0.0));
    }

    #[test]
    fn test_character_moving_into_wall_is_pushed_out() {
        let mut root = SceneNode::layer(Category::NONE);
        let wall = root.attach_child(SceneNode::tile(Tile::new(TileId::new(3, 3), TileType::Wall)));
        let mut character = Character::new(CharacterType::Player);
        character.set_velocity(Vec2::new(5.0, 5.0));
        let player = root.attach_child(SceneNode::character(character, Vec2::new(45.0, 50.0)));

        let mut pairs = CollisionSet::new();
        root.check_scene_collision(&mut pairs);
        assert_eq!(pairs.len(), 1);

        let mut commands = CommandQueue::new();
        resolve_collisions(&mut root, &pairs, &mut commands);

        let wall_bounds = root.world_bounds_of(wall).expect("wall");
        let player_bounds = root.world_bounds_of(player).expect("player");
        assert!(!player_bounds.intersects(&wall_bounds));
        // Entered 3 units from the left, 8 from the top: pushed back along x
        assert_eq!(root.world_position_of(player), Some(Vec2::new(42.0, 50.0)));
    }

    #[test]
    fn test_tilemap_walls_push_character_back_into_room() {
        let mut tilemap = Tilemap::filled(6, 6, TileType::Wall);
        for x in 1..5 {
            for y in 1..5 {
                tilemap.add_tile(TileId::new(x, y), TileType::Floor);
            }
        }
        let mut root = SceneNode::layer(Category::NONE);
        root.attach_child(SceneNode::tilemap(tilemap));
        // Corner tile at (1, 1) spans [16, 32); the hitbox pokes 4 units into the walls
        let player = root.attach_child(SceneNode::character(
            Character::new(CharacterType::Player),
            Vec2::new(18.0, 18.0),
        ));

        let mut pairs = CollisionSet::new();
        root.check_scene_collision(&mut pairs);
        let mut commands = CommandQueue::new();
        resolve_collisions(&mut root, &pairs, &mut commands);

        let position = root.world_position_of(player).expect("player");
        assert_eq!(position, Vec2::new(22.0, 22.0));
    }

    #[test]
    fn test_player_enemy_contact() {
        let mut root = SceneNode::layer(Category::NONE);
        let player = root.attach_child(SceneNode::character(
            Character::new(CharacterType::Player),
            Vec2::new(100.0, 100.0),
        ));
        let enemy = root.attach_child(SceneNode::character(
            Character::new(CharacterType::Skeleton),
            Vec2::new(104.0, 100.0),
        ));

        let mut pairs = CollisionSet::new();
        root.check_scene_collision(&mut pairs);
        let mut commands = CommandQueue::new();
        resolve_collisions(&mut root, &pairs, &mut commands);

        let player_hp = root.find(player).and_then(|n| n.as_character()).map(|c| c.hitpoints());
        assert_eq!(player_hp, Some(90));
        let enemy_dead = root.find(enemy).and_then(|n| n.as_character()).map(|c| c.is_destroyed());
        assert_eq!(enemy_dead, Some(true));
        assert_eq!(commands.len(), 1);

        root.remove_wrecks();
        assert!(!root.contains(enemy));
    }

    #[test]
    fn test_wall_contacts_skip_player_enemy_pairs() {
        let mut root = SceneNode::layer(Category::NONE);
        let wall = root.attach_child(SceneNode::tile(Tile::new(TileId::new(3, 3), TileType::Wall)));
        let player = root.attach_child(SceneNode::character(
            Character::new(CharacterType::Player),
            Vec2::new(45.0, 50.0),
        ));
        let enemy = root.attach_child(SceneNode::character(
            Character::new(CharacterType::Skeleton),
            Vec2::new(40.0, 50.0),
        ));

        let mut pairs = CollisionSet::new();
        root.check_scene_collision(&mut pairs);
        resolve_wall_contacts(&mut root, &pairs);

        let player_bounds = root.world_bounds_of(player).expect("player");
        assert!(!player_bounds.intersects(&root.world_bounds_of(wall).expect("wall")));
        let enemy_hp = root.find(enemy).and_then(|n| n.as_character()).map(|c| c.hitpoints());
        assert_eq!(enemy_hp, Some(CharacterType::Skeleton.data().hitpoints));
        let player_hp = root.find(player).and_then(|n| n.as_character()).map(|c| c.hitpoints());
        assert_eq!(player_hp, Some(CharacterType::Player.data().hitpoints));
    }

    #[test]
    fn test_enemy_pairs_are_ignored() {
        let mut root = SceneNode::layer(Category::NONE);
        let a = root.attach_child(SceneNode::character(Character::new(CharacterType::Rat), Vec2::ZERO));
        root.attach_child(SceneNode::character(Character::new(CharacterType::Rat), Vec2::ONE));

        let mut pairs = CollisionSet::new();
        root.check_scene_collision(&mut pairs);
        assert_eq!(pairs.len(), 1);

        let mut commands = CommandQueue::new();
        resolve_collisions(&mut root, &pairs, &mut commands);
        assert!(commands.is_empty());
        assert_eq!(root.world_position_of(a), Some(Vec2::ZERO));
    }
}
