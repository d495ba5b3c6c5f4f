//! The scene graph.
//!
//! Every game object lives in a single tree of [`SceneNode`]s. Parents own
//! their children outright; there are no parent pointers, so a node's world
//! transform is recomposed from the root whenever it is asked for. Node
//! behaviour is a closed set of [`NodeKind`] variants matched at each call
//! site.

use crate::category::Category;
use crate::character::Character;
use crate::command::{Action, Command, CommandQueue};
use crate::geometry::{FloatRect, Transform};
use crate::render::{Drawable, Renderer};
use crate::sound::SoundNode;
use crate::tile::Tile;
use crate::tilemap::Tilemap;
use glam::{Affine2, Vec2};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a node, unique for the lifetime of the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    fn next() -> Self {
        NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Unordered pair of colliding nodes, stored smaller id first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pair {
    first: NodeId,
    second: NodeId,
}

impl Pair {
    pub fn new(a: NodeId, b: NodeId) -> Self {
        Self {
            first: a.min(b),
            second: a.max(b),
        }
    }

    pub fn first(&self) -> NodeId {
        self.first
    }

    pub fn second(&self) -> NodeId {
        self.second
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.first == id || self.second == id
    }
}

pub type CollisionSet = BTreeSet<Pair>;

/// What a node is
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Pass-through grouping node
    Layer,
    Character(Character),
    Tile(Tile),
    Tilemap(Tilemap),
    Sound(SoundNode),
}

#[derive(Debug)]
pub struct SceneNode {
    id: NodeId,
    pub transform: Transform,
    category: Category,
    kind: NodeKind,
    children: Vec<Box<SceneNode>>,
}

impl SceneNode {
    fn with_kind(kind: NodeKind, category: Category, transform: Transform) -> Self {
        Self {
            id: NodeId::next(),
            transform,
            category,
            kind,
            children: Vec::new(),
        }
    }

    /// Grouping node with an explicit category
    pub fn layer(category: Category) -> Self {
        Self::with_kind(NodeKind::Layer, category, Transform::default())
    }

    pub fn character(character: Character, position: Vec2) -> Self {
        let category = character.category();
        Self::with_kind(
            NodeKind::Character(character),
            category,
            Transform::from_position(position),
        )
    }

    /// Tile placed at its grid coordinate
    pub fn tile(tile: Tile) -> Self {
        let category = tile.category();
        let position = tile.id().world_origin();
        Self::with_kind(NodeKind::Tile(tile), category, Transform::from_position(position))
    }

    pub fn tilemap(tilemap: Tilemap) -> Self {
        Self::with_kind(NodeKind::Tilemap(tilemap), Category::TILEMAP, Transform::default())
    }

    pub fn sound(node: SoundNode) -> Self {
        Self::with_kind(NodeKind::Sound(node), Category::SOUND_EFFECT, Transform::default())
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut NodeKind {
        &mut self.kind
    }

    pub fn children(&self) -> impl Iterator<Item = &SceneNode> + '_ {
        self.children.iter().map(|child| child.as_ref())
    }

    pub fn as_character(&self) -> Option<&Character> {
        match &self.kind {
            NodeKind::Character(character) => Some(character),
            _ => None,
        }
    }

    pub fn as_character_mut(&mut self) -> Option<&mut Character> {
        match &mut self.kind {
            NodeKind::Character(character) => Some(character),
            _ => None,
        }
    }

    pub fn as_tilemap(&self) -> Option<&Tilemap> {
        match &self.kind {
            NodeKind::Tilemap(tilemap) => Some(tilemap),
            _ => None,
        }
    }

    pub fn as_sound_mut(&mut self) -> Option<&mut SoundNode> {
        match &mut self.kind {
            NodeKind::Sound(sound) => Some(sound),
            _ => None,
        }
    }

    /// Take ownership of `child` and append it after the existing children.
    ///
    /// # Panics
    /// If any node of `child`'s subtree is already part of this tree.
    pub fn attach_child(&mut self, child: SceneNode) -> NodeId {
        let id = child.id;
        assert!(
            !self.shares_node_with(&child),
            "scene node {id:?} is already attached"
        );
        self.children.push(Box::new(child));
        id
    }

    /// Remove a direct child and hand it back. `None` if `id` is not a direct child.
    pub fn detach_child(&mut self, id: NodeId) -> Option<Box<SceneNode>> {
        let index = self.children.iter().position(|child| child.id == id)?;
        Some(self.children.remove(index))
    }

    fn shares_node_with(&self, other: &SceneNode) -> bool {
        self.contains(other.id) || other.children.iter().any(|child| self.shares_node_with(child))
    }

    /// Whether `id` is this node or one of its descendants
    pub fn contains(&self, id: NodeId) -> bool {
        self.find(id).is_some()
    }

    pub fn find(&self, id: NodeId) -> Option<&SceneNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    pub fn find_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }

    /// Number of nodes in this subtree, including this one
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(|child| child.node_count()).sum::<usize>()
    }

    /// Depth-first update, parent before children
    pub fn update(&mut self, dt: f32, commands: &mut CommandQueue) {
        self.update_current(dt, commands);
        for child in &mut self.children {
            child.update(dt, commands);
        }
    }

    fn update_current(&mut self, dt: f32, _commands: &mut CommandQueue) {
        if let NodeKind::Character(character) = &mut self.kind {
            character.update_current(dt, &mut self.transform);
        }
    }

    /// Apply `command` to every node in this subtree whose category matches
    pub fn on_command(&mut self, command: &Command, dt: f32) {
        if command.category.intersects(self.category) {
            self.apply_action(&command.action, dt);
        }
        for child in &mut self.children {
            child.on_command(command, dt);
        }
    }

    fn apply_action(&mut self, action: &Action, _dt: f32) {
        match (action, &mut self.kind) {
            (Action::Accelerate(direction), NodeKind::Character(character)) => {
                let speed = character.max_speed();
                character.accelerate(*direction * speed);
            }
            (Action::PlaySound { effect, position }, NodeKind::Sound(sound)) => {
                sound.play_sound(*effect, *position);
            }
            (action, kind) => {
                debug_assert!(false, "action {action:?} cannot target {kind:?}");
            }
        }
    }

    pub fn is_marked_for_removal(&self) -> bool {
        match &self.kind {
            NodeKind::Character(character) => character.is_marked_for_removal(),
            NodeKind::Tile(tile) => tile.is_marked_for_removal(),
            NodeKind::Layer | NodeKind::Tilemap(_) | NodeKind::Sound(_) => false,
        }
    }

    /// Drop destroyed children at this level, then recurse into the survivors
    pub fn remove_wrecks(&mut self) {
        self.children.retain(|child| !child.is_marked_for_removal());
        for child in &mut self.children {
            child.remove_wrecks();
        }
    }

    /// World-space bounds given this node's world transform. Empty for nodes
    /// that never collide.
    pub fn bounding_rect(&self, world: &Affine2) -> FloatRect {
        match &self.kind {
            NodeKind::Character(character) => character.local_bounds().transformed(world),
            NodeKind::Tile(tile) => tile.local_bounds().transformed(world),
            NodeKind::Tilemap(tilemap) => tilemap.bounds().transformed(world),
            NodeKind::Layer | NodeKind::Sound(_) => FloatRect::EMPTY,
        }
    }

    /// Compose local transforms from this node down to `id`
    pub fn world_transform_of(&self, id: NodeId) -> Option<Affine2> {
        self.compose_to(id, Affine2::IDENTITY)
    }

    fn compose_to(&self, id: NodeId, parent: Affine2) -> Option<Affine2> {
        let world = parent * self.transform.to_affine();
        if self.id == id {
            return Some(world);
        }
        self.children.iter().find_map(|child| child.compose_to(id, world))
    }

    pub fn world_position_of(&self, id: NodeId) -> Option<Vec2> {
        self.world_transform_of(id)
            .map(|world| world.transform_point2(Vec2::ZERO))
    }

    pub fn world_bounds_of(&self, id: NodeId) -> Option<FloatRect> {
        let world = self.world_transform_of(id)?;
        self.find(id).map(|node| node.bounding_rect(&world))
    }

    /// Collect every pair of colliding nodes in this subtree.
    ///
    /// A node is never paired with its own ancestors or descendants, and
    /// destroyed nodes and nodes without bounds are skipped.
    pub fn check_scene_collision(&self, pairs: &mut CollisionSet) {
        puffin::profile_function!();

        let mut flat = Vec::new();
        self.flatten(Affine2::IDENTITY, &mut flat);

        for node in &flat {
            if !node.collidable {
                continue;
            }
            // Pre-order: everything after this subtree is unrelated to it
            for other in &flat[node.subtree_end..] {
                if other.collidable && node.bounds.intersects(&other.bounds) {
                    pairs.insert(Pair::new(node.id, other.id));
                }
            }
        }
    }

    fn flatten(&self, parent: Affine2, out: &mut Vec<FlatNode>) {
        let world = parent * self.transform.to_affine();
        let bounds = self.bounding_rect(&world);
        let index = out.len();
        out.push(FlatNode {
            id: self.id,
            bounds,
            collidable: !bounds.is_empty() && !self.is_marked_for_removal(),
            subtree_end: index + 1,
        });
        for child in &self.children {
            child.flatten(world, out);
        }
        out[index].subtree_end = out.len();
    }

    /// Hand this subtree to `renderer`, parents first
    pub fn draw(&self, renderer: &mut dyn Renderer, parent: &Affine2) {
        let world = *parent * self.transform.to_affine();
        match &self.kind {
            NodeKind::Character(character) => renderer.draw(Drawable::Character(character), &world),
            NodeKind::Tile(tile) => renderer.draw(Drawable::Tile(tile), &world),
            NodeKind::Tilemap(tilemap) => renderer.draw(Drawable::Tilemap(tilemap), &world),
            NodeKind::Layer | NodeKind::Sound(_) => {}
        }
        for child in &self.children {
            child.draw(renderer, &world);
        }
    }
}

struct FlatNode {
    id: NodeId,
    bounds: FloatRect,
    collidable: bool,
    /// One past the last pre-order index of this node's subtree
    subtree_end: usize,
}
