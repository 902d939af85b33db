use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::content::{Action, Palette, Room, SpriteTable, WorldDimensions};

use super::dialog::{display_at_bottom, DeferredInvocation, DialogGate, DialogWidget, TileRef};
use super::error::PlayError;
use super::inventory::Inventory;
use super::movement::Candidate;
use super::render::RenderTarget;
use super::sequence::{InvocationId, SequenceShape, SequenceStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Executed,
    /// A dialog was showing; the invocation went to the deferred queue.
    Deferred,
}

/// Everything an action may read or change, passed explicitly for one evaluation.
///
/// `candidate` is the working move target: `move_avatar` rewrites it and `dialog` places
/// itself relative to it.
pub struct ActionContext<'a> {
    pub dimensions: WorldDimensions,
    pub sprites: &'a SpriteTable,
    pub palette: &'a Palette,
    pub rooms: &'a mut [Room],
    pub inventory: &'a mut Inventory,
    pub sequences: &'a mut SequenceStore,
    pub gate: &'a mut DialogGate,
    pub render: &'a mut dyn RenderTarget,
    pub dialog: &'a mut dyn DialogWidget,
    pub rng: &'a mut StdRng,
    pub candidate: Candidate,
    pub max_depth: usize,
}

impl<'a> ActionContext<'a> {
    pub fn run(
        &mut self,
        action: &Action,
        tile: TileRef,
        invocation: &InvocationId,
    ) -> Result<ActionOutcome, PlayError> {
        self.dispatch(action, tile, invocation, 0)
    }

    /// Replays a deferred invocation against the candidate it captured.
    pub fn resume(&mut self, deferred: &DeferredInvocation) -> Result<ActionOutcome, PlayError> {
        self.candidate = deferred.candidate;
        self.dispatch(&deferred.action, deferred.tile, &deferred.invocation, 0)
    }

    fn dispatch(
        &mut self,
        action: &Action,
        tile: TileRef,
        invocation: &InvocationId,
        depth: usize,
    ) -> Result<ActionOutcome, PlayError> {
        if depth > self.max_depth {
            return Err(PlayError::RecursionLimit {
                limit: self.max_depth,
                invocation: invocation.to_string(),
            });
        }
        debug!(
            kind = action.kind_name(),
            room = tile.room_index,
            tile = tile.tile_id.0,
            invocation = %invocation,
            "run_action"
        );

        if self.gate.is_showing() {
            self.gate.defer(DeferredInvocation {
                action: action.clone(),
                tile,
                candidate: self.candidate,
                invocation: invocation.clone(),
            });
            return Ok(ActionOutcome::Deferred);
        }

        match action {
            Action::Dialog { text } => {
                let at_bottom = display_at_bottom(self.candidate.y, self.dimensions.room_height);
                self.gate.open();
                self.dialog.begin(text, at_bottom);
                info!(at_bottom, chars = text.chars().count(), "dialog_begin");
            }
            Action::GiveItem {
                sprite_name,
                quantity,
                is_giving,
            } => {
                self.require_sprite(sprite_name)?;
                let delta = if *is_giving { *quantity } else { quantity.saturating_neg() };
                let count = self.inventory.add(sprite_name, delta);
                debug!(item = %sprite_name, delta, count, "inventory_changed");
            }
            Action::TransformSelf { sprite_name } => {
                let sprites = self.sprites;
                let sprite = sprites
                    .by_name(sprite_name)
                    .ok_or_else(|| PlayError::SpriteNotFound {
                        name: sprite_name.clone(),
                    })?;
                match self.tile_mut(tile) {
                    Some(target) => target.sprite_name = sprite_name.clone(),
                    None => debug!(tile = tile.tile_id.0, "transform_target_gone"),
                }
                self.render.cache_sprite(sprite, self.palette, false);
            }
            Action::MoveAvatar {
                room_index,
                tile_x,
                tile_y,
            } => {
                self.candidate = Candidate {
                    room_index: *room_index,
                    x: *tile_x,
                    y: *tile_y,
                };
            }
            Action::RemoveSelf => match self.tile_mut(tile) {
                Some(target) => target.remove_me = true,
                None => debug!(tile = tile.tile_id.0, "remove_target_gone"),
            },
            Action::TriggerEvent { event_name } => {
                self.broadcast(event_name, depth)?;
            }
            Action::Conditional {
                comparison,
                sprite_name,
                quantity,
                action_list,
            } => {
                self.require_sprite(sprite_name)?;
                let count = i64::from(self.inventory.get(sprite_name));
                if comparison.holds(count, *quantity) {
                    for (index, nested) in action_list.iter().enumerate() {
                        self.dispatch(nested, tile, &invocation.child(index), depth + 1)?;
                    }
                }
            }
            Action::Sequence {
                is_looping,
                is_shuffled,
                action_list,
            } => {
                let shape = SequenceShape {
                    len: action_list.len(),
                    is_looping: *is_looping,
                    is_shuffled: *is_shuffled,
                };
                let index = self
                    .sequences
                    .current(tile.tile_id, invocation, shape, &mut *self.rng)?;
                self.dispatch(
                    &action_list[index],
                    tile,
                    &invocation.child(index),
                    depth + 1,
                )?;
                self.sequences
                    .advance(tile.tile_id, invocation, shape, &mut *self.rng);
            }
        }
        Ok(ActionOutcome::Executed)
    }

    /// Runs `event` on every tile of every room. A handler's own nested
    /// `trigger_event` for the same event is skipped; nothing deeper is guarded.
    fn broadcast(&mut self, event: &str, depth: usize) -> Result<(), PlayError> {
        let sprites = self.sprites;
        let targets = self
            .rooms
            .iter()
            .enumerate()
            .flat_map(|(room_index, room)| {
                room.tiles.iter().map(move |tile| TileRef {
                    room_index,
                    tile_id: tile.id,
                })
            })
            .collect::<Vec<_>>();
        debug!(event, tiles = targets.len(), "broadcast_event");

        for target in targets {
            let Some(sprite_name) = self.tile_sprite_name(target) else {
                continue;
            };
            let sprite = sprites
                .by_name(&sprite_name)
                .ok_or(PlayError::SpriteNotFound { name: sprite_name })?;
            let Some(behavior) = sprite.behavior(event) else {
                continue;
            };
            for (index, nested) in behavior.actions.iter().enumerate() {
                if nested.triggers_event(event) {
                    continue;
                }
                self.dispatch(nested, target, &InvocationId::root(event, index), depth + 1)?;
            }
        }
        Ok(())
    }

    fn require_sprite(&self, name: &str) -> Result<(), PlayError> {
        if self.sprites.by_name(name).is_none() {
            return Err(PlayError::SpriteNotFound {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn tile_sprite_name(&self, tile: TileRef) -> Option<String> {
        self.rooms
            .get(tile.room_index)
            .and_then(|room| room.tile(tile.tile_id))
            .map(|found| found.sprite_name.clone())
    }

    fn tile_mut(&mut self, tile: TileRef) -> Option<&mut crate::content::Tile> {
        self.rooms
            .get_mut(tile.room_index)
            .and_then(|room| room.tile_mut(tile.tile_id))
    }
}
