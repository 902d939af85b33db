use tracing::debug;

use crate::content::{Behavior, World};

use super::dialog::TileRef;
use super::error::PlayError;
use super::interpreter::ActionContext;
use super::sequence::{InvocationId, SequenceStore};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellScan {
    pub passable: bool,
    pub picked_up: Vec<String>,
    pub pushed: usize,
}

/// Processes every tile on the candidate cell, in room order. Walls block without
/// stopping the scan, items go to the inventory and are marked for removal, and `push`
/// behaviors run unless the avatar is already standing on the cell.
pub fn scan_candidate_cell(
    ctx: &mut ActionContext<'_>,
    avatar_cell: (i32, i32),
) -> Result<CellScan, PlayError> {
    let room_index = ctx.candidate.room_index;
    if room_index >= ctx.rooms.len() {
        return Err(PlayError::RoomNotFound {
            index: room_index,
            room_count: ctx.rooms.len(),
        });
    }
    let sprites = ctx.sprites;
    let mut scan = CellScan {
        passable: true,
        ..CellScan::default()
    };

    let mut position = 0;
    while position < ctx.rooms[room_index].tiles.len() {
        let tile = &ctx.rooms[room_index].tiles[position];
        position += 1;
        // Re-read per tile: a push on an earlier tile may have redirected the candidate.
        if !tile.is_at(ctx.candidate.x, ctx.candidate.y) {
            continue;
        }
        let tile_ref = TileRef {
            room_index,
            tile_id: tile.id,
        };
        let sprite = sprites
            .by_name(&tile.sprite_name)
            .ok_or_else(|| PlayError::SpriteNotFound {
                name: tile.sprite_name.clone(),
            })?;
        if sprite.is_avatar {
            continue;
        }

        if sprite.is_wall {
            scan.passable = false;
        }
        if sprite.is_item {
            let count = ctx.inventory.add(&sprite.name, 1);
            ctx.rooms[room_index].tiles[position - 1].remove_me = true;
            scan.picked_up.push(sprite.name.clone());
            debug!(item = %sprite.name, count, "item_picked_up");
        }
        if (ctx.candidate.x, ctx.candidate.y) == avatar_cell {
            continue;
        }
        if let Some(push) = sprite.behavior(Behavior::PUSH_EVENT) {
            scan.pushed += 1;
            for (index, action) in push.actions.iter().enumerate() {
                ctx.run(
                    action,
                    tile_ref,
                    &InvocationId::root(Behavior::PUSH_EVENT, index),
                )?;
            }
        }
    }
    Ok(scan)
}

/// Batched removal across every room, dropping the sequence state of removed tiles.
pub fn sweep_removed_tiles(world: &mut World, sequences: &mut SequenceStore) -> usize {
    let removed = world.sweep_removed_tiles();
    sequences.forget_tiles(&removed);
    if !removed.is_empty() {
        debug!(count = removed.len(), "tiles_removed");
    }
    removed.len()
}
