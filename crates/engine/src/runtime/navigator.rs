use tracing::info;

use crate::content::World;

use super::error::PlayError;
use super::movement::Candidate;
use super::render::RenderTarget;
use super::state::GameState;

/// Makes `room_index` current: resolves its palette by name and rebuilds the render
/// cache for every sprite in the room plus both orientations of the avatar.
pub fn enter_room(
    world: &World,
    state: &mut GameState,
    room_index: usize,
    avatar_name: &str,
    render: &mut dyn RenderTarget,
) -> Result<(), PlayError> {
    let room = world.rooms.get(room_index).ok_or(PlayError::RoomNotFound {
        index: room_index,
        room_count: world.rooms.len(),
    })?;
    let palette_index =
        world
            .palette_index(&room.palette_name)
            .ok_or_else(|| PlayError::PaletteNotFound {
                name: room.palette_name.clone(),
            })?;
    let palette = &world.palettes[palette_index];
    let avatar = world
        .sprites
        .by_name(avatar_name)
        .ok_or_else(|| PlayError::SpriteNotFound {
            name: avatar_name.to_string(),
        })?;
    let room_sprites = room
        .tiles
        .iter()
        .map(|tile| {
            world
                .sprites
                .by_name(&tile.sprite_name)
                .ok_or_else(|| PlayError::SpriteNotFound {
                    name: tile.sprite_name.clone(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    render.clear_sprite_cache();
    for sprite in room_sprites {
        render.cache_sprite(sprite, palette, false);
    }
    render.cache_sprite(avatar, palette, false);
    render.cache_sprite(avatar, palette, true);

    state.room_index = room_index;
    state.palette_index = palette_index;
    info!(
        room = room_index,
        palette = %palette.name,
        tiles = room.tiles.len(),
        "room_entered"
    );
    Ok(())
}

/// Moves the avatar onto a candidate. Returns whether the room changed. A cell outside the
/// room grid (reachable only through `move_avatar`) fails before any state changes.
pub fn commit_move(
    world: &World,
    state: &mut GameState,
    candidate: Candidate,
    avatar_name: &str,
    render: &mut dyn RenderTarget,
) -> Result<bool, PlayError> {
    if !world.dimensions.contains_cell(candidate.x, candidate.y) {
        return Err(PlayError::CellOutOfRoom {
            room_index: candidate.room_index,
            x: candidate.x,
            y: candidate.y,
        });
    }
    let room_changed = candidate.room_index != state.room_index;
    if room_changed {
        enter_room(world, state, candidate.room_index, avatar_name, render)?;
    }
    state.avatar.x = candidate.x;
    state.avatar.y = candidate.y;
    Ok(room_changed)
}
