use serde::Serialize;

use super::dialog::DialogGate;
use super::inventory::Inventory;
use super::movement::{Candidate, Facing};
use super::sequence::SequenceStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AvatarState {
    pub x: i32,
    pub y: i32,
    pub facing: Facing,
}

/// Mutable play state. Created when play begins and discarded when it ends.
#[derive(Debug, Clone, Default)]
pub struct GameState {
    pub room_index: usize,
    pub palette_index: usize,
    pub avatar: AvatarState,
    pub inventory: Inventory,
    pub sequences: SequenceStore,
    pub gate: DialogGate,
}

impl GameState {
    pub fn new(room_index: usize, x: i32, y: i32) -> Self {
        Self {
            room_index,
            avatar: AvatarState {
                x,
                y,
                facing: Facing::Right,
            },
            ..Self::default()
        }
    }

    pub fn avatar_position(&self) -> Candidate {
        Candidate {
            room_index: self.room_index,
            x: self.avatar.x,
            y: self.avatar.y,
        }
    }
}
