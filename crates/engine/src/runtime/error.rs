use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidState,
}

/// Failures that abort an evaluation. Rejected moves and empty inventories are ordinary
/// outcomes and never show up here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayError {
    #[error("sprite '{name}' is not defined in the world")]
    SpriteNotFound { name: String },
    #[error("palette '{name}' is not defined in the world")]
    PaletteNotFound { name: String },
    #[error("room {index} does not exist (world has {room_count} rooms)")]
    RoomNotFound { index: usize, room_count: usize },
    #[error("cell ({x}, {y}) lies outside room {room_index}")]
    CellOutOfRoom { room_index: usize, x: i32, y: i32 },
    #[error("world has no sprites to choose an avatar from")]
    NoSprites,
    #[error("sequence '{invocation}' has no actions to run")]
    EmptySequence { invocation: String },
    #[error("action nesting exceeded {limit} levels while running '{invocation}'")]
    RecursionLimit { limit: usize, invocation: String },
}

impl PlayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SpriteNotFound { .. } | Self::PaletteNotFound { .. } | Self::RoomNotFound { .. } => {
                ErrorKind::NotFound
            }
            Self::CellOutOfRoom { .. }
            | Self::NoSprites
            | Self::EmptySequence { .. }
            | Self::RecursionLimit { .. } => ErrorKind::InvalidState,
        }
    }
}
