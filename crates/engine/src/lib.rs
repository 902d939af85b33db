//! Tile adventure runtime: world content, the action interpreter and the play session
//! that moves an avatar through rooms.

pub mod content;
pub mod runtime;

pub use content::{
    load_world_file, parse_world_json, Action, Behavior, Comparison, LoadedWorld, Palette, Room,
    Sprite, SpriteTable, Tile, TileId, World, WorldDimensions, WorldLoadError,
};
pub use runtime::{
    DialogWidget, Direction, ErrorKind, Facing, InputEvent, Key, MoveOutcome,
    PlayConfig, PlayError, RenderTarget, Session, SessionSummary, TickReport,
};
