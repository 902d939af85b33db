mod loader;
mod types;

pub use loader::{load_world_file, parse_world_json, LoadedWorld, WorldLoadError};
pub use types::{
    Action, Behavior, Comparison, Palette, Room, Sprite, SpriteTable, Tile, TileId, World,
    WorldDimensions,
};
