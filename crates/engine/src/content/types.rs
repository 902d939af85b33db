use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Grid geometry shared by every room, plus the per-axis world wrap flags.
///
/// Rooms are laid out row-major: room `index` sits at column `index % world_width`
/// and row `index / world_width` of the world grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldDimensions {
    pub room_width: i32,
    pub room_height: i32,
    pub world_width: i32,
    pub world_height: i32,
    #[serde(default)]
    pub world_wrap_horizontal: bool,
    #[serde(default)]
    pub world_wrap_vertical: bool,
    #[serde(default = "default_sprite_size")]
    pub sprite_width: u32,
    #[serde(default = "default_sprite_size")]
    pub sprite_height: u32,
}

fn default_sprite_size() -> u32 {
    8
}

impl WorldDimensions {
    pub fn new(room_width: i32, room_height: i32, world_width: i32, world_height: i32) -> Self {
        Self {
            room_width,
            room_height,
            world_width,
            world_height,
            world_wrap_horizontal: false,
            world_wrap_vertical: false,
            sprite_width: default_sprite_size(),
            sprite_height: default_sprite_size(),
        }
    }

    pub fn with_wrap(mut self, horizontal: bool, vertical: bool) -> Self {
        self.world_wrap_horizontal = horizontal;
        self.world_wrap_vertical = vertical;
        self
    }

    pub fn room_coords(&self, room_index: usize) -> (i32, i32) {
        let index = room_index as i32;
        (index % self.world_width, index / self.world_width)
    }

    pub fn room_index(&self, room_x: i32, room_y: i32) -> usize {
        (room_y * self.world_width + room_x) as usize
    }

    pub fn contains_cell(&self, x: i32, y: i32) -> bool {
        (0..self.room_width).contains(&x) && (0..self.room_height).contains(&y)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TileId(pub u64);

/// A placed sprite instance. `id` and `remove_me` are runtime-only and never read from
/// world documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    #[serde(skip)]
    pub id: TileId,
    pub sprite_name: String,
    pub x: i32,
    pub y: i32,
    #[serde(skip)]
    pub remove_me: bool,
}

impl Tile {
    pub fn new(sprite_name: impl Into<String>, x: i32, y: i32) -> Self {
        Self {
            id: TileId::default(),
            sprite_name: sprite_name.into(),
            x,
            y,
            remove_me: false,
        }
    }

    pub fn is_at(&self, x: i32, y: i32) -> bool {
        self.x == x && self.y == y
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    #[serde(rename = "paletteName")]
    pub palette_name: String,
    #[serde(rename = "tileList", default)]
    pub tiles: Vec<Tile>,
}

impl Room {
    pub fn new(palette_name: impl Into<String>, tiles: Vec<Tile>) -> Self {
        Self {
            palette_name: palette_name.into(),
            tiles,
        }
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.iter().find(|tile| tile.id == id)
    }

    pub fn tile_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.tiles.iter_mut().find(|tile| tile.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub name: String,
    #[serde(rename = "colorList", default)]
    pub colors: Vec<String>,
}

impl Palette {
    pub fn new(name: impl Into<String>, colors: Vec<String>) -> Self {
        Self {
            name: name.into(),
            colors,
        }
    }

    pub fn background(&self) -> Option<&str> {
        self.color(0)
    }

    /// Falls back to lower indices until a defined color is found. Index 0 is the floor.
    pub fn resolve_color(&self, color_index: usize) -> Option<&str> {
        let mut index = color_index;
        while index > 0 && self.color(index).is_none() {
            index -= 1;
        }
        self.color(index)
    }

    fn color(&self, index: usize) -> Option<&str> {
        self.colors
            .get(index)
            .map(String::as_str)
            .filter(|color| !color.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    #[serde(rename = "=", alias = "==")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = "<")]
    Less,
    #[serde(rename = "<=")]
    LessOrEqual,
    #[serde(rename = ">")]
    Greater,
    #[serde(rename = ">=")]
    GreaterOrEqual,
}

impl Comparison {
    pub fn holds(self, count: i64, threshold: i64) -> bool {
        match self {
            Self::Equal => count == threshold,
            Self::NotEqual => count != threshold,
            Self::Less => count < threshold,
            Self::LessOrEqual => count <= threshold,
            Self::Greater => count > threshold,
            Self::GreaterOrEqual => count >= threshold,
        }
    }
}

/// One node of the closed action language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Dialog {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    GiveItem {
        sprite_name: String,
        quantity: i64,
        #[serde(default = "default_is_giving")]
        is_giving: bool,
    },
    #[serde(rename_all = "camelCase")]
    TransformSelf {
        sprite_name: String,
    },
    #[serde(rename_all = "camelCase")]
    MoveAvatar {
        room_index: usize,
        tile_x: i32,
        tile_y: i32,
    },
    RemoveSelf,
    #[serde(rename_all = "camelCase")]
    TriggerEvent {
        event_name: String,
    },
    #[serde(rename_all = "camelCase")]
    Conditional {
        comparison: Comparison,
        sprite_name: String,
        quantity: i64,
        #[serde(default)]
        action_list: Vec<Action>,
    },
    #[serde(rename_all = "camelCase")]
    Sequence {
        #[serde(default)]
        is_looping: bool,
        #[serde(default)]
        is_shuffled: bool,
        #[serde(default)]
        action_list: Vec<Action>,
    },
}

fn default_is_giving() -> bool {
    true
}

impl Action {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Dialog { .. } => "dialog",
            Self::GiveItem { .. } => "give_item",
            Self::TransformSelf { .. } => "transform_self",
            Self::MoveAvatar { .. } => "move_avatar",
            Self::RemoveSelf => "remove_self",
            Self::TriggerEvent { .. } => "trigger_event",
            Self::Conditional { .. } => "conditional",
            Self::Sequence { .. } => "sequence",
        }
    }

    pub fn triggers_event(&self, event: &str) -> bool {
        matches!(self, Self::TriggerEvent { event_name } if event_name == event)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Behavior {
    pub event: String,
    #[serde(rename = "actionList", default)]
    pub actions: Vec<Action>,
}

impl Behavior {
    pub const PUSH_EVENT: &'static str = "push";

    pub fn new(event: impl Into<String>, actions: Vec<Action>) -> Self {
        Self {
            event: event.into(),
            actions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sprite {
    pub name: String,
    #[serde(rename = "frameList", default)]
    pub frames: Vec<serde_json::Value>,
    #[serde(default)]
    pub color_index: usize,
    #[serde(default)]
    pub is_avatar: bool,
    #[serde(default)]
    pub is_wall: bool,
    #[serde(default)]
    pub is_item: bool,
    #[serde(default)]
    pub is_transparent: bool,
    #[serde(rename = "behaviorList", default)]
    pub behaviors: Vec<Behavior>,
}

impl Sprite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            frames: Vec::new(),
            color_index: 1,
            is_avatar: false,
            is_wall: false,
            is_item: false,
            is_transparent: false,
            behaviors: Vec::new(),
        }
    }

    pub fn avatar(mut self) -> Self {
        self.is_avatar = true;
        self
    }

    pub fn wall(mut self) -> Self {
        self.is_wall = true;
        self
    }

    pub fn item(mut self) -> Self {
        self.is_item = true;
        self
    }

    pub fn with_behavior(mut self, event: impl Into<String>, actions: Vec<Action>) -> Self {
        self.behaviors.push(Behavior::new(event, actions));
        self
    }

    /// First behavior bound to `event`, in declaration order.
    pub fn behavior(&self, event: &str) -> Option<&Behavior> {
        self.behaviors.iter().find(|behavior| behavior.event == event)
    }
}

/// Sprites in world order with a name index. The first sprite declared under a name wins.
#[derive(Debug, Default, Clone)]
pub struct SpriteTable {
    sprites: Vec<Sprite>,
    index_by_name: HashMap<String, usize>,
}

impl SpriteTable {
    pub fn from_sprites(sprites: Vec<Sprite>) -> Self {
        let mut index_by_name = HashMap::with_capacity(sprites.len());
        for (idx, sprite) in sprites.iter().enumerate() {
            index_by_name.entry(sprite.name.clone()).or_insert(idx);
        }
        Self {
            sprites,
            index_by_name,
        }
    }

    pub fn by_name(&self, name: &str) -> Option<&Sprite> {
        self.index_by_name
            .get(name)
            .and_then(|idx| self.sprites.get(*idx))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sprite> {
        self.sprites.iter()
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}

/// The session's world. Sprites and palettes are fixed once built; room tile lists are
/// rewritten by gameplay.
#[derive(Debug, Clone)]
pub struct World {
    pub dimensions: WorldDimensions,
    pub rooms: Vec<Room>,
    pub sprites: SpriteTable,
    pub palettes: Vec<Palette>,
}

impl World {
    /// Assigns every tile a session-unique id in world order.
    pub fn new(
        dimensions: WorldDimensions,
        sprites: Vec<Sprite>,
        palettes: Vec<Palette>,
        mut rooms: Vec<Room>,
    ) -> Self {
        let mut next_id = 0u64;
        for tile in rooms.iter_mut().flat_map(|room| room.tiles.iter_mut()) {
            tile.id = TileId(next_id);
            tile.remove_me = false;
            next_id += 1;
        }
        Self {
            dimensions,
            rooms,
            sprites: SpriteTable::from_sprites(sprites),
            palettes,
        }
    }

    pub fn palette_index(&self, name: &str) -> Option<usize> {
        self.palettes.iter().position(|palette| palette.name == name)
    }

    pub fn tile_count(&self) -> usize {
        self.rooms.iter().map(|room| room.tiles.len()).sum()
    }

    /// Drops every tile marked for removal, in every room. Returns the removed ids.
    pub fn sweep_removed_tiles(&mut self) -> Vec<TileId> {
        let mut removed = Vec::new();
        for room in &mut self.rooms {
            room.tiles.retain(|tile| {
                if tile.remove_me {
                    removed.push(tile.id);
                }
                !tile.remove_me
            });
        }
        removed
    }
}
