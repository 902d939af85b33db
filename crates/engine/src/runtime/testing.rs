use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::content::{Palette, Room, Sprite, Tile, World, WorldDimensions};

use super::dialog::{DialogGate, DialogWidget};
use super::interpreter::ActionContext;
use super::inventory::Inventory;
use super::movement::{Candidate, Facing};
use super::render::RenderTarget;
use super::sequence::SequenceStore;

pub(crate) const PALETTE: &str = "default";

#[derive(Debug, Default)]
pub(crate) struct RecordingRender {
    pub(crate) cache_clears: usize,
    pub(crate) cached: Vec<(String, bool)>,
    pub(crate) backgrounds: usize,
    pub(crate) tiles: Vec<(String, i32, i32)>,
    pub(crate) avatars: Vec<(i32, i32, Facing)>,
}

impl RenderTarget for RecordingRender {
    fn clear_sprite_cache(&mut self) {
        self.cache_clears += 1;
        self.cached.clear();
    }

    fn cache_sprite(&mut self, sprite: &Sprite, _palette: &Palette, flipped: bool) {
        self.cached.push((sprite.name.clone(), flipped));
    }

    fn draw_background(&mut self, _palette: &Palette) {
        self.backgrounds += 1;
        self.tiles.clear();
    }

    fn draw_tile(&mut self, sprite: &Sprite, _frame_index: usize, x: i32, y: i32) {
        self.tiles.push((sprite.name.clone(), x, y));
    }

    fn draw_avatar(&mut self, _sprite: &Sprite, _frame_index: usize, x: i32, y: i32, facing: Facing) {
        self.avatars.push((x, y, facing));
    }
}

/// Dialog double that needs `pages` confirmations before it reports completion.
#[derive(Debug)]
pub(crate) struct ScriptedDialog {
    pub(crate) pages: usize,
    pub(crate) remaining: usize,
    pub(crate) begun: Vec<(String, bool)>,
    pub(crate) ended: usize,
}

impl Default for ScriptedDialog {
    fn default() -> Self {
        Self {
            pages: 1,
            remaining: 0,
            begun: Vec::new(),
            ended: 0,
        }
    }
}

impl DialogWidget for ScriptedDialog {
    fn begin(&mut self, text: &str, display_at_bottom: bool) {
        self.begun.push((text.to_string(), display_at_bottom));
        self.remaining = self.pages.saturating_sub(1);
    }

    fn end(&mut self) {
        self.ended += 1;
    }

    fn is_complete(&self) -> bool {
        self.remaining == 0
    }

    fn finish_page(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }
}

pub(crate) fn palette() -> Palette {
    Palette::new(
        PALETTE,
        vec!["#000000".to_string(), "#ffffff".to_string()],
    )
}

/// Rooms of 5x5 laid out in a single row.
pub(crate) fn world(sprites: Vec<Sprite>, rooms: Vec<Vec<Tile>>) -> World {
    let dimensions = WorldDimensions::new(5, 5, rooms.len() as i32, 1);
    let rooms = rooms
        .into_iter()
        .map(|tiles| Room::new(PALETTE, tiles))
        .collect();
    World::new(dimensions, sprites, vec![palette()], rooms)
}

pub(crate) struct Fixture {
    pub(crate) world: World,
    pub(crate) inventory: Inventory,
    pub(crate) sequences: SequenceStore,
    pub(crate) gate: DialogGate,
    pub(crate) render: RecordingRender,
    pub(crate) dialog: ScriptedDialog,
    pub(crate) rng: StdRng,
}

impl Fixture {
    pub(crate) fn new(sprites: Vec<Sprite>, rooms: Vec<Vec<Tile>>) -> Self {
        Self {
            world: world(sprites, rooms),
            inventory: Inventory::new(),
            sequences: SequenceStore::new(),
            gate: DialogGate::default(),
            render: RecordingRender::default(),
            dialog: ScriptedDialog::default(),
            rng: StdRng::seed_from_u64(11),
        }
    }

    pub(crate) fn single_room(sprites: Vec<Sprite>, tiles: Vec<Tile>) -> Self {
        Self::new(sprites, vec![tiles])
    }

    pub(crate) fn ctx(&mut self) -> ActionContext<'_> {
        ActionContext {
            dimensions: self.world.dimensions,
            sprites: &self.world.sprites,
            palette: &self.world.palettes[0],
            rooms: &mut self.world.rooms,
            inventory: &mut self.inventory,
            sequences: &mut self.sequences,
            gate: &mut self.gate,
            render: &mut self.render,
            dialog: &mut self.dialog,
            rng: &mut self.rng,
            candidate: Candidate {
                room_index: 0,
                x: 0,
                y: 0,
            },
            max_depth: 64,
        }
    }
}
