use crate::content::{Palette, Sprite};

use super::movement::Facing;

/// Receives drawing notifications. The runtime never reads pixels back.
pub trait RenderTarget {
    fn clear_sprite_cache(&mut self);
    fn cache_sprite(&mut self, sprite: &Sprite, palette: &Palette, flipped: bool);
    fn draw_background(&mut self, palette: &Palette);
    fn draw_tile(&mut self, sprite: &Sprite, frame_index: usize, x: i32, y: i32);
    fn draw_avatar(&mut self, sprite: &Sprite, frame_index: usize, x: i32, y: i32, facing: Facing);
}

/// Frame the sprite shows at a global animation index.
pub fn sprite_frame(sprite: &Sprite, frame_index: usize) -> usize {
    if sprite.frames.is_empty() {
        0
    } else {
        frame_index % sprite.frames.len()
    }
}
