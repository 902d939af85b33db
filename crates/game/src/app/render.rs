use engine::{Facing, Palette, RenderTarget, Sprite};
use tracing::{debug, trace};

/// Headless render target: every notification becomes a trace event.
#[derive(Debug, Default)]
pub(crate) struct TraceRenderTarget {
    cached_sprites: usize,
}

impl RenderTarget for TraceRenderTarget {
    fn clear_sprite_cache(&mut self) {
        debug!(dropped = self.cached_sprites, "sprite_cache_cleared");
        self.cached_sprites = 0;
    }

    fn cache_sprite(&mut self, sprite: &Sprite, palette: &Palette, flipped: bool) {
        self.cached_sprites += 1;
        debug!(
            sprite = %sprite.name,
            color = palette.resolve_color(sprite.color_index).unwrap_or("none"),
            flipped,
            "sprite_cached"
        );
    }

    fn draw_background(&mut self, palette: &Palette) {
        trace!(color = palette.background().unwrap_or("none"), "draw_background");
    }

    fn draw_tile(&mut self, sprite: &Sprite, frame_index: usize, x: i32, y: i32) {
        trace!(sprite = %sprite.name, frame_index, x, y, "draw_tile");
    }

    fn draw_avatar(&mut self, sprite: &Sprite, frame_index: usize, x: i32, y: i32, facing: Facing) {
        trace!(
            sprite = %sprite.name,
            frame_index,
            x,
            y,
            flipped = facing.is_flipped(),
            "draw_avatar"
        );
    }
}
