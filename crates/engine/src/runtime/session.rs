use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::content::{Room, World};

use super::clock::TickClock;
use super::config::PlayConfig;
use super::dialog::DialogWidget;
use super::error::PlayError;
use super::input::{InputEvent, InputTracker, PointerRelease};
use super::interaction::{scan_candidate_cell, sweep_removed_tiles};
use super::interpreter::ActionContext;
use super::inventory::Inventory;
use super::movement::{resolve_move, Candidate, Direction, Facing, MoveResolution};
use super::navigator::{commit_move, enter_room};
use super::render::{sprite_frame, RenderTarget};
use super::state::GameState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Committed { room_changed: bool },
    /// A wall (or other non-passable tile) sat on the candidate cell.
    Blocked,
    /// The step left the world grid on an axis that does not wrap.
    BoundaryRejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub frame_advanced: bool,
    pub frame_index: usize,
    pub movement: Option<MoveOutcome>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub room_index: usize,
    pub x: i32,
    pub y: i32,
    pub facing: Facing,
    pub inventory: Inventory,
    pub abandoned_deferred: usize,
    pub live_sequences: usize,
}

struct Checkpoint {
    rooms: Vec<Room>,
    state: GameState,
}

/// One play-through of a world: owns the world, the play state and the collaborators,
/// and evaluates input on the host's tick.
pub struct Session<R: RenderTarget, D: DialogWidget> {
    config: PlayConfig,
    world: World,
    avatar_name: String,
    state: GameState,
    input: InputTracker,
    clock: TickClock,
    render: R,
    dialog: D,
    rng: StdRng,
}

impl<R: RenderTarget, D: DialogWidget> Session<R, D> {
    /// Picks the avatar (first `isAvatar` sprite, else the first sprite), places it on
    /// its last tile in world order and enters that room.
    pub fn begin(world: World, config: PlayConfig, render: R, dialog: D) -> Result<Self, PlayError> {
        let avatar_name = world
            .sprites
            .iter()
            .find(|sprite| sprite.is_avatar)
            .or_else(|| world.sprites.iter().next())
            .map(|sprite| sprite.name.clone())
            .ok_or(PlayError::NoSprites)?;

        let mut start = (0, 0, 0);
        for (room_index, room) in world.rooms.iter().enumerate() {
            for tile in room.tiles.iter().filter(|tile| tile.sprite_name == avatar_name) {
                start = (room_index, tile.x, tile.y);
            }
        }

        let rng = match config.shuffle_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut session = Self {
            input: InputTracker::new(config.swipe_threshold),
            clock: TickClock::new(&config),
            config,
            world,
            avatar_name,
            state: GameState::new(start.0, start.1, start.2),
            render,
            dialog,
            rng,
        };
        enter_room(
            &session.world,
            &mut session.state,
            start.0,
            &session.avatar_name,
            &mut session.render,
        )?;
        info!(
            avatar = %session.avatar_name,
            room = start.0,
            x = start.1,
            y = start.2,
            "session_begin"
        );
        Ok(session)
    }

    pub fn handle_input(&mut self, event: InputEvent) -> Result<(), PlayError> {
        let showing = self.state.gate.is_showing();
        match event {
            InputEvent::KeyDown { repeat: true, .. } => {}
            InputEvent::KeyDown { key, .. } if showing => {
                if key.is_arrow() {
                    self.confirm_dialog()?;
                }
            }
            InputEvent::KeyDown { key, .. } => {
                self.input.press_key(key);
                self.clock.reset_input();
            }
            InputEvent::KeyUp { key } => self.input.release_key(&key),
            InputEvent::PointerDown { x, y } => {
                self.input.pointer_down(x, y);
                self.clock.reset_input();
            }
            InputEvent::PointerMove { x, y } => self.input.pointer_move(x, y),
            InputEvent::PointerUp => match self.input.pointer_up(showing) {
                PointerRelease::NotDown => {}
                PointerRelease::Released if showing => self.confirm_dialog()?,
                PointerRelease::Released => {}
                PointerRelease::ReplayArmed => self.clock.reset_input(),
            },
        }
        Ok(())
    }

    /// Advances both cadences by `dt_ms`, evaluates input when due and no dialog is
    /// showing, then redraws the current room.
    pub fn tick(&mut self, dt_ms: f64) -> Result<TickReport, PlayError> {
        let ticks = self.clock.advance(dt_ms);
        let mut movement = None;
        if ticks.input_due && !self.state.gate.is_showing() {
            let direction = self.input.next_direction();
            movement = Some(self.evaluate_move(direction)?);
        }
        self.draw()?;
        Ok(TickReport {
            frame_advanced: ticks.frame_advanced,
            frame_index: self.clock.frame_index(),
            movement,
        })
    }

    /// One movement evaluation. `None` re-evaluates the avatar's own cell. A failure
    /// restores the state of the last committed move.
    pub fn evaluate_move(&mut self, direction: Option<Direction>) -> Result<MoveOutcome, PlayError> {
        self.guarded(|session| session.evaluate_move_unguarded(direction))
    }

    /// Confirmation from the player while a dialog shows: finish the page, or close the
    /// dialog and resume deferred actions front to back until the queue empties or one of
    /// them opens a dialog again.
    ///
    /// Each resumed invocation is rolled back on its own. A failing one is dropped from the
    /// queue, the rest still run, and the first failure is returned.
    pub fn confirm_dialog(&mut self) -> Result<(), PlayError> {
        if !self.state.gate.is_showing() {
            return Ok(());
        }
        if !self.dialog.is_complete() {
            self.dialog.finish_page();
            return Ok(());
        }
        self.state.gate.close();
        self.dialog.end();
        debug!(deferred = self.state.gate.deferred_len(), "dialog_end");

        let mut first_error = None;
        while let Some(deferred) = self.state.gate.next_ready() {
            let resumed = self.guarded(|session| {
                let position = session.state.avatar_position();
                let mut ctx = session.action_context(position)?;
                ctx.resume(&deferred)
            });
            if let Err(error) = resumed {
                warn!(invocation = %deferred.invocation, "deferred_invocation_dropped");
                first_error.get_or_insert(error);
            }
        }
        if self.state.gate.is_showing() {
            self.input.cancel_pointer();
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Stops play. Deferred actions and sequence cursors are dropped, not flushed.
    pub fn end(self) -> SessionSummary {
        let summary = self.summary();
        if summary.abandoned_deferred > 0 {
            warn!(count = summary.abandoned_deferred, "deferred_actions_abandoned");
        }
        info!(
            room = summary.room_index,
            x = summary.x,
            y = summary.y,
            "session_ended"
        );
        summary
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            room_index: self.state.room_index,
            x: self.state.avatar.x,
            y: self.state.avatar.y,
            facing: self.state.avatar.facing,
            inventory: self.state.inventory.clone(),
            abandoned_deferred: self.state.gate.deferred_len(),
            live_sequences: self.state.sequences.len(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn config(&self) -> &PlayConfig {
        &self.config
    }

    pub fn render(&self) -> &R {
        &self.render
    }

    pub fn dialog(&self) -> &D {
        &self.dialog
    }

    pub fn dialog_mut(&mut self) -> &mut D {
        &mut self.dialog
    }

    pub fn dialog_showing(&self) -> bool {
        self.state.gate.is_showing()
    }

    fn evaluate_move_unguarded(
        &mut self,
        direction: Option<Direction>,
    ) -> Result<MoveOutcome, PlayError> {
        if let Some(facing) = direction.and_then(Direction::facing) {
            self.state.avatar.facing = facing;
        }
        let from = self.state.avatar_position();
        let candidate = match resolve_move(&self.world.dimensions, from, direction) {
            MoveResolution::Candidate(candidate) => candidate,
            MoveResolution::BoundaryRejected => {
                debug!(?direction, room = from.room_index, "move_rejected");
                return Ok(MoveOutcome::BoundaryRejected);
            }
        };

        let avatar_cell = (self.state.avatar.x, self.state.avatar.y);
        let (scan, candidate) = {
            let mut ctx = self.action_context(candidate)?;
            let scan = scan_candidate_cell(&mut ctx, avatar_cell)?;
            (scan, ctx.candidate)
        };
        sweep_removed_tiles(&mut self.world, &mut self.state.sequences);
        if self.state.gate.is_showing() {
            self.input.cancel_pointer();
        }

        if !scan.passable {
            debug!(x = candidate.x, y = candidate.y, "move_blocked");
            return Ok(MoveOutcome::Blocked);
        }
        let room_changed = commit_move(
            &self.world,
            &mut self.state,
            candidate,
            &self.avatar_name,
            &mut self.render,
        )?;
        Ok(MoveOutcome::Committed { room_changed })
    }

    fn action_context(&mut self, candidate: Candidate) -> Result<ActionContext<'_>, PlayError> {
        let World {
            dimensions,
            rooms,
            sprites,
            palettes,
        } = &mut self.world;
        let palette = palettes
            .get(self.state.palette_index)
            .ok_or_else(|| PlayError::PaletteNotFound {
                name: format!("#{}", self.state.palette_index),
            })?;
        Ok(ActionContext {
            dimensions: *dimensions,
            sprites,
            palette,
            rooms,
            inventory: &mut self.state.inventory,
            sequences: &mut self.state.sequences,
            gate: &mut self.state.gate,
            render: &mut self.render,
            dialog: &mut self.dialog,
            rng: &mut self.rng,
            candidate,
            max_depth: self.config.max_action_depth,
        })
    }

    // TODO: checkpoint only the rooms an evaluation writes to (current room plus broadcast
    // targets) instead of cloning every room on each input tick.
    fn guarded<T>(
        &mut self,
        op: impl FnOnce(&mut Self) -> Result<T, PlayError>,
    ) -> Result<T, PlayError> {
        let checkpoint = Checkpoint {
            rooms: self.world.rooms.clone(),
            state: self.state.clone(),
        };
        match op(self) {
            Ok(value) => Ok(value),
            Err(error) => {
                let dialog_opened =
                    self.state.gate.is_showing() && !checkpoint.state.gate.is_showing();
                self.world.rooms = checkpoint.rooms;
                self.state = checkpoint.state;
                if dialog_opened {
                    self.dialog.end();
                }
                warn!(error = %error, kind = ?error.kind(), "evaluation_rolled_back");
                Err(error)
            }
        }
    }

    fn draw(&mut self) -> Result<(), PlayError> {
        let frame_index = self.clock.frame_index();
        let palette = self
            .world
            .palettes
            .get(self.state.palette_index)
            .ok_or_else(|| PlayError::PaletteNotFound {
                name: format!("#{}", self.state.palette_index),
            })?;
        let room = self
            .world
            .rooms
            .get(self.state.room_index)
            .ok_or(PlayError::RoomNotFound {
                index: self.state.room_index,
                room_count: self.world.rooms.len(),
            })?;

        self.render.draw_background(palette);
        for tile in &room.tiles {
            let sprite = self.world.sprites.by_name(&tile.sprite_name).ok_or_else(|| {
                PlayError::SpriteNotFound {
                    name: tile.sprite_name.clone(),
                }
            })?;
            if sprite.is_avatar {
                continue;
            }
            self.render
                .draw_tile(sprite, sprite_frame(sprite, frame_index), tile.x, tile.y);
        }
        let avatar = self.world.sprites.by_name(&self.avatar_name).ok_or_else(|| {
            PlayError::SpriteNotFound {
                name: self.avatar_name.clone(),
            }
        })?;
        self.render.draw_avatar(
            avatar,
            sprite_frame(avatar, frame_index),
            self.state.avatar.x,
            self.state.avatar.y,
            self.state.avatar.facing,
        );
        Ok(())
    }
}
