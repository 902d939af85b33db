mod clock;
mod config;
mod dialog;
mod error;
mod input;
mod interaction;
mod interpreter;
mod inventory;
mod movement;
mod navigator;
mod render;
mod sequence;
mod session;
mod state;

#[cfg(test)]
mod testing;
#[cfg(test)]
mod tests;

pub use clock::{ClockTicks, TickClock};
pub use config::PlayConfig;
pub use dialog::{display_at_bottom, DeferredInvocation, DialogGate, DialogWidget, TileRef};
pub use error::{ErrorKind, PlayError};
pub use input::{InputEvent, InputTracker, Key, PointerRelease};
pub use interaction::{scan_candidate_cell, sweep_removed_tiles, CellScan};
pub use interpreter::{ActionContext, ActionOutcome};
pub use inventory::Inventory;
pub use movement::{resolve_move, Candidate, Direction, Facing, MoveResolution};
pub use navigator::{commit_move, enter_room};
pub use render::{sprite_frame, RenderTarget};
pub use sequence::{InvocationId, SequenceCursor, SequenceShape, SequenceStore};
pub use session::{MoveOutcome, Session, SessionSummary, TickReport};
pub use state::{AvatarState, GameState};
