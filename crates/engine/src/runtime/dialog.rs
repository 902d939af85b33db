use std::collections::VecDeque;

use crate::content::{Action, TileId};

use super::movement::Candidate;
use super::sequence::InvocationId;

/// Text paging widget. `begin` shows the first page; `finish_page` completes or advances
/// the current page.
pub trait DialogWidget {
    fn begin(&mut self, text: &str, display_at_bottom: bool);
    fn end(&mut self);
    fn is_complete(&self) -> bool;
    fn finish_page(&mut self);
}

/// Where an action's tile lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRef {
    pub room_index: usize,
    pub tile_id: TileId,
}

/// A captured invocation waiting for the dialog to close.
#[derive(Debug, Clone, PartialEq)]
pub struct DeferredInvocation {
    pub action: Action,
    pub tile: TileRef,
    pub candidate: Candidate,
    pub invocation: InvocationId,
}

/// Dialog modality plus the FIFO of invocations it held back.
#[derive(Debug, Clone, Default)]
pub struct DialogGate {
    showing: bool,
    deferred: VecDeque<DeferredInvocation>,
}

impl DialogGate {
    pub fn is_showing(&self) -> bool {
        self.showing
    }

    pub fn open(&mut self) {
        self.showing = true;
    }

    pub fn close(&mut self) {
        self.showing = false;
    }

    pub fn defer(&mut self, invocation: DeferredInvocation) {
        self.deferred.push_back(invocation);
    }

    /// Next queued invocation, unless a dialog is showing again.
    pub fn next_ready(&mut self) -> Option<DeferredInvocation> {
        if self.showing {
            return None;
        }
        self.deferred.pop_front()
    }

    pub fn deferred_len(&self) -> usize {
        self.deferred.len()
    }
}

/// Dialog goes to the bottom of the screen when the triggering cell is in the top half.
pub fn display_at_bottom(y: i32, room_height: i32) -> bool {
    y * 2 < room_height
}
