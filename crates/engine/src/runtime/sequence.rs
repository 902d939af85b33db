use std::collections::HashMap;
use std::fmt;

use rand::Rng;

use crate::content::TileId;

use super::error::PlayError;

/// Path-derived name of one action occurrence: the triggering event (or `push`) and the
/// index at each level of nested dispatch, joined with `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InvocationId(String);

impl InvocationId {
    pub fn root(event: &str, index: usize) -> Self {
        Self(format!("{event}-{index}"))
    }

    pub fn child(&self, index: usize) -> Self {
        Self(format!("{}-{index}", self.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceCursor {
    cursor: usize,
    order: Vec<usize>,
}

impl SequenceCursor {
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceShape {
    pub len: usize,
    pub is_looping: bool,
    pub is_shuffled: bool,
}

/// Cursor and visit order for every `(tile, invocation)` pair that has run a sequence.
#[derive(Debug, Clone, Default)]
pub struct SequenceStore {
    entries: HashMap<(TileId, InvocationId), SequenceCursor>,
}

impl SequenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index into the sequence's action list that should run now. Builds the visit order
    /// on first use.
    pub fn current<R: Rng + ?Sized>(
        &mut self,
        tile: TileId,
        invocation: &InvocationId,
        shape: SequenceShape,
        rng: &mut R,
    ) -> Result<usize, PlayError> {
        if shape.len == 0 {
            return Err(PlayError::EmptySequence {
                invocation: invocation.to_string(),
            });
        }
        let entry = self
            .entries
            .entry((tile, invocation.clone()))
            .or_insert_with(|| SequenceCursor {
                cursor: 0,
                order: visit_order(shape, rng),
            });
        Ok(entry.order[entry.cursor])
    }

    /// Moves past the action returned by [`Self::current`]. Looping sequences wrap and,
    /// when shuffled, draw a fresh order; others stay on their last action.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        tile: TileId,
        invocation: &InvocationId,
        shape: SequenceShape,
        rng: &mut R,
    ) {
        let Some(entry) = self.entries.get_mut(&(tile, invocation.clone())) else {
            return;
        };
        entry.cursor += 1;
        if entry.cursor >= shape.len {
            if shape.is_looping {
                entry.cursor = 0;
                if shape.is_shuffled {
                    entry.order = visit_order(shape, rng);
                }
            } else {
                entry.cursor = shape.len.saturating_sub(1);
            }
        }
    }

    pub fn get(&self, tile: TileId, invocation: &InvocationId) -> Option<&SequenceCursor> {
        self.entries.get(&(tile, invocation.clone()))
    }

    pub fn forget_tiles(&mut self, removed: &[TileId]) {
        if removed.is_empty() {
            return;
        }
        self.entries.retain(|(tile, _), _| !removed.contains(tile));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn visit_order<R: Rng + ?Sized>(shape: SequenceShape, rng: &mut R) -> Vec<usize> {
    if !shape.is_shuffled {
        return (0..shape.len).collect();
    }
    // Rejection sampling without replacement.
    let mut order = Vec::with_capacity(shape.len);
    while order.len() < shape.len {
        let index = rng.gen_range(0..shape.len);
        if !order.contains(&index) {
            order.push(index);
        }
    }
    order
}
