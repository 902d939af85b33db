use super::movement::Direction;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Other(String),
}

impl Key {
    pub fn from_identifier(identifier: &str) -> Self {
        match identifier {
            "ArrowUp" => Self::ArrowUp,
            "ArrowDown" => Self::ArrowDown,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_arrow(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    fn direction(&self) -> Option<Direction> {
        match self {
            Self::ArrowUp => Some(Direction::Up),
            Self::ArrowDown => Some(Direction::Down),
            Self::ArrowLeft => Some(Direction::Left),
            Self::ArrowRight => Some(Direction::Right),
            Self::Other(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    KeyDown { key: Key, repeat: bool },
    KeyUp { key: Key },
    PointerDown { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    PointerUp,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct PointerState {
    is_down: bool,
    start: (f32, f32),
    end: (f32, f32),
    moves_since_touch: u32,
    one_more_move: bool,
}

/// What a released pointer means to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerRelease {
    NotDown,
    Released,
    /// Released before any drag move was produced; the replay is now armed.
    ReplayArmed,
}

/// Reduces raw key and pointer events to a single movement intent.
#[derive(Debug, Clone, Default)]
pub struct InputTracker {
    held_keys: Vec<Key>,
    pointer: PointerState,
    swipe_threshold: f32,
}

impl InputTracker {
    pub fn new(swipe_threshold: f32) -> Self {
        Self {
            swipe_threshold,
            ..Self::default()
        }
    }

    pub fn press_key(&mut self, key: Key) {
        self.held_keys.push(key);
    }

    pub fn release_key(&mut self, key: &Key) {
        self.held_keys.retain(|held| held != key);
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.pointer.is_down = true;
        self.pointer.moves_since_touch = 0;
        self.pointer.start = (x, y);
        self.pointer.end = (x, y);
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        if self.pointer.is_down {
            self.pointer.end = (x, y);
        }
    }

    /// Ends a drag. `dialog_showing` suppresses the tap replay because the release is
    /// consumed as a dialog confirmation instead.
    pub fn pointer_up(&mut self, dialog_showing: bool) -> PointerRelease {
        if !self.pointer.is_down {
            return PointerRelease::NotDown;
        }
        self.pointer.is_down = false;
        if !dialog_showing && self.pointer.moves_since_touch == 0 {
            self.pointer.one_more_move = true;
            return PointerRelease::ReplayArmed;
        }
        PointerRelease::Released
    }

    pub fn cancel_pointer(&mut self) {
        self.pointer.is_down = false;
    }

    /// The intent for this input evaluation. The most recent held key wins and masks the
    /// pointer entirely; a drag only counts once it exceeds the swipe threshold.
    pub fn next_direction(&mut self) -> Option<Direction> {
        if let Some(key) = self.held_keys.last() {
            return key.direction();
        }
        if !(self.pointer.is_down || self.pointer.one_more_move) {
            return None;
        }
        let dx = self.pointer.end.0 - self.pointer.start.0;
        let dy = self.pointer.end.1 - self.pointer.start.1;
        if dx * dx + dy * dy <= self.swipe_threshold * self.swipe_threshold {
            return None;
        }
        self.pointer.moves_since_touch += 1;
        self.pointer.one_more_move = false;
        Some(Direction::from_drag(dx, dy))
    }
}
