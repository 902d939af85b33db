use serde::Serialize;

use crate::content::WorldDimensions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Only horizontal moves turn the avatar.
    pub fn facing(self) -> Option<Facing> {
        match self {
            Self::Left => Some(Facing::Left),
            Self::Right => Some(Facing::Right),
            Self::Up | Self::Down => None,
        }
    }

    /// Maps a drag vector onto a direction using the angle shifted by 180 degrees, with
    /// sector boundaries at 45/135/225/315.
    pub fn from_drag(dx: f32, dy: f32) -> Self {
        let angle = dy.atan2(dx).to_degrees() + 180.0;
        if angle > 45.0 && angle <= 135.0 {
            Self::Up
        } else if angle > 135.0 && angle <= 225.0 {
            Self::Right
        } else if angle > 225.0 && angle <= 315.0 {
            Self::Down
        } else {
            Self::Left
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn is_flipped(self) -> bool {
        self == Self::Left
    }
}

/// A tentative avatar location. Push behaviors may still rewrite it before commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub room_index: usize,
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResolution {
    Candidate(Candidate),
    BoundaryRejected,
}

/// Applies a one-tile step from `from`. Leaving the room re-enters the neighbouring room
/// from the opposite edge; leaving the world grid either wraps (per-axis flag) or rejects
/// the whole move.
pub fn resolve_move(
    dimensions: &WorldDimensions,
    from: Candidate,
    direction: Option<Direction>,
) -> MoveResolution {
    let (dx, dy) = direction.map(Direction::delta).unwrap_or((0, 0));
    let (mut room_x, mut room_y) = dimensions.room_coords(from.room_index);
    let mut x = from.x + dx;
    let mut y = from.y + dy;

    if x < 0 {
        x = dimensions.room_width - 1;
        room_x -= 1;
    }
    if x >= dimensions.room_width {
        x = 0;
        room_x += 1;
    }
    if y < 0 {
        y = dimensions.room_height - 1;
        room_y -= 1;
    }
    if y >= dimensions.room_height {
        y = 0;
        room_y += 1;
    }

    let Some(room_x) = wrap_axis(room_x, dimensions.world_width, dimensions.world_wrap_horizontal)
    else {
        return MoveResolution::BoundaryRejected;
    };
    let Some(room_y) = wrap_axis(room_y, dimensions.world_height, dimensions.world_wrap_vertical)
    else {
        return MoveResolution::BoundaryRejected;
    };

    MoveResolution::Candidate(Candidate {
        room_index: dimensions.room_index(room_x, room_y),
        x,
        y,
    })
}

fn wrap_axis(value: i32, extent: i32, wraps: bool) -> Option<i32> {
    if value < 0 {
        return wraps.then_some(extent - 1);
    }
    if value >= extent {
        return wraps.then_some(0);
    }
    Some(value)
}
