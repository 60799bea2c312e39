use std::fmt;

use crate::{Coords, TermInt};
use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    pub fn is_opposite(self, other: Direction) -> bool {
        self.opposite() == other
    }

    pub fn head_char(self) -> char {
        match self {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Up => "up",
            Down => "down",
            Left => "left",
            Right => "right",
        };
        f.write_str(name)
    }
}

/// Moves `pos` one cell towards `dir` on a `width` x `height` torus.
pub fn step(pos: Coords, dir: Direction, width: TermInt, height: TermInt) -> Coords {
    // u32 so that `x + width - 1` cannot overflow near u16::MAX
    let (x, y) = (pos.0 as u32, pos.1 as u32);
    let (w, h) = (width as u32, height as u32);

    let (x, y) = match dir {
        Up => (x, (y + h - 1) % h),
        Down => (x, (y + 1) % h),
        Left => ((x + w - 1) % w, y),
        Right => ((x + 1) % w, y),
    };

    (x as TermInt, y as TermInt)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snake {
    body: Vec<Coords>,
}

impl Snake {
    /// Lays out `size` segments ending at `head`, pointing towards `direction`.
    pub fn new(
        head: Coords,
        size: u16,
        direction: Direction,
        width: TermInt,
        height: TermInt,
    ) -> Self {
        let mut body = vec![head];
        let back = direction.opposite();

        for _ in 1..size.max(1) {
            let tail = step(body[0], back, width, height);
            body.insert(0, tail);
        }

        Snake { body }
    }

    #[cfg(test)]
    pub fn from_body(body: Vec<Coords>) -> Option<Self> {
        if body.is_empty() {
            None
        } else {
            Some(Snake { body })
        }
    }

    #[cfg(test)]
    pub fn body(&self) -> &[Coords] {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn head(&self) -> Coords {
        // the body is never empty
        self.body[self.body.len() - 1]
    }

    /// Everything but the head, tail first.
    pub fn tail_segments(&self) -> &[Coords] {
        &self.body[..self.body.len() - 1]
    }

    /// Pushes `new_head`; drops the oldest segment unless `grow` is set.
    /// Returns the dropped segment, if any.
    pub fn advance(&mut self, new_head: Coords, grow: bool) -> Option<Coords> {
        self.body.push(new_head);

        if grow {
            None
        } else {
            Some(self.body.remove(0))
        }
    }
}
