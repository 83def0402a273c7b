use std::collections::VecDeque;

use crate::config::PlayArea;

/// Grid cell in pixel units; both coordinates are multiples of the cell size.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Returns this position shifted by `velocity`.
    #[must_use]
    pub fn offset(self, velocity: Velocity) -> Self {
        Self {
            x: self.x + velocity.ox,
            y: self.y + velocity.oy,
        }
    }
}

/// Per-tick displacement. Exactly one axis is non-zero.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Velocity {
    pub ox: i32,
    pub oy: i32,
}

/// Snake body, head first.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Snake {
    body: VecDeque<Position>,
}

impl Snake {
    /// Forms the initial body of `parts + 1` segments in a row ending just
    /// left of the map centre, head first.
    #[must_use]
    pub fn formed(area: PlayArea, parts: u16) -> Self {
        let center = area.center();
        let body = (1..=i32::from(parts) + 1)
            .map(|step| Position {
                x: center.x - step * area.alpha,
                y: center.y,
            })
            .collect();

        Self { body }
    }

    /// Creates a snake from explicit body segments (front is head).
    ///
    /// # Panics
    ///
    /// Panics if `segments` is empty; every snake has a head.
    #[must_use]
    pub fn from_segments(segments: Vec<Position>) -> Self {
        assert!(!segments.is_empty(), "snake needs at least one segment");
        Self {
            body: VecDeque::from(segments),
        }
    }

    /// Returns a new snake with a head prepended one step along `velocity`.
    ///
    /// The tail is kept; the caller decides whether to drop it.
    #[must_use]
    pub fn advanced(&self, velocity: Velocity) -> Self {
        let mut body = self.body.clone();
        body.push_front(self.head().offset(velocity));
        Self { body }
    }

    /// Removes the last segment, keeping at least the head.
    pub fn drop_tail(&mut self) {
        if self.body.len() > 1 {
            let _ = self.body.pop_back();
        }
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Position {
        *self
            .body
            .front()
            .expect("snake body must always contain at least one segment")
    }

    /// Returns true if any segment occupies `position`.
    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        self.body.contains(&position)
    }

    /// Returns true if the head repeats any segment at index `skip` or later.
    #[must_use]
    pub fn head_overlaps_body(&self, skip: usize) -> bool {
        let head = self.head();
        self.body.iter().skip(skip).any(|segment| *segment == head)
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Returns true when there are no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }
}
