use std::collections::VecDeque;

use crate::error::GameError;
use crate::Coords;
use Direction::*;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    pub fn delta(self) -> (i16, i16) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }
}

/// Outcome of a single [`Snake::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub new_head: Coords,
    pub old_head: Coords,
    /// The segment dropped from the tail, `None` when the snake grew.
    pub old_tail: Option<Coords>,
    pub eaten: Option<Coords>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    // front = tail, back = head
    body: VecDeque<Coords>,
    direction: Direction,
    // heading of the last completed move, reversal is judged against it
    moved: Direction,
}

impl Snake {
    /// Lays out `size` segments ending at `head`, trailing away from `direction`.
    pub fn new(head: Coords, size: i16, direction: Direction) -> Self {
        let diff = direction.delta();

        let body = (0..size)
            .rev()
            .map(|i| (head.0 - diff.0 * i, head.1 - diff.1 * i))
            .collect();
        Snake { body, direction, moved: direction }
    }

    /// Builds a snake from explicit segments, tail first.
    pub fn from_segments(segments: &[Coords], direction: Direction) -> Self {
        Snake { body: segments.iter().copied().collect(), direction, moved: direction }
    }

    pub fn body(&self) -> &VecDeque<Coords> {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn head(&self) -> Option<Coords> {
        self.body.back().copied()
    }

    /// Head plus one step in the current direction.
    pub fn next_head(&self) -> Option<Coords> {
        let (x, y) = self.head()?;
        let (dx, dy) = self.direction.delta();
        Some((x + dx, y + dy))
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn turn(&mut self, new_direction: Direction) -> Result<(), GameError> {
        if new_direction == self.moved.opposite() {
            return Err(GameError::InvalidDirectionChange { from: self.moved, to: new_direction });
        }

        self.direction = new_direction;
        Ok(())
    }

    /// Moves one cell. The new head is always pushed; the tail is only dropped
    /// when the new head did not land on any of `food`.
    pub fn advance(&mut self, food: &[Coords]) -> Option<Step> {
        let old_head = self.head()?;
        let new_head = self.next_head()?;

        self.body.push_back(new_head);
        self.moved = self.direction;

        let eaten = food.iter().copied().find(|f| *f == new_head);
        let old_tail = match eaten {
            Some(_) => None,
            None => self.body.pop_front(),
        };

        Some(Step { new_head, old_head, old_tail, eaten })
    }

    /// Whether the head shares a cell with any other segment.
    pub fn bites_itself(&self) -> bool {
        match self.head() {
            Some(head) => self.body.iter().rev().skip(1).any(|seg| *seg == head),
            None => false,
        }
    }

    pub fn head_char(&self) -> char {
        match self.direction {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}
