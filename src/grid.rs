use crate::Coords;

/// Square playing field of `size` x `size` cells. Stateless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    size: i16,
}

impl Grid {
    pub fn new(size: i16) -> Self {
        Grid { size }
    }

    pub fn size(&self) -> i16 {
        self.size
    }

    pub fn cell_count(&self) -> usize {
        self.size as usize * self.size as usize
    }

    pub fn in_bounds(&self, pos: Coords) -> bool {
        (0..self.size).contains(&pos.0) && (0..self.size).contains(&pos.1)
    }

    /// Every cell, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Coords> {
        let size = self.size;
        (0..size).flat_map(move |y| (0..size).map(move |x| (x, y)))
    }
}
