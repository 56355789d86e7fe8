use std::collections::VecDeque;

use log::debug;
use rand::seq::IteratorRandom;
use rand::Rng;

use crate::error::GameError;
use crate::grid::Grid;
use crate::Coords;

/// Random draws per cell on the board before giving up on rejection sampling.
const ATTEMPTS_PER_CELL: usize = 8;

/// Everything a new entity must not land on.
#[derive(Debug, Clone, Copy)]
pub struct Occupancy<'a> {
    pub snake: &'a VecDeque<Coords>,
    pub food: &'a [Coords],
    pub hazard: Option<Coords>,
}

impl Occupancy<'_> {
    pub fn is_position_occupied(&self, pos: Coords) -> bool {
        self.snake.contains(&pos) || self.food.contains(&pos) || self.hazard == Some(pos)
    }
}

#[derive(Debug, Clone)]
pub struct Spawner<R> {
    rng: R,
    grid: Grid,
}

impl<R: Rng> Spawner<R> {
    pub fn new(grid: Grid, rng: R) -> Self {
        Spawner { rng, grid }
    }

    pub fn set_grid(&mut self, grid: Grid) {
        self.grid = grid;
    }

    pub fn max_attempts(&self) -> usize {
        self.grid.cell_count() * ATTEMPTS_PER_CELL
    }

    pub fn spawn_food(&mut self, occupied: &Occupancy) -> Result<Coords, GameError> {
        self.free_cell(occupied)
    }

    /// Places the hazard on a fresh free cell. When a hazard is already on the
    /// board its current cell counts as occupied, so it always relocates.
    pub fn spawn_or_move_hazard(&mut self, occupied: &Occupancy) -> Result<Coords, GameError> {
        self.free_cell(occupied)
    }

    fn free_cell(&mut self, occupied: &Occupancy) -> Result<Coords, GameError> {
        let size = self.grid.size();
        let attempts = self.max_attempts();

        for _ in 0..attempts {
            let pos = (self.rng.gen_range(0..size), self.rng.gen_range(0..size));
            if !occupied.is_position_occupied(pos) {
                return Ok(pos);
            }
        }

        // A crowded board can defeat random draws while a few cells are still
        // free, so fall back to picking among the cells that are left.
        debug!("rejection sampling gave up after {} draws, scanning", attempts);
        self.grid
            .cells()
            .filter(|pos| !occupied.is_position_occupied(*pos))
            .choose(&mut self.rng)
            .ok_or(GameError::SpawnExhausted { attempts })
    }
}
