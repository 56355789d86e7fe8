use crate::grid::Grid;
use crate::snake::Snake;
use crate::Coords;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    SelfBite,
    Wall,
    Hazard,
}

/// Every collision the head is in after a move. All checks run even once one
/// hits, so the report names each cause; any entry ends the session.
pub fn check(snake: &Snake, grid: &Grid, hazard: Option<Coords>) -> Vec<Collision> {
    let mut hits = Vec::new();
    let head = match snake.head() {
        Some(head) => head,
        None => return hits,
    };

    if snake.bites_itself() {
        hits.push(Collision::SelfBite);
    }
    if !grid.in_bounds(head) {
        hits.push(Collision::Wall);
    }
    if hazard == Some(head) {
        hits.push(Collision::Hazard);
    }

    hits
}
