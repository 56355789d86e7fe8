use thiserror::Error;

use crate::snake::Direction;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("no free cell left to spawn into after {attempts} attempts")]
    SpawnExhausted { attempts: usize },

    #[error("cannot turn from {from:?} straight back to {to:?}")]
    InvalidDirectionChange { from: Direction, to: Direction },

    #[error("{field} = {value} is out of range, using {clamped_to}")]
    InvalidConfiguration {
        field: &'static str,
        value: u64,
        clamped_to: u64,
    },
}
