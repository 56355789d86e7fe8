//! Timed single-player snake: grid, spawner, motion, collision rules and the
//! session state machine that ties them together. Rendering and input live in
//! the binary.

pub mod clock;
pub mod config;
pub mod error;
pub mod grid;
pub mod rules;
pub mod session;
pub mod snake;
pub mod spawner;

/// A cell on the board as `(col, row)`. Signed so a head that leaves the
/// board through the top or left edge is still representable.
pub type Coords = (i16, i16);

pub use clock::{Clock, SystemClock, Tick, Timers};
pub use config::{Config, Variant};
pub use error::GameError;
pub use grid::Grid;
pub use rules::Collision;
pub use session::{Flow, GameOverReason, InputEvent, Session, SessionState, Snapshot};
pub use snake::{Direction, Snake};
pub use spawner::Spawner;
