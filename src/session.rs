use std::cmp::max;
use std::collections::VecDeque;
use std::time::Duration;

use log::{debug, info, warn};
use rand::rngs::ThreadRng;
use rand::Rng;

use crate::clock::{Tick, Timers};
use crate::config::{Config, FOOD_COUNT_RANGE, INITIAL_SNAKE_LENGTH};
use crate::error::GameError;
use crate::grid::Grid;
use crate::rules::{self, Collision};
use crate::snake::{Direction, Snake};
use crate::spawner::{Occupancy, Spawner};
use crate::Coords;

const START_DIRECTION: Direction = Direction::Right;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    Paused,
    GameOver,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameOverReason {
    /// Every collision found on the fatal move.
    Collision(Vec<Collision>),
    TimeUp,
    /// Nowhere left to put an apple or the bomb.
    BoardFull,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Turn(Direction),
    TogglePause,
    Pause,
    Resume,
    /// Only honoured once the round is over.
    Restart,
    Exit,
}

/// What the front end should do after an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Read-only view of a session for drawing.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub grid_size: i16,
    pub snake: &'a VecDeque<Coords>,
    pub head_char: char,
    pub food: &'a [Coords],
    pub hazard: Option<Coords>,
    pub state: SessionState,
    pub game_over: Option<&'a GameOverReason>,
    pub score: u32,
    pub high_score: u32,
    pub time_remaining: u32,
    pub food_count: usize,
}

/// One player's game: the snake, apples and bomb, the score and the two timers.
/// The high score outlives restarts.
#[derive(Debug)]
pub struct Session<R = ThreadRng> {
    config: Config,
    grid: Grid,
    spawner: Spawner<R>,
    snake: Snake,
    food: Vec<Coords>,
    hazard: Option<Coords>,
    state: SessionState,
    game_over: Option<GameOverReason>,
    score: u32,
    high_score: u32,
    time_remaining: u32,
    timers: Timers,
}

impl Session<ThreadRng> {
    pub fn new(config: Config) -> Self {
        Session::with_rng(config, rand::thread_rng())
    }
}

impl<R: Rng> Session<R> {
    pub fn with_rng(config: Config, rng: R) -> Self {
        let config = config.clamped();
        let grid = Grid::new(config.grid_size);

        let mut session = Session {
            grid,
            spawner: Spawner::new(grid, rng),
            snake: initial_snake(),
            food: Vec::with_capacity(config.food_count),
            hazard: None,
            state: SessionState::GameOver,
            game_over: None,
            score: 0,
            high_score: 0,
            time_remaining: config.countdown,
            timers: Timers::new(config.tick_interval, Duration::from_secs(1)),
            config,
        };
        session.begin_round();
        session
    }

    pub fn handle_input(&mut self, event: InputEvent) -> Flow {
        match event {
            InputEvent::Turn(direction) => self.turn(direction),
            InputEvent::TogglePause => match self.state {
                SessionState::Running => self.pause(),
                SessionState::Paused => self.resume(),
                SessionState::GameOver => {}
            },
            InputEvent::Pause => self.pause(),
            InputEvent::Resume => self.resume(),
            InputEvent::Restart => self.restart(),
            InputEvent::Exit => {
                info!("exit requested, final score {}, best {}", self.score, self.high_score);
                return Flow::Exit;
            }
        }
        Flow::Continue
    }

    /// Feeds elapsed time to the timers and runs every tick that falls due, in
    /// order. Returns how many ticks ran.
    pub fn update(&mut self, elapsed: Duration) -> usize {
        let mut budget = elapsed;
        let mut ran = 0;

        while let Some(tick) = self.timers.next_tick(&mut budget) {
            match tick {
                Tick::Movement => self.tick_movement(),
                Tick::Countdown => self.tick_countdown(),
            }
            ran += 1;
        }

        ran
    }

    /// One movement cycle: move, check collisions, then eat and restock.
    pub fn tick_movement(&mut self) {
        if self.state != SessionState::Running {
            return;
        }

        let step = match self.snake.advance(&self.food) {
            Some(step) => step,
            None => return,
        };

        let hits = rules::check(&self.snake, &self.grid, self.hazard);
        if !hits.is_empty() {
            self.end(GameOverReason::Collision(hits));
            return;
        }

        if let Some(apple) = step.eaten {
            self.eat(apple);
        }
    }

    pub fn tick_countdown(&mut self) {
        if self.state != SessionState::Running {
            return;
        }

        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining == 0 {
            self.end(GameOverReason::TimeUp);
        }
    }

    pub fn pause(&mut self) {
        if self.state == SessionState::Running {
            self.state = SessionState::Paused;
            self.timers.stop();
            info!("paused with {}s left", self.time_remaining);
        }
    }

    pub fn resume(&mut self) {
        if self.state == SessionState::Paused {
            self.state = SessionState::Running;
            self.timers.start();
            info!("resumed");
        }
    }

    pub fn restart(&mut self) {
        if self.state != SessionState::GameOver {
            debug!("restart ignored while {:?}", self.state);
            return;
        }

        self.grid = Grid::new(self.config.grid_size);
        self.spawner.set_grid(self.grid);
        self.timers = Timers::new(self.config.tick_interval, Duration::from_secs(1));
        self.begin_round();
    }

    /// Apples for the next round; the current round keeps its count.
    pub fn set_food_count(&mut self, count: usize) {
        let clamped = count.clamp(*FOOD_COUNT_RANGE.start(), *FOOD_COUNT_RANGE.end());
        if clamped != count {
            warn!(
                "{}",
                GameError::InvalidConfiguration {
                    field: "food_count",
                    value: count as u64,
                    clamped_to: clamped as u64,
                }
            );
        }
        self.config.food_count = clamped;
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            grid_size: self.grid.size(),
            snake: self.snake.body(),
            head_char: self.snake.head_char(),
            food: &self.food,
            hazard: self.hazard,
            state: self.state,
            game_over: self.game_over.as_ref(),
            score: self.score,
            high_score: self.high_score,
            time_remaining: self.time_remaining,
            food_count: self.config.food_count,
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn turn(&mut self, direction: Direction) {
        if self.state != SessionState::Running {
            return;
        }
        if let Err(err) = self.snake.turn(direction) {
            debug!("ignored: {}", err);
        }
    }

    fn begin_round(&mut self) {
        self.snake = initial_snake();
        self.food.clear();
        self.hazard = None;
        self.score = 0;
        self.time_remaining = self.config.countdown;
        self.game_over = None;
        self.timers.reset();

        if let Err(err) = self.populate() {
            warn!("could not lay out a new round: {}", err);
            self.end(GameOverReason::BoardFull);
            return;
        }

        self.state = SessionState::Running;
        self.timers.start();
        info!(
            "round started: {0}x{0} board, {1} apples, {2}s",
            self.grid.size(),
            self.config.food_count,
            self.config.countdown
        );
    }

    fn populate(&mut self) -> Result<(), GameError> {
        for _ in 0..self.config.food_count {
            let apple = self.spawner.spawn_food(&Occupancy {
                snake: self.snake.body(),
                food: &self.food,
                hazard: self.hazard,
            })?;
            self.food.push(apple);
        }
        self.place_hazard()
    }

    fn eat(&mut self, apple: Coords) {
        self.food.retain(|f| *f != apple);
        self.score += 1;
        self.high_score = max(self.high_score, self.score);
        debug!("ate apple at {:?}, score {}", apple, self.score);

        if let Err(err) = self.restock() {
            warn!("{}", err);
            self.end(GameOverReason::BoardFull);
        }
    }

    fn restock(&mut self) -> Result<(), GameError> {
        let apple = self.spawner.spawn_food(&Occupancy {
            snake: self.snake.body(),
            food: &self.food,
            hazard: self.hazard,
        })?;
        self.food.push(apple);
        self.place_hazard()
    }

    fn place_hazard(&mut self) -> Result<(), GameError> {
        let bomb = self.spawner.spawn_or_move_hazard(&Occupancy {
            snake: self.snake.body(),
            food: &self.food,
            hazard: self.hazard,
        })?;
        self.hazard = Some(bomb);
        Ok(())
    }

    fn end(&mut self, reason: GameOverReason) {
        self.timers.stop();
        self.state = SessionState::GameOver;
        info!("game over ({:?}), score {}, best {}", reason, self.score, self.high_score);
        self.game_over = Some(reason);
    }
}

impl<R> Session<R> {
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn game_over_reason(&self) -> Option<&GameOverReason> {
        self.game_over.as_ref()
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn direction(&self) -> Direction {
        self.snake.direction()
    }

    pub fn food(&self) -> &[Coords] {
        &self.food
    }

    pub fn hazard(&self) -> Option<Coords> {
        self.hazard
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn timers_running(&self) -> bool {
        self.timers.is_running()
    }

    #[doc(hidden)]
    pub fn debug_set_snake(&mut self, segments: &[Coords], direction: Direction) {
        self.snake = Snake::from_segments(segments, direction);
    }

    #[doc(hidden)]
    pub fn debug_set_food(&mut self, food: &[Coords]) {
        self.food = food.to_vec();
    }

    #[doc(hidden)]
    pub fn debug_set_hazard(&mut self, hazard: Option<Coords>) {
        self.hazard = hazard;
    }
}

fn initial_snake() -> Snake {
    Snake::new((INITIAL_SNAKE_LENGTH - 1, 0), INITIAL_SNAKE_LENGTH, START_DIRECTION)
}

/// `m:ss`, as shown in the status bar.
pub fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
