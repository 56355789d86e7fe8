use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use log::{warn, LevelFilter};

use crate::error::GameError;

pub const GRID_SIZE_RANGE: RangeInclusive<i16> = 5..=30;
pub const FOOD_COUNT_RANGE: RangeInclusive<usize> = 1..=5;
pub const TICK_MS_RANGE: RangeInclusive<u64> = 20..=2000;
pub const COUNTDOWN_SECS_RANGE: RangeInclusive<u32> = 1..=3600;

pub const INITIAL_SNAKE_LENGTH: i16 = 3;

/// Board and food presets. Both play by the same rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Variant {
    /// 15x15 board, three apples
    Classic,
    /// 20x20 board, a single apple
    Minimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub grid_size: i16,
    /// Apples on the board at once.
    pub food_count: usize,
    /// Time between snake moves.
    pub tick_interval: Duration,
    /// Length of a round, in whole seconds.
    pub countdown: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            grid_size: 15,
            food_count: 3,
            tick_interval: Duration::from_millis(100),
            countdown: 30,
        }
    }
}

impl Config {
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Classic => Config::default(),
            Variant::Minimal => Config { grid_size: 20, food_count: 1, ..Config::default() },
        }
    }

    /// First out-of-range field, if any.
    pub fn validate(&self) -> Result<(), GameError> {
        match self.out_of_range().into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Pulls every field into its supported range, warning about each one moved.
    pub fn clamped(self) -> Self {
        for err in self.out_of_range() {
            warn!("{}", err);
        }

        Config {
            grid_size: clamp(self.grid_size, &GRID_SIZE_RANGE),
            food_count: clamp(self.food_count, &FOOD_COUNT_RANGE),
            tick_interval: Duration::from_millis(clamp(tick_ms(self.tick_interval), &TICK_MS_RANGE)),
            countdown: clamp(self.countdown, &COUNTDOWN_SECS_RANGE),
        }
    }

    fn out_of_range(&self) -> Vec<GameError> {
        let ms = tick_ms(self.tick_interval);
        [
            check("grid_size", self.grid_size, &GRID_SIZE_RANGE),
            check("food_count", self.food_count, &FOOD_COUNT_RANGE),
            check("tick_interval_ms", ms, &TICK_MS_RANGE),
            check("countdown", self.countdown, &COUNTDOWN_SECS_RANGE),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

fn tick_ms(interval: Duration) -> u64 {
    u64::try_from(interval.as_millis()).unwrap_or(u64::MAX)
}

fn clamp<T: Ord + Copy>(value: T, range: &RangeInclusive<T>) -> T {
    value.clamp(*range.start(), *range.end())
}

fn check<T>(field: &'static str, value: T, range: &RangeInclusive<T>) -> Option<GameError>
where
    T: Ord + Copy + TryInto<u64>,
{
    if range.contains(&value) {
        return None;
    }
    let as_u64 = |v: T| TryInto::<u64>::try_into(v).unwrap_or(0);
    Some(GameError::InvalidConfiguration {
        field,
        value: as_u64(value),
        clamped_to: as_u64(clamp(value, range)),
    })
}

/// Timed snake in the terminal.
#[derive(Debug, Parser)]
#[command(version)]
pub struct Cli {
    /// Board and apple preset
    #[arg(long, value_enum, default_value_t = Variant::Classic)]
    pub variant: Variant,

    /// Apples on the board at once (1-5)
    #[arg(long)]
    pub foods: Option<usize>,

    /// Board width and height in cells
    #[arg(long)]
    pub grid_size: Option<i16>,

    /// Milliseconds between snake moves
    #[arg(long)]
    pub tick_ms: Option<u64>,

    /// Round length in seconds
    #[arg(long)]
    pub countdown: Option<u32>,

    /// Where to write the log
    #[arg(long, default_value = "snake-arcade.log")]
    pub log_file: PathBuf,

    /// Log verbosity
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

impl Cli {
    /// Variant preset overridden by any explicit flags, then clamped.
    pub fn config(&self) -> Config {
        let mut config = Config::for_variant(self.variant);
        if let Some(foods) = self.foods {
            config.food_count = foods;
        }
        if let Some(size) = self.grid_size {
            config.grid_size = size;
        }
        if let Some(ms) = self.tick_ms {
            config.tick_interval = Duration::from_millis(ms);
        }
        if let Some(secs) = self.countdown {
            config.countdown = secs;
        }
        config.clamped()
    }
}
