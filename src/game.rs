use std::thread::sleep;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::info;

use snake_arcade::session::{GameOverReason, InputEvent, Session, SessionState};
use snake_arcade::{Clock, Config, Direction::*, Flow, SystemClock};

use crate::term::TermManager;

const POLL_INTERVAL_MS: u64 = 5;

pub struct SnakeGame {
    term: TermManager,
    session: Session,
    clock: SystemClock,
    // state the overlay was last drawn for
    shown: Option<SessionState>,
}

impl SnakeGame {
    pub fn new(config: Config) -> Result<Self> {
        Ok(SnakeGame {
            term: TermManager::new()?,
            session: Session::new(config),
            clock: SystemClock::new(),
            shown: None,
        })
    }

    pub fn initialize(&mut self) -> Result<()> {
        self.term.layout(self.session.config().grid_size)?;
        self.term.setup()
    }

    pub fn restore(&mut self) -> Result<()> {
        self.term.restore()
    }

    /// Shows the key help and waits for a key. `false` when the player quit.
    pub fn show_intro(&mut self) -> Result<bool> {
        let lines = &[
            "Arrow keys or WASD to move",
            "Esc to pause, q to quit",
            "Eat apples, dodge the bomb",
            "",
            "Press any key to begin",
        ];

        self.term.show_message(lines)?;
        let quit = is_quit(&self.term.read_key_blocking()?);
        self.term.hide_message()?;
        Ok(!quit)
    }

    pub fn play(&mut self) -> Result<()> {
        if !self.show_intro()? {
            return Ok(());
        }

        info!("starting, {0}x{0} board", self.session.config().grid_size);
        self.redraw_all()?;
        self.clock.lap(); // don't charge the intro to the round

        loop {
            sleep(Duration::from_millis(POLL_INTERVAL_MS));

            let keys = self.term.read_key_events_queue()?;
            for key_ev in &keys {
                if self.handle_key(key_ev) == Flow::Exit {
                    return Ok(());
                }
            }

            let ticks = self.session.update(self.clock.lap());
            if ticks > 0 || !keys.is_empty() {
                self.render()?;
            }
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn handle_key(&mut self, ev: &KeyEvent) -> Flow {
        if is_quit(ev) {
            return self.session.handle_input(InputEvent::Exit);
        }

        let event = match ev.code {
            KeyCode::Char('w') | KeyCode::Up => InputEvent::Turn(Up),
            KeyCode::Char('a') | KeyCode::Left => InputEvent::Turn(Left),
            KeyCode::Char('s') | KeyCode::Down => InputEvent::Turn(Down),
            KeyCode::Char('d') | KeyCode::Right => InputEvent::Turn(Right),
            KeyCode::Esc => InputEvent::TogglePause,
            KeyCode::Char(' ') => InputEvent::Restart,
            KeyCode::Char(c @ '1'..='5') if self.session.state() == SessionState::GameOver => {
                self.session.set_food_count(c as usize - '0' as usize);
                self.shown = None; // redraw the box with the new count
                return Flow::Continue;
            }
            _ => return Flow::Continue,
        };

        self.session.handle_input(event)
    }

    fn redraw_all(&mut self) -> Result<()> {
        self.term.clear()?;
        self.term.layout(self.session.config().grid_size)?;
        self.term.draw_borders()?;
        self.shown = None;
        self.render()
    }

    fn render(&mut self) -> Result<()> {
        let snap = self.session.snapshot();
        self.term.draw_status(&snap)?;

        let state = snap.state;
        if self.shown == Some(state) && state != SessionState::Running {
            return Ok(());
        }

        match state {
            SessionState::Running => {
                if self.shown != Some(SessionState::Running) {
                    self.term.hide_message()?;
                }
                self.term.draw_board(&snap)?;
            }
            SessionState::Paused => {
                self.term.show_message(&["Paused", "", "Esc to resume", "q to quit"])?;
            }
            SessionState::GameOver => {
                let title = match snap.game_over {
                    Some(GameOverReason::TimeUp) => "Time's up!",
                    Some(GameOverReason::BoardFull) => "Board full!",
                    _ => "Game over!",
                };
                let score = format!("Score: {}   Best: {}", snap.score, snap.high_score);
                let apples = format!("Apples next round: {} (1-5)", snap.food_count);

                if self.shown != Some(SessionState::GameOver) && !self.term.has_message() {
                    self.term.draw_dead_snake(&snap)?;
                }
                self.term.show_message(&[title, &score, "", &apples, "Space to play again", "q to quit"])?;
            }
        }

        self.shown = Some(state);
        Ok(())
    }
}

fn is_quit(ev: &KeyEvent) -> bool {
    matches!(
        ev,
        KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL }
            | KeyEvent { code: KeyCode::Char('q'), .. }
    )
}
