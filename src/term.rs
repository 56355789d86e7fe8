use std::io::{stdout, Stdout, Write};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use crossterm::event::{poll, read, Event, KeyEvent};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, terminal};

use snake_arcade::session::{format_time, Snapshot};
use snake_arcade::Coords;

pub type TermInt = u16;
pub type TermPos = (TermInt, TermInt);

// Status text line plus a blank spacer above the board.
const STATUS_ROWS: TermInt = 2;
// Terminal characters are about twice as tall as they are wide.
const CELL_WIDTH: TermInt = 2;

const SNAKE_BODY: &str = "██";
const APPLE: &str = "()";
const BOMB: &str = "**";
const EMPTY: &str = "  ";

pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    screen: Vec<char>,
    current_msg: Option<Message>,
    board: Option<Board>,
}

struct Message {
    top_left: TermPos,
    width: TermInt,
    height: TermInt,
}

// Where the playing field sits on screen, borders excluded.
#[derive(Clone, Copy)]
struct Board {
    top_left: TermPos,
    cells: TermInt,
}

impl TermManager {
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size().context("reading terminal size")?;
        let stdout = stdout();
        let screen = vec![' '; width as usize * height as usize];
        Ok(TermManager { width, height, stdout, screen, current_msg: None, board: None })
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen).context("entering alternate screen")?;
        terminal::enable_raw_mode().context("enabling raw mode")?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking).context("hiding cursor")?;
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        terminal::disable_raw_mode().context("disabling raw mode")?;
        execute!(self.stdout, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
            .context("leaving alternate screen")?;
        Ok(())
    }

    pub fn read_key_blocking(&self) -> Result<KeyEvent> {
        loop {
            if let Event::Key(ev) = read()? {
                return Ok(ev);
            }
        }
    }

    pub fn read_key_events_queue(&self) -> Result<Vec<KeyEvent>> {
        let mut events = vec![];

        while poll(Duration::from_millis(1))? {
            if let Event::Key(ev) = read()? {
                events.push(ev);
            }
        }

        Ok(events)
    }

    /// Centres a board of `grid_size` cells, failing when the terminal is too
    /// small to show it.
    pub fn layout(&mut self, grid_size: i16) -> Result<()> {
        let cells = grid_size as TermInt;
        let need_w = cells * CELL_WIDTH + 2;
        let need_h = cells + 2 + STATUS_ROWS;
        if need_w > self.width || need_h > self.height {
            bail!(
                "terminal is {}x{}, a {}x{} board needs at least {}x{}",
                self.width,
                self.height,
                cells,
                cells,
                need_w,
                need_h
            );
        }

        let left = (self.width - need_w) / 2 + 1;
        let top = (self.height - need_h) / 2 + STATUS_ROWS + 1;
        self.board = Some(Board { top_left: (left, top), cells });
        Ok(())
    }

    pub fn draw_borders(&mut self) -> Result<()> {
        let board = match self.board {
            Some(board) => board,
            None => return Ok(()),
        };

        let (left, top) = (board.top_left.0 - 1, board.top_left.1 - 1);
        let end_x = left + board.cells * CELL_WIDTH + 1;
        let end_y = top + board.cells + 1;

        for x in left..=end_x {
            let ch = if x == left || x == end_x { '+' } else { '-' };
            self.print_at((x, top), ch)?;
            self.print_at((x, end_y), ch)?;
        }

        for y in top + 1..end_y {
            self.print_at((left, y), '|')?;
            self.print_at((end_x, y), '|')?;
        }

        self.flush()
    }

    pub fn draw_status(&mut self, snap: &Snapshot) -> Result<()> {
        let board = match self.board {
            Some(board) => board,
            None => return Ok(()),
        };

        let line = format!(
            "Score {:<4} Best {:<4} Time {}",
            snap.score,
            snap.high_score,
            format_time(snap.time_remaining)
        );
        let row = board.top_left.1 - 1 - STATUS_ROWS;
        let width = board.cells * CELL_WIDTH + 2;
        let padded = format!("{line: ^width$}", line = line, width = width as usize);
        self.print_str_at((board.top_left.0 - 1, row), &padded)?;
        self.flush()
    }

    /// Redraws every cell of the board from `snap`.
    pub fn draw_board(&mut self, snap: &Snapshot) -> Result<()> {
        let board = match self.board {
            Some(board) => board,
            None => return Ok(()),
        };

        let cells = board.cells as i16;
        for y in 0..cells {
            for x in 0..cells {
                self.print_str_at(board.cell_pos((x, y)), EMPTY)?;
            }
        }

        for pos in snap.food {
            self.print_cell(&board, *pos, APPLE, Some(Color::Red))?;
        }
        if let Some(bomb) = snap.hazard {
            self.print_cell(&board, bomb, BOMB, Some(Color::DarkYellow))?;
        }

        let len = snap.snake.len();
        for (i, pos) in snap.snake.iter().enumerate() {
            if i + 1 == len {
                let head: String = [snap.head_char, snap.head_char].iter().collect();
                self.print_cell(&board, *pos, &head, Some(Color::Cyan))?;
            } else {
                self.print_cell(&board, *pos, SNAKE_BODY, Some(Color::DarkCyan))?;
            }
        }

        self.flush()
    }

    /// Marks the snake as dead, leaving off any segment outside the board.
    pub fn draw_dead_snake(&mut self, snap: &Snapshot) -> Result<()> {
        let board = match self.board {
            Some(board) => board,
            None => return Ok(()),
        };

        for pos in snap.snake.iter() {
            self.print_cell(&board, *pos, "XX", None)?;
        }
        self.flush()
    }

    pub fn show_message(&mut self, lines: &[&str]) -> Result<()> {
        if self.has_message() {
            self.hide_message()?;
        }

        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 2) as TermInt;
        let center = (self.width / 2, self.height / 2);
        let top_left = (
            center.0.saturating_sub(msg_width / 2),
            center.1.saturating_sub(msg_height / 2),
        );

        // Print the top and bottom empty lines
        for y in [top_left.1, top_left.1 + msg_height - 1].iter() {
            for x_diff in 0..msg_width {
                self.print_at_no_save((top_left.0 + x_diff, *y), ' ')?;
            }
        }

        // Print the message lines
        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            for (x_diff, ch) in padded_line.chars().enumerate() {
                self.print_at_no_save((top_left.0 + x_diff as TermInt, y), ch)?;
            }
        }

        self.current_msg = Some(Message { width: msg_width, height: msg_height, top_left });
        self.flush()
    }

    pub fn hide_message(&mut self) -> Result<()> {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return Ok(()),
        };

        // Restore the content from the screen buffer
        for y_diff in 0..msg.height {
            for x_diff in 0..msg.width {
                let (x, y) = (msg.top_left.0 + x_diff, msg.top_left.1 + y_diff);
                let ch = self.screen.get(self.index((x, y))).copied().unwrap_or(' ');
                self.print_at_no_save((x, y), ch)?;
            }
        }

        self.flush()
    }

    pub fn clear(&mut self) -> Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All))?;
        self.screen = vec![' '; self.width as usize * self.height as usize];
        self.current_msg = None;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stdout.flush()?;
        Ok(())
    }

    pub fn has_message(&self) -> bool {
        self.current_msg.is_some()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn print_cell(&mut self, board: &Board, pos: Coords, glyph: &str, color: Option<Color>) -> Result<()> {
        if !board.contains(pos) {
            return Ok(());
        }

        if let Some(color) = color {
            queue!(self.stdout, SetForegroundColor(color))?;
        }
        self.print_str_at(board.cell_pos(pos), glyph)?;
        if color.is_some() {
            queue!(self.stdout, ResetColor)?;
        }
        Ok(())
    }

    fn print_str_at(&mut self, pos: TermPos, s: &str) -> Result<()> {
        for (i, ch) in s.chars().enumerate() {
            self.print_at((pos.0 + i as TermInt, pos.1), ch)?;
        }
        Ok(())
    }

    fn print_at(&mut self, pos: TermPos, ch: char) -> Result<()> {
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), Print(ch))?;
        let idx = self.index(pos);
        if let Some(cell) = self.screen.get_mut(idx) {
            *cell = ch;
        }
        Ok(())
    }

    fn print_at_no_save(&mut self, pos: TermPos, ch: char) -> Result<()> {
        // For message boxes, so the buffer still holds what lies underneath
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), Print(ch))?;
        Ok(())
    }

    fn index(&self, pos: TermPos) -> usize {
        self.width as usize * pos.1 as usize + pos.0 as usize
    }
}

impl Board {
    fn contains(&self, pos: Coords) -> bool {
        let cells = self.cells as i16;
        (0..cells).contains(&pos.0) && (0..cells).contains(&pos.1)
    }

    fn cell_pos(&self, pos: Coords) -> TermPos {
        (self.top_left.0 + pos.0 as TermInt * CELL_WIDTH, self.top_left.1 + pos.1 as TermInt)
    }
}
