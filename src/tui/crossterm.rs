use std::io::Write;

use crossterm::{
    cursor,
    event::{self, Event as CrossTermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    style, terminal, ExecutableCommand, QueueableCommand,
};
use textwrap::wrap;

use super::colors::{Rgb, Theme};
use super::events::{Event, EventSource, UserInput};
use super::renderer::{Frame, Renderer};
use crate::engine::round::{Direction, Idx, GRID};
use crate::error::{Error, Result};

/// Fixed board layout:
///
///   score: 1234    best: 56789
///
///   ╔═════════════════════════════════════╗
///   ║ xxxxxxxx xxxxxxxx xxxxxxxx xxxxxxxx ║
///   ║ xxxxxxxx xxxxxxxx xxxxxxxx xxxxxxxx ║
///   ║ xxxxxxxx xxxxxxxx xxxxxxxx xxxxxxxx ║
///   ║                                     ║
///   ║ ...three more tile rows...          ║
///   ╚═════════════════════════════════════╝
///   arrows or hjkl to move - q to quit
///
const HEADER_Y: u16 = 1;
const BOARD_X: u16 = 2;
const BOARD_Y: u16 = 3;
const BOARD_PADDING: u16 = 1;
const TILE_WIDTH: u16 = 8;
const TILE_HEIGHT: u16 = 3;
const TILE_GAP: u16 = 1;

const GRID_SPAN: u16 = GRID as u16;
const BOARD_INNER_WIDTH: u16 = GRID_SPAN * TILE_WIDTH + (GRID_SPAN - 1) * TILE_GAP + 2 * BOARD_PADDING;
const BOARD_WIDTH: u16 = BOARD_INNER_WIDTH + 2;
const BOARD_INNER_HEIGHT: u16 = GRID_SPAN * TILE_HEIGHT + (GRID_SPAN - 1) * TILE_GAP;
const BOARD_HEIGHT: u16 = BOARD_INNER_HEIGHT + 2;

const MIN_COLS: u16 = BOARD_X + BOARD_WIDTH + 1;
const MIN_ROWS: u16 = BOARD_Y + BOARD_HEIGHT + 2;

// the advisory message must fit even when the board does not
const MIN_MESSAGE_COLS: u16 = 20;
const MIN_MESSAGE_ROWS: u16 = 5;

const OVERLAY_WIDTH: u16 = 29;

pub(crate) struct Crossterm<T: Write> {
    w: Box<T>,
    theme: Theme,
    restored: bool,
}

impl<T: Write> Crossterm<T> {
    pub(crate) fn new(mut w: Box<T>, theme: Theme) -> Result<Self> {
        let (cols, rows) = terminal::size()?;
        if cols < MIN_MESSAGE_COLS || rows < MIN_MESSAGE_ROWS {
            return Err(Error::TerminalTooSmall(
                MIN_MESSAGE_COLS as usize,
                MIN_MESSAGE_ROWS as usize,
            ));
        }
        terminal::enable_raw_mode()?;
        w.execute(terminal::EnterAlternateScreen)?;
        w.execute(cursor::Hide)?;
        Ok(Self {
            w,
            theme,
            restored: false,
        })
    }

    fn restore(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;
        let _ = self.w.execute(cursor::Show);
        let _ = self.w.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

impl<T: Write> Drop for Crossterm<T> {
    fn drop(&mut self) {
        self.restore();
    }
}

impl<T: Write> Renderer for Crossterm<T> {
    fn render(&mut self, frame: &Frame) -> Result<()> {
        let (cols, rows) = terminal::size()?;
        self.w.queue(style::ResetColor)?;
        self.w.queue(terminal::Clear(terminal::ClearType::All))?;
        if cols < MIN_COLS || rows < MIN_ROWS {
            self.draw_resize_advice(cols)?;
            self.w.flush()?;
            return Ok(());
        }
        self.draw_header(frame)?;
        self.draw_board(frame)?;
        self.draw_key_hints()?;
        if frame.game_over {
            self.draw_game_over(frame)?;
        }
        self.w.queue(style::ResetColor)?;
        self.w.flush()?;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.w.execute(terminal::Clear(terminal::ClearType::All))?;
        Ok(())
    }

    fn recover(&mut self) {
        self.restore();
    }
}

// drawing
impl<T: Write> Crossterm<T> {
    fn colors(&mut self, fg: Rgb, bg: Rgb) -> Result<()> {
        self.w.queue(style::SetForegroundColor(fg.into()))?;
        self.w.queue(style::SetBackgroundColor(bg.into()))?;
        Ok(())
    }

    fn print_at(&mut self, x: u16, y: u16, s: &str) -> Result<()> {
        self.w.queue(cursor::MoveTo(x, y))?;
        self.w.queue(style::Print(s))?;
        Ok(())
    }

    fn draw_header(&mut self, frame: &Frame) -> Result<()> {
        self.colors(self.theme.text_fg, self.theme.screen_bg)?;
        self.print_at(
            BOARD_X,
            HEADER_Y,
            &format!("score: {:<8} best: {}", frame.score(), frame.record),
        )
    }

    fn draw_board(&mut self, frame: &Frame) -> Result<()> {
        self.colors(self.theme.board_bg, self.theme.screen_bg)?;
        self.draw_border(BOARD_X, BOARD_Y, BOARD_WIDTH, BOARD_HEIGHT)?;

        // the interior shows through between tiles
        self.colors(self.theme.text_fg, self.theme.board_bg)?;
        let blank = " ".repeat(BOARD_INNER_WIDTH as usize);
        for row in 1..BOARD_HEIGHT - 1 {
            self.print_at(BOARD_X + 1, BOARD_Y + row, &blank)?;
        }

        for y in 0..GRID {
            for x in 0..GRID {
                self.draw_tile(frame, x, y)?;
            }
        }
        Ok(())
    }

    fn draw_tile(&mut self, frame: &Frame, x: usize, y: usize) -> Result<()> {
        let value = frame.round.get(&Idx(x, y));
        let (bg, fg) = if value == 0 {
            (self.theme.empty_bg, self.theme.text_fg)
        } else {
            self.theme.card(value)
        };
        self.colors(fg, bg)?;
        let px = BOARD_X + 1 + BOARD_PADDING + x as u16 * (TILE_WIDTH + TILE_GAP);
        let py = BOARD_Y + 1 + y as u16 * (TILE_HEIGHT + TILE_GAP);
        for row in 0..TILE_HEIGHT {
            if row == TILE_HEIGHT / 2 && value > 0 {
                let label = format!("{:^width$}", value, width = TILE_WIDTH as usize);
                self.print_at(px, py + row, &label)?;
            } else {
                self.print_at(px, py + row, &" ".repeat(TILE_WIDTH as usize))?;
            }
        }
        Ok(())
    }

    fn draw_border(&mut self, x: u16, y: u16, width: u16, height: u16) -> Result<()> {
        let corner = boxy::Char::upper_left(boxy::Weight::Doubled);
        let horizontal: char = boxy::Char::horizontal(boxy::Weight::Doubled).into();
        let vertical: char = boxy::Char::vertical(boxy::Weight::Doubled).into();
        let bar = horizontal.to_string().repeat((width - 2) as usize);

        let mut top = String::with_capacity(width as usize);
        top.push(corner.clone().into());
        top.push_str(&bar);
        top.push(corner.clone().rotate_cw(1).into());
        self.print_at(x, y, &top)?;

        let side = vertical.to_string();
        for row in 1..height - 1 {
            self.print_at(x, y + row, &side)?;
            self.print_at(x + width - 1, y + row, &side)?;
        }

        let mut bottom = String::with_capacity(width as usize);
        bottom.push(corner.clone().rotate_ccw(1).into());
        bottom.push_str(&bar);
        bottom.push(corner.rotate_cw(2).into());
        self.print_at(x, y + height - 1, &bottom)
    }

    fn draw_key_hints(&mut self) -> Result<()> {
        self.colors(self.theme.text_fg, self.theme.screen_bg)?;
        self.print_at(
            BOARD_X,
            BOARD_Y + BOARD_HEIGHT,
            "arrows or hjkl to move - q to quit",
        )
    }

    fn draw_game_over(&mut self, frame: &Frame) -> Result<()> {
        let inner = (OVERLAY_WIDTH - 4) as usize;
        let mut lines = vec![
            String::from("no moves left"),
            String::new(),
            format!("score: {}", frame.score()),
            format!("best: {}", frame.record),
            String::new(),
        ];
        lines.extend(
            wrap("press r for a new round, q to quit", inner)
                .into_iter()
                .map(|line| line.into_owned()),
        );

        let height = lines.len() as u16 + 2;
        let x = BOARD_X + (BOARD_WIDTH - OVERLAY_WIDTH) / 2;
        let y = BOARD_Y + (BOARD_HEIGHT - height) / 2;

        self.colors(self.theme.text_fg, self.theme.screen_bg)?;
        let blank = " ".repeat(OVERLAY_WIDTH as usize);
        for row in 0..height {
            self.print_at(x, y + row, &blank)?;
        }
        self.draw_border(x, y, OVERLAY_WIDTH, height)?;
        for (i, line) in lines.iter().enumerate() {
            let centered = format!("{:^width$}", line, width = inner);
            self.print_at(x + 2, y + 1 + i as u16, &centered)?;
        }
        Ok(())
    }

    fn draw_resize_advice(&mut self, cols: u16) -> Result<()> {
        let msg = format!(
            "deluxe48 needs at least {} x {} to draw the board; try resizing your terminal",
            MIN_COLS, MIN_ROWS
        );
        let wrap_width = (cols.max(MIN_MESSAGE_COLS) - 2) as usize;
        for (i, line) in wrap(&msg, wrap_width).iter().enumerate() {
            self.print_at(1, 1 + i as u16, line)?;
        }
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct CrosstermEvents {}

impl EventSource for CrosstermEvents {
    /// Block until the next event the game cares about.
    fn next_event(&self) -> Result<Event> {
        loop {
            match event::read()? {
                CrossTermEvent::Key(ke) => match handle_key_event(ke) {
                    Some(input) => return Ok(Event::UserInput(input)),
                    None => continue,
                },
                CrossTermEvent::Resize(_, _) => return Ok(Event::Resize),
                _ => continue,
            }
        }
    }
}

fn handle_key_event(ke: KeyEvent) -> Option<UserInput> {
    if ke.kind == KeyEventKind::Release {
        return None;
    }
    if ke.code == KeyCode::Char('c') && ke.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(UserInput::Quit);
    }
    match ke.code {
        KeyCode::Left | KeyCode::Char('h') => Some(UserInput::Direction(Direction::Left)),
        KeyCode::Right | KeyCode::Char('l') => Some(UserInput::Direction(Direction::Right)),
        KeyCode::Up | KeyCode::Char('k') => Some(UserInput::Direction(Direction::Up)),
        KeyCode::Down | KeyCode::Char('j') => Some(UserInput::Direction(Direction::Down)),
        KeyCode::Char('r') | KeyCode::Enter => Some(UserInput::Restart),
        KeyCode::Char('q') | KeyCode::Esc => Some(UserInput::Quit),
        _ => None,
    }
}
