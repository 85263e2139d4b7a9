use std::time::{Duration, Instant};

use crate::{Coords, TermInt};
use crate::engine::{Command, Engine, GameState};
use crate::input::{self, Intent, SwipeTracker};
use crate::render::{self, Cell};
use crate::snake::{Direction::{self, *}, GRID_SIZE};
use crate::storage::HighScoreStore;
use crate::term::TermManager;

use anyhow::{bail, Context, Result};
use crossterm::event::Event;
use rand::rngs::StdRng;
use tracing::{debug, info};

// Terminal cells are about twice as tall as wide, so every board cell takes two columns
const CELL_WIDTH: TermInt = 2;
const BOARD_WIDTH: TermInt = GRID_SIZE as TermInt * CELL_WIDTH + 2;
const BOARD_HEIGHT: TermInt = GRID_SIZE as TermInt + 2;
const STATUS_ROWS: TermInt = 1;

const SNAKE_BODY_CHAR: char = '█';
const FOOD_GLYPH: [char; 2] = ['(', ')'];
const DEAD_SNAKE_CHAR: char = 'X';

pub type Store = Box<dyn HighScoreStore>;

#[derive(PartialEq)]
struct Frame {
    glyphs: Vec<[char; 2]>,
    status: String,
    overlay: Vec<String>,
}

pub struct SnakeGame {
    term: TermManager,
    engine: Engine<Store, StdRng>,
    swipes: SwipeTracker,
    tick: Duration,
    origin: Coords,
    drawn: Option<Frame>,
}

impl SnakeGame {
    pub fn new(engine: Engine<Store, StdRng>, tick: Duration) -> Result<Self> {
        let term = TermManager::new().context("Failed to query the terminal size")?;

        let (w, h) = term.get_terminal_size();
        if w < BOARD_WIDTH || h < BOARD_HEIGHT + STATUS_ROWS {
            bail!(
                "terminal is {}x{}, the board needs at least {}x{}",
                w, h, BOARD_WIDTH, BOARD_HEIGHT + STATUS_ROWS
            );
        }
        let origin = ((w - BOARD_WIDTH) / 2, (h - BOARD_HEIGHT - STATUS_ROWS) / 2);

        Ok(SnakeGame { term, engine, swipes: SwipeTracker::new(), tick, origin, drawn: None })
    }

    /// Runs until the player quits. The terminal is restored on every way out.
    pub fn run(&mut self) -> Result<()> {
        with_terminal(
            self,
            |game| game.term.setup().context("Failed to set up the terminal"),
            |game| game.play(),
            |game| game.term.restore().context("Failed to restore the terminal"),
        )
    }

    fn play(&mut self) -> Result<()> {
        self.term.clear()?;
        self.term.draw_borders(self.origin, (BOARD_WIDTH, BOARD_HEIGHT))?;
        self.redraw()?;

        info!(tick_ms = self.tick.as_millis() as u64, high_score = self.engine.high_score(), "game loop started");

        let mut next_tick = Instant::now() + self.tick;

        loop {
            let timeout = next_tick.saturating_duration_since(Instant::now());

            if let Some(ev) = self.term.poll_event(timeout)? {
                match self.translate(&ev) {
                    Some(Intent::Quit) => {
                        info!(score = self.engine.score(), "quit");
                        return Ok(());
                    }
                    Some(Intent::Engine(cmd)) => {
                        debug!(?cmd, "input");
                        self.engine.apply(cmd);
                    }
                    None => {}
                }
            }

            let now = Instant::now();
            if now >= next_tick {
                self.engine.apply(Command::Tick);
                next_tick += self.tick;
                // Don't try to catch up after a stall
                if next_tick < now {
                    next_tick = now + self.tick;
                }
            }

            self.redraw()?;
        }
    }

    fn translate(&mut self, ev: &Event) -> Option<Intent> {
        let state = self.engine.state();
        match ev {
            Event::Key(key) => input::translate_key(key, state),
            Event::Mouse(mouse) => self.swipes.handle_mouse(mouse, state),
            _ => None,
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn frame(&self) -> Frame {
        let state = self.engine.state();
        let direction = self.engine.direction();
        let glyphs = render::cells(self.engine.snake(), self.engine.food())
            .into_iter()
            .map(|cell| glyph(cell, state, direction))
            .collect();

        Frame {
            glyphs,
            status: format!("Score: {}   Best: {}", self.engine.score(), self.engine.high_score()),
            overlay: overlay(state, self.engine.score()),
        }
    }

    /// Prints whatever changed since the last frame.
    fn redraw(&mut self) -> Result<()> {
        let frame = self.frame();
        let prev = self.drawn.take();

        if prev.as_ref() == Some(&frame) {
            self.drawn = prev;
            return Ok(());
        }

        for (i, g) in frame.glyphs.iter().enumerate() {
            if prev.as_ref().map_or(true, |p| p.glyphs[i] != *g) {
                let pos = render::cell_position(i);
                let x = self.origin.0 + 1 + pos.x as TermInt * CELL_WIDTH;
                let y = self.origin.1 + 1 + pos.y as TermInt;
                self.term.print_at((x, y), g[0])?;
                self.term.print_at((x + 1, y), g[1])?;
            }
        }

        let status_pos = (self.origin.0, self.origin.1 + BOARD_HEIGHT);
        self.term.print_line(status_pos, &frame.status, BOARD_WIDTH)?;

        if prev.as_ref().map_or(true, |p| p.overlay != frame.overlay) {
            self.term.hide_message()?;
            if !frame.overlay.is_empty() {
                let lines: Vec<&str> = frame.overlay.iter().map(String::as_str).collect();
                self.term.show_message(&lines)?;
            }
        }

        self.term.flush()?;
        self.drawn = Some(frame);
        Ok(())
    }
}

/// Runs `body` between `setup` and `restore`. `restore` runs even when `setup`
/// failed partway, and an error from `setup` or `body` wins over one from `restore`.
fn with_terminal<T>(
    target: &mut T,
    setup: impl FnOnce(&mut T) -> Result<()>,
    body: impl FnOnce(&mut T) -> Result<()>,
    restore: impl FnOnce(&mut T) -> Result<()>,
) -> Result<()> {
    let res = setup(target).and_then(|()| body(target));
    let restored = restore(target);
    res.and(restored)
}

fn head_char(direction: Direction) -> char {
    match direction {
        Up => '^',
        Down => 'v',
        Left => '<',
        Right => '>',
    }
}

fn glyph(cell: Cell, state: GameState, direction: Direction) -> [char; 2] {
    let dead = state == GameState::GameOver;
    match cell {
        Cell::Empty => [' ', ' '],
        Cell::Food => FOOD_GLYPH,
        Cell::Body | Cell::Head if dead => [DEAD_SNAKE_CHAR, DEAD_SNAKE_CHAR],
        Cell::Body => [SNAKE_BODY_CHAR, SNAKE_BODY_CHAR],
        Cell::Head => [head_char(direction), head_char(direction)],
    }
}

fn overlay(state: GameState, score: u32) -> Vec<String> {
    match state {
        GameState::Playing => vec![],
        GameState::Idle => vec![
            "SNAKE".into(),
            "".into(),
            "Arrow keys, WASD or drag to steer".into(),
            "Space to start, P to pause".into(),
            "R to reset, Q to quit".into(),
        ],
        GameState::Paused => vec!["Paused".into(), "Space to resume".into()],
        GameState::GameOver => vec![
            "Game over!".into(),
            format!("Final score: {}", score),
            "".into(),
            "Space to play again,".into(),
            "or Q to quit.".into(),
        ],
    }
}
