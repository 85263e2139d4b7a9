use rand::Rng;
use tracing::{debug, info, warn};

use crate::snake::{Direction, MoveResult, Position, Snake, GRID_SIZE};
use crate::storage::HighScoreStore;

pub const SCORE_PER_FOOD: u32 = 10;
pub const FOOD_PLACEMENT_ATTEMPTS: usize = 100;

const INITIAL_HEAD: Position = Position::new(10, 10);
const INITIAL_FOOD: Position = Position::new(15, 15);
const INITIAL_DIRECTION: Direction = Direction::Right;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameState {
    Idle,
    Playing,
    Paused,
    GameOver,
}

/// Everything that may change the engine, queued up by the owning loop.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Tick,
    Turn(Direction),
    Start,
    Pause,
    Reset,
}

pub struct Engine<S, R> {
    snake: Snake,
    food: Position,
    direction: Direction,
    // Direction of the last completed move; turns are checked against it too.
    heading: Direction,
    state: GameState,
    score: u32,
    high_score: u32,
    store: S,
    rng: R,
}

impl<S: HighScoreStore, R: Rng> Engine<S, R> {
    /// Reads the stored high score once. An absent or unreadable value counts as 0.
    pub fn new(store: S, rng: R) -> Self {
        let high_score = match store.load() {
            Ok(value) => value.unwrap_or(0),
            Err(e) => {
                warn!("ignoring stored high score: {:#}", e);
                0
            }
        };

        Engine {
            snake: Snake::new(INITIAL_HEAD),
            food: INITIAL_FOOD,
            direction: INITIAL_DIRECTION,
            heading: INITIAL_DIRECTION,
            state: GameState::Idle,
            score: 0,
            high_score,
            store,
            rng,
        }
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Tick => self.advance(),
            Command::Turn(dir) => self.set_direction(dir),
            Command::Start => self.start(),
            Command::Pause => self.pause(),
            Command::Reset => self.reset(),
        }
    }

    pub fn advance(&mut self) {
        if self.state != GameState::Playing {
            return;
        }

        let food = self.food;
        match self.snake.move_step(self.direction, |head| head == food) {
            MoveResult::HitWall | MoveResult::HitSelf => {
                self.state = GameState::GameOver;
                info!(score = self.score, length = self.snake.len(), "game over");
            }
            MoveResult::Moved { new_head, old_tail } => {
                self.heading = self.direction;
                if old_tail.is_none() {
                    self.eat(new_head);
                }
            }
        }
    }

    fn eat(&mut self, at: Position) {
        self.score += SCORE_PER_FOOD;

        if self.score > self.high_score {
            self.high_score = self.score;
            if let Err(e) = self.store.save(self.high_score) {
                warn!("failed to persist high score {}: {:#}", self.high_score, e);
            }
        }

        self.food = generate_food(&mut self.rng, &self.snake);
        debug!(score = self.score, at = ?at, next_food = ?self.food, "food eaten");
    }

    /// Ignores the reverse of the pending direction. Unlike a plain pending-only
    /// check, the reverse of the last move actually made is refused as well, so
    /// Up then Left inside one tick while heading Right still moves Up.
    pub fn set_direction(&mut self, direction: Direction) {
        if direction.is_opposite(self.direction) || direction.is_opposite(self.heading) {
            return;
        }
        self.direction = direction;
    }

    pub fn start(&mut self) {
        if matches!(self.state, GameState::Idle | GameState::Paused) {
            self.state = GameState::Playing;
            info!("playing");
        }
    }

    pub fn pause(&mut self) {
        if self.state == GameState::Playing {
            self.state = GameState::Paused;
            info!(score = self.score, "paused");
        }
    }

    pub fn reset(&mut self) {
        self.snake = Snake::new(INITIAL_HEAD);
        self.food = INITIAL_FOOD;
        self.direction = INITIAL_DIRECTION;
        self.heading = INITIAL_DIRECTION;
        self.score = 0;
        if self.state != GameState::Idle {
            info!("reset");
        }
        self.state = GameState::Idle;
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Position {
        self.food
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }
}

/// Samples random cells until one is off the snake. Gives up after
/// `FOOD_PLACEMENT_ATTEMPTS` and returns the last sample, which may sit on the
/// snake when the grid is nearly full.
pub fn generate_food<R: Rng + ?Sized>(rng: &mut R, snake: &Snake) -> Position {
    let mut pos = INITIAL_FOOD;
    for _ in 0..FOOD_PLACEMENT_ATTEMPTS {
        pos = Position::new(rng.gen_range(0..GRID_SIZE), rng.gen_range(0..GRID_SIZE));
        if !snake.occupies(pos) {
            break;
        }
    }
    pos
}
