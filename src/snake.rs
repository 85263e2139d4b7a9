use Direction::*;

/// Width and height of the square playing field, in cells.
pub const GRID_SIZE: i32 = 20;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Position { x: self.x + dx, y: self.y + dy }
    }

    pub fn in_bounds(self) -> bool {
        (0..GRID_SIZE).contains(&self.x) && (0..GRID_SIZE).contains(&self.y)
    }

    /// Row-major index into a `GRID_SIZE * GRID_SIZE` buffer. Only meaningful in bounds.
    pub fn index(self) -> usize {
        (self.y * GRID_SIZE + self.x) as usize
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    pub fn is_opposite(self, other: Direction) -> bool {
        self.opposite() == other
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum MoveResult {
    Moved { new_head: Position, old_tail: Option<Position> },
    HitWall,
    HitSelf,
}

/// Segments in head-first order. Never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snake {
    body: Vec<Position>,
}

impl Snake {
    pub fn new(head: Position) -> Self {
        Snake { body: vec![head] }
    }

    #[cfg(test)]
    pub fn from_segments(body: Vec<Position>) -> Self {
        assert!(!body.is_empty());
        Snake { body }
    }

    pub fn body(&self) -> &[Position] {
        &self.body
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Moves one cell towards `direction`. The body is left untouched when the
    /// move crashes. The self check runs against the body as it was before the
    /// move, so stepping onto the current tail cell is a crash as well.
    pub fn move_step(&mut self, direction: Direction, grow: impl FnOnce(Position) -> bool) -> MoveResult {
        let new_head = self.head().step(direction);

        if !new_head.in_bounds() {
            return MoveResult::HitWall;
        }
        if self.occupies(new_head) {
            return MoveResult::HitSelf;
        }

        self.body.insert(0, new_head);

        if grow(new_head) {
            MoveResult::Moved { new_head, old_tail: None }
        } else {
            MoveResult::Moved { new_head, old_tail: self.body.pop() }
        }
    }
}
