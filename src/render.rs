use crate::snake::{Position, Snake, GRID_SIZE};

pub const CELL_COUNT: usize = (GRID_SIZE * GRID_SIZE) as usize;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Body,
    Head,
    Food,
}

/// Row-major occupancy of the whole board. Food wins over the head, the head
/// over the body, so food placed on the snake stays visible.
pub fn cells(snake: &Snake, food: Position) -> Vec<Cell> {
    let mut grid = vec![Cell::Empty; CELL_COUNT];

    for pos in snake.body()[1..].iter().filter(|p| p.in_bounds()) {
        grid[pos.index()] = Cell::Body;
    }

    let head = snake.head();
    if head.in_bounds() {
        grid[head.index()] = Cell::Head;
    }

    if food.in_bounds() {
        grid[food.index()] = Cell::Food;
    }

    grid
}

pub fn cell_position(index: usize) -> Position {
    let i = index as i32;
    Position::new(i % GRID_SIZE, i / GRID_SIZE)
}
