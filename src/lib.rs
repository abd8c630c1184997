//! Carve a maze with a single corridor and walk it from left to right
//!
//! A maze is a square grid of [Cell]s. The generator in
//! [maze_generator] opens exactly one corridor from the left edge to the
//! right edge, and [Maze::solve] follows that corridor, marking each cell it
//! passes as [Cell::Solved].
//!
//! # Examples
//! ## Generate and solve
//! ```
//! use flood_fill_maze::{maze_generator::MazeGenerator, Cell};
//!
//! let mut gen = MazeGenerator::new(Some(7));
//! let mut maze = gen.generate_maze(14);
//! let solution = maze.solve().unwrap();
//!
//! assert!(maze.rows().flatten().all(|cell| *cell != Cell::Open));
//! solution.print_report();
//! ```
//!
//! ## Solve a maze written by hand
//! ```
//! use flood_fill_maze::{Maze, Point};
//!
//! let rows = [
//!     "# # # # # ",
//!     "      # # ",
//!     "# #   # # ",
//!     "# #       ",
//!     "# # # # # ",
//! ];
//! let mut maze = Maze::parse(&rows.join("\n")).unwrap();
//! let solution = maze.solve().unwrap();
//!
//! assert_eq!(solution.steps.first(), Some(&Point::new(1, 0)));
//! assert_eq!(solution.steps.last(), Some(&Point::new(3, 4)));
//! println!("{maze}");
//! ```

use std::fmt;

use colored::{Color, Colorize};
use itertools::Itertools;
use log::trace;
use rand::{seq::index, Rng};
use thiserror::Error;

pub mod maze_generator;

/// State of a single square in the maze
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// Not part of the corridor
    #[default]
    Wall,
    /// Carved corridor, not yet visited by the solver
    Open,
    /// Corridor visited by the solver
    Solved,
}

impl Cell {
    const S_WALL: char = '#';
    const S_OPEN: char = ' ';
    const S_SOLVED: char = '♛';

    /// Character used for this cell in the text form of a maze
    pub fn symbol(self) -> char {
        match self {
            Cell::Wall => Self::S_WALL,
            Cell::Open => Self::S_OPEN,
            Cell::Solved => Self::S_SOLVED,
        }
    }

    fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            Self::S_WALL => Some(Cell::Wall),
            Self::S_OPEN => Some(Cell::Open),
            Self::S_SOLVED => Some(Cell::Solved),
            _ => None,
        }
    }
}

/// Location in the maze
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub struct Point {
    /// Row, counted from the top
    pub y: usize,
    /// Column, counted from the left
    pub x: usize,
}

impl Point {
    pub fn new(y: usize, x: usize) -> Self {
        Self { y, x }
    }

    /// Neighbouring point in `direction`, or `None` when it would fall off
    /// the top or left edge.
    pub fn step(self, direction: Direction) -> Option<Point> {
        let (y, x) = match direction {
            Direction::Up => (self.y.checked_sub(1)?, self.x),
            Direction::Down => (self.y + 1, self.x),
            Direction::Left => (self.y, self.x.checked_sub(1)?),
            Direction::Right => (self.y, self.x + 1),
        };
        Some(Point { y, x })
    }
}

/// One of the four grid directions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions, in the order the solver tries them
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

/// Errors from reading or solving a maze
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MazeError {
    #[error("Maze is empty")]
    Empty,
    #[error("Row {row} has {len} cells, maze has {size} rows")]
    NotSquare { row: usize, len: usize, size: usize },
    #[error("Unexpected character `{symbol}` at y={y}, x={x}")]
    UnknownSymbol { symbol: char, y: usize, x: usize },
    #[error("Expected a space after the cell at y={y}, x={x}, found `{separator}`")]
    BadSeparator { separator: char, y: usize, x: usize },
    #[error("No open cell on the left edge")]
    NoEntrance,
    #[error("Corridor ends without reaching the right edge at y={y}, x={x}")]
    MalformedMaze { y: usize, x: usize },
}

/// Square grid of cells, stored row by row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    squares: Vec<Vec<Cell>>,
}

/// Result of walking the corridor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MazeSolution {
    /// Every solved cell, from the entrance to the exit
    pub steps: Vec<Point>,
}

impl Maze {
    const PALETTE: [Color; 6] = [
        Color::Red,
        Color::Green,
        Color::Yellow,
        Color::Blue,
        Color::Magenta,
        Color::Cyan,
    ];

    /// Maze of `size` × `size` walls
    pub fn new(size: usize) -> Self {
        Self {
            squares: vec![vec![Cell::Wall; size]; size],
        }
    }

    /// Side length
    pub fn size(&self) -> usize {
        self.squares.len()
    }

    /// Cell at `point`, or `None` outside the grid
    pub fn get(&self, point: Point) -> Option<Cell> {
        self.squares.get(point.y)?.get(point.x).copied()
    }

    /// Overwrite the cell at `point`.
    ///
    /// Panics if `point` is outside the grid.
    pub fn set(&mut self, point: Point, cell: Cell) {
        self.squares[point.y][point.x] = cell;
    }

    /// Rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.squares.iter().map(Vec::as_slice)
    }

    /// Row of the entrance, i.e. the open cell in the leftmost column
    pub fn find_start(&self) -> Option<usize> {
        self.squares
            .iter()
            .position(|row| row.first() == Some(&Cell::Open))
    }

    /// Number of neighbours of `point` that are walls. Neighbours outside
    /// the grid are not counted.
    pub(crate) fn wall_neighbours(&self, point: Point) -> usize {
        Direction::ALL
            .iter()
            .filter_map(|&direction| point.step(direction))
            .filter(|&neighbour| self.get(neighbour) == Some(Cell::Wall))
            .count()
    }

    /// Parse maze from its text form
    ///
    /// The text form is what [Maze]'s `Display` prints: one row per line,
    /// each cell written as its [Cell::symbol] followed by a space. Trailing
    /// whitespace may be stripped; missing cells at the end of a row are read
    /// as [Cell::Open]. The number of rows sets the size of the maze.
    ///
    /// Returns error, if a row is too long, contains unknown characters, or
    /// has anything but a single space between two cells. Rows written
    /// without separators are therefore rejected.
    pub fn parse(text: &str) -> Result<Self, MazeError> {
        let lines: Vec<&str> = text.trim_matches(['\n', '\r']).lines().collect();
        if lines.is_empty() {
            return Err(MazeError::Empty);
        }
        let size = lines.len();

        let squares = lines
            .iter()
            .enumerate()
            .map(|(y, line)| {
                let symbols: Vec<char> = line.chars().collect();
                let mut row = Vec::with_capacity(size);
                for (x, pair) in symbols.chunks(2).enumerate() {
                    let symbol = pair[0];
                    row.push(
                        Cell::from_symbol(symbol)
                            .ok_or(MazeError::UnknownSymbol { symbol, y, x })?,
                    );
                    if let Some(&separator) = pair.get(1) {
                        if separator != ' ' {
                            return Err(MazeError::BadSeparator { separator, y, x });
                        }
                    }
                }
                if row.len() > size {
                    return Err(MazeError::NotSquare {
                        row: y,
                        len: row.len(),
                        size,
                    });
                }
                row.resize(size, Cell::Open);
                Ok(row)
            })
            .collect::<Result<_, _>>()?;

        Ok(Maze { squares })
    }

    /// Solve maze
    ///
    /// Start from the open cell on the left edge and follow the corridor,
    /// trying up, down, left and right in that order. Each cell is marked
    /// [Cell::Solved] as the walk leaves it; when the walk stands next to an
    /// open cell in the rightmost column, both are marked and the walk ends.
    ///
    /// The maze is expected to hold a single corridor as produced by
    /// [maze_generator::MazeGenerator]. If the walk runs into a dead end
    /// instead, [MazeError::MalformedMaze] names the cell where it stopped.
    pub fn solve(&mut self) -> Result<MazeSolution, MazeError> {
        let size = self.size();
        let start = self.find_start().ok_or(MazeError::NoEntrance)?;
        let mut cursor = Point::new(start, 0);
        let mut steps = vec![];

        loop {
            let right = Point::new(cursor.y, cursor.x + 1);
            if cursor.x + 2 == size && self.get(right) == Some(Cell::Open) {
                self.set(cursor, Cell::Solved);
                self.set(right, Cell::Solved);
                steps.extend([cursor, right]);
                return Ok(MazeSolution { steps });
            }

            let next = Direction::ALL
                .iter()
                .filter_map(|&direction| cursor.step(direction))
                .find(|&neighbour| self.get(neighbour) == Some(Cell::Open))
                .ok_or(MazeError::MalformedMaze {
                    y: cursor.y,
                    x: cursor.x,
                })?;
            trace!("solver step {:?} -> {:?}", cursor, next);

            self.set(cursor, Cell::Solved);
            steps.push(cursor);
            cursor = next;
        }
    }

    /// Render the maze with terminal colors
    ///
    /// Two distinct colors are drawn from a fixed palette: walls use the
    /// first, every other cell the second.
    pub fn render_colored<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let picked = index::sample(rng, Self::PALETTE.len(), 2);
        let wall_color = Self::PALETTE[picked.index(0)];
        let path_color = Self::PALETTE[picked.index(1)];

        self.squares
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| {
                        let color = match cell {
                            Cell::Wall => wall_color,
                            Cell::Open | Cell::Solved => path_color,
                        };
                        format!("{} ", cell.symbol().to_string().color(color))
                    })
                    .join("")
            })
            .join("\n")
    }
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self
            .squares
            .iter()
            .map(|row| row.iter().map(|cell| format!("{} ", cell.symbol())).join(""))
            .join("\n");
        write!(f, "{}", text)
    }
}

impl MazeSolution {
    /// Print report
    pub fn print_report(&self) {
        println!("The corridor is {} cells long.", self.steps.len());
    }
}
