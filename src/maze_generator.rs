//! Maze generation

use log::debug;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{Cell, Direction, Maze, Point};

/// Random walk maze generator.
pub struct MazeGenerator<R = StdRng> {
    random: R,
}

impl MazeGenerator<StdRng> {
    pub fn new(seed: Option<u64>) -> Self {
        Self::from_rng(if let Some(state) = seed {
            StdRng::seed_from_u64(state)
        } else {
            StdRng::from_entropy()
        })
    }
}

impl<R: Rng> MazeGenerator<R> {
    /// Rejected moves in a row before the walk starts over
    pub const STALL_LIMIT: usize = 100;

    pub fn from_rng(random: R) -> Self {
        Self { random }
    }

    /// Generate maze with a single corridor from the left edge to the right
    ///
    /// The entrance is a random row on the left edge. From there a cursor
    /// takes random steps, and a step is taken only if the new cell lies
    /// inside the border, is still a wall, and has exactly three wall
    /// neighbours; the fourth neighbour is the cursor itself. This keeps the
    /// corridor one cell wide and stops it from touching itself. The first
    /// step into the rightmost column opens the exit and ends the walk.
    ///
    /// After [Self::STALL_LIMIT] steps in a row are turned down by the
    /// neighbour rule, the walk starts over from the same entrance.
    ///
    /// Panics if `size` is less than 3.
    pub fn generate_maze(&mut self, size: usize) -> Maze {
        assert!(size >= 3, "maze size must be at least 3, got {size}");

        let start = self.random.gen_range(1..=size - 2);
        let mut maze = Self::entrance(size, start);
        let mut cursor = Point::new(start, 1);
        let mut stalls = 0;
        let mut restarts = 0;

        loop {
            let direction = Direction::ALL[self.random.gen_range(0..Direction::ALL.len())];
            let Some(candidate) = cursor.step(direction) else {
                continue;
            };

            // The rightmost column is reached by stepping right, and that
            // step always finishes the maze
            if candidate.x == size - 1 {
                maze.set(candidate, Cell::Open);
                debug!("carved {size}x{size} maze from row {start} after {restarts} restarts");
                return maze;
            }

            if candidate.y == 0 || candidate.y == size - 1 || candidate.x == 0 {
                continue;
            }
            if maze.get(candidate) == Some(Cell::Open) {
                continue;
            }

            if maze.wall_neighbours(candidate) == 3 {
                maze.set(candidate, Cell::Open);
                cursor = candidate;
                stalls = 0;
            } else {
                stalls += 1;
                if stalls >= Self::STALL_LIMIT {
                    restarts += 1;
                    debug!("walk stuck at {:?}, starting over ({restarts})", cursor);
                    maze = Self::entrance(size, start);
                    cursor = Point::new(start, 1);
                    stalls = 0;
                }
            }
        }
    }

    /// Wall-filled maze with the entrance and the cell right of it opened
    fn entrance(size: usize, start: usize) -> Maze {
        let mut maze = Maze::new(size);
        maze.set(Point::new(start, 0), Cell::Open);
        maze.set(Point::new(start, 1), Cell::Open);
        maze
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use itertools::Itertools;
    use rand::{rngs::StdRng, RngCore, SeedableRng};

    use crate::{maze_generator::MazeGenerator, Cell, Direction, Maze, Point};

    /// Replays fixed draws. A draw of `n << 62` makes `gen_range` over four
    /// values return `n`, and a draw of 0 makes any `gen_range` return its
    /// lower bound.
    struct ScriptedRng {
        draws: std::vec::IntoIter<u64>,
    }

    impl ScriptedRng {
        /// Entrance on row 1, followed by `moves`
        fn new(moves: &[Direction]) -> Self {
            let draws = std::iter::once(0)
                .chain(moves.iter().map(|&direction| {
                    let index = Direction::ALL
                        .iter()
                        .position(|&d| d == direction)
                        .unwrap();
                    (index as u64) << 62
                }))
                .collect_vec();
            Self {
                draws: draws.into_iter(),
            }
        }
    }

    impl RngCore for ScriptedRng {
        fn next_u32(&mut self) -> u32 {
            (self.next_u64() >> 32) as u32
        }

        fn next_u64(&mut self) -> u64 {
            self.draws.next().expect("script ran out of draws")
        }

        fn fill_bytes(&mut self, _dest: &mut [u8]) {
            unimplemented!()
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    fn carve(size: usize, moves: &[Direction]) -> Maze {
        MazeGenerator::from_rng(ScriptedRng::new(moves)).generate_maze(size)
    }

    fn maze_with_corridor(size: usize, cells: &[(usize, usize)]) -> Maze {
        let mut maze = Maze::new(size);
        for &(y, x) in cells {
            maze.set(Point::new(y, x), Cell::Open);
        }
        maze
    }

    fn corridor(maze: &Maze) -> Vec<Point> {
        maze.rows()
            .enumerate()
            .flat_map(|(y, row)| {
                row.iter()
                    .enumerate()
                    .filter(|(_, cell)| **cell != Cell::Wall)
                    .map(move |(x, _)| Point::new(y, x))
            })
            .collect()
    }

    fn corridor_neighbours(maze: &Maze, point: Point) -> usize {
        Direction::ALL
            .iter()
            .filter_map(|&d| point.step(d))
            .filter(|&p| matches!(maze.get(p), Some(Cell::Open) | Some(Cell::Solved)))
            .count()
    }

    /// Check the layout every generated maze must have
    fn assert_single_corridor(maze: &Maze) {
        let size = maze.size();
        let cells = corridor(maze);

        assert_eq!(cells.iter().filter(|p| p.x == 0).count(), 1);
        assert_eq!(cells.iter().filter(|p| p.x == size - 1).count(), 1);
        assert!(cells.iter().all(|p| p.y != 0 && p.y != size - 1));

        for point in cells {
            let expected = if point.x == 0 || point.x == size - 1 {
                1
            } else {
                2
            };
            assert_eq!(
                corridor_neighbours(maze, point),
                expected,
                "bad corridor at {:?}\n{}",
                point,
                maze
            );
        }
    }

    #[test]
    fn smallest_maze_is_a_straight_line() {
        let mut gen = MazeGenerator::new(Some(0));
        let mut maze = gen.generate_maze(3);

        let expected = Maze::parse("# # # \n      \n# # # ").unwrap();
        assert_eq!(maze, expected);

        let solution = maze.solve().unwrap();
        assert_eq!(
            solution.steps,
            vec![Point::new(1, 0), Point::new(1, 1), Point::new(1, 2)]
        );
    }

    #[test]
    fn scripted_walk_carves_requested_cells() {
        use Direction::*;
        // Up from (2, 1) and Left from (2, 2) lead back into the corridor and
        // are skipped without counting as a stall
        let maze = carve(6, &[Down, Up, Right, Left, Right, Right, Right]);
        assert_eq!(
            maze,
            maze_with_corridor(
                6,
                &[(1, 0), (1, 1), (2, 1), (2, 2), (2, 3), (2, 4), (2, 5)]
            )
        );
    }

    #[test]
    fn stalled_walk_starts_over_from_same_entrance() {
        use Direction::*;
        assert_eq!(MazeGenerator::<ScriptedRng>::STALL_LIMIT, 100);

        // From (2, 2) the cell above touches (1, 1) as well, so every Up is
        // turned down by the neighbour rule
        let mut moves = vec![Down, Right];
        moves.extend([Up; 100]);
        moves.extend([Right, Right, Right, Right]);
        let maze = carve(6, &moves);

        // Carving from before the restart is gone; the new corridor starts
        // from the original entrance at (1, 0)
        assert_eq!(
            maze,
            maze_with_corridor(6, &[(1, 0), (1, 1), (1, 2), (1, 3), (1, 4), (1, 5)])
        );
    }

    #[test]
    fn walk_survives_stalls_below_limit() {
        use Direction::*;
        let mut moves = vec![Down, Right];
        moves.extend([Up; 99]);
        // An accepted step resets the count
        moves.extend([Right, Down]);
        moves.extend([Left; 99]);
        moves.extend([Right, Right]);
        let maze = carve(6, &moves);

        assert_eq!(
            maze,
            maze_with_corridor(
                6,
                &[
                    (1, 0),
                    (1, 1),
                    (2, 1),
                    (2, 2),
                    (2, 3),
                    (3, 3),
                    (3, 4),
                    (3, 5)
                ]
            )
        );
    }

    #[test]
    fn same_seed_gives_same_maze() {
        let first = MazeGenerator::new(Some(42)).generate_maze(14);
        let second = MazeGenerator::new(Some(42)).generate_maze(14);
        assert_eq!(first, second);
    }

    #[test]
    fn accepts_injected_rng() {
        let mut gen = MazeGenerator::from_rng(StdRng::seed_from_u64(5));
        let maze = gen.generate_maze(8);
        assert_eq!(maze.size(), 8);
        assert_single_corridor(&maze);
    }

    #[test]
    #[should_panic(expected = "at least 3")]
    fn too_small_maze_panics() {
        MazeGenerator::new(Some(0)).generate_maze(2);
    }

    #[test]
    fn generated_mazes_have_single_corridor() {
        for seed in 0..1000 {
            let maze = MazeGenerator::new(Some(seed)).generate_maze(14);
            assert_single_corridor(&maze);
        }
    }

    #[test]
    fn solving_marks_whole_corridor() {
        for seed in 0..1000 {
            let maze = MazeGenerator::new(Some(seed)).generate_maze(14);
            let open = corridor(&maze);

            let mut solved = maze.clone();
            let solution = solved.solve().unwrap();

            assert_eq!(corridor(&solved), open);
            assert!(solved.rows().flatten().all(|c| *c != Cell::Open));
            assert_single_corridor(&solved);

            // Walk order is a simple 4-connected path
            assert_eq!(solution.steps.len(), open.len());
            assert_eq!(
                solution.steps.iter().collect::<HashSet<_>>().len(),
                open.len()
            );
            assert!(solution
                .steps
                .iter()
                .tuple_windows()
                .all(|(a, b)| a.y.abs_diff(b.y) + a.x.abs_diff(b.x) == 1));
            assert_eq!(solution.steps[0].x, 0);
            assert_eq!(solution.steps[open.len() - 1].x, 13);

            let mut again = maze.clone();
            again.solve().unwrap();
            assert_eq!(again, solved);
        }
    }
}
