//! Maze grid and level generation
//!
//! The grid is fixed at 8×10 cells of 10 units each. Walls go in rows 1..=6
//! only, never on the spawn block around the playfield center, and the two
//! bottom-right cells are always the goal.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::cell_of;
use crate::consts::*;
use glam::Vec2;

/// Contents of one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Wall,
    Goal,
}

/// Goal cells as (row, col)
pub const GOAL_CELLS: [(usize, usize); 2] = [(6, GRID_COLS - 1), (7, GRID_COLS - 1)];

/// The four cells meeting at the spawn point, kept wall-free
pub const SPAWN_BLOCK: [(usize, usize); 4] = [(3, 4), (3, 5), (4, 4), (4, 5)];

/// Rows eligible for walls
pub const FIRST_WALL_ROW: usize = 1;
pub const LAST_WALL_ROW: usize = 6;

const fn is_reserved(row: usize, col: usize) -> bool {
    let mut i = 0;
    while i < GOAL_CELLS.len() {
        if GOAL_CELLS[i].0 == row && GOAL_CELLS[i].1 == col {
            return true;
        }
        i += 1;
    }
    let mut i = 0;
    while i < SPAWN_BLOCK.len() {
        if SPAWN_BLOCK[i].0 == row && SPAWN_BLOCK[i].1 == col {
            return true;
        }
        i += 1;
    }
    false
}

/// Whether the generator may put a wall at (row, col)
pub const fn is_placeable(row: usize, col: usize) -> bool {
    row >= FIRST_WALL_ROW && row <= LAST_WALL_ROW && col < GRID_COLS && !is_reserved(row, col)
}

const fn count_placeable() -> usize {
    let mut count = 0;
    let mut row = 0;
    while row < GRID_ROWS {
        let mut col = 0;
        while col < GRID_COLS {
            if is_placeable(row, col) {
                count += 1;
            }
            col += 1;
        }
        row += 1;
    }
    count
}

/// Number of cells that can hold a wall; upper bound on any level's wall count
pub const PLACEABLE_CELLS: usize = count_placeable();

/// 8×10 maze grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeGrid {
    cells: [[Cell; GRID_COLS]; GRID_ROWS],
}

impl Default for MazeGrid {
    fn default() -> Self {
        Self::open()
    }
}

impl MazeGrid {
    /// Grid with no walls, goal cells set
    pub fn open() -> Self {
        Self::from_cells([[Cell::Empty; GRID_COLS]; GRID_ROWS])
    }

    /// Build from explicit cells. Goal cells are forced, and any `Goal`
    /// elsewhere is cleared.
    pub fn from_cells(mut cells: [[Cell; GRID_COLS]; GRID_ROWS]) -> Self {
        for row in cells.iter_mut() {
            for cell in row.iter_mut() {
                if *cell == Cell::Goal {
                    *cell = Cell::Empty;
                }
            }
        }
        for (row, col) in GOAL_CELLS {
            cells[row][col] = Cell::Goal;
        }
        Self { cells }
    }

    /// Place `wall_count` walls at distinct random placeable cells.
    ///
    /// `wall_count` is capped at [`PLACEABLE_CELLS`].
    pub fn generate<R: Rng>(wall_count: usize, rng: &mut R) -> Self {
        let mut cells = [[Cell::Empty; GRID_COLS]; GRID_ROWS];
        let wall_count = wall_count.min(PLACEABLE_CELLS);

        let mut placed = 0;
        while placed < wall_count {
            let row = rng.random_range(FIRST_WALL_ROW..=LAST_WALL_ROW);
            let col = rng.random_range(0..GRID_COLS);
            if !is_placeable(row, col) || cells[row][col] == Cell::Wall {
                continue;
            }
            cells[row][col] = Cell::Wall;
            placed += 1;
        }

        Self::from_cells(cells)
    }

    /// Cell at (row, col); out-of-range indices read as `Wall`
    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.cells
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(Cell::Wall)
    }

    /// Cell under a playfield position, `None` outside the grid
    pub fn cell_at(&self, pos: Vec2) -> Option<Cell> {
        cell_of(pos).map(|(row, col)| self.cells[row][col])
    }

    pub fn rows(&self) -> &[[Cell; GRID_COLS]; GRID_ROWS] {
        &self.cells
    }

    /// How many cells hold `kind`
    pub fn count(&self, kind: Cell) -> usize {
        self.cells.iter().flatten().filter(|c| **c == kind).count()
    }
}

/// Generate the maze for a 1-based level from the tuning table
pub fn generate_maze<R: Rng>(
    level: u32,
    tuning: &crate::tuning::Tuning,
    rng: &mut R,
) -> MazeGrid {
    let walls = tuning.level(level).wall_count as usize;
    let maze = MazeGrid::generate(walls, rng);
    log::info!(
        "Level {} maze: {} walls (requested {})",
        level,
        maze.count(Cell::Wall),
        walls
    );
    maze
}

/// Center of a cell in playfield units
pub fn cell_center(row: usize, col: usize) -> Vec2 {
    Vec2::new(
        (col as f32 + 0.5) * CELL_SIZE,
        (row as f32 + 0.5) * CELL_SIZE,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_placeable_cells() {
        // Six rows of ten, minus the spawn block and the goal cell in row 6
        assert_eq!(PLACEABLE_CELLS, 55);
        assert!(!is_placeable(0, 0));
        assert!(!is_placeable(7, 3));
        assert!(!is_placeable(3, 4));
        assert!(!is_placeable(6, 9));
        assert!(is_placeable(1, 0));
        assert!(is_placeable(6, 8));
    }

    #[test]
    fn test_open_grid_has_goals_only() {
        let maze = MazeGrid::open();
        assert_eq!(maze.count(Cell::Goal), 2);
        assert_eq!(maze.count(Cell::Wall), 0);
        assert_eq!(maze.cell(6, 9), Cell::Goal);
        assert_eq!(maze.cell(7, 9), Cell::Goal);
    }

    #[test]
    fn test_from_cells_moves_stray_goal() {
        let mut cells = [[Cell::Empty; GRID_COLS]; GRID_ROWS];
        cells[0][0] = Cell::Goal;
        cells[7][9] = Cell::Wall;
        let maze = MazeGrid::from_cells(cells);
        assert_eq!(maze.cell(0, 0), Cell::Empty);
        assert_eq!(maze.cell(7, 9), Cell::Goal);
    }

    #[test]
    fn test_cell_at() {
        let maze = MazeGrid::open();
        assert_eq!(maze.cell_at(Vec2::new(95.0, 75.0)), Some(Cell::Goal));
        assert_eq!(maze.cell_at(Vec2::new(50.0, 40.0)), Some(Cell::Empty));
        assert_eq!(maze.cell_at(Vec2::new(100.0, 40.0)), None);
        assert_eq!(maze.cell_at(Vec2::new(f32::INFINITY, 0.0)), None);
    }

    #[test]
    fn test_full_maze() {
        let mut rng = Pcg32::seed_from_u64(3);
        let maze = MazeGrid::generate(PLACEABLE_CELLS + 10, &mut rng);
        assert_eq!(maze.count(Cell::Wall), PLACEABLE_CELLS);
        for (row, col) in SPAWN_BLOCK {
            assert_eq!(maze.cell(row, col), Cell::Empty);
        }
    }

    #[test]
    fn test_successive_mazes_differ() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(12345);
        let first = generate_maze(1, &tuning, &mut rng);
        let second = generate_maze(1, &tuning, &mut rng);
        assert_ne!(first, second);
        assert_eq!(first.count(Cell::Wall), second.count(Cell::Wall));
    }

    #[test]
    fn test_same_seed_same_maze() {
        let tuning = Tuning::default();
        let a = generate_maze(4, &tuning, &mut Pcg32::seed_from_u64(7));
        let b = generate_maze(4, &tuning, &mut Pcg32::seed_from_u64(7));
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn prop_generated_maze_is_valid(seed in any::<u64>(), level in 1u32..=6) {
            let tuning = Tuning::default();
            let mut rng = Pcg32::seed_from_u64(seed);
            let maze = generate_maze(level, &tuning, &mut rng);

            prop_assert_eq!(maze.count(Cell::Goal), 2);
            for (row, col) in GOAL_CELLS {
                prop_assert_eq!(maze.cell(row, col), Cell::Goal);
            }
            for (row, col) in SPAWN_BLOCK {
                prop_assert_eq!(maze.cell(row, col), Cell::Empty);
            }
            prop_assert_eq!(
                maze.count(Cell::Wall),
                tuning.level(level).wall_count as usize
            );
            for col in 0..GRID_COLS {
                prop_assert_ne!(maze.cell(0, col), Cell::Wall);
                prop_assert_ne!(maze.cell(7, col), Cell::Wall);
            }
        }
    }
}
