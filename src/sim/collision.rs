//! Collision detection and response against the maze grid
//!
//! The ball is a point. A move is either committed whole or rejected whole:
//! there is no sliding along walls and no partial step.

use glam::Vec2;

use super::maze::{Cell, MazeGrid};
use crate::cell_of;
use crate::consts::*;

/// What a proposed position lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    /// Inside the grid on a non-wall cell
    Open { row: usize, col: usize, cell: Cell },
    /// Inside the grid on a wall
    Wall { row: usize, col: usize },
    /// Outside the grid, or not a finite position
    OutOfBounds,
}

impl Probe {
    pub fn is_blocked(&self) -> bool {
        !matches!(self, Probe::Open { .. })
    }
}

/// Classify a position against the maze
pub fn probe(maze: &MazeGrid, pos: Vec2) -> Probe {
    match cell_of(pos) {
        None => Probe::OutOfBounds,
        Some((row, col)) => match maze.cell(row, col) {
            Cell::Wall => Probe::Wall { row, col },
            cell => Probe::Open { row, col, cell },
        },
    }
}

/// Velocity after a rejected move: both components scaled by `bounce`
#[inline]
pub fn bounce(vel: Vec2, bounce: f32) -> Vec2 {
    vel * bounce
}

/// Result of the playfield safety clamp
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClampResult {
    pub hit_x: bool,
    pub hit_y: bool,
}

impl ClampResult {
    pub fn hit(&self) -> bool {
        self.hit_x || self.hit_y
    }
}

/// Clamp a position into [0, W]×[0, H]. Each axis that was out of range has
/// its velocity component scaled by `bounce`. A non-finite coordinate is
/// treated as out of range on the low side.
pub fn clamp_to_playfield(pos: &mut Vec2, vel: &mut Vec2, bounce: f32) -> ClampResult {
    let mut result = ClampResult::default();

    if !pos.x.is_finite() || pos.x < 0.0 || pos.x > PLAYFIELD_WIDTH {
        pos.x = if pos.x > PLAYFIELD_WIDTH {
            PLAYFIELD_WIDTH
        } else {
            0.0
        };
        vel.x *= bounce;
        result.hit_x = true;
    }
    if !pos.y.is_finite() || pos.y < 0.0 || pos.y > PLAYFIELD_HEIGHT {
        pos.y = if pos.y > PLAYFIELD_HEIGHT {
            PLAYFIELD_HEIGHT
        } else {
            0.0
        };
        vel.y *= bounce;
        result.hit_y = true;
    }

    result
}

/// Whether a position is inside the closed playfield rectangle
#[inline]
pub fn in_playfield(pos: Vec2) -> bool {
    pos.is_finite()
        && (0.0..=PLAYFIELD_WIDTH).contains(&pos.x)
        && (0.0..=PLAYFIELD_HEIGHT).contains(&pos.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn walled(row: usize, col: usize) -> MazeGrid {
        let mut cells = *MazeGrid::open().rows();
        cells[row][col] = Cell::Wall;
        MazeGrid::from_cells(cells)
    }

    #[test]
    fn test_probe() {
        let maze = walled(2, 3);
        assert_eq!(
            probe(&maze, Vec2::new(35.0, 25.0)),
            Probe::Wall { row: 2, col: 3 }
        );
        assert_eq!(
            probe(&maze, Vec2::new(39.99, 20.0)),
            Probe::Wall { row: 2, col: 3 }
        );
        assert_eq!(
            probe(&maze, Vec2::new(40.0, 25.0)),
            Probe::Open {
                row: 2,
                col: 4,
                cell: Cell::Empty
            }
        );
        assert_eq!(
            probe(&maze, Vec2::new(91.0, 61.0)),
            Probe::Open {
                row: 6,
                col: 9,
                cell: Cell::Goal
            }
        );
        assert_eq!(probe(&maze, Vec2::new(-0.5, 25.0)), Probe::OutOfBounds);
        assert_eq!(probe(&maze, Vec2::new(50.0, 80.0)), Probe::OutOfBounds);
        assert!(probe(&maze, Vec2::new(f32::NAN, 1.0)).is_blocked());
    }

    #[test]
    fn test_bounce() {
        assert_eq!(bounce(Vec2::new(2.0, -1.0), -0.6), Vec2::new(-1.2, 0.6));
    }

    #[test]
    fn test_clamp_per_axis() {
        let mut pos = Vec2::new(101.0, 40.0);
        let mut vel = Vec2::new(2.0, 1.0);
        let result = clamp_to_playfield(&mut pos, &mut vel, -0.6);
        assert!(result.hit_x);
        assert!(!result.hit_y);
        assert_eq!(pos, Vec2::new(100.0, 40.0));
        assert_eq!(vel, Vec2::new(-1.2, 1.0));
    }

    #[test]
    fn test_clamp_non_finite() {
        let mut pos = Vec2::new(f32::NAN, -3.0);
        let mut vel = Vec2::new(1.0, -1.0);
        let result = clamp_to_playfield(&mut pos, &mut vel, -0.5);
        assert!(result.hit());
        assert_eq!(pos, Vec2::ZERO);
        assert_eq!(vel, Vec2::new(-0.5, 0.5));
    }

    proptest! {
        #[test]
        fn prop_clamp_lands_in_playfield(x in -1e6f32..1e6, y in -1e6f32..1e6) {
            let mut pos = Vec2::new(x, y);
            let mut vel = Vec2::ZERO;
            clamp_to_playfield(&mut pos, &mut vel, -0.6);
            prop_assert!(in_playfield(pos));
        }

        #[test]
        fn prop_open_probe_is_in_playfield(x in -50f32..150.0, y in -50f32..130.0) {
            let maze = MazeGrid::open();
            if let Probe::Open { .. } = probe(&maze, Vec2::new(x, y)) {
                prop_assert!(in_playfield(Vec2::new(x, y)));
            }
        }
    }
}
