/*
 * Copyright (C) 2023 Asim Ihsan
 * SPDX-License-Identifier: AGPL-3.0-only
 *
 * This program is free software: you can redistribute it and/or modify it under
 * the terms of the GNU Affero General Public License as published by the Free
 * Software Foundation, version 3.
 *
 * This program is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A
 * PARTICULAR PURPOSE. See the GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License along
 * with this program. If not, see <https://www.gnu.org/licenses/>
 */

#![warn(missing_docs)]

//! Vacuum World logic.
//!
//! A rectangular grid of free and wall cells, an agent start position and a set of dirty cells.
//! The world is immutable once built; it is intended to be read by a planner that searches for a
//! sequence of actions that cleans every dirty cell, and by an [`environment`] that replays such a
//! sequence.

use std::str::FromStr;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

pub mod environment;
pub mod generate;

/// Vacuum World error. Raised while building or loading a world.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    /// The world file does not start with the two dimension lines.
    #[error("missing header: expected column count and row count lines")]
    MissingHeader,

    /// A dimension line is not a non-negative integer.
    #[error("invalid dimension: {0:?}")]
    InvalidDimension(String),

    /// Width or height is zero.
    #[error("world must have at least one row and one column")]
    ZeroDimension,

    /// `width * height` does not fit in a `usize`.
    #[error("world of {width}x{height} cells is too large")]
    TooLarge {
        /// Number of columns.
        width: usize,
        /// Number of rows.
        height: usize,
    },

    /// Fewer grid rows than the header promised.
    #[error("missing row: {0}")]
    MissingRow(usize),

    /// A grid row does not have exactly `width` cells.
    #[error("row {row} has {found} cells, expected {expected}")]
    RowWidth {
        /// Row index.
        row: usize,
        /// Width from the header.
        expected: usize,
        /// Number of cells actually found.
        found: usize,
    },

    /// A character that is not one of `_`, `#`, `*`, `@`.
    #[error("unknown cell {ch:?} at row {row}, column {col}")]
    UnknownCell {
        /// Row index.
        row: usize,
        /// Column index.
        col: usize,
        /// Offending character.
        ch: char,
    },

    /// No `@` in the grid.
    #[error("no agent start position")]
    MissingStart,

    /// More than one `@` in the grid.
    #[error("multiple agent start positions: {first} and {second}")]
    MultipleStarts {
        /// First start seen.
        first: Position,
        /// Second start seen.
        second: Position,
    },

    /// Cell vector does not match `width * height`.
    #[error("grid has {found} cells, expected {expected}")]
    GridSize {
        /// `width * height`.
        expected: usize,
        /// Length of the supplied cell vector.
        found: usize,
    },

    /// A position lies outside the grid.
    #[error("position out of bounds: {0}")]
    OutOfBounds(Position),

    /// The agent starts on a wall.
    #[error("agent starts on a wall: {0}")]
    StartOnWall(Position),

    /// A dirty cell is on a wall.
    #[error("dirty cell on a wall: {0}")]
    DirtyOnWall(Position),

    /// The agent starts on a dirty cell, which the world file cannot express.
    #[error("agent starts on a dirty cell: {0}")]
    DirtyStart(Position),

    /// The generator's wall probability is NaN.
    #[error("wall probability is not a number")]
    InvalidWallProbability,
}

/// A (row, column) grid position. Row 0 is the top row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Row index.
    pub row: usize,

    /// Column index.
    pub col: usize,
}

impl Position {
    /// Create a new position.
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Vacuum World cell. Part of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Free cell, the agent may stand here.
    Free,

    /// Wall, impassable.
    Wall,
}

impl Cell {
    /// Whether the agent may stand on this cell.
    pub fn is_passable(&self) -> bool {
        matches!(self, Cell::Free)
    }
}

/// Agent action. Moves are one cell in a compass direction, `Vacuum` cleans the current cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Row - 1.
    North,
    /// Row + 1.
    South,
    /// Column + 1.
    East,
    /// Column - 1.
    West,
    /// Clean the current cell.
    Vacuum,
}

impl Action {
    /// The four moves in generation order. This order fixes tie-breaking between successors.
    pub const MOVES: [Action; 4] = [Action::North, Action::South, Action::East, Action::West];

    /// Single character label: one of `N`, `S`, `E`, `W`, `V`.
    pub fn label(&self) -> char {
        match self {
            Action::North => 'N',
            Action::South => 'S',
            Action::East => 'E',
            Action::West => 'W',
            Action::Vacuum => 'V',
        }
    }

    /// (row, column) offset for a move, `None` for `Vacuum`.
    pub fn delta(&self) -> Option<(isize, isize)> {
        match self {
            Action::North => Some((-1, 0)),
            Action::South => Some((1, 0)),
            Action::East => Some((0, 1)),
            Action::West => Some((0, -1)),
            Action::Vacuum => None,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Vacuum World. Immutable grid plus initial agent position and initial dirty cells. Only built
/// through [`World::new`], so it serializes but does not deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct World {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    start: Position,
    dirty: Vec<Position>,
}

impl World {
    /// Create a new world, validating the start position and dirty cells against the grid. The
    /// start cell may not be dirty.
    ///
    /// `cells` is row-major. Dirty cells are de-duplicated and stored in row-major order, which
    /// defines their ordinal (see [`World::dirty_cells`]).
    pub fn new(
        width: usize,
        height: usize,
        cells: Vec<Cell>,
        start: Position,
        dirty: impl IntoIterator<Item = Position>,
    ) -> Result<Self, WorldError> {
        if width == 0 || height == 0 {
            return Err(WorldError::ZeroDimension);
        }
        let size = grid_size(width, height)?;
        if cells.len() != size {
            return Err(WorldError::GridSize {
                expected: size,
                found: cells.len(),
            });
        }

        let mut world = Self {
            width,
            height,
            cells,
            start,
            dirty: Vec::new(),
        };

        if !world.in_bounds(start) {
            return Err(WorldError::OutOfBounds(start));
        }
        if !world.get(start).is_passable() {
            return Err(WorldError::StartOnWall(start));
        }

        let mut seen = FxHashSet::default();
        let mut dirty_cells = Vec::new();
        for position in dirty {
            if !world.in_bounds(position) {
                return Err(WorldError::OutOfBounds(position));
            }
            if !world.get(position).is_passable() {
                return Err(WorldError::DirtyOnWall(position));
            }
            if position == start {
                return Err(WorldError::DirtyStart(position));
            }
            if seen.insert(position) {
                dirty_cells.push(position);
            }
        }
        dirty_cells.sort_unstable();
        world.dirty = dirty_cells;

        Ok(world)
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Initial agent position.
    pub fn start(&self) -> Position {
        self.start
    }

    /// Initial dirty cells in row-major order. A cell's index in this slice is its ordinal.
    pub fn dirty_cells(&self) -> &[Position] {
        &self.dirty
    }

    /// Whether a position is inside the grid.
    pub fn in_bounds(&self, position: Position) -> bool {
        position.row < self.height && position.col < self.width
    }

    /// Get a cell. Panics if out of bounds, like slice indexing.
    pub fn get(&self, position: Position) -> Cell {
        self.cells[position.row * self.width + position.col]
    }

    /// Whether a position is in bounds and not a wall.
    pub fn is_passable(&self, position: Position) -> bool {
        self.in_bounds(position) && self.get(position).is_passable()
    }

    /// Where a move from `position` leads, if it stays inside the grid. Walls are not checked.
    /// Returns `None` for `Vacuum`.
    pub fn neighbour(&self, position: Position, action: Action) -> Option<Position> {
        let (dr, dc) = action.delta()?;
        let row = position.row.checked_add_signed(dr)?;
        let col = position.col.checked_add_signed(dc)?;
        let target = Position::new(row, col);
        self.in_bounds(target).then_some(target)
    }

    /// Where a move from `position` leads, if the target is inside the grid and passable.
    pub fn step(&self, position: Position, action: Action) -> Option<Position> {
        self.neighbour(position, action)
            .filter(|target| self.is_passable(*target))
    }
}

impl FromStr for World {
    type Err = WorldError;

    /// Parse a world file: column count line, row count line, then one line per grid row.
    /// `_` is free, `#` is a wall, `*` is dirty and `@` is the agent start.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines = s.lines().map(|line| line.trim_end_matches('\r'));
        let width = parse_dimension(lines.next())?;
        let height = parse_dimension(lines.next())?;
        if width == 0 || height == 0 {
            return Err(WorldError::ZeroDimension);
        }

        // Rows are checked against the header as they are read, so the grid is never sized from
        // the header alone.
        grid_size(width, height)?;
        let mut cells = Vec::new();
        let mut start: Option<Position> = None;
        let mut dirty = Vec::new();

        for row in 0..height {
            let line = lines.next().ok_or(WorldError::MissingRow(row))?;
            let found = line.chars().count();
            if found != width {
                return Err(WorldError::RowWidth {
                    row,
                    expected: width,
                    found,
                });
            }
            for (col, ch) in line.chars().enumerate() {
                let position = Position::new(row, col);
                let cell = match ch {
                    '_' => Cell::Free,
                    '#' => Cell::Wall,
                    '*' => {
                        dirty.push(position);
                        Cell::Free
                    }
                    '@' => {
                        if let Some(first) = start {
                            return Err(WorldError::MultipleStarts {
                                first,
                                second: position,
                            });
                        }
                        start = Some(position);
                        Cell::Free
                    }
                    ch => return Err(WorldError::UnknownCell { row, col, ch }),
                };
                cells.push(cell);
            }
        }

        let start = start.ok_or(WorldError::MissingStart)?;
        World::new(width, height, cells, start, dirty)
    }
}

/// `width * height`, or `TooLarge` on overflow.
pub(crate) fn grid_size(width: usize, height: usize) -> Result<usize, WorldError> {
    width
        .checked_mul(height)
        .ok_or(WorldError::TooLarge { width, height })
}

fn parse_dimension(line: Option<&str>) -> Result<usize, WorldError> {
    let line = line.ok_or(WorldError::MissingHeader)?;
    line.trim()
        .parse::<usize>()
        .map_err(|_| WorldError::InvalidDimension(line.to_string()))
}

/// Parse a world file. Same as [`World::from_str`].
pub fn parse_world(s: &str) -> Result<World, WorldError> {
    s.parse()
}

// print the grid rows in world-file notation, without the dimension header.
impl std::fmt::Display for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let dirty: FxHashSet<Position> = self.dirty.iter().copied().collect();
        let mut s = String::with_capacity((self.width + 1) * self.height);
        for row in 0..self.height {
            for col in 0..self.width {
                let position = Position::new(row, col);
                let c = if position == self.start {
                    '@'
                } else if dirty.contains(&position) {
                    '*'
                } else {
                    match self.get(position) {
                        Cell::Free => '_',
                        Cell::Wall => '#',
                    }
                };
                s.push(c);
            }
            if row < self.height - 1 {
                s.push('\n');
            }
        }
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const SMALL: &str = "3\n3\n_#*\n_@_\n*__\n";

    #[test]
    fn test_parse_small_world() {
        let world: World = SMALL.parse().expect("parse failed");
        assert_eq!(world.width(), 3);
        assert_eq!(world.height(), 3);
        assert_eq!(world.start(), Position::new(1, 1));
        assert_eq!(
            world.dirty_cells(),
            &[Position::new(0, 2), Position::new(2, 0)]
        );
        assert_eq!(world.get(Position::new(0, 1)), Cell::Wall);
        assert_eq!(world.get(Position::new(1, 1)), Cell::Free);
    }

    #[test]
    fn test_parse_single_row_world() {
        let world = parse_world("3\n1\n_*@").expect("parse failed");
        assert_eq!(world.start(), Position::new(0, 2));
        assert_eq!(world.dirty_cells(), &[Position::new(0, 1)]);
    }

    #[test]
    fn test_parse_strips_carriage_returns() {
        let world = parse_world("2\r\n1\r\n@*\r\n").expect("parse failed");
        assert_eq!(world.dirty_cells(), &[Position::new(0, 1)]);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_world(""), Err(WorldError::MissingHeader));
        assert_eq!(parse_world("3\n"), Err(WorldError::MissingHeader));
        assert_eq!(
            parse_world("x\n1\n"),
            Err(WorldError::InvalidDimension("x".to_string()))
        );
        assert_eq!(parse_world("0\n1\n"), Err(WorldError::ZeroDimension));
        assert_eq!(parse_world("2\n2\n@_\n"), Err(WorldError::MissingRow(1)));
        assert_eq!(
            parse_world("2\n1\n@__\n"),
            Err(WorldError::RowWidth {
                row: 0,
                expected: 2,
                found: 3
            })
        );
        assert_eq!(
            parse_world("2\n1\n@x\n"),
            Err(WorldError::UnknownCell {
                row: 0,
                col: 1,
                ch: 'x'
            })
        );
        assert_eq!(parse_world("2\n1\n_*\n"), Err(WorldError::MissingStart));
        assert_eq!(
            parse_world("2\n1\n@@\n"),
            Err(WorldError::MultipleStarts {
                first: Position::new(0, 0),
                second: Position::new(0, 1)
            })
        );
    }

    #[test]
    fn test_new_validates_positions() {
        let cells = vec![Cell::Free, Cell::Wall];
        assert_eq!(
            World::new(2, 1, cells.clone(), Position::new(0, 1), std::iter::empty()),
            Err(WorldError::StartOnWall(Position::new(0, 1)))
        );
        assert_eq!(
            World::new(2, 1, cells.clone(), Position::new(1, 0), std::iter::empty()),
            Err(WorldError::OutOfBounds(Position::new(1, 0)))
        );
        assert_eq!(
            World::new(2, 1, cells.clone(), Position::new(0, 0), [Position::new(0, 1)]),
            Err(WorldError::DirtyOnWall(Position::new(0, 1)))
        );
        assert_eq!(
            World::new(3, 1, cells, Position::new(0, 0), std::iter::empty()),
            Err(WorldError::GridSize {
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn test_huge_header_is_an_error() {
        assert_eq!(
            parse_world("4294967296\n4294967296\n"),
            Err(WorldError::TooLarge {
                width: 4294967296,
                height: 4294967296
            })
        );
        let huge = usize::MAX / 2;
        assert_eq!(
            World::new(huge, 3, vec![Cell::Free], Position::new(0, 0), std::iter::empty()),
            Err(WorldError::TooLarge {
                width: huge,
                height: 3
            })
        );
        // Fits in a usize, but the rows are missing.
        assert_eq!(
            parse_world("100000\n100000\n"),
            Err(WorldError::MissingRow(0))
        );
    }

    #[test]
    fn test_new_rejects_dirty_start() {
        let world = World::new(
            2,
            1,
            vec![Cell::Free; 2],
            Position::new(0, 0),
            [Position::new(0, 1), Position::new(0, 0)],
        );
        assert_eq!(world, Err(WorldError::DirtyStart(Position::new(0, 0))));
    }

    #[test]
    fn test_is_passable() {
        let world: World = SMALL.parse().expect("parse failed");
        assert!(world.is_passable(Position::new(0, 0)));
        assert!(!world.is_passable(Position::new(0, 1)));
        assert!(!world.is_passable(Position::new(3, 0)));
    }

    #[test]
    fn test_new_deduplicates_and_sorts_dirty_cells() {
        let world = World::new(
            2,
            2,
            vec![Cell::Free; 4],
            Position::new(0, 0),
            [Position::new(1, 1), Position::new(0, 1), Position::new(1, 1)],
        )
        .expect("new failed");
        assert_eq!(
            world.dirty_cells(),
            &[Position::new(0, 1), Position::new(1, 1)]
        );
    }

    #[test]
    fn test_step_respects_bounds_and_walls() {
        let world: World = SMALL.parse().expect("parse failed");
        let corner = Position::new(0, 0);
        assert_eq!(world.step(corner, Action::North), None);
        assert_eq!(world.step(corner, Action::West), None);
        assert_eq!(world.step(corner, Action::East), None, "wall at (0, 1)");
        assert_eq!(world.neighbour(corner, Action::East), Some(Position::new(0, 1)));
        assert_eq!(world.step(corner, Action::South), Some(Position::new(1, 0)));
        assert_eq!(world.step(corner, Action::Vacuum), None);
    }

    #[test]
    fn test_action_labels() {
        let labels: String = Action::MOVES.iter().map(Action::label).collect();
        assert_eq!(labels, "NSEW");
        assert_eq!(Action::Vacuum.to_string(), "V");
    }

    #[test]
    fn test_display_matches_input_rows() {
        let world: World = SMALL.parse().expect("parse failed");
        assert_eq!(world.to_string(), "_#*\n_@_\n*__");
    }

    fn world_row() -> impl Strategy<Value = String> {
        prop::collection::vec(
            prop_oneof![Just('_'), Just('#'), Just('*')],
            1..6,
        )
        .prop_map(|cells| cells.into_iter().collect())
    }

    proptest! {
        #[test]
        fn test_display_then_parse_is_same_world(
            rows in prop::collection::vec(world_row(), 1..5),
            start_row in 0..5usize,
            start_col in 0..6usize,
        ) {
            let width = rows[0].len();
            let mut rows: Vec<Vec<char>> = rows
                .into_iter()
                .map(|row| row.chars().cycle().take(width).collect())
                .collect();
            let start_row = start_row % rows.len();
            let start_col = start_col % width;
            rows[start_row][start_col] = '@';
            let grid: Vec<String> = rows.iter().map(|row| row.iter().collect()).collect();
            let text = format!("{}\n{}\n{}\n", width, grid.len(), grid.join("\n"));

            let world: World = text.parse().expect("parse failed");
            let reparsed: World = format!("{}\n{}\n{}", width, grid.len(), world)
                .parse()
                .expect("reparse failed");
            prop_assert_eq!(world, reparsed);
        }
    }
}
