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

//! Random world generation, for benchmarks and test fixtures.

use rand::seq::SliceRandom;
use rand::Rng as _;

use crate::{grid_size, Cell, Position, World, WorldError};

/// Generator RNG. Seed it for reproducible worlds.
pub type Rng = rand_pcg::Pcg64;

/// Shape of a generated world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorConfig {
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
    /// Probability that any cell other than the start is a wall. Clamped to `[0, 1]`; NaN is an
    /// error.
    pub wall_probability: f64,
    /// Number of dirty cells. Clamped to the number of free cells other than the start.
    pub dirty_count: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            width: 5,
            height: 5,
            wall_probability: 0.2,
            dirty_count: 3,
        }
    }
}

/// Generate a random world. Walls never cover the start and dirty cells are never on walls, but
/// nothing guarantees every dirty cell is reachable.
pub fn random_world(config: &GeneratorConfig, rng: &mut Rng) -> Result<World, WorldError> {
    let GeneratorConfig {
        width,
        height,
        wall_probability,
        dirty_count,
    } = *config;
    if width == 0 || height == 0 {
        return Err(WorldError::ZeroDimension);
    }
    let size = grid_size(width, height)?;
    if wall_probability.is_nan() {
        return Err(WorldError::InvalidWallProbability);
    }
    let wall_probability = wall_probability.clamp(0.0, 1.0);

    let start = Position::new(rng.gen_range(0..height), rng.gen_range(0..width));
    let mut cells = Vec::with_capacity(size);
    let mut free = Vec::new();
    for row in 0..height {
        for col in 0..width {
            let position = Position::new(row, col);
            if position != start && rng.gen_bool(wall_probability) {
                cells.push(Cell::Wall);
            } else {
                cells.push(Cell::Free);
                if position != start {
                    free.push(position);
                }
            }
        }
    }

    let dirty: Vec<Position> = free
        .choose_multiple(rng, dirty_count.min(free.len()))
        .copied()
        .collect();
    World::new(width, height, cells, start, dirty)
}

/// Render a world in the file format read by [`World::from_str`](std::str::FromStr).
pub fn to_world_file(world: &World) -> String {
    format!("{}\n{}\n{}\n", world.width(), world.height(), world)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_same_seed_same_world() {
        let config = GeneratorConfig::default();
        let a = random_world(&config, &mut Rng::seed_from_u64(42)).expect("generate failed");
        let b = random_world(&config, &mut Rng::seed_from_u64(42)).expect("generate failed");
        assert_eq!(a, b);
    }

    #[test]
    fn test_dirty_count_is_clamped() {
        let config = GeneratorConfig {
            width: 2,
            height: 2,
            wall_probability: 0.0,
            dirty_count: 10,
        };
        let world = random_world(&config, &mut Rng::seed_from_u64(7)).expect("generate failed");
        assert_eq!(world.dirty_cells().len(), 3);
        assert!(!world.dirty_cells().contains(&world.start()));
    }

    #[test]
    fn test_all_walls_except_start() {
        let config = GeneratorConfig {
            width: 3,
            height: 3,
            wall_probability: 1.0,
            dirty_count: 2,
        };
        let world = random_world(&config, &mut Rng::seed_from_u64(1)).expect("generate failed");
        assert!(world.dirty_cells().is_empty());
        assert!(world.get(world.start()).is_passable());
    }

    #[test]
    fn test_world_file_parses_back() {
        let config = GeneratorConfig::default();
        for seed in 0..20 {
            let world =
                random_world(&config, &mut Rng::seed_from_u64(seed)).expect("generate failed");
            let parsed: World = to_world_file(&world).parse().expect("parse failed");
            assert_eq!(world, parsed, "seed: {}", seed);
        }
    }

    #[test]
    fn test_bad_wall_probability_and_size() {
        let nan = GeneratorConfig {
            wall_probability: f64::NAN,
            ..GeneratorConfig::default()
        };
        assert_eq!(
            random_world(&nan, &mut Rng::seed_from_u64(0)),
            Err(WorldError::InvalidWallProbability)
        );

        let huge = GeneratorConfig {
            width: usize::MAX,
            height: 2,
            ..GeneratorConfig::default()
        };
        assert_eq!(
            random_world(&huge, &mut Rng::seed_from_u64(0)),
            Err(WorldError::TooLarge {
                width: usize::MAX,
                height: 2
            })
        );

        // Out-of-range probabilities clamp instead of failing.
        let negative = GeneratorConfig {
            wall_probability: -3.0,
            ..GeneratorConfig::default()
        };
        let world =
            random_world(&negative, &mut Rng::seed_from_u64(0)).expect("generate failed");
        for row in 0..world.height() {
            for col in 0..world.width() {
                assert!(world.is_passable(Position::new(row, col)));
            }
        }
    }

    #[test]
    fn test_zero_dimension_is_rejected() {
        let config = GeneratorConfig {
            width: 0,
            ..GeneratorConfig::default()
        };
        assert_eq!(
            random_world(&config, &mut Rng::seed_from_u64(0)),
            Err(WorldError::ZeroDimension)
        );
    }
}
