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

//! Vacuum World as an uninformed search problem: the state key, its successors and the vacuum
//! transition, plus a planner that searches and then checks its solution by replay.

use log::{debug, info};
use vacuum_world_logic::environment::{replay, ReplayError};
use vacuum_world_logic::{Action, World};

pub use uninformed_search::{SearchResult, SearchStatistics, Strategy};

mod state;

pub use state::{successors, DirtySet, VacuumProblem, VacuumState};

/// A solved plan failed replay against its own world.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    /// The plan contains an illegal action.
    #[error("plan does not replay: {0}")]
    Illegal(#[from] ReplayError),

    /// The plan replays but leaves dirty cells behind.
    #[error("plan leaves {remaining} dirty cells")]
    Incomplete {
        /// Dirty cells left after the last action.
        remaining: usize,
    },
}

/// How to plan: which strategy, and whether to replay a solution before returning it.
pub struct PlannerConfig {
    /// Frontier discipline.
    pub strategy: Strategy,

    /// Replay a solution against the world before returning it.
    pub verify_plan: bool,
}

impl PlannerConfig {
    fn new(strategy: Strategy, verify_plan: bool) -> Self {
        Self {
            strategy,
            verify_plan,
        }
    }

    /// Default config with another strategy.
    pub fn with_strategy(strategy: Strategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self::new(Strategy::UniformCost, true)
    }
}

/// Search `world` from `start` with `strategy`.
pub fn search(world: &World, start: VacuumState, strategy: Strategy) -> SearchResult<Action> {
    let problem = VacuumProblem::new(world);
    uninformed_search::search(&problem, start, strategy)
}

/// Search `world` from its initial state, then replay a solution to check it if the config asks
/// for it. An exhausted search is returned as is; only a bad solution is an error.
pub fn plan(world: &World, config: &PlannerConfig) -> Result<SearchResult<Action>, PlanError> {
    let problem = VacuumProblem::new(world);
    info!(
        "planning on a {}x{} world with {} dirty cells using {}",
        world.width(),
        world.height(),
        world.dirty_cells().len(),
        config.strategy
    );
    let result = uninformed_search::search(&problem, problem.initial_state(), config.strategy);

    if config.verify_plan {
        if let Some(actions) = result.actions() {
            verify(world, actions)?;
            debug!("plan of {} actions verified", actions.len());
        }
    }
    Ok(result)
}

/// Replay `actions` from the world's start and check every dirty cell ends up clean.
pub fn verify(world: &World, actions: &[Action]) -> Result<(), PlanError> {
    let replay = replay(world, actions)?;
    if !replay.is_clean() {
        return Err(PlanError::Incomplete {
            remaining: replay.remaining_dirty,
        });
    }
    Ok(())
}
