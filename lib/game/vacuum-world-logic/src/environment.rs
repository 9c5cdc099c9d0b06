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

//! Replaying a plan against a [`World`].
//!
//! PEAS - Performance, Environment, Action, Sensing. See Chapter 2: Intelligent Agents, page 40.
//! Unlike the book's simulator, illegal actions are rejected instead of clamped, so a replay
//! doubles as a check that a plan never leaves the grid or walks into a wall.

use num_traits::Zero;
use rustc_hash::FxHashSet;

use crate::{Action, Position, World};

/// Raised when an action cannot be executed in the current environment state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplayError {
    /// The move would leave the grid.
    #[error("step {step}: {action} from {from} leaves the grid")]
    OutOfBounds {
        /// Zero-based index of the action in the plan.
        step: usize,
        /// The offending action.
        action: Action,
        /// Where the agent was.
        from: Position,
    },

    /// The move would enter a wall.
    #[error("step {step}: {action} from {from} hits a wall")]
    HitWall {
        /// Zero-based index of the action in the plan.
        step: usize,
        /// The offending action.
        action: Action,
        /// Where the agent was.
        from: Position,
    },

    /// Vacuuming a cell that is already clean.
    #[error("step {step}: nothing to vacuum at {at}")]
    NothingToVacuum {
        /// Zero-based index of the action in the plan.
        step: usize,
        /// Where the agent was.
        at: Position,
    },
}

/// An Agent acts in a Performance, Environment, Action, Sensing (PEAS) cycle.
/// For a given Percept, the Agent will return an Action, or `None` once it has nothing more to do.
///
/// Notice that the Agent is not aware of an Environment, its only interface
/// is the Percept coming in then the Action going out.
pub trait Agent {
    /// What the agent can do.
    type Action;
    /// What the agent senses.
    type Percept;

    /// Choose the next action.
    fn act(&mut self, percept: &Self::Percept) -> Option<Self::Action>;
}

/// An Environment runs a single Agent in a Performance, Environment, Action, Sensing (PEAS) cycle.
///
/// Notice that the Environment is not aware of an Agent.
pub trait Environment {
    /// Actions the environment accepts.
    type Action;
    /// What the environment shows the agent.
    type Percept;
    /// Performance measure.
    type Score: num_traits::NumAssign + Copy;

    /// Current percept.
    fn percept(&self) -> Self::Percept;

    /// Apply an action, or reject it if it is illegal in the current state.
    fn execute_action(&mut self, action: &Self::Action) -> Result<(), ReplayError>;

    /// Returns the score of the Environment. This is not cumulative or stateful. This is the score
    /// of the Environment at the current state.
    fn score(&self) -> Self::Score;
}

/// What the agent senses: where it is and whether that cell is dirty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VacuumWorldPercept {
    /// Current agent position.
    pub location: Position,
    /// Whether the current cell still needs vacuuming.
    pub dirty: bool,
}

/// Mutable replay state over an immutable [`World`].
pub struct VacuumWorldEnvironment<'a> {
    world: &'a World,
    agent_location: Position,
    dirty: FxHashSet<Position>,
    cleaned: u32,
    steps: usize,
}

impl<'a> VacuumWorldEnvironment<'a> {
    /// Start from the world's initial position and dirty cells.
    pub fn new(world: &'a World) -> Self {
        Self {
            world,
            agent_location: world.start(),
            dirty: world.dirty_cells().iter().copied().collect(),
            cleaned: 0,
            steps: 0,
        }
    }

    /// Current agent position.
    pub fn agent_location(&self) -> Position {
        self.agent_location
    }

    /// Number of cells still dirty.
    pub fn remaining_dirty(&self) -> usize {
        self.dirty.len()
    }

    /// Whether every dirty cell has been vacuumed.
    pub fn is_clean(&self) -> bool {
        self.dirty.is_empty()
    }
}

impl Environment for VacuumWorldEnvironment<'_> {
    type Action = Action;
    type Percept = VacuumWorldPercept;
    type Score = u32;

    fn percept(&self) -> Self::Percept {
        VacuumWorldPercept {
            location: self.agent_location,
            dirty: self.dirty.contains(&self.agent_location),
        }
    }

    fn execute_action(&mut self, action: &Self::Action) -> Result<(), ReplayError> {
        let step = self.steps;
        let from = self.agent_location;
        match action {
            Action::Vacuum => {
                if !self.dirty.remove(&from) {
                    return Err(ReplayError::NothingToVacuum { step, at: from });
                }
                self.cleaned += 1;
            }
            _ => {
                let target = self.world.neighbour(from, *action).ok_or(
                    ReplayError::OutOfBounds {
                        step,
                        action: *action,
                        from,
                    },
                )?;
                if !self.world.get(target).is_passable() {
                    return Err(ReplayError::HitWall {
                        step,
                        action: *action,
                        from,
                    });
                }
                self.agent_location = target;
            }
        }
        self.steps += 1;
        Ok(())
    }

    fn score(&self) -> Self::Score {
        self.cleaned
    }
}

/// Agent that ignores its percepts and plays back a fixed list of actions.
pub struct PlanAgent {
    plan: std::vec::IntoIter<Action>,
}

impl PlanAgent {
    /// Agent that will emit `plan` in order.
    pub fn new(plan: Vec<Action>) -> Self {
        Self {
            plan: plan.into_iter(),
        }
    }
}

impl Agent for PlanAgent {
    type Action = Action;
    type Percept = VacuumWorldPercept;

    fn act(&mut self, _percept: &Self::Percept) -> Option<Self::Action> {
        self.plan.next()
    }
}

/// A Simulation runs a single Agent against an Environment until the Agent stops acting.
///
/// The Simulation is aware of both the Environment and the single Agent. Notice that the Agent's
/// generic Action and Percept come from the Environment.
pub struct Simulation<_Environment, _Agent>
where
    _Environment: Environment,
    _Agent: Agent<Action = _Environment::Action, Percept = _Environment::Percept>,
{
    environment: _Environment,
    agent: _Agent,
    time_steps: usize,
    score: _Environment::Score,
}

impl<_Environment, _Agent> Simulation<_Environment, _Agent>
where
    _Environment: Environment,
    _Agent: Agent<Action = _Environment::Action, Percept = _Environment::Percept>,
{
    /// Pair an environment with an agent.
    pub fn new(environment: _Environment, agent: _Agent) -> Self {
        Self {
            environment,
            agent,
            time_steps: 0,
            score: _Environment::Score::zero(),
        }
    }

    /// Run until the agent returns no action. Stops at the first rejected action.
    pub fn run(&mut self) -> Result<(), ReplayError> {
        loop {
            let percept = self.environment.percept();
            let Some(action) = self.agent.act(&percept) else {
                return Ok(());
            };
            self.environment.execute_action(&action)?;
            self.time_steps += 1;
            self.score = self.environment.score();
        }
    }

    /// Number of actions executed so far.
    pub fn time_steps(&self) -> usize {
        self.time_steps
    }

    /// Environment score after the last executed action.
    pub fn score(&self) -> <_Environment as Environment>::Score {
        self.score
    }

    /// The environment, e.g. to inspect its final state.
    pub fn environment(&self) -> &_Environment {
        &self.environment
    }
}

/// Outcome of replaying a full plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Replay {
    /// Agent position after the last action.
    pub final_position: Position,
    /// Dirty cells left after the last action.
    pub remaining_dirty: usize,
    /// Cells vacuumed.
    pub cleaned: u32,
    /// Actions executed.
    pub steps: usize,
}

impl Replay {
    /// Whether the plan left no dirty cell behind.
    pub fn is_clean(&self) -> bool {
        self.remaining_dirty == 0
    }
}

/// Replay `plan` from the world's start and report where it ends up.
pub fn replay(world: &World, plan: &[Action]) -> Result<Replay, ReplayError> {
    let mut simulation = Simulation::new(
        VacuumWorldEnvironment::new(world),
        PlanAgent::new(plan.to_vec()),
    );
    simulation.run()?;
    let environment = simulation.environment();
    Ok(Replay {
        final_position: environment.agent_location(),
        remaining_dirty: environment.remaining_dirty(),
        cleaned: simulation.score(),
        steps: simulation.time_steps(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world(s: &str) -> World {
        s.parse().expect("parse failed")
    }

    #[test]
    fn test_environment_returns_dirty_percept() {
        let world = world("2\n1\n@*\n");
        let mut env = VacuumWorldEnvironment::new(&world);
        assert_eq!(
            env.percept(),
            VacuumWorldPercept {
                location: Position::new(0, 0),
                dirty: false
            }
        );
        env.execute_action(&Action::East).expect("move failed");
        assert_eq!(
            env.percept(),
            VacuumWorldPercept {
                location: Position::new(0, 1),
                dirty: true
            }
        );
    }

    #[test]
    fn test_environment_allows_cleaning() {
        let world = world("2\n1\n@*\n");
        let mut env = VacuumWorldEnvironment::new(&world);
        assert_eq!(env.score(), 0);
        env.execute_action(&Action::East).expect("move failed");
        env.execute_action(&Action::Vacuum).expect("vacuum failed");
        assert_eq!(env.score(), 1);
        assert!(env.is_clean());
    }

    #[test]
    fn test_environment_rejects_illegal_actions() {
        let world = world("3\n1\n@#*\n");
        let mut env = VacuumWorldEnvironment::new(&world);
        let origin = Position::new(0, 0);
        assert_eq!(
            env.execute_action(&Action::West),
            Err(ReplayError::OutOfBounds {
                step: 0,
                action: Action::West,
                from: origin
            })
        );
        assert_eq!(
            env.execute_action(&Action::East),
            Err(ReplayError::HitWall {
                step: 0,
                action: Action::East,
                from: origin
            })
        );
        assert_eq!(
            env.execute_action(&Action::Vacuum),
            Err(ReplayError::NothingToVacuum { step: 0, at: origin })
        );
        assert_eq!(env.agent_location(), origin);
    }

    #[test]
    fn test_replay_reports_final_state() {
        let world = world("3\n1\n_*@\n");
        let replay = replay(&world, &[Action::West, Action::Vacuum]).expect("replay failed");
        assert_eq!(
            replay,
            Replay {
                final_position: Position::new(0, 1),
                remaining_dirty: 0,
                cleaned: 1,
                steps: 2,
            }
        );
        assert!(replay.is_clean());
    }

    #[test]
    fn test_replay_of_partial_plan_is_not_clean() {
        let world = world("3\n1\n*_@\n");
        let replay = replay(&world, &[Action::West]).expect("replay failed");
        assert!(!replay.is_clean());
        assert_eq!(replay.final_position, Position::new(0, 1));
    }

    #[test]
    fn test_replay_error_carries_step_index() {
        let world = world("2\n2\n@_\n#_\n");
        let err = replay(&world, &[Action::East, Action::South, Action::West])
            .expect_err("should hit the wall");
        assert_eq!(
            err,
            ReplayError::HitWall {
                step: 2,
                action: Action::West,
                from: Position::new(1, 1)
            }
        );
    }
}
