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

//! Uninformed graph search.
//!
//! See Chapter 3: Solving Problems by Searching, section 3.4 Uninformed Search Strategies. Both
//! strategies share one loop and one duplicate policy, and differ only in their [`Frontier`].
//!
//! Duplicate policy: a state is recorded in the explored set when it is first pushed onto the
//! frontier (the initial state included), and a successor whose state is already recorded is
//! dropped. So no state is generated or expanded twice in one search.

use std::fmt::Debug;
use std::hash::Hash;
use std::str::FromStr;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

/// Frontier collections, one per strategy.
pub mod frontier;

pub use frontier::{CostOrderedFrontier, Frontier, StackFrontier};

/// Hash set used for the explored set.
pub type HashSet<K> = rustc_hash::FxHashSet<K>;

/// A search problem. `State` is the identity used for duplicate detection; the path that led to a
/// state is tracked by the engine and never part of that identity.
pub trait Problem {
    /// Search state. Two states that compare equal are the same node as far as the search is
    /// concerned.
    type State: Clone + Eq + Hash + Debug;

    /// Action labels making up a solution.
    type Action: Clone + Debug;

    /// Transition applied to a node when it is popped, before the goal test, e.g. an action that
    /// is always worth taking on arrival. It is not counted as a generated or expanded node.
    fn on_arrival(&self, state: &Self::State) -> Option<(Self::State, Self::Action)>;

    /// Goal test.
    fn is_goal(&self, state: &Self::State) -> bool;

    /// Successor states in a fixed order. The order is the tie-breaker between equal-cost nodes.
    fn successors(&self, state: &Self::State) -> Vec<(Self::Action, Self::State)>;
}

/// Which frontier to expand from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Priority by path length, FIFO among equal lengths. Finds a shortest action sequence.
    UniformCost,

    /// Last-in first-out. Complete on finite spaces, no optimality guarantee.
    DepthFirst,
}

impl Strategy {
    /// All strategies.
    pub const ALL: [Strategy; 2] = [Strategy::UniformCost, Strategy::DepthFirst];

    /// Command-line name.
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::UniformCost => "uniform-cost",
            Strategy::DepthFirst => "depth-first",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Unknown strategy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown strategy {0:?}, expected uniform-cost or depth-first")]
pub struct ParseStrategyError(String);

impl FromStr for Strategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.name() == s)
            .ok_or_else(|| ParseStrategyError(s.to_string()))
    }
}

/// Node counters. Generated counts successors pushed onto the frontier (not the initial node);
/// expanded counts nodes popped from it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchStatistics {
    /// Nodes added to the frontier.
    pub generated: u64,

    /// Nodes removed from the frontier and processed.
    pub expanded: u64,
}

/// Terminal outcome of one search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum SearchResult<_Action> {
    /// A goal was reached by `actions` from the initial state.
    Solved {
        /// Actions from the initial state to the goal.
        actions: Vec<_Action>,
        /// Node counters.
        statistics: SearchStatistics,
    },

    /// The frontier emptied without reaching a goal.
    Exhausted {
        /// Node counters.
        statistics: SearchStatistics,
    },
}

impl<_Action> SearchResult<_Action> {
    /// Node counters, whatever the outcome.
    pub fn statistics(&self) -> SearchStatistics {
        match self {
            SearchResult::Solved { statistics, .. } | SearchResult::Exhausted { statistics } => {
                *statistics
            }
        }
    }

    /// Solution actions, if solved.
    pub fn actions(&self) -> Option<&[_Action]> {
        match self {
            SearchResult::Solved { actions, .. } => Some(actions),
            SearchResult::Exhausted { .. } => None,
        }
    }

    /// Whether a goal was reached.
    pub fn is_solved(&self) -> bool {
        matches!(self, SearchResult::Solved { .. })
    }
}

/// Search node: a state plus the actions that led to it. Each node owns its own path, so frontier
/// entries never share state.
#[derive(Debug, Clone)]
struct Node<_State, _Action> {
    state: _State,
    path: Vec<_Action>,
}

impl<_State, _Action: Clone> Node<_State, _Action> {
    fn root(state: _State) -> Self {
        Self {
            state,
            path: Vec::new(),
        }
    }

    fn child(&self, state: _State, action: _Action) -> Self {
        let mut path = Vec::with_capacity(self.path.len() + 1);
        path.extend_from_slice(&self.path);
        path.push(action);
        Self { state, path }
    }

    fn cost(&self) -> usize {
        self.path.len()
    }
}

/// Run one search from `start` with the given strategy. Runs to completion: either a goal is found
/// or every state reachable from `start` has been expanded.
pub fn search<_Problem>(
    problem: &_Problem,
    start: _Problem::State,
    strategy: Strategy,
) -> SearchResult<_Problem::Action>
where
    _Problem: Problem,
{
    debug!("starting {} search from {:?}", strategy, start);
    let result = match strategy {
        Strategy::UniformCost => search_with(problem, start, CostOrderedFrontier::new()),
        Strategy::DepthFirst => search_with(problem, start, StackFrontier::new()),
    };
    let statistics = result.statistics();
    debug!(
        "{} search {}: {} generated, {} expanded",
        strategy,
        if result.is_solved() { "solved" } else { "exhausted" },
        statistics.generated,
        statistics.expanded
    );
    result
}

fn search_with<_Problem, _Frontier>(
    problem: &_Problem,
    start: _Problem::State,
    mut frontier: _Frontier,
) -> SearchResult<_Problem::Action>
where
    _Problem: Problem,
    _Frontier: Frontier<Node<_Problem::State, _Problem::Action>>,
{
    let mut statistics = SearchStatistics::default();
    let mut explored: HashSet<_Problem::State> = HashSet::default();

    explored.insert(start.clone());
    frontier.push(Node::root(start), 0);

    while let Some(mut node) = frontier.pop() {
        statistics.expanded += 1;
        trace!(
            "expanding {:?} at cost {} ({} pending)",
            node.state,
            node.cost(),
            frontier.len()
        );

        if let Some((state, action)) = problem.on_arrival(&node.state) {
            node.state = state;
            node.path.push(action);
        }

        if problem.is_goal(&node.state) {
            return SearchResult::Solved {
                actions: node.path,
                statistics,
            };
        }

        for (action, state) in problem.successors(&node.state) {
            if !explored.insert(state.clone()) {
                continue;
            }
            let child = node.child(state, action);
            let cost = child.cost();
            frontier.push(child, cost);
            statistics.generated += 1;
        }
    }

    SearchResult::Exhausted { statistics }
}
