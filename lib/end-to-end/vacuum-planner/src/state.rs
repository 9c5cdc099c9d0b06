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

use rustc_hash::FxHashMap;
use vacuum_world_logic::{Action, Position, World};

const WORD_BITS: usize = u64::BITS as usize;

/// Remaining dirty cells, as a bitmask over the world's dirty-cell ordinals
/// (see [`World::dirty_cells`]). Compared and hashed by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirtySet {
    words: Box<[u64]>,
}

impl DirtySet {
    /// Every one of `count` ordinals set.
    pub fn full(count: usize) -> Self {
        let words = (0..(count + WORD_BITS - 1) / WORD_BITS)
            .map(|i| {
                let bits = (count - i * WORD_BITS).min(WORD_BITS);
                if bits == WORD_BITS {
                    u64::MAX
                } else {
                    (1u64 << bits) - 1
                }
            })
            .collect();
        Self { words }
    }

    /// Whether the cell with this ordinal is still dirty.
    pub fn contains(&self, ordinal: usize) -> bool {
        self.words
            .get(ordinal / WORD_BITS)
            .is_some_and(|word| (word >> (ordinal % WORD_BITS)) & 1 == 1)
    }

    /// Copy of this set with `ordinal` cleared.
    pub fn without(&self, ordinal: usize) -> Self {
        let mut words = self.words.clone();
        if let Some(word) = words.get_mut(ordinal / WORD_BITS) {
            *word &= !(1u64 << (ordinal % WORD_BITS));
        }
        Self { words }
    }

    /// Whether every cell is clean.
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|word| *word == 0)
    }
}

/// Search state identity: where the agent is and which cells are still dirty. The action history
/// is kept by the search engine and is not part of equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VacuumState {
    /// Agent position.
    pub position: Position,

    /// Cells still to vacuum.
    pub dirty: DirtySet,
}

/// Vacuum World as a search problem. Borrows the world for the lifetime of a search.
pub struct VacuumProblem<'a> {
    world: &'a World,
    ordinals: FxHashMap<Position, usize>,
}

impl<'a> VacuumProblem<'a> {
    /// Index the world's dirty cells.
    pub fn new(world: &'a World) -> Self {
        let ordinals = world
            .dirty_cells()
            .iter()
            .enumerate()
            .map(|(ordinal, position)| (*position, ordinal))
            .collect();
        Self { world, ordinals }
    }

    /// Agent at the start, every dirty cell still dirty.
    pub fn initial_state(&self) -> VacuumState {
        VacuumState {
            position: self.world.start(),
            dirty: DirtySet::full(self.world.dirty_cells().len()),
        }
    }

    /// If the agent stands on a dirty cell, the state after vacuuming it.
    pub fn vacuum_transition(&self, state: &VacuumState) -> Option<VacuumState> {
        let ordinal = *self.ordinals.get(&state.position)?;
        state.dirty.contains(ordinal).then(|| VacuumState {
            position: state.position,
            dirty: state.dirty.without(ordinal),
        })
    }
}

/// Moves from `state` that stay inside the grid and off walls, in North, South, East, West order.
/// Successors keep the parent's dirty set; vacuuming happens on expansion, not on generation.
pub fn successors(state: &VacuumState, world: &World) -> Vec<(Action, VacuumState)> {
    Action::MOVES
        .iter()
        .filter_map(|action| {
            world.step(state.position, *action).map(|position| {
                (
                    *action,
                    VacuumState {
                        position,
                        dirty: state.dirty.clone(),
                    },
                )
            })
        })
        .collect()
}

impl uninformed_search::Problem for VacuumProblem<'_> {
    type State = VacuumState;
    type Action = Action;

    fn on_arrival(&self, state: &VacuumState) -> Option<(VacuumState, Action)> {
        self.vacuum_transition(state)
            .map(|vacuumed| (vacuumed, Action::Vacuum))
    }

    fn is_goal(&self, state: &VacuumState) -> bool {
        state.dirty.is_empty()
    }

    fn successors(&self, state: &VacuumState) -> Vec<(Action, VacuumState)> {
        successors(state, self.world)
    }
}
