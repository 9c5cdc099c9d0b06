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

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Frontier is the collection of generated but not yet expanded nodes. The order in which nodes
/// come back out is the only difference between search strategies.
pub trait Frontier<_Node> {
    /// Add a node with the given path cost.
    fn push(&mut self, node: _Node, cost: usize);

    /// Remove the next node to expand.
    fn pop(&mut self) -> Option<_Node>;

    /// Number of pending nodes.
    fn len(&self) -> usize;

    /// Whether there are no pending nodes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Heap entry. Ordered by (cost, insertion sequence) and reversed, so the max-heap pops the
/// cheapest node and, among equal costs, the one pushed first.
struct CostEntry<_Node> {
    cost: usize,
    sequence: u64,
    node: _Node,
}

impl<_Node> PartialEq for CostEntry<_Node> {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost && self.sequence == other.sequence
    }
}

impl<_Node> Eq for CostEntry<_Node> {}

impl<_Node> Ord for CostEntry<_Node> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl<_Node> PartialOrd for CostEntry<_Node> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Priority frontier for uniform-cost search. Cheapest first, FIFO among equal costs.
pub struct CostOrderedFrontier<_Node> {
    heap: BinaryHeap<CostEntry<_Node>>,
    next_sequence: u64,
}

impl<_Node> CostOrderedFrontier<_Node> {
    /// Empty frontier.
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_sequence: 0,
        }
    }
}

impl<_Node> Default for CostOrderedFrontier<_Node> {
    fn default() -> Self {
        Self::new()
    }
}

impl<_Node> Frontier<_Node> for CostOrderedFrontier<_Node> {
    fn push(&mut self, node: _Node, cost: usize) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(CostEntry {
            cost,
            sequence,
            node,
        });
    }

    fn pop(&mut self) -> Option<_Node> {
        self.heap.pop().map(|entry| entry.node)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

/// Last-in first-out frontier for depth-first search. Cost is ignored.
pub struct StackFrontier<_Node> {
    stack: Vec<_Node>,
}

impl<_Node> StackFrontier<_Node> {
    /// Empty frontier.
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }
}

impl<_Node> Default for StackFrontier<_Node> {
    fn default() -> Self {
        Self::new()
    }
}

impl<_Node> Frontier<_Node> for StackFrontier<_Node> {
    fn push(&mut self, node: _Node, _cost: usize) {
        self.stack.push(node);
    }

    fn pop(&mut self) -> Option<_Node> {
        self.stack.pop()
    }

    fn len(&self) -> usize {
        self.stack.len()
    }
}
