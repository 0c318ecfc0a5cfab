//! Directional candidate scoring.
//!
//! A move first looks for a winner among the nodes sharing the current
//! node's nearest non-modal group, then falls back to every candidate in the
//! active scope. Lower cost wins; equal costs keep the earlier node in arena
//! order, so the same tree and the same input always pick the same node.

use crate::adapter::ElementTree;
use crate::geom::{Direction, Rect, Vec2};
use crate::modal::ModalContextStack;
use crate::node::{NodeArena, NodeId, NodeRole};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Tuning of the directional cost function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Cost multiplier for candidates sharing the current node's parent.
    pub same_parent_bonus: f32,
    /// Cost multiplier for candidates aligned on the cross axis.
    pub alignment_bonus: f32,
    /// Cross-axis offset (pixels) under which a candidate counts as aligned.
    pub alignment_tolerance: f32,
    /// Lower bound of the direction dot product in the cost denominator.
    pub epsilon: f32,
    /// Centers closer than this are treated as coincident.
    pub min_distance: f32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            same_parent_bonus: 0.7,
            alignment_bonus: 0.8,
            alignment_tolerance: 20.0,
            epsilon: 1e-3,
            min_distance: 0.5,
        }
    }
}

impl ScoringConfig {
    /// Check value ranges. Returns the offending field and reason.
    pub fn validate(&self) -> Result<(), (&'static str, String)> {
        for (field, value) in [
            ("scoring.same_parent_bonus", self.same_parent_bonus),
            ("scoring.alignment_bonus", self.alignment_bonus),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err((field, format!("{value} is outside (0, 1]")));
            }
        }
        if !(self.alignment_tolerance >= 0.0) {
            return Err((
                "scoring.alignment_tolerance",
                format!("{} is negative", self.alignment_tolerance),
            ));
        }
        if !(self.epsilon > 0.0) {
            return Err(("scoring.epsilon", format!("{} must be positive", self.epsilon)));
        }
        if !(self.min_distance >= 0.0) {
            return Err((
                "scoring.min_distance",
                format!("{} is negative", self.min_distance),
            ));
        }
        Ok(())
    }
}

/// A node considered by one move, with its live bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub id: NodeId,
    pub bounds: Rect,
    pub parent: Option<NodeId>,
}

impl Candidate {
    pub fn center(&self) -> Vec2 {
        self.bounds.center()
    }
}

/// Cost of moving from `current` to `candidate`, `None` when the candidate
/// is not in `direction`.
pub fn score(
    config: &ScoringConfig,
    current: &Candidate,
    candidate: &Candidate,
    direction: Direction,
) -> Option<f32> {
    let v = candidate.center() - current.center();
    let distance = v.length();
    if distance < config.min_distance {
        return None;
    }
    let dot = v.normalized()?.dot(direction.unit_vector());
    if dot <= 0.0 {
        return None;
    }

    let mut cost = distance / dot.max(config.epsilon);
    if current.parent.is_some() && candidate.parent == current.parent {
        cost *= config.same_parent_bonus;
    }
    let cross = if direction.is_vertical() { v.x } else { v.y };
    if cross.abs() < config.alignment_tolerance {
        cost *= config.alignment_bonus;
    }
    Some(cost)
}

/// Lowest-cost candidate. Ties keep the earliest candidate.
pub fn best_candidate(
    config: &ScoringConfig,
    current: &Candidate,
    candidates: &[Candidate],
    direction: Direction,
) -> Option<NodeId> {
    let mut best: Option<(NodeId, f32)> = None;
    for candidate in candidates {
        let Some(cost) = score(config, current, candidate, direction) else {
            continue;
        };
        trace!(candidate = %candidate.id, cost, "scored");
        if best.map_or(true, |(_, best_cost)| cost < best_cost) {
            best = Some((candidate.id, cost));
        }
    }
    best.map(|(id, _)| id)
}

/// Read-only spatial queries over the arena.
#[derive(Debug, Clone, Default)]
pub struct DirectionalNavigator {
    config: ScoringConfig,
}

impl DirectionalNavigator {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Navigable nodes in the active scope with live bounds, in arena order.
    pub fn candidates<T>(
        &self,
        adapter: &T,
        arena: &NodeArena<T::Element>,
        stack: &ModalContextStack,
        exclude: Option<NodeId>,
    ) -> Vec<Candidate>
    where
        T: ElementTree,
    {
        arena
            .iter()
            .filter(|(id, node)| {
                Some(*id) != exclude
                    && node.is_navigable()
                    && stack.is_in_active_scope(*id, arena)
                    && adapter.is_alive(&node.element)
            })
            .filter_map(|(id, node)| {
                let bounds = adapter.bounds(&node.element)?;
                Some(Candidate {
                    id,
                    bounds,
                    parent: node.parent,
                })
            })
            .collect()
    }

    /// Best node to move to from `current` in `direction`.
    pub fn find_target<T>(
        &self,
        adapter: &T,
        arena: &NodeArena<T::Element>,
        stack: &ModalContextStack,
        current: NodeId,
        direction: Direction,
    ) -> Option<NodeId>
    where
        T: ElementTree,
    {
        let node = arena.get(current)?;
        let bounds = adapter.bounds(&node.element).or(node.bounds)?;
        let origin = Candidate {
            id: current,
            bounds,
            parent: node.parent,
        };
        let candidates = self.candidates(adapter, arena, stack, Some(current));

        let group = arena.ancestors(current).find(|id| {
            arena
                .get(*id)
                .is_some_and(|n| n.role == NodeRole::Group && !n.is_modal())
        });
        if let Some(group) = group {
            let local: Vec<Candidate> = candidates
                .iter()
                .filter(|c| arena.is_descendant_of(c.id, group))
                .copied()
                .collect();
            if let Some(target) = best_candidate(&self.config, &origin, &local, direction) {
                trace!(%current, %target, %group, "local winner");
                return Some(target);
            }
        }
        best_candidate(&self.config, &origin, &candidates, direction)
    }

    /// Top-left navigable node of the active scope.
    pub fn initial_target<T>(
        &self,
        adapter: &T,
        arena: &NodeArena<T::Element>,
        stack: &ModalContextStack,
    ) -> Option<NodeId>
    where
        T: ElementTree,
    {
        let mut best: Option<Candidate> = None;
        for candidate in self.candidates(adapter, arena, stack, None) {
            let better = best.map_or(true, |b| {
                (candidate.bounds.y, candidate.bounds.x) < (b.bounds.y, b.bounds.x)
            });
            if better {
                best = Some(candidate);
            }
        }
        best.map(|c| c.id)
    }
}
