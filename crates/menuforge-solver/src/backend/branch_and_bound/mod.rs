//! Depth-first branch-and-bound.
//!
//! Variables are branched on in order of decreasing objective weight, trying
//! "select" before "skip", so the first complete assignment is a greedy one
//! and later ones only need to beat it. A node is pruned when:
//!
//! - some constraint can no longer be met by any completion, judged from the
//!   minimum and maximum activity the free variables can still add,
//! - the lower-bounded counting rows together need more selections than the
//!   remaining picks can cover, or
//! - the best objective reachable from it cannot beat the incumbent.
//!
//! When the problem carries a cardinality row (all ones over every variable
//! with `<=` or `==`), the number of remaining picks tightens these tests.
//!
//! Variables with identical columns are interchangeable, and only the
//! heaviest of them are worth selecting. Once one member of such a group is
//! skipped, the rest of the group is skipped too, without branching. A pool
//! of hundreds of recipes under a handful of constraints thus branches over
//! a few groups rather than over every recipe.
//!
//! The search is complete: it reports infeasibility only after the whole
//! tree has been explored or pruned.

mod model;
mod node;
mod state;


use tracing::{debug, trace};

use self::model::SearchModel;
use self::node::SearchNode;
use self::state::SearchState;
use super::{BinarySolver, Solution, SolveFailure, SolveStatus};
use crate::problem::BinaryProblem;
use crate::scope::SearchScope;
use crate::stats::SearchStats;
use crate::termination::Termination;

/// Objective differences below this are treated as ties.
const EPSILON: f64 = 1e-9;

/// Exact backend for small and medium selection problems.
#[derive(Debug, Clone)]
pub struct BranchAndBoundSolver {
    enable_pruning: bool,
}

impl Default for BranchAndBoundSolver {
    fn default() -> Self {
        Self {
            enable_pruning: true,
        }
    }
}

impl BranchAndBoundSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Disables objective-bound pruning; feasibility pruning stays on.
    pub fn without_bound_pruning() -> Self {
        Self {
            enable_pruning: false,
        }
    }

    fn can_prune(&self, state: &SearchState, model: &SearchModel, scope: &SearchScope) -> bool {
        if !self.enable_pruning {
            return false;
        }
        match scope.best_objective() {
            Some(best) => state.optimistic_bound(model) <= best + EPSILON,
            None => false,
        }
    }
}

impl BinarySolver for BranchAndBoundSolver {
    fn solve<T: Termination + ?Sized>(
        &self,
        problem: &BinaryProblem,
        termination: &T,
    ) -> Result<Solution, SolveFailure> {
        let model = SearchModel::build(problem);
        let mut state = SearchState::new(&model);
        let mut scope = SearchScope::new();
        let mut stats = SearchStats::default();
        let mut incumbent = None;
        let mut terminated = false;

        scope.start_solving();
        debug!(
            event = "search_start",
            variable_count = model.len(),
            constraint_count = problem.constraint_count(),
            group_count = model.groups.len(),
            pick_limit = ?model.pick_limit,
        );

        if !state.is_feasible(&model) {
            stats.record_prune(true);
        } else if model.is_empty() {
            scope.set_best_objective(0.0);
            stats.record_incumbent();
            incumbent = Some(state.to_assignment(&model));
        } else {
            let mut frontier: Vec<SearchNode> = SearchNode::children(0).to_vec();

            while let Some(node) = frontier.pop() {
                if termination.is_terminated(&scope) {
                    terminated = true;
                    break;
                }
                scope.increment_node_count();

                state.backtrack_to(&model, node.position());
                state.assign(&model, node.value());

                if !state.is_feasible(&model) {
                    stats.record_prune(true);
                    continue;
                }
                if self.can_prune(&state, &model, &scope) {
                    stats.record_prune(false);
                    continue;
                }

                state.skip_closed(&model);
                if state.depth() < model.len() {
                    frontier.extend(SearchNode::children(state.depth()));
                    continue;
                }

                // Complete and feasible: every row was checked with no free
                // variables left.
                let objective = state.objective();
                let improves = scope
                    .best_objective()
                    .map_or(true, |best| objective > best + EPSILON);
                if improves {
                    scope.set_best_objective(objective);
                    stats.record_incumbent();
                    incumbent = Some(state.to_assignment(&model));
                    trace!(
                        event = "incumbent",
                        objective,
                        nodes_explored = scope.nodes_explored(),
                    );
                }
            }
        }

        stats.nodes_explored = scope.nodes_explored();
        stats.elapsed = scope.elapsed().unwrap_or_default();
        debug!(
            event = "search_end",
            nodes_explored = stats.nodes_explored,
            infeasible_pruned = stats.infeasible_pruned,
            bound_pruned = stats.bound_pruned,
            incumbents_found = stats.incumbents_found,
            terminated,
            duration_ms = stats.elapsed.as_millis() as u64,
        );

        match incumbent {
            Some(assignment) => Ok(Solution {
                objective: problem.objective_value(&assignment),
                assignment,
                status: if terminated {
                    SolveStatus::Feasible
                } else {
                    SolveStatus::Optimal
                },
                stats,
            }),
            None if terminated => Err(SolveFailure::Terminated(stats)),
            None => Err(SolveFailure::Infeasible(stats)),
        }
    }
}
