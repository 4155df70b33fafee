//! The recipe selection engine.
//!
//! [`RecipePicker`] owns a recipe pool and one binary decision per recipe.
//! Every counting constraint becomes one linear row over those decisions,
//! alongside the cardinality row fixing the selection size. Solving
//! maximizes fresh random weights, so among all selections that satisfy the
//! constraints one is picked at random.
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use menuforge_core::{Comparison, ConstraintKind, CountConstraint, Recipe, RecipeId};
//! use menuforge_solver::RecipePicker;
//!
//! let pool: Vec<Recipe> = (1..=6)
//!     .map(|id| Recipe::new(RecipeId::new(id), format!("Recipe {id}"), Utc::now()))
//!     .collect();
//!
//! let mut picker = RecipePicker::new(pool, 3).unwrap().with_seed(7);
//! picker
//!     .add_constraint(CountConstraint::new(
//!         ConstraintKind::Keyword,
//!         [RecipeId::new(1), RecipeId::new(2)],
//!         Comparison::Exactly,
//!         2,
//!     ))
//!     .unwrap();
//!
//! let selection = picker.solve().unwrap();
//! assert_eq!(selection.len(), 3);
//! assert!(selection.ids().any(|id| id == RecipeId::new(1)));
//! assert!(selection.ids().any(|id| id == RecipeId::new(2)));
//! ```

mod report;
mod selection;

#[cfg(test)]
mod tests;

use std::collections::{HashMap, HashSet};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use menuforge_config::TerminationConfig;
use menuforge_core::{CountConstraint, MenuForgeError, Recipe, RecipeId, Result};
use tracing::{debug, info, warn};

use crate::backend::{BinarySolver, BranchAndBoundSolver, SolveFailure};
use crate::objective::TieBreaker;
use crate::problem::{BinaryProblem, Relation};
use crate::termination::{self, ExternalTermination, OrTermination, Termination};

pub use report::{ConstraintReport, FeasibilityWarning};
pub use selection::Selection;

type PickerTermination = OrTermination<(ExternalTermination, Option<Box<dyn Termination>>)>;

/// Picks a fixed number of recipes subject to counting constraints.
///
/// The pool is fixed at construction. Constraints accumulate; each
/// [`solve`](Self::solve) call draws new weights and solves the current set.
#[derive(Debug)]
pub struct RecipePicker<B: BinarySolver = BranchAndBoundSolver> {
    recipes: Vec<Recipe>,
    index: HashMap<RecipeId, usize>,
    choices: usize,
    problem: BinaryProblem,
    constraints: Vec<ConstraintReport>,
    warnings: Vec<FeasibilityWarning>,
    tie_breaker: TieBreaker,
    solver: B,
    termination: PickerTermination,
}

impl RecipePicker {
    /// Creates a picker over `recipes` that selects exactly `choices` of them.
    ///
    /// # Errors
    ///
    /// Returns [`MenuForgeError::InvalidPool`] if two recipes share an id or
    /// `choices` is negative.
    pub fn new<N: TryInto<usize>>(recipes: Vec<Recipe>, choices: N) -> Result<Self> {
        Self::with_backend(recipes, choices, BranchAndBoundSolver::new())
    }
}

impl<B: BinarySolver> RecipePicker<B> {
    /// Creates a picker that solves with `solver`.
    pub fn with_backend<N: TryInto<usize>>(
        recipes: Vec<Recipe>,
        choices: N,
        solver: B,
    ) -> Result<Self> {
        let choices = choices.try_into().map_err(|_| {
            MenuForgeError::InvalidPool("number of choices must not be negative".to_string())
        })?;

        let mut index = HashMap::with_capacity(recipes.len());
        for (position, recipe) in recipes.iter().enumerate() {
            if index.insert(recipe.id, position).is_some() {
                return Err(MenuForgeError::InvalidPool(format!(
                    "duplicate recipe id {}",
                    recipe.id
                )));
            }
        }

        let cardinality = i64::try_from(choices).map_err(|_| {
            MenuForgeError::InvalidPool(format!("number of choices {choices} is too large"))
        })?;
        let mut problem = BinaryProblem::new(recipes.len());
        problem.add_linear_constraint(
            (0..recipes.len()).map(|i| (i, 1)),
            Relation::Equal,
            cardinality,
        );

        Ok(Self {
            recipes,
            index,
            choices,
            problem,
            constraints: Vec::new(),
            warnings: Vec::new(),
            tie_breaker: TieBreaker::default(),
            solver,
            termination: OrTermination((ExternalTermination::default(), None)),
        })
    }

    /// Replaces the backend, keeping pool and constraints.
    pub fn with_solver<S: BinarySolver>(self, solver: S) -> RecipePicker<S> {
        RecipePicker {
            recipes: self.recipes,
            index: self.index,
            choices: self.choices,
            problem: self.problem,
            constraints: self.constraints,
            warnings: self.warnings,
            tie_breaker: self.tie_breaker,
            solver,
            termination: self.termination,
        }
    }

    /// Makes weight draws reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.tie_breaker = TieBreaker::with_seed(seed);
        self
    }

    /// Stops each solve when `termination` fires.
    ///
    /// The external flag from [`terminate_flag`](Self::terminate_flag) is
    /// always checked as well.
    pub fn with_termination<T: Termination + 'static>(mut self, termination: T) -> Self {
        (self.termination.0).1 = Some(Box::new(termination));
        self
    }

    /// Applies the time and node limits of a configuration.
    pub fn with_termination_config(mut self, config: &TerminationConfig) -> Self {
        (self.termination.0).1 = termination::from_config(config);
        self
    }

    /// Returns the flag that stops a running solve when raised.
    ///
    /// The flag stays raised; lower it before solving again.
    pub fn terminate_flag(&self) -> Arc<AtomicBool> {
        (self.termination.0).0.flag()
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn choices(&self) -> usize {
        self.choices
    }

    /// Number of counting constraints added, not counting cardinality.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    pub fn constraints(&self) -> &[ConstraintReport] {
        &self.constraints
    }

    pub fn warnings(&self) -> &[FeasibilityWarning] {
        &self.warnings
    }

    /// Adds a counting constraint over the pool.
    ///
    /// The condition is intersected with the pool first; ids outside the
    /// pool are ignored. An excluding constraint then applies to the pool
    /// recipes outside the condition. A lower-bounded constraint whose
    /// working set is smaller than its count is still added and produces a
    /// [`FeasibilityWarning`].
    pub fn add_constraint(
        &mut self,
        constraint: CountConstraint,
    ) -> Result<Option<FeasibilityWarning>> {
        let matched: HashSet<usize> = constraint
            .condition
            .iter()
            .filter_map(|id| self.index.get(id).copied())
            .collect();
        let working: Vec<usize> = (0..self.recipes.len())
            .filter(|i| matched.contains(i) != constraint.exclude)
            .collect();

        let count = i64::try_from(constraint.count).map_err(|_| {
            MenuForgeError::InvalidPool(format!("constraint count {} is too large", constraint.count))
        })?;

        let report = ConstraintReport {
            kind: constraint.kind,
            comparison: constraint.comparison,
            count: constraint.count,
            exclude: constraint.exclude,
            matched: working.len(),
        };
        let description = report.describe();

        let warning = (report.comparison.has_lower_bound() && working.len() < report.count)
            .then(|| FeasibilityWarning {
                constraint: description.clone(),
                matched: working.len(),
                count: report.count,
            });
        if let Some(warning) = &warning {
            warn!(
                event = "feasibility_warning",
                constraint = %description,
                matched = warning.matched,
                count = warning.count,
                "{warning}"
            );
            self.warnings.push(warning.clone());
        }

        self.problem.add_linear_constraint(
            working.iter().map(|&i| (i, 1)),
            Relation::from(report.comparison),
            count,
        );
        debug!(
            event = "constraint_added",
            constraint = %description,
            matched = report.matched,
            constraint_count = self.constraints.len() + 1,
        );
        self.constraints.push(report);

        Ok(warning)
    }

    /// Solves the current constraint set.
    ///
    /// # Errors
    ///
    /// - [`MenuForgeError::Infeasible`] if no selection satisfies every
    ///   constraint.
    /// - [`MenuForgeError::Terminated`] if the search was stopped before any
    ///   selection was found. A search stopped after finding one returns it.
    pub fn solve(&mut self) -> Result<Selection> {
        let weights = self.tie_breaker.draw(self.recipes.len());
        self.problem.set_objective(weights);

        info!(
            event = "solve_start",
            recipe_count = self.recipes.len(),
            choices = self.choices,
            constraint_count = self.constraints.len(),
        );

        match self.solver.solve(&self.problem, &self.termination) {
            Ok(solution) => {
                if !self.problem.is_satisfied_by(&solution.assignment) {
                    warn!(
                        event = "solve_end",
                        feasible = false,
                        "backend returned an assignment that violates the constraints"
                    );
                    return Err(MenuForgeError::Infeasible);
                }

                let recipes: Vec<Recipe> = solution
                    .assignment
                    .selected()
                    .filter_map(|i| self.recipes.get(i).cloned())
                    .collect();
                info!(
                    event = "solve_end",
                    feasible = true,
                    selected = recipes.len(),
                    status = %solution.status,
                    nodes_explored = solution.stats.nodes_explored,
                    duration_ms = solution.stats.elapsed.as_millis() as u64,
                );
                Ok(Selection {
                    recipes,
                    objective: solution.objective,
                    status: solution.status,
                    stats: solution.stats,
                })
            }
            Err(SolveFailure::Infeasible(stats)) => {
                info!(
                    event = "solve_end",
                    feasible = false,
                    nodes_explored = stats.nodes_explored,
                    duration_ms = stats.elapsed.as_millis() as u64,
                    "No solution found, adjustment of criteria required."
                );
                Err(MenuForgeError::Infeasible)
            }
            Err(SolveFailure::Terminated(stats)) => {
                warn!(
                    event = "solve_end",
                    feasible = false,
                    terminated = true,
                    nodes_explored = stats.nodes_explored,
                    duration_ms = stats.elapsed.as_millis() as u64,
                );
                Err(MenuForgeError::Terminated)
            }
        }
    }
}
