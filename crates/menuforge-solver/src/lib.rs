//! MenuForge Solver - Selection engine for recipe menus
//!
//! This crate provides:
//! - A 0/1 integer program model ([`BinaryProblem`])
//! - The [`BinarySolver`] seam and a branch-and-bound backend
//! - Termination conditions checked once per search node
//! - [`RecipePicker`], which turns counting constraints over a recipe pool
//!   into a binary program and returns a uniformly tie-broken selection

pub mod backend;
pub mod objective;
pub mod picker;
pub mod problem;
pub mod scope;
pub mod stats;
pub mod termination;

#[cfg(test)]
mod problem_tests;

pub use backend::{BinarySolver, BranchAndBoundSolver, SolveFailure, SolveStatus, Solution};
pub use objective::TieBreaker;
pub use picker::{ConstraintReport, FeasibilityWarning, RecipePicker, Selection};
pub use problem::{Assignment, BinaryProblem, LinearConstraint, Relation};
pub use scope::SearchScope;
pub use stats::SearchStats;
pub use termination::{
    ExternalTermination, NoTermination, NodeCountTermination, OrTermination, Termination,
    TimeTermination,
};
