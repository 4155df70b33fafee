//! Backends that solve a [`BinaryProblem`].
//!
//! The picker only talks to the [`BinarySolver`] trait, so any backend that
//! maximizes a 0/1 program under linear constraints can replace the bundled
//! [`BranchAndBoundSolver`].

mod branch_and_bound;

use std::fmt::Debug;

use thiserror::Error;

use crate::problem::{Assignment, BinaryProblem};
use crate::stats::SearchStats;
use crate::termination::Termination;

pub use branch_and_bound::BranchAndBoundSolver;

/// Solves 0/1 integer programs.
pub trait BinarySolver: Debug {
    /// Maximizes the problem's objective subject to its constraints.
    ///
    /// A returned [`Solution`] always satisfies every constraint. The backend
    /// checks `termination` regularly and stops when it fires.
    fn solve<T: Termination + ?Sized>(
        &self,
        problem: &BinaryProblem,
        termination: &T,
    ) -> Result<Solution, SolveFailure>;
}

/// How much of the search space was covered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// The search completed; the assignment is optimal.
    Optimal,
    /// The search was terminated; the assignment is feasible but may not be
    /// optimal.
    Feasible,
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveStatus::Optimal => write!(f, "optimal"),
            SolveStatus::Feasible => write!(f, "feasible"),
        }
    }
}

/// A feasible assignment found by a backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub assignment: Assignment,
    pub objective: f64,
    pub status: SolveStatus,
    pub stats: SearchStats,
}

/// Why a backend returned no assignment.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveFailure {
    /// No assignment satisfies every constraint.
    #[error("problem is infeasible")]
    Infeasible(SearchStats),

    /// The search stopped before any feasible assignment was found.
    #[error("search terminated before a feasible assignment was found")]
    Terminated(SearchStats),
}

impl SolveFailure {
    pub fn stats(&self) -> &SearchStats {
        match self {
            SolveFailure::Infeasible(stats) | SolveFailure::Terminated(stats) => stats,
        }
    }
}
