//! 0/1 integer programs.
//!
//! A [`BinaryProblem`] has one binary variable per index, a set of linear
//! constraints with integer coefficients and a linear objective to maximize.
//! Constraints are stored sparsely as `(variable, coefficient)` terms.

use std::collections::BTreeMap;
use std::fmt;

use menuforge_core::Comparison;

/// Relation between a constraint's activity and its right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    GreaterOrEqual,
    LessOrEqual,
    Equal,
}

impl Relation {
    /// Returns true if `lhs relation rhs` holds.
    pub fn holds(self, lhs: i64, rhs: i64) -> bool {
        match self {
            Relation::GreaterOrEqual => lhs >= rhs,
            Relation::LessOrEqual => lhs <= rhs,
            Relation::Equal => lhs == rhs,
        }
    }

    /// Returns true if the relation bounds the activity from above.
    pub fn has_upper_bound(self) -> bool {
        matches!(self, Relation::LessOrEqual | Relation::Equal)
    }

    /// Returns true if the relation bounds the activity from below.
    pub fn has_lower_bound(self) -> bool {
        matches!(self, Relation::GreaterOrEqual | Relation::Equal)
    }
}

impl From<Comparison> for Relation {
    fn from(comparison: Comparison) -> Self {
        match comparison {
            Comparison::AtLeast => Relation::GreaterOrEqual,
            Comparison::AtMost => Relation::LessOrEqual,
            Comparison::Exactly => Relation::Equal,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::GreaterOrEqual => f.write_str(">="),
            Relation::LessOrEqual => f.write_str("<="),
            Relation::Equal => f.write_str("=="),
        }
    }
}

/// `sum(coefficient * x[variable]) relation rhs`.
///
/// Terms are kept sorted by variable with duplicates merged and zero
/// coefficients dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearConstraint {
    terms: Vec<(usize, i64)>,
    relation: Relation,
    rhs: i64,
}

impl LinearConstraint {
    pub fn new(terms: impl IntoIterator<Item = (usize, i64)>, relation: Relation, rhs: i64) -> Self {
        let mut merged: BTreeMap<usize, i64> = BTreeMap::new();
        for (variable, coefficient) in terms {
            *merged.entry(variable).or_insert(0) += coefficient;
        }
        Self {
            terms: merged.into_iter().filter(|&(_, c)| c != 0).collect(),
            relation,
            rhs,
        }
    }

    pub fn terms(&self) -> &[(usize, i64)] {
        &self.terms
    }

    pub fn relation(&self) -> Relation {
        self.relation
    }

    pub fn rhs(&self) -> i64 {
        self.rhs
    }

    /// Evaluates the left-hand side for an assignment.
    pub fn activity(&self, assignment: &Assignment) -> i64 {
        self.terms
            .iter()
            .filter(|&&(variable, _)| assignment.is_selected(variable))
            .map(|&(_, coefficient)| coefficient)
            .sum()
    }

    pub fn is_satisfied_by(&self, assignment: &Assignment) -> bool {
        self.relation.holds(self.activity(assignment), self.rhs)
    }

    /// Returns the coefficient shared by every term, if there is one.
    pub fn uniform_coefficient(&self) -> Option<i64> {
        let (&(_, first), rest) = self.terms.split_first()?;
        rest.iter().all(|&(_, c)| c == first).then_some(first)
    }
}

/// Values of the variables of a [`BinaryProblem`].
///
/// Values are reals so that relaxation-based backends can report them
/// directly; a variable counts as selected when its value is at least 0.5.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Assignment {
    values: Vec<f64>,
}

impl Assignment {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn from_bools(flags: impl IntoIterator<Item = bool>) -> Self {
        Self::new(
            flags
                .into_iter()
                .map(|flag| if flag { 1.0 } else { 0.0 })
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn value(&self, variable: usize) -> f64 {
        self.values.get(variable).copied().unwrap_or(0.0)
    }

    pub fn is_selected(&self, variable: usize) -> bool {
        self.value(variable) >= 0.5
    }

    /// Indices of the selected variables in ascending order.
    pub fn selected(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.values.len()).filter(|&i| self.is_selected(i))
    }
}

/// A maximization problem over binary variables.
///
/// # Example
///
/// ```
/// use menuforge_solver::{Assignment, BinaryProblem, Relation};
///
/// let mut problem = BinaryProblem::new(3);
/// problem.add_linear_constraint([(0, 1), (1, 1), (2, 1)], Relation::Equal, 2);
/// problem.set_objective(vec![1.0, 5.0, 3.0]);
///
/// let best = Assignment::from_bools([false, true, true]);
/// assert!(problem.is_satisfied_by(&best));
/// assert_eq!(problem.objective_value(&best), 8.0);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BinaryProblem {
    variable_count: usize,
    constraints: Vec<LinearConstraint>,
    objective: Vec<f64>,
}

impl BinaryProblem {
    /// Creates a problem with `variable_count` variables and a zero objective.
    pub fn new(variable_count: usize) -> Self {
        Self {
            variable_count,
            constraints: Vec::new(),
            objective: vec![0.0; variable_count],
        }
    }

    /// Adds a constraint and returns its index.
    ///
    /// # Panics
    ///
    /// Panics if a term refers to a variable outside the problem.
    pub fn add_linear_constraint(
        &mut self,
        terms: impl IntoIterator<Item = (usize, i64)>,
        relation: Relation,
        rhs: i64,
    ) -> usize {
        let constraint = LinearConstraint::new(terms, relation, rhs);
        if let Some(&(variable, _)) = constraint.terms.last() {
            assert!(
                variable < self.variable_count,
                "variable {variable} out of range for {} variables",
                self.variable_count
            );
        }
        self.constraints.push(constraint);
        self.constraints.len() - 1
    }

    /// Replaces the objective weights.
    ///
    /// # Panics
    ///
    /// Panics if the number of weights differs from the variable count.
    pub fn set_objective(&mut self, weights: Vec<f64>) {
        assert_eq!(
            weights.len(),
            self.variable_count,
            "objective needs one weight per variable"
        );
        self.objective = weights;
    }

    pub fn variable_count(&self) -> usize {
        self.variable_count
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    pub fn objective(&self) -> &[f64] {
        &self.objective
    }

    pub fn objective_value(&self, assignment: &Assignment) -> f64 {
        assignment
            .selected()
            .filter_map(|i| self.objective.get(i))
            .sum()
    }

    /// Returns true if the assignment covers every variable and satisfies
    /// every constraint.
    pub fn is_satisfied_by(&self, assignment: &Assignment) -> bool {
        assignment.len() == self.variable_count
            && self.constraints.iter().all(|c| c.is_satisfied_by(assignment))
    }
}
