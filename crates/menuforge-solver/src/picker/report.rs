//! Diagnostics recorded while constraints are added.

use std::fmt;

use menuforge_core::{Comparison, ConstraintKind};

/// A constraint as the engine registered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintReport {
    pub kind: ConstraintKind,
    pub comparison: Comparison,
    pub count: usize,
    pub exclude: bool,
    /// Size of the working set after pool intersection and complement.
    pub matched: usize,
}

impl ConstraintReport {
    pub fn describe(&self) -> String {
        let negation = if self.exclude { "not " } else { "" };
        format!("{}{} {} {}", negation, self.kind, self.comparison, self.count)
    }
}

/// Non-fatal notice that a lower-bounded constraint matches fewer recipes
/// than it asks for.
///
/// The constraint is still added; the solve will report infeasibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeasibilityWarning {
    pub constraint: String,
    pub matched: usize,
    pub count: usize,
}

impl fmt::Display for FeasibilityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Constraint \"{}\" may be infeasible: only {} matching recipes in pool, {} required",
            self.constraint, self.matched, self.count
        )
    }
}
