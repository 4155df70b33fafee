//! Counting constraint types.
//!
//! A counting constraint restricts how many selected recipes may come from a
//! resolved subset of the pool. Constraints are validated when they are built:
//! an unknown operator never reaches the selection engine.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::domain::{Recipe, RecipeId};
use crate::error::MenuForgeError;

/// Comparison operator of a counting constraint.
///
/// # Example
///
/// ```
/// use menuforge_core::Comparison;
///
/// let op: Comparison = ">=".parse().unwrap();
/// assert_eq!(op, Comparison::AtLeast);
/// assert!(op.holds(3, 2));
/// assert!("<>".parse::<Comparison>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub enum Comparison {
    /// `>=`
    AtLeast,
    /// `<=`
    AtMost,
    /// `==`
    Exactly,
}

impl Comparison {
    /// All valid operators.
    pub const ALL: [Comparison; 3] = [Comparison::AtLeast, Comparison::AtMost, Comparison::Exactly];

    /// Returns the operator symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            Comparison::AtLeast => ">=",
            Comparison::AtMost => "<=",
            Comparison::Exactly => "==",
        }
    }

    /// Returns true if `actual` satisfies the comparison against `target`.
    pub fn holds(self, actual: usize, target: usize) -> bool {
        match self {
            Comparison::AtLeast => actual >= target,
            Comparison::AtMost => actual <= target,
            Comparison::Exactly => actual == target,
        }
    }

    /// Returns true if the operator places a lower bound on the count.
    ///
    /// Lower-bounded constraints can be infeasible on their own when too few
    /// recipes match.
    pub fn has_lower_bound(self) -> bool {
        matches!(self, Comparison::AtLeast | Comparison::Exactly)
    }
}

impl FromStr for Comparison {
    type Err = MenuForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            ">=" => Ok(Comparison::AtLeast),
            "<=" => Ok(Comparison::AtMost),
            "==" => Ok(Comparison::Exactly),
            other => Err(MenuForgeError::InvalidOperator(other.to_string())),
        }
    }
}

impl TryFrom<String> for Comparison {
    type Error = MenuForgeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Comparison> for String {
    fn from(value: Comparison) -> Self {
        value.symbol().to_string()
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// What kind of condition a constraint was resolved from.
///
/// Only used for diagnostics and logging; the engine treats every
/// constraint the same way.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    Keyword,
    Book,
    Food,
    Rating,
    CreatedOn,
    CookedOn,
    /// Caller-defined condition.
    Custom(String),
}

impl ConstraintKind {
    /// Returns the label used in log output.
    pub fn label(&self) -> &str {
        match self {
            ConstraintKind::Keyword => "keyword",
            ConstraintKind::Book => "book",
            ConstraintKind::Food => "food",
            ConstraintKind::Rating => "rating",
            ConstraintKind::CreatedOn => "createdon",
            ConstraintKind::CookedOn => "cookedon",
            ConstraintKind::Custom(name) => name,
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A counting constraint over a resolved recipe subset.
///
/// `condition` is the set of recipe ids the constraint refers to. When
/// `exclude` is set the constraint counts the pool recipes *outside*
/// `condition` instead.
///
/// # Example
///
/// ```
/// use menuforge_core::{Comparison, ConstraintKind, CountConstraint, RecipeId};
///
/// let c = CountConstraint::new(
///     ConstraintKind::Keyword,
///     [RecipeId::new(1), RecipeId::new(2)],
///     Comparison::AtLeast,
///     1,
/// );
/// assert_eq!(c.describe(), "keyword >= 1");
///
/// let none: Vec<RecipeId> = Vec::new();
/// let parsed = CountConstraint::parse(ConstraintKind::Book, none.clone(), "<=", 0, true).unwrap();
/// assert!(parsed.exclude);
/// assert!(CountConstraint::parse(ConstraintKind::Book, none, "=", 0, false).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountConstraint {
    pub kind: ConstraintKind,
    pub condition: BTreeSet<RecipeId>,
    pub comparison: Comparison,
    pub count: usize,
    pub exclude: bool,
}

impl CountConstraint {
    /// Creates an including constraint.
    pub fn new(
        kind: ConstraintKind,
        condition: impl IntoIterator<Item = RecipeId>,
        comparison: Comparison,
        count: usize,
    ) -> Self {
        Self {
            kind,
            condition: condition.into_iter().collect(),
            comparison,
            count,
            exclude: false,
        }
    }

    /// Creates an including constraint from resolved recipes.
    pub fn from_recipes<'a>(
        kind: ConstraintKind,
        recipes: impl IntoIterator<Item = &'a Recipe>,
        comparison: Comparison,
        count: usize,
    ) -> Self {
        Self::new(kind, recipes.into_iter().map(|r| r.id), comparison, count)
    }

    /// Creates a constraint from an operator string, failing fast on an
    /// unknown operator.
    pub fn parse(
        kind: ConstraintKind,
        condition: impl IntoIterator<Item = RecipeId>,
        operator: &str,
        count: usize,
        exclude: bool,
    ) -> Result<Self, MenuForgeError> {
        let comparison = operator.parse()?;
        Ok(Self::new(kind, condition, comparison, count).excluding(exclude))
    }

    /// Sets whether the constraint applies to the complement of its condition.
    pub fn excluding(mut self, exclude: bool) -> Self {
        self.exclude = exclude;
        self
    }

    /// Returns a short human readable form such as `keyword >= 2`.
    pub fn describe(&self) -> String {
        let negation = if self.exclude { "not " } else { "" };
        format!("{}{} {} {}", negation, self.kind, self.comparison, self.count)
    }
}
