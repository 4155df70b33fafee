//! Constraint satisfaction checks.
//!
//! These recompute constraint counts directly from a selection, independent
//! of the solver, so tests can verify solver output.

use std::collections::HashSet;

use menuforge_core::{CountConstraint, Recipe, RecipeId};

/// Counts selected recipes the constraint applies to.
///
/// The condition is first intersected with `pool`; an excluding constraint
/// counts the pool recipes outside the condition.
pub fn count_matching(pool: &[Recipe], selection: &[Recipe], constraint: &CountConstraint) -> usize {
    let pool_ids: HashSet<RecipeId> = pool.iter().map(|r| r.id).collect();
    selection
        .iter()
        .filter(|r| pool_ids.contains(&r.id))
        .filter(|r| constraint.condition.contains(&r.id) != constraint.exclude)
        .count()
}

/// Returns true if `selection` satisfies `constraint` over `pool`.
pub fn satisfies(pool: &[Recipe], selection: &[Recipe], constraint: &CountConstraint) -> bool {
    constraint
        .comparison
        .holds(count_matching(pool, selection, constraint), constraint.count)
}
