//! Tests for the recipe picker.

use std::collections::HashSet;
use std::sync::atomic::Ordering;

use menuforge_core::{Comparison, ConstraintKind, KeywordId};
use menuforge_test::{ids_of, numbered_pool, recipe, satisfies, tagged_pool};
use proptest::prelude::*;

use super::*;
use crate::backend::{SolveStatus, Solution};
use crate::problem::Assignment;
use crate::stats::SearchStats;
use crate::termination::NodeCountTermination;

fn ids(raw: impl IntoIterator<Item = u64>) -> Vec<RecipeId> {
    raw.into_iter().map(RecipeId::new).collect()
}

fn keyword(raw: impl IntoIterator<Item = u64>, comparison: Comparison, count: usize) -> CountConstraint {
    CountConstraint::new(ConstraintKind::Keyword, ids(raw), comparison, count)
}

#[test]
fn test_no_constraints_returns_exact_count() {
    let mut picker = RecipePicker::new(numbered_pool(10), 4).unwrap().with_seed(1);
    let selection = picker.solve().unwrap();

    assert_eq!(selection.len(), 4);
    let distinct: HashSet<RecipeId> = selection.ids().collect();
    assert_eq!(distinct.len(), 4);
    assert_eq!(selection.status, SolveStatus::Optimal);
}

#[test]
fn test_more_choices_than_pool_is_infeasible() {
    let mut picker = RecipePicker::new(numbered_pool(3), 5).unwrap();
    assert!(matches!(picker.solve(), Err(MenuForgeError::Infeasible)));
}

#[test]
fn test_empty_pool() {
    let mut none = RecipePicker::new(Vec::new(), 0).unwrap();
    assert!(none.solve().unwrap().is_empty());

    let mut some = RecipePicker::new(Vec::new(), 1).unwrap();
    assert!(matches!(some.solve(), Err(MenuForgeError::Infeasible)));
}

#[test]
fn test_exact_subset_of_choice_size() {
    let mut picker = RecipePicker::new(numbered_pool(10), 3).unwrap().with_seed(9);
    picker
        .add_constraint(keyword([2, 5, 7], Comparison::Exactly, 3))
        .unwrap();

    let selection = picker.solve().unwrap();
    assert_eq!(ids_of(&selection), vec![2, 5, 7]);
}

#[test]
fn test_at_least_warning_is_not_an_error() {
    let mut picker = RecipePicker::new(numbered_pool(10), 5).unwrap();
    let warning = picker
        .add_constraint(keyword([1, 2], Comparison::AtLeast, 3))
        .unwrap()
        .unwrap();

    assert_eq!(warning.matched, 2);
    assert_eq!(warning.count, 3);
    assert_eq!(picker.warnings(), &[warning]);
    assert_eq!(picker.constraint_count(), 1);
    assert!(matches!(picker.solve(), Err(MenuForgeError::Infeasible)));
}

#[test]
fn test_at_most_never_warns() {
    let mut picker = RecipePicker::new(numbered_pool(10), 2).unwrap();
    let warning = picker
        .add_constraint(keyword([1], Comparison::AtMost, 3))
        .unwrap();
    assert!(warning.is_none());
    assert!(picker.warnings().is_empty());
}

#[test]
fn test_exclude_complement_infeasible() {
    let k = KeywordId::new(1);
    let pool = tagged_pool(10, k, &[1, 2, 3, 4]);
    let tagged = pool.iter().filter(|r| r.has_keyword(k));
    let constraint =
        CountConstraint::from_recipes(ConstraintKind::Keyword, tagged, Comparison::Exactly, 0)
            .excluding(true);

    let mut picker = RecipePicker::new(pool, 5).unwrap();
    picker.add_constraint(constraint).unwrap();
    assert_eq!(picker.constraints()[0].matched, 6);
    assert_eq!(picker.constraints()[0].describe(), "not keyword == 0");
    assert!(matches!(picker.solve(), Err(MenuForgeError::Infeasible)));
}

#[test]
fn test_exclude_complement_feasible() {
    let mut picker = RecipePicker::new(numbered_pool(10), 4).unwrap().with_seed(3);
    picker
        .add_constraint(keyword(1..=4, Comparison::Exactly, 0).excluding(true))
        .unwrap();
    assert_eq!(ids_of(&picker.solve().unwrap()), vec![1, 2, 3, 4]);
}

#[test]
fn test_condition_outside_pool_is_ignored() {
    let mut picker = RecipePicker::new(numbered_pool(5), 2).unwrap();
    let warning = picker
        .add_constraint(keyword([4, 5, 99, 100], Comparison::AtLeast, 3))
        .unwrap();

    assert_eq!(picker.constraints()[0].matched, 2);
    assert!(warning.is_some());
}

#[test]
fn test_constraints_combine() {
    let pool = numbered_pool(12);
    let constraints = vec![
        keyword(1..=6, Comparison::AtLeast, 2),
        keyword([1, 2, 3], Comparison::AtMost, 1),
        keyword([10, 11], Comparison::Exactly, 1),
        keyword([12], Comparison::Exactly, 0).excluding(true),
    ];

    let mut picker = RecipePicker::new(pool.clone(), 4).unwrap().with_seed(11);
    for constraint in &constraints {
        picker.add_constraint(constraint.clone()).unwrap();
    }
    assert_eq!(picker.constraint_count(), 4);

    let selection = picker.solve().unwrap();
    assert!(constraints
        .iter()
        .all(|c| satisfies(&pool, &selection.recipes, c)));
}

#[test]
fn test_duplicate_ids_rejected() {
    let pool = vec![recipe(1), recipe(2), recipe(1)];
    assert!(matches!(
        RecipePicker::new(pool, 1),
        Err(MenuForgeError::InvalidPool(_))
    ));
}

#[test]
fn test_negative_choices_rejected() {
    assert!(matches!(
        RecipePicker::new(numbered_pool(3), -1),
        Err(MenuForgeError::InvalidPool(_))
    ));
}

#[test]
fn test_seeded_pickers_agree() {
    let run = |seed| {
        let mut picker = RecipePicker::new(numbered_pool(20), 5).unwrap().with_seed(seed);
        ids_of(&picker.solve().unwrap())
    };
    assert_eq!(run(42), run(42));

    let distinct: HashSet<Vec<u64>> = (0..20).map(run).collect();
    assert!(distinct.len() > 1);
}

#[test]
fn test_repeated_solves_redraw_weights() {
    let mut picker = RecipePicker::new(numbered_pool(20), 3).unwrap().with_seed(5);
    let distinct: HashSet<Vec<u64>> = (0..10)
        .map(|_| ids_of(&picker.solve().unwrap()))
        .collect();
    assert!(distinct.len() > 1);
}

#[test]
fn test_terminate_flag_stops_solve() {
    let mut picker = RecipePicker::new(numbered_pool(10), 5).unwrap();
    let flag = picker.terminate_flag();
    flag.store(true, Ordering::SeqCst);
    assert!(matches!(picker.solve(), Err(MenuForgeError::Terminated)));

    flag.store(false, Ordering::SeqCst);
    assert_eq!(picker.solve().unwrap().len(), 5);
}

#[test]
fn test_node_limit_without_selection() {
    let mut picker = RecipePicker::new(numbered_pool(10), 5)
        .unwrap()
        .with_termination(NodeCountTermination::new(1));
    assert!(matches!(picker.solve(), Err(MenuForgeError::Terminated)));

    let config = TerminationConfig {
        node_limit: Some(1),
        ..TerminationConfig::default()
    };
    let mut configured = RecipePicker::new(numbered_pool(10), 5)
        .unwrap()
        .with_termination_config(&config);
    assert!(matches!(configured.solve(), Err(MenuForgeError::Terminated)));
}

#[test]
fn test_large_pool_disjoint_demands_infeasible() {
    let mut picker = RecipePicker::new(numbered_pool(200), 5)
        .unwrap()
        .with_seed(11)
        .with_termination(NodeCountTermination::new(10_000));
    picker
        .add_constraint(keyword(1..=100, Comparison::AtLeast, 3))
        .unwrap();
    picker
        .add_constraint(keyword(101..=200, Comparison::AtLeast, 3))
        .unwrap();

    assert!(matches!(picker.solve(), Err(MenuForgeError::Infeasible)));
}

#[test]
fn test_large_pool_overlapping_constraints() {
    let pool = numbered_pool(300);
    let constraints = [
        keyword(1..=120, Comparison::AtLeast, 2),
        keyword(61..=180, Comparison::AtMost, 3),
        keyword(151..=300, Comparison::Exactly, 2),
        keyword(101..=250, Comparison::AtLeast, 3),
    ];

    let mut picker = RecipePicker::new(pool.clone(), 7)
        .unwrap()
        .with_seed(12)
        .with_termination(NodeCountTermination::new(1_000_000));
    for constraint in &constraints {
        picker.add_constraint(constraint.clone()).unwrap();
    }

    let selection = picker.solve().unwrap();
    assert_eq!(selection.status, SolveStatus::Optimal);
    assert_eq!(selection.len(), 7);
    for constraint in &constraints {
        assert!(satisfies(&pool, &selection.recipes, constraint));
    }
}

#[test]
fn test_large_pool_excluded_overlap_infeasible() {
    let mut picker = RecipePicker::new(numbered_pool(200), 5)
        .unwrap()
        .with_termination(NodeCountTermination::new(10_000));
    picker
        .add_constraint(keyword(1..=100, Comparison::AtLeast, 3))
        .unwrap();
    picker
        .add_constraint(keyword(51..=150, Comparison::AtLeast, 3))
        .unwrap();
    // Nothing from the overlap 51..=100.
    picker
        .add_constraint(keyword((1..=50).chain(101..=200), Comparison::AtMost, 0).excluding(true))
        .unwrap();

    assert!(matches!(picker.solve(), Err(MenuForgeError::Infeasible)));
}

/// Backend returning a fixed assignment regardless of the problem.
#[derive(Debug)]
struct FixedSolver(Vec<bool>);

impl BinarySolver for FixedSolver {
    fn solve<T: Termination + ?Sized>(
        &self,
        _problem: &BinaryProblem,
        _termination: &T,
    ) -> std::result::Result<Solution, SolveFailure> {
        Ok(Solution {
            assignment: Assignment::from_bools(self.0.iter().copied()),
            objective: 0.0,
            status: SolveStatus::Optimal,
            stats: SearchStats::default(),
        })
    }
}

#[test]
fn test_custom_backend() {
    let picker = RecipePicker::new(numbered_pool(3), 2).unwrap();
    let mut good = picker.with_solver(FixedSolver(vec![true, false, true]));
    assert_eq!(ids_of(&good.solve().unwrap()), vec![1, 3]);

    let mut bad =
        RecipePicker::with_backend(numbered_pool(3), 2, FixedSolver(vec![true, true, true]))
            .unwrap();
    assert!(matches!(bad.solve(), Err(MenuForgeError::Infeasible)));
}

/// Returns true if any `choices`-subset of `pool` satisfies every constraint.
fn brute_force_feasible(pool: &[Recipe], choices: usize, constraints: &[CountConstraint]) -> bool {
    (0u32..1 << pool.len())
        .filter(|mask| mask.count_ones() as usize == choices)
        .any(|mask| {
            let selection: Vec<Recipe> = pool
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, r)| r.clone())
                .collect();
            constraints.iter().all(|c| satisfies(pool, &selection, c))
        })
}

fn arb_constraint(max_id: u64) -> impl Strategy<Value = CountConstraint> {
    (
        proptest::collection::btree_set(1..=max_id + 2, 0..6),
        prop_oneof![
            Just(Comparison::AtLeast),
            Just(Comparison::AtMost),
            Just(Comparison::Exactly),
        ],
        0usize..4,
        any::<bool>(),
    )
        .prop_map(|(condition, comparison, count, exclude)| {
            CountConstraint::new(
                ConstraintKind::Custom("generated".into()),
                condition.into_iter().map(RecipeId::new),
                comparison,
                count,
            )
            .excluding(exclude)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_result_is_exact_and_satisfying(
        size in 0u64..=9,
        choice_seed in 0usize..10,
        constraints in proptest::collection::vec(arb_constraint(9), 0..4),
        seed in any::<u64>(),
    ) {
        let pool = numbered_pool(size);
        let choices = choice_seed % (size as usize + 2);

        let mut picker = RecipePicker::new(pool.clone(), choices).unwrap().with_seed(seed);
        for constraint in &constraints {
            picker.add_constraint(constraint.clone()).unwrap();
        }

        match picker.solve() {
            Ok(selection) => {
                prop_assert_eq!(selection.len(), choices);
                let distinct: HashSet<RecipeId> = selection.ids().collect();
                prop_assert_eq!(distinct.len(), choices);
                for constraint in &constraints {
                    prop_assert!(satisfies(&pool, &selection.recipes, constraint));
                }
            }
            Err(MenuForgeError::Infeasible) => {
                prop_assert!(!brute_force_feasible(&pool, choices, &constraints));
            }
            Err(other) => prop_assert!(false, "unexpected error {other}"),
        }
    }
}
