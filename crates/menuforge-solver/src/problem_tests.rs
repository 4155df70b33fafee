//! Tests for the binary program model.

use menuforge_core::Comparison;

use crate::problem::*;

#[test]
fn test_terms_are_merged_and_sorted() {
    let c = LinearConstraint::new([(3, 1), (0, 2), (3, 1), (1, 1), (1, -1)], Relation::LessOrEqual, 4);
    assert_eq!(c.terms(), &[(0, 2), (3, 2)]);
    assert_eq!(c.uniform_coefficient(), Some(2));
}

#[test]
fn test_uniform_coefficient() {
    let mixed = LinearConstraint::new([(0, 1), (1, 2)], Relation::Equal, 1);
    assert_eq!(mixed.uniform_coefficient(), None);

    let empty = LinearConstraint::new(Vec::new(), Relation::Equal, 0);
    assert_eq!(empty.uniform_coefficient(), None);
}

#[test]
fn test_activity_and_satisfaction() {
    let c = LinearConstraint::new([(0, 1), (1, 1), (2, 1)], Relation::GreaterOrEqual, 2);
    let a = Assignment::from_bools([true, false, true]);
    assert_eq!(c.activity(&a), 2);
    assert!(c.is_satisfied_by(&a));
    assert!(!c.is_satisfied_by(&Assignment::from_bools([true, false, false])));
}

#[test]
fn test_relation_from_comparison() {
    assert_eq!(Relation::from(Comparison::AtLeast), Relation::GreaterOrEqual);
    assert_eq!(Relation::from(Comparison::AtMost), Relation::LessOrEqual);
    assert_eq!(Relation::from(Comparison::Exactly), Relation::Equal);
    assert!(Relation::Equal.has_upper_bound());
    assert!(!Relation::GreaterOrEqual.has_upper_bound());
    assert!(Relation::Equal.has_lower_bound());
    assert!(!Relation::LessOrEqual.has_lower_bound());
}

#[test]
fn test_assignment_threshold() {
    let a = Assignment::new(vec![0.5, 0.49, 1.0, 0.0]);
    assert_eq!(a.selected().collect::<Vec<_>>(), vec![0, 2]);
    assert!(!a.is_selected(10));
}

#[test]
fn test_problem_objective_and_satisfaction() {
    let mut problem = BinaryProblem::new(4);
    problem.add_linear_constraint((0..4).map(|i| (i, 1)), Relation::Equal, 2);
    let subset = problem.add_linear_constraint([(0, 1), (1, 1)], Relation::LessOrEqual, 1);
    problem.set_objective(vec![4.0, 3.0, 2.0, 1.0]);

    assert_eq!(subset, 1);
    assert_eq!(problem.constraint_count(), 2);

    let a = Assignment::from_bools([true, false, true, false]);
    assert!(problem.is_satisfied_by(&a));
    assert_eq!(problem.objective_value(&a), 6.0);

    assert!(!problem.is_satisfied_by(&Assignment::from_bools([true, true, false, false])));
    assert!(!problem.is_satisfied_by(&Assignment::from_bools([true, false])));
}

#[test]
#[should_panic(expected = "out of range")]
fn test_out_of_range_variable_panics() {
    let mut problem = BinaryProblem::new(2);
    problem.add_linear_constraint([(2, 1)], Relation::LessOrEqual, 1);
}

#[test]
#[should_panic(expected = "one weight per variable")]
fn test_objective_length_mismatch_panics() {
    let mut problem = BinaryProblem::new(2);
    problem.set_objective(vec![1.0]);
}
