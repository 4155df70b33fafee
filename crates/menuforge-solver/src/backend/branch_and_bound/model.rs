//! Immutable search model derived from a problem.

use std::collections::HashMap;

use smallvec::SmallVec;

use crate::problem::{BinaryProblem, Relation};

/// Constraint incidence of one variable: `(row, coefficient)`.
pub(super) type Column = SmallVec<[(usize, i64); 4]>;

#[derive(Debug)]
pub(super) struct Row {
    pub relation: Relation,
    pub rhs: i64,
    /// Coefficient shared by every term when it is positive.
    pub unit: Option<i64>,
}

/// Variables sharing one column.
///
/// Members are interchangeable for every constraint, so only the heaviest
/// ones ever need selecting: the search takes a prefix of each group in
/// branching order.
#[derive(Debug)]
pub(super) struct Group {
    pub column: Column,
    pub size: i64,
}

/// Variables reordered by descending objective weight.
///
/// Positions index the branching order; `order[position]` is the problem
/// variable decided at that depth.
#[derive(Debug)]
pub(super) struct SearchModel {
    pub order: Vec<usize>,
    pub weights: Vec<f64>,
    pub columns: Vec<Column>,
    pub groups: Vec<Group>,
    /// Group of the variable at each position.
    pub group_of: Vec<usize>,
    /// Members of the same group at later positions.
    pub later_members: Vec<i64>,
    pub rows: Vec<Row>,
    /// Upper bound on the number of selected variables, from an all-ones
    /// `<=` or `==` row over every variable.
    pub pick_limit: Option<i64>,
}

impl SearchModel {
    pub fn build(problem: &BinaryProblem) -> Self {
        let n = problem.variable_count();
        let objective = problem.objective();

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| objective[b].total_cmp(&objective[a]).then(a.cmp(&b)));

        let mut position_of = vec![0; n];
        for (position, &variable) in order.iter().enumerate() {
            position_of[variable] = position;
        }

        let weights: Vec<f64> = order.iter().map(|&v| objective[v]).collect();

        let mut columns: Vec<Column> = vec![Column::new(); n];
        let mut rows = Vec::with_capacity(problem.constraint_count());
        let mut pick_limit: Option<i64> = None;

        for (index, constraint) in problem.constraints().iter().enumerate() {
            for &(variable, coefficient) in constraint.terms() {
                columns[position_of[variable]].push((index, coefficient));
            }

            let unit = constraint.uniform_coefficient().filter(|&c| c > 0);
            let spans_all = unit == Some(1) && constraint.terms().len() == n;
            if spans_all && constraint.relation().has_upper_bound() {
                let rhs = constraint.rhs();
                pick_limit = Some(pick_limit.map_or(rhs, |limit| limit.min(rhs)));
            }

            rows.push(Row {
                relation: constraint.relation(),
                rhs: constraint.rhs(),
                unit,
            });
        }

        let (groups, group_of, later_members) = group_columns(&columns);

        Self {
            order,
            weights,
            columns,
            groups,
            group_of,
            later_members,
            rows,
            pick_limit,
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

// Groups positions by identical columns, numbering groups by first position.
fn group_columns(columns: &[Column]) -> (Vec<Group>, Vec<usize>, Vec<i64>) {
    let mut index: HashMap<&Column, usize> = HashMap::new();
    let mut groups: Vec<Group> = Vec::new();
    let mut group_of = Vec::with_capacity(columns.len());

    for column in columns {
        let group = *index.entry(column).or_insert_with(|| {
            groups.push(Group {
                column: column.clone(),
                size: 0,
            });
            groups.len() - 1
        });
        groups[group].size += 1;
        group_of.push(group);
    }

    let mut later_members = vec![0; columns.len()];
    let mut seen = vec![0; groups.len()];
    for position in (0..columns.len()).rev() {
        let group = group_of[position];
        later_members[position] = seen[group];
        seen[group] += 1;
    }

    (groups, group_of, later_members)
}
