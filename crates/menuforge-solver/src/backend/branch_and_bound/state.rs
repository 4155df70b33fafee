//! Incremental search state with undo.

use smallvec::SmallVec;

use super::model::{Row, SearchModel};
use crate::problem::{Assignment, Relation};

/// Activity bookkeeping for one row.
#[derive(Debug, Clone, Copy, Default)]
struct RowActivity {
    /// Sum of coefficients of variables fixed to one.
    fixed: i64,
    /// Sum of positive coefficients of free variables.
    free_positive: i64,
    /// Sum of negative coefficients of free variables.
    free_negative: i64,
    /// Number of free variables with a positive coefficient.
    free_units: i64,
}

impl RowActivity {
    fn release(&mut self, coefficient: i64, count: i64) {
        if coefficient > 0 {
            self.free_positive += coefficient * count;
            self.free_units += count;
        } else {
            self.free_negative += coefficient * count;
        }
    }

    fn capture(&mut self, coefficient: i64, count: i64) {
        if coefficient > 0 {
            self.free_positive -= coefficient * count;
            self.free_units -= count;
        } else {
            self.free_negative -= coefficient * count;
        }
    }

    fn can_satisfy(&self, row: &Row, remaining_picks: Option<i64>) -> bool {
        let min = self.fixed + self.free_negative;
        let max_gain = match (row.unit, remaining_picks) {
            (Some(unit), Some(picks)) => unit * self.free_units.min(picks),
            _ => self.free_positive,
        };
        let max = self.fixed + max_gain;
        match row.relation {
            Relation::GreaterOrEqual => max >= row.rhs,
            Relation::LessOrEqual => min <= row.rhs,
            Relation::Equal => min <= row.rhs && row.rhs <= max,
        }
    }

    /// Selections still owed to a unit row with a lower bound.
    fn shortfall(&self, row: &Row) -> i64 {
        match row.unit {
            Some(unit) if row.relation.has_lower_bound() && self.fixed < row.rhs => {
                (row.rhs - self.fixed + unit - 1) / unit
            }
            _ => 0,
        }
    }

    /// True if a unit row with an upper bound has no room for one more term.
    fn is_saturated(&self, row: &Row) -> bool {
        match row.unit {
            Some(unit) => row.relation.has_upper_bound() && self.fixed + unit > row.rhs,
            None => false,
        }
    }
}

/// Decisions along the current path of the search tree.
///
/// Variables are decided in model position order, so the decided variables
/// are always a prefix and the free ones the matching suffix. Skipping a
/// member of a group closes the group: its later members are captured as
/// zero at once and may only be skipped.
#[derive(Debug)]
pub(super) struct SearchState {
    activities: Vec<RowActivity>,
    trail: Vec<bool>,
    /// Skips taken in each group along the path.
    skips: Vec<u32>,
    /// Free members of each group that may still be selected.
    open_members: Vec<i64>,
    selected: i64,
    objective: f64,
}

impl SearchState {
    pub fn new(model: &SearchModel) -> Self {
        let mut activities = vec![RowActivity::default(); model.rows.len()];
        for group in &model.groups {
            for &(row, coefficient) in &group.column {
                activities[row].release(coefficient, group.size);
            }
        }
        Self {
            activities,
            trail: Vec::with_capacity(model.len()),
            skips: vec![0; model.groups.len()],
            open_members: model.groups.iter().map(|g| g.size).collect(),
            selected: 0,
            objective: 0.0,
        }
    }

    pub fn depth(&self) -> usize {
        self.trail.len()
    }

    pub fn objective(&self) -> f64 {
        self.objective
    }

    /// True if the variable at `position` may only be skipped.
    pub fn is_closed(&self, model: &SearchModel, position: usize) -> bool {
        self.skips[model.group_of[position]] > 0
    }

    /// Decides the next variable.
    pub fn assign(&mut self, model: &SearchModel, value: bool) {
        let position = self.trail.len();
        let group = model.group_of[position];
        debug_assert!(!(value && self.skips[group] > 0), "selected in a closed group");

        if value {
            for &(row, coefficient) in &model.columns[position] {
                let activity = &mut self.activities[row];
                activity.capture(coefficient, 1);
                activity.fixed += coefficient;
            }
            self.open_members[group] -= 1;
            self.selected += 1;
            self.objective += model.weights[position];
        } else {
            if self.skips[group] == 0 {
                let closing = 1 + model.later_members[position];
                for &(row, coefficient) in &model.columns[position] {
                    self.activities[row].capture(coefficient, closing);
                }
                self.open_members[group] = 0;
            }
            self.skips[group] += 1;
        }
        self.trail.push(value);
    }

    /// Reverts the most recent decision.
    pub fn unassign(&mut self, model: &SearchModel) {
        let Some(value) = self.trail.pop() else {
            return;
        };
        let position = self.trail.len();
        let group = model.group_of[position];

        if value {
            for &(row, coefficient) in &model.columns[position] {
                let activity = &mut self.activities[row];
                activity.fixed -= coefficient;
                activity.release(coefficient, 1);
            }
            self.open_members[group] += 1;
            self.selected -= 1;
            self.objective -= model.weights[position];
        } else {
            self.skips[group] -= 1;
            if self.skips[group] == 0 {
                let reopening = 1 + model.later_members[position];
                for &(row, coefficient) in &model.columns[position] {
                    self.activities[row].release(coefficient, reopening);
                }
                self.open_members[group] = reopening;
            }
        }
    }

    /// Skips the closed variables at the front of the free suffix.
    ///
    /// Their activity was captured when the group closed, so row checks
    /// made before the skips still hold after them.
    pub fn skip_closed(&mut self, model: &SearchModel) {
        while self.trail.len() < model.len() && self.is_closed(model, self.trail.len()) {
            self.assign(model, false);
        }
    }

    /// Unwinds decisions until `depth` variables remain decided.
    pub fn backtrack_to(&mut self, model: &SearchModel, depth: usize) {
        while self.trail.len() > depth {
            self.unassign(model);
        }
    }

    fn remaining_picks(&self, model: &SearchModel) -> Option<i64> {
        model.pick_limit.map(|limit| (limit - self.selected).max(0))
    }

    /// Returns false if no completion can satisfy every row.
    ///
    /// Each row is checked on its own, then all lower-bounded unit rows
    /// together against the remaining picks.
    pub fn is_feasible(&self, model: &SearchModel) -> bool {
        let picks = self.remaining_picks(model);
        let rows_hold = model
            .rows
            .iter()
            .zip(&self.activities)
            .all(|(row, activity)| activity.can_satisfy(row, picks));
        rows_hold && self.shortfalls_coverable(model, picks)
    }

    // Summing the shortfalls of the lower-bounded unit rows gives one
    // surrogate row: a selection counts once for every such row it is in.
    // Taking the members with the most memberships first, up to the
    // remaining picks, bounds the best any completion can cover. Members of
    // a saturated upper-bounded row cannot be selected at all.
    fn shortfalls_coverable(&self, model: &SearchModel, picks: Option<i64>) -> bool {
        let needed: i64 = model
            .rows
            .iter()
            .zip(&self.activities)
            .map(|(row, activity)| activity.shortfall(row))
            .sum();
        if needed == 0 {
            return true;
        }

        // by_cover[c]: open members counting towards `c` short rows.
        let mut by_cover: SmallVec<[i64; 16]> = SmallVec::new();
        for (group, &open) in model.groups.iter().zip(&self.open_members) {
            if open == 0 {
                continue;
            }
            let mut cover = 0;
            let mut saturated = false;
            for &(row, _) in &group.column {
                let activity = &self.activities[row];
                saturated |= activity.is_saturated(&model.rows[row]);
                if activity.shortfall(&model.rows[row]) > 0 {
                    cover += 1;
                }
            }
            if saturated || cover == 0 {
                continue;
            }
            if by_cover.len() <= cover {
                by_cover.resize(cover + 1, 0);
            }
            by_cover[cover] += open;
        }

        let mut reachable = 0;
        let mut left = picks.unwrap_or(i64::MAX);
        for (cover, &open) in by_cover.iter().enumerate().rev() {
            if left == 0 {
                break;
            }
            let take = open.min(left);
            reachable += take * cover as i64;
            left -= take;
        }
        reachable >= needed
    }

    /// Upper bound on the objective of any completion.
    ///
    /// Free weights are sorted, so the best completion takes the first
    /// positive weights of open groups, at most `remaining_picks` of them.
    pub fn optimistic_bound(&self, model: &SearchModel) -> f64 {
        let mut left = self.remaining_picks(model).unwrap_or(i64::MAX);
        let mut bound = self.objective;
        for position in self.trail.len()..model.len() {
            let weight = model.weights[position];
            if left == 0 || weight <= 0.0 {
                break;
            }
            if !self.is_closed(model, position) {
                bound += weight;
                left -= 1;
            }
        }
        bound
    }

    /// Maps the current decisions back to problem variables.
    pub fn to_assignment(&self, model: &SearchModel) -> Assignment {
        let mut flags = vec![false; model.len()];
        for (position, &value) in self.trail.iter().enumerate() {
            flags[model.order[position]] = value;
        }
        Assignment::from_bools(flags)
    }
}
