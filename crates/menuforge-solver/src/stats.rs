//! Search statistics.

use std::time::Duration;

/// Counters collected by a backend during one solve.
///
/// # Example
///
/// ```
/// use menuforge_solver::stats::SearchStats;
///
/// let mut stats = SearchStats::default();
/// stats.nodes_explored = 10;
/// stats.record_prune(true);
/// stats.record_prune(false);
///
/// assert_eq!(stats.infeasible_pruned, 1);
/// assert_eq!(stats.bound_pruned, 1);
/// assert_eq!(stats.prune_rate(), 0.2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchStats {
    /// Search nodes taken off the frontier.
    pub nodes_explored: u64,
    /// Nodes discarded because a constraint could no longer be met.
    pub infeasible_pruned: u64,
    /// Nodes discarded because they could not beat the incumbent.
    pub bound_pruned: u64,
    /// Number of times a better complete assignment was found.
    pub incumbents_found: u64,
    /// Wall time spent searching.
    pub elapsed: Duration,
}

impl SearchStats {
    /// Records a pruned node.
    pub fn record_prune(&mut self, infeasible: bool) {
        if infeasible {
            self.infeasible_pruned += 1;
        } else {
            self.bound_pruned += 1;
        }
    }

    /// Records an improved incumbent.
    pub fn record_incumbent(&mut self) {
        self.incumbents_found += 1;
    }

    /// Returns the nodes per second rate.
    pub fn nodes_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.nodes_explored as f64 / secs
        } else {
            0.0
        }
    }

    /// Returns the share of explored nodes that were pruned.
    pub fn prune_rate(&self) -> f64 {
        if self.nodes_explored == 0 {
            0.0
        } else {
            (self.infeasible_pruned + self.bound_pruned) as f64 / self.nodes_explored as f64
        }
    }
}
