//! Search-level scope.

use std::time::{Duration, Instant};

/// Progress of one search run, as seen by termination conditions.
#[derive(Debug, Default)]
pub struct SearchScope {
    start_time: Option<Instant>,
    nodes_explored: u64,
    best_objective: Option<f64>,
}

impl SearchScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_solving(&mut self) {
        self.start_time = Some(Instant::now());
        self.nodes_explored = 0;
        self.best_objective = None;
    }

    pub fn elapsed(&self) -> Option<Duration> {
        self.start_time.map(|t| t.elapsed())
    }

    pub fn increment_node_count(&mut self) -> u64 {
        self.nodes_explored += 1;
        self.nodes_explored
    }

    pub fn nodes_explored(&self) -> u64 {
        self.nodes_explored
    }

    /// Objective of the best complete assignment found so far.
    pub fn best_objective(&self) -> Option<f64> {
        self.best_objective
    }

    pub fn set_best_objective(&mut self, objective: f64) {
        self.best_objective = Some(objective);
    }
}
