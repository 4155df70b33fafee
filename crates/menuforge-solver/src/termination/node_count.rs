//! Node count termination.

use super::Termination;
use crate::scope::SearchScope;

/// Terminates once the search has explored a number of nodes.
///
/// # Example
///
/// ```
/// use menuforge_solver::termination::NodeCountTermination;
///
/// let term = NodeCountTermination::new(100_000);
/// ```
#[derive(Debug, Clone)]
pub struct NodeCountTermination {
    limit: u64,
}

impl NodeCountTermination {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl Termination for NodeCountTermination {
    fn is_terminated(&self, scope: &SearchScope) -> bool {
        scope.nodes_explored() >= self.limit
    }
}
