//! Termination conditions for the search.
//!
//! A backend asks its termination whether to stop once per explored node.
//! Conditions combine with [`OrTermination`] over tuples, and both `Box`
//! and `Option` wrappers forward to their contents so optional or
//! caller-supplied conditions slot into a tuple unchanged.

mod composite;
mod external;
mod node_count;
mod time;

use std::fmt::Debug;

use menuforge_config::TerminationConfig;

use crate::scope::SearchScope;

pub use composite::OrTermination;
pub use external::ExternalTermination;
pub use node_count::NodeCountTermination;
pub use time::TimeTermination;

/// Trait for determining when to stop searching.
pub trait Termination: Send + Debug {
    /// Returns true if the search should stop.
    fn is_terminated(&self, scope: &SearchScope) -> bool;
}

impl<T: Termination + ?Sized> Termination for Box<T> {
    fn is_terminated(&self, scope: &SearchScope) -> bool {
        (**self).is_terminated(scope)
    }
}

// An absent condition never fires.
impl<T: Termination> Termination for Option<T> {
    fn is_terminated(&self, scope: &SearchScope) -> bool {
        self.as_ref().is_some_and(|t| t.is_terminated(scope))
    }
}

/// Termination that never fires; the search runs to completion.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTermination;

impl Termination for NoTermination {
    fn is_terminated(&self, _scope: &SearchScope) -> bool {
        false
    }
}

/// Builds the termination described by a configuration.
///
/// Returns `None` when the configuration sets neither a time nor a node
/// limit.
pub fn from_config(config: &TerminationConfig) -> Option<Box<dyn Termination>> {
    let time = config.time_limit().map(TimeTermination::new);
    let nodes = config.node_limit.map(NodeCountTermination::new);
    match (time, nodes) {
        (None, None) => None,
        (time, nodes) => Some(Box::new(OrTermination((time, nodes)))),
    }
}
