//! Search tree nodes.

/// A pending decision: set the variable at `position` to `value`.
///
/// The decisions above `position` are implied by the path the node was
/// pushed from, so a node needs no parent link; the state backtracks to
/// `position` before applying it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct SearchNode {
    position: usize,
    value: bool,
}

impl SearchNode {
    /// Both children of a node at `position`, in push order.
    ///
    /// The selecting child is pushed last so a depth-first stack tries it
    /// first.
    pub fn children(position: usize) -> [SearchNode; 2] {
        [
            SearchNode {
                position,
                value: false,
            },
            SearchNode {
                position,
                value: true,
            },
        ]
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    pub fn value(&self) -> bool {
        self.value
    }
}
