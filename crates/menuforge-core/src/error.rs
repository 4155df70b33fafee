//! Error types for MenuForge

use thiserror::Error;

/// Main error type for MenuForge operations
#[derive(Debug, Error)]
pub enum MenuForgeError {
    /// The recipe pool or requested choice count is unusable.
    #[error("Invalid recipe pool: {0}")]
    InvalidPool(String),

    /// A constraint declared an operator other than `>=`, `<=` or `==`.
    #[error("Invalid constraint operator: {0}. Valid operators are: >=, <=, ==")]
    InvalidOperator(String),

    /// No selection satisfies every declared constraint.
    #[error("No solution found, adjustment of criteria required")]
    Infeasible,

    /// The search was stopped before any feasible selection was found.
    #[error("Solver was terminated before a feasible selection was found")]
    Terminated,

    /// Error in menu configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error reported by the recipe source
    #[error("Recipe source error: {0}")]
    Source(String),
}

/// Result type alias for MenuForge operations
pub type Result<T> = std::result::Result<T, MenuForgeError>;
