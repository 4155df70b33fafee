//! MenuForge - Constrained random recipe selection in Rust
//!
//! Declare how many recipes a menu needs and which counting constraints it
//! must satisfy, point it at a recipe source and call [`Menu::select`].
//!
//! # Example
//!
//! ```rust
//! use menuforge::prelude::*;
//!
//! let catalog = r#"{
//!     "recipes": [
//!         {"id": 1, "name": "Soup", "created_at": "2024-01-01", "keywords": [10]},
//!         {"id": 2, "name": "Stew", "created_at": "2024-01-02", "keywords": [11]},
//!         {"id": 3, "name": "Cake", "created_at": "2024-01-03"},
//!         {"id": 4, "name": "Pie", "created_at": "2024-01-04"}
//!     ],
//!     "keywords": [
//!         {"id": 10, "name": "warm"},
//!         {"id": 11, "name": "stews", "parent": 10}
//!     ]
//! }"#;
//!
//! let source = InMemorySource::from_json_str(catalog).unwrap();
//! let config = MenuConfig::new()
//!     .with_choices(3)
//!     .with_random_seed(7)
//!     .with_keyword(ConstraintDecl::new(KeywordId::new(10).into(), Comparison::Exactly, 2));
//!
//! let mut menu = Menu::new(config, source);
//! let selection = menu.select().unwrap();
//! assert_eq!(selection.len(), 3);
//! assert!(selection.ids().any(|id| id == RecipeId::new(1)));
//! assert!(selection.ids().any(|id| id == RecipeId::new(2)));
//! ```

pub mod menu;
pub mod source;

pub use menu::Menu;
pub use source::{BookEntry, Catalog, FoodEntry, InMemorySource, RecipeSource};

// Domain and constraint types
pub use menuforge_core::{
    filter, Book, BookId, Comparison, ConstraintKind, CountConstraint, DateField, DateThreshold,
    Food, FoodId, Keyword, KeywordId, MenuForgeError, Recipe, RecipeId, Result,
};

// Configuration
pub use menuforge_config::{ConfigError, ConstraintDecl, MenuConfig, OneOrMany, TerminationConfig};

// Selection engine
pub use menuforge_solver::{
    BinarySolver, BranchAndBoundSolver, ExternalTermination, FeasibilityWarning,
    NodeCountTermination, RecipePicker, Selection, SolveStatus, Termination, TimeTermination,
};

/// Console output, available with the `console` feature.
#[cfg(feature = "console")]
pub use menuforge_console as console;

pub mod prelude {
    pub use super::{
        Comparison, ConstraintDecl, ConstraintKind, CountConstraint, InMemorySource, KeywordId,
        Menu, MenuConfig, MenuForgeError, Recipe, RecipeId, RecipePicker, RecipeSource, Selection,
    };
    pub use super::{BookId, FoodId, OneOrMany};
}
