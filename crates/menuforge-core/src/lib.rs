//! MenuForge Core - Recipe model, counting constraints and predicate filters
//!
//! This crate provides the fundamental abstractions for MenuForge:
//! - Domain types for recipes and the objects they reference
//! - Counting constraint types consumed by the selection engine
//! - Pure filter helpers that resolve semantic conditions into recipe subsets
//! - The shared error type

pub mod constraint;
pub mod domain;
pub mod error;
pub mod filter;


pub use constraint::{Comparison, ConstraintKind, CountConstraint};
pub use domain::{Book, BookId, Food, FoodId, Keyword, KeywordId, Recipe, RecipeId};
pub use error::{MenuForgeError, Result};
pub use filter::{DateField, DateThreshold};
