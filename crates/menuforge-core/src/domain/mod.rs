//! Domain model: recipes and the objects they reference.
//!
//! All domain objects use id-only identity, so set operations over them are
//! explicit id-based operations.

mod catalog;
mod ids;
mod recipe;
#[cfg(feature = "serde")]
mod serde_support;


pub use catalog::{Book, Food, Keyword};
pub use ids::{BookId, FoodId, KeywordId, RecipeId};
pub use recipe::{parse_timestamp, Recipe};
