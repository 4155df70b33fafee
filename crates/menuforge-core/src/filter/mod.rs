//! Predicate resolution helpers.
//!
//! Each helper narrows a recipe sequence to the recipes matching a semantic
//! condition. Helpers are pure, preserve input order and compose by feeding
//! one helper's output into the next:
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use menuforge_core::filter::{with_date, with_keyword, DateField};
//! use menuforge_core::{KeywordId, Recipe, RecipeId};
//!
//! let jan = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let jun = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
//! let pool = vec![
//!     Recipe::new(RecipeId::new(1), "Old soup", jan).with_keywords([KeywordId::new(9)]),
//!     Recipe::new(RecipeId::new(2), "New soup", jun).with_keywords([KeywordId::new(9)]),
//!     Recipe::new(RecipeId::new(3), "New cake", jun),
//! ];
//!
//! let soups = with_keyword(&pool, &[KeywordId::new(9)]);
//! let new_soups = with_date(soups, DateField::CreatedOn, jun, true);
//! assert_eq!(new_soups.len(), 1);
//! assert_eq!(new_soups[0].id, RecipeId::new(2));
//! ```

mod threshold;


use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::domain::{KeywordId, Recipe, RecipeId};

pub use threshold::DateThreshold;

/// Date attribute of a recipe a date filter applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateField {
    /// When the recipe was created. Always present.
    CreatedOn,
    /// When the recipe was last cooked. Absent for never-cooked recipes.
    CookedOn,
}

impl DateField {
    /// Reads the field from a recipe.
    pub fn value(self, recipe: &Recipe) -> Option<DateTime<Utc>> {
        match self {
            DateField::CreatedOn => Some(recipe.createdon),
            DateField::CookedOn => recipe.cookedon,
        }
    }
}

impl std::fmt::Display for DateField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateField::CreatedOn => write!(f, "createdon"),
            DateField::CookedOn => write!(f, "cookedon"),
        }
    }
}

/// Keeps recipes carrying any of the given keywords.
pub fn with_keyword<'a>(
    recipes: impl IntoIterator<Item = &'a Recipe>,
    keywords: &[KeywordId],
) -> Vec<&'a Recipe> {
    let wanted: HashSet<KeywordId> = keywords.iter().copied().collect();
    recipes
        .into_iter()
        .filter(|r| r.keywords.iter().any(|k| wanted.contains(k)))
        .collect()
}

/// Keeps recipes whose `field` is set and lies on the requested side of
/// `threshold` (inclusive).
///
/// With `after` the field must be `>= threshold`, otherwise `<= threshold`.
/// Never-cooked recipes never pass a [`DateField::CookedOn`] filter.
pub fn with_date<'a>(
    recipes: impl IntoIterator<Item = &'a Recipe>,
    field: DateField,
    threshold: DateTime<Utc>,
    after: bool,
) -> Vec<&'a Recipe> {
    recipes
        .into_iter()
        .filter(|r| match field.value(r) {
            Some(value) if after => value >= threshold,
            Some(value) => value <= threshold,
            None => false,
        })
        .collect()
}

/// Keeps recipes by rating.
///
/// A negative `rating` selects rated recipes at or below its magnitude, i.e.
/// ratings in `(0, |rating|]`; unrated recipes never pass. A non-negative
/// `rating` selects recipes rated at least `rating`, counting unrated as 0.
pub fn with_rating<'a>(
    recipes: impl IntoIterator<Item = &'a Recipe>,
    rating: i32,
) -> Vec<&'a Recipe> {
    recipes
        .into_iter()
        .filter(|r| {
            let value = i32::from(r.rating.unwrap_or(0));
            if rating < 0 {
                value > 0 && value <= rating.abs()
            } else {
                value >= rating
            }
        })
        .collect()
}

/// Keeps recipes whose id is in `ids`.
///
/// Used to resolve book and food conditions, where the recipe source returns
/// recipe ids rather than recipes.
pub fn with_any_id<'a>(
    recipes: impl IntoIterator<Item = &'a Recipe>,
    ids: &HashSet<RecipeId>,
) -> Vec<&'a Recipe> {
    recipes.into_iter().filter(|r| ids.contains(&r.id)).collect()
}
