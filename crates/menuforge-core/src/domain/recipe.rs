//! The recipe: the item the picker selects.

use std::hash::{Hash, Hasher};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use super::catalog::Food;
use super::ids::{KeywordId, RecipeId};

/// A candidate recipe.
///
/// Identity is defined solely by [`Recipe::id`]: two recipes with the same id
/// compare equal and hash identically regardless of their other fields.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use menuforge_core::{KeywordId, Recipe, RecipeId};
///
/// let created = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
/// let soup = Recipe::new(RecipeId::new(7), "Tomato Soup", created)
///     .with_keywords([KeywordId::new(3)])
///     .with_rating(4);
///
/// let renamed = Recipe::new(RecipeId::new(7), "Soup", created);
/// assert_eq!(soup, renamed);
/// assert!(soup.has_keyword(KeywordId::new(3)));
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Recipe {
    /// Stable unique identifier.
    pub id: RecipeId,
    /// Display name.
    pub name: String,
    /// Free text description.
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: Option<String>,
    /// Number of servings the recipe yields.
    #[cfg_attr(feature = "serde", serde(default = "default_servings"))]
    pub servings: u32,
    /// Keyword ids attached to the recipe.
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "super::serde_support::keyword_ids")
    )]
    pub keywords: Vec<KeywordId>,
    /// Rating between 0 and 5, `None` when unrated.
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "super::serde_support::rating")
    )]
    pub rating: Option<u8>,
    /// When the recipe was created.
    #[cfg_attr(
        feature = "serde",
        serde(
            rename = "created_at",
            deserialize_with = "super::serde_support::timestamp"
        )
    )]
    pub createdon: DateTime<Utc>,
    /// When the recipe was last cooked, `None` when never cooked.
    #[cfg_attr(
        feature = "serde",
        serde(
            rename = "last_cooked",
            default,
            deserialize_with = "super::serde_support::optional_timestamp"
        )
    )]
    pub cookedon: Option<DateTime<Utc>>,
    /// Ingredients, empty until hydrated by the recipe source.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub ingredients: Vec<Food>,
}

#[cfg(feature = "serde")]
fn default_servings() -> u32 {
    1
}

impl Recipe {
    /// Creates a recipe with one serving, no keywords, no rating and never cooked.
    pub fn new(id: RecipeId, name: impl Into<String>, createdon: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            servings: 1,
            keywords: Vec::new(),
            rating: None,
            createdon,
            cookedon: None,
            ingredients: Vec::new(),
        }
    }

    /// Sets the keyword ids.
    pub fn with_keywords(mut self, keywords: impl IntoIterator<Item = KeywordId>) -> Self {
        self.keywords = keywords.into_iter().collect();
        self
    }

    /// Sets the rating.
    pub fn with_rating(mut self, rating: u8) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Sets the last-cooked timestamp.
    pub fn with_cookedon(mut self, cookedon: DateTime<Utc>) -> Self {
        self.cookedon = Some(cookedon);
        self
    }

    /// Sets the number of servings.
    pub fn with_servings(mut self, servings: u32) -> Self {
        self.servings = servings;
        self
    }

    /// Returns true if the recipe carries the given keyword.
    pub fn has_keyword(&self, keyword: KeywordId) -> bool {
        self.keywords.contains(&keyword)
    }

    /// Returns true if the recipe has never been cooked.
    pub fn is_new(&self) -> bool {
        self.cookedon.is_none()
    }

    /// Replaces the ingredient list with foods resolved by the recipe source.
    pub fn hydrate_ingredients(&mut self, foods: impl IntoIterator<Item = Food>) {
        self.ingredients = foods.into_iter().collect();
    }

    /// Returns true once ingredients have been hydrated.
    pub fn has_ingredients(&self) -> bool {
        !self.ingredients.is_empty()
    }
}

impl PartialEq for Recipe {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Recipe {}

impl Hash for Recipe {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Display for Recipe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Parses a recipe-server timestamp.
///
/// Accepts RFC 3339 with any offset, naive date-times (taken as UTC) and bare
/// dates (midnight UTC). Returns `None` for anything else.
///
/// ```
/// use menuforge_core::domain::parse_timestamp;
///
/// assert!(parse_timestamp("2024-05-01T18:30:00+02:00").is_some());
/// assert!(parse_timestamp("2024-05-01T18:30:00.123456").is_some());
/// assert!(parse_timestamp("2024-05-01").is_some());
/// assert!(parse_timestamp("yesterday").is_none());
/// ```
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
