//! Objects recipes refer to: foods, keywords and books.

use std::hash::{Hash, Hasher};

use super::ids::{BookId, FoodId, KeywordId};

// Identity, hashing and display keyed on `id`/`name` only.
macro_rules! impl_identity {
    ($type:ident) => {
        impl PartialEq for $type {
            fn eq(&self, other: &Self) -> bool {
                self.id == other.id
            }
        }

        impl Eq for $type {}

        impl Hash for $type {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.id.hash(state);
            }
        }

        impl std::fmt::Display for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.name)
            }
        }
    };
}

/// A food used as an ingredient.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Food {
    pub id: FoodId,
    pub name: String,
    /// Whether the food is currently on hand.
    #[cfg_attr(feature = "serde", serde(default, alias = "food_onhand"))]
    pub onhand: bool,
    /// Parent food in the food hierarchy.
    #[cfg_attr(feature = "serde", serde(default))]
    pub parent: Option<FoodId>,
}

impl Food {
    pub fn new(id: FoodId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            onhand: false,
            parent: None,
        }
    }
}

/// A keyword (tag) attached to recipes. Keywords form a tree.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Keyword {
    pub id: KeywordId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub parent: Option<KeywordId>,
}

impl Keyword {
    pub fn new(id: KeywordId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            parent: None,
        }
    }

    /// Sets the parent keyword.
    pub fn with_parent(mut self, parent: KeywordId) -> Self {
        self.parent = Some(parent);
        self
    }
}

/// A recipe book: a named collection of recipes.
///
/// A book may be backed by a saved search filter instead of an explicit
/// recipe list; `filter` carries that filter's id.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Book {
    pub id: BookId,
    pub name: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "super::serde_support::optional_object_id")
    )]
    pub filter: Option<u64>,
}

impl Book {
    pub fn new(id: BookId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            filter: None,
        }
    }
}

impl_identity!(Food);
impl_identity!(Keyword);
impl_identity!(Book);
