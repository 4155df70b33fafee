//! Result of a successful pick.

use menuforge_core::{Recipe, RecipeId};

use crate::backend::SolveStatus;
use crate::stats::SearchStats;

/// The recipes picked by one solve, in pool order.
#[derive(Debug, Clone)]
pub struct Selection {
    pub recipes: Vec<Recipe>,
    pub objective: f64,
    pub status: SolveStatus,
    pub stats: SearchStats,
}

impl Selection {
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = RecipeId> + '_ {
        self.recipes.iter().map(|r| r.id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Recipe> {
        self.recipes.iter()
    }

    pub fn into_recipes(self) -> Vec<Recipe> {
        self.recipes
    }
}

impl IntoIterator for Selection {
    type Item = Recipe;
    type IntoIter = std::vec::IntoIter<Recipe>;

    fn into_iter(self) -> Self::IntoIter {
        self.recipes.into_iter()
    }
}

impl<'a> IntoIterator for &'a Selection {
    type Item = &'a Recipe;
    type IntoIter = std::slice::Iter<'a, Recipe>;

    fn into_iter(self) -> Self::IntoIter {
        self.recipes.iter()
    }
}
