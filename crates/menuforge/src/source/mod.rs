//! Read-only recipe sources.
//!
//! A [`RecipeSource`] hands out the recipe pool and answers the lookups a
//! menu needs to resolve its declarations: keyword trees, book contents and
//! the recipes using a food. [`InMemorySource`] answers them from a
//! [`Catalog`] loaded from JSON.


use std::collections::{HashMap, HashSet, VecDeque};
use std::hash::Hash;
use std::path::Path;

use menuforge_core::{
    Book, BookId, Food, FoodId, Keyword, KeywordId, MenuForgeError, Recipe, RecipeId, Result,
};
use serde::{Deserialize, Serialize};

/// Lookups a menu needs from wherever recipes live.
pub trait RecipeSource {
    /// Returns every candidate recipe. May contain duplicates.
    fn recipes(&self) -> Result<Vec<Recipe>>;

    /// Returns `keyword` followed by all of its descendants.
    fn keyword_tree(&self, keyword: KeywordId) -> Result<Vec<KeywordId>>;

    /// Returns the recipes collected in `book`.
    fn book_recipes(&self, book: BookId) -> Result<Vec<RecipeId>>;

    /// Returns the recipes using `food`, and its descendant foods when
    /// `include_children` is set.
    fn food_recipes(&self, food: FoodId, include_children: bool) -> Result<Vec<RecipeId>>;
}

impl<S: RecipeSource + ?Sized> RecipeSource for &S {
    fn recipes(&self) -> Result<Vec<Recipe>> {
        (**self).recipes()
    }

    fn keyword_tree(&self, keyword: KeywordId) -> Result<Vec<KeywordId>> {
        (**self).keyword_tree(keyword)
    }

    fn book_recipes(&self, book: BookId) -> Result<Vec<RecipeId>> {
        (**self).book_recipes(book)
    }

    fn food_recipes(&self, food: FoodId, include_children: bool) -> Result<Vec<RecipeId>> {
        (**self).food_recipes(food, include_children)
    }
}

/// Everything an [`InMemorySource`] knows, in its JSON file shape.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Catalog {
    #[serde(default)]
    pub recipes: Vec<Recipe>,
    #[serde(default)]
    pub keywords: Vec<Keyword>,
    #[serde(default)]
    pub books: Vec<BookEntry>,
    #[serde(default)]
    pub foods: Vec<FoodEntry>,
}

/// A book and the recipes it collects.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BookEntry {
    #[serde(flatten)]
    pub book: Book,
    #[serde(default)]
    pub recipes: Vec<RecipeId>,
}

/// A food and the recipes using it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FoodEntry {
    #[serde(flatten)]
    pub food: Food,
    #[serde(default)]
    pub recipes: Vec<RecipeId>,
}

/// A recipe source held entirely in memory.
///
/// Keywords and foods form forests through their `parent` links. A keyword
/// the catalog does not list is its own tree; books and foods must be listed.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    recipes: Vec<Recipe>,
    keyword_children: HashMap<KeywordId, Vec<KeywordId>>,
    books: HashMap<BookId, Vec<RecipeId>>,
    foods: HashMap<FoodId, Vec<RecipeId>>,
    food_children: HashMap<FoodId, Vec<FoodId>>,
}

impl InMemorySource {
    pub fn new(catalog: Catalog) -> Self {
        let mut source = Self::from_recipes(catalog.recipes);
        for keyword in catalog.keywords {
            source = source.with_keyword(keyword);
        }
        for entry in catalog.books {
            source = source.with_book(entry.book.id, entry.recipes);
        }
        for entry in catalog.foods {
            source = source.with_food(entry.food, entry.recipes);
        }
        source
    }

    /// Creates a source with recipes only.
    pub fn from_recipes(recipes: Vec<Recipe>) -> Self {
        Self {
            recipes,
            ..Self::default()
        }
    }

    /// Parses a JSON catalog.
    ///
    /// # Errors
    ///
    /// Returns [`MenuForgeError::Source`] if the JSON does not describe a
    /// catalog.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let catalog: Catalog = serde_json::from_str(json)
            .map_err(|e| MenuForgeError::Source(format!("invalid catalog: {e}")))?;
        Ok(Self::new(catalog))
    }

    /// Loads a JSON catalog from a file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            MenuForgeError::Source(format!("cannot read catalog {}: {e}", path.display()))
        })?;
        Self::from_json_str(&json)
    }

    /// Registers a keyword and its place in the keyword tree.
    pub fn with_keyword(mut self, keyword: Keyword) -> Self {
        self.keyword_children.entry(keyword.id).or_default();
        if let Some(parent) = keyword.parent {
            self.keyword_children
                .entry(parent)
                .or_default()
                .push(keyword.id);
        }
        self
    }

    /// Registers a book with its recipes.
    pub fn with_book(mut self, book: BookId, recipes: impl IntoIterator<Item = RecipeId>) -> Self {
        self.books.entry(book).or_default().extend(recipes);
        self
    }

    /// Registers a food, its place in the food tree and the recipes using it.
    pub fn with_food(mut self, food: Food, recipes: impl IntoIterator<Item = RecipeId>) -> Self {
        self.foods.entry(food.id).or_default().extend(recipes);
        self.food_children.entry(food.id).or_default();
        if let Some(parent) = food.parent {
            self.food_children.entry(parent).or_default().push(food.id);
        }
        self
    }

    /// Recipes whose hydrated ingredients contain `food`.
    fn recipes_with_ingredient(&self, food: FoodId) -> impl Iterator<Item = RecipeId> + '_ {
        self.recipes
            .iter()
            .filter(move |r| r.ingredients.iter().any(|f| f.id == food))
            .map(|r| r.id)
    }
}

impl RecipeSource for InMemorySource {
    fn recipes(&self) -> Result<Vec<Recipe>> {
        Ok(self.recipes.clone())
    }

    fn keyword_tree(&self, keyword: KeywordId) -> Result<Vec<KeywordId>> {
        Ok(descendants(keyword, &self.keyword_children))
    }

    fn book_recipes(&self, book: BookId) -> Result<Vec<RecipeId>> {
        self.books
            .get(&book)
            .cloned()
            .ok_or_else(|| MenuForgeError::Source(format!("unknown book {book}")))
    }

    fn food_recipes(&self, food: FoodId, include_children: bool) -> Result<Vec<RecipeId>> {
        if !self.foods.contains_key(&food) {
            return Err(MenuForgeError::Source(format!("unknown food {food}")));
        }

        let tree = if include_children {
            descendants(food, &self.food_children)
        } else {
            vec![food]
        };

        let mut seen = HashSet::new();
        let mut recipes = Vec::new();
        for id in tree {
            let listed = self.foods.get(&id).into_iter().flatten().copied();
            for recipe in listed.chain(self.recipes_with_ingredient(id)) {
                if seen.insert(recipe) {
                    recipes.push(recipe);
                }
            }
        }
        Ok(recipes)
    }
}

// Breadth-first walk from `root`; each node appears once even if the links cycle.
fn descendants<T: Copy + Eq + Hash>(root: T, children: &HashMap<T, Vec<T>>) -> Vec<T> {
    let mut seen = HashSet::from([root]);
    let mut order = vec![root];
    let mut queue = VecDeque::from([root]);

    while let Some(node) = queue.pop_front() {
        for &child in children.get(&node).into_iter().flatten() {
            if seen.insert(child) {
                order.push(child);
                queue.push_back(child);
            }
        }
    }
    order
}
