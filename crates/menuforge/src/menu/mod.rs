//! The menu pipeline.
//!
//! A [`Menu`] turns a [`MenuConfig`] into engine constraints against a
//! [`RecipeSource`]. Declarations are resolved in a fixed order: keywords,
//! foods, books, ratings, cookedon, createdon. Within a declaration the
//! primary condition is resolved first, then the optional `cookedon` and
//! `createdon` sub-filters narrow it in that order.

#[cfg(test)]
mod tests;

use std::collections::HashSet;
use std::sync::atomic::Ordering;
use std::time::Duration;

use chrono::{DateTime, Utc};
use menuforge_config::{ConstraintDecl, MenuConfig};
use menuforge_core::filter::{with_any_id, with_keyword, with_rating};
use menuforge_core::{
    ConstraintKind, CountConstraint, DateField, DateThreshold, KeywordId, MenuForgeError, Recipe,
    RecipeId, Result,
};
use menuforge_solver::{FeasibilityWarning, RecipePicker, Selection};
use tracing::{debug, info, warn};

use crate::source::RecipeSource;

/// A configured menu over a recipe source.
#[derive(Debug)]
pub struct Menu<S> {
    config: MenuConfig,
    source: S,
    recipes: Option<Vec<Recipe>>,
    reference_time: Option<DateTime<Utc>>,
    warnings: Vec<FeasibilityWarning>,
}

impl<S: RecipeSource> Menu<S> {
    pub fn new(config: MenuConfig, source: S) -> Self {
        Self {
            config,
            source,
            recipes: None,
            reference_time: None,
            warnings: Vec::new(),
        }
    }

    /// Resolves relative date thresholds against `now` instead of the clock.
    pub fn with_reference_time(mut self, now: DateTime<Utc>) -> Self {
        self.reference_time = Some(now);
        self
    }

    pub fn config(&self) -> &MenuConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Feasibility warnings raised by the most recent build.
    pub fn warnings(&self) -> &[FeasibilityWarning] {
        &self.warnings
    }

    /// Loads the recipe pool from the source, dropping repeated ids.
    ///
    /// The first occurrence of each id is kept. Later calls return the
    /// already loaded pool.
    pub fn prepare(&mut self) -> Result<&[Recipe]> {
        if self.recipes.is_none() {
            let loaded = self.source.recipes()?;
            let total = loaded.len();
            let mut seen = HashSet::with_capacity(total);
            let pool: Vec<Recipe> = loaded.into_iter().filter(|r| seen.insert(r.id)).collect();

            debug!(
                event = "pool_loaded",
                recipe_count = pool.len(),
                duplicates = total - pool.len(),
            );
            self.recipes = Some(pool);
        }
        Ok(self.recipes.as_deref().unwrap_or_default())
    }

    /// Builds a picker with every declared constraint added.
    ///
    /// # Errors
    ///
    /// Fails when the source fails, a date threshold does not parse or the
    /// pool is invalid.
    pub fn build_picker(&mut self) -> Result<RecipePicker> {
        self.prepare()?;
        let pool = self.recipes.as_deref().unwrap_or_default();

        let mut picker = RecipePicker::new(pool.to_vec(), self.config.choices)?;
        if let Some(seed) = self.config.random_seed {
            picker = picker.with_seed(seed);
        }
        if let Some(termination) = &self.config.termination {
            picker = picker.with_termination_config(termination);
        }

        let config = &self.config;
        for decl in &config.keywords {
            let keywords = self.keyword_condition(decl.condition.as_slice())?;
            let matched = with_keyword(pool, &keywords);
            self.add(&mut picker, ConstraintKind::Keyword, decl, matched)?;
        }
        for decl in &config.foods {
            let mut ids = HashSet::new();
            for &food in decl.condition.as_slice() {
                ids.extend(self.source.food_recipes(food, config.include_children)?);
            }
            self.add(&mut picker, ConstraintKind::Food, decl, with_any_id(pool, &ids))?;
        }
        for decl in &config.books {
            let mut ids: HashSet<RecipeId> = HashSet::new();
            for &book in decl.condition.as_slice() {
                ids.extend(self.source.book_recipes(book)?);
            }
            self.add(&mut picker, ConstraintKind::Book, decl, with_any_id(pool, &ids))?;
        }
        for decl in &config.ratings {
            let matched = with_rating(pool, decl.condition);
            self.add(&mut picker, ConstraintKind::Rating, decl, matched)?;
        }
        for decl in &config.cookedon {
            let matched = self.threshold(&decl.condition)?.filter(pool, DateField::CookedOn);
            self.add(&mut picker, ConstraintKind::CookedOn, decl, matched)?;
        }
        for decl in &config.createdon {
            let matched = self.threshold(&decl.condition)?.filter(pool, DateField::CreatedOn);
            self.add(&mut picker, ConstraintKind::CreatedOn, decl, matched)?;
        }

        self.warnings = picker.warnings().to_vec();
        Ok(picker)
    }

    /// Picks the menu.
    ///
    /// # Errors
    ///
    /// Returns [`MenuForgeError::Infeasible`] when no selection satisfies the
    /// declared constraints, plus any error from [`build_picker`](Self::build_picker).
    pub fn select(&mut self) -> Result<Selection> {
        let mut picker = self.build_picker()?;
        let selection = picker.solve()?;
        info!(
            event = "menu_selected",
            selected = selection.len(),
            choices = self.config.choices,
        );
        Ok(selection)
    }

    /// Picks the menu on a blocking task, giving up after `timeout`.
    ///
    /// When the deadline passes the search is asked to stop. A selection
    /// found by then is returned, otherwise [`MenuForgeError::Terminated`].
    pub async fn select_with_deadline(&mut self, timeout: Duration) -> Result<Selection> {
        let mut picker = self.build_picker()?;
        let flag = picker.terminate_flag();
        let mut handle = tokio::task::spawn_blocking(move || picker.solve());

        let joined = match tokio::time::timeout(timeout, &mut handle).await {
            Ok(joined) => joined,
            Err(_) => {
                warn!(
                    event = "deadline_reached",
                    duration_ms = timeout.as_millis() as u64,
                    "Stopping search at deadline"
                );
                flag.store(true, Ordering::SeqCst);
                handle.await
            }
        };

        match joined {
            Ok(result) => result,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(_) => Err(MenuForgeError::Terminated),
        }
    }

    fn keyword_condition(&self, keywords: &[KeywordId]) -> Result<Vec<KeywordId>> {
        if !self.config.include_children {
            return Ok(keywords.to_vec());
        }
        let mut seen = HashSet::new();
        let mut expanded = Vec::new();
        for &keyword in keywords {
            for id in self.source.keyword_tree(keyword)? {
                if seen.insert(id) {
                    expanded.push(id);
                }
            }
        }
        Ok(expanded)
    }

    fn threshold(&self, text: &str) -> Result<DateThreshold> {
        match self.reference_time {
            Some(now) => DateThreshold::parse_relative_to(text, now),
            None => DateThreshold::parse(text),
        }
    }

    // Narrows by the declaration's sub-filters and hands the subset to the picker.
    fn add<C>(
        &self,
        picker: &mut RecipePicker,
        kind: ConstraintKind,
        decl: &ConstraintDecl<C>,
        mut matched: Vec<&Recipe>,
    ) -> Result<()> {
        let (cookedon, createdon) = decl.sub_filters();
        if let Some(text) = cookedon {
            matched = self.threshold(text)?.filter(matched, DateField::CookedOn);
        }
        if let Some(text) = createdon {
            matched = self.threshold(text)?.filter(matched, DateField::CreatedOn);
        }

        let constraint = CountConstraint::from_recipes(kind, matched, decl.operator, decl.count)
            .excluding(decl.exclude);
        picker.add_constraint(constraint)?;
        Ok(())
    }
}
