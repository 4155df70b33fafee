//! Configuration system for MenuForge.
//!
//! A menu configuration declares how many recipes to pick and which counting
//! constraints the selection must satisfy. It loads from TOML or YAML so a
//! menu can be changed without code changes.
//!
//! # Examples
//!
//! ```
//! use menuforge_config::MenuConfig;
//! use menuforge_core::Comparison;
//! use std::time::Duration;
//!
//! let config = MenuConfig::from_toml_str(r#"
//!     choices = 7
//!     random_seed = 42
//!
//!     [termination]
//!     seconds_spent_limit = 10
//!
//!     [[keywords]]
//!     condition = [73, 273]
//!     count = "2"
//!     operator = ">="
//!
//!     [[ratings]]
//!     condition = -2
//!     count = 0
//!     operator = "=="
//!     exclude = "yes"
//! "#).unwrap();
//!
//! assert_eq!(config.choices, 7);
//! assert_eq!(config.time_limit(), Some(Duration::from_secs(10)));
//! assert_eq!(config.keywords[0].count, 2);
//! assert_eq!(config.keywords[0].operator, Comparison::AtLeast);
//! assert!(config.ratings[0].exclude);
//! ```
//!
//! Use the default menu when the file is missing:
//!
//! ```
//! use menuforge_config::MenuConfig;
//!
//! let config = MenuConfig::load("menu.toml").unwrap_or_default();
//! assert_eq!(config.choices, 5);
//! ```

mod lenient;

#[cfg(test)]
mod tests;

use std::path::Path;
use std::time::Duration;

use menuforge_core::{BookId, Comparison, DateThreshold, FoodId, KeywordId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<ConfigError> for menuforge_core::MenuForgeError {
    fn from(err: ConfigError) -> Self {
        menuforge_core::MenuForgeError::Config(err.to_string())
    }
}

/// Number of recipes picked when the configuration does not say.
pub const DEFAULT_CHOICES: usize = 5;

/// Main menu configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MenuConfig {
    /// Number of recipes to select.
    #[serde(default = "default_choices")]
    pub choices: usize,

    /// Random seed for reproducible selections.
    #[serde(default)]
    pub random_seed: Option<u64>,

    /// Whether keyword and food conditions also match their descendants.
    #[serde(default = "default_true")]
    pub include_children: bool,

    /// Termination configuration.
    #[serde(default)]
    pub termination: Option<TerminationConfig>,

    /// Keyword constraints.
    #[serde(default)]
    pub keywords: Vec<ConstraintDecl<OneOrMany<KeywordId>>>,

    /// Food constraints.
    #[serde(default)]
    pub foods: Vec<ConstraintDecl<OneOrMany<FoodId>>>,

    /// Book constraints.
    #[serde(default)]
    pub books: Vec<ConstraintDecl<OneOrMany<BookId>>>,

    /// Rating constraints. Negative values mean "at most", others "at least".
    #[serde(default)]
    pub ratings: Vec<ConstraintDecl<i32>>,

    /// Last-cooked date constraints, as date threshold text.
    #[serde(default)]
    pub cookedon: Vec<ConstraintDecl<String>>,

    /// Creation date constraints, as date threshold text.
    #[serde(default)]
    pub createdon: Vec<ConstraintDecl<String>>,
}

fn default_choices() -> usize {
    DEFAULT_CHOICES
}

fn default_true() -> bool {
    true
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            choices: DEFAULT_CHOICES,
            random_seed: None,
            include_children: true,
            termination: None,
            keywords: Vec::new(),
            foods: Vec::new(),
            books: Vec::new(),
            ratings: Vec::new(),
            cookedon: Vec::new(),
            createdon: Vec::new(),
        }
    }
}

impl MenuConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist, contains invalid TOML or fails
    /// [`validate`](Self::validate).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values serde cannot check on its own.
    ///
    /// Ratings must lie in `-5..=5` and date conditions, including the
    /// optional sub-filters of every declaration, must be threshold text
    /// accepted by [`DateThreshold`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        for decl in &self.ratings {
            if !(-5..=5).contains(&decl.condition) {
                return Err(ConfigError::Invalid(format!(
                    "rating condition {} is outside the range -5 to 5",
                    decl.condition
                )));
            }
        }

        let dates = self
            .cookedon
            .iter()
            .chain(&self.createdon)
            .map(|decl| decl.condition.as_str());
        let sub_filters = self
            .keywords
            .iter()
            .map(ConstraintDecl::sub_filters)
            .chain(self.foods.iter().map(ConstraintDecl::sub_filters))
            .chain(self.books.iter().map(ConstraintDecl::sub_filters))
            .chain(self.ratings.iter().map(ConstraintDecl::sub_filters))
            .chain(self.cookedon.iter().map(ConstraintDecl::sub_filters))
            .chain(self.createdon.iter().map(ConstraintDecl::sub_filters))
            .flat_map(|(cooked, created)| cooked.into_iter().chain(created));

        for text in dates.chain(sub_filters) {
            DateThreshold::parse(text).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        }
        Ok(())
    }

    /// Sets the number of recipes to select.
    pub fn with_choices(mut self, choices: usize) -> Self {
        self.choices = choices;
        self
    }

    /// Sets the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Sets the termination time limit.
    pub fn with_termination_seconds(mut self, seconds: u64) -> Self {
        self.termination = Some(TerminationConfig {
            seconds_spent_limit: Some(seconds),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    /// Adds a keyword constraint.
    pub fn with_keyword(mut self, decl: ConstraintDecl<OneOrMany<KeywordId>>) -> Self {
        self.keywords.push(decl);
        self
    }

    /// Adds a food constraint.
    pub fn with_food(mut self, decl: ConstraintDecl<OneOrMany<FoodId>>) -> Self {
        self.foods.push(decl);
        self
    }

    /// Adds a book constraint.
    pub fn with_book(mut self, decl: ConstraintDecl<OneOrMany<BookId>>) -> Self {
        self.books.push(decl);
        self
    }

    /// Adds a rating constraint.
    pub fn with_rating(mut self, decl: ConstraintDecl<i32>) -> Self {
        self.ratings.push(decl);
        self
    }

    /// Adds a last-cooked date constraint.
    pub fn with_cookedon(mut self, decl: ConstraintDecl<String>) -> Self {
        self.cookedon.push(decl);
        self
    }

    /// Adds a creation date constraint.
    pub fn with_createdon(mut self, decl: ConstraintDecl<String>) -> Self {
        self.createdon.push(decl);
        self
    }

    /// Returns the termination time limit, if configured.
    pub fn time_limit(&self) -> Option<Duration> {
        self.termination.as_ref().and_then(|t| t.time_limit())
    }

    /// Returns the total number of declared constraints.
    pub fn constraint_count(&self) -> usize {
        self.keywords.len()
            + self.foods.len()
            + self.books.len()
            + self.ratings.len()
            + self.cookedon.len()
            + self.createdon.len()
    }
}

/// Termination configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TerminationConfig {
    /// Maximum seconds to spend solving.
    pub seconds_spent_limit: Option<u64>,

    /// Maximum minutes to spend solving.
    pub minutes_spent_limit: Option<u64>,

    /// Maximum number of search nodes to explore.
    pub node_limit: Option<u64>,
}

impl TerminationConfig {
    /// Returns the time limit as a Duration, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        let seconds = self
            .seconds_spent_limit
            .unwrap_or(0)
            .saturating_add(self.minutes_spent_limit.unwrap_or(0).saturating_mul(60));
        if seconds > 0 {
            Some(Duration::from_secs(seconds))
        } else {
            None
        }
    }
}

/// One declared counting constraint.
///
/// `count` and `exclude` are read leniently: a count may be written as a
/// string of digits and `exclude` accepts `true`, `yes` or `1` in any case.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ConstraintDecl<C> {
    /// What the constraint is about; its meaning depends on the section.
    pub condition: C,

    /// Target number of selected recipes.
    #[serde(deserialize_with = "lenient::count")]
    pub count: usize,

    /// Comparison against `count`.
    pub operator: Comparison,

    /// Whether the constraint counts recipes outside the condition.
    #[serde(default, deserialize_with = "lenient::flag")]
    pub exclude: bool,

    /// Narrows the condition to recipes last cooked per this threshold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookedon: Option<String>,

    /// Narrows the condition to recipes created per this threshold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub createdon: Option<String>,
}

impl<C> ConstraintDecl<C> {
    pub fn new(condition: C, operator: Comparison, count: usize) -> Self {
        Self {
            condition,
            count,
            operator,
            exclude: false,
            cookedon: None,
            createdon: None,
        }
    }

    pub fn excluding(mut self, exclude: bool) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn with_cookedon(mut self, threshold: impl Into<String>) -> Self {
        self.cookedon = Some(threshold.into());
        self
    }

    pub fn with_createdon(mut self, threshold: impl Into<String>) -> Self {
        self.createdon = Some(threshold.into());
        self
    }

    /// Returns the optional sub-filters in application order.
    pub fn sub_filters(&self) -> (Option<&str>, Option<&str>) {
        (self.cookedon.as_deref(), self.createdon.as_deref())
    }
}

/// A single value or a list of values.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Returns the values as a slice.
    pub fn as_slice(&self) -> &[T] {
        match self {
            OneOrMany::One(value) => std::slice::from_ref(value),
            OneOrMany::Many(values) => values,
        }
    }
}

impl<T> From<T> for OneOrMany<T> {
    fn from(value: T) -> Self {
        OneOrMany::One(value)
    }
}
