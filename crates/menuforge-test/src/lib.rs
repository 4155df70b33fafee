//! Shared test fixtures for MenuForge crates.
//!
//! This crate provides recipe pools and pure checking functions for tests.
//! It depends only on `menuforge-core` so every other crate can use it as a
//! dev-dependency without cycles.
//!
//! - [`pool`] - Recipe and pool builders
//! - [`check`] - Constraint satisfaction checks over a selection
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! menuforge-test = { workspace = true }
//! ```
//!
//! ```ignore
//! use menuforge_test::pool::{numbered_pool, tagged_pool};
//! use menuforge_test::check::satisfies;
//! ```

pub mod check;
pub mod pool;

pub use check::{count_matching, satisfies};
pub use pool::{base_date, ids_of, numbered_pool, rated_pool, recipe, tagged_pool};
