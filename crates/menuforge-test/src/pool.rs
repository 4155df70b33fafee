//! Recipe pool fixtures.

use chrono::{DateTime, Duration, TimeZone, Utc};
use menuforge_core::{KeywordId, Recipe, RecipeId};

/// Creation date of every fixture recipe unless overridden.
pub fn base_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Creates a recipe named `Recipe {id}`.
///
/// Recipe `n` is created `n` days after [`base_date`] so date filters have
/// something to work with.
pub fn recipe(id: u64) -> Recipe {
    let created = base_date() + Duration::days(id as i64);
    Recipe::new(RecipeId::new(id), format!("Recipe {id}"), created)
}

/// Creates recipes with ids `1..=n`.
pub fn numbered_pool(n: u64) -> Vec<Recipe> {
    (1..=n).map(recipe).collect()
}

/// Creates recipes with ids `1..=n`, tagging the ids in `tagged` with `keyword`.
pub fn tagged_pool(n: u64, keyword: KeywordId, tagged: &[u64]) -> Vec<Recipe> {
    (1..=n)
        .map(|id| {
            let r = recipe(id);
            if tagged.contains(&id) {
                r.with_keywords([keyword])
            } else {
                r
            }
        })
        .collect()
}

/// Creates recipes with ids `1..=ratings.len()` carrying the given ratings.
pub fn rated_pool(ratings: &[Option<u8>]) -> Vec<Recipe> {
    ratings
        .iter()
        .enumerate()
        .map(|(i, rating)| {
            let r = recipe(i as u64 + 1);
            match rating {
                Some(value) => r.with_rating(*value),
                None => r,
            }
        })
        .collect()
}

/// Returns the raw ids of `recipes`, sorted.
pub fn ids_of<'a>(recipes: impl IntoIterator<Item = &'a Recipe>) -> Vec<u64> {
    let mut ids: Vec<u64> = recipes.into_iter().map(|r| r.id.get()).collect();
    ids.sort_unstable();
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_pool() {
        let pool = numbered_pool(4);
        assert_eq!(ids_of(&pool), vec![1, 2, 3, 4]);
        assert!(pool[0].createdon < pool[3].createdon);
    }

    #[test]
    fn test_tagged_pool() {
        let k = KeywordId::new(7);
        let pool = tagged_pool(5, k, &[2, 5]);
        let tagged: Vec<u64> = pool
            .iter()
            .filter(|r| r.has_keyword(k))
            .map(|r| r.id.get())
            .collect();
        assert_eq!(tagged, vec![2, 5]);
    }

    #[test]
    fn test_rated_pool() {
        let pool = rated_pool(&[None, Some(3)]);
        assert_eq!(pool[0].rating, None);
        assert_eq!(pool[1].rating, Some(3));
    }
}
