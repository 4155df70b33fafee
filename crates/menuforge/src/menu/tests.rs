//! Tests for the menu pipeline.

use std::time::Duration;

use chrono::{TimeZone, Utc};
use menuforge_config::{ConstraintDecl, MenuConfig, OneOrMany, TerminationConfig};
use menuforge_core::{
    BookId, Comparison, ConstraintKind, Food, FoodId, Keyword, KeywordId, MenuForgeError,
    RecipeId,
};
use menuforge_test::{base_date, ids_of, numbered_pool, recipe, satisfies};

use super::*;
use crate::source::InMemorySource;

const WARM: KeywordId = KeywordId::new(10);
const STEW: KeywordId = KeywordId::new(11);

fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

/// Ten recipes: 1-3 warm, 4-5 stew (a child of warm), even ids cooked in March.
fn kitchen() -> InMemorySource {
    let recipes = (1..=10)
        .map(|id| {
            let mut r = recipe(id);
            if id <= 3 {
                r = r.with_keywords([WARM]);
            } else if id <= 5 {
                r = r.with_keywords([STEW]);
            }
            if id % 2 == 0 {
                r = r.with_cookedon(at(2024, 3, 1));
            }
            r.with_rating((id % 6) as u8)
        })
        .collect();

    InMemorySource::from_recipes(recipes)
        .with_keyword(Keyword::new(WARM, "warm"))
        .with_keyword(Keyword::new(STEW, "stew").with_parent(WARM))
        .with_book(BookId::new(1), [1, 2, 9].map(RecipeId::new))
        .with_food(Food::new(FoodId::new(7), "lentil"), [4, 5, 6].map(RecipeId::new))
}

fn menu(config: MenuConfig) -> Menu<InMemorySource> {
    Menu::new(config, kitchen()).with_reference_time(at(2024, 6, 1))
}

fn warm(comparison: Comparison, count: usize) -> ConstraintDecl<OneOrMany<KeywordId>> {
    ConstraintDecl::new(WARM.into(), comparison, count)
}

#[test]
fn test_prepare_deduplicates_keeping_first() {
    let mut duplicate = recipe(1);
    duplicate.name = "Duplicate".to_string();
    let source = InMemorySource::from_recipes(vec![recipe(1), recipe(2), duplicate, recipe(3)]);

    let mut menu = Menu::new(MenuConfig::new(), source);
    let pool = menu.prepare().unwrap();
    assert_eq!(ids_of(pool), vec![1, 2, 3]);
    assert_eq!(pool[0].name, "Recipe 1");
}

#[test]
fn test_constraints_added_in_fixed_order() {
    let config = MenuConfig::new()
        .with_choices(3)
        .with_createdon(ConstraintDecl::new("2024-01-01".to_string(), Comparison::AtLeast, 0))
        .with_cookedon(ConstraintDecl::new("-30days".to_string(), Comparison::AtLeast, 0))
        .with_rating(ConstraintDecl::new(3, Comparison::AtLeast, 0))
        .with_book(ConstraintDecl::new(BookId::new(1).into(), Comparison::AtMost, 3))
        .with_food(ConstraintDecl::new(FoodId::new(7).into(), Comparison::AtMost, 3))
        .with_keyword(warm(Comparison::AtLeast, 0));

    let picker = menu(config).build_picker().unwrap();
    let kinds: Vec<ConstraintKind> = picker.constraints().iter().map(|c| c.kind.clone()).collect();
    assert_eq!(
        kinds,
        vec![
            ConstraintKind::Keyword,
            ConstraintKind::Food,
            ConstraintKind::Book,
            ConstraintKind::Rating,
            ConstraintKind::CookedOn,
            ConstraintKind::CreatedOn,
        ]
    );
}

#[test]
fn test_keyword_children_follow_config() {
    let config = MenuConfig::new().with_keyword(warm(Comparison::AtLeast, 0));
    let picker = menu(config.clone()).build_picker().unwrap();
    assert_eq!(picker.constraints()[0].matched, 5);

    let flat = MenuConfig {
        include_children: false,
        ..config
    };
    let picker = menu(flat).build_picker().unwrap();
    assert_eq!(picker.constraints()[0].matched, 3);
}

#[test]
fn test_food_and_book_resolution() {
    let config = MenuConfig::new()
        .with_food(ConstraintDecl::new(FoodId::new(7).into(), Comparison::AtLeast, 1))
        .with_book(ConstraintDecl::new(
            OneOrMany::Many(vec![BookId::new(1)]),
            Comparison::AtMost,
            1,
        ));

    let picker = menu(config).build_picker().unwrap();
    assert_eq!(picker.constraints()[0].matched, 3);
    assert_eq!(picker.constraints()[1].matched, 3);
}

#[test]
fn test_rating_and_date_conditions() {
    let config = MenuConfig::new()
        .with_rating(ConstraintDecl::new(-2, Comparison::AtLeast, 0))
        .with_cookedon(ConstraintDecl::new("2024-02-01".to_string(), Comparison::AtLeast, 0))
        .with_createdon(ConstraintDecl::new("-2024-01-05".to_string(), Comparison::AtLeast, 0));

    let picker = menu(config).build_picker().unwrap();
    let matched: Vec<usize> = picker.constraints().iter().map(|c| c.matched).collect();
    // ratings 1..=2: ids 1, 2, 7, 8; cooked since February: even ids; created by Jan 5: 1..=4
    assert_eq!(matched, vec![4, 5, 4]);
}

#[test]
fn test_sub_filters_narrow_in_order() {
    let decl = warm(Comparison::AtLeast, 0)
        .with_cookedon("2024-02-01")
        .with_createdon("-2024-01-04");

    let picker = menu(MenuConfig::new().with_keyword(decl)).build_picker().unwrap();
    // warm tree 1..=5, cooked {2, 4}, created on or before Jan 4 {2}
    assert_eq!(picker.constraints()[0].matched, 1);
}

#[test]
fn test_relative_threshold_uses_reference_time() {
    let config = MenuConfig::new().with_createdon(ConstraintDecl::new(
        "7days".to_string(),
        Comparison::AtLeast,
        0,
    ));

    let now = base_date() + chrono::Duration::days(10);
    let mut menu = Menu::new(config, kitchen()).with_reference_time(now);
    let picker = menu.build_picker().unwrap();
    assert_eq!(picker.constraints()[0].matched, 8);
}

#[test]
fn test_exclude_passes_through() {
    let config = MenuConfig::new().with_keyword(warm(Comparison::Exactly, 0).excluding(true));
    let picker = menu(config).build_picker().unwrap();

    let report = &picker.constraints()[0];
    assert!(report.exclude);
    assert_eq!(report.matched, 5);
}

#[test]
fn test_select_satisfies_declarations() {
    let config = MenuConfig::new()
        .with_choices(4)
        .with_keyword(warm(Comparison::Exactly, 2))
        .with_book(ConstraintDecl::new(BookId::new(1).into(), Comparison::AtLeast, 1))
        .with_rating(ConstraintDecl::new(0, Comparison::AtMost, 4));

    let mut menu = menu(config);
    let pool = menu.prepare().unwrap().to_vec();
    let mut picker = menu.build_picker().unwrap();
    let selection = picker.solve().unwrap();

    assert_eq!(selection.len(), 4);
    let warm_count = selection
        .iter()
        .filter(|r| r.has_keyword(WARM) || r.has_keyword(STEW))
        .count();
    assert_eq!(warm_count, 2);
    assert!(selection
        .ids()
        .any(|id| [1, 2, 9].map(RecipeId::new).contains(&id)));

    let warm_ids = (1..=5).map(RecipeId::new);
    let check = CountConstraint::new(ConstraintKind::Keyword, warm_ids, Comparison::Exactly, 2);
    assert!(satisfies(&pool, &selection.recipes, &check));
}

#[test]
fn test_infeasible_menu() {
    let config = MenuConfig::new()
        .with_choices(3)
        .with_keyword(warm(Comparison::AtLeast, 6));

    let mut menu = menu(config);
    assert!(matches!(menu.select(), Err(MenuForgeError::Infeasible)));
    assert_eq!(menu.warnings().len(), 1);
}

#[test]
fn test_unknown_book_is_a_source_error() {
    let config = MenuConfig::new().with_book(ConstraintDecl::new(
        BookId::new(404).into(),
        Comparison::AtLeast,
        1,
    ));
    assert!(matches!(menu(config).select(), Err(MenuForgeError::Source(_))));
}

#[test]
fn test_bad_threshold_is_a_config_error() {
    let config = MenuConfig {
        createdon: vec![ConstraintDecl::new(
            "last week".to_string(),
            Comparison::AtLeast,
            1,
        )],
        ..MenuConfig::new()
    };
    assert!(matches!(menu(config).select(), Err(MenuForgeError::Config(_))));
}

#[test]
fn test_seeded_menus_agree() {
    let run = || {
        let config = MenuConfig::new().with_choices(4).with_random_seed(99);
        ids_of(&menu(config).select().unwrap())
    };
    assert_eq!(run(), run());
}

#[tokio::test]
async fn test_select_with_deadline() {
    let config = MenuConfig::new()
        .with_choices(3)
        .with_keyword(warm(Comparison::AtLeast, 1));

    let selection = menu(config)
        .select_with_deadline(Duration::from_secs(30))
        .await
        .unwrap();
    assert_eq!(selection.len(), 3);
}

#[tokio::test]
async fn test_deadline_path_reports_termination() {
    let config = MenuConfig {
        termination: Some(TerminationConfig {
            node_limit: Some(1),
            ..TerminationConfig::default()
        }),
        ..MenuConfig::new().with_choices(5)
    };

    let result = menu(config)
        .select_with_deadline(Duration::from_secs(30))
        .await;
    assert!(matches!(result, Err(MenuForgeError::Terminated)));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_expired_deadline_never_returns_partial_menu() {
    let source = InMemorySource::from_recipes(numbered_pool(60));
    let mut menu = Menu::new(MenuConfig::new().with_choices(20), source);

    match menu.select_with_deadline(Duration::ZERO).await {
        Ok(selection) => assert_eq!(selection.len(), 20),
        Err(e) => assert!(matches!(e, MenuForgeError::Terminated)),
    }
}
