use std::io::Write;

use clap::CommandFactory;
use chrono::Utc;
use menuforge::{Comparison, Recipe, RecipeId, RecipePicker};

use super::*;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("menuforge").chain(args.iter().copied())).unwrap()
}

fn config_file(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_cli_definition_is_valid() {
    Cli::command().debug_assert();
}

#[test]
fn test_parse_arguments() {
    let cli = parse(&[
        "--catalog",
        "catalog.json",
        "--choices",
        "7",
        "--seed",
        "3",
        "--time-limit",
        "10",
        "--json",
    ]);
    assert_eq!(cli.catalog, PathBuf::from("catalog.json"));
    assert_eq!(cli.choices, Some(7));
    assert_eq!(cli.seed, Some(3));
    assert_eq!(cli.time_limit, Some(10));
    assert!(cli.json);
    assert!(cli.config.is_none());
}

#[test]
fn test_catalog_is_required() {
    assert!(Cli::try_parse_from(["menuforge", "--json"]).is_err());
}

#[test]
fn test_overrides_replace_config_values() {
    let cli = parse(&["--catalog", "c.json", "--choices", "2", "--seed", "9"]);
    let config = apply_overrides(MenuConfig::new().with_random_seed(1), &cli);
    assert_eq!(config.choices, 2);
    assert_eq!(config.random_seed, Some(9));

    let untouched = apply_overrides(MenuConfig::new(), &parse(&["--catalog", "c.json"]));
    assert_eq!(untouched, MenuConfig::new());
}

#[test]
fn test_load_config_by_extension() {
    let toml = config_file(".toml", "choices = 4\n");
    assert_eq!(load_config(Some(toml.path())).unwrap().choices, 4);

    let yaml = config_file(
        ".yaml",
        "choices: 6\nkeywords:\n  - {condition: 1, count: 1, operator: '>='}\n",
    );
    let config = load_config(Some(yaml.path())).unwrap();
    assert_eq!(config.choices, 6);
    assert_eq!(config.keywords[0].operator, Comparison::AtLeast);
}

#[test]
fn test_explicit_missing_config_is_an_error() {
    assert!(load_config(Some(Path::new("/nonexistent/menu.toml"))).is_err());
}

#[test]
fn test_render_selection() {
    let pool = vec![
        Recipe::new(RecipeId::new(1), "Soup", Utc::now()).with_rating(4),
        Recipe::new(RecipeId::new(2), "Cake", Utc::now()),
    ];
    let selection = RecipePicker::new(pool, 2).unwrap().solve().unwrap();

    let text = render_text(&selection);
    assert!(text.contains("1. Soup [#1] (4/5)"));
    assert!(text.contains("2. Cake [#2]\n"));

    let json: serde_json::Value = serde_json::from_str(&render_json(&selection).unwrap()).unwrap();
    assert_eq!(json["status"], "optimal");
    assert_eq!(json["recipes"].as_array().map(Vec::len), Some(2));
}

#[test]
fn test_missing_default_config_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_default(&dir.path().join("menu.toml")).unwrap();
    assert_eq!(config, MenuConfig::default());
}

#[test]
fn test_invalid_default_config_is_an_error() {
    let typo = config_file(".toml", "choices = \"seven\"\n");
    assert!(matches!(load_default(typo.path()), Err(ConfigError::Toml(_))));

    let bad_operator = config_file(
        ".toml",
        "[[keywords]]\ncondition = 1\ncount = 1\noperator = \"=>\"\n",
    );
    assert!(load_default(bad_operator.path()).is_err());

    let present = config_file(".toml", "choices = 3\n");
    assert_eq!(load_default(present.path()).unwrap().choices, 3);
}
