//! Tests for menu configuration.

use std::io::Write;

use super::*;

#[test]
fn test_toml_parsing() {
    let toml = r#"
        choices = 6
        random_seed = 42
        include_children = false

        [termination]
        seconds_spent_limit = 30
        node_limit = 100000

        [[keywords]]
        condition = 73
        count = 1
        operator = ">="

        [[keywords]]
        condition = [12, 13]
        count = "0"
        operator = "=="
        exclude = true
        cookedon = "-30days"

        [[foods]]
        condition = 9
        count = 2
        operator = "<="

        [[books]]
        condition = [4]
        count = 1
        operator = ">="

        [[cookedon]]
        condition = "-14days"
        count = 3
        operator = "<="
    "#;

    let config = MenuConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.choices, 6);
    assert_eq!(config.random_seed, Some(42));
    assert!(!config.include_children);
    assert_eq!(config.termination.as_ref().unwrap().node_limit, Some(100000));
    assert_eq!(config.time_limit(), Some(Duration::from_secs(30)));

    assert_eq!(config.keywords.len(), 2);
    assert_eq!(config.keywords[0].condition.as_slice(), &[KeywordId::new(73)]);
    assert_eq!(
        config.keywords[1].condition.as_slice(),
        &[KeywordId::new(12), KeywordId::new(13)]
    );
    assert_eq!(config.keywords[1].count, 0);
    assert_eq!(config.keywords[1].operator, Comparison::Exactly);
    assert!(config.keywords[1].exclude);
    assert_eq!(config.keywords[1].sub_filters(), (Some("-30days"), None));

    assert_eq!(config.foods[0].operator, Comparison::AtMost);
    assert_eq!(config.books[0].condition.as_slice(), &[BookId::new(4)]);
    assert_eq!(config.cookedon[0].condition, "-14days");
    assert_eq!(config.constraint_count(), 5);
}

#[test]
fn test_yaml_parsing() {
    let yaml = r#"
        choices: 3
        ratings:
          - condition: -2
            count: "1"
            operator: "<="
            exclude: "Yes"
        createdon:
          - condition: "2024-01-01"
            count: 1
            operator: ">="
            exclude: 0
    "#;

    let config = MenuConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.choices, 3);
    assert!(config.include_children);
    assert_eq!(config.ratings[0].condition, -2);
    assert_eq!(config.ratings[0].count, 1);
    assert!(config.ratings[0].exclude);
    assert!(!config.createdon[0].exclude);
}

#[test]
fn test_defaults() {
    let config = MenuConfig::from_toml_str("").unwrap();
    assert_eq!(config, MenuConfig::default());
    assert_eq!(config.choices, DEFAULT_CHOICES);
    assert_eq!(config.time_limit(), None);
    assert_eq!(config.constraint_count(), 0);
}

#[test]
fn test_lenient_flag_strings() {
    for (text, expected) in [
        ("true", true),
        ("YES", true),
        ("1", true),
        ("no", false),
        ("false", false),
        ("y", false),
        ("on", false),
        ("whatever", false),
    ] {
        let toml = format!(
            "[[ratings]]\ncondition = 3\ncount = 1\noperator = \">=\"\nexclude = \"{text}\"\n"
        );
        let config = MenuConfig::from_toml_str(&toml).unwrap();
        assert_eq!(config.ratings[0].exclude, expected, "{text}");
    }
}

#[test]
fn test_lenient_flag_numbers() {
    for (value, expected) in [("1", true), ("0", false), ("2", false), ("1.0", true), ("0.5", false)] {
        let toml = format!(
            "[[ratings]]\ncondition = 3\ncount = 1\noperator = \">=\"\nexclude = {value}\n"
        );
        let config = MenuConfig::from_toml_str(&toml).unwrap();
        assert_eq!(config.ratings[0].exclude, expected, "{value}");
    }

    let yaml = "ratings:\n  - {condition: 3, count: 1, operator: '>=', exclude: ~}\n";
    assert!(!MenuConfig::from_yaml_str(yaml).unwrap().ratings[0].exclude);
}

#[test]
fn test_rejects_unknown_operator() {
    let toml = r#"
        [[ratings]]
        condition = 3
        count = 1
        operator = "!="
    "#;
    assert!(matches!(
        MenuConfig::from_toml_str(toml),
        Err(ConfigError::Toml(_))
    ));
}

#[test]
fn test_rejects_negative_count() {
    let toml = r#"
        [[ratings]]
        condition = 3
        count = "-1"
        operator = ">="
    "#;
    assert!(matches!(
        MenuConfig::from_toml_str(toml),
        Err(ConfigError::Toml(_))
    ));
}

#[test]
fn test_validate_rating_range() {
    let config = MenuConfig::new().with_rating(ConstraintDecl::new(6, Comparison::AtLeast, 1));
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_validate_date_text() {
    let bad_condition = MenuConfig::new().with_cookedon(ConstraintDecl::new(
        "last tuesday".to_string(),
        Comparison::AtLeast,
        1,
    ));
    assert!(matches!(bad_condition.validate(), Err(ConfigError::Invalid(_))));

    let bad_sub_filter = MenuConfig::new().with_keyword(
        ConstraintDecl::new(OneOrMany::One(KeywordId::new(1)), Comparison::AtLeast, 1)
            .with_createdon("7weeks"),
    );
    assert!(matches!(bad_sub_filter.validate(), Err(ConfigError::Invalid(_))));

    let good = MenuConfig::new().with_food(
        ConstraintDecl::new(OneOrMany::One(FoodId::new(1)), Comparison::AtMost, 1)
            .with_cookedon("-7days")
            .with_createdon("2024-01-01"),
    );
    assert!(good.validate().is_ok());
}

#[test]
fn test_builder() {
    let config = MenuConfig::new()
        .with_choices(4)
        .with_random_seed(7)
        .with_termination_seconds(60)
        .with_book(ConstraintDecl::new(
            OneOrMany::Many(vec![BookId::new(1), BookId::new(2)]),
            Comparison::AtLeast,
            1,
        ));

    assert_eq!(config.choices, 4);
    assert_eq!(config.random_seed, Some(7));
    assert_eq!(config.time_limit(), Some(Duration::from_secs(60)));
    assert_eq!(config.books[0].condition.as_slice().len(), 2);
}

#[test]
fn test_termination_minutes_add_up() {
    let termination = TerminationConfig {
        seconds_spent_limit: Some(30),
        minutes_spent_limit: Some(2),
        node_limit: None,
    };
    assert_eq!(termination.time_limit(), Some(Duration::from_secs(150)));
    assert_eq!(TerminationConfig::default().time_limit(), None);
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "choices = 2\n[[keywords]]\ncondition = 1\ncount = 1\noperator = \"<=\"").unwrap();

    let config = MenuConfig::load(file.path()).unwrap();
    assert_eq!(config.choices, 2);
    assert_eq!(config.keywords[0].operator, Comparison::AtMost);
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("menu.toml");
    assert!(matches!(MenuConfig::load(&missing), Err(ConfigError::Io(_))));
    assert_eq!(MenuConfig::load(&missing).unwrap_or_default().choices, DEFAULT_CHOICES);
}

#[test]
fn test_config_error_converts() {
    let err: menuforge_core::MenuForgeError = ConfigError::Invalid("bad".into()).into();
    assert!(matches!(err, menuforge_core::MenuForgeError::Config(_)));
}
