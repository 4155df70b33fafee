//! `menuforge` - pick a constrained random menu from a recipe catalog.
//!
//! Usage:
//! ```bash
//! # Pick using ./menu.toml if present, defaults otherwise
//! menuforge --catalog catalog.json
//!
//! # Explicit configuration with overrides
//! menuforge --catalog catalog.json --config menu.yaml --choices 7 --seed 42
//!
//! # Give up after ten seconds, print JSON
//! menuforge --catalog catalog.json --time-limit 10 --json
//! ```

#[cfg(test)]
mod tests;

use std::error::Error;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use menuforge::{ConfigError, InMemorySource, Menu, MenuConfig, Selection};
use owo_colors::OwoColorize;

/// Configuration read when `--config` is not given.
const DEFAULT_CONFIG: &str = "menu.toml";

#[derive(Debug, Parser)]
#[command(
    name = "menuforge",
    version,
    about = "Pick a random menu satisfying counting constraints",
    long_about = "Loads a recipe catalog and a menu configuration, then picks the configured \
                  number of recipes so that every declared constraint holds"
)]
struct Cli {
    /// Recipe catalog (JSON)
    #[arg(long, value_name = "FILE")]
    catalog: PathBuf,

    /// Menu configuration (TOML, or YAML with a .yaml/.yml extension)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of recipes to pick, overriding the configuration
    #[arg(long)]
    choices: Option<usize>,

    /// Random seed for a reproducible menu
    #[arg(long)]
    seed: Option<u64>,

    /// Stop searching after this many seconds
    #[arg(long, value_name = "SECS")]
    time_limit: Option<u64>,

    /// Print the menu as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if !cli.json {
        menuforge::console::init();
    }

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "error:".bright_red().bold());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let config = apply_overrides(load_config(cli.config.as_deref())?, cli);
    let source = InMemorySource::from_json_file(&cli.catalog)?;
    let mut menu = Menu::new(config, source);

    let selection = match cli.time_limit {
        Some(secs) => menu.select_with_deadline(Duration::from_secs(secs)).await?,
        None => menu.select()?,
    };

    if cli.json {
        println!("{}", render_json(&selection)?);
    } else {
        print!("{}", render_text(&selection));
    }
    Ok(())
}

/// Loads an explicit configuration, or `menu.toml` falling back to defaults.
fn load_config(path: Option<&Path>) -> Result<MenuConfig, ConfigError> {
    let Some(path) = path else {
        return load_default(Path::new(DEFAULT_CONFIG));
    };

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml" | "yml") => MenuConfig::from_yaml_file(path),
        _ => MenuConfig::from_toml_file(path),
    }
}

/// Defaults apply only when the file does not exist; a file that exists
/// but fails to read or parse is an error.
fn load_default(path: &Path) -> Result<MenuConfig, ConfigError> {
    match MenuConfig::load(path) {
        Err(ConfigError::Io(e)) if e.kind() == ErrorKind::NotFound => Ok(MenuConfig::default()),
        result => result,
    }
}

fn apply_overrides(mut config: MenuConfig, cli: &Cli) -> MenuConfig {
    if let Some(choices) = cli.choices {
        config = config.with_choices(choices);
    }
    if let Some(seed) = cli.seed {
        config = config.with_random_seed(seed);
    }
    config
}

fn render_text(selection: &Selection) -> String {
    let mut out = String::new();
    for (i, recipe) in selection.iter().enumerate() {
        let rating = recipe
            .rating
            .map(|r| format!(" ({r}/5)"))
            .unwrap_or_default();
        out.push_str(&format!("{:>3}. {} [#{}]{}\n", i + 1, recipe.name, recipe.id, rating));
    }
    out
}

fn render_json(selection: &Selection) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&serde_json::json!({
        "status": selection.status.to_string(),
        "recipes": selection.recipes,
    }))
}
