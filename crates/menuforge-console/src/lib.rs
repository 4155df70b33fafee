//! Colorful console output for menu selection.
//!
//! Provides a custom `tracing` layer that formats picker events with colors.
//!
//! ## Log Levels
//!
//! - **INFO**: Solve start and end, the finished menu
//! - **WARN**: Feasibility warnings, reached deadlines and terminated searches
//! - **DEBUG**: Pool loading, each registered constraint and search summaries


use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();
static SOLVE_START_NANOS: AtomicU64 = AtomicU64::new(0);

/// Package version for banner display.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initializes console output.
///
/// Safe to call multiple times - only the first call has effect.
/// Prints the MenuForge banner and sets up tracing. The level defaults to
/// INFO and can be changed with `RUST_LOG`.
pub fn init() {
    INIT.get_or_init(|| {
        print_banner();

        let filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::INFO.into())
            .from_env_lossy();

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(MenuConsoleLayer)
            .try_init();
    });
}

// Marks the start of solving for elapsed time tracking.
fn mark_solve_start() {
    let epoch = EPOCH.get_or_init(Instant::now);
    let nanos = epoch.elapsed().as_nanos() as u64;
    SOLVE_START_NANOS.store(nanos, Ordering::Relaxed);
}

// Returns elapsed time since solve start.
fn elapsed_secs() -> f64 {
    let Some(epoch) = EPOCH.get() else {
        return 0.0;
    };
    let start_nanos = SOLVE_START_NANOS.load(Ordering::Relaxed);
    let now_nanos = epoch.elapsed().as_nanos() as u64;
    now_nanos.saturating_sub(start_nanos) as f64 / 1_000_000_000.0
}

fn print_banner() {
    let banner = r#"
 __  __                  _____
|  \/  | ___ _ __  _   _|  ___|__  _ __ __ _  ___
| |\/| |/ _ \ '_ \| | | | |_ / _ \| '__/ _` |/ _ \
| |  | |  __/ | | | |_| |  _| (_) | | | (_| |  __/
|_|  |_|\___|_| |_|\__,_|_|  \___/|_|  \__, |\___|
                                       |___/
"#;

    let version_line = format!("                 v{} - Constrained Recipe Picker\n", VERSION);

    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", banner.bright_cyan());
    let _ = writeln!(stdout, "{}", version_line.bright_white().bold());
    let _ = stdout.flush();
}

/// A tracing layer that formats picker events with colors.
pub struct MenuConsoleLayer;

impl<S: Subscriber> Layer<S> for MenuConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with("menuforge") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor, *metadata.level());
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    message: Option<String>,
    constraint: Option<String>,
    status: Option<String>,
    recipe_count: Option<u64>,
    choices: Option<u64>,
    constraint_count: Option<u64>,
    matched: Option<u64>,
    count: Option<u64>,
    duplicates: Option<u64>,
    selected: Option<u64>,
    nodes_explored: Option<u64>,
    infeasible_pruned: Option<u64>,
    bound_pruned: Option<u64>,
    incumbents_found: Option<u64>,
    duration_ms: Option<u64>,
    feasible: Option<bool>,
    terminated: Option<bool>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        self.record_str(field, s.trim_matches('"'));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "recipe_count" => self.recipe_count = Some(value),
            "choices" => self.choices = Some(value),
            "constraint_count" => self.constraint_count = Some(value),
            "matched" => self.matched = Some(value),
            "count" => self.count = Some(value),
            "duplicates" => self.duplicates = Some(value),
            "selected" => self.selected = Some(value),
            "nodes_explored" => self.nodes_explored = Some(value),
            "infeasible_pruned" => self.infeasible_pruned = Some(value),
            "bound_pruned" => self.bound_pruned = Some(value),
            "incumbents_found" => self.incumbents_found = Some(value),
            "duration_ms" => self.duration_ms = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        match field.name() {
            "feasible" => self.feasible = Some(value),
            "terminated" => self.terminated = Some(value),
            _ => {}
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "event" => self.event = Some(value.to_string()),
            "message" => self.message = Some(value.to_string()),
            "constraint" => self.constraint = Some(value.to_string()),
            "status" => self.status = Some(value.to_string()),
            _ => {}
        }
    }
}

fn format_event(v: &EventVisitor, level: Level) -> String {
    let event = v.event.as_deref().unwrap_or("");

    match event {
        "solve_start" => format_solve_start(v),
        "solve_end" => format_solve_end(v),
        "constraint_added" => format_constraint_added(v),
        "feasibility_warning" => format_feasibility_warning(v),
        "search_end" => format_search_end(v, level),
        "pool_loaded" => format_pool_loaded(v),
        "menu_selected" => format_menu_selected(v),
        "deadline_reached" => format_deadline_reached(v),
        _ => String::new(),
    }
}

fn format_elapsed() -> String {
    format!("{:>7.3}s", elapsed_secs())
        .bright_black()
        .to_string()
}

fn format_solve_start(v: &EventVisitor) -> String {
    mark_solve_start();
    let recipes = v.recipe_count.unwrap_or(0);
    let choices = v.choices.unwrap_or(0);
    let constraints = v.constraint_count.unwrap_or(0);

    let mut output = format!(
        "{} {} Picking {} of {} recipes │ scale {}",
        format_elapsed(),
        "▶".bright_green().bold(),
        choices.to_formatted_string(&Locale::en).bright_yellow(),
        recipes.to_formatted_string(&Locale::en).bright_yellow(),
        selection_scale(recipes, choices).bright_magenta()
    );

    if constraints > 0 {
        output.push_str(&format!(
            " │ {} constraints",
            constraints.to_formatted_string(&Locale::en).bright_yellow()
        ));
    }

    output
}

fn format_pool_loaded(v: &EventVisitor) -> String {
    let recipes = v.recipe_count.unwrap_or(0);
    let duplicates = v.duplicates.unwrap_or(0);

    let mut output = format!(
        "{} {} Loaded {} recipes",
        format_elapsed(),
        "◇".bright_blue(),
        recipes.to_formatted_string(&Locale::en).white()
    );
    if duplicates > 0 {
        output.push_str(&format!(
            " │ {} duplicates dropped",
            duplicates.to_formatted_string(&Locale::en).bright_yellow()
        ));
    }
    output
}

fn format_menu_selected(v: &EventVisitor) -> String {
    format!(
        "{} {} Menu ready │ {} of {} recipes",
        format_elapsed(),
        "✔".bright_green().bold(),
        v.selected
            .unwrap_or(0)
            .to_formatted_string(&Locale::en)
            .bright_yellow(),
        v.choices.unwrap_or(0).to_formatted_string(&Locale::en).white()
    )
}

fn format_deadline_reached(v: &EventVisitor) -> String {
    format!(
        "{} {} Deadline of {} reached │ stopping search",
        format_elapsed(),
        "⏱".bright_yellow().bold(),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow()
    )
}

fn format_constraint_added(v: &EventVisitor) -> String {
    let constraint = v.constraint.as_deref().unwrap_or("constraint");
    let matched = v.matched.unwrap_or(0);

    format!(
        "{} {} {} │ {} matching",
        format_elapsed(),
        "+".bright_blue(),
        constraint.white().bold(),
        matched.to_formatted_string(&Locale::en).white()
    )
}

fn format_feasibility_warning(v: &EventVisitor) -> String {
    let constraint = v.constraint.as_deref().unwrap_or("constraint");
    let matched = v.matched.unwrap_or(0);
    let count = v.count.unwrap_or(0);

    format!(
        "{} {} {} may be infeasible │ only {} matching, {} required",
        format_elapsed(),
        "⚠".bright_yellow().bold(),
        constraint.white().bold(),
        matched.to_formatted_string(&Locale::en).bright_red(),
        count.to_formatted_string(&Locale::en).bright_yellow()
    )
}

fn format_search_end(v: &EventVisitor, level: Level) -> String {
    if level != Level::DEBUG && level != Level::TRACE {
        return String::new();
    }

    let nodes = v.nodes_explored.unwrap_or(0);
    let pruned = v.infeasible_pruned.unwrap_or(0) + v.bound_pruned.unwrap_or(0);
    let incumbents = v.incumbents_found.unwrap_or(0);
    let duration = v.duration_ms.unwrap_or(0);

    format!(
        "{} {} Search ended │ {} │ {} nodes │ {} pruned │ {} incumbents",
        format_elapsed(),
        "◀".bright_blue(),
        format_duration_ms(duration).yellow(),
        nodes.to_formatted_string(&Locale::en).white(),
        pruned.to_formatted_string(&Locale::en).white(),
        incumbents.to_formatted_string(&Locale::en).white()
    )
}

fn format_solve_end(v: &EventVisitor) -> String {
    let duration = format_duration_ms(v.duration_ms.unwrap_or(0));
    let nodes = v
        .nodes_explored
        .unwrap_or(0)
        .to_formatted_string(&Locale::en);

    if v.feasible != Some(true) {
        let headline = if v.terminated == Some(true) {
            "Search terminated before a selection was found"
        } else {
            v.message
                .as_deref()
                .unwrap_or("No solution found, adjustment of criteria required.")
        };
        return format!(
            "{} {} {} │ {} │ {} nodes",
            format_elapsed(),
            "■".bright_red().bold(),
            headline.bright_red().bold(),
            duration.yellow(),
            nodes.white()
        );
    }

    let selected = v.selected.unwrap_or(0);
    let status = v.status.as_deref().unwrap_or("optimal");
    let status = if status == "optimal" {
        status.to_uppercase().bright_green().bold().to_string()
    } else {
        status.to_uppercase().bright_yellow().bold().to_string()
    };

    format!(
        "{} {} Selection complete │ {} recipes │ {} │ {} │ {} nodes",
        format_elapsed(),
        "■".bright_cyan().bold(),
        selected.to_formatted_string(&Locale::en).bright_yellow(),
        status,
        duration.yellow(),
        nodes.white()
    )
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}

/// Number of ways to pick `choices` of `recipes`, in scientific notation.
fn selection_scale(recipes: u64, choices: u64) -> String {
    if choices > recipes {
        return "0".to_string();
    }

    let k = choices.min(recipes - choices);
    let log_scale: f64 = (0..k)
        .map(|i| ((recipes - i) as f64).log10() - ((i + 1) as f64).log10())
        .sum();
    let exponent = log_scale.floor() as i32;
    let mantissa = 10f64.powf(log_scale - exponent as f64);

    format!("{:.3} x 10^{}", mantissa, exponent)
}
