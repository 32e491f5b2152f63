//! Command-line host for the portfolio theme controller.
//!
//! Mounts one [`ThemeController`] per invocation against a JSON file store
//! and the desktop color-scheme setting, runs a single command, and returns
//! its output. [`run_with`] takes the system preference source explicitly so
//! hosts and tests can substitute their own.

mod config;
mod swatch;

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use portfolio_theme::{
    render_stylesheet, DocumentRoot, FileStore, OsPreference, PreferenceStore, ResolvedFrom,
    SystemPreference, ThemeController, ThemeHandle, ThemeMode, ThemeTokens,
};
use serde::Serialize;

pub use config::{ConfigFile, Settings, DEFAULT_STORE_FILE};
pub use swatch::{first_hex_color, parse_hex, rgb_to_ansi256, swatch};

#[derive(Debug, Parser)]
#[command(
    name = "portfolio-theme",
    version,
    about = "Inspect and change the persisted portfolio theme"
)]
pub struct Cli {
    /// JSON file holding the stored preference
    #[arg(long, global = true, env = "PORTFOLIO_THEME_STORE", value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Mode to use when nothing is stored (outranks the system preference)
    #[arg(long = "default", global = true, value_name = "MODE", value_parser = parse_mode)]
    pub default_mode: Option<ThemeMode>,

    /// YAML config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Print the active mode
    Get,
    /// Store an explicit choice
    Set {
        #[arg(value_parser = parse_mode)]
        mode: ThemeMode,
    },
    /// Flip the active mode and store it
    Toggle,
    /// Print the active mode and its tokens
    Show,
    /// Print the token stylesheet
    Css {
        /// Mode for the unmarked `:root` block (defaults to the active mode)
        #[arg(long, value_parser = parse_mode)]
        mode: Option<ThemeMode>,
    },
    /// Validate both token sets
    Check,
}

fn parse_mode(value: &str) -> Result<ThemeMode, String> {
    value.parse().map_err(|e: portfolio_theme::ThemeError| e.to_string())
}

fn source_name(source: ResolvedFrom) -> &'static str {
    match source {
        ResolvedFrom::Stored => "stored",
        ResolvedFrom::Default => "default",
        ResolvedFrom::System => "system",
        ResolvedFrom::Fallback => "fallback",
    }
}

#[derive(Serialize)]
struct ModeReport {
    mode: ThemeMode,
    source: &'static str,
    explicit: bool,
}

#[derive(Serialize)]
struct ShowReport<'a> {
    mode: ThemeMode,
    source: &'static str,
    explicit: bool,
    tokens: &'a ThemeTokens,
    variables: BTreeMap<String, String>,
}

/// Runs `cli` against the desktop color-scheme setting.
pub fn run(cli: &Cli) -> anyhow::Result<String> {
    run_with(cli, OsPreference::new())
}

/// Runs `cli` with an explicit system preference source.
pub fn run_with(cli: &Cli, system: impl SystemPreference + 'static) -> anyhow::Result<String> {
    let settings = Settings::from_cli(cli)?;
    let store = FileStore::new(&settings.store_path);
    let key = settings.options.storage_key.clone();
    let root = DocumentRoot::new();
    let controller = ThemeController::builder()
        .store(store.clone())
        .system(system)
        .sink(root.clone())
        .options(settings.options)
        .mount();
    let theme = controller.handle();
    let source = source_name(controller.resolved_from());

    let output = match &cli.command {
        Command::Get => mode_report(&theme, source, cli.format)?,
        Command::Set { mode } => {
            theme.set(*mode);
            ensure_persisted(&store, &key, theme.mode())?;
            mode_report(&theme, source, cli.format)?
        }
        Command::Toggle => {
            theme.toggle();
            ensure_persisted(&store, &key, theme.mode())?;
            mode_report(&theme, source, cli.format)?
        }
        Command::Show => {
            let report = ShowReport {
                mode: theme.mode(),
                source,
                explicit: theme.has_explicit_choice(),
                tokens: theme.tokens(),
                variables: root.variables().into_iter().collect(),
            };
            match cli.format {
                Format::Text => show_text(&report),
                Format::Json => serde_json::to_string_pretty(&report)?,
            }
        }
        Command::Css { mode } => render_stylesheet(mode.unwrap_or(theme.mode()))
            .context("failed to render stylesheet")?,
        Command::Check => check(cli.format)?,
    };

    controller.unmount();
    Ok(output)
}

/// Fails when a `set` or `toggle` did not reach the store file.
fn ensure_persisted(store: &FileStore, key: &str, mode: ThemeMode) -> anyhow::Result<()> {
    let stored = store
        .get(key)
        .with_context(|| format!("could not persist theme to {}", store.path().display()))?;
    if stored.as_deref() != Some(mode.as_str()) {
        anyhow::bail!(
            "could not persist theme to {}: stored value is {:?}",
            store.path().display(),
            stored
        );
    }
    Ok(())
}

fn mode_report(theme: &ThemeHandle, source: &'static str, format: Format) -> anyhow::Result<String> {
    let report = ModeReport {
        mode: theme.mode(),
        source,
        explicit: theme.has_explicit_choice(),
    };
    Ok(match format {
        Format::Text => report.mode.to_string(),
        Format::Json => serde_json::to_string_pretty(&report)?,
    })
}

fn show_text(report: &ShowReport<'_>) -> String {
    let width = report
        .variables
        .iter()
        .map(|(name, _)| name.len())
        .max()
        .unwrap_or(0);

    let mut out = format!("mode: {} ({})\n", report.mode, report.source);
    for (name, value) in &report.variables {
        out.push_str(&format!(
            "  {} {:<width$}  {}\n",
            swatch(value),
            name,
            value,
            width = width
        ));
    }
    out.pop();
    out
}

fn check(format: Format) -> anyhow::Result<String> {
    let mut results = Vec::new();
    for mode in ThemeMode::ALL {
        ThemeTokens::for_mode(mode)
            .validate()
            .with_context(|| format!("{} tokens are invalid", mode))?;
        results.push(mode);
    }
    Ok(match format {
        Format::Text => results
            .iter()
            .map(|mode| format!("{} tokens: ok", mode))
            .collect::<Vec<_>>()
            .join("\n"),
        Format::Json => serde_json::to_string_pretty(&serde_json::json!({ "valid": results }))?,
    })
}
