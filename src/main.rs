//! opsdeck: derive a dashboard page view from a JSON record file.
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use opsdeck_lib::error::{ViewError, ViewErrorPayload};
use opsdeck_lib::prefs::{PreferenceStore, ViewPreferences};
use opsdeck_lib::presets::{self, PagePreset, ViewControls};
use opsdeck_lib::sort::SortSpec;

#[derive(Debug, Parser)]
#[command(
    name = "opsdeck",
    disable_help_subcommand = true,
    about = "Filter, sort and summarize dashboard records with a page preset"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the embedded page presets
    List,
    /// Print the JSON Schema for custom preset files
    Schema,
    /// Derive the page view for a record file
    View(ViewArgs),
}

#[derive(Debug, Args)]
struct ViewArgs {
    /// Embedded preset id, or a path to a custom preset `.json`
    preset: String,
    /// JSON array of records
    records: PathBuf,
    #[arg(long, default_value = "", help = "Search box text")]
    search: String,
    #[arg(
        long = "facet",
        value_name = "KEY=VALUE",
        value_parser = parse_facet,
        help = "Dropdown selection, repeat as needed (`all` clears it)"
    )]
    facets: Vec<(String, String)>,
    #[arg(long = "tag", value_name = "TAG", help = "Selected tag, repeat as needed")]
    tags: Vec<String>,
    #[arg(long, help = "Active tab (`all`, `issues`, or a bucket value)")]
    tab: Option<String>,
    #[arg(long, value_name = "KEY[:asc|desc]", help = "Override the page's sort")]
    sort: Option<SortSpec>,
    #[arg(long, requires = "sort", help = "Remember --sort as the page default")]
    save_sort: bool,
}

impl ViewArgs {
    fn controls(&self) -> ViewControls {
        ViewControls {
            search: self.search.clone(),
            facets: self.facets.iter().cloned().collect(),
            tags: self.tags.clone(),
            tab: self.tab.clone(),
            sort: self.sort.clone(),
        }
    }
}

fn parse_facet(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("Expected KEY=VALUE, got '{}'", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("Facet key is empty in '{}'", raw));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

fn resolve_preset(name: &str) -> Result<PagePreset, ViewError> {
    let path = Path::new(name);
    if name.ends_with(".json") && path.exists() {
        presets::load_custom_preset(path)
    } else {
        presets::load_preset(name)
    }
}

/// Saved preferences for `page`. A missing home directory or an unreadable
/// file means defaults.
fn load_preferences(store: Option<&PreferenceStore>, page: &str) -> ViewPreferences {
    let Some(store) = store else {
        return ViewPreferences::default();
    };
    store.load(page).unwrap_or_else(|e| {
        log::warn!("Ignoring unreadable preferences: {}", e);
        ViewPreferences::default()
    })
}

fn run_view(args: &ViewArgs) -> Result<serde_json::Value, ViewError> {
    let base = resolve_preset(&args.preset)?;

    let store = match PreferenceStore::open_default() {
        Ok(store) => Some(store),
        Err(e) => {
            log::warn!("Preferences unavailable, using preset defaults: {}", e);
            None
        }
    };
    let mut prefs = load_preferences(store.as_ref(), &base.id);
    if args.save_sort {
        if let Some(sort) = args.sort.clone() {
            let store = store.as_ref().ok_or_else(|| {
                ViewError::Preferences("No home directory to save preferences in".into())
            })?;
            prefs.default_sort = Some(sort);
            store.save(&base.id, &prefs)?;
            log::info!("Saved default sort for '{}'", base.id);
        }
    }
    let preset = prefs.apply(&base);

    let content = std::fs::read_to_string(&args.records)?;
    let raw: serde_json::Value = serde_json::from_str(&content)?;

    let config = preset.build_config(&args.controls());
    let view = preset.pipeline().run_json(&raw, &config)?;

    Ok(serde_json::json!({
        "page": preset.id,
        "sort": config.sort,
        "visible": view.visible,
        "summary": view.summary,
        "formatted": view.summary.formatted(&config.metrics),
        "buckets": view.buckets,
    }))
}

fn run(cli: Cli) -> Result<(), ViewError> {
    match cli.command {
        Command::List => {
            for preset in presets::get_available_presets() {
                println!("{:<16} {:<20} {}", preset.id, preset.name, preset.description);
            }
        }
        Command::Schema => {
            println!("{}", serde_json::to_string_pretty(&presets::preset_schema()?)?);
        }
        Command::View(args) => {
            println!("{}", serde_json::to_string_pretty(&run_view(&args)?)?);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let payload = ViewErrorPayload::from(&err);
            match serde_json::to_string_pretty(&payload) {
                Ok(text) => eprintln!("{}", text),
                Err(_) => eprintln!("{}", err),
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opsdeck_lib::sort::SortDirection;

    fn view_args(argv: &[&str]) -> Result<ViewArgs, clap::Error> {
        let cli = Cli::try_parse_from(std::iter::once("opsdeck").chain(argv.iter().copied()))?;
        match cli.command {
            Command::View(args) => Ok(args),
            other => panic!("expected the view command, got {:?}", other),
        }
    }

    #[test]
    fn parses_view_controls() {
        let args = view_args(&[
            "view",
            "sales-channels",
            "channels.json",
            "--search",
            "shop",
            "--facet",
            "status=active",
            "--tag",
            "retail",
            "--tag",
            "b2c",
            "--tab",
            "issues",
            "--sort",
            "revenue:desc",
        ])
        .unwrap();
        assert_eq!(args.preset, "sales-channels");
        assert_eq!(args.records, PathBuf::from("channels.json"));

        let controls = args.controls();
        assert_eq!(controls.search, "shop");
        assert_eq!(controls.facets["status"], "active");
        assert_eq!(controls.tags, vec!["retail", "b2c"]);
        assert_eq!(controls.tab.as_deref(), Some("issues"));
        assert_eq!(controls.sort, Some(SortSpec::new("revenue", SortDirection::Desc)));
        assert!(!args.save_sort);
    }

    #[test]
    fn list_and_schema_are_subcommands() {
        let cli = Cli::try_parse_from(["opsdeck", "list"]).unwrap();
        assert!(matches!(cli.command, Command::List));
        let cli = Cli::try_parse_from(["opsdeck", "schema"]).unwrap();
        assert!(matches!(cli.command, Command::Schema));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(view_args(&["view", "only-one"]).is_err());
        assert!(view_args(&["view", "a", "b", "--facet", "novalue"]).is_err());
        assert!(view_args(&["view", "a", "b", "--facet", "=x"]).is_err());
        assert!(view_args(&["view", "a", "b", "--search"]).is_err());
        assert!(view_args(&["view", "a", "b", "--bogus"]).is_err());
        assert!(view_args(&["view", "a", "b", "--sort", "name:sideways"]).is_err());
        assert!(view_args(&["view", "a", "b", "--save-sort"]).is_err());
    }

    #[test]
    fn missing_store_means_default_preferences() {
        assert_eq!(load_preferences(None, "sales-channels"), ViewPreferences::default());
    }

    #[test]
    fn unreadable_store_means_default_preferences() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("preferences.json");
        std::fs::write(&path, "{ broken").unwrap();
        let store = PreferenceStore::at(&path);
        assert_eq!(
            load_preferences(Some(&store), "sales-channels"),
            ViewPreferences::default()
        );
    }
}
