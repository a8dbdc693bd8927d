use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyre::Result;
use flowchef_cli::commands::{self, App};
use flowchef_cli::config;
use flowchef_core::models::Recipe;

/// flowchef - recipe flowcharts, saved locally
#[derive(Parser, Debug)]
#[command(name = "flowchef")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Directory holding saved recipes and preferences (overrides config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log level when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List saved recipes, newest first
    List,

    /// Print one recipe as JSON
    Show { slug: String },

    /// Save a recipe from a JSON file
    Save { file: PathBuf },

    /// Apply a JSON patch file to a saved recipe
    Update { slug: String, patch: PathBuf },

    /// Delete a saved recipe
    Delete { slug: String },

    /// Export one recipe as a standalone HTML page
    Export {
        slug: String,
        /// Output directory (defaults to the configured export dir)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Export every saved recipe into a zip archive
    ExportAll {
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Import exported HTML pages or zip archives
    Import {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Show what would change without saving anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Show or change preferences
    Prefs {
        #[command(subcommand)]
        action: Option<PrefsAction>,
    },

    /// Show or change the config file
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Set data-dir or export-dir; an empty export-dir clears it
    Set { key: String, value: String },
}

#[derive(Subcommand, Debug)]
enum PrefsAction {
    /// Set a preference; an empty value clears it
    Set { name: String, value: String },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = config::load_or_default()?;
    let data_dir = cli.data_dir.clone().unwrap_or_else(|| config.data_dir.clone());
    tracing::debug!(data_dir = %data_dir.display(), "opening recipe store");
    let mut app = App::open(data_dir);

    match cli.command {
        Commands::List => {
            for recipe in commands::list(&app) {
                println!(
                    "{}\t{}\t{}",
                    recipe.resolved_slug(),
                    recipe.saved_at.as_deref().unwrap_or("-"),
                    recipe.title
                );
            }
        }
        Commands::Show { slug } => {
            let recipe = commands::show(&app, &slug)?;
            println!("{}", serde_json::to_string_pretty(&recipe)?);
        }
        Commands::Save { file } => {
            let recipe = commands::save(&mut app, &file)?;
            println!("saved {}", recipe.resolved_slug());
        }
        Commands::Update { slug, patch } => {
            let recipe = commands::update(&mut app, &slug, &patch)?;
            println!("updated {} at {}", slug, recipe.saved_at.as_deref().unwrap_or("-"));
        }
        Commands::Delete { slug } => {
            commands::delete(&mut app, &slug)?;
            println!("deleted {slug}");
        }
        Commands::Export { slug, out } => {
            let out = out.unwrap_or_else(|| config.export_dir());
            let path = commands::export(&app, &slug, &out)?;
            println!("{}", path.display());
        }
        Commands::ExportAll { out } => {
            let out = out.unwrap_or_else(|| config.export_dir());
            let (path, names) = commands::export_all(&app, &out)?;
            println!("{} ({} recipes)", path.display(), names.len());
        }
        Commands::Import { files, dry_run } => {
            let report = commands::import(&mut app, &files, dry_run)?;
            for (label, recipes) in report.buckets(dry_run) {
                print_bucket(label, recipes);
            }
            for bad in &report.unreadable {
                eprintln!("unreadable: {} ({})", bad.source, bad.reason);
            }
        }
        Commands::Prefs { action: None } => {
            for (pref, value) in commands::prefs(&app)? {
                println!("{pref}\t{}", value.as_deref().unwrap_or("-"));
            }
        }
        Commands::Prefs {
            action: Some(PrefsAction::Set { name, value }),
        } => {
            commands::set_pref(&mut app, &name, &value)?;
        }
        Commands::Config { action: None } => {
            println!("path\t{}", config::config_path()?.display());
            println!("version\t{}", config.config_version);
            println!("created\t{}", config.created_at);
            println!("data-dir\t{}", config.data_dir.display());
            println!("export-dir\t{}", config.export_dir().display());
        }
        Commands::Config {
            action: Some(ConfigAction::Set { key, value }),
        } => {
            let mut updated = config;
            updated.set(&key, &value)?;
            config::save_config(&updated)?;
        }
    }

    Ok(())
}

fn print_bucket(label: &str, recipes: &[Recipe]) {
    println!("{label}: {}", recipes.len());
    for recipe in recipes {
        println!("  {}\t{}", recipe.resolved_slug(), recipe.title);
    }
}
