use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use taxonomy_categorizer::config::Config;
use taxonomy_categorizer::engine::EngineKind;
use taxonomy_categorizer::logging;
use taxonomy_categorizer::output;
use taxonomy_categorizer::runner::{self, RunOptions};

#[derive(Parser, Debug)]
#[command(name = "taxonomy-categorizer")]
#[command(about = "Add missing category fields to industry records in the industry taxonomy")]
#[command(version = "0.1.0")]
struct Cli {
    /// Taxonomy file to rewrite (defaults to the configured target)
    path: Option<PathBuf>,

    /// Config file (defaults to categorizer.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Categorization engine
    #[arg(long, value_enum)]
    engine: Option<EngineKind>,

    /// Report what would change without writing
    #[arg(long)]
    dry_run: bool,

    /// Like --dry-run, but exit with status 1 when changes are pending
    #[arg(long)]
    check: bool,

    /// Fail without writing on missing categories, conflicts or warnings
    #[arg(long)]
    strict: bool,

    /// Keep a copy of the original as <path>.bak
    #[arg(long)]
    backup: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let guard = logging::init_logging(config.log.dir.as_deref())
        .context("Failed to initialize logging")?;

    let options = RunOptions {
        path: cli.path.unwrap_or_else(|| config.target()),
        engine: cli.engine.unwrap_or_else(|| config.engine()),
        indent: config.indent().to_string(),
        map: config.category_map()?,
        dry_run: cli.dry_run || cli.check,
        strict: cli.strict,
        backup: cli.backup || config.backup,
    };

    let report = runner::run(&options)
        .with_context(|| format!("Failed to categorize {}", options.path.display()))?;

    let rendered = output::render(&report, cli.json, cli.check)?;
    print!("{}", rendered.stdout);
    if let Some(message) = rendered.stderr {
        eprintln!("{}", message);
    }
    if rendered.exit_code != 0 {
        drop(guard);
        std::process::exit(rendered.exit_code);
    }
    Ok(())
}
