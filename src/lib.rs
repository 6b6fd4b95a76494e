pub mod config;
pub mod model;
pub mod pager;
pub mod search;

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::builder::RangedU64ValueParser;
use clap::{CommandFactory, Parser, Subcommand};
use colored::Colorize;
use itertools::Itertools;
use tracing::{info, warn};

use config::PagerConfig;
use model::Record;
use pager::{NoopObserver, PageControl, Paginator, page_controls};

/// Command-line interface.
#[derive(Parser, Debug)]
#[command(
    name = "pager",
    version,
    about = "Browse, search and page through JSON record lists"
)]
pub struct Cli {
    /// Path to a TOML config file (defaults to the platform config dir)
    #[arg(long, env = "PAGER_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true, default_value_t = false)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load a JSON record list and print one page of it
    Browse {
        /// JSON file: an array of objects or a `{"data": [...]}` envelope
        file: PathBuf,

        /// Comma-separated fields to search (defaults to config `search_fields`)
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,

        /// Search text; every word must appear in the searched fields
        #[arg(long, short)]
        query: Option<String>,

        /// Page to show (1-based); out-of-range values keep page 1
        #[arg(long, short, allow_hyphen_values = true)]
        page: Option<String>,

        /// Rows per page; non-positive or non-numeric values mean the default
        #[arg(long, allow_hyphen_values = true)]
        page_size: Option<String>,

        /// Print a single JSON object instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the page-control strip for a page position
    Controls {
        /// Current page (1-based); values past `--total` show the last page
        #[arg(long, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
        current: usize,

        /// Number of pages
        #[arg(long)]
        total: usize,
    },
    /// Generate shell completions to stdout
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color || !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    match cli.command {
        Commands::Browse {
            file,
            fields,
            query,
            page,
            page_size,
            json,
        } => {
            let config = PagerConfig::resolve(cli.config.as_deref())
                .context("loading pager configuration")?;
            let opts = BrowseOptions {
                fields,
                query,
                page,
                page_size,
                json,
            };
            run_browse(&config, &file, opts)
        }
        Commands::Controls { current, total } => {
            println!("{}", render_controls_colored(&page_controls(current, total)));
            Ok(())
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "pager", &mut std::io::stdout());
            Ok(())
        }
    }
}

struct BrowseOptions {
    fields: Vec<String>,
    query: Option<String>,
    page: Option<String>,
    page_size: Option<String>,
    json: bool,
}

fn run_browse(config: &PagerConfig, file: &Path, opts: BrowseOptions) -> Result<()> {
    let records = model::load_records(file)
        .with_context(|| format!("loading records from {}", file.display()))?;
    info!(path = %file.display(), records = records.len(), "browse");

    let fields = if opts.fields.is_empty() {
        config.search_fields.clone()
    } else {
        opts.fields
    };

    let mut pager: Paginator<Record, NoopObserver> = Paginator::new(config, NoopObserver);
    if let Some(size) = &opts.page_size {
        pager.set_page_size_input(size);
    }
    pager.replace_dataset(records);
    if let Some(query) = &opts.query {
        pager.search(query, &fields);
    }
    if let Some(page) = &opts.page
        && !pager.goto_page_input(page)
    {
        warn!(page = %page, total_pages = pager.total_pages(), "page out of range; showing page 1");
    }

    if opts.json {
        let out = serde_json::json!({
            "query": pager.last_query(),
            "items": pager.current_page_items(),
            "summary": pager.summary(),
            "controls": pager.render_page_controls(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    for item in pager.current_page_items() {
        println!("{}", serde_json::to_string(item)?);
    }
    match pager.summary() {
        Some(summary) => println!("{summary}"),
        None => println!("No matching records ({} total)", pager.dataset_len()),
    }
    let controls = pager.render_page_controls();
    if !controls.is_empty() {
        println!("{}", render_controls_colored(&controls));
    }
    Ok(())
}

/// Control strip for terminals: active page highlighted, disabled arrows dimmed.
pub fn render_controls_colored(controls: &[PageControl]) -> String {
    controls
        .iter()
        .map(|control| {
            let text = control.to_string();
            match control {
                PageControl::Page { active: true, .. } => text.bold().green().to_string(),
                PageControl::Previous { disabled: true }
                | PageControl::Next { disabled: true }
                | PageControl::Ellipsis => text.dimmed().to_string(),
                _ => text,
            }
        })
        .join(" ")
}
