mod error;
mod export;
mod models;
mod pipeline;
mod scrapers;
mod selector;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use models::AdSequence;
use scrapers::types::{DEFAULT_API_URL, DEFAULT_SITE_URL, DEFAULT_TIMEOUT_SECS};
use scrapers::{BlocketClient, ClientConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Long flags that may also be spelled with a single dash (`-brand Volvo`)
const LONG_FLAGS: &[&str] = &[
    "brand",
    "model",
    "list",
    "outdir",
    "output",
    "verbose",
    "timeout-secs",
];

#[derive(Parser, Debug)]
#[command(
    name = "blocket-scout",
    about = "Retrieves car ads from www.blocket.se and writes them to stdout or a CSV file",
    version
)]
struct Cli {
    /// Brand of the car to scrape. Combine with --model and/or --list.
    /// Case sensitive, whitespace must be escaped.
    #[arg(long)]
    brand: Option<String>,

    /// Model of the brand to scrape. Combine with --brand.
    /// Case sensitive, whitespace must be escaped.
    #[arg(long)]
    model: Option<String>,

    /// List available brands, or the models of --brand
    #[arg(long)]
    list: bool,

    /// Output directory for CSV files (default: current directory)
    #[arg(long)]
    outdir: Option<PathBuf>,

    /// Print ads as JSON on stdout instead of writing CSV
    #[arg(long)]
    output: bool,

    /// Enable debug logging
    #[arg(long, short)]
    verbose: bool,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    #[arg(long, env = "BLOCKET_SITE_URL", default_value = DEFAULT_SITE_URL, hide = true)]
    site_url: String,

    #[arg(long, env = "BLOCKET_API_URL", default_value = DEFAULT_API_URL, hide = true)]
    api_url: String,
}

#[derive(Debug, PartialEq)]
enum Mode {
    ListBrands,
    ListModels { brand: String },
    Console { brand: String, model: String },
    Export { brand: String, model: String, outdir: Option<PathBuf> },
}

impl Cli {
    /// What to do, or `None` when the flag combination is incomplete
    fn mode(&self) -> Option<Mode> {
        let brand = self.brand.clone().filter(|b| !b.is_empty());
        let model = self.model.clone().filter(|m| !m.is_empty());

        if self.list {
            return Some(match brand {
                Some(brand) => Mode::ListModels { brand },
                None => Mode::ListBrands,
            });
        }

        let (brand, model) = (brand?, model?);
        if self.output && self.outdir.is_none() {
            Some(Mode::Console { brand, model })
        } else {
            Some(Mode::Export {
                brand,
                model,
                outdir: self.outdir.clone(),
            })
        }
    }

    fn client_config(&self) -> ClientConfig {
        ClientConfig {
            site_url: self.site_url.clone(),
            api_url: self.api_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

/// Rewrite `-brand` style flags to `--brand`
fn normalize_args<I: IntoIterator<Item = String>>(args: I) -> Vec<String> {
    args.into_iter()
        .enumerate()
        .map(|(i, arg)| {
            if i == 0 || arg.starts_with("--") || !arg.starts_with('-') {
                return arg;
            }
            let name = arg[1..].split('=').next().unwrap_or_default();
            if LONG_FLAGS.contains(&name) {
                format!("-{}", arg)
            } else {
                arg
            }
        })
        .collect()
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Indented JSON of the search response, `data` wrapper included
fn render_json(ads: &AdSequence) -> serde_json::Result<String> {
    serde_json::to_string_pretty(ads)
}

async fn run(cli: &Cli, mode: Mode) -> anyhow::Result<()> {
    let client = BlocketClient::with_config(cli.client_config())?;

    match mode {
        Mode::ListBrands => {
            let brands = pipeline::list_brands(&client).await?;
            for label in brands.labels() {
                println!("{}", label);
            }
        }
        Mode::ListModels { brand } => {
            let models = pipeline::list_models(&client, &brand).await?;
            for label in models.labels() {
                println!("{}", label);
            }
        }
        Mode::Console { brand, model } => {
            let listings = pipeline::resolve_listings(&client, &brand, &model).await?;
            println!("{}", render_json(&listings.ads)?);
        }
        Mode::Export {
            brand,
            model,
            outdir,
        } => {
            let outdir = match outdir {
                Some(dir) => dir,
                None => std::env::current_dir().context("Failed to resolve current directory")?,
            };
            let listings = pipeline::resolve_listings(&client, &brand, &model).await?;
            let summary = export::export_csv(
                &listings.brand.label,
                &listings.model.label,
                &listings.ads,
                &outdir,
            )?;
            info!(
                "💾 Saved {} ads to {} ({} skipped)",
                summary.written,
                summary.path.display(),
                summary.skipped
            );
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = normalize_args(std::env::args());
    if args.len() < 2 {
        let _ = Cli::command().print_help();
        return ExitCode::SUCCESS;
    }

    let cli = Cli::parse_from(args);
    init_logging(cli.verbose);

    let Some(mode) = cli.mode() else {
        let _ = Cli::command().print_help();
        return ExitCode::SUCCESS;
    };

    match run(&cli, mode).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
