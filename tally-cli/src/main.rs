use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use tally_ingest::{FormatKind, InputSource, Outcome, TargetMonth, probe, resolve};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;

use config::{Config, config_path, init_config, load_config};

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("TALLY_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(
    name = "tally",
    version,
    long_version = LONG_VERSION,
    about = "Convert bank and credit card CSV exports into date,description,amount rows"
)]
struct Cli {
    /// Config file (default: ~/.tally/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Normalize one month of an export, detecting its format
    Convert {
        /// Exported CSV file
        input: PathBuf,

        /// Month to keep (1-12). Rows from other months are dropped.
        #[arg(short, long, value_parser = parse_month)]
        month: Option<TargetMonth>,

        /// Only try this format instead of detecting
        #[arg(long = "fmt", value_parser = parse_format)]
        format: Option<FormatKind>,

        /// Write here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show what every known format makes of an export
    Detect {
        input: PathBuf,

        #[arg(short, long, value_parser = parse_month)]
        month: Option<TargetMonth>,

        #[arg(long)]
        json: bool,
    },

    /// List known formats
    Formats {
        #[arg(long)]
        json: bool,
    },

    /// Manage ~/.tally/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config if none exists
    Init,
    /// Print the effective config
    Show,
}

fn parse_month(s: &str) -> Result<TargetMonth, String> {
    s.parse().map_err(|e: tally_ingest::InvalidMonth| e.to_string())
}

fn parse_format(s: &str) -> Result<FormatKind, String> {
    s.parse().map_err(|_| {
        let names: Vec<_> = FormatKind::ALL.iter().map(|k| k.name()).collect();
        format!("unknown format {s:?} (expected one of: {})", names.join(", "))
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = load_config(cli.config.as_deref())?;
    init_logging(&cfg);

    match cli.command {
        Command::Convert {
            input,
            month,
            format,
            output,
        } => {
            let month = pick_month(month, &cfg)?;
            convert(&input, month, format.or(cfg.default_format), output.as_deref())?;
        }

        Command::Detect { input, month, json } => {
            let month = pick_month(month, &cfg)?;
            detect(&input, month, json)?;
        }

        Command::Formats { json } => list_formats(json)?,

        Command::Config { command } => match command {
            ConfigCommand::Init => init_config(cli.config.as_deref())?,
            ConfigCommand::Show => {
                let p = match cli.config {
                    Some(p) => p,
                    None => config_path()?,
                };
                println!("# {}", p.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

/// Logs go to stderr so converted CSV on stdout stays clean.
fn init_logging(cfg: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(cfg.log_filter.as_deref().unwrap_or("warn")))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn pick_month(arg: Option<TargetMonth>, cfg: &Config) -> Result<TargetMonth> {
    if let Some(m) = arg {
        return Ok(m);
    }
    let month = cfg.month()?.unwrap_or_else(TargetMonth::current);
    info!(month = month.number(), "no --month given, using {}", month.name());
    Ok(month)
}

fn convert(
    input: &Path,
    month: TargetMonth,
    format: Option<FormatKind>,
    output: Option<&Path>,
) -> Result<()> {
    if !input.exists() {
        bail!("input not found: {}", input.display());
    }

    let conversion = resolve(&InputSource::file(input), month, format)
        .with_context(|| format!("converting {} for month {}", input.display(), month))?;

    match output {
        Some(path) => {
            conversion
                .write_to_path(path)
                .with_context(|| format!("write {}", path.display()))?;
            eprintln!(
                "Wrote {} rows ({}) to {}",
                conversion.rows,
                conversion.format,
                path.display()
            );
        }
        None => conversion.write_to(io::stdout().lock())?,
    }

    Ok(())
}

fn detect(input: &Path, month: TargetMonth, json: bool) -> Result<()> {
    if !input.exists() {
        bail!("input not found: {}", input.display());
    }

    let probes = probe(&InputSource::file(input), month);

    if json {
        println!("{}", serde_json::to_string_pretty(&probes)?);
        return Ok(());
    }

    println!("{} (month {})\n", input.display(), month);
    for p in &probes {
        match &p.outcome {
            Outcome::Matched { rows } => println!("  {:<16} matched   {rows} rows", p.format),
            Outcome::Rejected { rows } => println!("  {:<16} rejected  {rows} rows, wrong shape or empty", p.format),
            Outcome::Failed { reason } => println!("  {:<16} failed    {reason}", p.format),
        }
    }

    let matched = probes
        .iter()
        .filter(|p| matches!(p.outcome, Outcome::Matched { .. }))
        .count();
    println!();
    match matched {
        0 => println!("No format matched."),
        1 => println!("Exactly one format matched."),
        n => println!("{n} formats matched: ambiguous, pass --fmt to convert."),
    }

    Ok(())
}

#[derive(serde::Serialize)]
struct FormatInfo {
    name: &'static str,
    month_column: usize,
    preamble_lines: usize,
    layout: &'static str,
}

fn list_formats(json: bool) -> Result<()> {
    let infos: Vec<FormatInfo> = FormatKind::ALL
        .iter()
        .map(|k| {
            let d = k.descriptor();
            FormatInfo {
                name: d.name,
                month_column: d.month_column,
                preamble_lines: d.preamble.len(),
                layout: d.summary,
            }
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&infos)?);
        return Ok(());
    }

    for f in &infos {
        println!("{:<16} {}", f.name, f.layout);
    }
    Ok(())
}
