mod report;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use celestial::{Catalog, UniverseConfig};
use clap::{Parser, Subcommand};
use galactic_position::{GalacticCoordinate, MAX_DEPTH, PositionKey};
use thiserror::Error;

#[derive(Parser)]
#[command(name = "galaxy", about = "Inspect the procedural galaxy")]
struct Cli {
    /// Universe configuration (TOML); defaults are used when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dump a star system and its body tree
    System {
        /// `x y z`, a single `x:y:z` or a packed key
        #[arg(required = true, num_args = 1..=3)]
        at: Vec<String>,

        /// Deepest hierarchy level to print
        #[arg(long, default_value_t = MAX_DEPTH)]
        depth: usize,
    },

    /// Dump a single body
    Body {
        /// Packed key, `@<id>` alias or `x:y:z/i.j.k`
        key: String,

        /// Also print the body's offset from its system centre at this
        /// timestamp, in seconds
        #[arg(long)]
        time: Option<f64>,
    },

    /// Pack or unpack position keys
    Key {
        #[command(subcommand)]
        command: KeyCommand,
    },

    /// List populated cells along +x
    Scan {
        x: u32,
        y: u32,
        z: u32,

        /// Stop after this many systems
        #[arg(long, default_value_t = 10)]
        count: usize,

        /// Cells to examine
        #[arg(long, default_value_t = 10_000)]
        limit: u32,
    },
}

#[derive(Subcommand)]
enum KeyCommand {
    /// Pack a coordinate and optional 0-based level indices
    Encode {
        x: u32,
        y: u32,
        z: u32,
        path: Vec<u8>,
    },
    /// Unpack a key
    Decode { key: String },
}

/// Lookup that produced nothing; exits with status 1
#[derive(Debug, Error)]
#[error("{0}")]
struct NotFound(String);

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            if error.downcast_ref::<NotFound>().is_some() {
                ExitCode::from(1)
            } else {
                ExitCode::from(2)
            }
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::System { at, depth } => cmd_system(cli, at, *depth),
        Commands::Body { key, time } => cmd_body(cli, key, *time),
        Commands::Key { command } => cmd_key(cli, command),
        Commands::Scan {
            x,
            y,
            z,
            count,
            limit,
        } => cmd_scan(cli, *x, *y, *z, *count, *limit),
    }
}

fn open_catalog(path: Option<&Path>) -> Result<Catalog> {
    let config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            UniverseConfig::from_toml_str(&text)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => UniverseConfig::default(),
    };
    tracing::debug!(seed = config.seed, "opened catalog");
    Ok(Catalog::new(config))
}

fn parse_key(text: &str) -> Result<PositionKey> {
    text.parse()
        .with_context(|| format!("invalid position key `{text}`"))
}

/// Accepts three axis values or a single key in any textual form
fn parse_location(at: &[String]) -> Result<GalacticCoordinate> {
    match at {
        [x, y, z] => {
            let axis = |value: &String| -> Result<i64> {
                value
                    .parse()
                    .with_context(|| format!("invalid coordinate `{value}`"))
            };
            Ok(GalacticCoordinate::from_signed(axis(x)?, axis(y)?, axis(z)?)?)
        }
        [key] => {
            let key = parse_key(key)?;
            key.target()
                .unwrap_or(key)
                .coordinate()
                .with_context(|| format!("`{key}` has no coordinate"))
        }
        _ => anyhow::bail!("expected `x y z` or a single key"),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{text}");
    Ok(())
}

fn cmd_system(cli: &Cli, at: &[String], depth: usize) -> Result<()> {
    let coordinate = parse_location(at)?;
    let catalog = open_catalog(cli.config.as_deref())?;
    let system = catalog
        .star_system(coordinate)
        .ok_or_else(|| NotFound(format!("no star system at {coordinate}")))?;

    if cli.json {
        print_json(&report::system_tree(&system, &catalog, depth))
    } else {
        print!("{}", report::render_system(&system, &catalog, depth));
        Ok(())
    }
}

fn cmd_body(cli: &Cli, key: &str, time: Option<f64>) -> Result<()> {
    let key = parse_key(key)?;
    let catalog = open_catalog(cli.config.as_deref())?;
    let body = catalog
        .celestial(key)
        .ok_or_else(|| NotFound(format!("no body at {key}")))?;
    let offset = time.and_then(|t| catalog.position_in_system(key, t));

    if cli.json {
        print_json(&report::BodyReport::new(&body, time, offset))
    } else {
        print!("{}", report::render_body(&body, time, offset));
        Ok(())
    }
}

fn cmd_key(cli: &Cli, command: &KeyCommand) -> Result<()> {
    let key = match command {
        KeyCommand::Encode { x, y, z, path } => {
            PositionKey::from_parts(*x, *y, *z, path).context("cannot encode key")?
        }
        KeyCommand::Decode { key } => parse_key(key)?,
    };

    if cli.json {
        print_json(&report::KeyReport::new(key))
    } else {
        print!("{}", report::render_key(key));
        Ok(())
    }
}

fn cmd_scan(cli: &Cli, x: u32, y: u32, z: u32, count: usize, limit: u32) -> Result<()> {
    let from = GalacticCoordinate::new(x, y, z)?;
    let catalog = open_catalog(cli.config.as_deref())?;
    let systems = catalog.find_star_systems(from, count, limit);
    if systems.is_empty() {
        return Err(NotFound(format!("no star systems within {limit} cells of {from}")).into());
    }

    if cli.json {
        let rows: Vec<_> = systems.iter().map(|s| report::ScanRow::new(s)).collect();
        print_json(&rows)
    } else {
        for system in &systems {
            println!("{}", report::ScanRow::new(system));
        }
        Ok(())
    }
}
