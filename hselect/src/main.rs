//! hselect: select and print header keywords from collections of data files.

use clap::{Parser, Subcommand};
use hdrq::Config;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "hselect")]
#[command(about = "Select header keywords from data files, filtered by a predicate")]
#[command(version)]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print keyword values for every extension matching an expression
    #[command(visible_alias = "s")]
    Select {
        /// Sources (paths, globs, @listfiles; comma-separated allowed), then the
        /// comma-separated keyword list (wildcards allowed, e.g. "NAXIS*,BUNIT")
        #[arg(required = true, num_args = 2.., value_name = "SOURCES... KEYWORDS")]
        args: Vec<String>,

        /// Extensions to visit (e.g. 0,1,2); all by default
        #[arg(short = 'e', long = "extensions", alias = "ext")]
        extensions: Option<String>,

        /// Predicate, e.g. "EXPTIME > 500 AND (FILTER = 'F160W' OR FILTER = 'F125W')"
        #[arg(short = 'x', long = "expr", alias = "expression")]
        expr: Option<String>,

        /// Output format: table, tsv or json (default from config)
        #[arg(short = 'f', long = "format")]
        format: Option<String>,

        /// Worker threads (default from config)
        #[arg(short = 'j', long = "jobs")]
        jobs: Option<usize>,

        /// Omit the column header line
        #[arg(long = "no-header")]
        no_header: bool,

        /// Text shown for missing values (default from config)
        #[arg(long = "placeholder")]
        placeholder: Option<String>,
    },

    /// Parse an expression and print its canonical form
    Check {
        /// Expression to check
        expr: String,
    },

    /// List the keys available in each extension of the given sources
    Keys {
        /// Sources (paths, globs, @listfiles)
        #[arg(required = true)]
        sources: Vec<String>,

        /// Only list keys matching this wildcard pattern
        #[arg(short = 'p', long = "pattern")]
        pattern: Option<String>,

        /// Extensions to visit (e.g. 0,1,2); all by default
        #[arg(short = 'e', long = "extensions", alias = "ext")]
        extensions: Option<String>,
    },
}

/// Log filter from the command-line flags, falling back to the config.
fn log_level(cli: &Cli, config: &Config) -> String {
    if cli.quiet {
        return "error".to_string();
    }
    match cli.verbose {
        0 => config.log_level.clone(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Initialize the tracing subscriber. RUST_LOG overrides `level`.
fn init_tracing(level: &str) -> hdrq::Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(level)
            .map_err(|e| hdrq::Error::Config(format!("invalid log level filter '{}': {}", level, e)))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

fn run(cli: Cli) -> hdrq::Result<()> {
    let config = Config::load()?;
    init_tracing(&log_level(&cli, &config))?;

    match cli.command {
        Commands::Select { args, extensions, expr, format, jobs, no_header, placeholder } => {
            // num_args guarantees at least one source before the keywords
            let Some((keywords, sources)) = args.split_last() else {
                return Err(hdrq::Error::InvalidKeywords("missing keyword list".to_string()));
            };
            let opts = commands::SelectOptions {
                extensions: extensions.as_deref(),
                expr: expr.as_deref(),
                format: format.as_deref(),
                jobs,
                header: !no_header,
                placeholder: placeholder.as_deref(),
                quiet: cli.quiet,
            };
            commands::select(&config, sources, keywords, &opts)
        }
        Commands::Check { expr } => commands::check(&expr),
        Commands::Keys { sources, pattern, extensions } => {
            commands::keys(&config, &sources, pattern.as_deref(), extensions.as_deref())
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
