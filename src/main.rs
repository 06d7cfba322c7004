use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use smartcalc::calculator::{CalcResult, catalog};
use smartcalc::config::Config;
use smartcalc::session::{ConsoleSession, KeypadSession};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Rewrite English phrases ("add 4 and 5") before evaluating
    #[arg(long, global = true)]
    phrases: bool,

    /// Decimal places shown for non-integral results
    #[arg(long, global = true)]
    precision: Option<usize>,

    /// Log evaluation details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive numbered menu (the default)
    Menu,
    /// Evaluate a single expression
    Eval {
        /// The expression; multiple words are joined with spaces
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        expression: Vec<String>,

        /// Value bound to the memory token `M`
        #[arg(long, allow_hyphen_values = true)]
        memory: Option<f64>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Keypad mode: each line is evaluated, `:KEY` presses a button
    Pad,
    /// List the operation catalog
    Ops {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "smartcalc=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load(cli.config.as_deref())?;
    if cli.phrases {
        config.evaluator.phrases = true;
    }
    if let Some(precision) = cli.precision {
        config.display.precision = precision;
    }

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => {
            let stdin = io::stdin();
            let mut input = stdin.lock();
            let mut out = io::stdout();
            ConsoleSession::new(&config).run(&mut input, &mut out)
        }
        Commands::Eval {
            expression,
            memory,
            json,
        } => run_eval(&config, &expression.join(" "), memory, json),
        Commands::Pad => run_pad(&config),
        Commands::Ops { json } => run_ops(json),
    }
}

fn run_eval(config: &Config, expression: &str, memory: Option<f64>, json: bool) -> Result<()> {
    let result = CalcResult::evaluate(
        expression,
        memory,
        config.evaluator.phrases,
        &config.number_format(),
    );

    if json {
        let text = serde_json::to_string_pretty(&result).context("Failed to serialize result")?;
        println!("{}", text);
    } else if result.is_success() {
        println!("{}", result.display());
    } else {
        eprintln!("Error: {}", result.display());
    }

    if !result.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

fn run_pad(config: &Config) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();
    KeypadSession::new(config.number_format()).run(&mut input, &mut out)
}

fn run_ops(json: bool) -> Result<()> {
    if json {
        let summaries: Vec<_> = catalog::OPERATIONS.iter().map(|op| op.summary()).collect();
        let text = serde_json::to_string_pretty(&summaries).context("Failed to serialize catalog")?;
        println!("{}", text);
    } else {
        for line in catalog::menu_lines() {
            println!("{}", line);
        }
    }
    Ok(())
}
