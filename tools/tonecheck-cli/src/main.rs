//! Tonecheck CLI — Clean, score, compare, and export sentiment results.
//!
//! Usage:
//!   tonecheck analyze <TEXT>       Score a single sentence with every source
//!   tonecheck clean <CSV>          Preview cleaned text and word statistics
//!   tonecheck compare <CSV>        Compare sources over a column, export CSV
//!   tonecheck email <CSV>          Email an exported results file
//!   tonecheck train <CSV>          Fit the classifier model from labeled rows
//!   tonecheck check                Show configuration and source availability

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod auth;
mod commands;
mod session;

#[derive(Parser)]
#[command(
    name = "tonecheck",
    about = "Compare sentiment sources over text and CSV data",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Login identity
    #[arg(long, global = true, env = "TONECHECK_USER")]
    user: Option<String>,

    /// Login password
    #[arg(long, global = true, env = "TONECHECK_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a single sentence with every source
    Analyze {
        /// Text to score
        text: String,
    },

    /// Show cleaned text and word statistics for a column
    Clean {
        /// Input CSV file
        input: PathBuf,

        /// Column holding the text
        #[arg(short, long)]
        column: Option<String>,

        /// Number of cleaned rows to show
        #[arg(long, default_value = "5")]
        preview: usize,
    },

    /// Compare every source over a column and export the table
    Compare {
        /// Input CSV file
        input: PathBuf,

        /// Column holding the text
        #[arg(short, long)]
        column: Option<String>,

        /// Output CSV path
        #[arg(short, long, default_value = "sentiment_results.csv")]
        output: PathBuf,

        /// Score every row instead of the configured row limit
        #[arg(long)]
        full: bool,

        /// Email the exported file when done
        #[arg(long)]
        email: bool,
    },

    /// Email an exported results file
    Email {
        /// Results CSV produced by `compare`
        input: PathBuf,

        /// Recipient (defaults to EMAIL_TO)
        #[arg(long)]
        to: Option<String>,
    },

    /// Fit the classifier model from a labeled CSV
    Train {
        /// Input CSV file
        input: PathBuf,

        /// Column holding the text
        #[arg(long, default_value = "text")]
        text_column: String,

        /// Column holding positive/neutral/negative labels
        #[arg(long, default_value = "label")]
        label_column: String,

        /// Laplace smoothing
        #[arg(long, default_value = "1.0")]
        alpha: f64,

        /// Model output path (defaults to the configured model path)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show configuration and source availability
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, config_warnings) = tonecheck_common::config::AppConfig::load();

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    tonecheck_common::logging::init_logging(&logging);
    for warning in &config_warnings {
        tracing::warn!("{warning}");
    }

    let credentials = commands::Credentials {
        user: cli.user,
        password: cli.password,
    };

    match cli.command {
        Commands::Analyze { text } => commands::analyze::run(&config, &credentials, text),
        Commands::Clean {
            input,
            column,
            preview,
        } => commands::clean::run(&config, &credentials, input, column, preview),
        Commands::Compare {
            input,
            column,
            output,
            full,
            email,
        } => {
            commands::compare::run(&config, &credentials, input, column, output, full, email).await
        }
        Commands::Email { input, to } => {
            commands::email::run(&config, &credentials, input, to).await
        }
        Commands::Train {
            input,
            text_column,
            label_column,
            alpha,
            output,
        } => commands::train::run(&config, input, text_column, label_column, alpha, output),
        Commands::Check => commands::check::run(&config),
    }
}
