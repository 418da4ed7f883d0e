//! bandmark CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "bandmark", version, about = "IELTS reading/listening answer-scoring harness")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score an attempt against a test set
    Score {
        /// Path to a .toml/.json test set or a directory of them
        #[arg(long)]
        test: PathBuf,

        /// Path to the submitted answers (JSON list of {questionId, answer})
        #[arg(long)]
        answers: PathBuf,

        /// Count partial credit toward the percentage
        #[arg(long)]
        partial_credit: bool,

        /// Output directory (defaults to the configured one)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: json, html, csv, all
        #[arg(long, default_value = "json")]
        format: String,

        /// Submit the aggregate score to the configured exam service
        #[arg(long)]
        submit: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate test-set files
    Validate {
        /// Path to a test-set file or directory
        #[arg(long)]
        test: PathBuf,
    },

    /// Compare two attempt reports
    Compare {
        /// Baseline attempt JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Current attempt JSON
        #[arg(long)]
        current: PathBuf,

        /// Exit code 1 if any question lost points
        #[arg(long)]
        fail_on_regression: bool,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Fetch a test set from the configured exam service
    Fetch {
        /// Test identifier on the remote service
        #[arg(long)]
        test_id: String,

        /// Skill: reading or listening
        #[arg(long, default_value = "reading")]
        skill: String,

        /// Part numbers to fetch (repeatable); whole paper when omitted
        #[arg(long)]
        part: Vec<u32>,

        /// Output file (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config, example test set, and example answers
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bandmark=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Score {
            test,
            answers,
            partial_credit,
            output,
            format,
            submit,
            config,
        } => {
            commands::score::execute(test, answers, partial_credit, output, format, submit, config)
                .await
        }
        Commands::Validate { test } => commands::validate::execute(test),
        Commands::Compare {
            baseline,
            current,
            fail_on_regression,
            format,
        } => commands::compare::execute(baseline, current, fail_on_regression, format),
        Commands::Fetch {
            test_id,
            skill,
            part,
            output,
            config,
        } => commands::fetch::execute(test_id, skill, part, output, config).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
