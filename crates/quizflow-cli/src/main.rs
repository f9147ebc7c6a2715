//! quizflow CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "quizflow", version, about = "Adaptive questionnaire engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a questionnaire interactively
    Run {
        /// Path to a .toml questionnaire definition
        #[arg(long)]
        definition: PathBuf,

        /// User identifier for saved results and progress
        #[arg(long, default_value = "local")]
        user: String,

        /// Age used for demographic adjustment
        #[arg(long)]
        age: Option<u32>,

        /// Gender used for demographic adjustment (male, female, other)
        #[arg(long)]
        gender: Option<String>,

        /// Occupation used for personalized notes
        #[arg(long)]
        occupation: Option<String>,

        /// Directory for saved results and progress
        #[arg(long, default_value = "./quizflow-data")]
        data_dir: PathBuf,

        /// Print the completed result as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Validate questionnaire definition files
    Validate {
        /// Path to a definition file or directory
        #[arg(long)]
        definition: PathBuf,
    },

    /// List questionnaires found in a directory
    List {
        /// Directory to scan for .toml definitions
        #[arg(long, default_value = "./questionnaires")]
        dir: PathBuf,
    },

    /// Show saved results for a user
    History {
        /// User identifier
        #[arg(long, default_value = "local")]
        user: String,

        /// Only show results for this questionnaire
        #[arg(long)]
        questionnaire: Option<String>,

        /// Directory holding saved results
        #[arg(long, default_value = "./quizflow-data")]
        data_dir: PathBuf,
    },

    /// Create a starter questionnaire definition
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizflow=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            definition,
            user,
            age,
            gender,
            occupation,
            data_dir,
            json,
        } => commands::run::execute(definition, user, age, gender, occupation, data_dir, json).await,
        Commands::Validate { definition } => commands::validate::execute(definition),
        Commands::List { dir } => commands::list::execute(dir),
        Commands::History {
            user,
            questionnaire,
            data_dir,
        } => commands::history::execute(user, questionnaire, data_dir).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
