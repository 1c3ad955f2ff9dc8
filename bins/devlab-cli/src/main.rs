mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use devlab_common::config::DEFAULT_REDIS_URL;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "devlab-cli")]
#[command(about = "DevLab CLI - Seed problems, try code against the judge, inspect submissions", long_about = None)]
struct Cli {
    /// Redis connection URL
    #[arg(long, env = "REDIS_URL", default_value = DEFAULT_REDIS_URL, global = true)]
    redis_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load problems from a JSON file into Redis
    Seed {
        /// Problems file ({"problems": [...]})
        #[arg(short, long, default_value = "config/problems.json")]
        file: PathBuf,

        /// Remove every stored problem first
        #[arg(long, default_value = "false")]
        reset: bool,
    },

    /// List stored problems
    Problems,

    /// Run a source file against a problem's first sample test (nothing is recorded)
    Run {
        /// Problem id
        #[arg(short, long)]
        problem: String,

        /// Language key (e.g., cpp, java, python)
        #[arg(short, long)]
        language: String,

        /// Judge language id (e.g., 54 for C++, 62 for Java, 71 for Python)
        #[arg(short = 'i', long)]
        language_id: u32,

        /// Source file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Show a user's submissions for a problem
    Submissions {
        /// User id
        #[arg(short, long)]
        user: String,

        /// Problem id
        #[arg(short, long)]
        problem: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Seed { file, reset } => {
            commands::seed(&cli.redis_url, &file, reset).await?;
        }
        Commands::Problems => {
            commands::list_problems(&cli.redis_url).await?;
        }
        Commands::Run {
            problem,
            language,
            language_id,
            file,
        } => {
            commands::run_file(&cli.redis_url, &problem, &language, language_id, &file).await?;
        }
        Commands::Submissions { user, problem } => {
            commands::list_submissions(&cli.redis_url, &user, &problem).await?;
        }
    }

    Ok(())
}
