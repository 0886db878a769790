//! Studio CLI: validate design submissions and generate their image
//! presentations.
//!
//! Configuration comes from the environment (see studio-core's config
//! module); DATABASE_URL must point at the platform's metadata store.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use studio_cli::init_tracing;
use studio_core::{Challenge, Config, Submission, SubmissionFile, Submitter};
use studio_db::{MetadataStore, PgMetadataStore};
use studio_processing::{DesignFileGenerator, SubmissionValidator};

#[derive(Parser)]
#[command(name = "studio", about = "Design submission image pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a unified submission archive
    Validate {
        /// Path to the submission archive
        file: PathBuf,
    },
    /// Generate the image presentations for a submission archive
    Generate {
        /// Path to the submission archive
        file: PathBuf,
        /// Challenge the submission belongs to
        #[arg(long)]
        challenge_id: i64,
        /// Category of the challenge (gates gallery extraction)
        #[arg(long)]
        challenge_category_id: i64,
        /// Submitter user ID
        #[arg(long)]
        user_id: i64,
        /// Submitter handle
        #[arg(long)]
        handle: String,
        /// Submission ID
        #[arg(long)]
        submission_id: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to the metadata store")?;
    let store: Arc<dyn MetadataStore> = Arc::new(PgMetadataStore::new(pool));

    match cli.command {
        Commands::Validate { file } => {
            let validator = SubmissionValidator::new(store, &config.submissions);
            let outcome = validator
                .validate(&file)
                .await
                .context("Failed to validate submission")?;
            println!(
                "{}: {}",
                if outcome.valid { "VALID" } else { "INVALID" },
                outcome.message
            );
            if !outcome.valid {
                std::process::exit(1);
            }
        }
        Commands::Generate {
            file,
            challenge_id,
            challenge_category_id,
            user_id,
            handle,
            submission_id,
        } => {
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| file.display().to_string());
            let generator = DesignFileGenerator::new(
                Challenge {
                    challenge_id,
                    challenge_category_id,
                },
                Submitter { user_id, handle },
                Submission::new(submission_id),
                SubmissionFile { name, path: file },
                store,
                &config,
            );
            let submission = generator
                .generate_files()
                .await
                .context("Failed to generate submission images")?;
            println!(
                "Generated {} image presentations for submission {}",
                submission.images.len(),
                submission.submission_id
            );
        }
    }

    Ok(())
}
