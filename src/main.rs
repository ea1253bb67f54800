use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;

use critic::config::Config;
use critic::corpus;
use critic::model::sentiment::Sentiment;
use critic::output::terminal;
use critic::pipeline;

/// Critic: Naive Bayes sentiment classification for movie reviews.
///
/// Train once on directories of positive and negative reviews, then classify
/// phrases or whole directories against the saved model.
#[derive(Parser)]
#[command(name = "critic", version, about)]
struct Cli {
    /// Directory holding the trained model (overrides CRITIC_MODEL_DIR)
    #[arg(long, global = true)]
    model_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a model from labeled review directories and save it
    Train {
        /// Directory of positive reviews (searched recursively)
        #[arg(short = 'p', long)]
        positive_dir: PathBuf,

        /// Directory of negative reviews (searched recursively)
        #[arg(short = 'n', long)]
        negative_dir: PathBuf,

        /// Minimum number of reviews a stem must appear in (default: 3)
        #[arg(long)]
        min_df: Option<usize>,

        /// Additive smoothing constant (default: 1.0)
        #[arg(long)]
        alpha: Option<f64>,

        /// Drop English stop words before stemming
        #[arg(long)]
        stop_words: bool,
    },

    /// Classify a single phrase
    Predict {
        /// The text to classify
        phrase: String,
    },

    /// Classify every file in a directory and report the split
    Classify {
        /// Directory of reviews (searched recursively)
        dir: PathBuf,

        /// Print the verdict for each file
        #[arg(short, long)]
        verbose: bool,
    },

    /// Measure accuracy against labeled test directories
    Evaluate {
        /// Directory of positive test reviews
        #[arg(short = 'p', long)]
        positive_dir: PathBuf,

        /// Directory of negative test reviews
        #[arg(short = 'n', long)]
        negative_dir: PathBuf,
    },

    /// Show the saved model's vocabulary, priors, and most telling stems
    Inspect {
        /// How many informative stems to list (default: 20)
        #[arg(long, default_value = "20")]
        top: usize,
    },

    /// Show model store status (artifacts, sizes, training time)
    Status,
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("critic=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(dir) = cli.model_dir {
        config.model_dir = dir;
    }

    match cli.command {
        Commands::Train {
            positive_dir,
            negative_dir,
            min_df,
            alpha,
            stop_words,
        } => {
            if let Some(min_df) = min_df {
                config.min_doc_frequency = min_df;
            }
            if let Some(alpha) = alpha {
                config.alpha = alpha;
            }
            if stop_words {
                config.remove_stop_words = true;
            }

            println!("Reading training reviews...");
            let labeled = corpus::load_labeled(&positive_dir, &negative_dir)
                .context("Failed to read the training corpus")?;
            terminal::display_read_failures(&labeled.failures);

            if labeled.documents.is_empty() {
                anyhow::bail!(
                    "No reviews found in {} or {}",
                    positive_dir.display(),
                    negative_dir.display()
                );
            }

            println!(
                "  {} positive, {} negative",
                labeled.count(Sentiment::Positive),
                labeled.count(Sentiment::Negative)
            );

            let options = pipeline::train::TrainOptions {
                show_progress: true,
                ..config.train_options()
            };

            println!("Training...");
            let model = pipeline::train::train(&labeled.documents, &options)?;

            let store = config.store();
            store
                .save(&model)
                .with_context(|| format!("Failed to save model to {}", config.model_dir.display()))?;

            terminal::display_model_summary(&model, 0);
            println!(
                "\n{}",
                format!("Model saved to {}", config.model_dir.display()).bold()
            );
            println!("Next: `critic predict \"...\"` or `critic evaluate`.");
        }

        Commands::Predict { phrase } => {
            let store = config.require_model()?;
            let model = store.load()?;

            let prediction = model.predict_text(&phrase)?;
            terminal::display_prediction(&phrase, &prediction);
        }

        Commands::Classify { dir, verbose } => {
            let store = config.require_model()?;
            let model = store.load()?;

            println!("Reading reviews from {}...", dir.display());
            let scan = corpus::read_directory(&dir, None)?;
            terminal::display_read_failures(&scan.failures);

            let report = pipeline::classify::classify_documents(&model, &scan.documents, true)?;
            terminal::display_classification(&report, verbose);
        }

        Commands::Evaluate {
            positive_dir,
            negative_dir,
        } => {
            let store = config.require_model()?;
            let model = store.load()?;

            println!("Reading test reviews...");
            let labeled = corpus::load_labeled(&positive_dir, &negative_dir)
                .context("Failed to read the test corpus")?;
            terminal::display_read_failures(&labeled.failures);

            let evaluation = pipeline::evaluate::evaluate(&model, &labeled.documents, true)?;
            terminal::display_evaluation(&evaluation);
        }

        Commands::Inspect { top } => {
            let store = config.require_model()?;
            let model = store.load()?;
            terminal::display_model_summary(&model, top);
        }

        Commands::Status => {
            critic::status::show(&config.store())?;
        }
    }

    Ok(())
}
