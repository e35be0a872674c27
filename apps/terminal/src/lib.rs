//! FlashMaster terminal front-end.
//!
//! Provides:
//! - OpenRouter completion client for card extraction, quiz distractors and summaries
//! - Interactive session over the flashcard, match and quiz drills
//! - Line-based input loop with live drill timers

pub mod ai;
pub mod command;
pub mod config;
pub mod error;
pub mod render;
pub mod repl;
pub mod session;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::io::{AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::ai::{CompletionClient, OpenRouterClient};
use crate::config::Config;
use crate::session::Session;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "flashmaster")]
#[command(about = "Study flashcards in the terminal: flip, match and quiz")]
pub struct Args {
    /// Card file to load at startup (TERM,DEFINITION per line)
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Treat the file as free-form notes and extract cards with AI
    #[arg(long, requires = "file")]
    pub extract: bool,

    /// Seed for shuffling and question order
    #[arg(long)]
    pub seed: Option<u64>,
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = Config::from_env();
    let mut stdout = tokio::io::stdout();

    let client: Option<Arc<dyn CompletionClient>> = match OpenRouterClient::new(&config) {
        Ok(client) => {
            tracing::info!(model = client.model(), "AI features enabled");
            Some(Arc::new(client))
        }
        Err(e) => {
            tracing::info!("AI features disabled: {}", e);
            stdout
                .write_all(format!("AI features disabled: {}\n", e).as_bytes())
                .await?;
            None
        }
    };

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut session = Session::new(client, config.extraction_timeout, rng);

    if let Some(path) = &args.file {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        let replies = if args.extract {
            session.extract(&text).await
        } else {
            session.load_cards(&text)
        };
        for reply in replies {
            stdout.write_all(format!("{}\n", reply).as_bytes()).await?;
        }
    } else {
        stdout
            .write_all(format!("{}\n", session.render()).as_bytes())
            .await?;
    }

    let stdin = BufReader::new(tokio::io::stdin());
    repl::run_repl(&mut session, stdin, &mut stdout).await
}
