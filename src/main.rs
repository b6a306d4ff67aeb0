use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hoidap::chat::ChatClientBuilder;
use hoidap::{AnswerResolverBuilder, Config, KnowledgeBase, extract};

/// hoidap - knowledge-base chatbot with document extraction
#[derive(Parser)]
#[command(name = "hoidap")]
#[command(about = "Answer questions from a training file or a completion service, and extract document content")]
#[command(version)]
struct Cli {
    /// Path to the HỎI:/ĐÁP: training file (overrides HOIDAP_TRAINING_FILE)
    #[arg(long, value_name = "FILE", global = true)]
    training_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Ask a question
    Ask(AskCommand),
    /// Extract the content of a PDF, Word, or Excel file
    Extract(ExtractCommand),
    /// Start the interactive chat shell
    Chat,
}

/// Ask a single question and print the answer
#[derive(Parser)]
struct AskCommand {
    /// The question to answer
    #[arg(value_name = "QUESTION")]
    question: String,
}

/// Extract and print a document's content
#[derive(Parser)]
struct ExtractCommand {
    /// Path to the document (.pdf, .docx, or .xlsx)
    #[arg(value_name = "FILE")]
    file: PathBuf,
}

fn main() {
    // Pick up OPENAI_API_KEY and friends from a local .env if present.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(path) = &cli.training_file {
        config = config.with_training_file(path.clone());
    }

    let result = match &cli.command {
        Commands::Ask(cmd) => handle_ask(cmd, &config),
        Commands::Extract(cmd) => handle_extract(cmd),
        Commands::Chat => hoidap::tui::run(&config),
    };

    if let Err(e) = result {
        // Determine exit code based on error type
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e}");
        std::process::exit(exit_code);
    }
}

/// Determines if an error is a user error (vs internal error).
///
/// User errors include empty questions and unsupported document formats.
/// Internal errors include I/O failures and terminal failures.
fn is_user_error(error: &anyhow::Error) -> bool {
    // Walk the whole context chain; the marker text may sit below a context
    // frame like "Failed to process '<file>'".
    error
        .chain()
        .any(|cause| {
            let msg = cause.to_string();
            msg.contains("cannot be empty") || msg.contains("Unsupported file format")
        })
}

/// Handles the ask command by resolving a single question.
fn handle_ask(cmd: &AskCommand, config: &Config) -> Result<()> {
    if cmd.question.trim().is_empty() {
        anyhow::bail!("Question cannot be empty");
    }

    let knowledge = KnowledgeBase::load(config.training_file())
        .context("Failed to load knowledge base")?;
    if knowledge.source_missing() {
        eprintln!(
            "Warning: training file '{}' not found; continuing with an empty knowledge base",
            config.training_file().display()
        );
    }

    let mut builder = AnswerResolverBuilder::new().knowledge(knowledge);
    match config.require_api_key() {
        Ok(api_key) => {
            let client = ChatClientBuilder::new()
                .api_key(api_key)
                .build()
                .context("Failed to build completion client")?;
            builder = builder.client(Arc::new(client));
        }
        Err(e) => {
            // Knowledge-base answers still work without a credential.
            eprintln!("Warning: {e}");
        }
    }

    let outcome = builder.build().resolve(cmd.question.trim());
    println!("[{}] {}", outcome.source_label(), outcome.text());

    Ok(())
}

/// Handles the extract command by printing a document's normalized content.
fn handle_extract(cmd: &ExtractCommand) -> Result<()> {
    let result = extract::extract_file(&cmd.file)
        .with_context(|| format!("Failed to process '{}'", cmd.file.display()))?;

    let rendered = result.to_display_string();
    print!("{rendered}");
    if !rendered.ends_with('\n') {
        println!();
    }

    Ok(())
}
