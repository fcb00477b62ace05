use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use raglab_ai::download::{MEDITATIONS_PATH, MEDITATIONS_URL};
use raglab_core::chunking::{DEFAULT_MAX_TOKENS, DEFAULT_OVERLAP};
use raglab_core::error::AppError;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "raglab",
    about = "Chunk a text, embed it into an in-memory store and answer questions from it"
)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch a text file over HTTP and save it to disk
    Download {
        #[arg(long, default_value = MEDITATIONS_URL)]
        url: String,
        #[arg(long, default_value = MEDITATIONS_PATH)]
        out: PathBuf,
    },
    /// Split a file into token windows and show the first one
    Chunk {
        #[arg(long, default_value = MEDITATIONS_PATH)]
        file: PathBuf,
        #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
        max_tokens: usize,
        #[arg(long, default_value_t = DEFAULT_OVERLAP)]
        overlap: usize,
    },
    /// Chunk a file and embed every chunk
    Embed {
        #[arg(long, default_value = MEDITATIONS_PATH)]
        file: PathBuf,
        #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
        max_tokens: usize,
        #[arg(long, default_value_t = DEFAULT_OVERLAP)]
        overlap: usize,
    },
    /// Ingest a file, then answer each question from its closest chunks
    Ask {
        #[arg(long, default_value = MEDITATIONS_PATH)]
        file: PathBuf,
        /// Question to answer; repeat for several
        #[arg(long = "question", short, required = true)]
        questions: Vec<String>,
        /// Number of chunks retrieved per question
        #[arg(short, long, default_value_t = raglab_ai::rag::DEFAULT_TOP_K)]
        k: usize,
        #[arg(long, default_value_t = 100)]
        max_tokens: usize,
        #[arg(long, default_value_t = DEFAULT_OVERLAP)]
        overlap: usize,
    },
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            if let Some(details) = err.details.as_deref() {
                eprintln!("  {details}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), AppError> {
    match command {
        Command::Download { url, out } => commands::download(&url, &out),
        Command::Chunk {
            file,
            max_tokens,
            overlap,
        } => commands::chunk(&file, max_tokens, overlap),
        Command::Embed {
            file,
            max_tokens,
            overlap,
        } => commands::embed(&file, max_tokens, overlap),
        Command::Ask {
            file,
            questions,
            k,
            max_tokens,
            overlap,
        } => commands::ask(&file, &questions, k, max_tokens, overlap),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
