//! CLI frontend for the Spurensuche investigation desk.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "spur",
    about = "Spurensuche: clue investigations for a text game, from the shell",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log desk activity to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a lore file with a small sample mystery
    Init {
        /// Path of the lore file to create
        #[arg(default_value = "lore.json")]
        path: PathBuf,
    },

    /// List clues in the lore file
    Clues {
        /// Only clues carrying this search tag
        #[arg(short, long)]
        tag: Option<String>,

        /// Lore file
        #[arg(short, long, default_value = "lore.json")]
        file: PathBuf,
    },

    /// Show a character's sheet, clues, and investigations
    Show {
        /// Character name (case-insensitive)
        name: String,

        /// Lore file
        #[arg(short, long, default_value = "lore.json")]
        file: PathBuf,
    },

    /// Run desk commands, e.g. "investigate/new" or "gminvest"
    Exec {
        /// Act as this character; staff when omitted
        #[arg(long = "as")]
        actor: Option<String>,

        /// RNG seed for rolls and target picks
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Lore file
        #[arg(short, long, default_value = "lore.json")]
        file: PathBuf,

        /// Command lines, run in order
        #[arg(required = true)]
        lines: Vec<String>,
    },

    /// Process the week for every active investigation
    Week {
        /// RNG seed for rolls and target picks
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Lore file
        #[arg(short, long, default_value = "lore.json")]
        file: PathBuf,
    },

    /// Show delivered notifications
    Inbox {
        /// Only messages for this character; staff alerts when omitted
        #[arg(long = "for")]
        name: Option<String>,

        /// Lore file
        #[arg(short, long, default_value = "lore.json")]
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Init { path } => commands::init::run(&path),
        Commands::Clues { tag, file } => commands::clues::run(&file, tag.as_deref()),
        Commands::Show { name, file } => commands::show::run(&file, &name),
        Commands::Exec {
            actor,
            seed,
            file,
            lines,
        } => commands::exec::run(&file, actor.as_deref(), &lines, seed),
        Commands::Week { seed, file } => commands::week::run(&file, seed),
        Commands::Inbox { name, file } => commands::inbox::run(&file, name.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
