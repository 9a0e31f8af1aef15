mod commands;
mod config;
mod error;
mod git;
mod stamp;
mod utils;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::stamp::StampOptions;

#[derive(Parser)]
#[command(name = "codestamp")]
#[command(about = "Stamps changed regions of saved files with author and timestamp comments", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Annotate the changed regions of a file being saved.
    ///
    /// Pipe the buffer on stdin; the annotated buffer is printed on stdout
    /// (or written back with --write). The on-disk file is the previous
    /// save, git HEAD is the committed baseline.
    Stamp {
        /// File being saved
        file: PathBuf,
        /// Language identifier (inferred from the file name when omitted)
        #[arg(long)]
        language: Option<String>,
        /// Author name for this save (overrides the configured name)
        #[arg(long)]
        author: Option<String>,
        /// Fixed timestamp "YYYY-MM-DD, HH:MM:SS" instead of the clock
        #[arg(long)]
        timestamp: Option<String>,
        /// Do not compare against the committed version
        #[arg(long)]
        no_revert_detection: bool,
        /// Rewrite the file in place instead of printing to stdout
        #[arg(long)]
        write: bool,
    },
    /// Show or set the author name used in stamps
    Author {
        /// New author name; prints the current one when omitted
        name: Option<String>,
    },
    /// Print the resolved configuration as JSON
    Config,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Stamp {
            file,
            language,
            author,
            timestamp,
            no_revert_detection,
            write,
        } => commands::stamp::handle_stamp(&StampOptions {
            file,
            language,
            author,
            timestamp,
            no_revert_detection,
            write,
        }),
        Commands::Author { name } => commands::author::handle_author(name.as_deref()),
        Commands::Config => commands::author::handle_config(),
    };

    if let Err(e) = result {
        eprintln!("codestamp: {}", e);
        std::process::exit(1);
    }
}
