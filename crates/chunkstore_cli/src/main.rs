//! chunkstore CLI
//!
//! Command-line tools for chunked record storage.
//!
//! # Commands
//!
//! - `split` - Split a file into a segment file
//! - `join` - Reassemble a segment file
//! - `inspect` - List the segments of a segment file
//! - `put` / `get` - Store and fetch JSON documents as chunked objects
//! - `append` / `cat` - Write and drain chunk streams

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// chunkstore command-line tools.
#[derive(Parser)]
#[command(name = "chunkstore")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the record store directory
    #[arg(global = true, short, long)]
    store: Option<PathBuf>,

    /// Namespace to store records in
    #[arg(global = true, short, long, default_value = "default")]
    namespace: String,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a file into a segment file
    Split {
        /// File to split
        input: PathBuf,

        /// Maximum bytes per segment
        #[arg(long, default_value_t = chunkstore_codec::DEFAULT_SEGMENT_SIZE)]
        segment_size: usize,

        /// Write segments here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Reassemble a segment file
    Join {
        /// Segment file to join
        input: PathBuf,

        /// Write bytes here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the segments of a segment file
    Inspect {
        /// Segment file to inspect
        input: PathBuf,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Store a JSON document as a chunked object
    Put {
        /// Object key
        key: String,

        /// JSON document to store
        file: PathBuf,

        /// Maximum bytes per segment record
        #[arg(long, default_value_t = chunkstore_codec::DEFAULT_SEGMENT_SIZE)]
        segment_size: usize,
    },

    /// Print a stored JSON document
    Get {
        /// Object key
        key: String,
    },

    /// Append files to a chunk stream, one record per file
    Append {
        /// Stream key
        key: String,

        /// Files to append, in order
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Write a chunk stream to stdout
    Cat {
        /// Stream key
        key: String,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for data.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Split {
            input,
            segment_size,
            output,
        } => {
            commands::split::run(&input, segment_size, output.as_deref())?;
        }
        Commands::Join { input, output } => {
            commands::join::run(&input, output.as_deref())?;
        }
        Commands::Inspect { input, format } => {
            commands::inspect::run(&input, &format)?;
        }
        Commands::Put {
            key,
            file,
            segment_size,
        } => {
            let path = cli.store.ok_or("Store path required for put")?;
            commands::object::put(&path, &cli.namespace, &key, &file, segment_size)?;
        }
        Commands::Get { key } => {
            let path = cli.store.ok_or("Store path required for get")?;
            commands::object::get(&path, &cli.namespace, &key)?;
        }
        Commands::Append { key, files } => {
            let path = cli.store.ok_or("Store path required for append")?;
            commands::stream::append(&path, &cli.namespace, &key, &files)?;
        }
        Commands::Cat { key } => {
            let path = cli.store.ok_or("Store path required for cat")?;
            commands::stream::cat(&path, &cli.namespace, &key)?;
        }
        Commands::Version => {
            println!("chunkstore CLI v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "default segment size: {} bytes",
                chunkstore_codec::DEFAULT_SEGMENT_SIZE
            );
            println!(
                "default record cap: {} bytes",
                chunkstore_records::DEFAULT_MAX_RECORD_SIZE
            );
        }
    }

    Ok(())
}
