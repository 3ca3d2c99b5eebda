use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "chunkpipe",
    about = "chunkpipe — stream files through a buffered chunk pipeline",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy input to output one read-sized chunk at a time.
    ///
    /// Use `-` for stdin / stdout. Buffer sizes come from --config (if given),
    /// then the flags below, which take precedence.
    Copy {
        /// Input file, or `-` for stdin
        #[arg(short, long, default_value = "-")]
        input: String,
        /// Output file, or `-` for stdout
        #[arg(short, long, default_value = "-")]
        output: String,
        /// Path to a chunkpipe.toml
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Read buffer size in bytes
        #[arg(long)]
        read_buffer: Option<usize>,
        /// Write buffer size in bytes (0 disables buffering)
        #[arg(long, conflicts_with = "unbuffered")]
        write_buffer: Option<usize>,
        /// Write every chunk as soon as it is read
        #[arg(long)]
        unbuffered: bool,
        /// Append to the output file instead of truncating it
        #[arg(short, long)]
        append: bool,
        /// Summary format on stderr: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Manage chunkpipe.toml
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a chunkpipe.toml with every default spelled out
    Init {
        /// Destination file (default: print to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout may be carrying the copied bytes.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("chunkpipe=info".parse()?)
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Copy {
            input,
            output,
            config,
            read_buffer,
            write_buffer,
            unbuffered,
            append,
            format,
        } => commands::copy::copy(&commands::copy::CopyOptions {
            input,
            output,
            config,
            read_buffer,
            write_buffer,
            unbuffered,
            append,
            format,
        }),
        Commands::Config { action } => match action {
            ConfigAction::Init { output } => commands::config::init(output.as_deref()),
        },
    }
}
