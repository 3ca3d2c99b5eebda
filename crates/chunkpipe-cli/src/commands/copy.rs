use std::fs::{File, OpenOptions};
use std::io;
use std::os::fd::{AsFd, BorrowedFd};

use anyhow::Context;
use chunkpipe_core::{ChunkReader, ChunkWriter, FileHandle, PipeConfig, WriteStats};
use tracing::info;

pub struct CopyOptions {
    pub input: String,
    pub output: String,
    pub config: Option<std::path::PathBuf>,
    pub read_buffer: Option<usize>,
    pub write_buffer: Option<usize>,
    pub unbuffered: bool,
    pub append: bool,
    pub format: String,
}

pub fn copy(opts: &CopyOptions) -> anyhow::Result<()> {
    let config = match &opts.config {
        Some(path) => PipeConfig::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => PipeConfig::default(),
    };
    let read_size = opts.read_buffer.unwrap_or_else(|| config.read_buffer_size());
    let write_size = write_buffer_size(opts, &config);

    let input = open_input(&opts.input)?;
    let output = open_output(&opts.output, opts.append)?;

    let mut reader = ChunkReader::with_capacity(input, read_size)
        .context("read buffer size must be greater than zero")?;
    let mut writer = match write_size {
        Some(size) => ChunkWriter::with_capacity(output, size),
        None => ChunkWriter::unbuffered(output),
    };

    info!(
        input = %opts.input,
        output = %opts.output,
        read_buffer = read_size,
        write_buffer = ?write_size,
        "starting copy"
    );

    let stats = writer
        .consume(&mut reader)
        .with_context(|| format!("Failed to copy {} to {}", opts.input, opts.output))?;

    info!(
        chunks = reader.chunks_read(),
        bytes = stats.bytes,
        "copy complete"
    );
    report(&stats, &opts.format)
}

/// Resolve the write buffer: `--unbuffered` wins, then `--write-buffer`
/// (0 = unbuffered), then the config file.
fn write_buffer_size(opts: &CopyOptions, config: &PipeConfig) -> Option<usize> {
    if opts.unbuffered {
        return None;
    }
    match opts.write_buffer {
        Some(0) => None,
        Some(size) => Some(size),
        None => config.write_buffer_size(),
    }
}

fn open_input(path: &str) -> anyhow::Result<FileHandle> {
    if path == "-" {
        return dup_stdio(io::stdin().as_fd()).context("Failed to duplicate stdin");
    }
    let file = File::open(path).with_context(|| format!("Failed to open input: {path}"))?;
    Ok(FileHandle::new(file))
}

fn open_output(path: &str, append: bool) -> anyhow::Result<FileHandle> {
    if path == "-" {
        return dup_stdio(io::stdout().as_fd()).context("Failed to duplicate stdout");
    }
    let mut options = OpenOptions::new();
    options.create(true);
    if append {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }
    let file = options
        .open(path)
        .with_context(|| format!("Failed to open output: {path}"))?;
    Ok(FileHandle::new(file))
}

/// Take a private duplicate of a standard stream so the writer can close it
/// without closing the process's own descriptor.
fn dup_stdio(fd: BorrowedFd<'_>) -> io::Result<FileHandle> {
    Ok(FileHandle::from_fd(fd.try_clone_to_owned()?))
}

fn report(stats: &WriteStats, format: &str) -> anyhow::Result<()> {
    match format {
        "json" => {
            eprintln!("{}", serde_json::to_string_pretty(stats)?);
        }
        _ => {
            eprintln!(
                "✓ Copied {} bytes in {} chunks ({} writes, {} flushes, {} direct)",
                stats.bytes, stats.chunks, stats.write_calls, stats.flushes, stats.bypassed
            );
        }
    }
    Ok(())
}
