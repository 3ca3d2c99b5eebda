//! chunkpipe.toml configuration parser.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Buffer size used when nothing else is configured.
pub const DEFAULT_BUFFER_SIZE: usize = 4096;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipeConfig {
    pub reader: Option<ReaderConfig>,
    pub writer: Option<WriterConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReaderConfig {
    pub buffer_size: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WriterConfig {
    /// `0` disables write buffering.
    pub buffer_size: Option<usize>,
}

impl PipeConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: PipeConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// A config with every value spelled out at its default.
    pub fn scaffold() -> Self {
        PipeConfig {
            reader: Some(ReaderConfig {
                buffer_size: Some(DEFAULT_BUFFER_SIZE),
            }),
            writer: Some(WriterConfig {
                buffer_size: Some(DEFAULT_BUFFER_SIZE),
            }),
        }
    }

    pub fn read_buffer_size(&self) -> usize {
        self.reader
            .as_ref()
            .and_then(|r| r.buffer_size)
            .unwrap_or(DEFAULT_BUFFER_SIZE)
    }

    /// Write buffer capacity, or `None` for an unbuffered writer.
    pub fn write_buffer_size(&self) -> Option<usize> {
        let size = self
            .writer
            .as_ref()
            .and_then(|w| w.buffer_size)
            .unwrap_or(DEFAULT_BUFFER_SIZE);
        (size > 0).then_some(size)
    }
}
