//! Share-text emission

use std::path::PathBuf;

use tracing::debug;

use crate::config::OutputConfig;
use crate::error::Result;

/// Where rendered share text goes.
///
/// Stdout is always written; a configured overlay file is replaced wholesale
/// on every emission so file watchers (OBS text sources and the like) pick
/// up the latest line.
#[derive(Debug, Clone, Default)]
pub struct ShareSink {
    file: Option<PathBuf>,
}

impl ShareSink {
    /// Build a sink from the output configuration.
    #[must_use]
    pub fn new(config: &OutputConfig) -> Self {
        Self {
            file: config.file.clone(),
        }
    }

    /// Emit one rendered share text.
    pub fn emit(&self, text: &str) -> Result<()> {
        println!("{text}");

        if let Some(ref path) = self.file {
            std::fs::write(path, text)?;
            debug!("Wrote share text to {}", path.display());
        }

        Ok(())
    }
}
