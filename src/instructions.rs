//! Instruction files served by the `fetch_instructions` tool.
//!
//! Each instruction set is a Markdown file `<name>.md` in the prompts
//! directory. Files are read on every call so edits apply without a restart.

use crate::error::{Result, YtMcpError};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Instruction names documented to clients.
pub const AVAILABLE_PROMPTS: [&str; 3] = ["write_blog_post", "write_social_post", "write_video_chapters"];

/// Name of the document sent as the server's `initialize` instructions.
pub const SERVER_INSTRUCTIONS: &str = "server_instructions";

/// Reads instruction files from a fixed directory.
#[derive(Debug, Clone)]
pub struct InstructionLoader {
    dir: PathBuf,
}

impl InstructionLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory the loader reads from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path an instruction name resolves to.
    ///
    /// Names are bare identifiers. Anything that could leave the prompts
    /// directory is rejected.
    pub fn resolve(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name == ".." {
            return Err(YtMcpError::InvalidInput(format!(
                "Invalid prompt name '{}': expected a bare name such as write_blog_post",
                name
            )));
        }
        Ok(self.dir.join(format!("{}.md", name)))
    }

    /// Read an instruction file verbatim.
    #[instrument(skip(self))]
    pub async fn load(&self, name: &str) -> Result<String> {
        let path = self.resolve(name)?;
        debug!(path = %path.display(), "Reading instructions");

        tokio::fs::read_to_string(&path).await.map_err(|e| {
            YtMcpError::NotFound(format!(
                "No instructions named '{}' ({}): {}",
                name,
                path.display(),
                e
            ))
        })
    }
}
