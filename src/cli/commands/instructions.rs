//! Instructions command implementation.

use crate::config::Settings;
use crate::instructions::InstructionLoader;
use anyhow::Result;

/// Print one instruction file, exactly as the MCP tool would return it.
pub async fn run_instructions(name: &str, settings: Settings) -> Result<()> {
    let loader = InstructionLoader::new(settings.prompts.resolve_dir());
    let text = loader.load(name).await?;
    print!("{}", text);
    Ok(())
}
