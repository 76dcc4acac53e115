//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::Result;
use std::path::PathBuf;

/// Run the config command.
///
/// `path` is the `--config` override, if any.
pub fn run_config(action: &ConfigAction, path: Option<&PathBuf>, settings: Settings) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let toml_str = toml::to_string_pretty(&settings)
                .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
            println!("{}", toml_str);

            if settings.proxy.credentials().is_err() {
                Output::warning("Proxy credentials are incomplete; fetch_video_transcript will fail.");
            }
            if let Err(e) = settings.auth.resolve() {
                Output::warning(&format!("Server cannot start: {}", e));
            }
        }

        ConfigAction::Path => {
            let config_path = path.cloned().unwrap_or_else(Settings::default_config_path);
            println!("{}", config_path.display());
        }
    }

    Ok(())
}
