//! CLI command implementations.

mod config;
mod instructions;
mod serve;
mod transcript;

pub use config::run_config;
pub use instructions::run_instructions;
pub use serve::run_serve;
pub use transcript::run_transcript;
