//! Configuration module for ytmcp.
//!
//! Handles loading settings from the config file and the environment.

mod settings;

pub use settings::{
    AuthSettings, PromptSettings, ProxyCredentials, ProxyEndpoints, ProxySettings, ResolvedAuth,
    ServerSettings, Settings, TranscriptSettings, DEFAULT_REQUIRED_SCOPES,
};
