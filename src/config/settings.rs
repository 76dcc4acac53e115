//! Configuration settings for ytmcp.
//!
//! Settings come from an optional TOML file, overlaid with environment
//! variables. The result is built once at startup and handed to the server
//! by reference; nothing reads the environment after that.

use crate::error::{Result, YtMcpError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Scopes every tool call must carry.
pub const DEFAULT_REQUIRED_SCOPES: [&str; 5] = ["openid", "profile", "email", "address", "phone"];

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub auth: AuthSettings,
    pub proxy: ProxySettings,
    pub prompts: PromptSettings,
    pub transcript: TranscriptSettings,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Name advertised in the MCP `initialize` response.
    pub name: String,
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            name: "yt-mcp".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// OAuth settings for the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// Identity provider domain, e.g. `example.us.auth0.com`.
    pub domain: Option<String>,
    /// Public URL of this resource server.
    pub resource_server_url: Option<String>,
    /// Expected `aud` claim. Audience is not checked when unset.
    pub audience: Option<String>,
    pub required_scopes: Vec<String>,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            domain: None,
            resource_server_url: None,
            audience: None,
            required_scopes: DEFAULT_REQUIRED_SCOPES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Auth settings after startup validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAuth {
    pub domain: String,
    /// `https://<domain>/`
    pub issuer_url: String,
    pub resource_server_url: String,
    pub audience: Option<String>,
    pub required_scopes: Vec<String>,
}

impl AuthSettings {
    /// Check the values the server cannot start without.
    pub fn resolve(&self) -> Result<ResolvedAuth> {
        let domain = non_empty(&self.domain).ok_or_else(|| {
            YtMcpError::ConfigurationMissing(
                "AUTH0_DOMAIN environment variable is required".to_string(),
            )
        })?;
        let resource_server_url = non_empty(&self.resource_server_url).ok_or_else(|| {
            YtMcpError::ConfigurationMissing(
                "RESOURCE_SERVER_URL environment variable is required".to_string(),
            )
        })?;

        let domain = domain.trim_end_matches('/').to_string();
        let issuer_url = format!("https://{}/", domain);
        url::Url::parse(&issuer_url).map_err(|e| {
            YtMcpError::InvalidInput(format!("Invalid AUTH0_DOMAIN '{}': {}", domain, e))
        })?;
        url::Url::parse(resource_server_url).map_err(|e| {
            YtMcpError::InvalidInput(format!(
                "Invalid RESOURCE_SERVER_URL '{}': {}",
                resource_server_url, e
            ))
        })?;

        Ok(ResolvedAuth {
            domain,
            issuer_url,
            resource_server_url: resource_server_url.to_string(),
            audience: non_empty(&self.audience).map(str::to_string),
            required_scopes: self.required_scopes.clone(),
        })
    }
}

/// Outbound proxy used for every captions request.
///
/// These are optional at startup and only checked when a transcript is fetched.
#[derive(Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProxySettings {
    pub username: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    /// Proxy host and port, e.g. `proxy.example.com:80`.
    pub url: Option<String>,
}

impl std::fmt::Debug for ProxySettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxySettings")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("url", &self.url)
            .finish()
    }
}

impl ProxySettings {
    /// Assemble credentials for a single fetch.
    pub fn credentials(&self) -> Result<ProxyCredentials> {
        match (
            non_empty(&self.username),
            non_empty(&self.password),
            non_empty(&self.url),
        ) {
            (Some(username), Some(password), Some(base_url)) => Ok(ProxyCredentials {
                username: username.to_string(),
                password: password.to_string(),
                base_url: base_url.to_string(),
            }),
            _ => Err(YtMcpError::ConfigurationMissing(
                "Proxy credentials not configured. Set PROXY_USERNAME, PROXY_PASSWORD, \
                 and PROXY_URL environment variables."
                    .to_string(),
            )),
        }
    }
}

/// Credentials for one transcript fetch. Never stored.
#[derive(Clone, PartialEq)]
pub struct ProxyCredentials {
    pub username: String,
    pub password: String,
    pub base_url: String,
}

impl ProxyCredentials {
    /// Proxy URLs for plain and TLS traffic, credentials inline.
    pub fn endpoints(&self) -> ProxyEndpoints {
        let authority = format!("{}:{}@{}", self.username, self.password, self.base_url);
        ProxyEndpoints {
            http_url: format!("http://{}", authority),
            https_url: format!("https://{}", authority),
        }
    }
}

impl std::fmt::Debug for ProxyCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyCredentials")
            .field("username", &self.username)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Proxy URLs handed to the captions client.
#[derive(Clone, PartialEq)]
pub struct ProxyEndpoints {
    pub http_url: String,
    pub https_url: String,
}

impl std::fmt::Debug for ProxyEndpoints {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ProxyEndpoints { .. }")
    }
}

/// Instruction file settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PromptSettings {
    /// Directory holding `<name>.md` instruction files.
    /// Defaults to `prompts/` next to the installed binary.
    pub dir: Option<String>,
}

impl PromptSettings {
    /// Resolve the prompts directory independently of the working directory.
    pub fn resolve_dir(&self) -> PathBuf {
        if let Some(dir) = non_empty(&self.dir) {
            return Settings::expand_path(dir);
        }

        let installed = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|p| p.join("prompts")))
            .filter(|p| p.is_dir());

        installed.unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("prompts"))
    }
}

/// Captions selection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptSettings {
    /// Caption languages in order of preference.
    pub languages: Vec<String>,
}

impl Default for TranscriptSettings {
    fn default() -> Self {
        Self {
            languages: vec!["en".to_string()],
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file and the process environment.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path (or the default location), then
    /// apply a `.env` file (found in the working directory or its parents)
    /// and the process environment on top. Process variables win.
    pub fn load_from(path: Option<&PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        let mut settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Settings::default()
        };

        match dotenvy::dotenv_iter() {
            Ok(vars) => settings.apply_dotenv(vars)?,
            Err(e) if e.not_found() => {}
            Err(e) => return Err(e.into()),
        }

        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Overlay values from `.env` file entries.
    fn apply_dotenv<I>(&mut self, vars: I) -> Result<()>
    where
        I: Iterator<Item = dotenvy::Result<(String, String)>>,
    {
        let vars = vars.collect::<dotenvy::Result<HashMap<String, String>>>()?;
        self.apply_env(|key| vars.get(key).cloned());
        Ok(())
    }

    /// Overlay values from environment variables.
    ///
    /// Takes a lookup function so tests can supply their own environment.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let set = |target: &mut Option<String>, key: &str| {
            if let Some(value) = lookup(key) {
                *target = Some(value);
            }
        };

        set(&mut self.auth.domain, "AUTH0_DOMAIN");
        set(&mut self.auth.resource_server_url, "RESOURCE_SERVER_URL");
        set(&mut self.auth.audience, "AUTH0_AUDIENCE");
        set(&mut self.proxy.username, "PROXY_USERNAME");
        set(&mut self.proxy.password, "PROXY_PASSWORD");
        set(&mut self.proxy.url, "PROXY_URL");
        set(&mut self.prompts.dir, "PROMPTS_DIR");

        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ytmcp")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
