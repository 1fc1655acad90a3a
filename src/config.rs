use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use anyhow::{Result, anyhow};

/// What the header button does, collapsing the widget variants that
/// shipped with minimize-only or dismiss-only behavior.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CloseStyle {
    Minimize,
    Dismiss,
}

/// Cosmetic knobs that differed between the widget variants
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct WidgetOptions {
    pub close_style: CloseStyle,
    /// Input box auto-resize bounds, in rows
    pub resize_min_rows: u16,
    pub resize_max_rows: u16,
    /// Delay before the welcome greeting appears
    pub welcome_delay_ms: u64,
}

impl Default for WidgetOptions {
    fn default() -> Self {
        Self {
            close_style: CloseStyle::Minimize,
            resize_min_rows: 1,
            resize_max_rows: 3,
            welcome_delay_ms: 300,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    /// Where the widget posts its messages
    pub relay_url: String,
    /// Where the relay forwards them
    pub upstream_url: String,
    /// Bound on the relay's upstream call (deployments ran 15-45s)
    pub upstream_timeout_secs: u64,
    pub locale: Option<String>,
    /// Shared anti-forgery token; None disables the check
    pub token: Option<String>,
    #[serde(default)]
    pub widget: WidgetOptions,
}

impl Config {
    pub fn new() -> Self {
        Self {
            relay_url: "http://127.0.0.1:8090/chat".to_string(),
            upstream_url: "http://127.0.0.1:8000/chat".to_string(),
            upstream_timeout_secs: 30,
            locale: None,
            token: None,
            widget: WidgetOptions::default(),
        }
    }

    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(&config_path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;

        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, config_content)?;
        Ok(())
    }

    /// Env var wins over the config file, same as API keys elsewhere
    pub fn resolved_token(&self) -> Option<String> {
        std::env::var("SOUQCOOM_TOKEN").ok().or_else(|| self.token.clone())
    }

    fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("souqcoom-support").join("config.json"))
    }
}
