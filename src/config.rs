//! Backend connection settings
//!
//! Read from `~/.shiptrack/config.yaml` when present, then overridden by
//! environment variables.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_TABLE, ENV_SUPABASE_ANON_KEY, ENV_SUPABASE_URL,
    ENV_TABLE,
};

/// On-disk shape; every key is optional so env vars can fill the gaps
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    supabase_url: Option<String>,
    anon_key: Option<String>,
    table: Option<String>,
}

/// Resolved settings for the backend client
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub supabase_url: String,
    pub anon_key: String,
    pub table: String,
}

impl Config {
    /// Load from the default config file and the process environment
    pub fn load() -> Result<Self> {
        let path = default_config_path();
        Self::from_sources(path.as_deref(), |key| std::env::var(key).ok())
    }

    /// Merge an optional YAML file with an environment lookup.
    /// Environment values win over file values.
    pub fn from_sources<F>(path: Option<&Path>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = match path {
            Some(p) if p.exists() => {
                let raw = fs::read_to_string(p)
                    .with_context(|| format!("reading {}", p.display()))?;
                serde_yaml::from_str::<FileConfig>(&raw)
                    .with_context(|| format!("parsing {}", p.display()))?
            }
            _ => FileConfig::default(),
        };

        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        let supabase_url = non_empty(env(ENV_SUPABASE_URL)).or(non_empty(file.supabase_url));
        let anon_key = non_empty(env(ENV_SUPABASE_ANON_KEY)).or(non_empty(file.anon_key));
        let table = non_empty(env(ENV_TABLE))
            .or(non_empty(file.table))
            .unwrap_or_else(|| DEFAULT_TABLE.to_string());

        let Some(supabase_url) = supabase_url else {
            bail!("missing backend URL: set {} or supabase_url in the config file", ENV_SUPABASE_URL);
        };
        let Some(anon_key) = anon_key else {
            bail!("missing API key: set {} or anon_key in the config file", ENV_SUPABASE_ANON_KEY);
        };

        Ok(Config {
            supabase_url: supabase_url.trim().trim_end_matches('/').to_string(),
            anon_key: anon_key.trim().to_string(),
            table,
        })
    }
}

/// `~/.shiptrack/config.yaml`, if a home directory is known
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}
