use crate::registry::Registry;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct Config {
    // Registry data
    pub registry_path: Option<PathBuf>,

    // Locale override for from-locale without an argument
    pub locale: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            registry_path: std::env::var("LANGTAG_REGISTRY")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            locale: std::env::var("LANGTAG_LOCALE").ok().filter(|v| !v.is_empty()),
        })
    }

    /// Load the registry named by `LANGTAG_REGISTRY`, or the embedded one.
    pub fn load_registry(&self) -> Result<Registry> {
        match &self.registry_path {
            Some(path) => {
                info!("Loading registry from {}", path.display());
                Registry::from_path(path)
                    .with_context(|| format!("Failed to load registry {}", path.display()))
            }
            None => Registry::builtin().context("Failed to load embedded registry"),
        }
    }

    /// Locale to convert when none is given explicitly.
    pub fn locale_name(&self) -> String {
        self.locale
            .clone()
            .unwrap_or_else(crate::locale::current_locale_name)
    }
}
