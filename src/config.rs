//! Runtime configuration.
//!
//! Layers, lowest first: built-in defaults, an optional YAML/TOML/JSON file,
//! then `AUTOAPPLY__*` environment variables (`__` separates nested keys,
//! e.g. `AUTOAPPLY__FLOW__RETRY_MS=1500`).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use autoapply_core_types::Portal;
use field_classifier::ClassifierDefaults;
use form_fill::FillPolicyView;
use submission_flow::FlowTiming;

pub const ENV_PREFIX: &str = "AUTOAPPLY";
pub const DEFAULT_CONFIG_PATH: &str = "config/autoapply.yaml";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub flow: FlowTiming,
    /// Search budget overrides keyed by portal key (`linkedin`, `naukri`, ...).
    pub search_budgets: BTreeMap<String, u32>,
    pub fill: FillPolicyView,
    pub classifier: ClassifierDefaults,
    pub notice_ttl_ms: u64,
    pub observer_start_delay_ms: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            flow: FlowTiming::default(),
            search_budgets: BTreeMap::new(),
            fill: FillPolicyView::default(),
            classifier: ClassifierDefaults::default(),
            notice_ttl_ms: 6000,
            observer_start_delay_ms: 2000,
        }
    }
}

impl RuntimeConfig {
    pub fn notice_ttl(&self) -> Duration {
        Duration::from_millis(self.notice_ttl_ms)
    }

    pub fn observer_start_delay(&self) -> Duration {
        Duration::from_millis(self.observer_start_delay_ms)
    }

    pub fn search_budget(&self, portal: Portal) -> Option<u32> {
        self.search_budgets.get(portal.key()).copied()
    }
}

pub struct LoadedConfig {
    pub config: RuntimeConfig,
    /// File consulted, whether or not it existed.
    pub path: PathBuf,
}

pub fn load_config(config_path: Option<&Path>) -> Result<LoadedConfig> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    if path.exists() {
        info!("Loading configuration from: {}", path.display());
    } else if config_path.is_some() {
        warn!("Config file not found, using defaults: {}", path.display());
    }

    let config: RuntimeConfig = Config::builder()
        .add_source(File::from(path.as_path()).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to read configuration sources")?
        .try_deserialize()
        .context("Failed to parse configuration")?;

    Ok(LoadedConfig { config, path })
}
