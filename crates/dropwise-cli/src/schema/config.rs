use std::path::Path;

use anyhow::Context as _;
use dropwise_engine::EnvConfig;
use dropwise_planner::{HeuristicEvaluator, HeuristicWeights, Planner, PlannerConfig};
use serde::{Deserialize, Serialize};

use crate::util;

/// Settings read from the `--config` file. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub weights: HeuristicWeights,
    pub planner: PlannerConfig,
    pub environment: EnvConfig,
}

impl Config {
    /// Reads the config file, or returns the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let config: Self = util::read_json_file("config", path)?;
        config
            .environment
            .validate()
            .with_context(|| format!("Invalid environment in config file: {}", path.display()))?;
        tracing::debug!(?config, path = %path.display(), "config loaded");
        Ok(config)
    }

    #[must_use]
    pub fn planner(&self) -> Planner {
        Planner::new(Box::new(HeuristicEvaluator::new(self.weights)), self.planner)
    }
}
