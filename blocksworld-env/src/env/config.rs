//! Configuration of [`BlocksWorldMatrixEnv`](super::BlocksWorldMatrixEnv).
use crate::{BlocksWorldError, WorldConfig};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`BlocksWorldMatrixEnv`](super::BlocksWorldMatrixEnv).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
#[serde(default)]
pub struct BlocksWorldMatrixEnvConfig {
    /// Number of rows of the grid.
    pub height: usize,

    /// Number of columns of the grid.
    pub width: usize,

    /// Number of blocks.
    pub num_blocks: usize,

    /// Number of block colors. With a single color only column heights matter.
    pub num_colors: usize,

    /// Maximum number of blocks in a tower of the initial and target layouts.
    pub max_tower_height: usize,

    /// Episodes are truncated after this number of steps.
    pub num_steps_cutoff: usize,
}

impl Default for BlocksWorldMatrixEnvConfig {
    fn default() -> Self {
        Self {
            height: 10,
            width: 10,
            num_blocks: 10,
            num_colors: 1,
            max_tower_height: 3,
            num_steps_cutoff: 50,
        }
    }
}

impl BlocksWorldMatrixEnvConfig {
    /// Sets the number of rows.
    pub fn height(mut self, v: usize) -> Self {
        self.height = v;
        self
    }

    /// Sets the number of columns.
    pub fn width(mut self, v: usize) -> Self {
        self.width = v;
        self
    }

    /// Sets the number of blocks.
    pub fn num_blocks(mut self, v: usize) -> Self {
        self.num_blocks = v;
        self
    }

    /// Sets the number of colors.
    pub fn num_colors(mut self, v: usize) -> Self {
        self.num_colors = v;
        self
    }

    /// Sets the maximum tower height of generated layouts.
    pub fn max_tower_height(mut self, v: usize) -> Self {
        self.max_tower_height = v;
        self
    }

    /// Sets the episode length limit.
    pub fn num_steps_cutoff(mut self, v: usize) -> Self {
        self.num_steps_cutoff = v;
        self
    }

    /// `true` if blocks are interchangeable.
    pub fn is_colorless(&self) -> bool {
        self.num_colors == 1
    }

    /// Number of blocks per generated tower.
    ///
    /// Towers leave one free row under the ceiling for the agent and one more
    /// for the block it may carry.
    pub fn tower_height(&self) -> usize {
        self.max_tower_height.min(self.height.saturating_sub(2))
    }

    /// Checks that layouts can be generated from this configuration.
    pub fn validate(&self) -> Result<(), BlocksWorldError> {
        let invalid = |msg: String| Err(BlocksWorldError::InvalidConfig(msg));

        if self.height < 3 {
            return invalid(format!("height must be at least 3, got {}", self.height));
        }
        if self.width == 0 {
            return invalid("width must be positive".to_string());
        }
        if self.num_blocks == 0 {
            return invalid("num_blocks must be positive".to_string());
        }
        if self.num_colors == 0 || self.num_colors > self.num_blocks {
            return invalid(format!(
                "num_colors must be in 1..={}, got {}",
                self.num_blocks, self.num_colors
            ));
        }
        if self.max_tower_height == 0 {
            return invalid("max_tower_height must be positive".to_string());
        }
        if self.num_steps_cutoff == 0 {
            return invalid("num_steps_cutoff must be positive".to_string());
        }

        let num_towers = (self.num_blocks + self.tower_height() - 1) / self.tower_height();
        if num_towers > self.width {
            return invalid(format!(
                "{} blocks in towers of {} need {} columns, the grid has {}",
                self.num_blocks,
                self.tower_height(),
                num_towers,
                self.width
            ));
        }
        Ok(())
    }

    pub(super) fn world_config(&self, is_agent_present: bool) -> WorldConfig {
        WorldConfig::default()
            .size(self.width, self.height)
            .max_num_blocks(self.num_blocks)
            .agent(is_agent_present)
            .colorless(self.is_colorless())
    }

    /// Constructs [`BlocksWorldMatrixEnvConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let config: Self = serde_yaml::from_reader(rdr)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves [`BlocksWorldMatrixEnvConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
