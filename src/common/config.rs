use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::layout_engine::Direction;

/// Tunables for a tree layout engine. All fields have defaults so a partial
/// (or empty) config file is valid.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct LayoutSettings {
    /// Smallest fraction of a split an interactive resize may leave a slot
    /// with. Keeps a drag from collapsing a window to nothing.
    #[serde(default = "default_min_weight")]
    pub min_weight: f64,
    /// Side on which newly added windows attach when no direction is given.
    #[serde(default = "default_direction")]
    pub default_direction: Direction,
}

fn default_min_weight() -> f64 { 0.05 }

fn default_direction() -> Direction { Direction::Right }

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            min_weight: default_min_weight(),
            default_direction: default_direction(),
        }
    }
}

impl LayoutSettings {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if !(0.0..0.5).contains(&self.min_weight) {
            issues.push(format!(
                "min_weight must be in [0, 0.5), got {}",
                self.min_weight
            ));
        }
        issues
    }

    pub fn read(path: &Path) -> anyhow::Result<LayoutSettings> {
        let buf = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&buf)
    }

    pub fn parse(buf: &str) -> anyhow::Result<LayoutSettings> {
        let settings: LayoutSettings = toml::from_str(buf)?;
        let issues = settings.validate();
        if !issues.is_empty() {
            anyhow::bail!("invalid layout settings: {}", issues.join("; "));
        }
        Ok(settings)
    }
}
