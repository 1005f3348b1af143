use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classify::score::{classify_checked, usable_config};
use crate::matrix::{MatrixConfig, RiskLevel};

/// A risk record as it reaches the engine. Draft records may lack either
/// axis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub probability: Option<i32>,
    #[serde(default)]
    pub impact: Option<i32>,
}

impl RiskInput {
    pub fn new(probability: i32, impact: i32) -> Self {
        Self {
            id: None,
            probability: Some(probability),
            impact: Some(impact),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// `(probability, impact)` when both are present.
    pub fn axes(&self) -> Option<(i32, i32)> {
        self.probability.zip(self.impact)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCount {
    pub level: RiskLevel,
    pub label: String,
    pub count: u64,
}

/// Risk counts per level, in the configuration's level order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDistribution {
    pub counts: Vec<LevelCount>,
    /// Records skipped for missing probability or impact.
    pub skipped: u64,
}

impl LevelDistribution {
    fn zeroed(config: &MatrixConfig) -> Self {
        Self {
            counts: config
                .thresholds
                .iter()
                .map(|t| LevelCount {
                    level: t.level,
                    label: t.label.clone(),
                    count: 0,
                })
                .collect(),
            skipped: 0,
        }
    }

    pub fn count(&self, level: RiskLevel) -> u64 {
        self.counts
            .iter()
            .find(|c| c.level == level)
            .map_or(0, |c| c.count)
    }

    /// Number of classified (not skipped) records.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|c| c.count).sum()
    }

    pub fn as_map(&self) -> BTreeMap<RiskLevel, u64> {
        self.counts.iter().map(|c| (c.level, c.count)).collect()
    }
}

/// Count `risks` per level of `config`.
///
/// Every level of `config` appears, zero-filled. The result depends only on
/// the multiset of inputs, not their order. A malformed `config` is replaced
/// by the built-in table of its dimension for the whole register.
pub fn aggregate(risks: &[RiskInput], config: &MatrixConfig) -> LevelDistribution {
    let config = usable_config(config);
    let mut distribution = LevelDistribution::zeroed(&config);

    for risk in risks {
        let Some((probability, impact)) = risk.axes() else {
            distribution.skipped += 1;
            continue;
        };

        let level = classify_checked(probability, impact, &config).level;
        if let Some(slot) = distribution.counts.iter_mut().find(|c| c.level == level) {
            slot.count += 1;
        }
    }

    debug!(
        classified = distribution.total(),
        skipped = distribution.skipped,
        "aggregated risk register"
    );
    distribution
}
