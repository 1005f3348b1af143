use serde::{Deserialize, Serialize};

use crate::SCHEMA_VERSION;
use crate::classify::{ClassificationResult, LevelDistribution};
use crate::matrix::{ConfigSource, LevelThreshold, MatrixConfig, MatrixDimension, RiskLevel};
use crate::tenant::TenantId;
use crate::util::ordering::sort_classified_risks;

/// Assessment of one tenant's risk register under its effective matrix.
///
/// Deterministic for identical inputs and configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskReport {
    pub schema_version: String,
    pub tool: ToolInfo,
    pub tenant: TenantId,
    pub matrix: MatrixSummary,
    pub risks: Vec<ClassifiedRisk>,
    pub distribution: LevelDistribution,
}

impl RiskReport {
    /// Assemble a report; `risks` are sorted by score (highest first), then id.
    pub fn new(
        tool: ToolInfo,
        tenant: TenantId,
        config: &MatrixConfig,
        mut risks: Vec<ClassifiedRisk>,
        distribution: LevelDistribution,
    ) -> Self {
        sort_classified_risks(&mut risks);

        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            tool,
            tenant,
            matrix: MatrixSummary::from(config),
            risks,
            distribution,
        }
    }

    /// Highest level any classified risk reached.
    pub fn highest_level(&self) -> Option<RiskLevel> {
        self.risks.iter().map(|r| r.classification.level).max()
    }

    /// Whether any classified risk is at or above `level`.
    pub fn breaches(&self, level: RiskLevel) -> bool {
        self.highest_level().is_some_and(|highest| highest >= level)
    }
}

/// Tool metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

/// The matrix a report was produced under.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixSummary {
    pub dimension: MatrixDimension,
    pub source: ConfigSource,
    pub fingerprint: String,
    pub thresholds: Vec<LevelThreshold>,
}

impl From<&MatrixConfig> for MatrixSummary {
    fn from(config: &MatrixConfig) -> Self {
        Self {
            dimension: config.dimension,
            source: config.source,
            fingerprint: config.fingerprint(),
            thresholds: config.thresholds.clone(),
        }
    }
}

/// One risk record with its classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedRisk {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub classification: ClassificationResult,
}
