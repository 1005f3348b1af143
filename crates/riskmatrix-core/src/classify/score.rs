//! Score classification for a single risk.
//!
//! This module turns a `(probability, impact)` pair into a score, a level,
//! a matrix cell and a color under a resolved `MatrixConfig`.
//!
//! Responsibilities:
//! - Clamp axis values into `1..=dimension`
//! - Compute the score as `probability × impact`
//! - Reject a malformed threshold table as a whole
//! - Find the threshold containing the score
//! - Map the pair onto a grid cell with the highest impact on the top row
//!
//! Non-responsibilities:
//! - Resolving tenant configuration (handled in `resolve`)
//! - Counting risks per level (handled in `classify::aggregate`)
//!
//! The scoring law is fixed; tenants only move the threshold boundaries.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::color::ColorValue;
use crate::error::ThresholdGapError;
use crate::matrix::defaults::builtin_threshold;
use crate::matrix::{LevelThreshold, MatrixConfig, MatrixDimension, RiskLevel};

/// Zero-based grid cell. Row 0 is the highest-impact row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

/// Outcome of classifying one risk. Never mutated after creation; a changed
/// configuration means classifying again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub score: u32,
    pub level: RiskLevel,
    pub label: String,
    pub position: Position,
    pub color: ColorValue,
}

/// Axis values after clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    probability: u8,
    impact: u8,
}

impl Cell {
    fn clamped(probability: i32, impact: i32, dimension: MatrixDimension) -> Self {
        let max = i32::from(dimension.size());
        // Both values fit in u8 once clamped to 1..=5.
        Self {
            probability: probability.clamp(1, max) as u8,
            impact: impact.clamp(1, max) as u8,
        }
    }

    fn score(self) -> u32 {
        u32::from(self.probability) * u32::from(self.impact)
    }

    fn position(self, dimension: MatrixDimension) -> Position {
        Position {
            row: dimension.size() - self.impact,
            col: self.probability - 1,
        }
    }

    fn result(self, dimension: MatrixDimension, threshold: &LevelThreshold) -> ClassificationResult {
        ClassificationResult {
            score: self.score(),
            level: threshold.level,
            label: threshold.label.clone(),
            position: self.position(dimension),
            color: threshold.color,
        }
    }
}

/// `config` if its threshold table is well-formed, else the reason it is not.
pub fn checked_config(config: &MatrixConfig) -> Result<&MatrixConfig, ThresholdGapError> {
    config.validate().map_err(|cause| ThresholdGapError {
        dimension: config.dimension.size(),
        cause,
    })?;
    Ok(config)
}

/// `config` if it is well-formed, otherwise the built-in table of the same
/// dimension in its place.
///
/// A malformed table is rejected as a whole and logged once per call, so
/// callers classifying many risks should resolve it once up front.
pub fn usable_config(config: &MatrixConfig) -> Cow<'_, MatrixConfig> {
    match checked_config(config) {
        Ok(config) => Cow::Borrowed(config),
        Err(gap) => {
            error!(
                error = %gap,
                dimension = config.dimension.size(),
                source = ?config.source,
                "malformed matrix configuration; classifying with built-in default"
            );
            Cow::Owned(MatrixConfig::builtin(config.dimension))
        }
    }
}

/// Classify strictly against `config`.
///
/// Out-of-range axis values are clamped, never rejected. A configuration
/// whose thresholds leave a gap, overlap or miss a level is reported as
/// [`ThresholdGapError`] whatever the score.
pub fn try_classify(
    probability: i32,
    impact: i32,
    config: &MatrixConfig,
) -> Result<ClassificationResult, ThresholdGapError> {
    let config = checked_config(config)?;
    Ok(classify_checked(probability, impact, config))
}

/// Classify against `config`, or against the built-in table of the same
/// dimension if `config` is malformed.
///
/// The rejection is logged for operators; the caller always gets a usable
/// result.
pub fn classify(probability: i32, impact: i32, config: &MatrixConfig) -> ClassificationResult {
    classify_checked(probability, impact, &usable_config(config))
}

/// Classify against a configuration that already passed validation.
pub(crate) fn classify_checked(
    probability: i32,
    impact: i32,
    config: &MatrixConfig,
) -> ClassificationResult {
    let cell = Cell::clamped(probability, impact, config.dimension);
    match config.threshold_for_score(cell.score()) {
        Some(threshold) => cell.result(config.dimension, threshold),
        // Validated tables cover every score exactly once.
        None => cell.result(
            config.dimension,
            &builtin_threshold(config.dimension, cell.score()),
        ),
    }
}
