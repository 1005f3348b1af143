use serde::{Deserialize, Serialize};

use crate::color::ColorValue;
use crate::error::MatrixConfigError;
use crate::matrix::level::{MatrixDimension, RiskLevel};

/// A contiguous, inclusive score range mapped to one level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelThreshold {
    pub level: RiskLevel,
    pub min_score: u32,
    pub max_score: u32,
    pub color: ColorValue,
    /// Display name; the canonical level name unless the tenant renamed it.
    pub label: String,
}

impl LevelThreshold {
    pub fn new(level: RiskLevel, min_score: u32, max_score: u32, color: ColorValue) -> Self {
        Self {
            level,
            min_score,
            max_score,
            color,
            label: level.name().to_string(),
        }
    }

    pub fn contains(&self, score: u32) -> bool {
        (self.min_score..=self.max_score).contains(&score)
    }
}

/// Check that `thresholds` partition `1..=dimension²` in level order.
///
/// The levels must be exactly the canonical set for `dimension`, lowest
/// first, so that every surface agrees on which levels exist.
pub fn validate_thresholds(
    dimension: MatrixDimension,
    thresholds: &[LevelThreshold],
) -> Result<(), MatrixConfigError> {
    let expected = dimension.levels();
    if thresholds.len() != expected.len() {
        return Err(MatrixConfigError::LevelCount {
            expected: expected.len(),
            found: thresholds.len(),
        });
    }

    let found: Vec<RiskLevel> = thresholds.iter().map(|t| t.level).collect();
    if found != expected {
        return Err(MatrixConfigError::LevelSet {
            expected: expected.iter().map(|l| l.name().to_string()).collect(),
            found: found.iter().map(|l| l.name().to_string()).collect(),
        });
    }

    for t in thresholds {
        if t.min_score > t.max_score {
            return Err(MatrixConfigError::InvertedRange {
                level: t.level.name().to_string(),
                min: t.min_score,
                max: t.max_score,
            });
        }
    }

    for pair in thresholds.windows(2) {
        let (lower, upper) = (&pair[0], &pair[1]);
        let next = lower.max_score + 1;
        if upper.min_score > next {
            return Err(MatrixConfigError::Gap {
                from: next,
                to: upper.min_score - 1,
            });
        }
        if upper.min_score < next {
            return Err(MatrixConfigError::Overlap {
                score: upper.min_score,
            });
        }
    }

    let first = thresholds[0].min_score;
    let last = thresholds[thresholds.len() - 1].max_score;
    if first != 1 || last != dimension.max_score() {
        return Err(MatrixConfigError::Bounds {
            first,
            last,
            max_score: dimension.max_score(),
        });
    }

    Ok(())
}
