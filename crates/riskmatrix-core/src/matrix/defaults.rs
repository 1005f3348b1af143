//! Built-in matrix tables used when a tenant has no customization.
//!
//! Scores are `probability × impact` on 1-indexed axes.

use crate::color::ColorValue;
use crate::matrix::level::{MatrixDimension, RiskLevel};
use crate::matrix::threshold::LevelThreshold;

const BOUNDS_3X3: [(RiskLevel, u32, u32); 3] = [
    (RiskLevel::Low, 1, 2),
    (RiskLevel::Medium, 3, 6),
    (RiskLevel::High, 7, 9),
];

const BOUNDS_4X4: [(RiskLevel, u32, u32); 4] = [
    (RiskLevel::Low, 1, 2),
    (RiskLevel::Medium, 3, 6),
    (RiskLevel::High, 7, 9),
    (RiskLevel::VeryHigh, 10, 16),
];

const BOUNDS_5X5: [(RiskLevel, u32, u32); 5] = [
    (RiskLevel::VeryLow, 1, 2),
    (RiskLevel::Low, 3, 4),
    (RiskLevel::Medium, 5, 8),
    (RiskLevel::High, 9, 16),
    (RiskLevel::VeryHigh, 17, 25),
];

fn bounds(dimension: MatrixDimension) -> &'static [(RiskLevel, u32, u32)] {
    match dimension {
        MatrixDimension::Three => &BOUNDS_3X3,
        MatrixDimension::Four => &BOUNDS_4X4,
        MatrixDimension::Five => &BOUNDS_5X5,
    }
}

/// Swatch used for a level unless the tenant overrides it.
pub fn default_color(level: RiskLevel) -> ColorValue {
    match level {
        RiskLevel::VeryLow => ColorValue::hex(0x15, 0x80, 0x3d),
        RiskLevel::Low => ColorValue::hex(0x22, 0xc5, 0x5e),
        RiskLevel::Medium => ColorValue::hex(0xea, 0xb3, 0x08),
        RiskLevel::High => ColorValue::hex(0xf9, 0x73, 0x16),
        RiskLevel::VeryHigh => ColorValue::hex(0xdc, 0x26, 0x26),
    }
}

pub fn builtin_thresholds(dimension: MatrixDimension) -> Vec<LevelThreshold> {
    bounds(dimension)
        .iter()
        .map(|&(level, min, max)| LevelThreshold::new(level, min, max, default_color(level)))
        .collect()
}

/// Built-in threshold for a score, clamped into `1..=dimension²`.
///
/// Infallible: used as the last resort when a configuration turns out to
/// be malformed.
pub fn builtin_threshold(dimension: MatrixDimension, score: u32) -> LevelThreshold {
    let table = bounds(dimension);
    let score = score.clamp(1, dimension.max_score());
    let index = table
        .iter()
        .position(|&(_, _, max)| score <= max)
        .unwrap_or(table.len() - 1);
    let (level, min, max) = table[index];
    LevelThreshold::new(level, min, max, default_color(level))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_score_matches_exactly_one_builtin_threshold() {
        for dimension in MatrixDimension::ALL {
            let thresholds = builtin_thresholds(dimension);
            for score in 1..=dimension.max_score() {
                let matches = thresholds.iter().filter(|t| t.contains(score)).count();
                assert_eq!(matches, 1, "{dimension} score {score}");
            }
        }
    }

    #[test]
    fn builtin_threshold_agrees_with_table() {
        for dimension in MatrixDimension::ALL {
            let thresholds = builtin_thresholds(dimension);
            for score in 1..=dimension.max_score() {
                let expected = thresholds.iter().find(|t| t.contains(score)).unwrap();
                assert_eq!(&builtin_threshold(dimension, score), expected);
            }
        }
    }

    #[test]
    fn builtin_threshold_clamps_out_of_range_scores() {
        assert_eq!(
            builtin_threshold(MatrixDimension::Four, 0).level,
            RiskLevel::Low
        );
        assert_eq!(
            builtin_threshold(MatrixDimension::Four, 99).level,
            RiskLevel::VeryHigh
        );
    }

    #[test]
    fn four_by_four_tops_out_at_very_high() {
        let top = builtin_thresholds(MatrixDimension::Four).pop().unwrap();
        assert_eq!(top.level, RiskLevel::VeryHigh);
        assert_eq!(top.label, "Very High");
        assert_eq!((top.min_score, top.max_score), (10, 16));
    }
}
