use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::classify::ClassificationResult;
use crate::classify::score::{classify_checked, usable_config};
use crate::error::MatrixConfigError;
use crate::matrix::defaults::builtin_thresholds;
use crate::matrix::level::{MatrixDimension, RiskLevel};
use crate::matrix::threshold::{LevelThreshold, validate_thresholds};

/// Where an effective configuration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConfigSource {
    TenantCustom,
    InheritedDefault,
}

/// Effective matrix configuration for one tenant.
///
/// Built fresh on each resolution. Fields are public so stored or
/// deserialized configurations can be inspected; `new` is the validating
/// constructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixConfig {
    pub dimension: MatrixDimension,
    pub thresholds: Vec<LevelThreshold>,
    pub source: ConfigSource,
}

impl MatrixConfig {
    pub fn new(
        dimension: MatrixDimension,
        thresholds: Vec<LevelThreshold>,
        source: ConfigSource,
    ) -> Result<Self, MatrixConfigError> {
        validate_thresholds(dimension, &thresholds)?;
        Ok(Self {
            dimension,
            thresholds,
            source,
        })
    }

    /// The built-in table for `dimension`, tagged as inherited.
    pub fn builtin(dimension: MatrixDimension) -> Self {
        Self {
            dimension,
            thresholds: builtin_thresholds(dimension),
            source: ConfigSource::InheritedDefault,
        }
    }

    pub fn validate(&self) -> Result<(), MatrixConfigError> {
        validate_thresholds(self.dimension, &self.thresholds)
    }

    /// Levels in matrix order, lowest first.
    pub fn levels(&self) -> impl Iterator<Item = RiskLevel> + '_ {
        self.thresholds.iter().map(|t| t.level)
    }

    pub fn threshold_for_score(&self, score: u32) -> Option<&LevelThreshold> {
        self.thresholds.iter().find(|t| t.contains(score))
    }

    pub fn threshold_for_level(&self, level: RiskLevel) -> Option<&LevelThreshold> {
        self.thresholds.iter().find(|t| t.level == level)
    }

    pub fn level_for_score(&self, score: u32) -> Option<RiskLevel> {
        self.threshold_for_score(score).map(|t| t.level)
    }

    /// Every cell of the matrix, row-major with the highest-impact row first.
    ///
    /// `grid()[row][col]` has `position == { row, col }`. A malformed table
    /// yields the built-in grid of the same dimension.
    pub fn grid(&self) -> Vec<Vec<ClassificationResult>> {
        let config = usable_config(self);
        let size = i32::from(self.dimension.size());
        (0..size)
            .map(|row| {
                let impact = size - row;
                (1..=size)
                    .map(|probability| classify_checked(probability, impact, &config))
                    .collect()
            })
            .collect()
    }

    /// SHA-256 over the canonical form of the table.
    ///
    /// Equal fingerprints mean every surface would classify and color
    /// identically under either configuration.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update([self.dimension.size()]);
        for t in &self.thresholds {
            hasher.update(
                format!(
                    "{}|{}|{}|{}|{}\n",
                    t.level.name(),
                    t.min_score,
                    t.max_score,
                    t.color.to_hex(),
                    t.label
                )
                .as_bytes(),
            );
        }
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Position;
    use crate::color::ColorValue;

    #[test]
    fn builtin_is_inherited_and_valid() {
        for dimension in MatrixDimension::ALL {
            let config = MatrixConfig::builtin(dimension);
            assert_eq!(config.source, ConfigSource::InheritedDefault);
            assert_eq!(config.validate(), Ok(()));
            assert_eq!(config.levels().collect::<Vec<_>>(), dimension.levels());
        }
    }

    #[test]
    fn new_rejects_malformed_tables() {
        let mut thresholds = builtin_thresholds(MatrixDimension::Three);
        thresholds[1].min_score = 4;
        let err = MatrixConfig::new(MatrixDimension::Three, thresholds, ConfigSource::TenantCustom);
        assert_eq!(err, Err(MatrixConfigError::Gap { from: 3, to: 3 }));
    }

    #[test]
    fn level_lookup_by_score() {
        let config = MatrixConfig::builtin(MatrixDimension::Five);
        assert_eq!(config.level_for_score(1), Some(RiskLevel::VeryLow));
        assert_eq!(config.level_for_score(8), Some(RiskLevel::Medium));
        assert_eq!(config.level_for_score(25), Some(RiskLevel::VeryHigh));
        assert_eq!(config.level_for_score(26), None);
        assert_eq!(config.level_for_score(0), None);
    }

    #[test]
    fn grid_puts_highest_impact_on_top() {
        let config = MatrixConfig::builtin(MatrixDimension::Four);
        let grid = config.grid();

        assert_eq!(grid.len(), 4);
        assert!(grid.iter().all(|row| row.len() == 4));

        // top-right: probability 4, impact 4
        assert_eq!(grid[0][3].score, 16);
        assert_eq!(grid[0][3].level, RiskLevel::VeryHigh);
        // bottom-left: probability 1, impact 1
        assert_eq!(grid[3][0].score, 1);
        assert_eq!(grid[3][0].level, RiskLevel::Low);

        for (row, cells) in grid.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                assert_eq!(
                    cell.position,
                    Position {
                        row: row as u8,
                        col: col as u8
                    }
                );
            }
        }
    }

    #[test]
    fn malformed_table_grids_as_builtin() {
        let mut broken = MatrixConfig::builtin(MatrixDimension::Three);
        broken.thresholds[1].min_score = 4;
        broken.thresholds[1].color = ColorValue::hex(0, 0, 0);

        assert_eq!(broken.grid(), MatrixConfig::builtin(MatrixDimension::Three).grid());
    }

    #[test]
    fn fingerprint_tracks_visible_changes() {
        let base = MatrixConfig::builtin(MatrixDimension::Four);
        assert_eq!(base.fingerprint(), MatrixConfig::builtin(MatrixDimension::Four).fingerprint());
        assert_eq!(base.fingerprint().len(), 64);

        let mut recolored = base.clone();
        recolored.thresholds[0].color = ColorValue::hex(0, 0, 0xff);
        assert_ne!(base.fingerprint(), recolored.fingerprint());

        let mut relabeled = base.clone();
        relabeled.thresholds[3].label = "Crítico".into();
        assert_ne!(base.fingerprint(), relabeled.fingerprint());

        assert_ne!(
            base.fingerprint(),
            MatrixConfig::builtin(MatrixDimension::Five).fingerprint()
        );
    }

    #[test]
    fn fingerprint_ignores_color_notation() {
        let base = MatrixConfig::builtin(MatrixDimension::Three);
        let mut as_hsl = base.clone();
        for t in &mut as_hsl.thresholds {
            t.color = ColorValue::Hsl(t.color.to_hsl());
        }
        assert_eq!(base.fingerprint(), as_hsl.fingerprint());
    }

    #[test]
    fn serializes_source_kebab_case() {
        let json = serde_json::to_value(MatrixConfig::builtin(MatrixDimension::Three)).unwrap();
        assert_eq!(json["source"], "inherited-default");
        assert_eq!(json["dimension"], 3);
        assert_eq!(json["thresholds"][0]["level"], "LOW");
        assert_eq!(json["thresholds"][0]["color"], "#22c55e");
    }
}
