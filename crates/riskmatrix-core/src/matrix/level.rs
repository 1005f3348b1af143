use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MatrixConfigError, ParseLevelError};

/// Ordered risk level. Ordering is semantic: `VeryLow < ... < VeryHigh`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 5] = [
        RiskLevel::VeryLow,
        RiskLevel::Low,
        RiskLevel::Medium,
        RiskLevel::High,
        RiskLevel::VeryHigh,
    ];

    /// Canonical display name.
    pub fn name(self) -> &'static str {
        match self {
            RiskLevel::VeryLow => "Very Low",
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::VeryHigh => "Very High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RiskLevel {
    type Err = ParseLevelError;

    /// Accepts display names, snake/kebab/screaming forms, and `critical`
    /// as an alias for the top level.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "verylow" => Ok(RiskLevel::VeryLow),
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            "veryhigh" | "critical" => Ok(RiskLevel::VeryHigh),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

/// Number of buckets per matrix axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum MatrixDimension {
    Three,
    #[default]
    Four,
    Five,
}

impl MatrixDimension {
    pub const ALL: [MatrixDimension; 3] = [
        MatrixDimension::Three,
        MatrixDimension::Four,
        MatrixDimension::Five,
    ];

    pub fn new(size: i64) -> Result<Self, MatrixConfigError> {
        match size {
            3 => Ok(MatrixDimension::Three),
            4 => Ok(MatrixDimension::Four),
            5 => Ok(MatrixDimension::Five),
            other => Err(MatrixConfigError::UnsupportedDimension(other)),
        }
    }

    /// Axis length.
    pub fn size(self) -> u8 {
        match self {
            MatrixDimension::Three => 3,
            MatrixDimension::Four => 4,
            MatrixDimension::Five => 5,
        }
    }

    /// Highest reachable score, `size²`.
    pub fn max_score(self) -> u32 {
        let size = u32::from(self.size());
        size * size
    }

    /// Canonical level set, lowest first. Its length equals `size()`.
    pub fn levels(self) -> &'static [RiskLevel] {
        match self {
            MatrixDimension::Three => &[RiskLevel::Low, RiskLevel::Medium, RiskLevel::High],
            MatrixDimension::Four => &[
                RiskLevel::Low,
                RiskLevel::Medium,
                RiskLevel::High,
                RiskLevel::VeryHigh,
            ],
            MatrixDimension::Five => &RiskLevel::ALL,
        }
    }
}

impl fmt::Display for MatrixDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{0}x{0}", self.size())
    }
}

impl TryFrom<u8> for MatrixDimension {
    type Error = MatrixConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        MatrixDimension::new(i64::from(value))
    }
}

impl From<MatrixDimension> for u8 {
    fn from(value: MatrixDimension) -> Self {
        value.size()
    }
}
