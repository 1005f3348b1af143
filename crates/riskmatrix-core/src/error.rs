//! Error taxonomy for the risk matrix engine.
//!
//! Only `MatrixConfigError` and `ParseLevelError` are meant to reach callers
//! directly. The others are produced internally, logged, and pre-resolved
//! into a safe value (neutral color, built-in matrix) before leaving the
//! engine.

use thiserror::Error;

use crate::tenant::TenantId;

/// A color string that is neither `#rrggbb` nor `h s% l%`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ColorError {
    #[error("invalid color format: {input:?}")]
    InvalidColorFormat { input: String },
}

impl ColorError {
    pub(crate) fn invalid(input: &str) -> Self {
        ColorError::InvalidColorFormat {
            input: input.to_string(),
        }
    }
}

/// Failure reported by a tenant settings source.
///
/// The resolver treats every variant as "no customization".
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigFetchError {
    #[error("tenant settings unavailable for {tenant}: {reason}")]
    Unavailable { tenant: TenantId, reason: String },

    #[error("tenant settings malformed for {tenant}: {reason}")]
    Malformed { tenant: TenantId, reason: String },
}

/// A `MatrixConfig` reached classification without a contiguous,
/// exhaustive threshold table.
///
/// Fatal to the whole configuration: no score is classified against it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("malformed {dimension}x{dimension} matrix configuration: {cause}")]
pub struct ThresholdGapError {
    pub dimension: u8,
    pub cause: MatrixConfigError,
}

/// Reasons a threshold table is rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MatrixConfigError {
    #[error("unsupported matrix dimension {0}; expected 3, 4 or 5")]
    UnsupportedDimension(i64),

    #[error("expected {expected} thresholds for this dimension, found {found}")]
    LevelCount { expected: usize, found: usize },

    #[error("threshold levels must be {expected:?} in order, found {found:?}")]
    LevelSet { expected: Vec<String>, found: Vec<String> },

    #[error("threshold for {level} has min score {min} above max score {max}")]
    InvertedRange { level: String, min: u32, max: u32 },

    #[error("scores {from}..={to} are not covered by any threshold")]
    Gap { from: u32, to: u32 },

    #[error("score {score} is covered by more than one threshold")]
    Overlap { score: u32 },

    #[error("thresholds must start at 1 and end at {max_score}, found {first}..={last}")]
    Bounds { first: u32, last: u32, max_score: u32 },

    #[error(transparent)]
    Level(#[from] ParseLevelError),

    #[error(transparent)]
    Color(#[from] ColorError),
}

/// An unknown risk level name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown risk level {0:?}")]
pub struct ParseLevelError(pub String);
