//! Matrix shape, levels and threshold tables.

pub mod config;
pub mod defaults;
pub mod level;
pub mod threshold;

pub use config::{ConfigSource, MatrixConfig};
pub use level::{MatrixDimension, RiskLevel};
pub use threshold::{LevelThreshold, validate_thresholds};
