pub mod aggregate;
pub mod score;

pub use aggregate::{LevelCount, LevelDistribution, RiskInput, aggregate};
pub use score::{
    ClassificationResult, Position, checked_config, classify, try_classify, usable_config,
};
