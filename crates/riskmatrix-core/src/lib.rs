//! Risk matrix classification engine.
//!
//! Turns `(probability, impact)` pairs into a score, level, grid cell and
//! color under a tenant-configurable 3x3, 4x4 or 5x5 matrix, and keeps every
//! consumer consistent when a tenant's matrix changes.
//!
//! Typical flow: [`MatrixConfigResolver::resolve`] → [`classify`] /
//! [`aggregate`], with [`ConfigChangeNotifier`] (or a [`TenantMatrixView`])
//! signalling when to resolve again.

pub mod classify;
pub mod color;
pub mod error;
pub mod input;
pub mod matrix;
pub mod notify;
pub mod report;
pub mod resolve;
pub mod tenant;
pub mod util;

pub use classify::{ClassificationResult, LevelDistribution, Position, RiskInput, aggregate, classify};
pub use color::ColorValue;
pub use matrix::{ConfigSource, LevelThreshold, MatrixConfig, MatrixDimension, RiskLevel};
pub use notify::{ConfigChangeNotifier, Subscription};
pub use resolve::{MatrixConfigResolver, TenantMatrixView};
pub use tenant::TenantId;

use report::model::{ClassifiedRisk, RiskReport, ToolInfo};

pub const TOOL_NAME: &str = "riskmatrix";

/// JSON schema version of assessment reports.
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Resolve `tenant`'s matrix, classify every complete record and count
/// them per level.
pub fn assess(
    resolver: &MatrixConfigResolver,
    tenant: &TenantId,
    requested: Option<MatrixDimension>,
    risks: &[RiskInput],
    tool: ToolInfo,
) -> RiskReport {
    let resolved = resolver.resolve(tenant, requested);
    let config = classify::usable_config(&resolved);

    let classified = risks
        .iter()
        .filter_map(|risk| {
            let (probability, impact) = risk.axes()?;
            Some(ClassifiedRisk {
                id: risk.id.clone(),
                classification: classify::score::classify_checked(probability, impact, &config),
            })
        })
        .collect();

    let distribution = aggregate(risks, &config);

    RiskReport::new(tool, tenant.clone(), &config, classified, distribution)
}
