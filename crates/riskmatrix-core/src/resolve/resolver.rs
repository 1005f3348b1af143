//! Effective matrix configuration per tenant.
//!
//! Resolution never fails. Tenant settings are merged over the built-in
//! table for the chosen dimension:
//!
//!   - stored dimension, else the requested one, else the configured default
//!   - stored thresholds replace the built-in table only if they validate
//!   - stored colors and labels are applied per level on top of that
//!
//! Anything unusable is logged and skipped, so the worst case is the
//! built-in default.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::color::ColorValue;
use crate::error::MatrixConfigError;
use crate::matrix::defaults::default_color;
use crate::matrix::{
    ConfigSource, LevelThreshold, MatrixConfig, MatrixDimension, RiskLevel, validate_thresholds,
};
use crate::resolve::source::{TenantMatrixSettings, TenantSettingsSource, ThresholdSetting};
use crate::tenant::TenantId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Used when neither the tenant nor the caller names a dimension.
    pub default_dimension: MatrixDimension,
}

/// Resolves tenant matrix configurations from a settings source.
///
/// Cheap to clone; clones share the source. Resolutions are independent
/// and may run concurrently.
#[derive(Clone)]
pub struct MatrixConfigResolver {
    source: Arc<dyn TenantSettingsSource>,
    options: ResolverOptions,
}

impl MatrixConfigResolver {
    pub fn new(source: Arc<dyn TenantSettingsSource>) -> Self {
        Self::with_options(source, ResolverOptions::default())
    }

    pub fn with_options(source: Arc<dyn TenantSettingsSource>, options: ResolverOptions) -> Self {
        Self { source, options }
    }

    pub fn options(&self) -> ResolverOptions {
        self.options
    }

    pub fn resolve(&self, tenant: &TenantId, requested: Option<MatrixDimension>) -> MatrixConfig {
        let fallback_dimension = requested.unwrap_or(self.options.default_dimension);

        let settings = match self.source.tenant_matrix_settings(tenant) {
            Ok(Some(settings)) if !settings.is_empty() => settings,
            Ok(_) => {
                debug!(tenant = %tenant, dimension = %fallback_dimension, "no tenant matrix customization");
                return MatrixConfig::builtin(fallback_dimension);
            }
            Err(err) => {
                warn!(
                    tenant = %tenant,
                    error = %err,
                    "tenant matrix settings unavailable; using built-in default"
                );
                return MatrixConfig::builtin(fallback_dimension);
            }
        };

        let config = apply_settings(tenant, &settings, fallback_dimension);
        debug!(
            tenant = %tenant,
            dimension = %config.dimension,
            source = ?config.source,
            "resolved tenant matrix"
        );
        config
    }
}

impl fmt::Debug for MatrixConfigResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatrixConfigResolver")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Merge `settings` over the built-in table.
///
/// Pure apart from logging; `tenant` is only used for log context.
pub fn apply_settings(
    tenant: &TenantId,
    settings: &TenantMatrixSettings,
    fallback_dimension: MatrixDimension,
) -> MatrixConfig {
    let mut customized = false;

    let dimension = match settings.dimension.map(MatrixDimension::new) {
        Some(Ok(dimension)) => {
            customized = true;
            dimension
        }
        Some(Err(err)) => {
            warn!(tenant = %tenant, error = %err, "ignoring stored matrix dimension");
            fallback_dimension
        }
        None => fallback_dimension,
    };

    let mut config = MatrixConfig::builtin(dimension);

    if let Some(stored) = &settings.thresholds {
        match custom_thresholds(dimension, stored) {
            Ok(thresholds) => {
                config.thresholds = thresholds;
                customized = true;
            }
            Err(err) => {
                error!(
                    tenant = %tenant,
                    dimension = %dimension,
                    error = %err,
                    "rejecting tenant threshold table; using built-in thresholds"
                );
            }
        }
    }

    for (name, text) in settings.colors.iter().flatten() {
        let Some(threshold) = threshold_named(&mut config, tenant, name) else {
            continue;
        };
        match text.parse::<ColorValue>() {
            Ok(color) => {
                threshold.color = color;
                customized = true;
            }
            Err(err) => warn!(tenant = %tenant, level = %name, error = %err, "ignoring tenant level color"),
        }
    }

    for (name, label) in settings.labels.iter().flatten() {
        let Some(threshold) = threshold_named(&mut config, tenant, name) else {
            continue;
        };
        let label = label.trim();
        if label.is_empty() {
            continue;
        }
        threshold.label = label.to_string();
        customized = true;
    }

    if customized {
        config.source = ConfigSource::TenantCustom;
    }
    config
}

fn custom_thresholds(
    dimension: MatrixDimension,
    stored: &[ThresholdSetting],
) -> Result<Vec<LevelThreshold>, MatrixConfigError> {
    let thresholds = stored
        .iter()
        .map(|row| -> Result<LevelThreshold, MatrixConfigError> {
            let level: RiskLevel = row.level.parse()?;
            let color = match &row.color {
                Some(text) => text.parse::<ColorValue>()?,
                None => default_color(level),
            };
            let mut threshold = LevelThreshold::new(level, row.min_score, row.max_score, color);
            if let Some(label) = row.label.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
                threshold.label = label.to_string();
            }
            Ok(threshold)
        })
        .collect::<Result<Vec<_>, _>>()?;

    validate_thresholds(dimension, &thresholds)?;
    Ok(thresholds)
}

fn threshold_named<'a>(
    config: &'a mut MatrixConfig,
    tenant: &TenantId,
    name: &str,
) -> Option<&'a mut LevelThreshold> {
    let level = match name.parse::<RiskLevel>() {
        Ok(level) => level,
        Err(err) => {
            warn!(tenant = %tenant, error = %err, "ignoring tenant level override");
            return None;
        }
    };

    let dimension = config.dimension;
    let found = config.thresholds.iter_mut().find(|t| t.level == level);
    if found.is_none() {
        warn!(
            tenant = %tenant,
            level = %level,
            dimension = %dimension,
            "level override does not exist in this matrix"
        );
    }
    found
}
