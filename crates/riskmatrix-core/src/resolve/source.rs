use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::ConfigFetchError;
use crate::notify::ConfigChangeNotifier;
use crate::tenant::TenantId;

/// A tenant's stored matrix customization, as persisted by the settings
/// store. Every field is optional; absent fields inherit the built-in
/// default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TenantMatrixSettings {
    pub dimension: Option<i64>,
    pub thresholds: Option<Vec<ThresholdSetting>>,
    /// Level name → color text (`#rrggbb` or `h s% l%`).
    pub colors: Option<BTreeMap<String, String>>,
    /// Level name → display label.
    pub labels: Option<BTreeMap<String, String>>,
}

impl TenantMatrixSettings {
    pub fn is_empty(&self) -> bool {
        self.dimension.is_none()
            && self.thresholds.is_none()
            && self.colors.as_ref().is_none_or(BTreeMap::is_empty)
            && self.labels.as_ref().is_none_or(BTreeMap::is_empty)
    }
}

/// One stored threshold row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdSetting {
    pub level: String,
    #[serde(alias = "min_score")]
    pub min_score: u32,
    #[serde(alias = "max_score")]
    pub max_score: u32,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

/// Where tenant matrix settings live.
///
/// `Ok(None)` means the tenant has no customization. Timeouts and retries
/// are the implementor's concern; the resolver calls once per resolution.
pub trait TenantSettingsSource: Send + Sync {
    fn tenant_matrix_settings(
        &self,
        tenant: &TenantId,
    ) -> Result<Option<TenantMatrixSettings>, ConfigFetchError>;
}

/// Thread-safe in-process settings store.
#[derive(Debug, Default)]
pub struct InMemorySettingsSource {
    settings: RwLock<HashMap<TenantId, TenantMatrixSettings>>,
}

impl InMemorySettingsSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, tenant: TenantId, settings: TenantMatrixSettings) {
        self.settings.write().insert(tenant, settings);
    }

    pub fn remove(&self, tenant: &TenantId) -> Option<TenantMatrixSettings> {
        self.settings.write().remove(tenant)
    }

    /// Persist `settings` and then signal the change, in that order.
    pub fn store_and_notify(
        &self,
        tenant: TenantId,
        settings: TenantMatrixSettings,
        notifier: &ConfigChangeNotifier,
    ) -> usize {
        self.put(tenant.clone(), settings);
        notifier.notify(&tenant)
    }
}

impl TenantSettingsSource for InMemorySettingsSource {
    fn tenant_matrix_settings(
        &self,
        tenant: &TenantId,
    ) -> Result<Option<TenantMatrixSettings>, ConfigFetchError> {
        Ok(self.settings.read().get(tenant).cloned())
    }
}

/// Settings document on disk: `{ "<tenant>": { ...settings } }`.
///
/// Read on every fetch so edits are picked up by the next resolution.
#[derive(Debug, Clone)]
pub struct JsonFileSettingsSource {
    path: PathBuf,
}

impl JsonFileSettingsSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn read_document(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file: {}", path.display()))
}

fn parse_document(contents: &str) -> Result<BTreeMap<TenantId, TenantMatrixSettings>> {
    serde_json::from_str(contents).context("settings file is not a tenant settings document")
}

impl TenantSettingsSource for JsonFileSettingsSource {
    fn tenant_matrix_settings(
        &self,
        tenant: &TenantId,
    ) -> Result<Option<TenantMatrixSettings>, ConfigFetchError> {
        let contents = read_document(&self.path).map_err(|e| ConfigFetchError::Unavailable {
            tenant: tenant.clone(),
            reason: format!("{e:#}"),
        })?;

        let mut document = parse_document(&contents).map_err(|e| ConfigFetchError::Malformed {
            tenant: tenant.clone(),
            reason: format!("{e:#}"),
        })?;

        Ok(document.remove(tenant))
    }
}
