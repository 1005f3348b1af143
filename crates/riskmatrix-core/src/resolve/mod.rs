//! Tenant configuration resolution.

pub mod resolver;
pub mod source;
pub mod view;

pub use resolver::{MatrixConfigResolver, ResolverOptions, apply_settings};
pub use source::{
    InMemorySettingsSource, JsonFileSettingsSource, TenantMatrixSettings, TenantSettingsSource,
    ThresholdSetting,
};
pub use view::{TenantMatrixView, ViewState};

pub use crate::tenant::TenantId;
