//! Consumer-side cache of one tenant's effective matrix.
//!
//! A view is either *stable* (the cached configuration is assumed current)
//! or *dirty* (a change was signalled since the last resolution). It starts
//! dirty, turns dirty on every notification for its tenant, and turns
//! stable again when `config()` re-resolves.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tracing::debug;

use crate::classify::{ClassificationResult, LevelDistribution, RiskInput, aggregate, classify};
use crate::matrix::{MatrixConfig, MatrixDimension};
use crate::notify::{ConfigChangeNotifier, Subscription};
use crate::resolve::resolver::MatrixConfigResolver;
use crate::tenant::TenantId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Stable,
    Dirty,
}

#[derive(Debug)]
pub struct TenantMatrixView {
    resolver: MatrixConfigResolver,
    tenant: TenantId,
    requested: Option<MatrixDimension>,
    dirty: Arc<AtomicBool>,
    cached: Mutex<Option<MatrixConfig>>,
    _subscription: Subscription,
}

impl TenantMatrixView {
    pub fn new(
        resolver: MatrixConfigResolver,
        tenant: TenantId,
        requested: Option<MatrixDimension>,
        notifier: &ConfigChangeNotifier,
    ) -> Self {
        let dirty = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&dirty);
        let subscription = notifier.subscribe(&tenant, move |_| {
            flag.store(true, Ordering::Release);
        });

        Self {
            resolver,
            tenant,
            requested,
            dirty,
            cached: Mutex::new(None),
            _subscription: subscription,
        }
    }

    pub fn tenant(&self) -> &TenantId {
        &self.tenant
    }

    pub fn state(&self) -> ViewState {
        if self.dirty.load(Ordering::Acquire) {
            ViewState::Dirty
        } else {
            ViewState::Stable
        }
    }

    /// Current configuration, re-resolved first if the view is dirty.
    pub fn config(&self) -> MatrixConfig {
        let mut cached = self.cached.lock();

        // Clear before resolving so a change signalled mid-resolution
        // leaves the view dirty for the next call.
        let was_dirty = self.dirty.swap(false, Ordering::AcqRel);
        if !was_dirty {
            if let Some(config) = cached.as_ref() {
                return config.clone();
            }
        }

        let fresh = self.resolver.resolve(&self.tenant, self.requested);
        let changed = cached
            .as_ref()
            .is_none_or(|old| old.fingerprint() != fresh.fingerprint());
        debug!(tenant = %self.tenant, changed, "re-resolved tenant matrix");
        *cached = Some(fresh.clone());
        fresh
    }

    pub fn classify(&self, probability: i32, impact: i32) -> ClassificationResult {
        classify(probability, impact, &self.config())
    }

    pub fn aggregate(&self, risks: &[RiskInput]) -> LevelDistribution {
        aggregate(risks, &self.config())
    }
}
