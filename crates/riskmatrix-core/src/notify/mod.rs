//! In-process "tenant matrix changed" channel.
//!
//! Settings editors call [`ConfigChangeNotifier::notify`] right after a
//! successful write; views and caches subscribe and re-resolve on the next
//! use. Delivery is best-effort and at-least-once: a missed notification
//! only delays consistency until the next explicit resolve.
//!
//! Subscribers are kept per tenant in a `DashMap`, tagged by a token so
//! removal never depends on callback identity. Callbacks run after the
//! shard lock is released, so a callback may subscribe or unsubscribe.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use dashmap::DashMap;
use once_cell::sync::Lazy;
use tracing::debug;

use crate::tenant::TenantId;

pub type ChangeCallback = Arc<dyn Fn(&TenantId) + Send + Sync>;

static GLOBAL: Lazy<ConfigChangeNotifier> = Lazy::new(ConfigChangeNotifier::new);

struct Subscriber {
    token: u64,
    callback: ChangeCallback,
}

#[derive(Default)]
struct Registry {
    next_token: AtomicU64,
    tenants: DashMap<TenantId, Vec<Subscriber>>,
    wildcard: DashMap<u64, ChangeCallback>,
}

impl Registry {
    fn token(&self) -> u64 {
        self.next_token.fetch_add(1, Ordering::Relaxed)
    }

    fn remove(&self, scope: &Scope, token: u64) {
        match scope {
            Scope::Tenant(tenant) => {
                if let Some(mut subscribers) = self.tenants.get_mut(tenant) {
                    subscribers.retain(|s| s.token != token);
                }
                self.tenants.remove_if(tenant, |_, subscribers| subscribers.is_empty());
            }
            Scope::All => {
                self.wildcard.remove(&token);
            }
        }
    }
}

#[derive(Debug, Clone)]
enum Scope {
    Tenant(TenantId),
    All,
}

/// Publish/subscribe channel for tenant matrix changes.
///
/// Cloning yields another handle to the same channel.
#[derive(Clone, Default)]
pub struct ConfigChangeNotifier {
    registry: Arc<Registry>,
}

impl ConfigChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide channel.
    pub fn global() -> &'static ConfigChangeNotifier {
        &GLOBAL
    }

    /// Listen for changes to `tenant`'s matrix.
    pub fn subscribe<F>(&self, tenant: &TenantId, callback: F) -> Subscription
    where
        F: Fn(&TenantId) + Send + Sync + 'static,
    {
        let token = self.registry.token();
        self.registry
            .tenants
            .entry(tenant.clone())
            .or_default()
            .push(Subscriber {
                token,
                callback: Arc::new(callback),
            });

        debug!(tenant = %tenant, token, "subscribed to matrix changes");
        Subscription::new(&self.registry, Scope::Tenant(tenant.clone()), token)
    }

    /// Listen for changes to any tenant's matrix.
    pub fn subscribe_all<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&TenantId) + Send + Sync + 'static,
    {
        let token = self.registry.token();
        self.registry.wildcard.insert(token, Arc::new(callback));
        Subscription::new(&self.registry, Scope::All, token)
    }

    /// Signal that `tenant`'s matrix changed. Every current subscriber for
    /// the tenant, and every wildcard subscriber, is invoked once.
    ///
    /// Returns the number of callbacks invoked.
    pub fn notify(&self, tenant: &TenantId) -> usize {
        let mut callbacks: Vec<ChangeCallback> = self
            .registry
            .tenants
            .get(tenant)
            .map(|subscribers| subscribers.iter().map(|s| Arc::clone(&s.callback)).collect())
            .unwrap_or_default();
        callbacks.extend(
            self.registry
                .wildcard
                .iter()
                .map(|entry| Arc::clone(entry.value())),
        );

        debug!(tenant = %tenant, subscribers = callbacks.len(), "matrix configuration changed");
        for callback in &callbacks {
            callback(tenant);
        }
        callbacks.len()
    }

    /// Subscribers registered for `tenant`, excluding wildcard ones.
    pub fn subscriber_count(&self, tenant: &TenantId) -> usize {
        self.registry
            .tenants
            .get(tenant)
            .map_or(0, |subscribers| subscribers.len())
    }
}

impl fmt::Debug for ConfigChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigChangeNotifier")
            .field("tenants", &self.registry.tenants.len())
            .field("wildcard", &self.registry.wildcard.len())
            .finish()
    }
}

/// Handle returned by `subscribe`. Dropping it stops delivery.
#[must_use = "dropping a Subscription unsubscribes immediately"]
#[derive(Debug)]
pub struct Subscription {
    registry: Weak<Registry>,
    scope: Scope,
    token: u64,
    active: bool,
}

impl Subscription {
    fn new(registry: &Arc<Registry>, scope: Scope, token: u64) -> Self {
        Self {
            registry: Arc::downgrade(registry),
            scope,
            token,
            active: true,
        }
    }

    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !std::mem::take(&mut self.active) {
            return;
        }
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(&self.scope, self.token);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}
