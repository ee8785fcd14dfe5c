//! # Key Resolver Adapters
//!
//! - `InMemoryKeyResolver`: identity to public key map, shareable between
//!   the engine and whatever keeps it up to date
//! - `FnKeyResolver`: wraps a synchronous lookup closure

use crate::ports::outbound::{KeyResolver, KeyResolverError};
use parking_lot::RwLock;
use shared_crypto::RsaPublicKey;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Thread-safe in-memory key store.
///
/// Clones share the same map.
#[derive(Clone, Default)]
pub struct InMemoryKeyResolver {
    keys: Arc<RwLock<HashMap<String, RsaPublicKey>>>,
}

impl InMemoryKeyResolver {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with_key(self, identity: impl Into<String>, key: RsaPublicKey) -> Self {
        self.insert(identity, key);
        self
    }

    /// Register or replace a key, returning the previous one.
    pub fn insert(&self, identity: impl Into<String>, key: RsaPublicKey) -> Option<RsaPublicKey> {
        self.keys.write().insert(identity.into(), key)
    }

    /// Forget a key.
    pub fn remove(&self, identity: &str) -> Option<RsaPublicKey> {
        self.keys.write().remove(identity)
    }

    /// Whether a key is registered for `identity`.
    pub fn contains(&self, identity: &str) -> bool {
        self.keys.read().contains_key(identity)
    }

    /// Number of registered keys.
    pub fn len(&self) -> usize {
        self.keys.read().len()
    }

    /// Whether no keys are registered.
    pub fn is_empty(&self) -> bool {
        self.keys.read().is_empty()
    }
}

impl fmt::Debug for InMemoryKeyResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryKeyResolver")
            .field("keys", &self.len())
            .finish()
    }
}

#[async_trait::async_trait]
impl KeyResolver for InMemoryKeyResolver {
    async fn resolve(&self, identity: &str) -> Result<Option<RsaPublicKey>, KeyResolverError> {
        Ok(self.keys.read().get(identity).cloned())
    }
}

/// `KeyResolver` over a synchronous closure.
pub struct FnKeyResolver<F> {
    lookup: F,
}

impl<F> FnKeyResolver<F>
where
    F: Fn(&str) -> Result<Option<RsaPublicKey>, KeyResolverError> + Send + Sync,
{
    /// Wrap `lookup`.
    pub fn new(lookup: F) -> Self {
        Self { lookup }
    }
}

impl<F> fmt::Debug for FnKeyResolver<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnKeyResolver").finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl<F> KeyResolver for FnKeyResolver<F>
where
    F: Fn(&str) -> Result<Option<RsaPublicKey>, KeyResolverError> + Send + Sync,
{
    async fn resolve(&self, identity: &str) -> Result<Option<RsaPublicKey>, KeyResolverError> {
        (self.lookup)(identity)
    }
}
