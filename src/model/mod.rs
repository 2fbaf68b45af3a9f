//! Models exchanged with the server and their per-instance metadata.
//!
//! The client never looks inside a model: it only asks the model for its
//! serialized form and name, and builds models back from serialized forms.
//! Server-assigned attributes live in a side table keyed by the identity of
//! a [`Tracked`] handle, so editing a model never detaches it from its
//! metadata.

mod json;
mod metadata;

use serde_json::Value;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

pub use json::{InvalidNetwork, JsonNetwork};
pub use metadata::{Metadata, MetadataStore};

/// A model that can be stored on the server.
pub trait Model: Clone {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Builds a model from its serialized form (the resource's `json` field).
    fn from_dict(value: Value) -> Result<Self, Self::Error>;

    /// Serialized form sent as the resource's `json` field.
    fn as_dict(&self) -> Value;

    fn name(&self) -> Option<String>;
}

/// Identity of a model instance held by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelKey(u64);

impl ModelKey {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        ModelKey(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A model paired with an identity the client can attach metadata to.
///
/// Cloning a `Tracked` creates a new instance with a fresh identity; the
/// clone starts without metadata. Metadata only refers to the handle weakly,
/// so dropping the handle lets the client discard it.
#[derive(Debug)]
pub struct Tracked<M> {
    key: ModelKey,
    alive: Arc<()>,
    model: M,
}

impl<M> Tracked<M> {
    pub fn new(model: M) -> Self {
        Self {
            key: ModelKey::next(),
            alive: Arc::new(()),
            model,
        }
    }

    pub fn key(&self) -> ModelKey {
        self.key
    }

    pub(crate) fn liveness(&self) -> Weak<()> {
        Arc::downgrade(&self.alive)
    }
}

impl<M: Clone> Tracked<M> {
    pub fn duplicate(&self) -> Self {
        Self::new(self.model.clone())
    }
}

impl<M: Clone> Clone for Tracked<M> {
    fn clone(&self) -> Self {
        self.duplicate()
    }
}

impl<M> From<M> for Tracked<M> {
    fn from(model: M) -> Self {
        Self::new(model)
    }
}

impl<M> Deref for Tracked<M> {
    type Target = M;

    fn deref(&self) -> &M {
        &self.model
    }
}

impl<M> DerefMut for Tracked<M> {
    fn deref_mut(&mut self) -> &mut M {
        &mut self.model
    }
}
