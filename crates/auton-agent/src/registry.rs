//! `BehaviorRegistry`: resolves script identifiers to shared models.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::{BehaviorError, BehaviorModel, BehaviorResult, ChorusBehavior, NoopBehavior};

/// Name → model table consulted when scripted agents are created.
///
/// [`with_builtins`](Self::with_builtins) registers `"noop"` and `"chorus"`;
/// embedding applications add their own with [`register`](Self::register).
#[derive(Clone, Default)]
pub struct BehaviorRegistry {
    models: BTreeMap<String, Arc<dyn BehaviorModel>>,
}

impl BehaviorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtins() -> Self {
        let mut reg = Self::new();
        reg.register("noop", NoopBehavior);
        reg.register("chorus", ChorusBehavior::default());
        reg
    }

    /// Register `model` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, model: impl BehaviorModel) -> &mut Self {
        self.register_shared(name, Arc::new(model))
    }

    pub fn register_shared(
        &mut self,
        name:  impl Into<String>,
        model: Arc<dyn BehaviorModel>,
    ) -> &mut Self {
        let name = name.into();
        if self.models.insert(name.clone(), model).is_some() {
            tracing::debug!(script = %name, "behavior replaced");
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn BehaviorModel>> {
        self.models.get(name).cloned()
    }

    /// Like [`get`](Self::get) but unknown names are an error.
    pub fn resolve(&self, name: &str) -> BehaviorResult<Arc<dyn BehaviorModel>> {
        self.get(name)
            .ok_or_else(|| BehaviorError::UnknownScript(name.to_owned()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.models.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for BehaviorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.models.keys()).finish()
    }
}
