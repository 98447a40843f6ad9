//! Module registry contract and an in-memory implementation.

use std::collections::BTreeMap;

use modgate_types::{ModuleId, ModuleInfo};

/// External service that prices modules and names their creators.
pub trait ModuleRegistry {
    /// Price and creator of `module_id`, or `None` if it is not registered.
    fn module_info(&self, module_id: ModuleId) -> Option<ModuleInfo>;
}

/// Reference registry backed by a `BTreeMap`.
#[derive(Debug, Default, Clone)]
pub struct InMemoryRegistry {
    modules: BTreeMap<ModuleId, ModuleInfo>,
}

impl InMemoryRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or re-price a module. Returns the previous entry, if any.
    pub fn register(&mut self, module_id: ModuleId, info: ModuleInfo) -> Option<ModuleInfo> {
        self.modules.insert(module_id, info)
    }

    /// Delist a module.
    pub fn remove(&mut self, module_id: ModuleId) -> Option<ModuleInfo> {
        self.modules.remove(&module_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl ModuleRegistry for InMemoryRegistry {
    fn module_info(&self, module_id: ModuleId) -> Option<ModuleInfo> {
        self.modules.get(&module_id).cloned()
    }
}
