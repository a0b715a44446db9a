use std::sync::Arc;

use kanmind_infra::{BoardStore, Loader};

/// Shared application services handed to handlers via `Extension`.
pub struct AppServices {
    store: Arc<dyn BoardStore>,
}

impl AppServices {
    pub fn new(store: Arc<dyn BoardStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn BoardStore {
        &*self.store
    }

    /// Read-only joins for object-level authorization checks.
    pub fn loader(&self) -> Loader<'_, dyn BoardStore> {
        Loader::new(&*self.store)
    }
}
