// Application state module
// Everything a request handler needs, shared behind an Arc

use super::types::Config;
use crate::docs::ApiDocs;
use crate::store::Store;

/// Application state
pub struct AppState {
    pub config: Config,
    pub store: Store,
    pub docs: ApiDocs,
}

impl AppState {
    /// Assemble state around an already loaded store
    pub fn new(config: Config, store: Store) -> Self {
        let docs = ApiDocs::new(&config);
        Self {
            config,
            store,
            docs,
        }
    }
}
