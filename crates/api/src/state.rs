//! Application state

use common::{Catalog, Config};
use db::Store;
use processor::SubmissionHandler;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub handler: SubmissionHandler<Store>,
}

impl AppState {
    pub fn new(config: Config, store: Store, catalog: Catalog) -> Self {
        let handler = SubmissionHandler::new(store, catalog, &config);
        Self { config, handler }
    }
}
