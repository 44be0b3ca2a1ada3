use std::sync::Arc;

use crate::config::Config;
use crate::matching::service::MatchService;
use crate::store::MatchStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Persistence collaborator. `PgMatchStore` in production.
    pub store: Arc<dyn MatchStore>,
    pub matcher: Arc<MatchService>,
    pub config: Config,
}
