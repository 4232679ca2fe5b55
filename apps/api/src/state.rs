use std::sync::Arc;

use crate::config::Config;
use crate::gateways::{EnhancementGateway, IngestionGateway, PersistenceGateway};
use crate::sessions::SessionManager;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// The three gateways are trait objects so tests (and the keyless local
/// setup) can substitute deterministic implementations.
#[derive(Clone)]
pub struct AppState {
    /// Runtime settings, kept on the state for handlers that need them.
    #[allow(dead_code)]
    pub config: Config,
    pub sessions: SessionManager,
    pub enhancer: Arc<dyn EnhancementGateway>,
    pub ingestor: Arc<dyn IngestionGateway>,
    pub persister: Arc<dyn PersistenceGateway>,
}
