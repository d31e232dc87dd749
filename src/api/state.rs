use std::sync::Arc;

use crate::config::EngineConfig;
use crate::leaderboard::StatsStore;

/// Shared application state.
///
/// The stats store is the only mutable resource shared across requests;
/// the lock serializes counter updates so concurrent simulations never
/// race.
#[derive(Clone)]
pub struct AppState {
    pub stats: Arc<tokio::sync::RwLock<StatsStore>>,
    pub engine: Arc<EngineConfig>,
}

impl AppState {
    pub fn new(engine: EngineConfig) -> Self {
        Self {
            stats: Arc::new(tokio::sync::RwLock::new(StatsStore::new())),
            engine: Arc::new(engine),
        }
    }
}
