use std::sync::Arc;

use crate::config::ServerConfig;

/// Handed to every handler through `State<AppState>`. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub pool: agenda_db::DbPool,
    /// Immutable after startup: JWT settings, media paths and limits.
    pub config: Arc<ServerConfig>,
}
