use std::sync::Arc;

use crate::config::Config;
use crate::render::Composer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Stateless render engine; one instance serves every request.
    pub composer: Arc<Composer>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        AppState {
            config,
            composer: Arc::new(Composer::default()),
        }
    }
}
