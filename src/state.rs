use crate::config::Settings;
use crate::storage::Upstream;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub upstream: Upstream,
}

impl AppState {
    pub fn new(settings: Settings, upstream: Upstream) -> Self {
        Self {
            settings: Arc::new(settings),
            upstream,
        }
    }
}
