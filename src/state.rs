use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::FoodStore;
use crate::services::session_service::SessionKeys;

/// Shared, immutable application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn FoodStore>,
    pub sessions: SessionKeys,
    pub bcrypt_cost: u32,
    pub cookie_secure: bool,
}

impl AppState {
    pub fn new(store: Arc<dyn FoodStore>, config: &AppConfig) -> Self {
        Self {
            store,
            sessions: SessionKeys::new(&config.jwt),
            bcrypt_cost: config.bcrypt_cost,
            cookie_secure: config.cookie_secure,
        }
    }
}
