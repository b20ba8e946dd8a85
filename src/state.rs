//! Shared state injected into every handler.

use std::sync::Arc;

use crate::application::services::AuthService;

/// Application state cloned into each request.
///
/// Holds services only; the stores behind them are owned by the services.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
}

impl AppState {
    pub fn new(auth_service: Arc<AuthService>) -> Self {
        Self { auth_service }
    }
}
