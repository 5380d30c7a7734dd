//! Application state shared across handlers

use std::sync::Arc;

use crate::session::SessionStore;
use crate::store::DocumentStore;
use crate::upload::ImageStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub sessions: SessionStore,
    pub images: ImageStore,
}
