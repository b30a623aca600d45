use std::sync::Arc;

use crate::controllayer::{AliveHandler, ModelsHandler, RequestHandler};
use crate::datalayer::CRUD::cars::CarStore;

/// Function names accepted by the invocation endpoint
pub const ALIVE_FUNCTION: &str = "alive";
pub const MODELS_FUNCTION: &str = "get-models";

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub alive: Arc<AliveHandler>,
    pub models: Arc<ModelsHandler>,
}

impl AppState {
    /// Create new application state over a car store
    pub fn new(cars: Arc<dyn CarStore>) -> Self {
        Self {
            alive: Arc::new(AliveHandler::new()),
            models: Arc::new(ModelsHandler::new(cars)),
        }
    }

    /// The car store behind the lookup handler
    pub fn cars(&self) -> &Arc<dyn CarStore> {
        self.models.store()
    }

    /// Resolve a deployed function by name
    pub fn function(&self, name: &str) -> Option<Arc<dyn RequestHandler>> {
        let handler: Arc<dyn RequestHandler> = match name {
            ALIVE_FUNCTION => self.alive.clone(),
            MODELS_FUNCTION => self.models.clone(),
            _ => return None,
        };
        Some(handler)
    }
}
