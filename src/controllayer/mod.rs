pub mod health;
pub mod models;
pub mod types;

pub use health::{AliveHandler, AliveResponse, ReadyResponse};
pub use models::{ModelsHandler, ModelsResponse};
pub use types::{ApiGatewayEvent, RequestHandler, ResponseEnvelope};
