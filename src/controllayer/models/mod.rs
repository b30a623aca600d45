pub mod models;

pub use models::{MAKE_PARAMETER, ModelsHandler, ModelsResponse};
