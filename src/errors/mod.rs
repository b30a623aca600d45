pub mod errors;

pub use errors::{ErrorDetail, ErrorResponse, ServiceError, ServiceResult};
