pub mod logging;
pub mod normalize;

pub use logging::logging_middleware;
pub use normalize::normalize_response;
