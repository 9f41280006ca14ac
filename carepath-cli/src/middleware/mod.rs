//! Node middleware for the consultation graphs.

mod logging;

pub use logging::LoggingMiddleware;
