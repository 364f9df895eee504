//! Infrastructure layer - external service implementations

pub mod cache;
pub mod logging;
