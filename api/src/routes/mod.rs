//! API route definitions.
//!
//! This module organizes all HTTP routes for the llmscope API server.

mod health;
mod langfuse;

pub use health::health_routes;
pub use langfuse::langfuse_routes;
