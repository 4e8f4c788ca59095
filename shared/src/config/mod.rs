//! Configuration module for llmscope.
//!
//! This module contains configuration structures for the trace store connection.

pub mod langfuse;

pub use langfuse::{LangfuseConfig, LangfuseConfigError};
