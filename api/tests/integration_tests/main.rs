//! Integration tests for the llmscope API.
//!
//! These tests seed an in-memory trace source and verify the chart views
//! served over HTTP.

mod common;
mod health_tests;
mod info_tests;
mod views_tests;
