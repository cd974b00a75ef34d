// ABOUTME: Library root for barua - exposes public types for testing and embedding.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod output;
pub mod platform;
pub mod publish;
pub mod types;
pub mod validate;
