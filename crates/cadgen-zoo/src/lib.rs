//! Blocking client for the Zoo text-to-CAD API.
//!
//! Implements [`cadgen_core::RemoteCadService`] so the orchestrator can
//! submit prompts and poll jobs without knowing about HTTP.

mod client;
pub mod config;
pub mod schemas;

pub use client::ZooClient;
pub use config::{ApiToken, ConfigError, ZooConfig};
