//! Shared building blocks for the nettoolbox engines.
//!
//! * [`config`]: explicit run parameters for the scanner and the tracer.
//! * [`error`]: the error taxonomy surfaced to callers.
//! * [`models`]: per-port and per-hop result records.
//! * [`network`]: target resolution and port range normalization.

pub mod config;
pub mod error;
pub mod models;
pub mod network;

pub use error::ToolboxError;
