//! # orderly-cli
//!
//! Reads one validation request as JSON, runs it through `orderly-core`, and
//! writes the tagged outcome to stdout. The binary lives in `main.rs`; the
//! pieces are exposed here so they can be tested without a process boundary.

pub mod config;
pub mod error;
pub mod hasher;
pub mod logging;
pub mod request;

pub use config::CliConfig;
pub use error::CliError;
pub use hasher::Argon2Hasher;
pub use request::{process, Request, Response};
