//! Core types and configuration for s3sign.
//!
//! This crate provides the building blocks shared by the signing, model and
//! client crates: the [`Region`] table with its signing-scope names and
//! endpoint hosts, the environment-driven [`ClientConfig`], and the core
//! error type.

mod config;
mod error;
mod types;

pub use config::{ClientConfig, SignatureVersion};
pub use error::{CoreError, CoreResult};
pub use types::Region;
