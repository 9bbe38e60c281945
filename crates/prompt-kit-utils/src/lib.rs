//! Shared utilities for prompt-kit
//!
//! This crate provides common functionality used across the prompt-kit workspace,
//! including logging setup and environment-variable helpers for configuration.

pub mod env;
pub mod logging;

pub use env::{EnvError, env_flag, env_parse, env_string, parse_flag, parse_value};
pub use logging::{init_tracing, try_init_tracing};
