//! Shared configuration and utilities for Tessera
//!
//! This crate provides common functionality used across the workspace:
//! - Configuration management following 12-factor principles
//! - An injectable clock so expiry decisions can be tested deterministically

pub mod clock;
pub mod config;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
