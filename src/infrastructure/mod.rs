//! Infrastructure layer module
//!
//! This module contains the adapters behind the domain ports:
//! - Task store HTTP API (reqwest)
//! - Local session persistence
//! - Configuration management
//! - Logging infrastructure
//!
//! Infrastructure implementations satisfy the port traits defined in the domain layer.

pub mod config;
pub mod credentials;
pub mod http;
pub mod logging;
