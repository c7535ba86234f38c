/// Database configuration and connection management
pub mod database;

/// Logging/tracing initialization for host applications
pub mod logging;

/// Credit package seed configuration from packages.toml
pub mod packages;
