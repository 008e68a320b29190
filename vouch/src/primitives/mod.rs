/// Global configuration registered by the host application at startup.
pub mod config;

/// Logging that forwards to a host-provided sink across the FFI boundary.
pub mod logger;

/// Host platform identification.
pub mod platform;
