#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

//! `vouch` is the core library which powers identity document verification in
//! native apps. It bridges a caller's request/response model to an
//! externally-owned verification engine (document and selfie capture) that
//! completes asynchronously through the platform's result-delivery channel.

/// Coordinates verification sessions: the single in-flight session slot,
/// outcome correlation, the stable error-code taxonomy and the dynamic
/// method-call surface.
pub mod session;

/// Introduces low level primitives: logging, host configuration and platform
/// identity.
pub mod primitives;

pub use vouch_macros::{vouch_error, vouch_export};

uniffi::setup_scaffolding!("vouch");
