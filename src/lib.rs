//! rvpnadm - Control-Plane Admin Client for ``SoftEther`` VPN Servers
//!
//! This library drives the external `vpncmd` management tool — one process
//! per operation — and turns its human-readable tabular output into typed
//! records.
//!
//! ## What This Library Provides
//! - Configuration parsing and validation (TOML format)
//! - vpncmd invocation with argv construction, timeout and password redaction
//! - Report parsing: pipe-delimited line splitting, per-entity record
//!   assembly, byte-count and timestamp normalization
//! - Numeric error-code extraction from tool failures
//! - Typed records per operation (server status, sessions, users)
//!
//! ## What Your Application Must Provide
//! - A reachable `vpncmd` binary and management credentials
//! - Any retry, scheduling, or concurrency policy around the calls
//!
//! The wire protocol to the VPN server is owned entirely by vpncmd; nothing
//! here speaks to the network directly.

pub mod client;
pub mod config;
pub mod error;
pub mod invoke;
pub mod records;
pub mod report;

// Re-export core types for the library interface
pub use client::{AdminClient, CreateUserRequest};
pub use config::Config;
pub use error::{AdminError, Result};
pub use invoke::{ProcessRunner, RawOutput, VpncmdCall, VpncmdRunner};
pub use records::{SessionDetail, SessionSummary, ServerStatus, UserDetail, UserSummary};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
