//! # personnel-gate-api
//!
//! Shared API types for the personnel-gate service.
//! This crate is designed to be WASM-compatible and can be used by the login
//! and upload handlers that consult the gate, in Rust or through wasm-bindgen.
//!
//! ## Features
//!
//! - Request DTOs (LoginCheckRequest, CreateBanRequest, ScanRequest, ...)
//! - Response DTOs (LoginCheckResponse, BanResponse, ScanResponse, ...)
//! - Error response format (ErrorResponse)
//!
//! ## Example
//!
//! ```rust
//! use personnel_gate_api::LoginCheckRequest;
//!
//! let request = LoginCheckRequest {
//!     identifier: "agent@example.gov".to_string(),
//! };
//! ```

pub mod error;
pub mod requests;
pub mod responses;

// Re-exports for convenient access
pub use error::ErrorResponse;
pub use requests::*;
pub use responses::*;
