//! This file is the root of the `casepipe` Rust crate.
//!
//! Its responsibilities are strictly limited to:
//! 1.  Declaring all the top-level modules of the library (`pipeline`,
//!     `kernels`, `bridge`, ...) so the Rust compiler knows they exist.
//! 2.  Re-exporting the handful of types that make up the public surface.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//==================================================================================
// 1. Module Declarations
//==================================================================================
pub mod bridge;
pub mod config;
pub mod kernels;
pub mod pipeline;

mod error;

//==================================================================================
// 2. Public Re-exports
//==================================================================================
pub use error::CasepipeError;
