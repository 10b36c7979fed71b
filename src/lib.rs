//! # logdex
//!
//! A persistent secondary-index store with:
//! - An append-only binary record log as the only persistent state
//! - Tombstone deletes that flip one byte in place
//! - An in-memory sorted index rebuilt from the log on startup
//! - A text command driver (`insert` / `delete` / `find`)
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Command Driver                          │
//! │              (count + verb-prefixed commands)               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                        Engine                               │
//! │                (insert / remove / find)                     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌──────────────────┐
//!   │     Log     │◄─rebuild─│ Secondary Index  │
//!   │  (Append)   │          │ key → [(v, off)] │
//!   └─────────────┘          └──────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod log;
pub mod index;
pub mod protocol;
pub mod engine;
pub mod driver;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{LogdexError, Result};
pub use config::Config;
pub use engine::Engine;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of logdex
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
