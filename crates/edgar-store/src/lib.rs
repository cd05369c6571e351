#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/edgar-trends/edgar-trends/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Document-store implementations for EDGAR pipeline output.
//!
//! This crate provides implementations of the [`DocumentStore`] trait from
//! `edgar-core`:
//!
//! - [`SqliteStore`] - Persistent SQLite-based store (default, requires `sqlite` feature)
//! - [`MemoryStore`] - Simple in-memory store for testing

/// In-memory store implementation.
pub mod memory;

/// SQLite-based store implementation.
#[cfg(feature = "sqlite")]
pub mod sqlite;

// Re-export the trait for convenience
pub use edgar_core::DocumentStore;

// Re-export implementations
pub use memory::MemoryStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
