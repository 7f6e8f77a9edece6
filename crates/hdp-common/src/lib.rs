//! HDP Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, utilities, and error handling for the HDP project.
//!
//! # Overview
//!
//! This crate provides common functionality used across all HDP workspace members:
//!
//! - **Error Handling**: Custom error types and result types
//! - **Diet Parsing**: The line-grammar parser for diet log documents
//! - **Types**: Shared domain types and data structures
//!
//! # Example
//!
//! ```no_run
//! use hdp_common::diet::DocumentParser;
//!
//! fn scan(lines: &[String]) -> anyhow::Result<()> {
//!     let parser = DocumentParser::new()?;
//!     let document = parser.parse(lines.iter().map(String::as_str));
//!     println!("{} dated sections", document.len());
//!     Ok(())
//! }
//! ```

pub mod diet;
pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{HdpError, Result};
