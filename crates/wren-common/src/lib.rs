//! Shared utilities for the Wren rendering pipeline.
//!
//! # Scope
//!
//! This crate provides:
//! - **URL values** - parsing and relative resolution per the
//!   [URL Standard](https://url.spec.whatwg.org/)
//! - **Form encoding** - percent-encoding for `application/x-www-form-urlencoded`
//!   bodies
//! - **Warnings** - deduplicated diagnostics for recoverable conditions

/// URL parsing, relative resolution, and form encoding.
pub mod url;
/// Deduplicated warning output for recoverable conditions.
pub mod warning;

pub use url::{Scheme, Url, UrlParseError, form_urlencode, percent_encode};
pub use warning::{clear_warnings, warn_once};
