// src/specs/mod.rs
//! # Scraping “specs” module
//!
//! Page-specific scraping specifications. Each spec covers one remote page and
//! encodes *where the ground truth lives in the HTML* and *how to extract it*.
//!
//! ## What lives here
//! - **Pure HTML parsing** of the remote page, using `core::html` helpers
//!   (case-insensitive scanning, tag stripping, entity normalization).
//! - **URL shaping** for the page and recovering identifiers from URLs.
//! - The **fetch + retry** wrapper that turns one identifier into one record.
//!
//! ## What does **not** live here
//! - **Persistence / resumption**: `batch` decides what still needs fetching.
//! - **Weighting and ranking**: `votes` and `rank`.
//!
//! ## Testing notes
//! - Specs are tested **offline** against inline HTML snippets and in-memory
//!   page sources.
pub mod ratings;
