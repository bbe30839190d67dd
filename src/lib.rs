// src/lib.rs

#[macro_use]
pub mod macros;

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod specs;

pub mod batch;
pub mod error;
pub mod log;
pub mod pipeline;
pub mod progress;
pub mod rank;
pub mod retry;
pub mod titles;
pub mod tsv;
pub mod votes;

pub use error::{Error, Result};
pub use titles::Ttid;
