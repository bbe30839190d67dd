// src/error.rs
use std::path::PathBuf;

use crate::titles::Category;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TSV error on {path}: {source}")]
    Tsv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path}: header has no column named {column:?}")]
    MissingColumn { path: PathBuf, column: String },

    #[error("{path}:{line}: row has {found} cells, need at least {needed}: {row:?}")]
    MalformedRow {
        path: PathBuf,
        line: u64,
        needed: usize,
        found: usize,
        row: Vec<String>,
    },

    #[error("not a title identifier: {0:?}")]
    InvalidTtid(String),

    #[error("no title identifier in URL: {0}")]
    NoTitleId(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("malformed vote count {0:?}")]
    BadCount(String),

    #[error("total female votes for {category} titles is zero; bias factor undefined")]
    ZeroFemaleVotes { category: Category },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Error {
        let path = path.into();
        move |source| Error::Io { path, source }
    }

    pub(crate) fn tsv(path: impl Into<PathBuf>) -> impl FnOnce(csv::Error) -> Error {
        let path = path.into();
        move |source| Error::Tsv { path, source }
    }
}
