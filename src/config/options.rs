// src/config/options.rs
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::consts::*;
use crate::retry::RetryPolicy;
use crate::titles::Category;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunOptions {
    /// Directory holding the TSV dumps.
    pub data_dir: PathBuf,
    /// Directory for vote tables and their progress logs.
    pub out_dir: PathBuf,
    /// Exact genre tag the report keeps.
    pub genre: String,
    pub min_votes: u64,
    pub fetch: FetchOptions,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchOptions {
    pub retry: RetryPolicy,
    pub timeout: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            genre: s!(DEFAULT_GENRE),
            min_votes: MIN_VOTES,
            fetch: FetchOptions::default(),
        }
    }
}

impl RunOptions {
    pub fn basics_path(&self) -> PathBuf {
        self.data_dir.join(BASICS_FILE)
    }

    pub fn ratings_path(&self) -> PathBuf {
        self.data_dir.join(RATINGS_FILE)
    }

    pub fn gender_votes_path(&self, category: Category) -> PathBuf {
        table_path(&self.out_dir, GENDER_VOTES_STEM, category)
    }

    pub fn weighted_votes_path(&self, category: Category) -> PathBuf {
        table_path(&self.out_dir, WEIGHTED_VOTES_STEM, category)
    }
}

fn table_path(dir: &Path, stem: &str, category: Category) -> PathBuf {
    dir.join(format!("{stem}_{}.tsv", category.label()))
}
