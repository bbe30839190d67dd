// src/batch.rs
//! Resumable batch processing over an append-only output table.
//!
//! Every job owns two files:
//! - the **table** (`<stem>.tsv`): a header plus the rows produced per item,
//!   with the item key in column 0;
//! - the **progress log** (`<stem>.progress.tsv`): header `completed`, one key per
//!   finished item.
//!
//! Ordering per item: rows are written and fsynced, then the key is appended
//! and fsynced. A key in the log therefore always has its rows on disk. Rows
//! written for an item whose key never made it to the log (crash in between)
//! are dropped on the next run before anything else happens, so resuming
//! never duplicates them.
//!
//! Jobs are not safe to run concurrently against the same table.

use std::collections::HashSet;
use std::fs;
use std::hash::Hash;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::consts::{PROGRESS_HEADER, PROGRESS_SUFFIX};
use crate::error::{Error, Result};
use crate::progress::Progress;
use crate::titles::Ttid;
use crate::tsv::{self, TsvAppender};

/// Key recorded in the progress log. Callers guarantee one key per item.
pub trait CompletionKey: Eq + Hash + Clone {
    fn encode(&self) -> String;
    fn decode(s: &str) -> Option<Self>;
}

impl CompletionKey for String {
    fn encode(&self) -> String {
        self.clone()
    }
    fn decode(s: &str) -> Option<Self> {
        Some(s!(s))
    }
}

impl CompletionKey for Ttid {
    fn encode(&self) -> String {
        s!(self.as_str())
    }
    fn decode(s: &str) -> Option<Self> {
        s.parse().ok()
    }
}

/// `out/gender_votes_movie.tsv` → `out/gender_votes_movie.progress.tsv`
pub fn progress_log_path(table: &Path) -> PathBuf {
    let stem = table.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    table.with_file_name(format!("{stem}{PROGRESS_SUFFIX}"))
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Items whose key was already in the log.
    pub skipped: usize,
    /// Items transformed in this run, including those that produced no rows.
    pub processed: usize,
    pub rows_written: usize,
    /// Rows left behind by an interrupted item and removed before resuming.
    pub orphans_dropped: usize,
}

pub struct BatchJob {
    table: PathBuf,
    log: PathBuf,
    header: Vec<String>,
}

impl BatchJob {
    pub fn new<S: AsRef<str>>(table: impl Into<PathBuf>, header: &[S]) -> Self {
        let table = table.into();
        Self {
            log: progress_log_path(&table),
            header: header.iter().map(|h| s!(h.as_ref())).collect(),
            table,
        }
    }

    pub fn table_path(&self) -> &Path {
        &self.table
    }

    pub fn log_path(&self) -> &Path {
        &self.log
    }

    /// Keys already marked complete. Lines that don't decode are ignored.
    pub fn completed<K: CompletionKey>(&self) -> Result<HashSet<K>> {
        let Some(rows) = tsv::read_columns(&self.log, &[PROGRESS_HEADER])? else {
            return Ok(HashSet::new());
        };
        let mut out = HashSet::with_capacity(rows.len());
        for row in rows {
            match K::decode(&row[0]) {
                Some(k) => {
                    out.insert(k);
                }
                None => warn!("{}: ignoring unreadable key {:?}", self.log.display(), row[0]),
            }
        }
        Ok(out)
    }

    /// Remove the table and its log so the next run starts from nothing.
    pub fn reset(&self) -> Result<()> {
        for p in [&self.table, &self.log] {
            match fs::remove_file(p) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(Error::Io { path: p.clone(), source: e }),
            }
        }
        Ok(())
    }

    /// Drop table rows whose key decodes as `K` but has no completion mark.
    /// Rows with a key that doesn't decode are kept and reported.
    fn repair<K: CompletionKey>(&self, done: &HashSet<K>) -> Result<usize> {
        let Some((header, rows)) = tsv::read_all(&self.table)? else { return Ok(0) };

        let before = rows.len();
        let mut foreign = 0usize;
        let kept: Vec<Vec<String>> = rows
            .into_iter()
            .filter(|r| match r.first().and_then(|k| K::decode(k)) {
                Some(k) => done.contains(&k),
                None => {
                    foreign += 1;
                    true
                }
            })
            .collect();
        let dropped = before - kept.len();

        if foreign > 0 {
            warn!("{}: {foreign} row(s) with an unreadable key left in place", self.table.display());
        }
        if dropped > 0 {
            warn!(
                "{}: dropping {dropped} row(s) from an interrupted item before resuming",
                self.table.display()
            );
            tsv::rewrite_table(&self.table, &header, &kept)?;
        }
        Ok(dropped)
    }

    /// Process every item whose key is not yet in the log, in input order.
    ///
    /// `transform` returns the rows for one item; an empty set means the item
    /// produced nothing (it is still marked complete). Only I/O failures on
    /// the two artifacts are returned as errors.
    pub fn run<T, K, I, KF, F>(
        &self,
        items: I,
        key_of: KF,
        mut transform: F,
        mut progress: Option<&mut dyn Progress>,
    ) -> Result<BatchSummary>
    where
        I: IntoIterator<Item = T>,
        K: CompletionKey,
        KF: Fn(&T) -> K,
        F: FnMut(&T) -> Vec<Vec<String>>,
    {
        let mut done: HashSet<K> = self.completed()?;
        let orphans_dropped = self.repair(&done)?;

        let mut skipped = 0usize;
        let mut pending = Vec::new();
        for item in items {
            if done.contains(&key_of(&item)) { skipped += 1; } else { pending.push(item); }
        }

        info!(
            "{}: {} item(s) already complete, {} to process",
            self.table.display(), skipped, pending.len()
        );
        if let Some(p) = progress.as_deref_mut() {
            p.begin(pending.len());
        }

        let mut table = TsvAppender::open(&self.table, &self.header)?;
        let mut log = TsvAppender::open(&self.log, &[PROGRESS_HEADER])?;
        let mut summary = BatchSummary { skipped, orphans_dropped, ..BatchSummary::default() };

        for item in pending {
            let key = key_of(&item);
            // duplicate keys inside one input collection run once
            if done.contains(&key) {
                summary.skipped += 1;
                continue;
            }

            let rows = transform(&item);
            for r in &rows {
                table.write_row(r)?;
            }
            table.commit()?;

            let encoded = key.encode();
            log.write_row(&[encoded.as_str()])?;
            log.commit()?;

            summary.processed += 1;
            summary.rows_written += rows.len();
            if let Some(p) = progress.as_deref_mut() {
                p.item_done(&encoded);
            }
            done.insert(key);
        }

        if let Some(p) = progress.as_deref_mut() {
            p.finish();
        }
        Ok(summary)
    }
}
