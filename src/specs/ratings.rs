// src/specs/ratings.rs
//! Scraping *spec* for a title's ratings page (`/title/<ttid>/ratings`).
//!
//! The page breaks votes down by demographic. The two numbers we need sit in
//! links whose `href` carries `demo=males` / `demo=females`, with link text like
//! `12,345`. A missing link means "no data for that side", not zero.
//!
//! Any fetch or parse failure is retried according to the [`RetryPolicy`].

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::config::consts::{FEMALE_ANCHOR, MALE_ANCHOR, RATINGS_URL_TMPL};
use crate::core::html::anchor_text_by_href;
use crate::core::net::PageSource;
use crate::core::sanitize::strip_separators;
use crate::error::{Error, Result};
use crate::retry::RetryPolicy;
use crate::titles::Ttid;
use crate::votes::GenderVotes;

static TTID_IN_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|/)([a-z]{2}[0-9]+)(?:[/?#]|$)").expect("static regex"));

pub fn ratings_url(id: &Ttid) -> String {
    RATINGS_URL_TMPL.replace("{ttid}", id.as_str())
}

/// Pull the title identifier out of a title URL (or accept a bare ttid).
pub fn parse_ttid(url: &str) -> Result<Ttid> {
    let url = url.trim();
    TTID_IN_URL
        .captures(url)
        .and_then(|c| c.get(1))
        .ok_or_else(|| Error::NoTitleId(s!(url)))?
        .as_str()
        .parse()
}

/// `"12,345"` → `12345`. Separators and surrounding whitespace are ignored.
pub fn parse_count(text: &str) -> Result<u64> {
    let digits = strip_separators(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::BadCount(s!(text)));
    }
    digits.parse().map_err(|_| Error::BadCount(s!(text)))
}

/// Extract both sides from a ratings page body.
pub fn parse_page(doc: &str) -> Result<GenderVotes> {
    let side = |needle: &str| -> Result<Option<u64>> {
        anchor_text_by_href(doc, needle).map(|t| parse_count(&t)).transpose()
    };
    Ok(GenderVotes { male: side(MALE_ANCHOR)?, female: side(FEMALE_ANCHOR)? })
}

pub struct RatingsScraper<S: PageSource> {
    source: S,
    retry: RetryPolicy,
}

impl<S: PageSource> RatingsScraper<S> {
    pub fn new(source: S, retry: RetryPolicy) -> Self {
        Self { source, retry }
    }

    /// Fetch + parse one title. `None` only when a bounded policy runs out of
    /// attempts; the default policy keeps trying.
    pub fn fetch(&self, id: &Ttid) -> Option<GenderVotes> {
        let url = ratings_url(id);
        let res = self.retry.run(id.as_str(), || {
            let doc = self.source.get(&url)?;
            parse_page(&doc)
        });
        match res {
            Ok(v) => {
                debug!("{id}: male={:?} female={:?}", v.male, v.female);
                Some(v)
            }
            Err(e) => {
                warn!("{id}: no gender votes ({e}), dropped");
                None
            }
        }
    }
}
