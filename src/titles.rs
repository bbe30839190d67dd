// src/titles.rs
// Title metadata from the dumps: identifiers, types, categories, and the
// read-only lookup the report joins against.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::tsv;

/// Title identifier: two lowercase ASCII letters then digits (`tt0111161`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ttid(String);

impl Ttid {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn is_valid(s: &str) -> bool {
        let b = s.as_bytes();
        b.len() > 2
            && b[..2].iter().all(u8::is_ascii_lowercase)
            && b[2..].iter().all(u8::is_ascii_digit)
    }
}

impl FromStr for Ttid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if Self::is_valid(s) { Ok(Self(s!(s))) } else { Err(Error::InvalidTtid(s!(s))) }
    }
}

impl fmt::Display for Ttid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TitleType {
    Movie,
    TvMovie,
    TvSeries,
    TvMiniSeries,
    Other,
}

impl From<&str> for TitleType {
    fn from(s: &str) -> Self {
        match s {
            "movie" => TitleType::Movie,
            "tvMovie" => TitleType::TvMovie,
            "tvSeries" => TitleType::TvSeries,
            "tvMiniSeries" => TitleType::TvMiniSeries,
            _ => TitleType::Other,
        }
    }
}

/// Movie-like vs show-like. Each gets its own vote tables and ranking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Movie,
    Show,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Movie, Category::Show];

    pub fn label(self) -> &'static str {
        match self {
            Category::Movie => "movie",
            Category::Show => "show",
        }
    }

    pub fn includes(self, kind: TitleType) -> bool {
        match self {
            Category::Movie => matches!(kind, TitleType::Movie | TitleType::TvMovie),
            Category::Show => matches!(kind, TitleType::TvSeries | TitleType::TvMiniSeries),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TitleRecord {
    pub id: Ttid,
    pub kind: TitleType,
    pub name: String,
    pub year: Option<u32>,
    /// Comma-separated, as in the dump (`Drama,Musical`).
    pub genres: String,
    pub votes: u64,
}

/// Exact tag membership in a comma-separated genre list.
pub fn has_genre(genres: &str, tag: &str) -> bool {
    genres.split(',').any(|g| g.trim() == tag)
}

const BASICS_COLS: [&str; 5] = ["tconst", "titleType", "primaryTitle", "startYear", "genres"];
const RATINGS_COLS: [&str; 2] = ["tconst", "numVotes"];

/// Join the basics dump with the ratings dump. Titles without a ratings
/// row get 0 votes. Rows with an unusable identifier are skipped.
pub fn load_titles(basics: &Path, ratings: &Path) -> Result<Vec<TitleRecord>> {
    let votes = load_vote_counts(ratings)?;

    let Some(rows) = tsv::read_columns(basics, &BASICS_COLS)? else {
        warn!("{}: no title rows", basics.display());
        return Ok(Vec::new());
    };

    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let mut cells = row.into_iter();
        let (Some(id), Some(kind), Some(name), Some(year), Some(genres)) =
            (cells.next(), cells.next(), cells.next(), cells.next(), cells.next())
        else {
            continue;
        };
        let id = match id.parse::<Ttid>() {
            Ok(id) => id,
            Err(e) => {
                warn!("{}: skipping row: {e}", basics.display());
                continue;
            }
        };
        let votes = votes.get(&id).copied().unwrap_or(0);
        out.push(TitleRecord {
            kind: TitleType::from(kind.as_str()),
            name,
            // `\N` and anything else unparsable mean "unknown"
            year: year.trim().parse().ok(),
            genres,
            votes,
            id,
        });
    }

    info!("loaded {} titles ({} with vote counts)", out.len(), votes.len());
    Ok(out)
}

fn load_vote_counts(ratings: &Path) -> Result<HashMap<Ttid, u64>> {
    let Some(rows) = tsv::read_columns(ratings, &RATINGS_COLS)? else {
        warn!("{}: no rating rows", ratings.display());
        return Ok(HashMap::new());
    };

    let mut out = HashMap::with_capacity(rows.len());
    for row in rows {
        let (Ok(id), Ok(n)) = (row[0].parse::<Ttid>(), row[1].trim().parse::<u64>()) else {
            warn!("{}: skipping unusable row {row:?}", ratings.display());
            continue;
        };
        out.insert(id, n);
    }
    Ok(out)
}

/// Titles worth scraping: enough published votes and the right type.
pub fn eligible(titles: &[TitleRecord], category: Category, min_votes: u64) -> Vec<Ttid> {
    titles
        .iter()
        .filter(|t| t.votes >= min_votes && category.includes(t.kind))
        .map(|t| t.id.clone())
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TitleMeta {
    pub name: String,
    pub year: Option<u32>,
    pub genres: String,
}

/// Read-only ttid → metadata lookup, built once and handed to the ranking.
#[derive(Clone, Debug, Default)]
pub struct TitleIndex {
    by_id: HashMap<Ttid, TitleMeta>,
}

impl TitleIndex {
    pub fn new(titles: &[TitleRecord]) -> Self {
        let by_id = titles
            .iter()
            .map(|t| {
                let meta = TitleMeta { name: t.name.clone(), year: t.year, genres: t.genres.clone() };
                (t.id.clone(), meta)
            })
            .collect();
        Self { by_id }
    }

    pub fn get(&self, id: &Ttid) -> Option<&TitleMeta> {
        self.by_id.get(id)
    }
}

impl FromIterator<(Ttid, TitleMeta)> for TitleIndex {
    fn from_iter<I: IntoIterator<Item = (Ttid, TitleMeta)>>(iter: I) -> Self {
        Self { by_id: iter.into_iter().collect() }
    }
}
